//! Reward and commission withdrawal records (`distribution` stream).

use serde::{Deserialize, Serialize};

use crate::coin::Coin;
use crate::event::{Domain, DomainEvent, EventHeader};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionAction {
    WithdrawDelegationRewards,
    WithdrawValidatorCommission,
}

impl DistributionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WithdrawDelegationRewards => "withdraw_delegation_rewards",
            Self::WithdrawValidatorCommission => "withdraw_validator_commission",
        }
    }
}

/// One withdrawn coin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionEvent {
    pub action: DistributionAction,
    pub amount: Coin,
    /// `None` for commission withdrawals (written as `""`).
    #[serde(with = "super::empty_as_none")]
    pub delegator_address: Option<String>,
    pub validator_operator_address: String,
    /// Address the coins were paid out to.
    pub withdraw_address: String,
}

impl DistributionEvent {
    pub fn delegation_rewards(
        amount: Coin,
        delegator: impl Into<String>,
        validator: impl Into<String>,
        withdraw_address: impl Into<String>,
    ) -> Self {
        Self {
            action: DistributionAction::WithdrawDelegationRewards,
            amount,
            delegator_address: Some(delegator.into()),
            validator_operator_address: validator.into(),
            withdraw_address: withdraw_address.into(),
        }
    }

    pub fn validator_commission(
        amount: Coin,
        validator: impl Into<String>,
        withdraw_address: impl Into<String>,
    ) -> Self {
        Self {
            action: DistributionAction::WithdrawValidatorCommission,
            amount,
            delegator_address: None,
            validator_operator_address: validator.into(),
            withdraw_address: withdraw_address.into(),
        }
    }
}

impl DomainEvent for DistributionEvent {
    const DOMAIN: Domain = Domain::Distribution;
    type Header = EventHeader;

    fn action(&self) -> &'static str {
        self.action.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commission_has_empty_delegator_on_wire() {
        let ev = DistributionEvent::validator_commission(Coin::new("stake", 3), "valoper1", "acc1");
        let v = serde_json::to_value(&ev).unwrap();
        assert_eq!(v["delegatorAddress"], "");
        assert_eq!(v["validatorOperatorAddress"], "valoper1");
        assert_eq!(v["action"], "withdraw_validator_commission");

        let back: DistributionEvent = serde_json::from_value(v).unwrap();
        assert_eq!(back.delegator_address, None);
    }
}
