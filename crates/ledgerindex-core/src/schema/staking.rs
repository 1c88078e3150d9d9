//! Delegation records (`staking` stream).

use serde::{Deserialize, Serialize};

use crate::coin::{Coin, Dec};
use crate::event::{Domain, DomainEvent, EventHeader};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StakingAction {
    Delegate,
    Undelegate,
}

impl StakingAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delegate => "delegate",
            Self::Undelegate => "undelegate",
        }
    }
}

/// A delegator's position in one validator after the change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegatorSnapshot {
    pub address: String,
    pub shares: Dec,
    /// Tokens currently backing `shares`.
    pub tokens: Coin,
}

/// A validator's totals after the change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorSnapshot {
    pub operator_address: String,
    pub total_shares: Dec,
    pub total_tokens: Coin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegationEvent {
    pub action: StakingAction,
    /// Tokens bonded or unbonded by this operation.
    pub amount: Coin,
    /// Shares issued or removed by this operation.
    pub shares: Dec,
    pub delegator: DelegatorSnapshot,
    pub validator: ValidatorSnapshot,
}

impl DelegationEvent {
    pub fn delegate(
        amount: Coin,
        shares: Dec,
        delegator: DelegatorSnapshot,
        validator: ValidatorSnapshot,
    ) -> Self {
        Self {
            action: StakingAction::Delegate,
            amount,
            shares,
            delegator,
            validator,
        }
    }

    pub fn undelegate(
        amount: Coin,
        shares: Dec,
        delegator: DelegatorSnapshot,
        validator: ValidatorSnapshot,
    ) -> Self {
        Self {
            action: StakingAction::Undelegate,
            amount,
            shares,
            delegator,
            validator,
        }
    }
}

impl DomainEvent for DelegationEvent {
    const DOMAIN: Domain = Domain::Staking;
    type Header = EventHeader;

    fn action(&self) -> &'static str {
        self.action.as_str()
    }
}
