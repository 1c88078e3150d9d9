//! Validator and delegation state as the staking keeper stores it.

use ledgerindex_core::{Amount, Coin, Dec, DelegatorSnapshot, ValidatorSnapshot};
use serde::{Deserialize, Serialize};

fn default_bond_denom() -> String {
    "stake".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingParams {
    /// The only denom that can be delegated.
    #[serde(default = "default_bond_denom")]
    pub bond_denom: String,
}

impl Default for StakingParams {
    fn default() -> Self {
        Self {
            bond_denom: default_bond_denom(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    pub operator_address: String,
    /// Bonded tokens, including those of delegators.
    pub tokens: Amount,
    pub delegator_shares: Dec,
}

impl Validator {
    pub fn new(operator_address: impl Into<String>) -> Self {
        Self {
            operator_address: operator_address.into(),
            tokens: 0,
            delegator_shares: Dec::ZERO,
        }
    }

    /// Shares issued for bonding `amount` tokens at the current exchange rate.
    /// An empty validator issues one share per token.
    pub fn shares_from_tokens(&self, amount: Amount) -> Option<Dec> {
        if self.tokens == 0 || self.delegator_shares.is_zero() {
            Dec::from_int(amount)
        } else {
            self.delegator_shares.mul_ratio(amount, self.tokens)
        }
    }

    /// Tokens currently backing `shares`, truncated.
    pub fn tokens_from_shares(&self, shares: Dec) -> Amount {
        shares
            .portion_of(self.delegator_shares, self.tokens)
            .unwrap_or(0)
    }

    pub fn snapshot(&self, bond_denom: &str) -> ValidatorSnapshot {
        ValidatorSnapshot {
            operator_address: self.operator_address.clone(),
            total_shares: self.delegator_shares,
            total_tokens: Coin::new(bond_denom, self.tokens),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    pub delegator_address: String,
    pub validator_address: String,
    pub shares: Dec,
}

impl Delegation {
    /// The delegator side of a record; `None` delegation means fully unbonded.
    pub fn snapshot(
        delegation: Option<&Delegation>,
        delegator: &str,
        validator: &Validator,
        bond_denom: &str,
    ) -> DelegatorSnapshot {
        let shares = delegation.map(|d| d.shares).unwrap_or(Dec::ZERO);
        DelegatorSnapshot {
            address: delegator.to_string(),
            shares,
            tokens: Coin::new(bond_denom, validator.tokens_from_shares(shares)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_rate_follows_slashed_tokens() {
        let mut v = Validator::new("valoper1");
        assert_eq!(v.shares_from_tokens(100), Dec::from_int(100));

        v.tokens = 100;
        v.delegator_shares = Dec::from_int(100).unwrap();
        // Half the stake slashed: each token now buys two shares.
        v.tokens = 50;
        assert_eq!(v.shares_from_tokens(10), Dec::from_int(20));
        assert_eq!(v.tokens_from_shares(Dec::from_int(20).unwrap()), 10);
    }
}
