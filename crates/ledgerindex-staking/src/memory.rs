//! In-memory staking and distribution keepers.

use std::collections::BTreeMap;

use ledgerindex_core::{Amount, Coin, Coins, Dec};
use tracing::debug;

use crate::error::{DistributionError, StakingError};
use crate::keeper::{DistributionKeeper, StakingKeeper};
use crate::types::{Delegation, StakingParams, Validator};

fn is_valid_address(address: &str) -> bool {
    !address.is_empty()
        && address.len() <= 255
        && address.chars().all(|c| c.is_ascii_alphanumeric())
}

// ─── Staking ──────────────────────────────────────────────────────────────────

/// Validators and delegations keyed by address, iterated in address order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStakingKeeper {
    params: StakingParams,
    validators: BTreeMap<String, Validator>,
    /// Keyed by (delegator, validator).
    delegations: BTreeMap<(String, String), Delegation>,
    burned: Amount,
}

impl MemoryStakingKeeper {
    pub fn new(params: StakingParams) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    pub fn create_validator(&mut self, operator: &str) -> Result<(), StakingError> {
        if !is_valid_address(operator) {
            return Err(StakingError::InvalidAddress(operator.to_string()));
        }
        if self.validators.contains_key(operator) {
            return Err(StakingError::ValidatorExists(operator.to_string()));
        }
        self.validators
            .insert(operator.to_string(), Validator::new(operator));
        Ok(())
    }

    /// Tokens burned by slashing since creation.
    pub fn total_burned(&self) -> Amount {
        self.burned
    }

    fn validator_mut(&mut self, operator: &str) -> Result<&mut Validator, StakingError> {
        self.validators
            .get_mut(operator)
            .ok_or_else(|| StakingError::ValidatorNotFound(operator.to_string()))
    }
}

impl StakingKeeper for MemoryStakingKeeper {
    fn params(&self) -> StakingParams {
        self.params.clone()
    }

    fn validator(&self, operator: &str) -> Option<Validator> {
        self.validators.get(operator).cloned()
    }

    fn delegation(&self, delegator: &str, validator: &str) -> Option<Delegation> {
        self.delegations
            .get(&(delegator.to_string(), validator.to_string()))
            .cloned()
    }

    fn delegate(
        &mut self,
        delegator: &str,
        validator: &str,
        amount: &Coin,
    ) -> Result<Dec, StakingError> {
        if !is_valid_address(delegator) {
            return Err(StakingError::InvalidAddress(delegator.to_string()));
        }
        if amount.denom != self.params.bond_denom {
            return Err(StakingError::InvalidBondDenom {
                expected: self.params.bond_denom.clone(),
                got: amount.denom.clone(),
            });
        }
        if amount.is_zero() {
            return Err(StakingError::ZeroAmount);
        }

        let key = (delegator.to_string(), validator.to_string());
        let current = self.delegations.get(&key).map(|d| d.shares).unwrap_or(Dec::ZERO);

        let val = self.validator_mut(validator)?;
        let issued = val
            .shares_from_tokens(amount.amount)
            .ok_or(StakingError::Overflow("share issuance"))?;
        let tokens = val
            .tokens
            .checked_add(amount.amount)
            .ok_or(StakingError::Overflow("validator tokens"))?;
        let total_shares = val
            .delegator_shares
            .checked_add(issued)
            .ok_or(StakingError::Overflow("validator shares"))?;
        let shares = current
            .checked_add(issued)
            .ok_or(StakingError::Overflow("delegation shares"))?;

        val.tokens = tokens;
        val.delegator_shares = total_shares;
        self.delegations.insert(
            key,
            Delegation {
                delegator_address: delegator.to_string(),
                validator_address: validator.to_string(),
                shares,
            },
        );
        Ok(issued)
    }

    fn undelegate(
        &mut self,
        delegator: &str,
        validator: &str,
        shares: Dec,
    ) -> Result<Coin, StakingError> {
        if shares.is_zero() {
            return Err(StakingError::ZeroAmount);
        }
        let key = (delegator.to_string(), validator.to_string());
        let held = self
            .delegations
            .get(&key)
            .map(|d| d.shares)
            .ok_or_else(|| StakingError::DelegationNotFound {
                delegator: delegator.to_string(),
                validator: validator.to_string(),
            })?;
        let remaining = held
            .checked_sub(shares)
            .ok_or(StakingError::InsufficientShares {
                available: held,
                requested: shares,
            })?;

        let bond_denom = self.params.bond_denom.clone();
        let val = self.validator_mut(validator)?;
        let tokens = val.tokens_from_shares(shares);
        val.tokens -= tokens;
        val.delegator_shares = val
            .delegator_shares
            .checked_sub(shares)
            .ok_or(StakingError::Overflow("validator shares"))?;

        if remaining.is_zero() {
            self.delegations.remove(&key);
        } else if let Some(delegation) = self.delegations.get_mut(&key) {
            delegation.shares = remaining;
        }
        Ok(Coin::new(bond_denom, tokens))
    }

    fn slash(
        &mut self,
        validator: &str,
        infraction_height: i64,
        slash_factor: Dec,
    ) -> Result<Coin, StakingError> {
        if slash_factor > Dec::ONE {
            return Err(StakingError::InvalidSlashFactor(slash_factor));
        }
        let bond_denom = self.params.bond_denom.clone();
        let val = self.validator_mut(validator)?;
        let burned = slash_factor
            .mul_int_truncate(val.tokens)
            .ok_or(StakingError::Overflow("slash amount"))?
            .min(val.tokens);
        val.tokens -= burned;
        self.burned = self.burned.saturating_add(burned);

        debug!(validator, infraction_height, burned, "slashed validator");
        Ok(Coin::new(bond_denom, burned))
    }
}

// ─── Distribution ─────────────────────────────────────────────────────────────

/// Accrued rewards and commission, plus a ledger of what was paid where.
#[derive(Debug, Clone, Default)]
pub struct MemoryDistributionKeeper {
    withdraw_addresses: BTreeMap<String, String>,
    /// Keyed by (delegator, validator).
    rewards: BTreeMap<(String, String), Coins>,
    commission: BTreeMap<String, Coins>,
    paid: BTreeMap<String, Coins>,
}

impl MemoryDistributionKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking rewards for a delegation.
    pub fn register_delegation(&mut self, delegator: &str, validator: &str) {
        self.rewards
            .entry((delegator.to_string(), validator.to_string()))
            .or_default();
    }

    pub fn allocate_rewards(
        &mut self,
        delegator: &str,
        validator: &str,
        amount: &Coins,
    ) -> Result<(), DistributionError> {
        self.rewards
            .entry((delegator.to_string(), validator.to_string()))
            .or_default()
            .add_all(amount)?;
        Ok(())
    }

    pub fn allocate_commission(
        &mut self,
        validator: &str,
        amount: &Coins,
    ) -> Result<(), DistributionError> {
        self.commission
            .entry(validator.to_string())
            .or_default()
            .add_all(amount)?;
        Ok(())
    }

    /// Everything paid out to `address` so far.
    pub fn paid_to(&self, address: &str) -> Coins {
        self.paid.get(address).cloned().unwrap_or_default()
    }

    fn pay(&mut self, address: String, amount: &Coins) -> Result<(), DistributionError> {
        self.paid.entry(address).or_default().add_all(amount)?;
        Ok(())
    }
}

impl DistributionKeeper for MemoryDistributionKeeper {
    fn withdraw_address(&self, address: &str) -> String {
        self.withdraw_addresses
            .get(address)
            .cloned()
            .unwrap_or_else(|| address.to_string())
    }

    fn set_withdraw_address(
        &mut self,
        address: &str,
        withdraw_address: &str,
    ) -> Result<(), DistributionError> {
        for addr in [address, withdraw_address] {
            if !is_valid_address(addr) {
                return Err(DistributionError::InvalidAddress(addr.to_string()));
            }
        }
        if address == withdraw_address {
            self.withdraw_addresses.remove(address);
        } else {
            self.withdraw_addresses
                .insert(address.to_string(), withdraw_address.to_string());
        }
        Ok(())
    }

    fn withdraw_delegation_rewards(
        &mut self,
        delegator: &str,
        validator: &str,
    ) -> Result<Coins, DistributionError> {
        let accrued = self
            .rewards
            .get_mut(&(delegator.to_string(), validator.to_string()))
            .ok_or_else(|| DistributionError::NoDelegation {
                delegator: delegator.to_string(),
                validator: validator.to_string(),
            })?;
        let rewards = std::mem::take(accrued);
        self.pay(self.withdraw_address(delegator), &rewards)?;
        Ok(rewards)
    }

    fn withdraw_validator_commission(
        &mut self,
        validator: &str,
    ) -> Result<Coins, DistributionError> {
        let commission = self
            .commission
            .remove(validator)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| DistributionError::NoValidatorCommission(validator.to_string()))?;
        self.pay(self.withdraw_address(validator), &commission)?;
        Ok(commission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stake(amount: Amount) -> Coin {
        Coin::new("stake", amount)
    }

    fn keeper() -> MemoryStakingKeeper {
        let mut keeper = MemoryStakingKeeper::new(StakingParams::default());
        keeper.create_validator("valoper1").unwrap();
        keeper
    }

    #[test]
    fn delegate_then_undelegate_everything() {
        let mut keeper = keeper();
        let shares = keeper.delegate("alice", "valoper1", &stake(100)).unwrap();
        assert_eq!(shares, Dec::from_int(100).unwrap());

        let returned = keeper.undelegate("alice", "valoper1", shares).unwrap();
        assert_eq!(returned, stake(100));
        assert!(keeper.delegation("alice", "valoper1").is_none());
        let v = keeper.validator("valoper1").unwrap();
        assert_eq!(v.tokens, 0);
        assert!(v.delegator_shares.is_zero());
    }

    #[test]
    fn delegate_rejects_wrong_denom_and_unknown_validator() {
        let mut keeper = keeper();
        assert!(matches!(
            keeper.delegate("alice", "valoper1", &Coin::new("atom", 1)),
            Err(StakingError::InvalidBondDenom { .. })
        ));
        assert_eq!(
            keeper.delegate("alice", "valoper9", &stake(1)),
            Err(StakingError::ValidatorNotFound("valoper9".into()))
        );
        assert_eq!(keeper.delegate("alice", "valoper1", &stake(0)), Err(StakingError::ZeroAmount));
    }

    #[test]
    fn undelegate_more_than_held_fails_cleanly() {
        let mut keeper = keeper();
        keeper.delegate("alice", "valoper1", &stake(10)).unwrap();
        let err = keeper
            .undelegate("alice", "valoper1", Dec::from_int(11).unwrap())
            .unwrap_err();
        assert!(matches!(err, StakingError::InsufficientShares { .. }));
        assert_eq!(keeper.validator("valoper1").unwrap().tokens, 10);
    }

    #[test]
    fn slash_burns_a_fraction_of_bonded_tokens() {
        let mut keeper = keeper();
        keeper.delegate("alice", "valoper1", &stake(1000)).unwrap();
        let burned = keeper
            .slash("valoper1", 480, "0.05".parse().unwrap())
            .unwrap();
        assert_eq!(burned, stake(50));
        assert_eq!(keeper.validator("valoper1").unwrap().tokens, 950);
        assert_eq!(keeper.total_burned(), 50);
        assert!(matches!(
            keeper.slash("valoper1", 480, "1.5".parse().unwrap()),
            Err(StakingError::InvalidSlashFactor(_))
        ));
    }

    #[test]
    fn rewards_are_paid_to_withdraw_address() {
        let mut keeper = MemoryDistributionKeeper::new();
        keeper
            .allocate_rewards("alice", "valoper1", &"7stake".parse().unwrap())
            .unwrap();
        keeper.set_withdraw_address("alice", "vault").unwrap();

        let paid = keeper.withdraw_delegation_rewards("alice", "valoper1").unwrap();
        assert_eq!(paid, "7stake".parse::<Coins>().unwrap());
        assert_eq!(keeper.paid_to("vault"), "7stake".parse::<Coins>().unwrap());

        let again = keeper.withdraw_delegation_rewards("alice", "valoper1").unwrap();
        assert!(again.is_empty());
    }

    #[test]
    fn empty_commission_cannot_be_withdrawn() {
        let mut keeper = MemoryDistributionKeeper::new();
        assert_eq!(
            keeper.withdraw_validator_commission("valoper1"),
            Err(DistributionError::NoValidatorCommission("valoper1".into()))
        );
        assert!(matches!(
            keeper.withdraw_delegation_rewards("bob", "valoper1"),
            Err(DistributionError::NoDelegation { .. })
        ));
    }
}
