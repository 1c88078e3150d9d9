//! Keeper interfaces for the staking and distribution modules.

use ledgerindex_core::{Coin, Coins, Dec};

use crate::error::{DistributionError, StakingError};
use crate::types::{Delegation, StakingParams, Validator};

pub trait StakingKeeper {
    fn params(&self) -> StakingParams;

    fn validator(&self, operator: &str) -> Option<Validator>;

    fn delegation(&self, delegator: &str, validator: &str) -> Option<Delegation>;

    /// Bond `amount` to `validator`. Returns the shares issued.
    fn delegate(
        &mut self,
        delegator: &str,
        validator: &str,
        amount: &Coin,
    ) -> Result<Dec, StakingError>;

    /// Remove `shares` from the delegation. Returns the tokens unbonded.
    fn undelegate(
        &mut self,
        delegator: &str,
        validator: &str,
        shares: Dec,
    ) -> Result<Coin, StakingError>;

    /// Burn `slash_factor` of the validator's bonded tokens. Returns the
    /// amount actually burned.
    fn slash(
        &mut self,
        validator: &str,
        infraction_height: i64,
        slash_factor: Dec,
    ) -> Result<Coin, StakingError>;
}

pub trait DistributionKeeper {
    /// Where rewards for `address` are paid; defaults to the address itself.
    fn withdraw_address(&self, address: &str) -> String;

    fn set_withdraw_address(
        &mut self,
        address: &str,
        withdraw_address: &str,
    ) -> Result<(), DistributionError>;

    /// Pay out and reset the delegation's accrued rewards.
    fn withdraw_delegation_rewards(
        &mut self,
        delegator: &str,
        validator: &str,
    ) -> Result<Coins, DistributionError>;

    /// Pay out and reset the validator's accrued commission.
    fn withdraw_validator_commission(&mut self, validator: &str)
        -> Result<Coins, DistributionError>;
}
