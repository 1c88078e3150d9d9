//! Delegation and slash emitters.

use std::sync::Arc;

use ledgerindex_core::{
    Coin, Dec, DelegationEvent, DelegatorSnapshot, EventSink, ExecutionContext, Infraction,
    SlashEvent, ValidatorSnapshot,
};
use tracing::warn;

use crate::error::StakingError;
use crate::keeper::StakingKeeper;
use crate::types::Delegation;

/// Wraps a [`StakingKeeper`]. Delegation changes go to the `staking` stream,
/// slashes to the `slashing` stream.
pub struct IndexedStaking<K> {
    keeper: K,
    staking: Arc<EventSink<DelegationEvent>>,
    slashing: Arc<EventSink<SlashEvent>>,
}

impl<K: StakingKeeper> IndexedStaking<K> {
    pub fn new(
        keeper: K,
        staking: Arc<EventSink<DelegationEvent>>,
        slashing: Arc<EventSink<SlashEvent>>,
    ) -> Self {
        Self {
            keeper,
            staking,
            slashing,
        }
    }

    pub fn keeper(&self) -> &K {
        &self.keeper
    }

    pub fn keeper_mut(&mut self) -> &mut K {
        &mut self.keeper
    }

    pub fn into_inner(self) -> K {
        self.keeper
    }

    /// Bond `amount` and record the shares issued with both post-change snapshots.
    pub fn delegate<C: ExecutionContext + ?Sized>(
        &mut self,
        ctx: &C,
        delegator: &str,
        validator: &str,
        amount: &Coin,
    ) -> Result<Dec, StakingError> {
        let shares = self.keeper.delegate(delegator, validator, amount)?;
        let event = self.read_back(delegator, validator, |delegator, validator| {
            DelegationEvent::delegate(amount.clone(), shares, delegator, validator)
        })?;
        self.staking.emit(ctx, &event);
        Ok(shares)
    }

    /// Unbond `shares` and record the tokens returned.
    pub fn undelegate<C: ExecutionContext + ?Sized>(
        &mut self,
        ctx: &C,
        delegator: &str,
        validator: &str,
        shares: Dec,
    ) -> Result<Coin, StakingError> {
        let amount = self.keeper.undelegate(delegator, validator, shares)?;
        let event = self.read_back(delegator, validator, |delegator, validator| {
            DelegationEvent::undelegate(amount.clone(), shares, delegator, validator)
        })?;
        self.staking.emit(ctx, &event);
        Ok(amount)
    }

    /// Slash `validator` for an infraction at `infraction_height`.
    ///
    /// The infraction may not lie in the future of the current block and the
    /// factor must lie in `[0, 1]`; both are checked before the keeper is
    /// called. The record carries the amount the keeper actually burned.
    pub fn slash<C: ExecutionContext + ?Sized>(
        &mut self,
        ctx: &C,
        validator: &str,
        infraction_height: i64,
        infraction: Infraction,
        slash_factor: Dec,
    ) -> Result<Coin, StakingError> {
        let current_height = ctx.block_height();
        if infraction_height > current_height {
            warn!(
                validator,
                infraction_height, current_height, "rejected slash for future infraction"
            );
            return Err(StakingError::FutureInfraction {
                infraction_height,
                current_height,
            });
        }
        if slash_factor > Dec::ONE {
            return Err(StakingError::InvalidSlashFactor(slash_factor));
        }

        let burned = self
            .keeper
            .slash(validator, infraction_height, slash_factor)?;
        let event = SlashEvent::new(
            infraction_height,
            infraction,
            validator,
            slash_factor,
            burned.clone(),
        );
        self.slashing.emit(ctx, &event);
        Ok(burned)
    }

    fn read_back<F>(
        &self,
        delegator: &str,
        validator: &str,
        build: F,
    ) -> Result<DelegationEvent, StakingError>
    where
        F: FnOnce(DelegatorSnapshot, ValidatorSnapshot) -> DelegationEvent,
    {
        let bond_denom = self.keeper.params().bond_denom;
        let val = self
            .keeper
            .validator(validator)
            .ok_or_else(|| StakingError::ValidatorNotFound(validator.to_string()))?;
        let delegation = self.keeper.delegation(delegator, validator);
        Ok(build(
            Delegation::snapshot(delegation.as_ref(), delegator, &val, &bond_denom),
            val.snapshot(&bond_denom),
        ))
    }
}

impl<K: std::fmt::Debug> std::fmt::Debug for IndexedStaking<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexedStaking")
            .field("keeper", &self.keeper)
            .field("staking", &self.staking.path())
            .field("slashing", &self.slashing.path())
            .finish()
    }
}
