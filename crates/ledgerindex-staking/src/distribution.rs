//! Reward and commission withdrawal emitter.

use std::sync::Arc;

use ledgerindex_core::{Coins, DistributionEvent, EventSink, ExecutionContext};

use crate::error::DistributionError;
use crate::keeper::DistributionKeeper;

/// Wraps a [`DistributionKeeper`]; one `distribution` record per withdrawn coin.
pub struct IndexedDistribution<K> {
    keeper: K,
    sink: Arc<EventSink<DistributionEvent>>,
}

impl<K: DistributionKeeper> IndexedDistribution<K> {
    pub fn new(keeper: K, sink: Arc<EventSink<DistributionEvent>>) -> Self {
        Self { keeper, sink }
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

    pub fn set_withdraw_address(
        &mut self,
        address: &str,
        withdraw_address: &str,
    ) -> Result<(), DistributionError> {
        self.keeper.set_withdraw_address(address, withdraw_address)
    }

    pub fn withdraw_delegation_rewards<C: ExecutionContext + ?Sized>(
        &mut self,
        ctx: &C,
        delegator: &str,
        validator: &str,
    ) -> Result<Coins, DistributionError> {
        let rewards = self.keeper.withdraw_delegation_rewards(delegator, validator)?;
        let withdraw_address = self.keeper.withdraw_address(delegator);
        for coin in rewards.iter() {
            let event = DistributionEvent::delegation_rewards(
                coin,
                delegator,
                validator,
                withdraw_address.as_str(),
            );
            self.sink.emit(ctx, &event);
        }
        Ok(rewards)
    }

    pub fn withdraw_validator_commission<C: ExecutionContext + ?Sized>(
        &mut self,
        ctx: &C,
        validator: &str,
    ) -> Result<Coins, DistributionError> {
        let commission = self.keeper.withdraw_validator_commission(validator)?;
        let withdraw_address = self.keeper.withdraw_address(validator);
        for coin in commission.iter() {
            let event =
                DistributionEvent::validator_commission(coin, validator, withdraw_address.as_str());
            self.sink.emit(ctx, &event);
        }
        Ok(commission)
    }
}

impl<K: std::fmt::Debug> std::fmt::Debug for IndexedDistribution<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexedDistribution")
            .field("keeper", &self.keeper)
            .field("sink", &self.sink.path())
            .finish()
    }
}
