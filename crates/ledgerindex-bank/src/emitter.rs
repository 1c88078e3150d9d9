//! Bank keeper wrapper that records every committed balance or supply change.

use std::sync::Arc;

use ledgerindex_core::{BankEvent, Coin, Coins, EventSink, ExecutionContext, Party};
use tracing::debug;

use crate::error::{GenesisError, KeeperError};
use crate::genesis::{self, GenesisState};
use crate::keeper::BankKeeper;

/// Label `address` as a module account if the keeper knows it as one.
pub(crate) fn party<K: BankKeeper + ?Sized>(keeper: &K, address: &str, balance: Coin) -> Party {
    match keeper.module_for_address(address) {
        Some(name) => Party::module(name, address, balance),
        None => Party::account(address, balance),
    }
}

/// Wraps a [`BankKeeper`] and appends one `bank` record per coin moved.
///
/// Each mutation is applied first; balances and supply in the record are read
/// back from the keeper afterwards. A rejected mutation records nothing.
pub struct IndexedBank<K> {
    keeper: K,
    sink: Arc<EventSink<BankEvent>>,
}

impl<K: BankKeeper> IndexedBank<K> {
    pub fn new(keeper: K, sink: Arc<EventSink<BankEvent>>) -> Self {
        Self { keeper, sink }
    }

    pub fn keeper(&self) -> &K {
        &self.keeper
    }

    pub fn sink(&self) -> &EventSink<BankEvent> {
        &self.sink
    }

    pub fn into_inner(self) -> K {
        self.keeper
    }

    pub fn init_genesis<C: ExecutionContext + ?Sized>(
        &mut self,
        ctx: &C,
        state: GenesisState,
    ) -> Result<Coins, GenesisError> {
        genesis::init_genesis(ctx, &mut self.keeper, &self.sink, state)
    }

    pub fn export_genesis(&self) -> Result<GenesisState, GenesisError> {
        genesis::export_genesis(&self.keeper)
    }

    /// Move `amount` between two addresses; one `transfer` record per denom.
    pub fn send_coins<C: ExecutionContext + ?Sized>(
        &mut self,
        ctx: &C,
        from: &str,
        to: &str,
        amount: &Coins,
    ) -> Result<(), KeeperError> {
        self.keeper.send_coins(from, to, amount)?;
        for coin in amount.iter() {
            let from_party = party(&self.keeper, from, self.keeper.balance(from, &coin.denom));
            let to_party = party(&self.keeper, to, self.keeper.balance(to, &coin.denom));
            self.sink
                .emit(ctx, &BankEvent::transfer(coin, from_party, to_party));
        }
        Ok(())
    }

    pub fn send_coins_from_module_to_account<C: ExecutionContext + ?Sized>(
        &mut self,
        ctx: &C,
        module: &str,
        to: &str,
        amount: &Coins,
    ) -> Result<(), KeeperError> {
        let from = self.require_module(module)?;
        self.send_coins(ctx, &from, to, amount)
    }

    pub fn send_coins_from_account_to_module<C: ExecutionContext + ?Sized>(
        &mut self,
        ctx: &C,
        from: &str,
        module: &str,
        amount: &Coins,
    ) -> Result<(), KeeperError> {
        let to = self.require_module(module)?;
        self.send_coins(ctx, from, &to, amount)
    }

    pub fn send_coins_from_module_to_module<C: ExecutionContext + ?Sized>(
        &mut self,
        ctx: &C,
        from_module: &str,
        to_module: &str,
        amount: &Coins,
    ) -> Result<(), KeeperError> {
        let from = self.require_module(from_module)?;
        let to = self.require_module(to_module)?;
        self.send_coins(ctx, &from, &to, amount)
    }

    /// Mint into a module account; `from` is absent and `newSupply` is read back.
    pub fn mint_coins<C: ExecutionContext + ?Sized>(
        &mut self,
        ctx: &C,
        module: &str,
        amount: &Coins,
    ) -> Result<(), KeeperError> {
        self.keeper.mint_coins(module, amount)?;
        let address = self.require_module(module)?;
        for coin in amount.iter() {
            let balance = self.keeper.balance(&address, &coin.denom);
            let supply = self.keeper.supply_of(&coin.denom);
            let to = Party::module(module, address.as_str(), balance);
            self.sink.emit(ctx, &BankEvent::mint(coin, to, supply));
        }
        debug!(module, amount = %amount, "minted coins");
        Ok(())
    }

    /// Burn from a module account; `to` is absent and `newSupply` is read back.
    pub fn burn_coins<C: ExecutionContext + ?Sized>(
        &mut self,
        ctx: &C,
        module: &str,
        amount: &Coins,
    ) -> Result<(), KeeperError> {
        self.keeper.burn_coins(module, amount)?;
        let address = self.require_module(module)?;
        for coin in amount.iter() {
            let balance = self.keeper.balance(&address, &coin.denom);
            let supply = self.keeper.supply_of(&coin.denom);
            let from = Party::module(module, address.as_str(), balance);
            self.sink.emit(ctx, &BankEvent::burn(coin, from, supply));
        }
        debug!(module, amount = %amount, "burned coins");
        Ok(())
    }

    fn require_module(&self, module: &str) -> Result<String, KeeperError> {
        self.keeper
            .module_address(module)
            .ok_or_else(|| KeeperError::UnknownModule(module.to_string()))
    }
}

impl<K: std::fmt::Debug> std::fmt::Debug for IndexedBank<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexedBank")
            .field("keeper", &self.keeper)
            .field("sink", &self.sink.path())
            .finish()
    }
}
