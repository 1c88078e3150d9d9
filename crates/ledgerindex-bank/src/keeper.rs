//! Bank keeper interface.
//!
//! The host chain owns bank state. The indexer only needs the narrow surface
//! below: apply a mutation, then read back what the mutation left behind.

use ledgerindex_core::{Coin, Coins};

use crate::error::KeeperError;
use crate::types::{Balance, BankParams, DenomMetadata, PageRequest, PageResponse};

pub trait BankKeeper {
    // ─── Params ───────────────────────────────────────────────────────────────

    fn params(&self) -> BankParams;

    fn set_params(&mut self, params: BankParams);

    // ─── Balances ─────────────────────────────────────────────────────────────

    /// Write `coins` as the balance of `address` without touching supply.
    /// Only genesis calls this.
    fn init_balances(&mut self, address: &str, coins: &Coins) -> Result<(), KeeperError>;

    /// Current balance of `address` in `denom` (zero if none).
    fn balance(&self, address: &str, denom: &str) -> Coin;

    /// Every non-empty balance, in ascending address order.
    fn all_balances(&self) -> Vec<Balance>;

    /// One page of [`all_balances`](Self::all_balances).
    fn paginated_balances(
        &self,
        page: &PageRequest,
    ) -> Result<(Vec<Balance>, PageResponse), KeeperError>;

    // ─── Supply ───────────────────────────────────────────────────────────────

    fn supply_of(&self, denom: &str) -> Coin;

    fn set_supply(&mut self, supply: &Coin) -> Result<(), KeeperError>;

    /// One page of total supply in ascending denom order.
    fn paginated_total_supply(
        &self,
        page: &PageRequest,
    ) -> Result<(Coins, PageResponse), KeeperError>;

    // ─── Metadata ─────────────────────────────────────────────────────────────

    fn set_denom_metadata(&mut self, metadata: DenomMetadata);

    fn all_denom_metadata(&self) -> Vec<DenomMetadata>;

    // ─── Module accounts ──────────────────────────────────────────────────────

    fn module_address(&self, name: &str) -> Option<String>;

    /// Name of the module account at `address`, if it is one.
    fn module_for_address(&self, _address: &str) -> Option<String> {
        None
    }

    // ─── Mutations ────────────────────────────────────────────────────────────

    fn send_coins(&mut self, from: &str, to: &str, amount: &Coins) -> Result<(), KeeperError>;

    /// Credit `amount` to the named module account and grow supply.
    fn mint_coins(&mut self, module: &str, amount: &Coins) -> Result<(), KeeperError>;

    /// Debit `amount` from the named module account and shrink supply.
    fn burn_coins(&mut self, module: &str, amount: &Coins) -> Result<(), KeeperError>;
}
