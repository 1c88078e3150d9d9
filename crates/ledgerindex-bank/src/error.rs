//! Bank keeper and genesis error types.

use ledgerindex_core::{CoinError, Coins};
use thiserror::Error;

use crate::types::ModulePermission;

/// Errors returned by a bank keeper for a rejected mutation or query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeeperError {
    #[error("invalid address: '{0}'")]
    InvalidAddress(String),

    #[error("insufficient funds in {address}: {source}")]
    InsufficientFunds {
        address: String,
        #[source]
        source: CoinError,
    },

    #[error("invalid coins: {0}")]
    InvalidCoins(#[from] CoinError),

    #[error("unknown module account: {0}")]
    UnknownModule(String),

    #[error("module account {module} lacks the {permission} permission")]
    Unauthorized {
        module: String,
        permission: ModulePermission,
    },

    #[error("{denom} transfers are currently disabled")]
    SendDisabled { denom: String },

    #[error("invalid page request: {0}")]
    InvalidPage(String),
}

/// Errors that abort genesis initialization or export.
#[derive(Debug, Error)]
pub enum GenesisError {
    #[error("genesis supply is incorrect, expected {declared}, got {computed}")]
    SupplyMismatch { declared: Coins, computed: Coins },

    #[error("error on setting balances for {address}: {source}")]
    Balance {
        address: String,
        #[source]
        source: KeeperError,
    },

    #[error("error on setting supply of {denom}: {source}")]
    Supply {
        denom: String,
        #[source]
        source: KeeperError,
    },

    #[error("invalid genesis balances: {0}")]
    Coins(#[from] CoinError),

    #[error("invalid bank params: {0}")]
    InvalidParams(String),

    #[error("invalid denom metadata for '{base}': {reason}")]
    InvalidMetadata { base: String, reason: String },

    #[error("unable to fetch total supply: {0}")]
    Export(#[source] KeeperError),
}

impl GenesisError {
    /// Returns `true` if the genesis document contradicts itself on supply.
    pub fn is_supply_mismatch(&self) -> bool {
        matches!(self, Self::SupplyMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_names_both_supplies() {
        let err = GenesisError::SupplyMismatch {
            declared: "200atom".parse().unwrap(),
            computed: "150atom".parse().unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "genesis supply is incorrect, expected 200atom, got 150atom"
        );
        assert!(err.is_supply_mismatch());
    }
}
