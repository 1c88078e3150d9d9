//! Errors raised by the staking and distribution keepers and emitters.

use ledgerindex_core::{CoinError, Dec};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StakingError {
    #[error("invalid address: '{0}'")]
    InvalidAddress(String),

    #[error("validator {0} does not exist")]
    ValidatorNotFound(String),

    #[error("validator {0} already exists")]
    ValidatorExists(String),

    #[error("no delegation from {delegator} to {validator}")]
    DelegationNotFound { delegator: String, validator: String },

    #[error("invalid bond denom: expected {expected}, got {got}")]
    InvalidBondDenom { expected: String, got: String },

    #[error("amount must be positive")]
    ZeroAmount,

    #[error("insufficient shares: have {available}, requested {requested}")]
    InsufficientShares { available: Dec, requested: Dec },

    #[error(
        "impossible to slash for infraction at height {infraction_height}, \
         current height is {current_height}"
    )]
    FutureInfraction {
        infraction_height: i64,
        current_height: i64,
    },

    #[error("slash factor {0} is outside [0, 1]")]
    InvalidSlashFactor(Dec),

    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),

    #[error(transparent)]
    Coin(#[from] CoinError),
}

impl StakingError {
    /// Errors raised before the keeper was touched.
    pub fn is_rejected_upfront(&self) -> bool {
        matches!(
            self,
            Self::FutureInfraction { .. } | Self::InvalidSlashFactor(_) | Self::ZeroAmount
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DistributionError {
    #[error("invalid address: '{0}'")]
    InvalidAddress(String),

    #[error("no delegation from {delegator} to {validator}")]
    NoDelegation { delegator: String, validator: String },

    #[error("no validator commission to withdraw for {0}")]
    NoValidatorCommission(String),

    #[error(transparent)]
    Coin(#[from] CoinError),
}
