//! Error types for the event sinks and the coin primitives.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the indexer's own output streams.
///
/// Ledger mutation failures never show up here; they belong to the keepers.
#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("failed to open output file {}: {source}", .path.display())]
    OpenStream {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to append to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("stream {} is closed", .path.display())]
    Closed { path: PathBuf },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IndexerError {
    /// Returns `true` for errors that must abort startup (the stream cannot be used at all).
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::OpenStream { .. } | Self::Config(_))
    }
}

/// Errors from coin, coin-set and decimal arithmetic or parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoinError {
    #[error("invalid denom: '{0}'")]
    InvalidDenom(String),

    #[error("invalid amount '{amount}' for denom {denom}")]
    InvalidAmount { denom: String, amount: String },

    #[error("invalid coin expression: '{0}'")]
    Parse(String),

    #[error("invalid decimal: '{0}'")]
    InvalidDecimal(String),

    #[error("duplicate denom: {0}")]
    DuplicateDenom(String),

    #[error("zero amount for denom {0}")]
    ZeroAmount(String),

    #[error("arithmetic overflow on {denom}")]
    Overflow { denom: String },

    #[error("insufficient {denom}: have {available}, need {required}")]
    Insufficient {
        denom: String,
        available: u128,
        required: u128,
    },
}
