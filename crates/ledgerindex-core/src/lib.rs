//! ledgerindex-core: append-only event streams for committed ledger state changes.
//!
//! # Architecture
//!
//! ```text
//! ledger operation (keeper mutation)
//!      └── domain emitter (reads back post-mutation values)
//!              └── EventSink<E>  ── ExecutionContext gate (simulated → skip)
//!                      └── <home>/indexer/<domain>.<ext>  (one JSON record per line)
//! ```
//!
//! One [`EventSink`] exists per [`Domain`]; [`IndexerSinks`] opens all of them
//! at startup and closes them at shutdown.

pub mod coin;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod schema;
pub mod sink;
pub mod sinks;

pub use coin::{Amount, Coin, CoinReading, Coins, Dec};
pub use config::IndexerConfig;
pub use context::{BlockContext, ExecMode, ExecutionContext};
pub use error::{CoinError, IndexerError};
pub use event::{stamp, BlockStamp, Domain, DomainEvent, Envelope, EventHeader, RegisteredHeader};
pub use schema::{
    BankAction, BankEntity, BankEvent, DelegationEvent, DelegatorSnapshot, DistributionAction,
    DistributionEvent, Infraction, Party, SlashEvent, SlashingAction, StakingAction,
    ValidatorSnapshot,
};
pub use sink::{EmitOutcome, EventSink, SinkStats};
pub use sinks::IndexerSinks;
