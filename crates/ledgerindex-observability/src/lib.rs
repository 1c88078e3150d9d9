//! ledgerindex-observability: tracing subscriber setup.
//!
//! Every sink logs through `tracing`; the host process calls [`init_tracing`]
//! once at startup to decide where those lines go and in which format.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, LogConfig};
