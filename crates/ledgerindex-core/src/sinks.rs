//! The full set of domain sinks, opened together at startup.

use std::sync::Arc;

use tracing::warn;

use crate::config::IndexerConfig;
use crate::error::IndexerError;
use crate::schema::{BankEvent, DelegationEvent, DistributionEvent, SlashEvent};
use crate::sink::EventSink;

/// One sink per domain. Clone the `Arc`s into the emitters that need them.
#[derive(Debug, Clone)]
pub struct IndexerSinks {
    pub bank: Arc<EventSink<BankEvent>>,
    pub distribution: Arc<EventSink<DistributionEvent>>,
    pub staking: Arc<EventSink<DelegationEvent>>,
    pub slashing: Arc<EventSink<SlashEvent>>,
}

impl IndexerSinks {
    /// Open every domain stream. Any failure is fatal to startup.
    pub fn open(config: &IndexerConfig) -> Result<Self, IndexerError> {
        Ok(Self {
            bank: Arc::new(EventSink::open(config)?),
            distribution: Arc::new(EventSink::open(config)?),
            staking: Arc::new(EventSink::open(config)?),
            slashing: Arc::new(EventSink::open(config)?),
        })
    }

    /// Close every stream, attempting all of them and returning the first error.
    pub fn close(&self) -> Result<(), IndexerError> {
        let results = [
            self.bank.close(),
            self.distribution.close(),
            self.staking.close(),
            self.slashing.close(),
        ];
        let mut first = None;
        for result in results {
            if let Err(e) = result {
                warn!(error = %e, "failed to close event stream");
                first.get_or_insert(e);
            }
        }
        first.map_or(Ok(()), Err)
    }
}
