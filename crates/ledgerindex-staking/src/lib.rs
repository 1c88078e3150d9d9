//! ledgerindex-staking: delegation, slashing and reward-withdrawal emitters.
//!
//! [`IndexedStaking`] writes `delegate`/`undelegate` records to the `staking`
//! stream and `slash` records to the `slashing` stream. [`IndexedDistribution`]
//! writes reward and commission withdrawals to the `distribution` stream.

pub mod distribution;
pub mod error;
pub mod keeper;
pub mod memory;
pub mod staking;
pub mod types;

pub use distribution::IndexedDistribution;
pub use error::{DistributionError, StakingError};
pub use keeper::{DistributionKeeper, StakingKeeper};
pub use memory::{MemoryDistributionKeeper, MemoryStakingKeeper};
pub use staking::IndexedStaking;
pub use types::{Delegation, StakingParams, Validator};
