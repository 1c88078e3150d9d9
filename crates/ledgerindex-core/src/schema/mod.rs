//! Per-domain payload schemas.
//!
//! Field names are part of the consumer contract: add fields, never rename or
//! remove them.

pub mod bank;
pub mod distribution;
pub mod slashing;
pub mod staking;

pub use bank::{BankAction, BankEntity, BankEvent, Party};
pub use distribution::{DistributionAction, DistributionEvent};
pub use slashing::{Infraction, SlashEvent, SlashingAction};
pub use staking::{DelegationEvent, DelegatorSnapshot, StakingAction, ValidatorSnapshot};

/// `Option<String>` on the wire as a plain string, `""` meaning `None`.
pub(crate) mod empty_as_none {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(value.as_deref().unwrap_or_default())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let raw = String::deserialize(d)?;
        Ok((!raw.is_empty()).then_some(raw))
    }
}
