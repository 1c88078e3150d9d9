//! Validator slash records (`slashing` stream).

use serde::{Deserialize, Serialize};

use crate::coin::{Coin, Dec};
use crate::event::{Domain, DomainEvent, RegisteredHeader};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlashingAction {
    Slash,
}

impl SlashingAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slash => "slash",
        }
    }
}

/// Kind of offence behind a slash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Infraction {
    #[default]
    Unspecified,
    DoubleSign,
    Downtime,
}

/// A slash. The header records the block it was registered in; the offence
/// height lives in `infraction_block_height`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlashEvent {
    pub action: SlashingAction,
    pub infraction_block_height: i64,
    pub infraction: Infraction,
    pub validator_operator: String,
    /// Fraction of the validator's stake slashed.
    pub slash_factor: Dec,
    pub amount_slashed: Coin,
}

impl SlashEvent {
    pub fn new(
        infraction_block_height: i64,
        infraction: Infraction,
        validator_operator: impl Into<String>,
        slash_factor: Dec,
        amount_slashed: Coin,
    ) -> Self {
        Self {
            action: SlashingAction::Slash,
            infraction_block_height,
            infraction,
            validator_operator: validator_operator.into(),
            slash_factor,
            amount_slashed,
        }
    }
}

impl DomainEvent for SlashEvent {
    const DOMAIN: Domain = Domain::Slashing;
    type Header = RegisteredHeader;

    fn action(&self) -> &'static str {
        self.action.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::BlockContext;
    use crate::event::stamp;
    use chrono::{TimeZone, Utc};

    #[test]
    fn registered_and_infraction_heights_are_distinct_fields() {
        let ctx = BlockContext::new(500, Utc.timestamp_opt(1_700_000_000, 0).unwrap());
        let ev = SlashEvent::new(
            480,
            Infraction::DoubleSign,
            "valoper1",
            "0.05".parse().unwrap(),
            Coin::new("stake", 50),
        );
        let v = serde_json::to_value(stamp(&ctx, &ev)).unwrap();
        assert_eq!(v["registeredBlockHeight"], 500);
        assert_eq!(v["infractionBlockHeight"], 480);
        assert_eq!(v["registeredBlockTimeUnixMicro"], 1_700_000_000_000_000i64);
        assert_eq!(v["slashFactor"], "0.050000000000000000");
        assert_eq!(v["infraction"], "double_sign");
        assert!(v.get("blockHeight").is_none());
    }
}
