//! Domains, the common record header, and the envelope every sink writes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::context::ExecutionContext;

// ─── Domain ───────────────────────────────────────────────────────────────────

/// One output stream per domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Balances and supply.
    Bank,
    /// Reward and commission withdrawals.
    Distribution,
    /// Delegation changes.
    Staking,
    /// Validator slashes.
    Slashing,
}

impl Domain {
    pub const ALL: [Domain; 4] = [
        Domain::Bank,
        Domain::Distribution,
        Domain::Staking,
        Domain::Slashing,
    ];

    /// Stream file stem.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bank => "bank",
            Self::Distribution => "distribution",
            Self::Staking => "staking",
            Self::Slashing => "slashing",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Headers ──────────────────────────────────────────────────────────────────

/// Height and time of the block a record was emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockStamp {
    pub height: i64,
    pub time_unix_micro: i64,
}

impl BlockStamp {
    pub fn from_context<C: ExecutionContext + ?Sized>(ctx: &C) -> Self {
        Self {
            height: ctx.block_height(),
            time_unix_micro: ctx.block_time_unix_micro(),
        }
    }
}

/// Common header of bank, distribution and staking records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventHeader {
    pub block_height: i64,
    pub block_time_unix_micro: i64,
}

impl From<BlockStamp> for EventHeader {
    fn from(stamp: BlockStamp) -> Self {
        Self {
            block_height: stamp.height,
            block_time_unix_micro: stamp.time_unix_micro,
        }
    }
}

/// Header of slashing records.
///
/// Named `registered*` so the block the slash was recorded in can never be
/// confused with the payload's `infractionBlockHeight`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredHeader {
    pub registered_block_height: i64,
    pub registered_block_time_unix_micro: i64,
}

impl From<BlockStamp> for RegisteredHeader {
    fn from(stamp: BlockStamp) -> Self {
        Self {
            registered_block_height: stamp.height,
            registered_block_time_unix_micro: stamp.time_unix_micro,
        }
    }
}

// ─── DomainEvent / Envelope ───────────────────────────────────────────────────

/// A payload schema bound to one domain stream.
///
/// Payloads carry their own typed `action` field, serialized right after the
/// header fields.
pub trait DomainEvent: Serialize + fmt::Debug {
    /// Stream this payload is written to.
    const DOMAIN: Domain;

    /// Header flattened in front of the payload.
    type Header: Serialize + From<BlockStamp>;

    /// Action tag, e.g. `"genesis_balance"` or `"slash"`.
    fn action(&self) -> &'static str;
}

/// One record: header fields followed by payload fields, in a flat JSON object.
///
/// `P` is the payload itself when decoding and a reference to it when a sink
/// writes a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<H, P> {
    #[serde(flatten)]
    pub header: H,
    #[serde(flatten)]
    pub event: P,
}

/// Stamp `event` with the context's block height and time.
pub fn stamp<'a, C, E>(ctx: &C, event: &'a E) -> Envelope<E::Header, &'a E>
where
    C: ExecutionContext + ?Sized,
    E: DomainEvent,
{
    Envelope {
        header: E::Header::from(BlockStamp::from_context(ctx)),
        event,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_names() {
        let names: Vec<_> = Domain::ALL.iter().map(|d| d.as_str()).collect();
        assert_eq!(names, ["bank", "distribution", "staking", "slashing"]);
        assert_eq!(serde_json::to_string(&Domain::Slashing).unwrap(), r#""slashing""#);
    }

    #[test]
    fn headers_use_distinct_field_names() {
        let stamp = BlockStamp {
            height: 500,
            time_unix_micro: 42,
        };
        let common = serde_json::to_value(EventHeader::from(stamp)).unwrap();
        assert_eq!(common["blockHeight"], 500);
        assert_eq!(common["blockTimeUnixMicro"], 42);

        let registered = serde_json::to_value(RegisteredHeader::from(stamp)).unwrap();
        assert_eq!(registered["registeredBlockHeight"], 500);
        assert!(registered.get("blockHeight").is_none());
    }
}
