//! Bank state types shared by keepers and the genesis document.

use std::collections::HashSet;
use std::fmt;

use ledgerindex_core::coin::validate_denom;
use ledgerindex_core::Coins;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Page size used when a request leaves `limit` at zero.
pub const DEFAULT_PAGE_LIMIT: u64 = 100;
/// Largest page a keeper will return.
pub const MAX_PAGE_LIMIT: u64 = 1_000;

// ─── Balances ─────────────────────────────────────────────────────────────────

/// Coins held by one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub address: String,
    pub coins: Coins,
}

impl Balance {
    pub fn new(address: impl Into<String>, coins: Coins) -> Self {
        Self {
            address: address.into(),
            coins,
        }
    }
}

// ─── Params ───────────────────────────────────────────────────────────────────

/// Per-denom override of [`BankParams::default_send_enabled`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendEnabled {
    pub denom: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankParams {
    #[serde(default)]
    pub send_enabled: Vec<SendEnabled>,
    #[serde(default = "bool_true")]
    pub default_send_enabled: bool,
}

fn bool_true() -> bool {
    true
}

impl Default for BankParams {
    fn default() -> Self {
        Self {
            send_enabled: vec![],
            default_send_enabled: true,
        }
    }
}

impl BankParams {
    pub fn is_send_enabled(&self, denom: &str) -> bool {
        self.send_enabled
            .iter()
            .find(|s| s.denom == denom)
            .map(|s| s.enabled)
            .unwrap_or(self.default_send_enabled)
    }

    pub fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for entry in &self.send_enabled {
            validate_denom(&entry.denom).map_err(|e| e.to_string())?;
            if !seen.insert(entry.denom.as_str()) {
                return Err(format!("duplicate send_enabled entry for {}", entry.denom));
            }
        }
        Ok(())
    }
}

// ─── Denom metadata ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenomUnit {
    pub denom: String,
    /// Power of ten relative to the base unit.
    pub exponent: u32,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Display metadata for a denom. Not part of the supply invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenomMetadata {
    #[serde(default)]
    pub description: String,
    pub denom_units: Vec<DenomUnit>,
    pub base: String,
    pub display: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
}

impl DenomMetadata {
    /// The first unit must be the base denom at exponent 0, exponents must
    /// increase, and `display` must be one of the units.
    pub fn validate(&self) -> Result<(), String> {
        validate_denom(&self.base).map_err(|e| e.to_string())?;
        validate_denom(&self.display).map_err(|e| e.to_string())?;

        let first = self
            .denom_units
            .first()
            .ok_or_else(|| "no denom units".to_string())?;
        if first.denom != self.base || first.exponent != 0 {
            return Err(format!(
                "first denom unit must be {} with exponent 0",
                self.base
            ));
        }
        for pair in self.denom_units.windows(2) {
            if pair[1].exponent <= pair[0].exponent {
                return Err(format!(
                    "denom units {} and {} are not in ascending exponent order",
                    pair[0].denom, pair[1].denom
                ));
            }
        }
        if !self.denom_units.iter().any(|u| u.denom == self.display) {
            return Err(format!("display denom {} has no unit", self.display));
        }
        Ok(())
    }
}

// ─── Pagination ───────────────────────────────────────────────────────────────

/// Key-based page request: start at `key` (inclusive), return up to `limit` items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub key: Option<String>,
    pub limit: u64,
}

impl PageRequest {
    pub fn new(limit: u64) -> Self {
        Self { key: None, limit }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// `limit` with zero mapped to the default and clamped to the maximum.
    pub fn effective_limit(&self) -> u64 {
        match self.limit {
            0 => DEFAULT_PAGE_LIMIT,
            n => n.min(MAX_PAGE_LIMIT),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResponse {
    /// Key of the first item of the next page; `None` on the last page.
    pub next_key: Option<String>,
    /// Total number of items across all pages.
    pub total: u64,
}

// ─── Module accounts ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModulePermission {
    Minter,
    Burner,
}

impl fmt::Display for ModulePermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minter => write!(f, "minter"),
            Self::Burner => write!(f, "burner"),
        }
    }
}

/// Address of a module account: first 20 bytes of `sha256(name)`, hex-encoded.
pub fn module_address(name: &str) -> String {
    let hash = Sha256::digest(name.as_bytes());
    hex::encode(&hash[..20])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom_metadata() -> DenomMetadata {
        DenomMetadata {
            description: "The native staking token".into(),
            denom_units: vec![
                DenomUnit {
                    denom: "uatom".into(),
                    exponent: 0,
                    aliases: vec!["microatom".into()],
                },
                DenomUnit {
                    denom: "atom".into(),
                    exponent: 6,
                    aliases: vec![],
                },
            ],
            base: "uatom".into(),
            display: "atom".into(),
            name: "Atom".into(),
            symbol: "ATOM".into(),
        }
    }

    #[test]
    fn metadata_validation() {
        assert!(atom_metadata().validate().is_ok());

        let mut bad = atom_metadata();
        bad.display = "matom".into();
        assert!(bad.validate().is_err());

        let mut bad = atom_metadata();
        bad.denom_units.swap(0, 1);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn send_enabled_override() {
        let params = BankParams {
            send_enabled: vec![SendEnabled {
                denom: "locked".into(),
                enabled: false,
            }],
            default_send_enabled: true,
        };
        assert!(!params.is_send_enabled("locked"));
        assert!(params.is_send_enabled("atom"));
    }

    #[test]
    fn page_limit_is_bounded() {
        assert_eq!(PageRequest::new(0).effective_limit(), DEFAULT_PAGE_LIMIT);
        assert_eq!(PageRequest::new(u64::MAX).effective_limit(), MAX_PAGE_LIMIT);
        assert_eq!(PageRequest::new(5).effective_limit(), 5);
    }

    #[test]
    fn module_address_is_stable_hex() {
        let addr = module_address("mint");
        assert_eq!(addr.len(), 40);
        assert_eq!(addr, module_address("mint"));
        assert_ne!(addr, module_address("distribution"));
    }
}
