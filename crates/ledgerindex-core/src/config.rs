//! Indexer configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::IndexerError;
use crate::event::Domain;

/// Name of the directory under the node home that holds every domain stream.
pub const INDEXER_DIR: &str = "indexer";

/// Configuration for the indexer's output streams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexerConfig {
    /// Node home directory; streams live under `<home_dir>/indexer/`.
    pub home_dir: PathBuf,
    /// Extension of every stream file (`bank.txt`, `staking.txt`, ...).
    #[serde(default = "default_file_extension")]
    pub file_extension: String,
    /// `fsync` after every appended record.
    #[serde(default)]
    pub sync_on_emit: bool,
}

fn default_file_extension() -> String {
    "txt".into()
}

impl IndexerConfig {
    pub fn new(home_dir: impl Into<PathBuf>) -> Self {
        Self {
            home_dir: home_dir.into(),
            file_extension: default_file_extension(),
            sync_on_emit: false,
        }
    }

    pub fn sync_on_emit(mut self, sync: bool) -> Self {
        self.sync_on_emit = sync;
        self
    }

    /// Parse and validate a JSON config document.
    pub fn from_json_str(json: &str) -> Result<Self, IndexerError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| IndexerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, IndexerError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| IndexerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), IndexerError> {
        if self.home_dir.as_os_str().is_empty() {
            return Err(IndexerError::Config("home_dir must not be empty".into()));
        }
        if self.file_extension.is_empty()
            || self
                .file_extension
                .chars()
                .any(|c| c == '.' || std::path::is_separator(c))
        {
            return Err(IndexerError::Config(format!(
                "invalid file_extension '{}'",
                self.file_extension
            )));
        }
        Ok(())
    }

    /// `<home_dir>/indexer`
    pub fn output_dir(&self) -> PathBuf {
        self.home_dir.join(INDEXER_DIR)
    }

    /// File name of a domain stream, e.g. `bank.txt`.
    pub fn file_name(&self, domain: Domain) -> String {
        format!("{}.{}", domain.as_str(), self.file_extension)
    }

    /// Full path of a domain stream.
    pub fn output_path(&self, domain: Domain) -> PathBuf {
        self.output_dir().join(self.file_name(domain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_from_json() {
        let config = IndexerConfig::from_json_str(r#"{"home_dir": "/var/node"}"#).unwrap();
        assert_eq!(config.file_extension, "txt");
        assert!(!config.sync_on_emit);
        assert_eq!(
            config.output_path(Domain::Slashing),
            PathBuf::from("/var/node/indexer/slashing.txt")
        );
    }

    #[test]
    fn rejects_bad_extension() {
        let err = IndexerConfig::from_json_str(r#"{"home_dir": "/n", "file_extension": "a/b"}"#)
            .unwrap_err();
        assert!(matches!(err, IndexerError::Config(_)));
    }

    #[test]
    fn rejects_missing_home() {
        assert!(IndexerConfig::from_json_str("{}").is_err());
        assert!(IndexerConfig::new("").validate().is_err());
    }
}
