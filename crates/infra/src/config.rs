//! Configuration loading and representation.
//!
//! Read from environment variables:
//!
//! - `LENDBOOK_DATA_DIR`: directory holding the store files (default `.lendbook`)
//! - `LENDBOOK_STORAGE_KEY`: key the ledger is stored under (default `loans`)
//! - `LENDBOOK_QUOTA_BYTES`: optional byte limit for the in-memory store

use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_DATA_DIR: &str = ".lendbook";
pub const DEFAULT_STORAGE_KEY: &str = "loans";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub data_dir: PathBuf,
    pub storage_key: String,
    pub quota_bytes: Option<usize>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            quota_bytes: None,
        }
    }
}

impl LedgerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup (tests pass a map here).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let data_dir = lookup("LENDBOOK_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let storage_key = match lookup("LENDBOOK_STORAGE_KEY") {
            Some(key) if key.trim().is_empty() => {
                return Err(ConfigError::Empty("LENDBOOK_STORAGE_KEY"));
            }
            Some(key) => key.trim().to_string(),
            None => defaults.storage_key,
        };

        let quota_bytes = lookup("LENDBOOK_QUOTA_BYTES")
            .map(|raw| {
                raw.trim()
                    .parse::<usize>()
                    .map_err(|_| ConfigError::InvalidNumber {
                        var: "LENDBOOK_QUOTA_BYTES",
                        value: raw.clone(),
                    })
            })
            .transpose()?;

        Ok(Self {
            data_dir,
            storage_key,
            quota_bytes,
        })
    }
}
