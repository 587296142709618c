//! Configuration loading and representation.
//!
//! Values come from environment variables; anything unset falls back to the
//! defaults below.

use core::str::FromStr;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

use lodgebase_observability::LogFormat;

pub const DELETE_POLICY_VAR: &str = "LODGEBASE_DELETE_POLICY";
pub const LOG_FORMAT_VAR: &str = "LODGEBASE_LOG_FORMAT";

/// What deleting a user, place or amenity does to the entities that reference it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletePolicy {
    /// Refuse the deletion with `Conflict` while dependents exist.
    #[default]
    Restrict,
    /// Delete dependent reviews and places first, detach amenities.
    Cascade,
}

impl FromStr for DeletePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "restrict" => Ok(DeletePolicy::Restrict),
            "cascade" => Ok(DeletePolicy::Cascade),
            other => bail!("unknown delete policy `{other}` (expected `restrict` or `cascade`)"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LodgebaseConfig {
    pub delete_policy: DeletePolicy,
    pub log_format: LogFormat,
}

impl LodgebaseConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup` (injectable for tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(DELETE_POLICY_VAR) {
            config.delete_policy = raw
                .parse()
                .with_context(|| format!("invalid {DELETE_POLICY_VAR}"))?;
        }
        if let Some(raw) = lookup(LOG_FORMAT_VAR) {
            config.log_format = raw
                .parse()
                .with_context(|| format!("invalid {LOG_FORMAT_VAR}"))?;
        }

        Ok(config)
    }
}
