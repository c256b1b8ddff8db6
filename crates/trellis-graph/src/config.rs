//! Analysis configuration.
//!
//! Loaded from JSON. Every field has a default, so `{}` is a valid config:
//!
//! ```json
//! {
//!   "page_rank": { "damping_factor": 0.85, "iterations": 100 },
//!   "community": { "max_rounds": 100 }
//! }
//! ```

use crate::community::CommunityConfig;
use crate::error::ConfigError;
use crate::ranking::PageRankConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Tunables for the iterative analyses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub page_rank: PageRankConfig,
    pub community: CommunityConfig,
}

impl AnalysisConfig {
    /// Parses and validates a JSON config.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.page_rank.validate()?;
        Ok(config)
    }

    /// Reads a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        debug!(path = %path.display(), "loaded analysis config");
        Ok(config)
    }
}
