//! Pipeline configuration

use crate::error::{ExtractError, Result};
use crate::extractor::GreetingMarker;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Search filter for confirmation mail from the store's auto-confirm sender
pub const DEFAULT_QUERY: &str = "from:auto-confirm@amazon.com after:2015/12/11 before:2016/2/12";

/// What the pipeline does when one message cannot be processed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop the run and return the failure
    AbortOnFirstFailure,
    /// Record the failure in the report and move on to the next message
    #[default]
    SkipAndContinue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Search query handed verbatim to the mail service
    pub query: String,

    pub policy: FailurePolicy,

    /// Element preceding the order links in the rendered email
    pub marker: GreetingMarker,

    /// Messages processed concurrently; 1 keeps the run on the calling thread
    pub workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            query: DEFAULT_QUERY.to_string(),
            policy: FailurePolicy::default(),
            marker: GreetingMarker::default(),
            workers: 1,
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| ExtractError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .map_err(|e| ExtractError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&s)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(ExtractError::Config("workers must be at least 1".into()));
        }
        self.marker.sibling_anchor_selector()?;
        Ok(())
    }
}
