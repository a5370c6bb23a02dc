use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::Result;

/// What to do when a declared fallback method is not registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFallbackPolicy {
    /// Fail resolution with `NoSuchFallbackMethod`.
    #[default]
    Fail,
    /// Resolve the command without a fallback and log a warning.
    Ignore,
}

/// Resolver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Reject fallback chains that revisit a command key
    pub detect_cyclic_fallbacks: bool,

    /// Handling of unregistered fallback methods
    pub missing_fallback: MissingFallbackPolicy,
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self {
            detect_cyclic_fallbacks: true,
            missing_fallback: MissingFallbackPolicy::Fail,
        }
    }

    /// Enable or disable the fallback cycle check
    pub fn detect_cyclic_fallbacks(mut self, enabled: bool) -> Self {
        self.detect_cyclic_fallbacks = enabled;
        self
    }

    /// Set the missing fallback policy
    pub fn missing_fallback(mut self, policy: MissingFallbackPolicy) -> Self {
        self.missing_fallback = policy;
        self
    }

    /// Parse from JSON; absent fields keep their defaults.
    ///
    /// ```
    /// # use circuitcmd::{MissingFallbackPolicy, ResolverConfig};
    /// let config = ResolverConfig::from_json_str(r#"{"missing_fallback": "ignore"}"#).unwrap();
    /// assert_eq!(config.missing_fallback, MissingFallbackPolicy::Ignore);
    /// assert!(config.detect_cyclic_fallbacks);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::new()
    }
}
