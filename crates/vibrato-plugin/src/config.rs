//! Processor configuration loaded from TOML.
//!
//! ```toml
//! channels = 2
//! not_prepared = "silence"
//! rate = 5.5
//! depth = 0.02
//! ```
//!
//! Every key is optional.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VibratoError};
use crate::processor::NotPreparedPolicy;
use crate::shared::{Param, VibratoShared};

/// Most channels a processor may be configured for.
pub const MAX_CHANNELS: usize = 32;

/// Construction-time settings for a [`VibratoProcessor`](crate::VibratoProcessor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessorConfig {
    /// Number of channels to allocate delay lines for.
    pub channels: usize,
    /// Output before the processor is prepared.
    pub not_prepared: NotPreparedPolicy,
    /// Initial LFO rate in Hz, clamped when applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f32>,
    /// Initial sweep width in seconds, clamped when applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<f32>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            channels: 2,
            not_prepared: NotPreparedPolicy::default(),
            rate: None,
            depth: None,
        }
    }
}

impl ProcessorConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| VibratoError::read_config(path, e))?;
        let config = Self::from_toml(&contents)?;
        tracing::debug!(path = %path.display(), ?config, "config loaded");
        Ok(config)
    }

    /// Check that the values can be used to build a processor.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_CHANNELS).contains(&self.channels) {
            return Err(VibratoError::InvalidConfig(format!(
                "channels must be between 1 and {MAX_CHANNELS}, got {}",
                self.channels
            )));
        }
        for (name, value) in [("rate", self.rate), ("depth", self.depth)] {
            if let Some(v) = value
                && !v.is_finite()
            {
                return Err(VibratoError::InvalidConfig(format!(
                    "{name} must be a finite number, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Write configured initial values (if any) into `shared`.
    pub(crate) fn apply_initial_params(&self, shared: &VibratoShared) {
        if let Some(rate) = self.rate {
            shared.set(Param::Rate, rate);
        }
        if let Some(depth) = self.depth {
            shared.set(Param::Depth, depth);
        }
    }
}
