//! Error types for the control-rate and persistence paths.
//!
//! The audio path never returns these: it falls back to pass-through,
//! silence or clamping instead.

use std::path::PathBuf;
use thiserror::Error;

/// Errors reported to the host, control surface or persistence layer.
#[derive(Debug, Error)]
pub enum VibratoError {
    /// Sample rate outside the supported range, or NaN
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(f64),

    /// Parameter name did not match any parameter
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    /// State blob is not valid JSON
    #[error("failed to decode state: {0}")]
    Deserialize(#[from] serde_json::Error),

    /// State blob is JSON but not in the expected shape
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Failed to read a configuration file
    #[error("failed to read config '{path}': {source}")]
    ReadConfig {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration parsed but holds unusable values
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl VibratoError {
    /// Create a config read error.
    pub fn read_config(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        VibratoError::ReadConfig {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for vibrato-plugin operations.
pub type Result<T> = std::result::Result<T, VibratoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        assert_eq!(
            VibratoError::InvalidSampleRate(-1.0).to_string(),
            "invalid sample rate: -1"
        );
        assert_eq!(
            VibratoError::UnknownParameter("speed".into()).to_string(),
            "unknown parameter: speed"
        );
    }

    #[test]
    fn read_config_keeps_path() {
        let err = VibratoError::read_config(
            "/nope/vibrato.toml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.to_string().contains("/nope/vibrato.toml"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
