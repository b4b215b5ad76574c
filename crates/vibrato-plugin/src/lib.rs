//! Host-facing processor for the vibrato engine.
//!
//! This crate is the boundary a plugin wrapper (CLAP, VST3, a standalone
//! host) talks to. It adds to the engine in `vibrato-effects`:
//!
//! - [`VibratoShared`] - Lock-free parameter store written by control
//!   threads and read by the audio thread at block boundaries
//! - [`VibratoProcessor`] - Lifecycle controller: prepare, process, reset,
//!   release, and the not-prepared policy
//! - [`state`] - JSON persistence of parameter values by stable ID
//! - [`ProcessorConfig`] - TOML configuration
//! - [`VibratoError`] - Control-rate and persistence errors
//!
//! # Threading
//!
//! | Thread | Calls |
//! |--------|-------|
//! | Control (GUI, automation) | `VibratoShared::set`, `set_params`, `set_by_name` |
//! | Main (host lifecycle) | `prepare`, `release`, `serialize_state`, `deserialize_state` |
//! | Audio | `process_block`, `reset` |
//!
//! The audio-thread calls never lock, allocate or return errors.
//!
//! # Example
//!
//! ```rust
//! use vibrato_plugin::{ProcessorConfig, VibratoProcessor, VibratoShared};
//!
//! let shared = VibratoShared::new(None);
//! let mut processor = VibratoProcessor::new(shared.clone(), &ProcessorConfig::default());
//! processor.prepare(44100.0, 256).unwrap();
//!
//! // From any thread:
//! shared.set_by_name("depth", 0.02).unwrap();
//!
//! let mut left = vec![0.0f32; 256];
//! let mut right = vec![0.0f32; 256];
//! processor.process_block(&mut [&mut left[..], &mut right[..]], 2);
//!
//! let blob = processor.serialize_state().unwrap();
//! processor.deserialize_state(&blob).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod processor;
pub mod shared;
pub mod state;

pub use config::{MAX_CHANNELS, ProcessorConfig};
pub use error::{Result, VibratoError};
pub use processor::{
    Lifecycle, MAX_SAMPLE_RATE, MIN_SAMPLE_RATE, NotPreparedPolicy, ProcessStatus, VibratoProcessor,
};
pub use shared::{Param, VibratoShared};
pub use vibrato_effects::VibratoParams;
