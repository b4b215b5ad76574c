//! Vibrato Effects - the delay-line vibrato engine
//!
//! This crate assembles the primitives from vibrato-core into the per-block
//! processing engine:
//!
//! - [`Vibrato`] - Multichannel vibrato with a shared LFO trajectory and
//!   independent per-channel delay history
//! - [`VibratoParams`] - The rate/depth snapshot the engine runs a block with
//!
//! ## Example
//!
//! ```rust
//! use vibrato_effects::{Vibrato, VibratoParams};
//!
//! let mut vibrato = Vibrato::with_sample_rate(2, 48000.0);
//! vibrato.set_params(VibratoParams::new(5.0, 0.02));
//!
//! let mut left = vec![0.1f32; 256];
//! let mut right = vec![-0.1f32; 256];
//! vibrato.process_block(&mut [&mut left[..], &mut right[..]], 2);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod vibrato;

// Re-export main types at crate root
pub use vibrato::{
    DEPTH_DEFAULT_S, DEPTH_MAX_S, DEPTH_MIN_S, DEPTH_PARAM_ID, PARAM_DEPTH, PARAM_RATE,
    RATE_DEFAULT_HZ, RATE_MAX_HZ, RATE_MIN_HZ, RATE_PARAM_ID, Vibrato, VibratoParams,
    depth_descriptor, rate_descriptor,
};
