//! Vibrato Core - DSP primitives for pitch-modulation effects
//!
//! This crate provides the building blocks the vibrato engine is assembled
//! from, designed for real-time audio processing with zero allocation in the
//! audio path.
//!
//! # Core Abstractions
//!
//! ## Delay Lines
//!
//! - [`DelayLine`] - Fixed-capacity circular history with a safety margin
//!   behind the write head and linear fractional reads
//!
//! ## Modulation
//!
//! - [`Lfo`] - Unipolar sine phase accumulator
//!
//! ## Parameters
//!
//! - [`ParameterInfo`] - Index-based parameter introspection
//! - [`ParamDescriptor`] - Range, default, unit and stable ID of a parameter
//!
//! ## Utilities
//!
//! - Math functions: [`flush_denormal`], [`lerp`], [`wrap_phase`]
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (it needs `alloc` for delay storage).
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! vibrato-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use vibrato_core::{DelayLine, Lfo};
//!
//! let sample_rate = 48000.0;
//! let mut delay = DelayLine::from_time(sample_rate, 0.05);
//! let mut lfo = Lfo::new();
//! let phase_inc = 5.0 / sample_rate;
//!
//! let mut block = [0.25f32; 64];
//! for sample in block.iter_mut() {
//!     let offset = 0.01 * sample_rate * lfo.advance(phase_inc);
//!     *sample = delay.read_write(*sample, offset);
//! }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: Storage is sized once, never on the sample path
//! - **No dependencies on std**: `libm` for math
//! - **Plain indices**: circular buffers are integer-indexed, no pointer math

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod delay;
pub mod lfo;
pub mod math;
pub mod param_info;

// Re-export main types at crate root
pub use delay::{DelayLine, INTERPOLATION_MARGIN};
pub use lfo::{Lfo, phase_increment};
pub use math::{flush_denormal, lerp, wrap_phase};
pub use param_info::{DISPLAY_DECIMALS, ParamDescriptor, ParamId, ParamUnit, ParameterInfo};
