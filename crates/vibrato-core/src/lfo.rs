//! Low Frequency Oscillator for delay-time modulation.
//!
//! A unipolar sine phase accumulator. The vibrato engine turns its output
//! into a read offset into the delay line, so the waveform is scaled to
//! `[0.0, 1.0]`: at 0 the read tap sits at the minimum delay, at 1 it sits
//! at the full modulation width.

use core::f32::consts::TAU;
use libm::sinf;

use crate::math::wrap_phase;

/// Phase increment per sample for `freq_hz` at the given inverse sample rate.
///
/// The engine keeps `1 / sample_rate` around from prepare time, so the
/// per-block increment is a single multiply.
#[inline]
pub fn phase_increment(freq_hz: f32, inverse_sample_rate: f32) -> f32 {
    freq_hz * inverse_sample_rate
}

/// Low Frequency Oscillator generating `0.5 + 0.5 * sin(2π·phase)`.
///
/// The oscillator does not store its own rate: the increment is supplied on
/// every [`advance`](Self::advance) call. This lets the engine hold the rate
/// in its per-block parameter snapshot and copy the (tiny, `Copy`) oscillator
/// state into the channel loop.
///
/// # Example
///
/// ```rust
/// use vibrato_core::Lfo;
///
/// let mut lfo = Lfo::new();
/// let inc = 2.0 / 44100.0; // 2 Hz
///
/// // Phase 0 sits at the middle of the range.
/// assert!((lfo.advance(inc) - 0.5).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Lfo {
    /// Current phase position [0.0, 1.0)
    phase: f32,
}

impl Lfo {
    /// Create an oscillator at phase 0.
    pub const fn new() -> Self {
        Self { phase: 0.0 }
    }

    /// Reset phase to 0
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Set phase. Values outside `[0, 1)` are wrapped.
    pub fn set_phase(&mut self, phase: f32) {
        self.phase = wrap_phase(phase);
    }

    /// Get current phase (0.0 - 1.0)
    #[inline]
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Modulation value at the current phase, in `[0.0, 1.0]`.
    #[inline]
    pub fn modulation(&self) -> f32 {
        0.5 + 0.5 * sinf(TAU * self.phase)
    }

    /// Returns the modulation at the current phase, then advances it.
    ///
    /// `phase_inc` is expected to be in `[0, 1)`; a single subtraction wraps
    /// the phase back into range.
    #[inline]
    pub fn advance(&mut self, phase_inc: f32) -> f32 {
        let output = self.modulation();

        self.phase += phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        output
    }
}
