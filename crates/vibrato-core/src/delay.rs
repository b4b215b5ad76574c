//! Circular delay line for modulated-delay effects.
//!
//! A fixed-capacity ring buffer of past input samples. The write head stores
//! one sample per tick and advances modulo the buffer length; reads look back
//! a fractional number of samples and blend the two neighbouring slots.
//!
//! # Read geometry
//!
//! A read at `delay_samples = d` lands on
//!
//! ```text
//! dpr = (write_pos - d - INTERPOLATION_MARGIN + len) mod len
//! ```
//!
//! so with `d = 0` the line returns the sample written three ticks ago, and
//! in general the sample written `d + INTERPOLATION_MARGIN` ticks ago. The
//! margin keeps the two-point interpolation window (`dpr` and `dpr + 1`)
//! strictly behind the write head for every delay up to [`DelayLine::max_delay`].
//!
//! # Sizing
//!
//! Capacity is `floor(max_seconds * sample_rate) + INTERPOLATION_MARGIN`,
//! computed from the *upper bound* of the modulation depth, so the buffer
//! never needs to grow while depth is automated live. A sample-rate change
//! needs a new capacity, which is why [`DelayLine::resize`] also clears the
//! history.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use crate::math::lerp;

/// Samples kept between the write head and the newest readable slot.
///
/// One sample of lookahead for linear interpolation plus rounding slack.
/// Reducing it risks reading slots that are about to be overwritten.
pub const INTERPOLATION_MARGIN: usize = 3;

/// Circular delay line with linear fractional reads (heap-allocated).
///
/// # Memory
///
/// The buffer is allocated in [`new`](Self::new) or [`resize`](Self::resize)
/// and is never reallocated by [`read`](Self::read) or [`write`](Self::write).
///
/// # Example
///
/// ```rust
/// use vibrato_core::{DelayLine, INTERPOLATION_MARGIN};
///
/// // 50 ms of history at 44.1 kHz
/// let mut delay = DelayLine::from_time(44100.0, 0.05);
/// assert_eq!(delay.capacity(), 2205 + INTERPOLATION_MARGIN);
///
/// delay.write(1.0);
/// delay.write(0.0);
/// delay.write(0.0);
/// // The impulse is now three writes old: a zero-offset read reaches it.
/// assert_eq!(delay.read(0.0), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct DelayLine {
    /// Circular buffer storage
    buffer: Vec<f32>,
    /// Index where the next sample will be stored
    write_pos: usize,
}

impl DelayLine {
    /// Creates a delay line holding `len` samples of history.
    ///
    /// # Panics
    ///
    /// Panics if `len` is 0.
    pub fn new(len: usize) -> Self {
        assert!(len > 0, "Delay size must be > 0");

        #[cfg(feature = "tracing")]
        tracing::debug!(len, "delay line allocated");

        Self {
            buffer: vec![0.0; len],
            write_pos: 0,
        }
    }

    /// Buffer length needed for `max_seconds` of modulation at `sample_rate`.
    #[inline]
    pub fn capacity_for(sample_rate: f32, max_seconds: f32) -> usize {
        (max_seconds * sample_rate) as usize + INTERPOLATION_MARGIN
    }

    /// Creates a delay line sized by [`capacity_for`](Self::capacity_for).
    pub fn from_time(sample_rate: f32, max_seconds: f32) -> Self {
        Self::new(Self::capacity_for(sample_rate, max_seconds))
    }

    /// Returns the buffer length in samples.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Largest delay (in samples) that still reads written history.
    ///
    /// Larger requests are clamped to this value by [`read`](Self::read).
    #[inline]
    pub fn max_delay(&self) -> f32 {
        self.buffer.len().saturating_sub(INTERPOLATION_MARGIN) as f32
    }

    /// Current write index, always in `[0, capacity)`.
    #[inline]
    pub fn write_pos(&self) -> usize {
        self.write_pos
    }

    /// Moves the write head. The index is taken modulo the capacity.
    #[inline]
    pub fn seek(&mut self, pos: usize) {
        self.write_pos = pos % self.buffer.len();
    }

    /// Reads the history `delay_samples` (+ margin) behind the write head.
    ///
    /// Linear interpolation between `floor(dpr)` and the following slot.
    /// Negative or NaN delays read at zero offset.
    #[inline]
    pub fn read(&self, delay_samples: f32) -> f32 {
        debug_assert!(!(delay_samples < 0.0), "negative delay: {delay_samples}");

        let len = self.buffer.len();
        let len_f = len as f32;
        let delay = delay_samples.max(0.0).min(self.max_delay());

        // Adding one buffer length keeps the numerator non-negative for every
        // clamped delay; the sign fix-up absorbs float rounding at the edge.
        let mut dpr = libm::fmodf(
            self.write_pos as f32 - delay - INTERPOLATION_MARGIN as f32 + len_f,
            len_f,
        );
        if dpr < 0.0 {
            dpr += len_f;
        }

        let floor = dpr as usize;
        let frac = dpr - floor as f32;
        let i0 = floor % len;
        let i1 = (i0 + 1) % len;

        lerp(self.buffer[i0], self.buffer[i1], frac)
    }

    /// Stores `sample` at the write head and advances it.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos += 1;
        if self.write_pos >= self.buffer.len() {
            self.write_pos = 0;
        }
    }

    /// Read at `delay_samples`, then write `sample`.
    #[inline]
    pub fn read_write(&mut self, sample: f32, delay_samples: f32) -> f32 {
        let output = self.read(delay_samples);
        self.write(sample);
        output
    }

    /// Zeroes the history. The write head is left where it is.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
    }

    /// Zeroes the history and moves the write head back to 0.
    pub fn reset(&mut self) {
        self.clear();
        self.write_pos = 0;
    }

    /// Reallocates to `len` samples, clearing history and write head.
    ///
    /// Control-path only: this may allocate.
    ///
    /// # Panics
    ///
    /// Panics if `len` is 0.
    pub fn resize(&mut self, len: usize) {
        assert!(len > 0, "Delay size must be > 0");

        #[cfg(feature = "tracing")]
        tracing::debug!(from = self.buffer.len(), to = len, "delay line resized");

        self.buffer.clear();
        self.buffer.resize(len, 0.0);
        self.write_pos = 0;
    }

    /// True when every stored sample is exactly zero.
    pub fn is_silent(&self) -> bool {
        self.buffer.iter().all(|&s| s == 0.0)
    }
}
