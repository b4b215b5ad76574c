//! Delay-line vibrato.
//!
//! Pitch modulation by reading a delay line through a tap that a sine LFO
//! sweeps between zero and the configured width. Each channel keeps its own
//! history, but all channels share one LFO phase and one write index, so a
//! stereo signal gets the same pitch trajectory on both sides.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec::Vec;

use vibrato_core::{
    DelayLine, Lfo, ParamDescriptor, ParamId, ParameterInfo, flush_denormal, phase_increment,
};

/// Lowest LFO rate in Hz.
pub const RATE_MIN_HZ: f32 = 1.0;
/// Highest LFO rate in Hz.
pub const RATE_MAX_HZ: f32 = 12.0;
/// Rate a fresh engine starts with.
pub const RATE_DEFAULT_HZ: f32 = 6.0;

/// Narrowest sweep width in seconds.
pub const DEPTH_MIN_S: f32 = 0.01;
/// Widest sweep width in seconds. Sizes every delay line.
pub const DEPTH_MAX_S: f32 = 0.05;
/// Width a fresh engine starts with.
pub const DEPTH_DEFAULT_S: f32 = 0.03;

/// Index of the rate parameter.
pub const PARAM_RATE: usize = 0;
/// Index of the depth parameter.
pub const PARAM_DEPTH: usize = 1;

/// Stable persistence ID of the rate parameter.
pub const RATE_PARAM_ID: ParamId = ParamId(100);
/// Stable persistence ID of the depth parameter.
pub const DEPTH_PARAM_ID: ParamId = ParamId(101);

/// Descriptor of the LFO rate parameter.
pub fn rate_descriptor() -> ParamDescriptor {
    ParamDescriptor::rate_hz(RATE_MIN_HZ, RATE_MAX_HZ, RATE_DEFAULT_HZ)
        .with_id(RATE_PARAM_ID, "vib_rate")
}

/// Descriptor of the sweep width parameter.
pub fn depth_descriptor() -> ParamDescriptor {
    ParamDescriptor::time_seconds("Depth", "Depth", DEPTH_MIN_S, DEPTH_MAX_S, DEPTH_DEFAULT_S)
        .with_id(DEPTH_PARAM_ID, "vib_depth")
}

/// The parameter values a block is processed with.
///
/// The engine only ever sees a whole snapshot: it is replaced between blocks,
/// never inside the sample loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VibratoParams {
    /// LFO rate in Hz.
    pub rate_hz: f32,
    /// Peak delay of the sweep in seconds.
    pub depth_s: f32,
}

impl Default for VibratoParams {
    fn default() -> Self {
        Self {
            rate_hz: RATE_DEFAULT_HZ,
            depth_s: DEPTH_DEFAULT_S,
        }
    }
}

impl VibratoParams {
    /// Snapshot with both values clamped into their declared ranges.
    pub fn new(rate_hz: f32, depth_s: f32) -> Self {
        Self { rate_hz, depth_s }.clamped()
    }

    /// Copy of `self` with both values clamped into their declared ranges.
    pub fn clamped(self) -> Self {
        Self {
            rate_hz: rate_descriptor().clamp(self.rate_hz),
            depth_s: depth_descriptor().clamp(self.depth_s),
        }
    }
}

/// Multichannel delay-line vibrato.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Rate | 1.0–12.0 Hz | 6.0 |
/// | 1 | Depth | 0.01–0.05 s | 0.03 |
///
/// ## Lifecycle
///
/// [`new`](Self::new) builds a placeholder engine (one-sample lines, no
/// sample rate). [`allocate`](Self::allocate) sizes every line from
/// [`DEPTH_MAX_S`] and the sample rate and must run before audio is
/// processed. [`clear`](Self::clear) wipes history only.
///
/// # Example
///
/// ```rust
/// use vibrato_effects::Vibrato;
///
/// let mut vibrato = Vibrato::new(1);
/// vibrato.allocate(44100.0);
/// assert_eq!(vibrato.delay_len(), 2208);
///
/// let mut block = [0.0f32; 128];
/// vibrato.process_block(&mut [&mut block[..]], 1);
/// assert!(block.iter().all(|&s| s == 0.0));
/// ```
#[derive(Debug, Clone)]
pub struct Vibrato {
    /// One history buffer per channel
    lines: Vec<DelayLine>,
    /// LFO state shared by every channel
    lfo: Lfo,
    /// Write index shared by every channel
    write_pos: usize,
    /// Working parameter snapshot
    params: VibratoParams,
    sample_rate: f32,
    inverse_sample_rate: f32,
}

impl Vibrato {
    /// Create a placeholder engine for `num_channels` channels.
    ///
    /// Lines hold a single sample until [`allocate`](Self::allocate) runs.
    pub fn new(num_channels: usize) -> Self {
        Self {
            lines: (0..num_channels).map(|_| DelayLine::new(1)).collect(),
            lfo: Lfo::new(),
            write_pos: 0,
            params: VibratoParams::default(),
            sample_rate: 0.0,
            inverse_sample_rate: 0.0,
        }
    }

    /// Create an engine and allocate it for `sample_rate` in one step.
    pub fn with_sample_rate(num_channels: usize, sample_rate: f32) -> Self {
        let mut vibrato = Self::new(num_channels);
        vibrato.allocate(sample_rate);
        vibrato
    }

    /// Delay-line length needed at `sample_rate`.
    pub fn required_len(sample_rate: f32) -> usize {
        DelayLine::capacity_for(sample_rate, DEPTH_MAX_S)
    }

    /// Size every delay line for `sample_rate` and restart the modulation.
    ///
    /// Clears all history, zeroes the LFO phase and the write index.
    /// Allocates: call from the control path only.
    pub fn allocate(&mut self, sample_rate: f32) {
        let len = Self::required_len(sample_rate);
        for line in &mut self.lines {
            line.resize(len);
        }
        self.sample_rate = sample_rate;
        self.inverse_sample_rate = 1.0 / sample_rate;
        self.lfo.reset();
        self.write_pos = 0;

        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, len, channels = self.lines.len(), "vibrato allocated");
    }

    /// True once [`allocate`](Self::allocate) has run.
    pub fn is_allocated(&self) -> bool {
        self.sample_rate > 0.0
    }

    /// Zero every delay line. LFO phase and write index are kept.
    pub fn clear(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
    }

    /// Replace the working parameter snapshot (values are clamped).
    pub fn set_params(&mut self, params: VibratoParams) {
        self.params = params.clamped();
    }

    /// The working parameter snapshot.
    pub fn params(&self) -> VibratoParams {
        self.params
    }

    /// Number of channels with their own delay line.
    pub fn num_channels(&self) -> usize {
        self.lines.len()
    }

    /// Sample rate from the last [`allocate`](Self::allocate), 0 before.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Current delay-line length in samples.
    pub fn delay_len(&self) -> usize {
        self.lines.first().map_or(0, DelayLine::capacity)
    }

    /// Current LFO phase in `[0, 1)`.
    pub fn phase(&self) -> f32 {
        self.lfo.phase()
    }

    /// Shared write index.
    pub fn write_pos(&self) -> usize {
        self.write_pos
    }

    /// True when every delay line holds only zeros.
    pub fn is_silent(&self) -> bool {
        self.lines.iter().all(DelayLine::is_silent)
    }

    /// Process one block in place.
    ///
    /// `channels[..num_input_channels]` are processed; every other channel
    /// (extra outputs, or inputs without an allocated delay line) is cleared
    /// to silence. All processed channels start from the same LFO phase and
    /// write index; the state reached at the end of the block is kept.
    ///
    /// The block length is the shortest processed channel. Samples past it in
    /// longer channels are cleared.
    ///
    /// Never allocates.
    pub fn process_block<C: AsMut<[f32]>>(&mut self, channels: &mut [C], num_input_channels: usize) {
        debug_assert!(
            !self.is_allocated()
                || self
                    .lines
                    .iter()
                    .all(|line| line.capacity() == Self::required_len(self.sample_rate)),
            "delay lines out of date for sample rate {}",
            self.sample_rate
        );

        let active = num_input_channels.min(channels.len()).min(self.lines.len());
        let num_samples = channels[..active]
            .iter_mut()
            .map(|channel| channel.as_mut().len())
            .min()
            .unwrap_or(0);

        let phase_inc = phase_increment(self.params.rate_hz, self.inverse_sample_rate);
        let mut end_lfo = self.lfo;
        let mut end_pos = self.write_pos;

        for (index, channel) in channels.iter_mut().enumerate() {
            let samples = channel.as_mut();
            if index >= active {
                samples.fill(0.0);
                continue;
            }

            let mut lfo = self.lfo;
            let line = &mut self.lines[index];
            line.seek(self.write_pos);

            let (block, excess) = samples.split_at_mut(num_samples);
            for sample in block.iter_mut() {
                let current_delay = self.params.depth_s * lfo.advance(phase_inc);
                let output = line.read(current_delay * self.sample_rate);
                line.write(flush_denormal(*sample));
                *sample = output;
            }
            excess.fill(0.0);

            end_lfo = lfo;
            end_pos = line.write_pos();
        }

        self.lfo = end_lfo;
        self.write_pos = end_pos;
    }
}

impl ParameterInfo for Vibrato {
    fn param_count(&self) -> usize {
        2
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            PARAM_RATE => Some(rate_descriptor()),
            PARAM_DEPTH => Some(depth_descriptor()),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            PARAM_RATE => self.params.rate_hz,
            PARAM_DEPTH => self.params.depth_s,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            PARAM_RATE => self.params.rate_hz = rate_descriptor().clamp(value),
            PARAM_DEPTH => self.params.depth_s = depth_descriptor().clamp(value),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn new_is_placeholder() {
        let vibrato = Vibrato::new(2);
        assert_eq!(vibrato.num_channels(), 2);
        assert_eq!(vibrato.delay_len(), 1);
        assert!(!vibrato.is_allocated());
        assert_eq!(vibrato.phase(), 0.0);
        assert_eq!(vibrato.write_pos(), 0);
        assert_eq!(vibrato.params(), VibratoParams::default());
    }

    #[test]
    fn allocate_sizes_from_max_depth() {
        let mut vibrato = Vibrato::new(2);
        vibrato.allocate(44100.0);
        assert_eq!(vibrato.delay_len(), 2205 + 3);
        assert!(vibrato.is_allocated());

        vibrato.allocate(96000.0);
        assert_eq!(vibrato.delay_len(), 4800 + 3);
    }

    #[test]
    fn allocate_restarts_modulation() {
        let mut vibrato = Vibrato::with_sample_rate(1, 48000.0);
        let mut block = vec![0.5f32; 300];
        vibrato.process_block(&mut [&mut block[..]], 1);
        assert!(vibrato.phase() > 0.0);
        assert_eq!(vibrato.write_pos(), 300);

        vibrato.allocate(48000.0);
        assert_eq!(vibrato.phase(), 0.0);
        assert_eq!(vibrato.write_pos(), 0);
        assert!(vibrato.is_silent());
    }

    #[test]
    fn block_advances_shared_state() {
        let mut vibrato = Vibrato::with_sample_rate(2, 1000.0);
        vibrato.set_params(VibratoParams::new(10.0, 0.02));
        let len = vibrato.delay_len();
        assert_eq!(len, 53);

        let mut left = vec![0.0f32; 75];
        let mut right = vec![0.0f32; 75];
        vibrato.process_block(&mut [&mut left[..], &mut right[..]], 2);

        // 75 samples at 10 Hz / 1 kHz = 0.75 cycles
        assert!((vibrato.phase() - 0.75).abs() < 1e-4);
        assert_eq!(vibrato.write_pos(), 75 % len);
    }

    #[test]
    fn silence_in_silence_out() {
        let mut vibrato = Vibrato::with_sample_rate(2, 44100.0);
        let mut left = vec![0.0f32; 4096];
        let mut right = vec![0.0f32; 4096];
        vibrato.process_block(&mut [&mut left[..], &mut right[..]], 2);
        assert!(left.iter().chain(right.iter()).all(|&s| s == 0.0));
    }

    #[test]
    fn channels_share_trajectory() {
        let mut vibrato = Vibrato::with_sample_rate(2, 48000.0);
        let input: Vec<f32> = (0..2048).map(|i| (i as f32 * 0.01).sin()).collect();
        let mut left = input.clone();
        let mut right = input;
        vibrato.process_block(&mut [&mut left[..], &mut right[..]], 2);
        assert_eq!(left, right);
    }

    #[test]
    fn channels_keep_independent_history() {
        let mut vibrato = Vibrato::with_sample_rate(2, 48000.0);
        let mut left = vec![0.0f32; 4096];
        let mut right = vec![0.0f32; 4096];
        left[0] = 1.0;
        vibrato.process_block(&mut [&mut left[..], &mut right[..]], 2);
        assert!(left.iter().any(|&s| s != 0.0));
        assert!(right.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn extra_outputs_are_cleared() {
        let mut vibrato = Vibrato::with_sample_rate(2, 48000.0);
        let mut a = vec![0.3f32; 64];
        let mut b = vec![0.3f32; 64];
        vibrato.process_block(&mut [&mut a[..], &mut b[..]], 1);
        assert!(b.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn channels_without_lines_are_cleared() {
        let mut vibrato = Vibrato::with_sample_rate(1, 48000.0);
        let mut a = vec![0.3f32; 64];
        let mut b = vec![0.3f32; 64];
        vibrato.process_block(&mut [&mut a[..], &mut b[..]], 2);
        assert!(b.iter().all(|&s| s == 0.0));
        assert_eq!(vibrato.write_pos(), 64);
    }

    #[test]
    fn ragged_channels_use_shortest_length() {
        let mut vibrato = Vibrato::with_sample_rate(2, 48000.0);
        let mut a = vec![0.3f32; 64];
        let mut b = vec![0.3f32; 40];
        vibrato.process_block(&mut [&mut a[..], &mut b[..]], 2);
        assert_eq!(vibrato.write_pos(), 40);
        assert!(a[40..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn empty_block_is_noop() {
        let mut vibrato = Vibrato::with_sample_rate(2, 48000.0);
        let mut channels: [Vec<f32>; 2] = [Vec::new(), Vec::new()];
        vibrato.process_block(&mut channels, 2);
        assert_eq!(vibrato.phase(), 0.0);
        assert_eq!(vibrato.write_pos(), 0);
    }

    #[test]
    fn clear_keeps_phase_and_write_pos() {
        let mut vibrato = Vibrato::with_sample_rate(1, 48000.0);
        let mut block = vec![0.5f32; 500];
        vibrato.process_block(&mut [&mut block[..]], 1);
        let phase = vibrato.phase();
        let pos = vibrato.write_pos();

        vibrato.clear();
        assert!(vibrato.is_silent());
        assert_eq!(vibrato.phase(), phase);
        assert_eq!(vibrato.write_pos(), pos);

        vibrato.clear();
        assert!(vibrato.is_silent());
        assert_eq!(vibrato.phase(), phase);
        assert_eq!(vibrato.write_pos(), pos);
    }

    #[test]
    fn params_are_clamped() {
        let mut vibrato = Vibrato::new(1);
        vibrato.set_params(VibratoParams {
            rate_hz: 40.0,
            depth_s: 0.0,
        });
        assert_eq!(vibrato.params().rate_hz, RATE_MAX_HZ);
        assert_eq!(vibrato.params().depth_s, DEPTH_MIN_S);
    }

    #[test]
    fn parameter_info_roundtrip() {
        let mut vibrato = Vibrato::new(1);
        assert_eq!(vibrato.param_count(), 2);
        assert_eq!(vibrato.find_param_by_name("rate"), Some(PARAM_RATE));
        assert_eq!(vibrato.param_index_by_id(DEPTH_PARAM_ID), Some(PARAM_DEPTH));

        vibrato.set_param(PARAM_RATE, 3.5);
        vibrato.set_param(PARAM_DEPTH, 0.9);
        assert_eq!(vibrato.get_param(PARAM_RATE), 3.5);
        assert_eq!(vibrato.get_param(PARAM_DEPTH), DEPTH_MAX_S);
        assert_eq!(vibrato.get_param(9), 0.0);
        assert!(vibrato.param_info(2).is_none());
    }
}
