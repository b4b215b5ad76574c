//! Lifecycle controller around the vibrato engine.
//!
//! [`VibratoProcessor`] is what a host wrapper drives: it owns the engine,
//! sizes it when the sample rate becomes known, pulls parameter snapshots
//! from the shared store at block boundaries and decides what to output
//! before it is prepared.

use serde::{Deserialize, Serialize};
use vibrato_effects::{Vibrato, VibratoParams};

use crate::config::ProcessorConfig;
use crate::error::{Result, VibratoError};
use crate::shared::VibratoShared;
use crate::state;

/// Lowest sample rate [`VibratoProcessor::prepare`] accepts, in Hz.
///
/// Keeps the per-sample LFO phase step below one cycle at the highest rate.
pub const MIN_SAMPLE_RATE: f64 = 1000.0;

/// Highest sample rate [`VibratoProcessor::prepare`] accepts, in Hz.
pub const MAX_SAMPLE_RATE: f64 = 768_000.0;

/// Where the processor is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Constructed, sample rate unknown. Delay lines are placeholders.
    Uninitialized,
    /// Delay lines sized, parameter refresh pending.
    Prepared,
    /// Parameters pulled since the last `prepare`; blocks run with them.
    Active,
}

/// Outcome of one [`VibratoProcessor::process_block`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    /// The block went through the vibrato engine.
    Processed,
    /// The processor was not prepared; the not-prepared policy was applied.
    NotPrepared,
}

/// What to output when a block arrives before [`VibratoProcessor::prepare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotPreparedPolicy {
    /// Leave input channels untouched.
    #[default]
    PassThrough,
    /// Zero every channel.
    Silence,
}

/// Host-facing vibrato processor.
///
/// Control-path methods (`prepare`, `release`, state) may allocate and log.
/// [`process_block`](Self::process_block) and [`reset`](Self::reset) never
/// allocate.
///
/// # Example
///
/// ```rust
/// use vibrato_plugin::{Param, ProcessStatus, ProcessorConfig, VibratoProcessor, VibratoShared};
///
/// let shared = VibratoShared::new(None);
/// let mut processor = VibratoProcessor::new(shared.clone(), &ProcessorConfig::default());
/// processor.prepare(48000.0, 512).unwrap();
///
/// shared.set(Param::Rate, 4.0);
///
/// let mut left = vec![0.0f32; 512];
/// let mut right = vec![0.0f32; 512];
/// let status = processor.process_block(&mut [&mut left[..], &mut right[..]], 2);
/// assert_eq!(status, ProcessStatus::Processed);
/// assert_eq!(processor.params().rate_hz, 4.0);
/// ```
#[derive(Debug)]
pub struct VibratoProcessor {
    shared: VibratoShared,
    engine: Vibrato,
    lifecycle: Lifecycle,
    policy: NotPreparedPolicy,
    sample_rate: f64,
    max_block_size: usize,
}

impl VibratoProcessor {
    /// Create an unprepared processor for `config.channels` channels.
    ///
    /// Initial rate/depth from the config, if any, are written to `shared`.
    pub fn new(shared: VibratoShared, config: &ProcessorConfig) -> Self {
        config.apply_initial_params(&shared);
        let mut engine = Vibrato::new(config.channels);
        engine.set_params(shared.snapshot());

        Self {
            shared,
            engine,
            lifecycle: Lifecycle::Uninitialized,
            policy: config.not_prepared,
            sample_rate: 0.0,
            max_block_size: 0,
        }
    }

    /// Size the delay lines for `sample_rate` and move to [`Lifecycle::Prepared`].
    ///
    /// Clears all history, zeroes the LFO phase and write index, then flags a
    /// parameter refresh. The refresh (explicit, or at the start of the next
    /// block) moves the processor to [`Lifecycle::Active`]. `max_block_size`
    /// is informational; longer blocks are still processed.
    ///
    /// Rates outside [`MIN_SAMPLE_RATE`]..=[`MAX_SAMPLE_RATE`] (and NaN) are
    /// rejected with [`VibratoError::InvalidSampleRate`] and leave the
    /// processor unchanged.
    pub fn prepare(&mut self, sample_rate: f64, max_block_size: usize) -> Result<()> {
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&sample_rate) {
            tracing::warn!(sample_rate, "rejected sample rate");
            return Err(VibratoError::InvalidSampleRate(sample_rate));
        }

        if self.lifecycle != Lifecycle::Uninitialized && sample_rate != self.sample_rate {
            tracing::info!(
                from = self.sample_rate,
                to = sample_rate,
                "sample rate changed, reallocating delay lines"
            );
        }

        self.engine.allocate(sample_rate as f32);
        self.sample_rate = sample_rate;
        self.max_block_size = max_block_size;
        self.engine.clear();
        self.lifecycle = Lifecycle::Prepared;
        self.shared.mark_dirty();

        tracing::info!(
            sample_rate,
            max_block_size,
            delay_len = self.engine.delay_len(),
            channels = self.engine.num_channels(),
            "vibrato prepared"
        );
        Ok(())
    }

    /// Process one block in place.
    ///
    /// `channels[..num_input_channels]` carry input and receive output; the
    /// remaining channels are cleared. Before [`prepare`](Self::prepare) the
    /// not-prepared policy is applied instead and
    /// [`ProcessStatus::NotPrepared`] is returned.
    pub fn process_block<C: AsMut<[f32]>>(
        &mut self,
        channels: &mut [C],
        num_input_channels: usize,
    ) -> ProcessStatus {
        if self.lifecycle == Lifecycle::Uninitialized {
            for (index, channel) in channels.iter_mut().enumerate() {
                if self.policy == NotPreparedPolicy::Silence || index >= num_input_channels {
                    channel.as_mut().fill(0.0);
                }
            }
            return ProcessStatus::NotPrepared;
        }

        if self.shared.take_dirty() {
            self.engine.set_params(self.shared.snapshot());
        }

        self.engine.process_block(channels, num_input_channels);
        self.lifecycle = Lifecycle::Active;
        ProcessStatus::Processed
    }

    /// Pull the current parameter values into the engine's working snapshot.
    ///
    /// Completes a pending `prepare`: `Prepared` becomes `Active`.
    pub fn refresh_parameters(&mut self) {
        self.shared.take_dirty();
        self.engine.set_params(self.shared.snapshot());
        if self.lifecycle == Lifecycle::Prepared {
            self.lifecycle = Lifecycle::Active;
        }
    }

    /// Clear delay-line content. Phase and write index are kept.
    pub fn reset(&mut self) {
        self.engine.clear();
        tracing::debug!("vibrato reset");
    }

    /// Drop delay-line storage and return to [`Lifecycle::Uninitialized`].
    pub fn release(&mut self) {
        let params = self.engine.params();
        self.engine = Vibrato::new(self.engine.num_channels());
        self.engine.set_params(params);
        self.lifecycle = Lifecycle::Uninitialized;
        self.sample_rate = 0.0;
        self.max_block_size = 0;
        tracing::debug!("vibrato released");
    }

    /// Current parameter values as a persistence blob.
    pub fn serialize_state(&self) -> Result<Vec<u8>> {
        state::serialize_state(&self.shared)
    }

    /// Restore parameter values from a blob written by
    /// [`serialize_state`](Self::serialize_state).
    ///
    /// On error nothing is changed. On success the next block picks the
    /// restored values up.
    pub fn deserialize_state(&self, blob: &[u8]) -> Result<()> {
        state::deserialize_state(&self.shared, blob)
    }

    /// Samples of output that follow the end of input. Always zero.
    pub fn tail_samples(&self) -> u32 {
        0
    }

    /// Current lifecycle state.
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Whether blocks are processed by the engine.
    pub fn is_prepared(&self) -> bool {
        self.lifecycle != Lifecycle::Uninitialized
    }

    /// Sample rate from the last `prepare`, 0 before.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Block size hint from the last `prepare`, 0 before.
    pub fn max_block_size(&self) -> usize {
        self.max_block_size
    }

    /// Delay-line length in samples (1 before `prepare`).
    pub fn delay_len(&self) -> usize {
        self.engine.delay_len()
    }

    /// Number of channels with a delay line.
    pub fn channels(&self) -> usize {
        self.engine.num_channels()
    }

    /// Shared LFO phase in `[0, 1)`.
    pub fn phase(&self) -> f32 {
        self.engine.phase()
    }

    /// Shared write index.
    pub fn write_pos(&self) -> usize {
        self.engine.write_pos()
    }

    /// Parameters the engine is currently running with.
    pub fn params(&self) -> VibratoParams {
        self.engine.params()
    }

    /// The shared parameter store.
    pub fn shared(&self) -> &VibratoShared {
        &self.shared
    }

    /// Behaviour before `prepare`.
    pub fn not_prepared_policy(&self) -> NotPreparedPolicy {
        self.policy
    }

    /// True when every delay line holds only zeros.
    pub fn is_silent(&self) -> bool {
        self.engine.is_silent()
    }
}
