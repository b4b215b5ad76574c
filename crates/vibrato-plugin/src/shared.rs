//! Lock-free parameter store shared between control and audio threads.
//!
//! `VibratoShared` lives for the lifetime of the plugin instance. Control
//! actors (host automation, a GUI, state restore) write through it at any
//! time; the audio thread pulls a snapshot at block boundaries.
//!
//! Both values live in one `AtomicU64` (rate bits in the high word, depth
//! bits in the low word), so a reader always sees a matching pair. A separate
//! dirty flag tells the audio thread a new pair is waiting.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use vibrato_core::{ParamDescriptor, ParamId};
use vibrato_effects::{
    DEPTH_PARAM_ID, PARAM_DEPTH, PARAM_RATE, RATE_PARAM_ID, VibratoParams, depth_descriptor,
    rate_descriptor,
};

use crate::error::VibratoError;

/// The two automatable parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    /// LFO rate in Hz.
    Rate,
    /// Sweep width in seconds.
    Depth,
}

impl Param {
    /// Every parameter, in index order.
    pub const ALL: [Param; 2] = [Param::Rate, Param::Depth];

    /// Position of this parameter in [`ParameterInfo`](vibrato_core::ParameterInfo) order.
    pub const fn index(self) -> usize {
        match self {
            Param::Rate => PARAM_RATE,
            Param::Depth => PARAM_DEPTH,
        }
    }

    /// Stable persistence ID.
    pub const fn id(self) -> ParamId {
        match self {
            Param::Rate => RATE_PARAM_ID,
            Param::Depth => DEPTH_PARAM_ID,
        }
    }

    /// Parameter with the given stable ID.
    pub fn from_id(id: ParamId) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.id() == id)
    }

    /// Range, default and display metadata.
    pub fn descriptor(self) -> ParamDescriptor {
        match self {
            Param::Rate => rate_descriptor(),
            Param::Depth => depth_descriptor(),
        }
    }

    pub(crate) fn read(self, params: VibratoParams) -> f32 {
        match self {
            Param::Rate => params.rate_hz,
            Param::Depth => params.depth_s,
        }
    }

    pub(crate) fn write(self, params: &mut VibratoParams, value: f32) {
        match self {
            Param::Rate => params.rate_hz = value,
            Param::Depth => params.depth_s = value,
        }
    }
}

impl FromStr for Param {
    type Err = VibratoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| {
                let desc = p.descriptor();
                name.eq_ignore_ascii_case(desc.name) || name.eq_ignore_ascii_case(desc.string_id)
            })
            .ok_or_else(|| VibratoError::UnknownParameter(name.to_string()))
    }
}

fn pack(params: VibratoParams) -> u64 {
    (u64::from(params.rate_hz.to_bits()) << 32) | u64::from(params.depth_s.to_bits())
}

fn unpack(bits: u64) -> VibratoParams {
    VibratoParams {
        rate_hz: f32::from_bits((bits >> 32) as u32),
        depth_s: f32::from_bits(bits as u32),
    }
}

/// Inner storage for the shared store.
struct VibratoSharedData {
    /// Rate and depth as f32 bit patterns packed into one word.
    packed: AtomicU64,
    /// Set by every control-side write, cleared by the audio thread.
    dirty: AtomicBool,
    /// Host notification callback, called after control-side changes so the
    /// host schedules a process call even while transport is stopped.
    host_notify: Option<Box<dyn Fn() + Send + Sync>>,
}

/// Parameter store accessible from every plugin thread.
///
/// Wraps an `Arc` so it can be cloned into control threads and callbacks.
#[derive(Clone)]
pub struct VibratoShared {
    inner: Arc<VibratoSharedData>,
}

impl fmt::Debug for VibratoShared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VibratoShared")
            .field("params", &self.snapshot())
            .field("dirty", &self.is_dirty())
            .field("host_notify", &self.inner.host_notify.is_some())
            .finish()
    }
}

impl Default for VibratoShared {
    fn default() -> Self {
        Self::new(None)
    }
}

impl VibratoShared {
    /// Create a store holding the default parameter values.
    ///
    /// `host_notify` is called after every control-side change. Pass `None`
    /// for standalone or test use.
    pub fn new(host_notify: Option<Box<dyn Fn() + Send + Sync>>) -> Self {
        Self::with_params(VibratoParams::default(), host_notify)
    }

    /// Create a store holding `params` (clamped).
    ///
    /// The store starts dirty so the first block picks the values up.
    pub fn with_params(
        params: VibratoParams,
        host_notify: Option<Box<dyn Fn() + Send + Sync>>,
    ) -> Self {
        Self {
            inner: Arc::new(VibratoSharedData {
                packed: AtomicU64::new(pack(params.clamped())),
                dirty: AtomicBool::new(true),
                host_notify,
            }),
        }
    }

    /// Number of parameters.
    pub fn param_count(&self) -> usize {
        Param::ALL.len()
    }

    /// Descriptor by index.
    pub fn descriptor(&self, index: usize) -> Option<ParamDescriptor> {
        Param::ALL.get(index).map(|p| p.descriptor())
    }

    /// Find a parameter index by stable ID.
    pub fn index_by_id(&self, id: u32) -> Option<usize> {
        Param::from_id(ParamId(id)).map(Param::index)
    }

    /// Both current values as one consistent pair (lock-free).
    pub fn snapshot(&self) -> VibratoParams {
        unpack(self.inner.packed.load(Ordering::Acquire))
    }

    /// Current value of one parameter.
    pub fn get(&self, param: Param) -> f32 {
        param.read(self.snapshot())
    }

    /// Current value by index, `None` for an unknown index.
    pub fn get_value(&self, index: usize) -> Option<f32> {
        Param::ALL.get(index).map(|&p| self.get(p))
    }

    /// Store one parameter, clamped to its range. Returns the stored value.
    ///
    /// The other parameter is left untouched even under concurrent writes.
    pub fn set(&self, param: Param, value: f32) -> f32 {
        let clamped = param.descriptor().clamp(value);
        if clamped != value {
            tracing::debug!(param = ?param, requested = value, stored = clamped, "parameter clamped");
        }

        let packed = &self.inner.packed;
        let mut current = packed.load(Ordering::Acquire);
        loop {
            let mut params = unpack(current);
            param.write(&mut params, clamped);
            match packed.compare_exchange_weak(
                current,
                pack(params),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }

        self.mark_dirty();
        self.notify_host();
        clamped
    }

    /// Store a value by index. Unknown indices are ignored.
    pub fn set_value(&self, index: usize, value: f32) {
        if let Some(&param) = Param::ALL.get(index) {
            self.set(param, value);
        }
    }

    /// Store a value by parameter name (`"rate"`, `"depth"` or a string ID).
    pub fn set_by_name(&self, name: &str, value: f32) -> Result<f32, VibratoError> {
        let param: Param = name.parse()?;
        Ok(self.set(param, value))
    }

    /// Replace both values in one store. Returns the clamped pair.
    pub fn set_params(&self, params: VibratoParams) -> VibratoParams {
        let clamped = params.clamped();
        if clamped != params {
            tracing::debug!(requested = ?params, stored = ?clamped, "parameters clamped");
        }
        self.inner.packed.store(pack(clamped), Ordering::Release);
        self.mark_dirty();
        self.notify_host();
        clamped
    }

    /// Ask the audio thread to pull the current values on its next block.
    pub fn mark_dirty(&self) {
        self.inner.dirty.store(true, Ordering::Release);
    }

    /// Whether a refresh is pending.
    pub fn is_dirty(&self) -> bool {
        self.inner.dirty.load(Ordering::Acquire)
    }

    /// Atomically read and clear the dirty flag.
    ///
    /// Audio thread only. A store that lands after this call sets the flag
    /// again, so nothing is lost.
    pub fn take_dirty(&self) -> bool {
        self.inner.dirty.swap(false, Ordering::AcqRel)
    }

    /// Notify the host that control-side changes are pending.
    ///
    /// No-op if no callback is set.
    pub fn notify_host(&self) {
        if let Some(cb) = &self.inner.host_notify {
            cb();
        }
    }

    /// Display text for a parameter's current value, e.g. `"6.0000 Hz"`.
    pub fn format_value(&self, param: Param) -> String {
        param.descriptor().format_value(self.get(param))
    }

    /// Parse display text and store the result. Returns the stored value.
    pub fn set_from_text(&self, param: Param, text: &str) -> Option<f32> {
        let value = param.descriptor().parse_value(text)?;
        Some(self.set(param, value))
    }
}
