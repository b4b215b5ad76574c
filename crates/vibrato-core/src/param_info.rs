//! Parameter introspection for discoverable effect parameters.
//!
//! This module provides the [`ParameterInfo`] trait and supporting types that
//! let control surfaces, persistence and host glue discover and drive an
//! effect's parameters without knowing its concrete type:
//!
//! - **Control surfaces**: build knobs from range, default and unit
//! - **Persistence**: key saved values by a stable [`ParamId`]
//!
//! # Example
//!
//! ```rust
//! use vibrato_core::{ParameterInfo, ParamDescriptor, ParamId};
//!
//! struct Tremolo {
//!     rate_hz: f32,
//! }
//!
//! impl ParameterInfo for Tremolo {
//!     fn param_count(&self) -> usize { 1 }
//!
//!     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
//!         match index {
//!             0 => Some(ParamDescriptor::rate_hz(0.5, 10.0, 4.0)
//!                 .with_id(ParamId(900), "trem_rate")),
//!             _ => None,
//!         }
//!     }
//!
//!     fn get_param(&self, index: usize) -> f32 {
//!         match index {
//!             0 => self.rate_hz,
//!             _ => 0.0,
//!         }
//!     }
//!
//!     fn set_param(&mut self, index: usize, value: f32) {
//!         if let Some(desc) = self.param_info(index) {
//!             self.rate_hz = desc.clamp(value);
//!         }
//!     }
//! }
//! ```

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::format;
use alloc::string::String;

/// Stable parameter identifier that survives reordering.
///
/// Used as the key of saved state. Once assigned, a `ParamId` MUST NEVER
/// change for a given parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub u32);

/// Trait for effects that expose introspectable parameters.
///
/// Parameters are accessed by zero-based index. The index must be stable for
/// the lifetime of the effect instance.
///
/// # Thread Safety
///
/// This trait does not require thread safety. Cross-thread parameter
/// delivery is the job of the processor's atomic parameter store.
pub trait ParameterInfo {
    /// Returns the number of parameters this effect exposes.
    fn param_count(&self) -> usize;

    /// Returns the descriptor for the parameter at the given index.
    ///
    /// Returns `None` if `index >= param_count()`.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Gets the current value of the parameter at the given index.
    ///
    /// Returns `0.0` if `index >= param_count()`.
    fn get_param(&self, index: usize) -> f32;

    /// Sets the value of the parameter at the given index.
    ///
    /// Implementations clamp to the descriptor's range and ignore
    /// out-of-bounds indices.
    fn set_param(&mut self, index: usize, value: f32);

    /// Find a parameter index by name (case-insensitive).
    ///
    /// Matches against [`ParamDescriptor::name`], [`ParamDescriptor::short_name`]
    /// and [`ParamDescriptor::string_id`].
    fn find_param_by_name(&self, name: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| {
            self.param_info(i).is_some_and(|desc| {
                desc.name.eq_ignore_ascii_case(name)
                    || desc.short_name.eq_ignore_ascii_case(name)
                    || desc.string_id.eq_ignore_ascii_case(name)
            })
        })
    }

    /// Finds a parameter index by its stable [`ParamId`].
    ///
    /// Scans all parameters (O(n)). Use on setup paths, not audio.
    fn param_index_by_id(&self, id: ParamId) -> Option<usize> {
        (0..self.param_count()).find(|&i| self.param_info(i).is_some_and(|d| d.id == id))
    }
}

/// Describes a single parameter's metadata for display and validation.
///
/// The range is fixed at construction; every value that reaches the engine
/// has been passed through [`clamp`](Self::clamp).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name for display (e.g., "Rate", "Depth").
    pub name: &'static str,

    /// Short name for small displays, max 8 characters.
    pub short_name: &'static str,

    /// Unit type for formatting the parameter value.
    pub unit: ParamUnit,

    /// Minimum allowed value for this parameter.
    pub min: f32,

    /// Maximum allowed value for this parameter.
    pub max: f32,

    /// Default value when the effect is initialized.
    pub default: f32,

    /// Recommended step increment for encoder-based control.
    pub step: f32,

    /// Stable numeric ID used as the persistence key.
    /// Default: `ParamId(0)` (unassigned).
    pub id: ParamId,

    /// Human-readable stable ID (e.g., `"vib_rate"`).
    pub string_id: &'static str,
}

impl ParamDescriptor {
    /// Standard LFO rate parameter in Hz.
    ///
    /// # Arguments
    ///
    /// * `min` - Minimum rate in Hz
    /// * `max` - Maximum rate in Hz
    /// * `default` - Default rate in Hz
    pub fn rate_hz(min: f32, max: f32, default: f32) -> Self {
        Self {
            name: "Rate",
            short_name: "Rate",
            unit: ParamUnit::Hertz,
            min,
            max,
            default,
            step: 0.05,
            id: ParamId(0),
            string_id: "",
        }
    }

    /// Time parameter with custom name and range (seconds).
    ///
    /// # Arguments
    ///
    /// * `name` - Full parameter name (e.g., "Depth")
    /// * `short_name` - Short name for small displays
    /// * `min` - Minimum time in seconds
    /// * `max` - Maximum time in seconds
    /// * `default` - Default time in seconds
    pub fn time_seconds(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Seconds,
            min,
            max,
            default,
            step: 0.0005,
            id: ParamId(0),
            string_id: "",
        }
    }

    /// Sets the stable parameter ID and string ID.
    ///
    /// # Example
    ///
    /// ```rust
    /// use vibrato_core::{ParamDescriptor, ParamId};
    ///
    /// let desc = ParamDescriptor::rate_hz(1.0, 12.0, 6.0).with_id(ParamId(100), "vib_rate");
    /// assert_eq!(desc.id, ParamId(100));
    /// assert_eq!(desc.string_id, "vib_rate");
    /// ```
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Clamps a value to this parameter's valid range.
    ///
    /// NaN maps to the default so it can never reach the audio path.
    ///
    /// # Example
    ///
    /// ```rust
    /// use vibrato_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::rate_hz(1.0, 12.0, 6.0);
    /// assert_eq!(desc.clamp(3.0), 3.0);
    /// assert_eq!(desc.clamp(-5.0), 1.0);
    /// assert_eq!(desc.clamp(100.0), 12.0);
    /// assert_eq!(desc.clamp(f32::NAN), 6.0);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// True when `value` lies inside `[min, max]`.
    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Formats a value with [`DISPLAY_DECIMALS`] decimals and its unit.
    ///
    /// ```rust
    /// use vibrato_core::ParamDescriptor;
    ///
    /// let depth = ParamDescriptor::time_seconds("Depth", "Depth", 0.01, 0.05, 0.03);
    /// assert_eq!(depth.format_value(0.03), "0.0300 s");
    /// ```
    pub fn format_value(&self, value: f32) -> String {
        format!("{value:.DISPLAY_DECIMALS$}{}", self.unit.suffix())
    }

    /// Parses display text back into a clamped value.
    ///
    /// The unit suffix is optional. Returns `None` if the text is not a number.
    ///
    /// ```rust
    /// use vibrato_core::ParamDescriptor;
    ///
    /// let rate = ParamDescriptor::rate_hz(1.0, 12.0, 6.0);
    /// assert_eq!(rate.parse_value("4.5 Hz"), Some(4.5));
    /// assert_eq!(rate.parse_value("20"), Some(12.0));
    /// assert_eq!(rate.parse_value("fast"), None);
    /// ```
    pub fn parse_value(&self, text: &str) -> Option<f32> {
        let trimmed = text.trim();
        let suffix = self.unit.suffix().trim();
        let number = if suffix.is_empty() {
            trimmed
        } else {
            trimmed
                .len()
                .checked_sub(suffix.len())
                .filter(|&cut| {
                    trimmed.is_char_boundary(cut)
                        && trimmed[cut..].eq_ignore_ascii_case(suffix)
                })
                .map_or(trimmed, |cut| trimmed[..cut].trim_end())
        };
        number.parse::<f32>().ok().map(|v| self.clamp(v))
    }
}

/// Decimal places used by [`ParamDescriptor::format_value`].
pub const DISPLAY_DECIMALS: usize = 4;

/// Unit type for parameter display and formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Hertz (Hz) - for LFO rate.
    Hertz,

    /// Seconds (s) - for modulation width.
    Seconds,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    ///
    /// ```rust
    /// use vibrato_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Hertz.suffix(), " Hz");
    /// assert_eq!(ParamUnit::Seconds.suffix(), " s");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Hertz => " Hz",
            ParamUnit::Seconds => " s",
        }
    }
}
