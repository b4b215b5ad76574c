//! Parameter persistence.
//!
//! The blob is a JSON object keyed by stable parameter ID:
//!
//! ```json
//! {"100": 6.0, "101": 0.03}
//! ```
//!
//! Delay-line content is never saved. Restores are all-or-nothing: the blob
//! is checked completely before any value is stored.

use serde_json::{Map, Value};
use vibrato_core::ParamId;

use crate::error::{Result, VibratoError};
use crate::shared::{Param, VibratoShared};

/// Encode the current parameter values.
pub fn serialize_state(shared: &VibratoShared) -> Result<Vec<u8>> {
    let params = shared.snapshot();
    let mut state = Map::new();
    for param in Param::ALL {
        state.insert(
            param.id().0.to_string(),
            Value::from(f64::from(param.read(params))),
        );
    }
    Ok(serde_json::to_vec(&Value::Object(state))?)
}

/// Restore parameter values from `blob` and mark them for refresh.
///
/// Unknown IDs are ignored and known values are clamped. If the blob is not
/// a JSON object, or a known ID maps to something other than a number, an
/// error is returned and the store is left as it was.
pub fn deserialize_state(shared: &VibratoShared, blob: &[u8]) -> Result<()> {
    let result = decode(shared, blob);
    if let Err(err) = &result {
        tracing::warn!(error = %err, len = blob.len(), "state restore failed, keeping current parameters");
    }
    result
}

fn decode(shared: &VibratoShared, blob: &[u8]) -> Result<()> {
    let value: Value = serde_json::from_slice(blob)?;
    let Some(obj) = value.as_object() else {
        return Err(VibratoError::InvalidState(
            "state is not a JSON object".to_string(),
        ));
    };

    let mut params = shared.snapshot();
    for (key, val) in obj {
        let Some(param) = key.parse::<u32>().ok().and_then(|id| Param::from_id(ParamId(id)))
        else {
            continue;
        };
        let Some(v) = val.as_f64() else {
            return Err(VibratoError::InvalidState(format!(
                "value for parameter {key} is not a number"
            )));
        };
        param.write(&mut params, v as f32);
    }

    shared.set_params(params);
    Ok(())
}
