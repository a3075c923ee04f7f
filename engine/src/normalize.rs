//! Normalization of store wire values.
//!
//! The backing store represents date/time fields as a tagged wire object:
//!
//! ```json
//! {"$type": "timestamp", "seconds": 1706745600, "nanos": 0}
//! ```
//!
//! On the way into the mirror these become RFC 3339 strings so consumers see
//! a native temporal value. Nested objects are normalized recursively; arrays
//! and primitives pass through structurally unchanged. A wire timestamp that
//! does not decode (out-of-range seconds, bad nanos) is left as-is.

use crate::Fields;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Value of the `$type` tag marking a temporal wire object.
pub const TIMESTAMP_TAG: &str = "timestamp";

fn decode_wire_timestamp(obj: &Map<String, Value>) -> Option<DateTime<Utc>> {
    if obj.get("$type").and_then(Value::as_str) != Some(TIMESTAMP_TAG) {
        return None;
    }
    let seconds = obj.get("seconds").and_then(Value::as_i64)?;
    let nanos = match obj.get("nanos") {
        None => 0,
        Some(v) => u32::try_from(v.as_u64()?).ok()?,
    };
    DateTime::from_timestamp(seconds, nanos)
}

/// Encode an instant as the store's temporal wire object.
///
/// Writers use this for date/time fields; the value comes back through the
/// feed and is normalized to an RFC 3339 string on read.
pub fn wire_timestamp(instant: DateTime<Utc>) -> Value {
    let mut obj = Map::new();
    obj.insert("$type".into(), Value::String(TIMESTAMP_TAG.into()));
    obj.insert("seconds".into(), Value::from(instant.timestamp()));
    obj.insert("nanos".into(), Value::from(instant.timestamp_subsec_nanos()));
    Value::Object(obj)
}

/// Normalize a single field value.
pub fn normalize_value(value: Value) -> Value {
    match value {
        Value::Object(obj) => match decode_wire_timestamp(&obj) {
            Some(instant) => Value::String(instant.to_rfc3339()),
            None => Value::Object(
                obj.into_iter()
                    .map(|(name, v)| (name, normalize_value(v)))
                    .collect(),
            ),
        },
        // Arrays and primitives pass through unchanged.
        other => other,
    }
}

/// Normalize all top-level fields of a delivered document.
pub fn normalize_fields(fields: Fields) -> Fields {
    fields
        .into_iter()
        .map(|(name, value)| (name, normalize_value(value)))
        .collect()
}
