//! Extension-blob value model.
//!
//! The directory promotes a fixed set of region attributes to storage
//! columns; everything else travels in a self-describing structured blob.
//! The blob is a JSON map tree (nested maps, strings, integers, floats,
//! booleans) with 3-component vectors encoded as `[x, y, z]` arrays, and it
//! round-trips losslessly through the record codec.

use serde_json::Value;

/// The extension payload attached to a region record.
pub type BlobMap = serde_json::Map<String, Value>;

/// A 3-component vector as stored inside extension blobs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Blob encoding: a 3-element JSON array.
    #[must_use]
    pub fn to_value(self) -> Value {
        Value::from(vec![self.x, self.y, self.z])
    }

    /// Decode from the blob encoding. `None` unless the value is an array of
    /// exactly three numbers.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let items = value.as_array()?;
        if items.len() != 3 {
            return None;
        }
        Some(Self {
            x: items[0].as_f64()?,
            y: items[1].as_f64()?,
            z: items[2].as_f64()?,
        })
    }
}
