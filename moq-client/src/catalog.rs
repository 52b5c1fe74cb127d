use serde_json::Value;

use crate::error::{Error, Result};

/// Decoded broadcast catalog: a JSON object describing the broadcast's
/// tracks.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog(Value);

impl Catalog {
    pub fn decode(raw: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(raw)?;
        if !value.is_object() {
            return Err(Error::InvalidCatalog("expected a JSON object"));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Names listed under `tracks`, skipping entries without one.
    pub fn tracks(&self) -> Vec<&str> {
        self.0
            .get("tracks")
            .and_then(Value::as_array)
            .map(|tracks| {
                tracks
                    .iter()
                    .filter_map(|t| t.get("name").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }
}
