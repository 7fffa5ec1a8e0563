//! Metadata response parsing.
//!
//! Expected shape: `{ "version": "<string>", "mappings": { "ZStandard": "<url>" } }`.
//! Extra fields are ignored; anything missing or of the wrong type is malformed.

use crate::error::Failure;
use serde_json::Value;

/// Current mapping version and where to download it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingDescriptor {
    pub version: String,
    pub download_url: String,
}

impl MappingDescriptor {
    /// Parse a metadata body, picking the download URL stored under `compression`
    /// in the `mappings` object.
    pub fn parse(body: &[u8], compression: &str) -> Result<Self, Failure> {
        let root: Value = serde_json::from_slice(body)
            .map_err(|e| Failure::MalformedResponse(format!("invalid JSON: {}", e)))?;

        let version = root
            .get("version")
            .and_then(Value::as_str)
            .ok_or_else(|| Failure::MalformedResponse("missing string field `version`".into()))?;

        let mappings = root
            .get("mappings")
            .and_then(Value::as_object)
            .ok_or_else(|| Failure::MalformedResponse("missing object field `mappings`".into()))?;

        let download_url = mappings
            .get(compression)
            .and_then(Value::as_str)
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                let available: Vec<&str> = mappings.keys().map(String::as_str).collect();
                Failure::MalformedResponse(format!(
                    "missing `{}` URL in `mappings` (available: [{}])",
                    compression,
                    available.join(", ")
                ))
            })?;

        Ok(MappingDescriptor {
            version: version.to_string(),
            download_url: download_url.trim().to_string(),
        })
    }
}
