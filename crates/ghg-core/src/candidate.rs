//! Reading candidate documents from JSON or YAML.

use std::fs;
use std::path::Path;

use crate::GhgError;

/// Parse a candidate from a JSON string.
pub fn from_json(json: &str) -> Result<serde_json::Value, GhgError> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a candidate from a YAML string.
pub fn from_yaml(yaml: &str) -> Result<serde_json::Value, GhgError> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Read a candidate file. `.yaml` and `.yml` files are parsed as YAML,
/// everything else as JSON.
pub fn from_file(path: impl AsRef<Path>) -> Result<serde_json::Value, GhgError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => from_yaml(&contents),
        _ => from_json(&contents),
    }
}
