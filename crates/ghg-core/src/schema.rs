//! JSON Schema for extraction results.
//!
//! The schema covers shape only: required keys, primitive types, enum
//! membership, unknown keys and the 64-bit limit of integer fields. Ranges
//! and cross-record rules live in [`crate::checks`] so that they can be
//! reported together.

use std::sync::OnceLock;

use jsonschema::error::ValidationErrorKind;
use thiserror::Error;

use crate::violation::{join_path, pointer_to_path, Rule, Violation};

/// Embedded extraction schema (loaded at compile time).
pub const EXTRACTION_SCHEMA_JSON: &str = include_str!("../../../schema/extraction.schema.json");

/// Compiled JSON Schema validator (initialized once, reused).
static COMPILED_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

/// Errors from schema loading.
#[derive(Error, Debug, Clone)]
pub enum SchemaError {
    #[error("Failed to load schema: {0}")]
    LoadError(String),
}

/// Get or initialize the compiled schema validator.
fn get_validator() -> Result<&'static jsonschema::Validator, SchemaError> {
    let result = COMPILED_SCHEMA.get_or_init(|| {
        let schema_value: serde_json::Value = match serde_json::from_str(EXTRACTION_SCHEMA_JSON) {
            Ok(v) => v,
            Err(e) => return Err(format!("Invalid schema JSON: {}", e)),
        };

        match jsonschema::options().build(&schema_value) {
            Ok(v) => Ok(v),
            Err(e) => Err(format!("Failed to compile schema: {}", e)),
        }
    });

    match result {
        Ok(v) => Ok(v),
        Err(e) => Err(SchemaError::LoadError(e.clone())),
    }
}

/// The schema as a JSON value, for printing or prompt embedding.
pub fn extraction_schema() -> Result<serde_json::Value, SchemaError> {
    serde_json::from_str(EXTRACTION_SCHEMA_JSON)
        .map_err(|e| SchemaError::LoadError(format!("Invalid schema JSON: {}", e)))
}

/// Check a candidate against the schema, collecting every structural
/// violation.
pub fn structural_violations(candidate: &serde_json::Value) -> Result<Vec<Violation>, SchemaError> {
    let validator = get_validator()?;

    let violations = validator
        .iter_errors(candidate)
        .map(|e| {
            let schema_path = e.schema_path.to_string();
            let keyword = schema_path.rsplit('/').next().unwrap_or_default();
            let rule = Rule::from_schema_keyword(keyword);
            let mut field_path = pointer_to_path(&e.instance_path.to_string());

            if let ValidationErrorKind::Required { property } = &e.kind {
                if let Some(name) = property.as_str() {
                    field_path = join_path(&field_path, name);
                }
            }

            let violation = Violation::new(field_path, rule, e.to_string());
            match (rule, e.instance.as_str()) {
                (Rule::EnumMembership, Some(value)) => violation.with_subject(value),
                _ => violation,
            }
        })
        .collect();

    Ok(violations)
}

/// Check if a candidate matches the schema.
///
/// Returns false if the schema cannot be loaded. Use
/// [`structural_violations`] for details.
pub fn is_well_formed(candidate: &serde_json::Value) -> bool {
    get_validator()
        .map(|v| v.is_valid(candidate))
        .unwrap_or(false)
}
