//! # ghg-core
//!
//! Validation of greenhouse-gas disclosure extraction results.
//!
//! An extraction result is the structured record a language model produces
//! after reading the sustainability section of a Japanese annual securities
//! report: which scopes are disclosed, emission amounts, reduction
//! achievements and future targets, each backed by verbatim quotes.
//!
//! ## Guarantees
//!
//! 1. **Two stages**: shape is checked against a JSON Schema first; a
//!    result with structural violations is never checked semantically
//! 2. **Complete reports**: every violation of a stage is reported, not
//!    just the first
//! 3. **Lossless**: an accepted result serializes back to the same data
//!
//! ## Example
//!
//! ```rust,ignore
//! use ghg_core::{candidate, ExtractionValidator};
//!
//! let value = candidate::from_file("extraction.json")?;
//! match ExtractionValidator::new().validate(&value) {
//!     Ok(validated) => println!("{} emissions", validated.emissions.len()),
//!     Err(report) => {
//!         for violation in report.violations() {
//!             println!("{}", violation);
//!         }
//!     }
//! }
//! ```

pub mod candidate;
pub mod checks;
pub mod config;
pub mod evidence;
pub mod flatten;
pub mod graph;
pub mod labels;
pub mod schema;
pub mod types;
pub mod validator;
pub mod violation;

// Re-export main types at crate root
pub use checks::{
    Check, DisclosureCheck, FieldCheck, RequirementCheck, ScopeCoverageCheck, YearOrderCheck,
};
pub use config::ValidatorConfig;
pub use evidence::{Evidence, Span};
pub use flatten::{flatten, RowKind, SheetRow};
pub use graph::{CompanyGraph, GraphSummary, IntegratedGraph, NodeKind, Relation};
pub use schema::{extraction_schema, SchemaError, EXTRACTION_SCHEMA_JSON};
pub use types::{
    derive_reduction_rate, AbsenceReason, DisclosureAbsence, DisclosureEvidence, DisclosureItem,
    Emission, ExtractionResult, GoalKind, RateBasis, Reduction, Scope, Target,
};
pub use validator::{ExtractionValidator, ValidatedExtraction};
pub use violation::{Rule, ValidationReport, Violation, ViolationClass};

use thiserror::Error;

/// Errors raised while loading candidates or configuration.
#[derive(Error, Debug)]
pub enum GhgError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}

/// Validate a candidate with the default configuration.
///
/// This is the main entry point for one-off validation. Build an
/// [`ExtractionValidator`] to reuse a custom [`ValidatorConfig`].
pub fn validate(candidate: &serde_json::Value) -> Result<ValidatedExtraction, ValidationReport> {
    ExtractionValidator::new().validate(candidate)
}
