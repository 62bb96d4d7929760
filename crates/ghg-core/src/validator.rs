//! The extraction record validator.
//!
//! Validation runs in two stages:
//! 1. **Structural**: the candidate is checked against the embedded JSON
//!    Schema and deserialized into typed records. Unknown keys are reported
//!    but do not stop deserialization; anything else that prevents it ends
//!    validation here, since the typed rules cannot run on a value of the
//!    wrong shape.
//! 2. **Semantic**: every [`Check`] runs over the typed result. Its
//!    violations are reported together with any structural ones.
//!
//! Nothing is repaired or coerced. A candidate either comes back as an
//! immutable [`ValidatedExtraction`] or as a [`ValidationReport`].

use std::ops::Deref;

use serde::Serialize;

use crate::checks::{default_checks, Check};
use crate::config::ValidatorConfig;
use crate::schema::{is_well_formed, structural_violations};
use crate::types::ExtractionResult;
use crate::violation::{Rule, ValidationReport, Violation};

/// An extraction result that satisfied every rule.
///
/// Only the validator can construct one. It dereferences to the underlying
/// [`ExtractionResult`] for read access and serializes to the same shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidatedExtraction(ExtractionResult);

impl ValidatedExtraction {
    pub fn result(&self) -> &ExtractionResult {
        &self.0
    }

    pub fn into_inner(self) -> ExtractionResult {
        self.0
    }

    /// Serialize back to the input JSON shape.
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(&self.0)
    }
}

impl Deref for ValidatedExtraction {
    type Target = ExtractionResult;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Validates candidate extraction results against the schema and the
/// consistency rules.
pub struct ExtractionValidator {
    config: ValidatorConfig,
    checks: Vec<Box<dyn Check>>,
}

impl ExtractionValidator {
    /// Create a validator with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    pub fn with_config(config: ValidatorConfig) -> Self {
        Self {
            config,
            checks: default_checks(),
        }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate an untyped candidate, typically parsed JSON.
    pub fn validate(
        &self,
        candidate: &serde_json::Value,
    ) -> Result<ValidatedExtraction, ValidationReport> {
        let structural = if is_well_formed(candidate) {
            Vec::new()
        } else {
            match structural_violations(candidate) {
                Ok(violations) => violations,
                Err(e) => {
                    // Deserialization below still rejects malformed input.
                    tracing::error!(error = %e, "Extraction schema unavailable");
                    Vec::new()
                }
            }
        };

        let result: ExtractionResult = match serde_json::from_value(candidate.clone()) {
            Ok(result) => result,
            Err(e) if structural.is_empty() => {
                return Err(ValidationReport::new(vec![Violation::new(
                    "",
                    Rule::Shape,
                    e.to_string(),
                )]));
            }
            Err(_) => {
                tracing::debug!(count = structural.len(), "Candidate failed structural validation");
                return Err(ValidationReport::new(structural));
            }
        };

        self.finish(result, structural)
    }

    /// Validate an already-typed result.
    pub fn validate_result(
        &self,
        result: ExtractionResult,
    ) -> Result<ValidatedExtraction, ValidationReport> {
        self.finish(result, Vec::new())
    }

    fn finish(
        &self,
        result: ExtractionResult,
        mut violations: Vec<Violation>,
    ) -> Result<ValidatedExtraction, ValidationReport> {
        violations.extend(self.check(&result));

        if violations.is_empty() {
            tracing::debug!(
                issuer = result.issuer_id.as_deref().unwrap_or("-"),
                emissions = result.emissions.len(),
                reductions = result.reductions.len(),
                targets = result.targets.len(),
                "Extraction result accepted"
            );
            Ok(ValidatedExtraction(result))
        } else {
            tracing::debug!(
                issuer = result.issuer_id.as_deref().unwrap_or("-"),
                count = violations.len(),
                "Extraction result rejected"
            );
            Err(ValidationReport::new(violations))
        }
    }

    /// Run every semantic check and return all violations.
    pub fn check(&self, result: &ExtractionResult) -> Vec<Violation> {
        self.checks
            .iter()
            .flat_map(|check| {
                let violations = check.check(result, &self.config);
                if !violations.is_empty() {
                    tracing::trace!(check = check.name(), count = violations.len(), "Check reported violations");
                }
                violations
            })
            .collect()
    }
}

impl Default for ExtractionValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::ViolationClass;
    use serde_json::json;

    fn accepted_candidate() -> serde_json::Value {
        json!({
            "disclosure_items": ["S1"],
            "emissions": [{
                "scope": "S1",
                "fiscal_year_label": "2023年度",
                "value": 1234.5,
                "unit": "t-CO2",
                "evidence": [{"quote": "当社のCO2排出量は1,234.5t-CO2", "char_start": 10, "char_end": 30}]
            }],
            "disclosure_evidence": [{
                "item": "S1",
                "evidence": [{"quote": "スコープ1排出量を開示", "char_start": 0, "char_end": 9}]
            }]
        })
    }

    #[test]
    fn test_accepts_consistent_candidate() {
        let validated = ExtractionValidator::new()
            .validate(&accepted_candidate())
            .unwrap();
        assert_eq!(validated.emissions.len(), 1);
        assert_eq!(validated.emissions[0].value, 1234.5);
    }

    #[test]
    fn test_wrong_shape_skips_semantic_pass() {
        let mut candidate = accepted_candidate();
        candidate["emissions"][0]["scope"] = json!("SCOPE9");
        candidate["emissions"][0]["value"] = json!(-1.0);

        let report = ExtractionValidator::new().validate(&candidate).unwrap_err();
        assert!(report.violations.iter().all(|v| v.class == ViolationClass::Structural));
        assert!(report.has_structural());
    }

    #[test]
    fn test_overflowing_integer_is_structural() {
        let mut candidate = accepted_candidate();
        candidate["emissions"][0]["evidence"][0]["char_end"] = json!(u64::MAX);

        let report = ExtractionValidator::new().validate(&candidate).unwrap_err();
        assert_eq!(report.violations.len(), 1);
        assert!(report.violations[0].is_structural());
        assert_eq!(report.violations[0].field_path, "emissions[0].evidence[0].char_end");
    }

    #[test]
    fn test_unknown_key_reported_with_semantic_violations() {
        let mut candidate = accepted_candidate();
        candidate["extra"] = json!(1);
        candidate["disclosure_items"] = json!(["S2"]);

        let report = ExtractionValidator::new().validate(&candidate).unwrap_err();
        assert!(report.by_rule(Rule::UnknownField).next().is_some());
        assert!(report.names(Rule::ScopeCoverage, "S1"));
        assert!(report.names(Rule::EvidenceCoverage, "S2"));
    }

    #[test]
    fn test_unknown_key_alone_rejects() {
        let mut candidate = accepted_candidate();
        candidate["emissions"][0]["source_page"] = json!(12);

        let report = ExtractionValidator::new().validate(&candidate).unwrap_err();
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].rule, Rule::UnknownField);
    }

    #[test]
    fn test_custom_config_applies() {
        let config = ValidatorConfig {
            quote_max_chars: 10,
            ..ValidatorConfig::default()
        };
        let report = ExtractionValidator::with_config(config)
            .validate(&accepted_candidate())
            .unwrap_err();
        assert!(report
            .violations
            .iter()
            .all(|v| v.rule == Rule::QuoteLength));
        assert!(report
            .violations
            .iter()
            .any(|v| v.field_path == "emissions[0].evidence[0].quote"));
    }

    #[test]
    fn test_validated_serializes_to_input_shape() {
        let candidate = accepted_candidate();
        let validated = ExtractionValidator::new().validate(&candidate).unwrap();
        let value = validated.to_value().unwrap();

        assert_eq!(value["emissions"], {
            let mut emissions = candidate["emissions"].clone();
            emissions[0]["evidence"][0]["is_table_like"] = json!(false);
            emissions
        });
        assert_eq!(value["reductions"], json!([]));
        assert!(value.get("disclosure_absence").is_none());
    }
}
