//! Conditional requirements.
//!
//! Reduction goals must state their rate. Reduction rates computed from two
//! emission values must carry both values and evidence for each of them.

use crate::config::ValidatorConfig;
use crate::types::{derive_reduction_rate, ExtractionResult, GoalKind, RateBasis, Reduction};
use crate::violation::{Rule, Violation};

use super::Check;

/// Target rate requirement and derived reduction rate support.
pub struct RequirementCheck;

impl RequirementCheck {
    pub fn new() -> Self {
        Self
    }

    fn check_derived(
        &self,
        path: &str,
        reduction: &Reduction,
        config: &ValidatorConfig,
        out: &mut Vec<Violation>,
    ) {
        if reduction.evidence.len() < 2 {
            out.push(Violation::new(
                format!("{}.evidence", path),
                Rule::DerivedRate,
                format!(
                    "a derived rate needs evidence for both endpoint values, found {} entr{}",
                    reduction.evidence.len(),
                    if reduction.evidence.len() == 1 { "y" } else { "ies" }
                ),
            ));
        }

        let (baseline, achieved) = match (reduction.baseline_value, reduction.achievement_value) {
            (Some(b), Some(a)) => (b, a),
            (b, a) => {
                for (field, value) in [("baseline_value", b), ("achievement_value", a)] {
                    if value.is_none() {
                        out.push(Violation::new(
                            format!("{}.{}", path, field),
                            Rule::ConditionalRequirement,
                            format!("{} is required when rate_basis is derived", field),
                        ));
                    }
                }
                return;
            }
        };

        match derive_reduction_rate(baseline, achieved) {
            None => out.push(Violation::new(
                format!("{}.baseline_value", path),
                Rule::DerivedRate,
                format!("cannot derive a rate from baseline value {}", baseline),
            )),
            Some(implied) => {
                if (implied - reduction.reduction_rate).abs() > config.derived_rate_tolerance {
                    out.push(Violation::new(
                        format!("{}.reduction_rate", path),
                        Rule::DerivedRate,
                        format!(
                            "reduction_rate {} does not match {:.4} implied by {} -> {}",
                            reduction.reduction_rate, implied, baseline, achieved
                        ),
                    ));
                }
            }
        }
    }
}

impl Default for RequirementCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for RequirementCheck {
    fn name(&self) -> &'static str {
        "requirements"
    }

    fn check(&self, result: &ExtractionResult, config: &ValidatorConfig) -> Vec<Violation> {
        let mut out = Vec::new();

        for (i, target) in result.targets.iter().enumerate() {
            if target.goal_kind == GoalKind::Reduction && target.reduction_rate.is_none() {
                out.push(Violation::new(
                    format!("targets[{}].reduction_rate", i),
                    Rule::ConditionalRequirement,
                    "reduction_rate is required when goal_kind is reduction",
                ));
            }
        }

        for (i, reduction) in result.reductions.iter().enumerate() {
            if reduction.rate_basis == RateBasis::Derived {
                self.check_derived(&format!("reductions[{}]", i), reduction, config, &mut out);
            }
        }

        out
    }
}
