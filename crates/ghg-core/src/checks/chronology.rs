//! Year ordering for reductions and targets.

use crate::config::ValidatorConfig;
use crate::types::ExtractionResult;
use crate::violation::{Rule, Violation};

use super::Check;

/// Reductions may not end before they start; targets must lie strictly
/// after their base year.
pub struct YearOrderCheck;

impl YearOrderCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for YearOrderCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for YearOrderCheck {
    fn name(&self) -> &'static str {
        "year_order"
    }

    fn check(&self, result: &ExtractionResult, _config: &ValidatorConfig) -> Vec<Violation> {
        let reductions = result
            .reductions
            .iter()
            .enumerate()
            .filter(|(_, r)| r.achievement_year < r.baseline_year)
            .map(|(i, r)| {
                Violation::new(
                    format!("reductions[{}].achievement_year", i),
                    Rule::YearOrdering,
                    format!(
                        "achievement_year {} is before baseline_year {}",
                        r.achievement_year, r.baseline_year
                    ),
                )
            });

        let targets = result
            .targets
            .iter()
            .enumerate()
            .filter(|(_, t)| t.target_year <= t.base_year)
            .map(|(i, t)| {
                Violation::new(
                    format!("targets[{}].target_year", i),
                    Rule::YearOrdering,
                    format!(
                        "target_year {} must be after base_year {}",
                        t.target_year, t.base_year
                    ),
                )
            });

        reductions.chain(targets).collect()
    }
}
