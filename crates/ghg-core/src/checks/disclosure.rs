//! Disclosure summary rules.
//!
//! `NONE` must stand alone and rule out every other record, and each
//! disclosed scope must be backed by at least one evidence entry.

use std::collections::HashSet;

use crate::config::ValidatorConfig;
use crate::types::{AbsenceReason, DisclosureItem, ExtractionResult, Scope};
use crate::violation::{Rule, Violation};

use super::Check;

/// NONE exclusivity, absence presence and evidence coverage of items.
pub struct DisclosureCheck;

impl DisclosureCheck {
    pub fn new() -> Self {
        Self
    }

    fn check_none_exclusivity(&self, result: &ExtractionResult, out: &mut Vec<Violation>) {
        if result.disclosure_items.len() > 1 {
            out.push(
                Violation::new(
                    "disclosure_items",
                    Rule::NoneExclusivity,
                    format!(
                        "NONE must be the only disclosure item, found {} items",
                        result.disclosure_items.len()
                    ),
                )
                .with_subject(DisclosureItem::None.as_str()),
            );
        }

        let records = [
            ("emissions", result.emissions.len()),
            ("reductions", result.reductions.len()),
            ("targets", result.targets.len()),
            ("disclosure_evidence", result.disclosure_evidence.len()),
        ];

        for (field, count) in records {
            if count > 0 {
                out.push(Violation::new(
                    field,
                    Rule::NoneExclusivity,
                    format!(
                        "{} must be empty when nothing is disclosed, found {} record(s)",
                        field, count
                    ),
                ));
            }
        }

        match &result.disclosure_absence {
            None => out.push(Violation::new(
                "disclosure_absence",
                Rule::NoneExclusivity,
                "disclosure_absence is required when disclosure_items is NONE",
            )),
            Some(absence) => {
                if absence.reason == AbsenceReason::ExplicitStatement && absence.evidence.is_empty()
                {
                    out.push(Violation::new(
                        "disclosure_absence.evidence",
                        Rule::NonEmpty,
                        "an explicit statement of non-disclosure must be quoted",
                    ));
                }
            }
        }
    }

    fn check_evidence_coverage(&self, result: &ExtractionResult, out: &mut Vec<Violation>) {
        let covered: HashSet<Scope> = result
            .disclosure_evidence
            .iter()
            .filter(|entry| !entry.evidence.is_empty())
            .map(|entry| entry.item)
            .collect();

        let mut reported = HashSet::new();
        for item in &result.disclosure_items {
            let Some(scope) = item.scope() else {
                continue;
            };

            if !covered.contains(&scope) && reported.insert(scope) {
                out.push(
                    Violation::new(
                        "disclosure_evidence",
                        Rule::EvidenceCoverage,
                        format!("disclosure item {} has no supporting evidence", scope),
                    )
                    .with_subject(scope.as_str()),
                );
            }
        }
    }
}

impl Default for DisclosureCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for DisclosureCheck {
    fn name(&self) -> &'static str {
        "disclosure"
    }

    fn check(&self, result: &ExtractionResult, _config: &ValidatorConfig) -> Vec<Violation> {
        let mut out = Vec::new();

        if result.declares_none() {
            self.check_none_exclusivity(result, &mut out);
        } else if result.disclosure_absence.is_some() {
            out.push(Violation::new(
                "disclosure_absence",
                Rule::NoneExclusivity,
                "disclosure_absence is only allowed when disclosure_items is NONE",
            ));
        }

        self.check_evidence_coverage(result, &mut out);

        out
    }
}
