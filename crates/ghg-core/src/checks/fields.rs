//! Field-level rules: ranges, non-empty lists, duplicates and evidence shape.

use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;

use crate::config::ValidatorConfig;
use crate::evidence::Evidence;
use crate::types::{Emission, ExtractionResult, Reduction, Target};
use crate::violation::{Rule, Violation};

use super::Check;

/// Per-field rules that need no knowledge of sibling records.
pub struct FieldCheck;

impl FieldCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FieldCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for FieldCheck {
    fn name(&self) -> &'static str {
        "fields"
    }

    fn check(&self, result: &ExtractionResult, config: &ValidatorConfig) -> Vec<Violation> {
        let mut out = Vec::new();

        if result.disclosure_items.is_empty() {
            out.push(Violation::new(
                "disclosure_items",
                Rule::NonEmpty,
                "disclosure_items must contain at least one item",
            ));
        }
        check_duplicates("disclosure_items", &result.disclosure_items, &mut out);

        for (i, entry) in result.disclosure_evidence.iter().enumerate() {
            let path = format!("disclosure_evidence[{}].evidence", i);
            check_evidence_list(&path, &entry.evidence, true, config, &mut out);
        }

        if let Some(absence) = &result.disclosure_absence {
            // Emptiness depends on the reason and is judged by DisclosureCheck.
            check_evidence_list("disclosure_absence.evidence", &absence.evidence, false, config, &mut out);
        }

        for (i, emission) in result.emissions.iter().enumerate() {
            check_emission(&format!("emissions[{}]", i), emission, config, &mut out);
        }

        for (i, reduction) in result.reductions.iter().enumerate() {
            check_reduction(&format!("reductions[{}]", i), reduction, config, &mut out);
        }

        for (i, target) in result.targets.iter().enumerate() {
            check_target(&format!("targets[{}]", i), target, config, &mut out);
        }

        out
    }
}

fn check_emission(path: &str, emission: &Emission, config: &ValidatorConfig, out: &mut Vec<Violation>) {
    if !emission.value.is_finite() || emission.value < 0.0 {
        out.push(Violation::new(
            format!("{}.value", path),
            Rule::Range,
            format!("emission value must be a non-negative number, got {}", emission.value),
        ));
    }

    if let Some(category) = emission.scope3_category {
        if !(1..=15).contains(&category) {
            out.push(Violation::new(
                format!("{}.scope3_category", path),
                Rule::Range,
                format!("scope 3 category must be between 1 and 15, got {}", category),
            ));
        }
    }

    check_evidence_list(&format!("{}.evidence", path), &emission.evidence, true, config, out);
}

fn check_reduction(path: &str, reduction: &Reduction, config: &ValidatorConfig, out: &mut Vec<Violation>) {
    check_year(&format!("{}.baseline_year", path), reduction.baseline_year, config, out);
    check_year(&format!("{}.achievement_year", path), reduction.achievement_year, config, out);

    if !(-1.0..=1.0).contains(&reduction.reduction_rate) {
        out.push(Violation::new(
            format!("{}.reduction_rate", path),
            Rule::Range,
            format!(
                "reduction rate must be between -1 and 1, got {}",
                reduction.reduction_rate
            ),
        ));
    }

    for (field, value) in [
        ("baseline_value", reduction.baseline_value),
        ("achievement_value", reduction.achievement_value),
    ] {
        if let Some(value) = value {
            if !value.is_finite() || value < 0.0 {
                out.push(Violation::new(
                    format!("{}.{}", path, field),
                    Rule::Range,
                    format!("{} must be a non-negative number, got {}", field, value),
                ));
            }
        }
    }

    check_evidence_list(&format!("{}.evidence", path), &reduction.evidence, true, config, out);
}

fn check_target(path: &str, target: &Target, config: &ValidatorConfig, out: &mut Vec<Violation>) {
    if target.scopes.is_empty() {
        out.push(Violation::new(
            format!("{}.scopes", path),
            Rule::NonEmpty,
            "target must cover at least one scope",
        ));
    }
    check_duplicates(&format!("{}.scopes", path), &target.scopes, out);

    check_year(&format!("{}.base_year", path), target.base_year, config, out);
    check_year(&format!("{}.target_year", path), target.target_year, config, out);

    if let Some(rate) = target.reduction_rate {
        if !(0.0..=1.0).contains(&rate) {
            out.push(Violation::new(
                format!("{}.reduction_rate", path),
                Rule::Range,
                format!("target reduction rate must be between 0 and 1, got {}", rate),
            ));
        }
    }

    check_evidence_list(&format!("{}.evidence", path), &target.evidence, true, config, out);
}

fn check_year(path: &str, year: i64, config: &ValidatorConfig, out: &mut Vec<Violation>) {
    if !config.year_in_range(year) {
        out.push(Violation::new(
            path,
            Rule::Range,
            format!(
                "year must be between {} and {}, got {}",
                config.year_min, config.year_max, year
            ),
        ));
    }
}

fn check_duplicates<T>(path: &str, items: &[T], out: &mut Vec<Violation>)
where
    T: Eq + Hash + Display,
{
    let mut seen = HashSet::new();
    for (i, item) in items.iter().enumerate() {
        if !seen.insert(item) {
            out.push(
                Violation::new(
                    format!("{}[{}]", path, i),
                    Rule::Duplicate,
                    format!("{} appears more than once", item),
                )
                .with_subject(item.to_string()),
            );
        }
    }
}

pub(crate) fn check_evidence_list(
    path: &str,
    evidence: &[Evidence],
    require_non_empty: bool,
    config: &ValidatorConfig,
    out: &mut Vec<Violation>,
) {
    if require_non_empty && evidence.is_empty() {
        out.push(Violation::new(
            path,
            Rule::NonEmpty,
            "at least one evidence entry is required",
        ));
    }

    for (i, entry) in evidence.iter().enumerate() {
        check_evidence(&format!("{}[{}]", path, i), entry, config, out);
    }
}

fn check_evidence(path: &str, evidence: &Evidence, config: &ValidatorConfig, out: &mut Vec<Violation>) {
    let len = evidence.quote_len();
    if len < config.quote_min_chars || len > config.quote_max_chars {
        out.push(Violation::new(
            format!("{}.quote", path),
            Rule::QuoteLength,
            format!(
                "quote must be {}-{} characters, got {}",
                config.quote_min_chars, config.quote_max_chars, len
            ),
        ));
    }

    if !evidence.is_located() {
        out.push(Violation::new(
            path,
            Rule::EvidencePosition,
            "evidence needs char_start/char_end or line_start/line_end",
        ));
    }

    for (field, value, min) in [
        ("char_start", evidence.char_start, 0),
        ("char_end", evidence.char_end, 0),
        ("line_start", evidence.line_start, 1),
        ("line_end", evidence.line_end, 1),
    ] {
        if let Some(value) = value {
            if value < min {
                out.push(Violation::new(
                    format!("{}.{}", path, field),
                    Rule::Range,
                    format!("{} must be at least {}, got {}", field, min, value),
                ));
            }
        }
    }

    if let Some(span) = evidence.char_span() {
        if !span.is_ordered() {
            out.push(Violation::new(
                format!("{}.char_end", path),
                Rule::EvidencePosition,
                format!("char_end ({}) is before char_start ({})", span.end, span.start),
            ));
        }
    }

    if let Some(span) = evidence.line_span() {
        if !span.is_ordered() {
            out.push(Violation::new(
                format!("{}.line_end", path),
                Rule::EvidencePosition,
                format!("line_end ({}) is before line_start ({})", span.end, span.start),
            ));
        }
    }
}
