//! Scope coverage: every scope used by a record must be disclosed.

use std::collections::{BTreeMap, HashSet};

use crate::config::ValidatorConfig;
use crate::types::{DisclosureItem, ExtractionResult, Scope};
use crate::violation::{Rule, Violation};

use super::Check;

/// Referenced scopes must be a subset of `disclosure_items`.
pub struct ScopeCoverageCheck;

impl ScopeCoverageCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ScopeCoverageCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl Check for ScopeCoverageCheck {
    fn name(&self) -> &'static str {
        "scope_coverage"
    }

    fn check(&self, result: &ExtractionResult, _config: &ValidatorConfig) -> Vec<Violation> {
        // Under NONE every record is already rejected by DisclosureCheck.
        if result.declares_none() {
            return Vec::new();
        }

        let disclosed: HashSet<Scope> = result
            .disclosure_items
            .iter()
            .filter_map(DisclosureItem::scope)
            .collect();

        // One violation per missing scope, listing where it is referenced.
        let mut missing: BTreeMap<Scope, Vec<String>> = BTreeMap::new();
        for (scope, path) in result.referenced_scopes() {
            if !disclosed.contains(&scope) {
                missing.entry(scope).or_default().push(path);
            }
        }

        missing
            .into_iter()
            .map(|(scope, paths)| {
                Violation::new(
                    "disclosure_items",
                    Rule::ScopeCoverage,
                    format!(
                        "scope {} is referenced by {} but missing from disclosure_items",
                        scope,
                        paths.join(", ")
                    ),
                )
                .with_subject(scope.as_str())
            })
            .collect()
    }
}
