//! Flattening validated results into spreadsheet rows.
//!
//! One row is produced per disclosure item, emission, reduction and target.
//! Every column is a scalar so the rows can be written by any tabular
//! writer (the CLI uses `csv`).

use serde::Serialize;

use crate::evidence::Evidence;
use crate::labels::calendar_year;
use crate::types::{DisclosureItem, Scope};
use crate::validator::ValidatedExtraction;

/// Separator between joined evidence quotes and target scopes.
pub const JOIN_SEPARATOR: &str = " | ";

/// Record kind of a sheet row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    #[default]
    Disclosure,
    Emission,
    Reduction,
    Target,
}

/// A flat spreadsheet row.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SheetRow {
    pub issuer_id: Option<String>,
    pub kind: RowKind,

    /// Position of the record within its list
    pub index: usize,

    pub scope: String,
    pub fiscal_year_label: Option<String>,
    pub calendar_year: Option<i64>,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub scope3_category: Option<i64>,
    pub scope3_category_name: Option<String>,
    pub baseline_year: Option<i64>,
    pub achievement_year: Option<i64>,
    pub base_year: Option<i64>,
    pub target_year: Option<i64>,
    pub reduction_rate: Option<f64>,
    pub rate_basis: Option<String>,
    pub goal_kind: Option<String>,
    pub note: Option<String>,
    pub evidence_count: usize,
    pub table_like: bool,
    pub evidence_quotes: String,
}

impl SheetRow {
    fn with_evidence(mut self, evidence: &[Evidence]) -> Self {
        self.evidence_count = evidence.len();
        self.table_like = evidence.iter().any(|e| e.is_table_like);
        self.evidence_quotes = evidence
            .iter()
            .map(|e| e.quote.as_str())
            .collect::<Vec<_>>()
            .join(JOIN_SEPARATOR);
        self
    }
}

/// Flatten a validated result into rows, in document order: disclosure
/// items, then emissions, reductions and targets.
pub fn flatten(validated: &ValidatedExtraction) -> Vec<SheetRow> {
    let issuer_id = validated.issuer_id.clone();
    let base = || SheetRow {
        issuer_id: issuer_id.clone(),
        ..SheetRow::default()
    };

    let mut rows = Vec::new();

    for (index, item) in validated.disclosure_items.iter().enumerate() {
        let row = SheetRow {
            kind: RowKind::Disclosure,
            index,
            scope: item.to_string(),
            ..base()
        };

        let row = match (item, item.scope(), &validated.disclosure_absence) {
            (DisclosureItem::None, _, Some(absence)) => SheetRow {
                note: Some(absence.reason.as_str().to_string()),
                ..row
            }
            .with_evidence(&absence.evidence),
            (_, Some(scope), _) => {
                let evidence: Vec<Evidence> = validated
                    .disclosure_evidence
                    .iter()
                    .filter(|entry| entry.item == scope)
                    .flat_map(|entry| entry.evidence.iter().cloned())
                    .collect();
                row.with_evidence(&evidence)
            }
            _ => row,
        };
        rows.push(row);
    }

    for (index, emission) in validated.emissions.iter().enumerate() {
        rows.push(
            SheetRow {
                kind: RowKind::Emission,
                index,
                scope: emission.scope.to_string(),
                fiscal_year_label: Some(emission.fiscal_year_label.clone()),
                calendar_year: calendar_year(&emission.fiscal_year_label).map(i64::from),
                value: Some(emission.value),
                unit: Some(emission.unit.clone()),
                scope3_category: emission.scope3_category,
                scope3_category_name: emission.scope3_category_name.clone(),
                ..base()
            }
            .with_evidence(&emission.evidence),
        );
    }

    for (index, reduction) in validated.reductions.iter().enumerate() {
        rows.push(
            SheetRow {
                kind: RowKind::Reduction,
                index,
                scope: reduction.scope.to_string(),
                calendar_year: Some(reduction.achievement_year),
                baseline_year: Some(reduction.baseline_year),
                achievement_year: Some(reduction.achievement_year),
                reduction_rate: Some(reduction.reduction_rate),
                rate_basis: Some(reduction.rate_basis.as_str().to_string()),
                ..base()
            }
            .with_evidence(&reduction.evidence),
        );
    }

    for (index, target) in validated.targets.iter().enumerate() {
        rows.push(
            SheetRow {
                kind: RowKind::Target,
                index,
                scope: join_scopes(&target.scopes),
                calendar_year: Some(target.target_year),
                base_year: Some(target.base_year),
                target_year: Some(target.target_year),
                reduction_rate: target.reduction_rate,
                goal_kind: Some(target.goal_kind.to_string()),
                ..base()
            }
            .with_evidence(&target.evidence),
        );
    }

    tracing::debug!(rows = rows.len(), "Flattened extraction result");
    rows
}

fn join_scopes(scopes: &[Scope]) -> String {
    scopes
        .iter()
        .map(Scope::as_str)
        .collect::<Vec<_>>()
        .join(JOIN_SEPARATOR)
}
