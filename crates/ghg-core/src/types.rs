//! Core record types for GHG disclosure extraction results.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::evidence::Evidence;

/// A GHG-accounting scope category as reported by an issuer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// Direct emissions
    #[serde(rename = "S1")]
    S1,

    /// Indirect emissions from purchased energy
    #[serde(rename = "S2")]
    S2,

    /// Other value-chain emissions
    #[serde(rename = "S3")]
    S3,

    /// Scope 1 and 2 reported as a single figure
    #[serde(rename = "S1_PLUS_2")]
    S1Plus2,

    /// Scope 1, 2 and 3 reported as a single figure
    #[serde(rename = "S1_PLUS_2_PLUS_3")]
    S1Plus2Plus3,
}

impl Scope {
    /// All scopes, in declaration order.
    pub const ALL: [Scope; 5] = [
        Scope::S1,
        Scope::S2,
        Scope::S3,
        Scope::S1Plus2,
        Scope::S1Plus2Plus3,
    ];

    /// Wire name of the scope.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::S1 => "S1",
            Scope::S2 => "S2",
            Scope::S3 => "S3",
            Scope::S1Plus2 => "S1_PLUS_2",
            Scope::S1Plus2Plus3 => "S1_PLUS_2_PLUS_3",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A category of GHG information confirmed present in a document,
/// or its explicit absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DisclosureItem {
    #[serde(rename = "S1")]
    S1,

    #[serde(rename = "S2")]
    S2,

    #[serde(rename = "S3")]
    S3,

    #[serde(rename = "S1_PLUS_2")]
    S1Plus2,

    #[serde(rename = "S1_PLUS_2_PLUS_3")]
    S1Plus2Plus3,

    /// Nothing is disclosed. Must be the only item when present.
    #[serde(rename = "NONE")]
    None,
}

impl DisclosureItem {
    /// The scope this item discloses, or `None` for [`DisclosureItem::None`].
    pub fn scope(&self) -> Option<Scope> {
        match self {
            DisclosureItem::S1 => Some(Scope::S1),
            DisclosureItem::S2 => Some(Scope::S2),
            DisclosureItem::S3 => Some(Scope::S3),
            DisclosureItem::S1Plus2 => Some(Scope::S1Plus2),
            DisclosureItem::S1Plus2Plus3 => Some(Scope::S1Plus2Plus3),
            DisclosureItem::None => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, DisclosureItem::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self.scope() {
            Some(scope) => scope.as_str(),
            None => "NONE",
        }
    }
}

impl From<Scope> for DisclosureItem {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::S1 => DisclosureItem::S1,
            Scope::S2 => DisclosureItem::S2,
            Scope::S3 => DisclosureItem::S3,
            Scope::S1Plus2 => DisclosureItem::S1Plus2,
            Scope::S1Plus2Plus3 => DisclosureItem::S1Plus2Plus3,
        }
    }
}

impl fmt::Display for DisclosureItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of forward-looking commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    /// Percentage reduction against a base year
    Reduction,
    CarbonNeutral,
    NetZero,
}

impl GoalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalKind::Reduction => "reduction",
            GoalKind::CarbonNeutral => "carbon_neutral",
            GoalKind::NetZero => "net_zero",
        }
    }
}

impl fmt::Display for GoalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a document is recorded as disclosing nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsenceReason {
    /// The document states that no GHG figures are disclosed
    ExplicitStatement,

    /// No GHG figures could be located
    NoTracesFound,
}

impl AbsenceReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            AbsenceReason::ExplicitStatement => "explicit_statement",
            AbsenceReason::NoTracesFound => "no_traces_found",
        }
    }
}

/// How a reduction rate was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateBasis {
    /// The rate is quoted directly in the source
    #[default]
    Quoted,

    /// The rate was computed from two emission values in the source
    Derived,
}

impl RateBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateBasis::Quoted => "quoted",
            RateBasis::Derived => "derived",
        }
    }
}

/// A single reported GHG quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emission {
    pub scope: Scope,

    /// Year label as written in the source (e.g. "2023年度")
    pub fiscal_year_label: String,

    pub value: f64,

    /// Unit as written in the source (e.g. "t-CO2")
    pub unit: String,

    /// Scope 3 category code (1-15)
    #[serde(
        default,
        deserialize_with = "integral::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub scope3_category: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope3_category_name: Option<String>,

    pub evidence: Vec<Evidence>,
}

/// A realized change in emissions between two years for one scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reduction {
    pub scope: Scope,
    #[serde(deserialize_with = "integral::required")]
    pub baseline_year: i64,
    #[serde(deserialize_with = "integral::required")]
    pub achievement_year: i64,

    /// Signed fraction; positive means emissions decreased
    pub reduction_rate: f64,

    #[serde(default)]
    pub rate_basis: RateBasis,

    /// Baseline emission value, required for derived rates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_value: Option<f64>,

    /// Achievement-year emission value, required for derived rates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achievement_value: Option<f64>,

    pub evidence: Vec<Evidence>,
}

impl Reduction {
    /// Rate implied by the endpoint values, when both are present.
    pub fn implied_rate(&self) -> Option<f64> {
        derive_reduction_rate(self.baseline_value?, self.achievement_value?)
    }
}

/// A forward-looking reduction commitment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub scopes: Vec<Scope>,
    #[serde(deserialize_with = "integral::required")]
    pub base_year: i64,
    #[serde(deserialize_with = "integral::required")]
    pub target_year: i64,

    /// Fraction in [0, 1]; required for [`GoalKind::Reduction`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reduction_rate: Option<f64>,

    pub goal_kind: GoalKind,
    pub evidence: Vec<Evidence>,
}

/// Evidence that a disclosure item is present in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisclosureEvidence {
    pub item: Scope,
    pub evidence: Vec<Evidence>,
}

/// Record of a document disclosing no GHG figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisclosureAbsence {
    pub reason: AbsenceReason,

    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

/// A complete extraction result for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer_id: Option<String>,

    pub disclosure_items: Vec<DisclosureItem>,

    #[serde(default)]
    pub disclosure_evidence: Vec<DisclosureEvidence>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disclosure_absence: Option<DisclosureAbsence>,

    #[serde(default)]
    pub emissions: Vec<Emission>,

    #[serde(default)]
    pub reductions: Vec<Reduction>,

    #[serde(default)]
    pub targets: Vec<Target>,
}

impl ExtractionResult {
    /// Whether the result records that nothing is disclosed.
    pub fn declares_none(&self) -> bool {
        self.disclosure_items.iter().any(DisclosureItem::is_none)
    }

    /// Every scope referenced by emissions, reductions and targets,
    /// paired with the field path of the reference.
    pub fn referenced_scopes(&self) -> Vec<(Scope, String)> {
        let emissions = self
            .emissions
            .iter()
            .enumerate()
            .map(|(i, e)| (e.scope, format!("emissions[{}].scope", i)));

        let reductions = self
            .reductions
            .iter()
            .enumerate()
            .map(|(i, r)| (r.scope, format!("reductions[{}].scope", i)));

        let targets = self.targets.iter().enumerate().flat_map(|(i, t)| {
            t.scopes
                .iter()
                .enumerate()
                .map(move |(j, s)| (*s, format!("targets[{}].scopes[{}]", i, j)))
        });

        emissions.chain(reductions).chain(targets).collect()
    }
}

/// Integer fields that also accept integral floats such as `2013.0`,
/// which JSON Schema counts as integers.
pub(crate) mod integral {
    use serde::de::{Deserialize, Deserializer, Error};
    use serde_json::Number;

    fn to_i64<E: Error>(number: Number) -> Result<i64, E> {
        if let Some(n) = number.as_i64() {
            return Ok(n);
        }
        match number.as_f64() {
            Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                Ok(f as i64)
            }
            _ => Err(E::custom(format!("expected a 64-bit integer, got {}", number))),
        }
    }

    pub fn required<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        to_i64(Number::deserialize(deserializer)?)
    }

    pub fn option<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        Option::<Number>::deserialize(deserializer)?
            .map(to_i64)
            .transpose()
    }
}

/// Reduction rate implied by a baseline and an achievement value.
///
/// Returns `None` when the baseline is not a positive finite number.
pub fn derive_reduction_rate(baseline: f64, achieved: f64) -> Option<f64> {
    if !baseline.is_finite() || !achieved.is_finite() || baseline <= 0.0 {
        return None;
    }
    Some((baseline - achieved) / baseline)
}
