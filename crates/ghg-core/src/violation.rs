//! Violation descriptors returned by the validator.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Whether a violation concerns the shape of the input or its meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationClass {
    /// Missing field, wrong type, unknown enum value or unknown key
    Structural,

    /// Well-typed input breaking a range or consistency rule
    Semantic,
}

/// The rule a violation breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    // Structural
    MissingField,
    WrongType,
    EnumMembership,
    UnknownField,
    Shape,

    // Field level
    Range,
    NonEmpty,
    Duplicate,
    QuoteLength,
    EvidencePosition,

    // Cross-record consistency
    NoneExclusivity,
    ScopeCoverage,
    EvidenceCoverage,
    YearOrdering,
    ConditionalRequirement,
    DerivedRate,
}

impl Rule {
    pub fn class(&self) -> ViolationClass {
        match self {
            Rule::MissingField
            | Rule::WrongType
            | Rule::EnumMembership
            | Rule::UnknownField
            | Rule::Shape => ViolationClass::Structural,
            _ => ViolationClass::Semantic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::MissingField => "missing_field",
            Rule::WrongType => "wrong_type",
            Rule::EnumMembership => "enum_membership",
            Rule::UnknownField => "unknown_field",
            Rule::Shape => "shape",
            Rule::Range => "range",
            Rule::NonEmpty => "non_empty",
            Rule::Duplicate => "duplicate",
            Rule::QuoteLength => "quote_length",
            Rule::EvidencePosition => "evidence_position",
            Rule::NoneExclusivity => "none_exclusivity",
            Rule::ScopeCoverage => "scope_coverage",
            Rule::EvidenceCoverage => "evidence_coverage",
            Rule::YearOrdering => "year_ordering",
            Rule::ConditionalRequirement => "conditional_requirement",
            Rule::DerivedRate => "derived_rate",
        }
    }

    /// Map a JSON Schema keyword to the structural rule it enforces.
    pub fn from_schema_keyword(keyword: &str) -> Self {
        match keyword {
            "required" => Rule::MissingField,
            "type" => Rule::WrongType,
            "enum" => Rule::EnumMembership,
            "additionalProperties" => Rule::UnknownField,
            _ => Rule::Shape,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single broken rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Dotted path to the offending field (e.g. `emissions[0].evidence[1].char_end`)
    pub field_path: String,

    pub rule: Rule,

    pub class: ViolationClass,

    /// The value the violation names, such as a missing scope
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    pub message: String,
}

impl Violation {
    pub fn new(field_path: impl Into<String>, rule: Rule, message: impl Into<String>) -> Self {
        Self {
            field_path: field_path.into(),
            rule,
            class: rule.class(),
            subject: None,
            message: message.into(),
        }
    }

    /// Name the value this violation is about.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn is_structural(&self) -> bool {
        self.class == ViolationClass::Structural
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.field_path.is_empty() {
            "<root>"
        } else {
            self.field_path.as_str()
        };
        write!(f, "{} [{}]: {}", path, self.rule, self.message)
    }
}

/// All violations found in one candidate. Never empty.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("extraction result rejected with {} violation(s)", .violations.len())]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new(violations: Vec<Violation>) -> Self {
        debug_assert!(!violations.is_empty());
        Self { violations }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn has_structural(&self) -> bool {
        self.violations.iter().any(Violation::is_structural)
    }

    /// Violations breaking the given rule.
    pub fn by_rule(&self, rule: Rule) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.rule == rule)
    }

    /// Whether any violation breaks `rule` and names `subject`.
    pub fn names(&self, rule: Rule, subject: &str) -> bool {
        self.by_rule(rule)
            .any(|v| v.subject.as_deref() == Some(subject))
    }
}

/// Convert a JSON pointer (`/emissions/0/scope`) to a dotted field path
/// (`emissions[0].scope`).
pub fn pointer_to_path(pointer: &str) -> String {
    let mut path = String::new();
    for segment in pointer.split('/').skip(1) {
        let segment = segment.replace("~1", "/").replace("~0", "~");
        if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
            path.push('[');
            path.push_str(&segment);
            path.push(']');
        } else {
            if !path.is_empty() {
                path.push('.');
            }
            path.push_str(&segment);
        }
    }
    path
}

/// Append a child key to a dotted field path.
pub fn join_path(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{}.{}", parent, child)
    }
}
