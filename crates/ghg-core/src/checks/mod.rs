//! Checks run against a typed extraction result.
//!
//! Each check inspects the whole result and reports every violation it
//! finds. Checks are independent of each other; the validator runs all of
//! them and concatenates their output in registration order.
//!
//! - [`FieldCheck`]: ranges, non-empty lists, duplicates, evidence shape
//! - [`DisclosureCheck`]: NONE exclusivity and evidence coverage of items
//! - [`ScopeCoverageCheck`]: referenced scopes are disclosed
//! - [`YearOrderCheck`]: baseline/achievement and base/target ordering
//! - [`RequirementCheck`]: reduction goals carry a rate, derived rates are supported

mod chronology;
mod coverage;
mod disclosure;
mod fields;
mod requirements;

pub use chronology::YearOrderCheck;
pub use coverage::ScopeCoverageCheck;
pub use disclosure::DisclosureCheck;
pub use fields::FieldCheck;
pub use requirements::RequirementCheck;

use crate::config::ValidatorConfig;
use crate::types::ExtractionResult;
use crate::violation::Violation;

/// A rule set evaluated over a typed extraction result.
pub trait Check: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Report every violation of this rule set.
    fn check(&self, result: &ExtractionResult, config: &ValidatorConfig) -> Vec<Violation>;
}

/// The full rule set, in reporting order.
pub fn default_checks() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(FieldCheck::new()),
        Box::new(DisclosureCheck::new()),
        Box::new(ScopeCoverageCheck::new()),
        Box::new(YearOrderCheck::new()),
        Box::new(RequirementCheck::new()),
    ]
}
