mod error;
mod evaluation_report;
mod evidence;
mod expr;
mod fire;
mod record;
mod rule;
mod ruleset;
mod value;

pub use error::{EvidenceChipError, SpecError};
pub use evaluation_report::EvaluationReport;
pub use evidence::EvidenceChip;
pub use expr::{
    CompareOp, Condition, ConditionGroup, FieldExpr, FieldTest, all_of, any_of, field, group,
};
pub use fire::Fire;
pub use record::{RECORD_ROOT, Record};
pub use rule::{Consequence, DEFAULT_SEVERITY, Rule};
pub use ruleset::{RuleBuilder, RuleSet, RuleSetBuilder};
pub use value::Value;
