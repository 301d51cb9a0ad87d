mod coerce;
mod compile;
mod config;
mod error;
mod evaluate;
mod guidance;
mod loader;
mod parse;
mod resolve;
mod store;
mod types;

pub use crate::config::{CONFIG_FILE, DEFAULT_LOG_LEVEL, DEFAULT_RULES_PATH, EngineConfig};
pub use coerce::{coerce, coerce_pair};
pub use compile::{compile_condition, compile_group, compile_when};
pub use error::ClausalError;
pub use guidance::{DEFAULT_RISK, GuidanceItem, compose};
pub use resolve::{resolve, resolve_or};
pub use store::{FireStore, MemoryFireStore, PolicyResults, RunSummary};
pub use types::{
    CompareOp, Condition, ConditionGroup, Consequence, DEFAULT_SEVERITY, EvaluationReport,
    EvidenceChip, EvidenceChipError, FieldExpr, FieldTest, Fire, RECORD_ROOT, Record, Rule,
    RuleBuilder, RuleSet, RuleSetBuilder, SpecError, Value, all_of, any_of, field, group,
};
