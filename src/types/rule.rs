use super::expr::Condition;

/// Severity used when a rule's `then` does not name one.
pub const DEFAULT_SEVERITY: &str = "info";

/// A named rule: a compiled condition list plus the consequence to emit.
///
/// Rules are created via [`RuleSetBuilder`](super::RuleSetBuilder) or loaded
/// from a rule document with [`RuleSet::from_yaml()`](super::RuleSet::from_yaml).
/// `when` is implicitly ANDed; an empty list matches every record.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub id: String,
    pub when: Vec<Condition>,
    pub then: Consequence,
}

/// What a rule reports when it fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consequence {
    pub severity: String,
    pub message: String,
}

impl Default for Consequence {
    fn default() -> Self {
        Self {
            severity: DEFAULT_SEVERITY.to_owned(),
            message: String::new(),
        }
    }
}
