use std::fmt;
use std::path::Path;

use super::evaluation_report::EvaluationReport;
use super::expr::Condition;
use super::fire::Fire;
use super::record::Record;
use super::rule::{Consequence, Rule};

/// Builder for constructing a [`RuleSet`] in code.
///
/// # Example
///
/// ```
/// use clausal::{Record, RuleSetBuilder, any_of, field, group};
///
/// let ruleset = RuleSetBuilder::new()
///     .rule("low_cap", |r| {
///         r.when(field("clause.normalized.cap_ratio_to_annual_fees").lte("0.5"))
///             .severity("high")
///             .message("Low liability cap")
///     })
///     .rule("big_exposure", |r| {
///         r.when(any_of([
///             group([field("clause.type").eq("indemnity")]),
///             group([field("clause.normalized.amount").gte("100000")]),
///         ]))
///     })
///     .build();
///
/// let record = Record::new("c1", "D1", "limitation_of_liability")
///     .set("cap_ratio_to_annual_fees", 0.5);
/// let fires = ruleset.evaluate(&[record], "D1");
/// assert_eq!(fires.len(), 1);
/// assert_eq!(fires[0].severity(), "high");
/// ```
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    rules: Vec<Rule>,
}

/// Intermediate builder passed to the rule definition closure.
#[derive(Debug, Default)]
pub struct RuleBuilder {
    when: Vec<Condition>,
    then: Consequence,
}

impl RuleSetBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a rule. Conditions added with `.when()` are ANDed; a rule with
    /// no conditions matches every record.
    #[must_use]
    pub fn rule(mut self, id: &str, f: impl FnOnce(RuleBuilder) -> RuleBuilder) -> Self {
        let builder = f(RuleBuilder::default());
        self.rules.push(Rule {
            id: id.to_owned(),
            when: builder.when,
            then: builder.then,
        });
        self
    }

    /// Append an already-built rule.
    #[must_use]
    pub fn push(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    #[must_use]
    pub fn build(self) -> RuleSet {
        RuleSet { rules: self.rules }
    }
}

impl RuleBuilder {
    /// Add a condition to this rule.
    #[must_use]
    pub fn when(mut self, condition: impl Into<Condition>) -> Self {
        self.when.push(condition.into());
        self
    }

    #[must_use]
    pub fn severity(mut self, severity: &str) -> Self {
        severity.clone_into(&mut self.then.severity);
        self
    }

    #[must_use]
    pub fn message(mut self, message: &str) -> Self {
        message.clone_into(&mut self.then.message);
        self
    }
}

/// An ordered, immutable set of compiled rules. Thread-safe and designed to
/// live behind `Arc`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    pub(crate) rules: Vec<Rule>,
}

impl RuleSet {
    /// A rule set with no rules; evaluates to no fires.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Evaluate every rule against every record.
    ///
    /// Fires are ordered rule-major, then by record order. A record may fire
    /// any number of rules and a rule may fire on any number of records.
    #[must_use]
    pub fn evaluate(&self, records: &[Record], document_id: &str) -> Vec<Fire> {
        crate::evaluate::evaluate(&self.rules, records, document_id)
    }

    /// Evaluate with per-rule hit counts and timing.
    pub fn evaluate_detailed(&self, records: &[Record], document_id: &str) -> EvaluationReport {
        crate::evaluate::evaluate_detailed(&self.rules, records, document_id)
    }

    /// Whether the rule at `index` matches a single record.
    ///
    /// Returns `None` if there is no rule at `index`.
    #[must_use]
    pub fn matches(&self, index: usize, record: &Record) -> Option<bool> {
        let rule = self.rules.get(index)?;
        Some(crate::evaluate::matches(&rule.when, &record.context()))
    }

    /// Parse a YAML rule document into a `RuleSet`.
    ///
    /// # Errors
    ///
    /// Returns [`ClausalError`](crate::ClausalError) if the document is not
    /// valid YAML or does not have the rule document shape.
    pub fn from_yaml(input: &str) -> Result<Self, crate::ClausalError> {
        Ok(crate::loader::from_yaml(input)?)
    }

    /// Parse a JSON rule document into a `RuleSet`.
    ///
    /// # Errors
    ///
    /// Returns [`ClausalError`](crate::ClausalError) on parse or shape failure.
    pub fn from_json(input: &str) -> Result<Self, crate::ClausalError> {
        Ok(crate::loader::from_json(input)?)
    }

    /// Read a rule document (YAML, which also accepts JSON) from a file.
    ///
    /// # Errors
    ///
    /// Returns [`ClausalError`](crate::ClausalError) on I/O, parse, or shape failure.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, crate::ClausalError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_yaml(&input)
    }

    /// Load a rule document, degrading instead of failing. A missing or
    /// unparseable file gives an empty rule set; a malformed rule inside a
    /// readable document is skipped on its own. Problems are logged.
    #[must_use]
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        crate::loader::load_or_empty(path.as_ref())
    }

    /// Rule ids in evaluation order.
    #[must_use]
    pub fn rule_ids(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.id.as_str()).collect()
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let conditions: usize = self.rules.iter().map(|r| r.when.len()).sum();
        write!(
            f,
            "RuleSet({} rules, {} conditions)",
            self.rules.len(),
            conditions
        )
    }
}
