use std::fmt;
use std::time::Duration;

use serde::Serialize;

use super::fire::Fire;

/// Detailed evaluation report returned by
/// [`RuleSet::evaluate_detailed()`](super::ruleset::RuleSet::evaluate_detailed).
///
/// Contains the fires, how many records each rule matched (in rule order),
/// the number of records evaluated, and the wall-clock duration.
#[derive(Debug, Clone, Serialize)]
#[must_use]
pub struct EvaluationReport {
    fires: Vec<Fire>,
    rule_hits: Vec<(String, usize)>,
    records: usize,
    duration: Duration,
}

impl EvaluationReport {
    pub(crate) fn new(
        fires: Vec<Fire>,
        rule_hits: Vec<(String, usize)>,
        records: usize,
        duration: Duration,
    ) -> Self {
        Self {
            fires,
            rule_hits,
            records,
            duration,
        }
    }

    /// The fires, same as [`RuleSet::evaluate()`](super::ruleset::RuleSet::evaluate).
    #[must_use]
    pub fn fires(&self) -> &[Fire] {
        &self.fires
    }

    #[must_use]
    pub fn into_fires(self) -> Vec<Fire> {
        self.fires
    }

    /// `(rule id, matched records)` for every rule, in rule order.
    #[must_use]
    pub fn rule_hits(&self) -> &[(String, usize)] {
        &self.rule_hits
    }

    /// Ids of the rules that fired at least once, in rule order.
    #[must_use]
    pub fn fired_rules(&self) -> Vec<&str> {
        self.rule_hits
            .iter()
            .filter(|(_, hits)| *hits > 0)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    #[must_use]
    pub fn records(&self) -> usize {
        self.records
    }

    /// Wall-clock duration of the evaluation.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fires: {} across {} records",
            self.fires.len(),
            self.records
        )?;
        write!(f, ", fired: [{}]", self.fired_rules().join(", "))?;
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EvaluationReport {
        EvaluationReport::new(
            vec![
                Fire::new("r1", "D1", "c1", "high", ""),
                Fire::new("r1", "D1", "c2", "high", ""),
            ],
            vec![("r1".into(), 2), ("r2".into(), 0)],
            3,
            Duration::from_nanos(500),
        )
    }

    #[test]
    fn report_accessors() {
        let report = sample();
        assert_eq!(report.fires().len(), 2);
        assert_eq!(report.rule_hits(), &[("r1".to_owned(), 2), ("r2".to_owned(), 0)]);
        assert_eq!(report.fired_rules(), vec!["r1"]);
        assert_eq!(report.records(), 3);
        assert_eq!(report.duration(), Duration::from_nanos(500));
    }

    #[test]
    fn report_display() {
        let s = sample().to_string();
        assert!(s.contains("fires: 2 across 3 records"));
        assert!(s.contains("fired: [r1]"));
    }

    #[test]
    fn report_display_no_fires() {
        let report = EvaluationReport::new(vec![], vec![("r1".into(), 0)], 0, Duration::ZERO);
        let s = report.to_string();
        assert!(s.contains("fires: 0 across 0 records"));
        assert!(s.contains("fired: []"));
    }
}
