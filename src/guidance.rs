use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{EvidenceChip, Fire, Record};

/// Risk for a clause no rule fired on.
pub const DEFAULT_RISK: &str = "low";

const TITLE_SUFFIX: &str = " – check terms";
const WHAT_IT_MEANS: &str = "Detected clause with potential considerations.";
const ACTION: &str = "Review and align with policy.";

/// One piece of user-facing guidance, derived from a record and the fire
/// (if any) attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidanceItem {
    pub doc_id: String,
    pub clause_id: String,
    pub title: String,
    pub what_it_means: String,
    pub action: Option<String>,
    pub risk: String,
    pub deadline: Option<String>,
    pub evidence: Vec<EvidenceChip>,
    pub confidence: f64,
    pub policy_rule: Option<String>,
}

/// Compose one guidance item per record, in record order.
///
/// A record's risk is the severity of the last fire naming its clause id, or
/// [`DEFAULT_RISK`] when nothing fired.
#[must_use]
pub fn compose(records: &[Record], fires: &[Fire]) -> Vec<GuidanceItem> {
    let fires_by_clause: HashMap<&str, &Fire> =
        fires.iter().map(|fire| (fire.clause_id(), fire)).collect();

    records
        .iter()
        .map(|record| {
            let fire = fires_by_clause.get(record.id.as_str());
            GuidanceItem {
                doc_id: record.document_id.clone(),
                clause_id: record.id.clone(),
                title: format!("{}{TITLE_SUFFIX}", title_case(&record.category.replace('_', " "))),
                what_it_means: WHAT_IT_MEANS.to_owned(),
                action: Some(ACTION.to_owned()),
                risk: fire.map_or(DEFAULT_RISK, |f| f.severity()).to_owned(),
                deadline: None,
                evidence: vec![record.evidence()],
                confidence: clamp_confidence(record.confidence),
                policy_rule: fire.map(|f| f.rule_id().to_owned()),
            }
        })
        .collect()
}

/// Uppercase the first letter of each alphabetic run, lowercase the rest.
fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_word = false;
    for c in input.chars() {
        if in_word {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        in_word = c.is_alphabetic();
    }
    out
}

fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles() {
        assert_eq!(title_case("limitation of liability"), "Limitation Of Liability");
        assert_eq!(title_case("SLA"), "Sla");
        assert_eq!(title_case("net 30days"), "Net 30Days");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn item_from_record_without_fire() {
        let record = Record::new("c1", "D1", "limitation_of_liability")
            .page(14)
            .span(231, 560)
            .confidence(0.82);
        let items = compose(&[record], &[]);
        assert_eq!(items.len(), 1);

        let item = &items[0];
        assert_eq!(item.title, "Limitation Of Liability – check terms");
        assert_eq!(item.what_it_means, WHAT_IT_MEANS);
        assert_eq!(item.action.as_deref(), Some(ACTION));
        assert_eq!(item.risk, "low");
        assert_eq!(item.policy_rule, None);
        assert_eq!(item.deadline, None);
        assert_eq!(item.evidence[0].to_string(), "D1:14:231-560");
        assert!((item.confidence - 0.82).abs() < f64::EPSILON);
    }

    #[test]
    fn last_fire_for_a_clause_wins() {
        let records = [Record::new("c1", "D1", "indemnity"), Record::new("c2", "D1", "sla")];
        let fires = [
            Fire::new("R1", "D1", "c1", "medium", ""),
            Fire::new("R2", "D1", "c1", "high", ""),
        ];
        let items = compose(&records, &fires);
        assert_eq!(items[0].risk, "high");
        assert_eq!(items[0].policy_rule.as_deref(), Some("R2"));
        assert_eq!(items[1].risk, "low");
        assert_eq!(items[1].policy_rule, None);
    }

    #[test]
    fn confidence_is_clamped() {
        let records = [
            Record::new("a", "D1", "x").confidence(1.7),
            Record::new("b", "D1", "x").confidence(-0.2),
            Record::new("c", "D1", "x").confidence(f64::NAN),
        ];
        let confidences: Vec<f64> = compose(&records, &[])
            .iter()
            .map(|item| item.confidence)
            .collect();
        assert_eq!(confidences, vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn serializes_evidence_as_chips() {
        let record = Record::new("c1", "D1", "sla").page(2).span(5, 9);
        let json = serde_json::to_value(compose(&[record], &[])).unwrap();
        assert_eq!(json[0]["evidence"][0], "D1:2:5-9");
        assert_eq!(json[0]["risk"], "low");
    }
}
