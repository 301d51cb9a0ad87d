use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Value;
use super::evidence::EvidenceChip;

/// Root key under which a record is exposed to rule paths (`clause.type`, ...).
pub const RECORD_ROOT: &str = "clause";

/// One structured clause extracted from a document.
///
/// Rules see a record as a nested [`Value`] rooted at `clause`, with the
/// serialized field names: `clause.id`, `clause.doc_id`, `clause.type`,
/// `clause.page`, `clause.start`, `clause.end`, `clause.text`,
/// `clause.confidence` and `clause.normalized.<key>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(rename = "doc_id", alias = "document_id")]
    pub document_id: String,
    #[serde(rename = "type", alias = "category")]
    pub category: String,
    #[serde(default)]
    pub page: u32,
    /// Character span start (inclusive).
    #[serde(default)]
    pub start: u64,
    /// Character span end (exclusive).
    #[serde(default)]
    pub end: u64,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub normalized: BTreeMap<String, Value>,
}

impl Record {
    #[must_use]
    pub fn new(id: &str, document_id: &str, category: &str) -> Self {
        Self {
            id: id.to_owned(),
            document_id: document_id.to_owned(),
            category: category.to_owned(),
            page: 0,
            start: 0,
            end: 0,
            text: None,
            confidence: 0.0,
            normalized: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    #[must_use]
    pub fn span(mut self, start: u64, end: u64) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_owned());
        self
    }

    #[must_use]
    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Set a normalized extra at a dot-separated path. Creates intermediate
    /// nested maps as needed.
    #[must_use]
    pub fn set(mut self, path: &str, value: impl Into<Value>) -> Self {
        self.insert(path, value.into());
        self
    }

    /// Insert a normalized extra at a dot-separated path (mutable reference version).
    pub fn insert(&mut self, path: &str, value: Value) {
        let segments: Vec<&str> = path.split('.').collect();
        insert_recursive(&mut self.normalized, &segments, value);
    }

    /// The evidence chip pointing back at this record's source span.
    #[must_use]
    pub fn evidence(&self) -> EvidenceChip {
        EvidenceChip::new(&self.document_id, self.page, self.start, self.end)
    }

    /// Build the nested value rule paths resolve against.
    #[must_use]
    pub fn context(&self) -> Value {
        let clause = BTreeMap::from([
            ("id".to_owned(), Value::from(self.id.as_str())),
            ("doc_id".to_owned(), Value::from(self.document_id.as_str())),
            ("type".to_owned(), Value::from(self.category.as_str())),
            ("page".to_owned(), Value::Int(i64::from(self.page))),
            ("start".to_owned(), span_value(self.start)),
            ("end".to_owned(), span_value(self.end)),
            ("text".to_owned(), Value::from(self.text.clone())),
            ("confidence".to_owned(), Value::Float(self.confidence)),
            ("normalized".to_owned(), Value::Map(self.normalized.clone())),
        ]);
        Value::Map(BTreeMap::from([(
            RECORD_ROOT.to_owned(),
            Value::Map(clause),
        )]))
    }
}

#[allow(clippy::cast_precision_loss)]
fn span_value(offset: u64) -> Value {
    i64::try_from(offset).map_or(Value::Float(offset as f64), Value::Int)
}

fn insert_recursive(map: &mut BTreeMap<String, Value>, segments: &[&str], value: Value) {
    match segments {
        [] => {}
        [last] => {
            map.insert((*last).to_owned(), value);
        }
        [first, rest @ ..] => {
            let entry = map
                .entry((*first).to_owned())
                .or_insert_with(|| Value::Map(BTreeMap::new()));
            if let Value::Map(nested) = entry {
                insert_recursive(nested, rest, value);
            } else {
                let mut nested = BTreeMap::new();
                insert_recursive(&mut nested, rest, value);
                *entry = Value::Map(nested);
            }
        }
    }
}
