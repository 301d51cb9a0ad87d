use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;

use crate::{Consequence, DEFAULT_SEVERITY, Rule, RuleSet, SpecError, Value, compile_when};

/// Top-level shape of a rule document.
#[derive(Debug, Default, Deserialize)]
struct RuleDocument {
    #[serde(default)]
    rules: Option<Vec<RuleSpec>>,
}

/// Rule document whose entries are compiled one at a time.
#[derive(Debug, Default, Deserialize)]
struct RawRuleDocument {
    #[serde(default)]
    rules: Option<Vec<serde_yaml::Value>>,
}

#[derive(Debug, Deserialize)]
struct RuleSpec {
    id: String,
    #[serde(default)]
    when: Option<Value>,
    #[serde(default)]
    then: Option<ThenSpec>,
}

#[derive(Debug, Default, Deserialize)]
struct ThenSpec {
    #[serde(default)]
    severity: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

pub(crate) fn from_yaml(input: &str) -> Result<RuleSet, SpecError> {
    if input.trim().is_empty() {
        return Ok(RuleSet::empty());
    }
    let document: Option<RuleDocument> = serde_yaml::from_str(input)?;
    compile_document(document.unwrap_or_default())
}

pub(crate) fn from_json(input: &str) -> Result<RuleSet, SpecError> {
    let document: Option<RuleDocument> = serde_json::from_str(input)?;
    compile_document(document.unwrap_or_default())
}

pub(crate) fn load_or_empty(path: &Path) -> RuleSet {
    let input = match std::fs::read_to_string(path) {
        Ok(input) => input,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "rule document not found, using no rules");
            return RuleSet::empty();
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "cannot read rule document, using no rules");
            return RuleSet::empty();
        }
    };
    match from_yaml_skipping_malformed(&input) {
        Ok(ruleset) => {
            tracing::debug!(path = %path.display(), rules = ruleset.len(), "loaded rule document");
            ruleset
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "malformed rule document, using no rules");
            RuleSet::empty()
        }
    }
}

/// Like [`from_yaml`], but a rule that fails to deserialize or compile is
/// dropped with a warning instead of failing the document.
fn from_yaml_skipping_malformed(input: &str) -> Result<RuleSet, SpecError> {
    if input.trim().is_empty() {
        return Ok(RuleSet::empty());
    }
    let document: Option<RawRuleDocument> = serde_yaml::from_str(input)?;
    let rules = document
        .unwrap_or_default()
        .rules
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .filter_map(|(index, raw)| {
            let id = raw
                .get("id")
                .and_then(serde_yaml::Value::as_str)
                .unwrap_or("<unnamed>")
                .to_owned();
            match serde_yaml::from_value::<RuleSpec>(raw)
                .map_err(SpecError::from)
                .and_then(compile_rule)
            {
                Ok(rule) => Some(rule),
                Err(err) => {
                    tracing::warn!(rule = %id, index, error = %err, "skipping malformed rule");
                    None
                }
            }
        })
        .collect();
    Ok(RuleSet { rules })
}

fn compile_document(document: RuleDocument) -> Result<RuleSet, SpecError> {
    let rules = document
        .rules
        .unwrap_or_default()
        .into_iter()
        .map(compile_rule)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RuleSet { rules })
}

fn compile_rule(spec: RuleSpec) -> Result<Rule, SpecError> {
    let when = compile_when(&spec.id, spec.when.as_ref().unwrap_or(&Value::Null))?;
    let then = spec.then.unwrap_or_default();
    Ok(Rule {
        id: spec.id,
        when,
        then: Consequence {
            severity: then
                .severity
                .unwrap_or_else(|| DEFAULT_SEVERITY.to_owned()),
            message: then.message.unwrap_or_default(),
        },
    })
}
