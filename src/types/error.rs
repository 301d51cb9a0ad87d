use thiserror::Error;

/// Errors produced when a rule document cannot be turned into a rule set.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("invalid rule document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid rule document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("rule '{rule}': `when` must be a mapping, found {found}")]
    MalformedWhen { rule: String, found: &'static str },

    #[error("rule '{rule}': `{key}` must be a list of mappings")]
    MalformedGroup { rule: String, key: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvidenceChipError {
    #[error("malformed evidence chip '{input}'; expected document:page:start-end")]
    Malformed { input: String },

    #[error("evidence span ends before it starts ({start}-{end})")]
    InvertedSpan { start: u64, end: u64 },
}
