use std::fmt;

use serde::{Deserialize, Serialize};

/// One match of a rule against a record.
///
/// Fires carry no identity beyond their fields and are recomputed from
/// scratch on every evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[must_use]
pub struct Fire {
    rule_id: String,
    document_id: String,
    clause_id: String,
    severity: String,
    message: String,
}

impl fmt::Display for Fire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} fired on {}/{} [{}]",
            self.rule_id, self.document_id, self.clause_id, self.severity
        )?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

impl Fire {
    pub fn new(
        rule_id: impl Into<String>,
        document_id: impl Into<String>,
        clause_id: impl Into<String>,
        severity: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            document_id: document_id.into(),
            clause_id: clause_id.into(),
            severity: severity.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    #[must_use]
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    #[must_use]
    pub fn clause_id(&self) -> &str {
        &self.clause_id
    }

    #[must_use]
    pub fn severity(&self) -> &str {
        &self.severity
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
