use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{Fire, Record, RuleSet};

/// Where a document's fires are kept between runs.
///
/// `replace` must fully supersede any fires previously stored for the
/// document, never merge with them, so that re-running a document is
/// idempotent.
pub trait FireStore {
    type Error;

    /// Atomically replace every fire stored for `document_id`.
    ///
    /// # Errors
    ///
    /// Implementation-defined storage failures.
    fn replace(&self, document_id: &str, fires: Vec<Fire>) -> Result<(), Self::Error>;

    /// The fires currently stored for `document_id`, in stored order.
    ///
    /// # Errors
    ///
    /// Implementation-defined storage failures.
    fn fires_for(&self, document_id: &str) -> Result<Vec<Fire>, Self::Error>;
}

/// Thread-safe in-memory [`FireStore`]. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryFireStore {
    documents: Arc<RwLock<HashMap<String, Vec<Fire>>>>,
}

impl MemoryFireStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents with a stored run.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    /// The results document for the last run of `document_id`, if any.
    #[must_use]
    pub fn policy_results(&self, document_id: &str) -> Option<PolicyResults> {
        self.documents
            .read()
            .get(document_id)
            .map(|fires| PolicyResults::new(document_id, fires.clone()))
    }

    pub fn clear(&self) {
        self.documents.write().clear();
    }
}

impl FireStore for MemoryFireStore {
    type Error = Infallible;

    fn replace(&self, document_id: &str, fires: Vec<Fire>) -> Result<(), Self::Error> {
        self.documents.write().insert(document_id.to_owned(), fires);
        Ok(())
    }

    fn fires_for(&self, document_id: &str) -> Result<Vec<Fire>, Self::Error> {
        Ok(self
            .documents
            .read()
            .get(document_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// The results document written for one policy run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyResults {
    pub doc_id: String,
    pub results: Vec<Fire>,
}

impl PolicyResults {
    #[must_use]
    pub fn new(document_id: &str, results: Vec<Fire>) -> Self {
        Self {
            doc_id: document_id.to_owned(),
            results,
        }
    }

    /// Pretty JSON, as written next to the document.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// What a policy run reports back to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub policy_results: bool,
    pub count: usize,
}

impl RuleSet {
    /// Evaluate one document and replace its stored fires.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the replace fails; evaluation itself
    /// cannot fail.
    #[instrument(skip(self, records, store), fields(rules = self.len(), records = records.len()))]
    pub fn run<S: FireStore>(
        &self,
        document_id: &str,
        records: &[Record],
        store: &S,
    ) -> Result<RunSummary, S::Error> {
        let fires = self.evaluate(records, document_id);
        let count = fires.len();
        store.replace(document_id, fires)?;
        info!(count, "policy run stored");
        Ok(RunSummary {
            policy_results: true,
            count,
        })
    }
}
