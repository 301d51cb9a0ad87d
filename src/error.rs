use thiserror::Error;

use crate::SpecError;

/// Unified error type covering rule documents, configuration and I/O.
///
/// Returned by convenience methods like [`RuleSet::from_yaml()`](crate::RuleSet::from_yaml)
/// and [`RuleSet::from_file()`](crate::RuleSet::from_file).
#[derive(Debug, Error)]
pub enum ClausalError {
    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
