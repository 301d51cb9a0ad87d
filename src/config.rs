use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::{ClausalError, RuleSet};

/// Rule document used when nothing else is configured or the configured
/// document does not exist.
pub const DEFAULT_RULES_PATH: &str = "configs/rules.yaml";
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Optional configuration file, read from the working directory.
pub const CONFIG_FILE: &str = "clausal.toml";

const ENV_PREFIX: &str = "CLAUSAL";
const LEGACY_RULES_PATH: &str = "RULES_PATH";

/// Where the engine finds its rules, and how loudly it logs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    pub rules_path: PathBuf,
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rules_path: PathBuf::from(DEFAULT_RULES_PATH),
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
        }
    }
}

impl EngineConfig {
    /// Load from [`CONFIG_FILE`] and the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ClausalError::Config`] if the file or a variable cannot be
    /// parsed into the configuration shape.
    pub fn load() -> Result<Self, ClausalError> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load with an explicit configuration file.
    ///
    /// Later layers override earlier ones:
    /// 1. built-in defaults
    /// 2. `file`, if it exists
    /// 3. `CLAUSAL_*` variables (`CLAUSAL_RULES_PATH`, `CLAUSAL_LOG_LEVEL`)
    ///
    /// `RULES_PATH` is still honored when `CLAUSAL_RULES_PATH` is unset.
    ///
    /// # Errors
    ///
    /// Returns [`ClausalError::Config`] on malformed sources.
    pub fn load_from(file: &Path) -> Result<Self, ClausalError> {
        Self::from_sources(file, std::env::vars().collect())
    }

    fn from_sources(file: &Path, vars: HashMap<String, String>) -> Result<Self, ClausalError> {
        let legacy = vars
            .get(LEGACY_RULES_PATH)
            .filter(|path| !path.trim().is_empty())
            .cloned();
        let has_prefixed = vars.contains_key(&format!("{ENV_PREFIX}_RULES_PATH"));

        let mut builder = Config::builder()
            .set_default("rules_path", DEFAULT_RULES_PATH)?
            .set_default("log_level", DEFAULT_LOG_LEVEL)?
            .add_source(File::from(file).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(Some(vars.into_iter().collect())),
            );
        if let Some(path) = legacy
            && !has_prefixed
        {
            builder = builder.set_override("rules_path", path)?;
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    /// The rule document to read: the configured path with `~` expanded,
    /// or [`DEFAULT_RULES_PATH`] when that does not exist.
    #[must_use]
    pub fn resolve_rules_path(&self) -> PathBuf {
        let configured = expand_home(&self.rules_path);
        if configured.exists() {
            configured
        } else {
            tracing::debug!(
                configured = %configured.display(),
                fallback = DEFAULT_RULES_PATH,
                "configured rule document missing"
            );
            PathBuf::from(DEFAULT_RULES_PATH)
        }
    }

    /// Load the configured rule set, degrading to no rules.
    #[must_use]
    pub fn load_rules(&self) -> RuleSet {
        RuleSet::load_or_empty(self.resolve_rules_path())
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}
