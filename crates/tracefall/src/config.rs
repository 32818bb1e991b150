//! Defaults applied to freshly constructed entries.

use crate::error::Result;
use crate::types::Environment;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment variable overriding the default application name.
pub const APPLICATION_ENV_VAR: &str = "TRACEFALL_APPLICATION";

/// Environment variable overriding the default environment.
pub const ENVIRONMENT_ENV_VAR: &str = "TRACEFALL_ENVIRONMENT";

/// Application name used when none is configured.
pub const DEFAULT_APPLICATION: &str = "App";

/// Values stamped on every new root entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryDefaults {
    /// Logical owner/service name
    pub application: String,
    /// Deployment environment
    pub environment: Environment,
}

impl Default for EntryDefaults {
    fn default() -> Self {
        Self {
            application: DEFAULT_APPLICATION.to_string(),
            environment: Environment::Dev,
        }
    }
}

impl EntryDefaults {
    /// Creates defaults for the given application.
    #[must_use]
    pub fn new(application: impl Into<String>, environment: Environment) -> Self {
        Self {
            application: application.into(),
            environment,
        }
    }

    /// Parses defaults from JSON; missing keys keep their built-in values.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads defaults from `TRACEFALL_APPLICATION` and `TRACEFALL_ENVIRONMENT`.
    ///
    /// Unset variables keep the built-in values.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::InvalidEnvironment`](crate::TraceError::InvalidEnvironment)
    /// if the environment variable holds an unknown name.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut defaults = Self::default();

        if let Some(app) = lookup(APPLICATION_ENV_VAR) {
            let app = app.trim();
            if !app.is_empty() {
                defaults.application = app.to_string();
            }
        }
        if let Some(env) = lookup(ENVIRONMENT_ENV_VAR) {
            defaults.environment = env.parse()?;
        }

        debug!(
            target: "tracefall",
            application = %defaults.application,
            environment = %defaults.environment,
            "loaded entry defaults"
        );
        Ok(defaults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TraceError;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn builtin_defaults() {
        let defaults = EntryDefaults::default();
        assert_eq!(defaults.application, "App");
        assert_eq!(defaults.environment, Environment::Dev);
    }

    #[test]
    fn json_with_missing_keys_keeps_defaults() {
        let defaults = EntryDefaults::from_json(r#"{"environment":"prod"}"#).expect("parse");
        assert_eq!(defaults.application, "App");
        assert_eq!(defaults.environment, Environment::Prod);
    }

    #[test]
    fn json_rejects_unknown_environment() {
        let result = EntryDefaults::from_json(r#"{"environment":"staging"}"#);
        assert!(matches!(result, Err(TraceError::Serialization(_))));
    }

    #[test]
    fn lookup_overrides_both_values() {
        let defaults = EntryDefaults::from_lookup(lookup_from(&[
            (APPLICATION_ENV_VAR, "billing"),
            (ENVIRONMENT_ENV_VAR, "Test"),
        ]))
        .expect("valid lookup");
        assert_eq!(defaults, EntryDefaults::new("billing", Environment::Test));
    }

    #[test]
    fn lookup_ignores_blank_application() {
        let defaults = EntryDefaults::from_lookup(lookup_from(&[(APPLICATION_ENV_VAR, "  ")]))
            .expect("valid lookup");
        assert_eq!(defaults.application, DEFAULT_APPLICATION);
    }

    #[test]
    fn lookup_rejects_unknown_environment() {
        let result = EntryDefaults::from_lookup(lookup_from(&[(ENVIRONMENT_ENV_VAR, "qa")]));
        assert!(matches!(result, Err(TraceError::InvalidEnvironment(_))));
    }

    #[test]
    fn empty_lookup_is_default() {
        let defaults = EntryDefaults::from_lookup(|_| None).expect("valid lookup");
        assert_eq!(defaults, EntryDefaults::default());
    }
}
