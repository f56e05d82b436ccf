//! Runner configuration file.
//!
//! A JSON file checked into the pipeline repository that provides defaults
//! for the external CLI location and the orchestrator connection. Every field
//! is optional and command-line values always win.
//!
//! Secrets are never read from this file. A key that names a password,
//! secret, token or user key anywhere in the document is rejected before
//! deserialization.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::credentials::ConnectionInput;
use crate::error::OrchError;
use crate::types::TraceLevel;

/// Non-secret orchestrator defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorDefaults {
    pub url: Option<String>,
    pub tenant: Option<String>,
    pub folder: Option<String>,
    pub identity_url: Option<String>,
    pub account_name: Option<String>,
    pub account_for_app: Option<String>,
    pub application_id: Option<String>,
    pub application_scope: Option<String>,
}

impl OrchestratorDefaults {
    /// Fill every field the command line left unset.
    pub fn fill(&self, mut input: ConnectionInput) -> ConnectionInput {
        fn or(slot: &mut Option<String>, fallback: &Option<String>) {
            if slot.is_none() {
                slot.clone_from(fallback);
            }
        }
        or(&mut input.url, &self.url);
        or(&mut input.tenant, &self.tenant);
        or(&mut input.folder, &self.folder);
        or(&mut input.identity_url, &self.identity_url);

        let creds = &mut input.credentials;
        or(&mut creds.account_name, &self.account_name);
        or(&mut creds.account_for_app, &self.account_for_app);
        or(&mut creds.application_id, &self.application_id);
        or(&mut creds.application_scope, &self.application_scope);
        input
    }
}

/// Runner configuration that can be loaded from disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// External CLI executable name (default `uipcli`)
    pub cli_name: Option<String>,
    /// Exact path to the external CLI
    pub cli_path: Option<PathBuf>,
    /// Directory holding an unpacked external CLI
    pub cli_dir: Option<PathBuf>,
    /// Append-only log file
    pub log_file: Option<PathBuf>,
    pub orchestrator: OrchestratorDefaults,
    pub language: Option<String>,
    pub trace_level: Option<TraceLevel>,
}

impl RunnerConfig {
    /// Load configuration from a JSON file.
    ///
    /// Relative paths inside the file are resolved against the directory
    /// containing it.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration from {:?}", path))?;

        let value: Value =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;
        if let Some(key) = find_secret_key(&value, "") {
            return Err(OrchError::config(format!(
                "{:?} contains secret field '{}'; pass secrets by flag or environment variable",
                path, key
            ))
            .into());
        }

        let mut config: Self =
            serde_json::from_value(value).context("Invalid configuration structure")?;

        if let Some(base) = path.parent() {
            config.resolve_relative_paths(base);
        }
        Ok(config)
    }

    /// Load `path` if given, otherwise the empty configuration.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    fn resolve_relative_paths(&mut self, base: &Path) {
        for slot in [&mut self.cli_path, &mut self.cli_dir, &mut self.log_file] {
            if let Some(p) = slot.as_mut() {
                if p.is_relative() {
                    *p = base.join(&*p);
                }
            }
        }
    }
}

fn is_secret_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase().replace(['-', '_'], "");
    ["password", "secret", "token", "userkey"]
        .iter()
        .any(|needle| key.contains(needle))
}

/// Dotted path of the first secret-looking key, if any.
fn find_secret_key(value: &Value, prefix: &str) -> Option<String> {
    let Value::Object(map) = value else {
        return None;
    };
    map.iter().find_map(|(key, child)| {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        if is_secret_key(key) {
            Some(path)
        } else {
            find_secret_key(child, &path)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            r#"{
                "cli_name": "uipcli",
                "cli_path": "/opt/uipcli/uipcli",
                "orchestrator": { "url": "https://cloud.example.com/org", "tenant": "Default" },
                "language": "en-US",
                "trace_level": "Verbose"
            }"#,
        );
        let config = RunnerConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.cli_name.as_deref(), Some("uipcli"));
        assert_eq!(config.cli_path, Some(PathBuf::from("/opt/uipcli/uipcli")));
        assert_eq!(config.orchestrator.tenant.as_deref(), Some("Default"));
        assert_eq!(config.trace_level, Some(TraceLevel::Verbose));
        assert!(config.cli_dir.is_none());
    }

    #[test]
    fn test_empty_object_is_default() {
        let file = write_config("{}");
        assert_eq!(RunnerConfig::load_from_file(file.path()).unwrap(), RunnerConfig::default());
    }

    #[test]
    fn test_relative_paths_resolved_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orchrun.json");
        fs::write(&path, r#"{ "cli_dir": ".orchrun/cli", "log_file": "orchrun.log" }"#).unwrap();

        let config = RunnerConfig::load_from_file(&path).unwrap();
        assert_eq!(config.cli_dir, Some(dir.path().join(".orchrun/cli")));
        assert_eq!(config.log_file, Some(dir.path().join("orchrun.log")));
    }

    #[test]
    fn test_secret_fields_rejected() {
        for json in [
            r#"{ "orchestrator": { "password": "hunter2" } }"#,
            r#"{ "orchestrator": { "user_key": "abc" } }"#,
            r#"{ "applicationSecret": "abc" }"#,
            r#"{ "orchestrator": { "refresh-token": "abc" } }"#,
        ] {
            let file = write_config(json);
            let err = RunnerConfig::load_from_file(file.path()).unwrap_err();
            assert!(
                matches!(err.downcast_ref::<OrchError>(), Some(OrchError::Config(_))),
                "{} should be rejected",
                json
            );
            assert!(!err.to_string().contains("hunter2"));
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        assert!(RunnerConfig::load_from_file("/nonexistent/orchrun.json").is_err());
    }

    #[test]
    fn test_load_invalid_json() {
        let file = write_config("{ not json");
        let err = RunnerConfig::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse configuration JSON"));
    }

    #[test]
    fn test_wrong_type_fails() {
        let file = write_config(r#"{ "trace_level": "Loud" }"#);
        assert!(RunnerConfig::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_defaults_fill_only_unset_fields() {
        let defaults = OrchestratorDefaults {
            url: Some("https://config.example.com".to_string()),
            tenant: Some("Default".to_string()),
            account_name: Some("org".to_string()),
            ..Default::default()
        };
        let input = ConnectionInput {
            url: Some("https://flag.example.com".to_string()),
            ..Default::default()
        };
        let filled = defaults.fill(input);
        assert_eq!(filled.url.as_deref(), Some("https://flag.example.com"));
        assert_eq!(filled.tenant.as_deref(), Some("Default"));
        assert_eq!(filled.credentials.account_name.as_deref(), Some("org"));
        assert!(filled.credentials.password.is_none());
    }

    #[test]
    fn test_load_optional_none() {
        assert_eq!(RunnerConfig::load_optional(None).unwrap(), RunnerConfig::default());
    }
}
