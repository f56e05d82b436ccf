//! Locating the external CLI executable.
//!
//! # Search Order
//!
//! 1. Explicit path (`--cli-path` / `ORCHRUN_CLI_PATH`). Must exist.
//! 2. `cli_path` from the config file.
//! 3. `<cli_dir>/<cli_name>` with the platform executable suffix.
//! 4. Every directory on `PATH`.
//!
//! The first executable regular file wins. Downloading a missing CLI is not
//! attempted.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{OrchError, Result};

/// Executable name used when the config file does not set `cli_name`.
pub const DEFAULT_CLI_NAME: &str = "uipcli";

/// Finds the external CLI on disk.
#[derive(Debug, Clone)]
pub struct CliLocator {
    name: String,
    explicit: Option<PathBuf>,
    configured: Option<PathBuf>,
    cli_dir: Option<PathBuf>,
    search_path: Option<OsString>,
}

impl CliLocator {
    /// Locator for `name`, searching the process `PATH`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            explicit: None,
            configured: None,
            cli_dir: None,
            search_path: std::env::var_os("PATH"),
        }
    }

    pub fn explicit(mut self, path: Option<PathBuf>) -> Self {
        self.explicit = path;
        self
    }

    pub fn configured(mut self, path: Option<PathBuf>) -> Self {
        self.configured = path;
        self
    }

    pub fn cli_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.cli_dir = dir;
        self
    }

    /// Replace the `PATH` value that is searched. `None` disables the
    /// `PATH` search.
    pub fn search_path(mut self, path: Option<OsString>) -> Self {
        self.search_path = path;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// File name including the platform executable suffix.
    pub fn file_name(&self) -> String {
        let suffix = std::env::consts::EXE_SUFFIX;
        if suffix.is_empty() || self.name.ends_with(suffix) {
            self.name.clone()
        } else {
            format!("{}{}", self.name, suffix)
        }
    }

    /// Candidate paths after the explicit one, in search order.
    pub fn candidates(&self) -> Vec<PathBuf> {
        let file_name = self.file_name();
        let mut candidates = Vec::new();
        if let Some(path) = &self.configured {
            candidates.push(path.clone());
        }
        if let Some(dir) = &self.cli_dir {
            candidates.push(dir.join(&file_name));
        }
        if let Some(search_path) = &self.search_path {
            candidates.extend(std::env::split_paths(search_path).map(|dir| dir.join(&file_name)));
        }
        candidates
    }

    /// Resolve the executable path.
    ///
    /// # Errors
    ///
    /// `CliNotFound` listing every path tried. An explicit path that is not
    /// an executable file fails immediately without searching further.
    pub fn locate(&self) -> Result<PathBuf> {
        if let Some(path) = &self.explicit {
            if is_executable(path) {
                debug!(path = %path.display(), "using explicit CLI path");
                return Ok(path.clone());
            }
            return Err(OrchError::CliNotFound {
                name: self.name.clone(),
                searched: vec![path.clone()],
            });
        }

        let candidates = self.candidates();
        if let Some(path) = &self.configured {
            if !is_executable(path) {
                warn!(path = %path.display(), "configured cli_path is not an executable file");
            }
        }
        match candidates.iter().find(|p| is_executable(p)) {
            Some(found) => {
                debug!(path = %found.display(), "located external CLI");
                Ok(found.clone())
            }
            None => Err(OrchError::CliNotFound {
                name: self.name.clone(),
                searched: candidates,
            }),
        }
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fn make_executable(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = make_executable(dir.path(), "custom-cli");
        make_executable(dir.path(), "uipcli");

        let locator = CliLocator::new("uipcli")
            .explicit(Some(explicit.clone()))
            .cli_dir(Some(dir.path().to_path_buf()))
            .search_path(None);
        assert_eq!(locator.locate().unwrap(), explicit);
    }

    #[test]
    fn test_missing_explicit_path_does_not_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        make_executable(dir.path(), "uipcli");

        let locator = CliLocator::new("uipcli")
            .explicit(Some(dir.path().join("nope")))
            .cli_dir(Some(dir.path().to_path_buf()))
            .search_path(None);
        match locator.locate() {
            Err(OrchError::CliNotFound { searched, .. }) => {
                assert_eq!(searched, vec![dir.path().join("nope")]);
            }
            other => panic!("expected CliNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_dir_then_path_search() {
        let tool_dir = tempfile::tempdir().unwrap();
        let path_dir = tempfile::tempdir().unwrap();
        let on_path = make_executable(path_dir.path(), "uipcli");

        let locator = CliLocator::new("uipcli")
            .cli_dir(Some(tool_dir.path().to_path_buf()))
            .search_path(Some(path_dir.path().as_os_str().to_os_string()));
        assert_eq!(locator.locate().unwrap(), on_path);

        let in_dir = make_executable(tool_dir.path(), "uipcli");
        assert_eq!(locator.locate().unwrap(), in_dir);
    }

    #[test]
    fn test_non_executable_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("uipcli");
        fs::write(&path, "not a program").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let locator = CliLocator::new("uipcli")
            .configured(Some(path.clone()))
            .search_path(None);
        match locator.locate() {
            Err(OrchError::CliNotFound { searched, .. }) => assert_eq!(searched, vec![path]),
            other => panic!("expected CliNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_candidates_order() {
        let locator = CliLocator::new("uipcli")
            .configured(Some(PathBuf::from("/etc/orchrun/uipcli")))
            .cli_dir(Some(PathBuf::from("/opt/cli")))
            .search_path(Some(OsString::from("/usr/local/bin:/usr/bin")));
        assert_eq!(
            locator.candidates(),
            vec![
                PathBuf::from("/etc/orchrun/uipcli"),
                PathBuf::from("/opt/cli/uipcli"),
                PathBuf::from("/usr/local/bin/uipcli"),
                PathBuf::from("/usr/bin/uipcli"),
            ]
        );
    }
}
