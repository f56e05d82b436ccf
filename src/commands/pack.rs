//! Type-safe arguments for `package pack`.
//!
//! Packing runs locally and needs no orchestrator connection, unless the
//! project references libraries hosted on an orchestrator feed. In that
//! case the feed is reached with external app credentials.

use std::path::PathBuf;

use crate::arguments::OptionSpec;
use crate::commands::CommonOptions;
use crate::error::{OrchError, Result};
use crate::invocation::CliInvocation;
use crate::redact::SecretKind;
use crate::types::OutputType;

/// Source control metadata embedded in the package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryInfo {
    pub url: Option<String>,
    pub commit: Option<String>,
    pub branch: Option<String>,
    /// e.g. `git`
    pub kind: Option<String>,
    pub project_url: Option<String>,
}

/// Orchestrator library feed used to restore dependencies while packing.
///
/// All fields are optional at parse time; `PackArgs::validate` enforces that
/// a feed URL comes with its tenant and external app credentials.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LibraryFeed {
    pub url: Option<String>,
    pub tenant: Option<String>,
    pub account_for_app: Option<String>,
    pub application_id: Option<String>,
    pub application_secret: Option<String>,
    pub application_scope: Option<String>,
    pub folder: Option<String>,
}

impl std::fmt::Debug for LibraryFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibraryFeed")
            .field("url", &self.url)
            .field("tenant", &self.tenant)
            .field("account_for_app", &self.account_for_app)
            .field("application_id", &self.application_id)
            .field(
                "application_secret",
                &self.application_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("application_scope", &self.application_scope)
            .field("folder", &self.folder)
            .finish()
    }
}

impl LibraryFeed {
    fn is_empty(&self) -> bool {
        [
            &self.url,
            &self.tenant,
            &self.account_for_app,
            &self.application_id,
            &self.application_secret,
            &self.application_scope,
            &self.folder,
        ]
        .iter()
        .all(|v| v.as_deref().is_none_or(str::is_empty))
    }
}

/// Type-safe arguments for `package pack`.
///
/// # Field to Flag Mapping
///
/// | Rust Field                | CLI Flag / Position |
/// |---------------------------|---------------------|
/// | `project_path`            | positional 1        |
/// | `destination`             | `-o`                |
/// | `version`                 | `-v`                |
/// | `auto_version`            | `--autoVersion`     |
/// | `output_type`             | `--outputType`      |
/// | `split_output`            | `--splitOutput`     |
/// | `release_notes`           | `--releaseNotes`    |
/// | `disable_builtin_feeds`   | `--disableBuiltInNugetFeeds` |
/// | `repository.*`            | `--repositoryUrl`, `--repositoryCommit`, `--repositoryBranch`, `--repositoryType`, `--projectUrl` |
/// | `library.*`               | `--libraryOrchestrator*` |
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackArgs {
    /// Project directory or `project.json`.
    pub project_path: PathBuf,
    /// Directory the package is written to.
    pub destination: PathBuf,
    pub version: Option<String>,
    pub auto_version: bool,
    pub output_type: Option<OutputType>,
    pub split_output: bool,
    pub release_notes: Option<String>,
    pub disable_builtin_feeds: bool,
    pub repository: RepositoryInfo,
    pub library: LibraryFeed,
    pub common: CommonOptions,
}

impl CliInvocation for PackArgs {
    fn command_name(&self) -> &'static str {
        "package pack"
    }

    fn option_spec(&self) -> OptionSpec {
        let repo = &self.repository;
        let lib = &self.library;
        OptionSpec::command(&["package", "pack"])
            .positional(self.project_path.display())
            .flag("-o", Some(self.destination.display()))
            .flag("-v", self.version.as_ref())
            .switch("--autoVersion", self.auto_version)
            .flag("--outputType", self.output_type)
            .switch("--splitOutput", self.split_output)
            .flag("--releaseNotes", self.release_notes.as_ref())
            .switch("--disableBuiltInNugetFeeds", self.disable_builtin_feeds)
            .flag("--repositoryUrl", repo.url.as_ref())
            .flag("--repositoryCommit", repo.commit.as_ref())
            .flag("--repositoryBranch", repo.branch.as_ref())
            .flag("--repositoryType", repo.kind.as_ref())
            .flag("--projectUrl", repo.project_url.as_ref())
            .flag("--libraryOrchestratorUrl", lib.url.as_ref())
            .flag("--libraryOrchestratorTenant", lib.tenant.as_ref())
            .flag("--libraryOrchestratorAccountForApp", lib.account_for_app.as_ref())
            .flag("--libraryOrchestratorApplicationId", lib.application_id.as_ref())
            .secret(
                "--libraryOrchestratorApplicationSecret",
                lib.application_secret.as_ref(),
                SecretKind::ClientSecret,
            )
            .flag("--libraryOrchestratorApplicationScope", lib.application_scope.as_ref())
            .flag("--libraryOrchestratorFolder", lib.folder.as_ref())
            .extend(self.common.option_spec())
    }

    fn validate(&self) -> Result<()> {
        if self.project_path.as_os_str().is_empty() {
            return Err(OrchError::missing("PROJECT_PATH"));
        }
        if self.destination.as_os_str().is_empty() {
            return Err(OrchError::missing("--destination"));
        }
        if self.auto_version && self.version.as_deref().is_some_and(|v| !v.is_empty()) {
            return Err(OrchError::conflict("--package-version", "--auto-version"));
        }

        if self.library.is_empty() {
            return Ok(());
        }
        let lib = &self.library;
        for (name, value) in [
            ("--library-orchestrator-url", &lib.url),
            ("--library-orchestrator-tenant", &lib.tenant),
            ("--library-orchestrator-account-for-app", &lib.account_for_app),
            ("--library-orchestrator-application-id", &lib.application_id),
            ("--library-orchestrator-application-secret", &lib.application_secret),
        ] {
            if value.as_deref().is_none_or(|v| v.trim().is_empty()) {
                return Err(OrchError::missing(name));
            }
        }
        Ok(())
    }
}
