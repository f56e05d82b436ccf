//! Type-safe arguments for `package deploy`.

use std::path::PathBuf;

use crate::arguments::OptionSpec;
use crate::commands::CommonOptions;
use crate::credentials::OrchestratorConnection;
use crate::error::{OrchError, Result};
use crate::invocation::CliInvocation;

/// Type-safe arguments for `package deploy`.
///
/// # Field to Flag Mapping
///
/// | Rust Field                       | CLI Flag / Position |
/// |----------------------------------|---------------------|
/// | `packages_path`                  | positional 1        |
/// | `connection.url`                 | positional 2        |
/// | `connection.tenant`              | positional 3        |
/// | `connection.*`                   | see `credentials`   |
/// | `environments`                   | `-e`                |
/// | `entry_points`                   | `--entryPointsPath` |
/// | `create_process`                 | `--createProcess`   |
/// | `ignore_library_deploy_conflict` | `--ignoreLibraryDeployConflict` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployArgs {
    /// A `.nupkg` file or a directory of packages.
    pub packages_path: PathBuf,
    pub connection: OrchestratorConnection,
    /// Comma-separated environment names (classic folders).
    pub environments: Option<String>,
    /// Comma-separated entry point paths.
    pub entry_points: Option<String>,
    pub create_process: bool,
    pub ignore_library_deploy_conflict: bool,
    pub common: CommonOptions,
}

impl CliInvocation for DeployArgs {
    fn command_name(&self) -> &'static str {
        "package deploy"
    }

    fn option_spec(&self) -> OptionSpec {
        OptionSpec::command(&["package", "deploy"])
            .positional(self.packages_path.display())
            .extend(self.connection.positional_spec())
            .extend(self.connection.flag_spec())
            .flag("-e", self.environments.as_ref())
            .flag("--entryPointsPath", self.entry_points.as_ref())
            .switch("--createProcess", self.create_process)
            .switch(
                "--ignoreLibraryDeployConflict",
                self.ignore_library_deploy_conflict,
            )
            .extend(self.common.option_spec())
    }

    fn validate(&self) -> Result<()> {
        if self.packages_path.as_os_str().is_empty() {
            return Err(OrchError::missing("PACKAGES_PATH"));
        }
        Ok(())
    }
}
