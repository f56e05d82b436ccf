//! Type-safe arguments for `test run`.

use std::path::PathBuf;

use crate::arguments::OptionSpec;
use crate::commands::CommonOptions;
use crate::credentials::OrchestratorConnection;
use crate::error::{OrchError, Result};
use crate::invocation::CliInvocation;
use crate::types::TestResultFormat;

/// What `test run` executes: a test set already defined on the
/// orchestrator, or every test case of a local project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestTarget {
    TestSet(String),
    Project(PathBuf),
}

impl TestTarget {
    /// Exactly one of `test_set` / `project_path` must be given.
    pub fn from_parts(test_set: Option<String>, project_path: Option<PathBuf>) -> Result<Self> {
        let test_set = test_set.filter(|s| !s.trim().is_empty());
        let project_path = project_path.filter(|p| !p.as_os_str().is_empty());
        match (test_set, project_path) {
            (Some(set), None) => Ok(TestTarget::TestSet(set)),
            (None, Some(path)) => Ok(TestTarget::Project(path)),
            (Some(_), Some(_)) => Err(OrchError::conflict("--test-set", "--project-path")),
            (None, None) => Err(OrchError::missing("--test-set or --project-path")),
        }
    }
}

/// Type-safe arguments for `test run`.
///
/// # Field to Flag Mapping
///
/// | Rust Field          | CLI Flag / Position |
/// |---------------------|---------------------|
/// | `connection.url`    | positional 1        |
/// | `connection.tenant` | positional 2        |
/// | `target`            | `-s` (test set) or `-P` (project path) |
/// | `environment`       | `-e`                |
/// | `result_format`     | `--out`             |
/// | `result_path`       | `-r`                |
/// | `timeout_secs`      | `-w`                |
/// | `input_path`        | `-i`                |
/// | `attach_robot_logs` | `--attachRobotLogs` |
/// | `retry_count`       | `--retryCount`      |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRunArgs {
    pub connection: OrchestratorConnection,
    pub target: TestTarget,
    pub environment: Option<String>,
    pub result_format: Option<TestResultFormat>,
    pub result_path: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub input_path: Option<PathBuf>,
    pub attach_robot_logs: bool,
    pub retry_count: Option<u32>,
    pub common: CommonOptions,
}

impl TestRunArgs {
    pub fn new(connection: OrchestratorConnection, target: TestTarget) -> Self {
        Self {
            connection,
            target,
            environment: None,
            result_format: None,
            result_path: None,
            timeout_secs: None,
            input_path: None,
            attach_robot_logs: false,
            retry_count: None,
            common: CommonOptions::default(),
        }
    }
}

impl CliInvocation for TestRunArgs {
    fn command_name(&self) -> &'static str {
        "test run"
    }

    fn option_spec(&self) -> OptionSpec {
        let target = match &self.target {
            TestTarget::TestSet(set) => OptionSpec::new().flag("-s", Some(set)),
            TestTarget::Project(path) => OptionSpec::new().flag("-P", Some(path.display())),
        };
        OptionSpec::command(&["test", "run"])
            .extend(self.connection.positional_spec())
            .extend(self.connection.flag_spec())
            .extend(target)
            .flag("-e", self.environment.as_ref())
            .flag("--out", self.result_format)
            .flag("-r", self.result_path.as_ref().map(|p| p.display()))
            .flag("-w", self.timeout_secs)
            .flag("-i", self.input_path.as_ref().map(|p| p.display()))
            .switch("--attachRobotLogs", self.attach_robot_logs)
            .flag("--retryCount", self.retry_count)
            .extend(self.common.option_spec())
    }

    fn validate(&self) -> Result<()> {
        match &self.target {
            TestTarget::TestSet(set) if set.trim().is_empty() => {
                Err(OrchError::missing("--test-set or --project-path"))
            }
            TestTarget::Project(path) if path.as_os_str().is_empty() => {
                Err(OrchError::missing("--test-set or --project-path"))
            }
            _ => Ok(()),
        }
    }
}
