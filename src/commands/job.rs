//! Type-safe arguments for `job run`.

use std::path::PathBuf;

use crate::arguments::OptionSpec;
use crate::commands::{CommonOptions, bool_literal};
use crate::credentials::OrchestratorConnection;
use crate::error::{OrchError, Result};
use crate::invocation::CliInvocation;
use crate::types::{JobPriority, JobType};

/// Type-safe arguments for `job run`.
///
/// # Field to Flag Mapping
///
/// | Rust Field            | CLI Flag / Position |
/// |-----------------------|---------------------|
/// | `process_name`        | positional 1        |
/// | `connection.url`      | positional 2        |
/// | `connection.tenant`   | positional 3        |
/// | `input_path`          | `-i`                |
/// | `priority`            | `-P`                |
/// | `robots`              | `-r`                |
/// | `jobs_count`          | `-j`                |
/// | `user`                | `-U`                |
/// | `machine`             | `-M`                |
/// | `result_path`         | `-R`                |
/// | `timeout_secs`        | `-T`                |
/// | `fail_when_job_fails` | `-f true\|false`    |
/// | `wait`                | `-w true\|false`    |
/// | `job_type`            | `-b`                |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRunArgs {
    pub process_name: String,
    pub connection: OrchestratorConnection,
    /// JSON file with input arguments.
    pub input_path: Option<PathBuf>,
    pub priority: Option<JobPriority>,
    /// Comma-separated robot names.
    pub robots: Option<String>,
    pub jobs_count: Option<u32>,
    pub user: Option<String>,
    pub machine: Option<String>,
    /// Where the external CLI writes job results.
    pub result_path: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub fail_when_job_fails: Option<bool>,
    pub wait: Option<bool>,
    pub job_type: Option<JobType>,
    pub common: CommonOptions,
}

impl JobRunArgs {
    /// Arguments with only the required fields set.
    pub fn new(process_name: impl Into<String>, connection: OrchestratorConnection) -> Self {
        Self {
            process_name: process_name.into(),
            connection,
            input_path: None,
            priority: None,
            robots: None,
            jobs_count: None,
            user: None,
            machine: None,
            result_path: None,
            timeout_secs: None,
            fail_when_job_fails: None,
            wait: None,
            job_type: None,
            common: CommonOptions::default(),
        }
    }
}

impl CliInvocation for JobRunArgs {
    fn command_name(&self) -> &'static str {
        "job run"
    }

    fn option_spec(&self) -> OptionSpec {
        OptionSpec::command(&["job", "run"])
            .positional(&self.process_name)
            .extend(self.connection.positional_spec())
            .extend(self.connection.flag_spec())
            .flag("-i", self.input_path.as_ref().map(|p| p.display()))
            .flag("-P", self.priority)
            .flag("-r", self.robots.as_ref())
            .flag("-j", self.jobs_count)
            .flag("-U", self.user.as_ref())
            .flag("-M", self.machine.as_ref())
            .flag("-R", self.result_path.as_ref().map(|p| p.display()))
            .flag("-T", self.timeout_secs)
            .flag("-f", bool_literal(self.fail_when_job_fails))
            .flag("-w", bool_literal(self.wait))
            .flag("-b", self.job_type)
            .extend(self.common.option_spec())
    }

    fn validate(&self) -> Result<()> {
        if self.process_name.trim().is_empty() {
            return Err(OrchError::missing("PROCESS_NAME"));
        }
        if self.jobs_count == Some(0) {
            return Err(OrchError::validation("--jobs-count must be at least 1"));
        }
        Ok(())
    }
}
