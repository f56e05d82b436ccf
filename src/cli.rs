use clap::{ArgAction, Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::commands::CommonOptions;
use crate::commands::asset::{AssetArgs, AssetOperation};
use crate::commands::deploy::DeployArgs;
use crate::commands::job::JobRunArgs;
use crate::commands::pack::{LibraryFeed, PackArgs, RepositoryInfo};
use crate::commands::test_run::{TestRunArgs, TestTarget};
use crate::config_file::RunnerConfig;
use crate::credentials::{ConnectionInput, CredentialInput, OrchestratorConnection};
use crate::error::Result;
use crate::locator::{CliLocator, DEFAULT_CLI_NAME};
use crate::types::{JobPriority, JobType, OutputType, TestResultFormat, TraceLevel};

/// orchrun - drive the automation-platform CLI from CI pipelines
#[derive(Parser)]
#[command(name = "orchrun")]
#[command(about = "Pack, deploy and run automation projects with secret-safe command logging")]
#[command(version)]
pub struct Cli {
    /// JSON configuration file with defaults for the CLI location and
    /// orchestrator connection
    #[arg(long, global = true, env = "ORCHRUN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Exact path to the external CLI executable
    #[arg(long, global = true, env = "ORCHRUN_CLI_PATH")]
    pub cli_path: Option<PathBuf>,

    /// Append log output to this file as well as stderr
    #[arg(long, global = true, env = "ORCHRUN_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Dry-run mode: validate and log the redacted command line without
    /// launching the external CLI.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pack a project into a package
    Pack(PackCommand),
    /// Deploy packages to an orchestrator
    Deploy(DeployCommand),
    /// Orchestrator jobs
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Orchestrator test sets and test projects
    Test {
        #[command(subcommand)]
        command: TestCommands,
    },
    /// Orchestrator assets
    Asset {
        #[command(subcommand)]
        command: AssetCommands,
    },
    /// Print shell completions to stdout
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum JobCommands {
    /// Start a job and optionally wait for it
    Run(JobRunCommand),
}

#[derive(Subcommand)]
pub enum TestCommands {
    /// Run a test set or the tests of a project
    Run(TestRunCommand),
}

#[derive(Subcommand)]
pub enum AssetCommands {
    /// Create or update the assets listed in a CSV file
    Deploy(AssetCommand),
    /// Delete the assets listed in a CSV file
    Delete(AssetCommand),
}

// Orchestrator address and credentials. Secret values read from the
// environment are never echoed in help output.
#[derive(Args, Clone, Default)]
pub struct ConnectionArgs {
    /// Orchestrator base URL
    #[arg(long, env = "ORCHRUN_ORCHESTRATOR_URL")]
    pub orchestrator_url: Option<String>,
    /// Orchestrator tenant
    #[arg(long, env = "ORCHRUN_TENANT")]
    pub tenant: Option<String>,
    /// Orchestrator folder
    #[arg(long, env = "ORCHRUN_FOLDER")]
    pub folder: Option<String>,
    /// Identity server URL (on-premises external apps)
    #[arg(long, env = "ORCHRUN_IDENTITY_URL")]
    pub identity_url: Option<String>,
    /// On-premises username
    #[arg(long, env = "ORCHRUN_USERNAME")]
    pub username: Option<String>,
    /// On-premises password
    #[arg(long, env = "ORCHRUN_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
    /// Cloud user key (refresh token)
    #[arg(long, env = "ORCHRUN_USER_KEY", hide_env_values = true)]
    pub user_key: Option<String>,
    /// Cloud account name
    #[arg(long, env = "ORCHRUN_ACCOUNT_NAME")]
    pub account_name: Option<String>,
    /// External application account
    #[arg(long, env = "ORCHRUN_ACCOUNT_FOR_APP")]
    pub account_for_app: Option<String>,
    /// External application id
    #[arg(long, env = "ORCHRUN_APPLICATION_ID")]
    pub application_id: Option<String>,
    /// External application secret
    #[arg(long, env = "ORCHRUN_APPLICATION_SECRET", hide_env_values = true)]
    pub application_secret: Option<String>,
    /// External application scopes
    #[arg(long, env = "ORCHRUN_APPLICATION_SCOPE")]
    pub application_scope: Option<String>,
}

impl ConnectionArgs {
    /// Command-line values, with config defaults filling the gaps.
    pub fn to_input(&self, config: &RunnerConfig) -> ConnectionInput {
        let input = ConnectionInput {
            url: self.orchestrator_url.clone(),
            tenant: self.tenant.clone(),
            folder: self.folder.clone(),
            identity_url: self.identity_url.clone(),
            credentials: CredentialInput {
                username: self.username.clone(),
                password: self.password.clone(),
                user_key: self.user_key.clone(),
                account_name: self.account_name.clone(),
                account_for_app: self.account_for_app.clone(),
                application_id: self.application_id.clone(),
                application_secret: self.application_secret.clone(),
                application_scope: self.application_scope.clone(),
            },
        };
        config.orchestrator.fill(input)
    }

    pub fn resolve(&self, config: &RunnerConfig) -> Result<OrchestratorConnection> {
        OrchestratorConnection::resolve(&self.to_input(config))
    }
}

#[derive(Args, Clone, Default)]
pub struct CommonArgs {
    /// Language for external CLI messages (e.g. en-US)
    #[arg(long, env = "ORCHRUN_LANGUAGE")]
    pub language: Option<String>,
    /// External CLI trace level
    #[arg(long)]
    pub trace_level: Option<TraceLevel>,
}

impl CommonArgs {
    pub fn to_options(&self, config: &RunnerConfig) -> CommonOptions {
        CommonOptions {
            language: self.language.clone().or_else(|| config.language.clone()),
            trace_level: self.trace_level.or(config.trace_level),
        }
    }
}

#[derive(Args, Clone)]
pub struct PackCommand {
    /// Project directory or project.json
    pub project_path: PathBuf,
    /// Output directory for the package
    #[arg(long)]
    pub destination: PathBuf,
    /// Explicit package version
    #[arg(long)]
    pub package_version: Option<String>,
    /// Let the external CLI generate the version
    #[arg(long)]
    pub auto_version: bool,
    /// Package kind
    #[arg(long)]
    pub output_type: Option<OutputType>,
    /// Produce separate design-time and runtime packages
    #[arg(long)]
    pub split_output: bool,
    /// Release notes stored in the package
    #[arg(long)]
    pub release_notes: Option<String>,
    /// Do not query the built-in package feeds
    #[arg(long)]
    pub disable_builtin_feeds: bool,
    #[arg(long)]
    pub repository_url: Option<String>,
    #[arg(long)]
    pub repository_commit: Option<String>,
    #[arg(long)]
    pub repository_branch: Option<String>,
    /// Repository kind (e.g. git)
    #[arg(long)]
    pub repository_type: Option<String>,
    #[arg(long)]
    pub project_url: Option<String>,
    /// Orchestrator hosting the library feed
    #[arg(long)]
    pub library_orchestrator_url: Option<String>,
    #[arg(long)]
    pub library_orchestrator_tenant: Option<String>,
    #[arg(long)]
    pub library_orchestrator_account_for_app: Option<String>,
    #[arg(long)]
    pub library_orchestrator_application_id: Option<String>,
    #[arg(
        long,
        env = "ORCHRUN_LIBRARY_APPLICATION_SECRET",
        hide_env_values = true
    )]
    pub library_orchestrator_application_secret: Option<String>,
    #[arg(long)]
    pub library_orchestrator_application_scope: Option<String>,
    #[arg(long)]
    pub library_orchestrator_folder: Option<String>,
    #[command(flatten)]
    pub common: CommonArgs,
}

impl PackCommand {
    pub fn to_args(&self, config: &RunnerConfig) -> PackArgs {
        PackArgs {
            project_path: self.project_path.clone(),
            destination: self.destination.clone(),
            version: self.package_version.clone(),
            auto_version: self.auto_version,
            output_type: self.output_type,
            split_output: self.split_output,
            release_notes: self.release_notes.clone(),
            disable_builtin_feeds: self.disable_builtin_feeds,
            repository: RepositoryInfo {
                url: self.repository_url.clone(),
                commit: self.repository_commit.clone(),
                branch: self.repository_branch.clone(),
                kind: self.repository_type.clone(),
                project_url: self.project_url.clone(),
            },
            library: LibraryFeed {
                url: self.library_orchestrator_url.clone(),
                tenant: self.library_orchestrator_tenant.clone(),
                account_for_app: self.library_orchestrator_account_for_app.clone(),
                application_id: self.library_orchestrator_application_id.clone(),
                application_secret: self.library_orchestrator_application_secret.clone(),
                application_scope: self.library_orchestrator_application_scope.clone(),
                folder: self.library_orchestrator_folder.clone(),
            },
            common: self.common.to_options(config),
        }
    }
}

#[derive(Args, Clone)]
pub struct DeployCommand {
    /// Package file or directory of packages
    pub packages_path: PathBuf,
    #[command(flatten)]
    pub connection: ConnectionArgs,
    /// Comma-separated environments (classic folders)
    #[arg(long)]
    pub environments: Option<String>,
    /// Comma-separated entry points
    #[arg(long)]
    pub entry_points: Option<String>,
    /// Create a process for each deployed package
    #[arg(long)]
    pub create_process: bool,
    /// Skip libraries that already exist on the orchestrator
    #[arg(long)]
    pub ignore_library_deploy_conflict: bool,
    #[command(flatten)]
    pub common: CommonArgs,
}

impl DeployCommand {
    pub fn to_args(&self, config: &RunnerConfig) -> Result<DeployArgs> {
        Ok(DeployArgs {
            packages_path: self.packages_path.clone(),
            connection: self.connection.resolve(config)?,
            environments: self.environments.clone(),
            entry_points: self.entry_points.clone(),
            create_process: self.create_process,
            ignore_library_deploy_conflict: self.ignore_library_deploy_conflict,
            common: self.common.to_options(config),
        })
    }
}

#[derive(Args, Clone)]
pub struct JobRunCommand {
    /// Name of the process to start
    pub process_name: String,
    #[command(flatten)]
    pub connection: ConnectionArgs,
    /// JSON file with input arguments
    #[arg(long)]
    pub input_path: Option<PathBuf>,
    #[arg(long)]
    pub priority: Option<JobPriority>,
    /// Comma-separated robot names
    #[arg(long)]
    pub robots: Option<String>,
    /// Number of jobs to start with dynamic allocation
    #[arg(long)]
    pub jobs_count: Option<u32>,
    #[arg(long)]
    pub user: Option<String>,
    #[arg(long)]
    pub machine: Option<String>,
    /// Where job results are written
    #[arg(long)]
    pub result_path: Option<PathBuf>,
    /// Seconds to wait for the job
    #[arg(long)]
    pub timeout: Option<u64>,
    /// Fail when the job fails (true/false)
    #[arg(long, value_name = "BOOL")]
    pub fail_when_job_fails: Option<bool>,
    /// Wait for the job to finish (true/false)
    #[arg(long, value_name = "BOOL")]
    pub wait: Option<bool>,
    #[arg(long)]
    pub job_type: Option<JobType>,
    #[command(flatten)]
    pub common: CommonArgs,
}

impl JobRunCommand {
    pub fn to_args(&self, config: &RunnerConfig) -> Result<JobRunArgs> {
        Ok(JobRunArgs {
            input_path: self.input_path.clone(),
            priority: self.priority,
            robots: self.robots.clone(),
            jobs_count: self.jobs_count,
            user: self.user.clone(),
            machine: self.machine.clone(),
            result_path: self.result_path.clone(),
            timeout_secs: self.timeout,
            fail_when_job_fails: self.fail_when_job_fails,
            wait: self.wait,
            job_type: self.job_type,
            common: self.common.to_options(config),
            ..JobRunArgs::new(self.process_name.clone(), self.connection.resolve(config)?)
        })
    }
}

#[derive(Args, Clone)]
pub struct TestRunCommand {
    #[command(flatten)]
    pub connection: ConnectionArgs,
    /// Test set defined on the orchestrator
    #[arg(long)]
    pub test_set: Option<String>,
    /// Local project whose test cases are run
    #[arg(long)]
    pub project_path: Option<PathBuf>,
    /// Environment to run the project tests in
    #[arg(long)]
    pub environment: Option<String>,
    /// Result file format
    #[arg(long)]
    pub result_format: Option<TestResultFormat>,
    /// Where the result file is written
    #[arg(long)]
    pub result_path: Option<PathBuf>,
    /// Seconds to wait for the tests
    #[arg(long)]
    pub timeout: Option<u64>,
    /// JSON file with input arguments
    #[arg(long)]
    pub input_path: Option<PathBuf>,
    /// Attach robot logs to the results
    #[arg(long)]
    pub attach_robot_logs: bool,
    /// Retries for failed test cases
    #[arg(long)]
    pub retry_count: Option<u32>,
    #[command(flatten)]
    pub common: CommonArgs,
}

impl TestRunCommand {
    pub fn to_args(&self, config: &RunnerConfig) -> Result<TestRunArgs> {
        let target = TestTarget::from_parts(self.test_set.clone(), self.project_path.clone())?;
        Ok(TestRunArgs {
            environment: self.environment.clone(),
            result_format: self.result_format,
            result_path: self.result_path.clone(),
            timeout_secs: self.timeout,
            input_path: self.input_path.clone(),
            attach_robot_logs: self.attach_robot_logs,
            retry_count: self.retry_count,
            common: self.common.to_options(config),
            ..TestRunArgs::new(self.connection.resolve(config)?, target)
        })
    }
}

#[derive(Args, Clone)]
pub struct AssetCommand {
    /// CSV file describing the assets
    pub assets_file: PathBuf,
    #[command(flatten)]
    pub connection: ConnectionArgs,
    #[command(flatten)]
    pub common: CommonArgs,
}

impl AssetCommand {
    pub fn to_args(&self, operation: AssetOperation, config: &RunnerConfig) -> Result<AssetArgs> {
        Ok(AssetArgs {
            operation,
            assets_file: self.assets_file.clone(),
            connection: self.connection.resolve(config)?,
            common: self.common.to_options(config),
        })
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }

    /// Locator honoring `--cli-path` first, then the config file.
    pub fn locator(&self, config: &RunnerConfig) -> CliLocator {
        CliLocator::new(config.cli_name.as_deref().unwrap_or(DEFAULT_CLI_NAME))
            .explicit(self.cli_path.clone())
            .configured(config.cli_path.clone())
            .cli_dir(config.cli_dir.clone())
    }

    /// `--log-file` wins over the config file.
    pub fn log_file(&self, config: &RunnerConfig) -> Option<PathBuf> {
        self.log_file.clone().or_else(|| config.log_file.clone())
    }
}
