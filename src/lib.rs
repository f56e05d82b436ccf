//! orchrun library
//!
//! Typed invocations of the automation-platform CLI, the argument builder
//! and redactor that keep secrets out of logs, and the launcher that runs
//! the external CLI and propagates its exit code.

pub mod arguments;
pub mod cli;
pub mod commands;
pub mod config_file;
pub mod credentials;
pub mod error;
pub mod exit_codes;
pub mod invocation;
pub mod locator;
pub mod logging;
pub mod process_guard;
pub mod redact;
pub mod runner;
pub mod types;

// Re-export main types for convenience
pub use arguments::{ArgumentVector, OptionEntry, OptionSpec, RenderedCommand, Slot, build};
pub use commands::CommonOptions;
pub use commands::asset::{AssetArgs, AssetOperation};
pub use commands::deploy::DeployArgs;
pub use commands::job::JobRunArgs;
pub use commands::pack::{LibraryFeed, PackArgs, RepositoryInfo};
pub use commands::test_run::{TestRunArgs, TestTarget};
pub use config_file::{OrchestratorDefaults, RunnerConfig};
pub use credentials::{ConnectionInput, CredentialInput, Credentials, OrchestratorConnection};
pub use error::OrchError;
pub use invocation::CliInvocation;
pub use locator::CliLocator;
pub use process_guard::{ChildRegistry, CommandProcessGroup};
pub use redact::{
    MaskingRule, RedactedVector, RedactionTable, SecretKind, SensitivePositions, Sensitivity,
    redact,
};
pub use runner::{RunOutcome, execute, run_cli_safe};
pub use types::{JobPriority, JobType, OutputType, TestResultFormat, TraceLevel};
