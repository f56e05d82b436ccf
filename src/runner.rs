//! Type-safe external CLI execution
//!
//! This module provides the ONLY sanctioned way to launch the external CLI.
//! All invocations go through [`execute`] or [`run_cli_safe`] to ensure:
//!
//! - Parameters are validated before anything is launched
//! - The log line is built from the redacted vector, never the raw one
//! - The child runs in its own process group and is tracked for cancellation
//! - The child's exit code is returned unchanged

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::PoisonError;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::arguments::RenderedCommand;
use crate::error::OrchError;
use crate::exit_codes;
use crate::invocation::CliInvocation;
use crate::locator::CliLocator;
use crate::process_guard::{ChildRegistry, CommandProcessGroup};
use crate::redact::RedactedVector;

/// Result of one external CLI invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Exit code to report: the child's own code, `128 + signal` if it was
    /// killed, or 0 for a dry run.
    pub exit_code: i32,
    /// The logged (redacted) command line.
    pub command_line: String,
    /// Whether the CLI was actually skipped.
    pub dry_run: bool,
}

/// The log line for an invocation: executable path, then the redacted
/// arguments separated by spaces.
pub fn render_command_line(cli_path: &Path, redacted: &RedactedVector) -> String {
    if redacted.is_empty() {
        cli_path.display().to_string()
    } else {
        format!("{} {}", cli_path.display(), redacted)
    }
}

/// Validate, locate the external CLI, and run it.
///
/// Validation runs first so parameter errors are reported even when the
/// CLI is not installed. In dry-run mode a missing CLI is tolerated and the
/// bare executable name is logged instead.
pub fn execute<T: CliInvocation>(
    invocation: &T,
    locator: &CliLocator,
    dry_run: bool,
) -> Result<RunOutcome> {
    invocation.validate()?;

    let cli_path = match locator.locate() {
        Ok(path) => path,
        Err(err) if dry_run => {
            warn!(error = %err, "external CLI not found, continuing dry run");
            PathBuf::from(locator.file_name())
        }
        Err(err) => return Err(err.into()),
    };

    launch(&cli_path, invocation.command_name(), &invocation.render(), dry_run)
}

/// Run an invocation against a known executable path.
///
/// # Returns
///
/// - `Ok(outcome)` - the CLI ran (any exit code) or the dry run completed
/// - `Err` - validation failed, or the process could not be spawned or
///   waited on
pub fn run_cli_safe<T: CliInvocation>(
    cli_path: &Path,
    invocation: &T,
    dry_run: bool,
) -> Result<RunOutcome> {
    invocation.validate()?;
    launch(cli_path, invocation.command_name(), &invocation.render(), dry_run)
}

fn launch(
    cli_path: &Path,
    command_name: &str,
    rendered: &RenderedCommand,
    dry_run: bool,
) -> Result<RunOutcome> {
    let command_line = render_command_line(cli_path, &rendered.redacted);
    info!(command = command_name, "{}", command_line);

    if dry_run {
        info!(command = command_name, "dry run, external CLI not executed");
        return Ok(RunOutcome {
            exit_code: exit_codes::OK,
            command_line,
            dry_run: true,
        });
    }

    let mut cmd = Command::new(cli_path);
    cmd.args(rendered.args.as_slice())
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .in_new_process_group();

    // Held from spawn through register so a cancellation arriving in
    // between still finds the child.
    let registry = ChildRegistry::global();
    let (mut child, pid) = {
        let mut guard = registry.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.is_cancelled() {
            return Err(OrchError::Launch {
                path: cli_path.to_path_buf(),
                reason: "cancellation already in progress".to_string(),
            }
            .into());
        }
        let child = cmd.spawn().map_err(|e| OrchError::Launch {
            path: cli_path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let pid = child.id();
        guard.register(pid);
        (child, pid)
    };

    let status = child
        .wait()
        .with_context(|| format!("Failed waiting for {}", command_name));

    registry
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .unregister(pid);

    let exit_code = exit_code_of(status?);
    if exit_code == exit_codes::OK {
        info!(command = command_name, "external CLI succeeded");
    } else {
        warn!(command = command_name, exit_code, "external CLI failed");
    }

    Ok(RunOutcome {
        exit_code,
        command_line,
        dry_run: false,
    })
}

/// Map a child's status to the exit code the wrapper reports.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(sig)) => exit_codes::SIGNAL_BASE + sig,
        (None, None) => exit_codes::FAILURE,
    }
}
