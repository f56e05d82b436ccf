//! orchrun - main entry point
//!
//! Parses the command line, loads the optional config file, sets up logging
//! and signal forwarding, then hands one invocation to the runner. The
//! process exits with the external CLI's exit code.

use anyhow::Result;
use clap::CommandFactory;
use tracing::{debug, error, warn};

use orchrun::cli::{AssetCommands, Cli, Commands, JobCommands, TestCommands};
use orchrun::commands::asset::AssetOperation;
use orchrun::config_file::RunnerConfig;
use orchrun::error::OrchError;
use orchrun::{exit_codes, logging, process_guard, runner};

fn main() {
    let cli = Cli::parse_args();

    // Logging is not up yet; the config names the log file
    let config = match RunnerConfig::load_optional(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("orchrun: {:#}", e);
            std::process::exit(exit_code_for(&e));
        }
    };

    if let Err(e) = logging::init(cli.log_file(&config).as_deref(), cli.verbose) {
        eprintln!("orchrun: {:#}", e);
        std::process::exit(exit_codes::FAILURE);
    }

    if let Err(e) = process_guard::init_signal_handlers() {
        warn!(error = %e, "failed to install signal handlers, cancellation will not reach the external CLI");
    }
    debug!("signal handlers initialized");

    let code = match run(&cli, &config) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            exit_code_for(&e)
        }
    };
    std::process::exit(code);
}

fn run(cli: &Cli, config: &RunnerConfig) -> Result<i32> {
    let locator = cli.locator(config);
    let dry_run = cli.dry_run;

    let outcome = match &cli.command {
        Commands::Pack(pack) => runner::execute(&pack.to_args(config), &locator, dry_run)?,
        Commands::Deploy(deploy) => runner::execute(&deploy.to_args(config)?, &locator, dry_run)?,
        Commands::Job {
            command: JobCommands::Run(job),
        } => runner::execute(&job.to_args(config)?, &locator, dry_run)?,
        Commands::Test {
            command: TestCommands::Run(test),
        } => runner::execute(&test.to_args(config)?, &locator, dry_run)?,
        Commands::Asset { command } => {
            let args = match command {
                AssetCommands::Deploy(asset) => asset.to_args(AssetOperation::Deploy, config)?,
                AssetCommands::Delete(asset) => asset.to_args(AssetOperation::Delete, config)?,
            };
            runner::execute(&args, &locator, dry_run)?
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut std::io::stdout());
            return Ok(exit_codes::OK);
        }
    };
    Ok(outcome.exit_code)
}

/// Domain errors carry their own exit code; anything else is a failure.
fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<OrchError>())
        .map(OrchError::exit_code)
        .unwrap_or(exit_codes::FAILURE)
}
