//! Type-safe arguments for `asset deploy` and `asset delete`.
//!
//! Assets are described in a CSV file the external CLI reads. The wrapper
//! only passes the file path; it does not parse or validate its contents.

use std::path::PathBuf;

use strum::{Display, EnumString};

use crate::arguments::OptionSpec;
use crate::commands::CommonOptions;
use crate::credentials::OrchestratorConnection;
use crate::error::{OrchError, Result};
use crate::invocation::CliInvocation;

/// Asset operation, rendered as the external CLI's command word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AssetOperation {
    /// Create or update every asset in the file
    Deploy,
    /// Delete every asset named in the file
    Delete,
}

impl AssetOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetOperation::Deploy => "deploy",
            AssetOperation::Delete => "delete",
        }
    }
}

/// Type-safe arguments for `asset deploy|delete`.
///
/// # Field to Flag Mapping
///
/// | Rust Field          | CLI Flag / Position |
/// |---------------------|---------------------|
/// | `operation`         | command word 2      |
/// | `assets_file`       | positional 1        |
/// | `connection.url`    | positional 2        |
/// | `connection.tenant` | positional 3        |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetArgs {
    pub operation: AssetOperation,
    pub assets_file: PathBuf,
    pub connection: OrchestratorConnection,
    pub common: CommonOptions,
}

impl CliInvocation for AssetArgs {
    fn command_name(&self) -> &'static str {
        match self.operation {
            AssetOperation::Deploy => "asset deploy",
            AssetOperation::Delete => "asset delete",
        }
    }

    fn option_spec(&self) -> OptionSpec {
        OptionSpec::command(&["asset", self.operation.as_str()])
            .positional(self.assets_file.display())
            .extend(self.connection.positional_spec())
            .extend(self.connection.flag_spec())
            .extend(self.common.option_spec())
    }

    fn validate(&self) -> Result<()> {
        if self.assets_file.as_os_str().is_empty() {
            return Err(OrchError::missing("ASSETS_FILE"));
        }
        Ok(())
    }
}
