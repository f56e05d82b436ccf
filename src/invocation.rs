//! Type-safe external CLI invocation contracts.
//!
//! This module provides the `CliInvocation` trait. Instead of building raw
//! string vectors at each call site, one struct per external CLI command
//! implements this trait and describes its arguments as an
//! [`OptionSpec`].
//!
//! # Design Goals
//!
//! 1. **Single Source of Truth**: the struct definition IS the flag mapping.
//! 2. **Declared Secrets**: secret fields are declared with a
//!    [`SecretKind`](crate::redact::SecretKind) where the flag is added.
//! 3. **Validate Before Build**: `validate()` runs before anything is
//!    rendered or launched.

use crate::arguments::{ArgumentVector, OptionSpec, RenderedCommand};
use crate::error::Result;
use crate::redact::{RedactedVector, RedactionTable};

/// Trait for typed external CLI invocations.
///
/// # Contract
///
/// - `option_spec()`: command words, then positionals, then flags, exactly as
///   the external CLI expects them.
/// - `validate()`: rejects parameter combinations the external CLI would
///   refuse, with the offending parameter names.
/// - `command_name()`: short label for logs (e.g. `"package deploy"`).
///
/// # Example
///
/// ```ignore
/// let args = AssetArgs { operation: AssetOperation::Deploy, .. };
/// args.validate()?;
/// let cli_args = args.to_cli_args();     // ["asset", "deploy", "assets.csv", ...]
/// let logged = args.redacted_args();     // same, secrets masked
/// ```
pub trait CliInvocation {
    /// Label used in log lines.
    fn command_name(&self) -> &'static str;

    /// Ordered option list for this invocation.
    fn option_spec(&self) -> OptionSpec;

    /// Check parameter combinations before building.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Render both vectors against the central redaction table.
    fn render(&self) -> RenderedCommand {
        self.option_spec().render(&RedactionTable::default())
    }

    /// Arguments passed verbatim to the external CLI.
    fn to_cli_args(&self) -> ArgumentVector {
        self.option_spec().to_argument_vector()
    }

    /// Display-safe arguments.
    fn redacted_args(&self) -> RedactedVector {
        self.render().redacted
    }
}
