//! Stable exit codes reported by the wrapper itself.
//!
//! When the external CLI runs, its own exit code is propagated unchanged and
//! none of these apply.

/// Success, or a dry run that completed.
pub const OK: i32 = 0;
/// The external CLI could not be launched, or an internal failure occurred.
pub const FAILURE: i32 = 1;
/// Invalid, conflicting, or missing parameters. Matches clap's usage errors.
pub const USAGE: i32 = 2;
/// The external CLI executable was not found.
pub const CLI_NOT_FOUND: i32 = 127;
/// Base for "terminated by signal N" (`SIGNAL_BASE + N`).
pub const SIGNAL_BASE: i32 = 128;
