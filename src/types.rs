//! Typed values for external CLI options.
//!
//! Each enum renders (`Display`) exactly the token the external CLI expects
//! and parses case-insensitively, so clap accepts `--trace-level verbose`
//! as well as `Verbose`.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Logging verbosity passed to the external CLI as `--traceLevel`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum TraceLevel {
    None,
    Critical,
    Error,
    Warning,
    #[default]
    Information,
    Verbose,
}

/// Package kind produced by `package pack`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum OutputType {
    Process,
    Library,
    Tests,
    Objects,
    /// Let the project decide
    #[default]
    None,
}

/// Job priority for `job run`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum JobPriority {
    Low,
    #[default]
    Normal,
    High,
}

/// Robot license type a job runs under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum JobType {
    #[default]
    Unattended,
    NonProduction,
    Development,
}

/// Report format written by `test run`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TestResultFormat {
    #[default]
    Junit,
    Uipath,
}
