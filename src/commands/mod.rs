//! Type-safe invocation structs for each external CLI command.
//!
//! Each struct implements `CliInvocation` and maps its fields to the exact
//! command words, positionals and flags the external CLI expects.

pub mod asset;
pub mod deploy;
pub mod job;
pub mod pack;
pub mod test_run;

use crate::arguments::OptionSpec;
use crate::types::TraceLevel;

/// Flags every external CLI command accepts.
///
/// | Field         | Flag           |
/// |---------------|----------------|
/// | `language`    | `-l`           |
/// | `trace_level` | `--traceLevel` |
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonOptions {
    /// Locale for CLI messages (e.g. `en-US`).
    pub language: Option<String>,
    /// External CLI log verbosity.
    pub trace_level: Option<TraceLevel>,
}

impl CommonOptions {
    pub fn option_spec(&self) -> OptionSpec {
        OptionSpec::new()
            .flag("-l", self.language.as_ref())
            .flag("--traceLevel", self.trace_level)
    }
}

/// Render an optional `bool` as the `true`/`false` literal the external CLI
/// takes for valued boolean flags.
pub(crate) fn bool_literal(value: Option<bool>) -> Option<&'static str> {
    value.map(|v| if v { "true" } else { "false" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_options_omitted_when_unset() {
        assert!(CommonOptions::default().option_spec().is_empty());
    }

    #[test]
    fn test_common_options_flags() {
        let common = CommonOptions {
            language: Some("en-US".to_string()),
            trace_level: Some(TraceLevel::Verbose),
        };
        assert_eq!(
            common.option_spec().to_argument_vector().as_slice(),
            &["-l", "en-US", "--traceLevel", "Verbose"]
        );
    }

    #[test]
    fn test_bool_literal() {
        assert_eq!(bool_literal(Some(true)), Some("true"));
        assert_eq!(bool_literal(Some(false)), Some("false"));
        assert_eq!(bool_literal(None), None);
    }
}
