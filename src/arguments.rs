//! Argument vector construction for the external CLI.
//!
//! An [`OptionSpec`] is an immutable, ordered description of one invocation:
//! command words and positionals first, then flags and switches. It is built
//! by chaining, rendered once into an [`ArgumentVector`] for the subprocess,
//! and into a [`RedactedVector`] for the log.
//!
//! # Omission
//!
//! Any value that is `None` or an empty string is dropped together with its
//! flag token. No placeholder is emitted.
//!
//! # Example
//!
//! ```
//! use orchrun::arguments::OptionSpec;
//! use orchrun::redact::{RedactionTable, SecretKind};
//!
//! let rendered = OptionSpec::command(&["job", "run"])
//!     .positional("Nightly")
//!     .flag("-o", Some("Shared"))
//!     .flag("-i", None::<&str>)
//!     .secret("-p", Some("hunter2"), SecretKind::Password)
//!     .render(&RedactionTable::default());
//!
//! assert_eq!(rendered.args.as_slice(), &["job", "run", "Nightly", "-o", "Shared", "-p", "hunter2"]);
//! assert_eq!(rendered.redacted.to_string(), "job run Nightly -o Shared -p *******");
//! ```

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Deref;

use crate::redact::{RedactedVector, RedactionTable, SecretKind, SensitivePositions, Sensitivity, redact};

/// Ordered arguments passed verbatim to the subprocess.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentVector(Vec<String>);

impl ArgumentVector {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Deref for ArgumentVector {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for ArgumentVector {
    fn from(args: Vec<String>) -> Self {
        Self(args)
    }
}

impl FromIterator<String> for ArgumentVector {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One entry of an [`OptionSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionEntry {
    /// A bare value (command word or positional argument).
    Positional { value: String, sensitivity: Sensitivity },
    /// A flag token followed by its value.
    Flag {
        token: String,
        value: String,
        sensitivity: Sensitivity,
    },
    /// A flag token with no value.
    Switch { token: String },
}

impl OptionEntry {
    fn width(&self) -> usize {
        match self {
            OptionEntry::Positional { .. } | OptionEntry::Switch { .. } => 1,
            OptionEntry::Flag { .. } => 2,
        }
    }
}

/// Both renderings of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCommand {
    /// Passed to the subprocess.
    pub args: ArgumentVector,
    /// Written to the log.
    pub redacted: RedactedVector,
}

/// Immutable, ordered option list for a single external CLI invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSpec {
    entries: Vec<OptionEntry>,
}

fn present<V: ToString>(value: Option<V>) -> Option<String> {
    value.map(|v| v.to_string()).filter(|v| !v.is_empty())
}

impl OptionSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a spec with the external CLI's command words
    /// (e.g. `["package", "pack"]`).
    pub fn command(words: &[&str]) -> Self {
        words
            .iter()
            .fold(Self::new(), |spec, word| spec.positional(*word))
    }

    /// Append a plain positional value. Empty values are dropped.
    pub fn positional(self, value: impl ToString) -> Self {
        self.push_positional(Some(value), Sensitivity::Plain)
    }

    /// Append a positional value if present.
    pub fn positional_opt<V: ToString>(self, value: Option<V>) -> Self {
        self.push_positional(value, Sensitivity::Plain)
    }

    /// Append `token value` when `value` is present and non-empty.
    pub fn flag<V: ToString>(self, token: &str, value: Option<V>) -> Self {
        self.flag_with(token, value, Sensitivity::Plain)
    }

    /// Append `token value` where `value` is a secret of `kind`.
    pub fn secret<V: ToString>(self, token: &str, value: Option<V>, kind: SecretKind) -> Self {
        self.flag_with(token, value, Sensitivity::Secret(kind))
    }

    pub fn flag_with<V: ToString>(
        mut self,
        token: &str,
        value: Option<V>,
        sensitivity: Sensitivity,
    ) -> Self {
        if let Some(value) = present(value) {
            self.entries.push(OptionEntry::Flag {
                token: token.to_string(),
                value,
                sensitivity,
            });
        }
        self
    }

    /// Append a value-less switch when `enabled`.
    pub fn switch(mut self, token: &str, enabled: bool) -> Self {
        if enabled {
            self.entries.push(OptionEntry::Switch {
                token: token.to_string(),
            });
        }
        self
    }

    /// Append every entry of `other`, in order.
    pub fn extend(mut self, other: OptionSpec) -> Self {
        self.entries.extend(other.entries);
        self
    }

    fn push_positional<V: ToString>(mut self, value: Option<V>, sensitivity: Sensitivity) -> Self {
        if let Some(value) = present(value) {
            self.entries.push(OptionEntry::Positional { value, sensitivity });
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flattened argument vector.
    pub fn to_argument_vector(&self) -> ArgumentVector {
        let mut args = Vec::with_capacity(self.entries.iter().map(OptionEntry::width).sum());
        for entry in &self.entries {
            match entry {
                OptionEntry::Positional { value, .. } => args.push(value.clone()),
                OptionEntry::Flag { token, value, .. } => {
                    args.push(token.clone());
                    args.push(value.clone());
                }
                OptionEntry::Switch { token } => args.push(token.clone()),
            }
        }
        ArgumentVector(args)
    }

    /// Indices that were declared sensitive, in argument-vector coordinates.
    pub fn sensitive_positions(&self) -> SensitivePositions {
        let mut positions = SensitivePositions::new();
        let mut index = 0;
        for entry in &self.entries {
            match entry {
                OptionEntry::Positional { sensitivity, .. } => {
                    if let Some(rule) = sensitivity.masking_rule() {
                        positions.mark(index, rule);
                    }
                }
                OptionEntry::Flag { sensitivity, .. } => {
                    if let Some(rule) = sensitivity.masking_rule() {
                        positions.mark(index + 1, rule);
                    }
                }
                OptionEntry::Switch { .. } => {}
            }
            index += entry.width();
        }
        positions
    }

    /// Indices marked by `table`. Only the token of a `Flag` entry is looked
    /// up, so a value that reads like a flag never marks its neighbour.
    pub fn table_positions(&self, table: &RedactionTable) -> SensitivePositions {
        let mut positions = SensitivePositions::new();
        let mut index = 0;
        for entry in &self.entries {
            if let OptionEntry::Flag { token, .. } = entry {
                if let Some(kind) = table.kind_for(token) {
                    positions.mark(index + 1, kind.masking_rule());
                }
            }
            index += entry.width();
        }
        positions
    }

    /// Render both vectors. Declared sensitivities and `table` are combined;
    /// where both mark an index the stricter rule applies.
    pub fn render(&self, table: &RedactionTable) -> RenderedCommand {
        let args = self.to_argument_vector();
        let positions = self.sensitive_positions().merge(self.table_positions(table));
        let redacted = redact(&args, &positions);
        RenderedCommand { args, redacted }
    }
}

/// How a [`Slot`] is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Positional,
    Flag(&'static str),
    /// Emitted only when the parameter value is truthy
    /// (`true`, `yes`, `1`).
    Switch(&'static str),
}

/// One position in a fixed parameter ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub name: &'static str,
    pub kind: SlotKind,
    pub sensitivity: Sensitivity,
}

impl Slot {
    pub const fn positional(name: &'static str) -> Self {
        Self {
            name,
            kind: SlotKind::Positional,
            sensitivity: Sensitivity::Plain,
        }
    }

    pub const fn flag(name: &'static str, token: &'static str) -> Self {
        Self {
            name,
            kind: SlotKind::Flag(token),
            sensitivity: Sensitivity::Plain,
        }
    }

    pub const fn secret(name: &'static str, token: &'static str, kind: SecretKind) -> Self {
        Self {
            name,
            kind: SlotKind::Flag(token),
            sensitivity: Sensitivity::Secret(kind),
        }
    }

    pub const fn switch(name: &'static str, token: &'static str) -> Self {
        Self {
            name,
            kind: SlotKind::Switch(token),
            sensitivity: Sensitivity::Plain,
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "true" | "yes" | "1")
}

impl OptionSpec {
    /// Build a spec from named parameters laid out by a fixed `ordering`.
    ///
    /// Parameters not named by `ordering` are ignored.
    pub fn from_params<K, V>(params: &HashMap<K, Option<V>>, ordering: &[Slot]) -> Self
    where
        K: Borrow<str> + Hash + Eq,
        V: AsRef<str>,
    {
        ordering.iter().fold(Self::new(), |spec, slot| {
            let value: Option<&str> = params
                .get(slot.name)
                .and_then(|v| v.as_ref())
                .map(|v| v.as_ref());
            match slot.kind {
                SlotKind::Positional => spec.push_positional(value, slot.sensitivity),
                SlotKind::Flag(token) => spec.flag_with(token, value, slot.sensitivity),
                SlotKind::Switch(token) => spec.switch(token, value.is_some_and(is_truthy)),
            }
        })
    }
}

/// Map named parameters to an argument vector using `ordering`.
///
/// Absent or empty values are skipped along with their flag tokens.
pub fn build<K, V>(params: &HashMap<K, Option<V>>, ordering: &[Slot]) -> ArgumentVector
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<str>,
{
    OptionSpec::from_params(params, ordering).to_argument_vector()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_omits_empty_values() {
        let params: HashMap<&str, Option<&str>> =
            HashMap::from([("-o", Some("")), ("-p", Some("secret"))]);
        let ordering = [Slot::flag("-o", "-o"), Slot::flag("-p", "-p")];
        assert_eq!(build(&params, &ordering).as_slice(), &["-p", "secret"]);
    }

    #[test]
    fn test_build_omits_absent_values() {
        let params: HashMap<&str, Option<String>> =
            HashMap::from([("folder", None), ("tenant", Some("Default".to_string()))]);
        let ordering = [
            Slot::flag("folder", "-o"),
            Slot::flag("tenant", "--tenant"),
            Slot::flag("not-supplied", "-x"),
        ];
        assert_eq!(build(&params, &ordering).as_slice(), &["--tenant", "Default"]);
    }

    #[test]
    fn test_build_follows_ordering_not_map_order() {
        let params: HashMap<&str, Option<&str>> = HashMap::from([
            ("dest", Some("/out")),
            ("name", Some("pkg.nupkg")),
            ("auto", Some("TRUE")),
            ("split", Some("false")),
        ]);
        let ordering = [
            Slot::positional("name"),
            Slot::flag("dest", "-o"),
            Slot::switch("auto", "--autoVersion"),
            Slot::switch("split", "--splitOutput"),
        ];
        assert_eq!(
            build(&params, &ordering).as_slice(),
            &["pkg.nupkg", "-o", "/out", "--autoVersion"]
        );
    }

    #[test]
    fn test_from_params_carries_declared_sensitivity() {
        let params: HashMap<&str, Option<&str>> =
            HashMap::from([("name", Some("pkg.nupkg")), ("password", Some("hunter2"))]);
        let ordering = [
            Slot::positional("name"),
            Slot::secret("password", "--pw", SecretKind::Password),
        ];
        let rendered = OptionSpec::from_params(&params, &ordering).render(&RedactionTable::exact());
        assert_eq!(rendered.args.as_slice(), &["pkg.nupkg", "--pw", "hunter2"]);
        assert_eq!(rendered.redacted.as_slice(), &["pkg.nupkg", "--pw", "*******"]);
    }

    #[test]
    fn test_sensitive_positions_account_for_switch_width() {
        let spec = OptionSpec::command(&["package", "deploy"])
            .switch("--createProcess", true)
            .secret("-t", Some("abcd1234567"), SecretKind::Token);
        let positions = spec.sensitive_positions();
        assert_eq!(positions.len(), 1);
        assert!(positions.rule_at(4).is_some());
    }

    #[test]
    fn test_pack_scenario() {
        let rendered = OptionSpec::command(&["package", "pack"])
            .positional("pkg.nupkg")
            .flag("-o", Some("/out"))
            .secret("-p", Some("hunter2"), SecretKind::Password)
            .secret("-t", Some("abcd1234567"), SecretKind::Token)
            .render(&RedactionTable::default());

        assert!(rendered.args.contains(&"hunter2".to_string()));
        assert_eq!(
            rendered.redacted.as_slice(),
            &["package", "pack", "pkg.nupkg", "-o", "/out", "-p", "*******", "-t", "abcd*******"]
        );
    }

    #[test]
    fn test_table_catches_undeclared_secret_flag() {
        let rendered = OptionSpec::new()
            .flag("-S", Some("topsecret"))
            .render(&RedactionTable::default());
        assert_eq!(rendered.args.as_slice(), &["-S", "topsecret"]);
        assert_eq!(rendered.redacted.as_slice(), &["-S", "*********"]);
    }

    #[test]
    fn test_flag_like_value_does_not_mask_next_value() {
        let rendered = OptionSpec::command(&["package", "pack"])
            .positional("proj")
            .flag("--releaseNotes", Some("-p"))
            .flag("--repositoryUrl", Some("https://git.example/repo"))
            .render(&RedactionTable::default());
        assert_eq!(
            rendered.redacted.to_string(),
            "package pack proj --releaseNotes -p --repositoryUrl https://git.example/repo"
        );
        assert_eq!(rendered.redacted.as_slice(), rendered.args.as_slice());
    }

    #[test]
    fn test_table_ignores_positional_that_reads_like_flag() {
        let rendered = OptionSpec::command(&["job", "run"])
            .positional("-t")
            .positional("Nightly")
            .render(&RedactionTable::default());
        assert_eq!(rendered.redacted.to_string(), "job run -t Nightly");
    }

    #[test]
    fn test_numeric_and_optional_values() {
        let spec = OptionSpec::new()
            .flag("-T", Some(3600_u64))
            .flag("-j", None::<u32>)
            .positional_opt(None::<&str>)
            .positional_opt(Some(""));
        assert_eq!(spec.to_argument_vector().as_slice(), &["-T", "3600"]);
    }
}
