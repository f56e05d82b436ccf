//! Secret redaction for logged command lines.
//!
//! The external CLI takes passwords and tokens as plain command-line
//! arguments. Every command line this crate logs goes through [`redact`]
//! first, producing a [`RedactedVector`] that is the same length as the
//! [`ArgumentVector`] it came from and differs only at sensitive positions.
//!
//! # Masking Rules
//!
//! | Rule          | Input          | Output         |
//! |---------------|----------------|----------------|
//! | `Full`        | `hunter2`      | `*******`      |
//! | `Partial(4)`  | `abcd1234567`  | `abcd*******`  |
//! | `Partial(4)`  | `abcd`         | `****`         |
//!
//! # Secret Kinds
//!
//! Invocation sites never pick a masking rule directly. They declare a
//! [`SecretKind`], and [`SecretKind::masking_rule`] is the only place a kind
//! is mapped to a rule. The default [`RedactionTable`] additionally
//! re-checks every declared flag token, so a secret flag whose declaration
//! was left `Plain` is still masked.

use std::collections::BTreeMap;
use std::fmt;

use strum::{Display, EnumString};

use crate::arguments::ArgumentVector;

/// Character used to replace hidden secret characters.
pub const MASK_CHAR: char = '*';

/// Number of leading characters a partially masked token keeps.
pub const TOKEN_PREFIX_LEN: usize = 4;

/// How a sensitive value is rendered for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskingRule {
    /// Every character replaced; only the length is revealed.
    Full,
    /// The first `n` characters kept, the rest replaced.
    ///
    /// A value of `n` characters or fewer is fully masked.
    Partial(usize),
}

impl MaskingRule {
    /// Render `value` under this rule.
    ///
    /// Length is counted in `char`s so multi-byte secrets keep their
    /// displayed width.
    pub fn apply(&self, value: &str) -> String {
        let len = value.chars().count();
        match *self {
            MaskingRule::Full => mask_all(len),
            MaskingRule::Partial(n) if len <= n => mask_all(len),
            MaskingRule::Partial(n) => {
                let mut out: String = value.chars().take(n).collect();
                out.extend(std::iter::repeat_n(MASK_CHAR, len - n));
                out
            }
        }
    }

    /// The rule that reveals less of the two.
    pub fn strictest(self, other: MaskingRule) -> MaskingRule {
        match (self, other) {
            (MaskingRule::Full, _) | (_, MaskingRule::Full) => MaskingRule::Full,
            (MaskingRule::Partial(a), MaskingRule::Partial(b)) => MaskingRule::Partial(a.min(b)),
        }
    }
}

fn mask_all(len: usize) -> String {
    std::iter::repeat_n(MASK_CHAR, len).collect()
}

/// Kind of secret carried by an option value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum SecretKind {
    /// On-premises account password.
    Password,
    /// User key or refresh token. A short prefix helps operators tell
    /// which credential ran.
    Token,
    /// External application (client credentials) secret.
    ClientSecret,
}

impl SecretKind {
    /// Central kind → rule mapping.
    pub fn masking_rule(&self) -> MaskingRule {
        match self {
            SecretKind::Password => MaskingRule::Full,
            SecretKind::Token => MaskingRule::Partial(TOKEN_PREFIX_LEN),
            SecretKind::ClientSecret => MaskingRule::Full,
        }
    }

    /// Classify a flag token by name. Used as the fallback for flags the
    /// table does not list explicitly.
    fn from_flag_name(token: &str) -> Option<SecretKind> {
        if !token.starts_with('-') {
            return None;
        }
        let lower = token.to_ascii_lowercase();
        if lower.contains("password") {
            Some(SecretKind::Password)
        } else if lower.contains("secret") {
            Some(SecretKind::ClientSecret)
        } else if lower.contains("token") {
            Some(SecretKind::Token)
        } else {
            None
        }
    }
}

/// Sensitivity attached to an option when it is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sensitivity {
    /// Logged verbatim.
    #[default]
    Plain,
    /// Logged masked with the kind's rule.
    Secret(SecretKind),
}

impl Sensitivity {
    /// Masking rule for this sensitivity, if any.
    pub fn masking_rule(&self) -> Option<MaskingRule> {
        match self {
            Sensitivity::Plain => None,
            Sensitivity::Secret(kind) => Some(kind.masking_rule()),
        }
    }
}

impl From<SecretKind> for Sensitivity {
    fn from(kind: SecretKind) -> Self {
        Sensitivity::Secret(kind)
    }
}

/// Indices of an argument vector that must be masked, with their rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SensitivePositions {
    rules: BTreeMap<usize, MaskingRule>,
}

impl SensitivePositions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `index` as sensitive. If it is already marked, the stricter of
    /// the two rules is kept.
    pub fn mark(&mut self, index: usize, rule: MaskingRule) {
        self.rules
            .entry(index)
            .and_modify(|existing| *existing = existing.strictest(rule))
            .or_insert(rule);
    }

    /// Union of two position sets, strictest rule per index.
    pub fn merge(mut self, other: SensitivePositions) -> Self {
        for (index, rule) in other.rules {
            self.mark(index, rule);
        }
        self
    }

    pub fn rule_at(&self, index: usize) -> Option<MaskingRule> {
        self.rules.get(&index).copied()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<(usize, MaskingRule)> for SensitivePositions {
    fn from_iter<I: IntoIterator<Item = (usize, MaskingRule)>>(iter: I) -> Self {
        let mut positions = SensitivePositions::new();
        for (index, rule) in iter {
            positions.mark(index, rule);
        }
        positions
    }
}

/// Display-safe rendering of an [`ArgumentVector`].
///
/// Only [`redact`] constructs one, and `redact` only accepts an
/// `ArgumentVector`, so a vector is never redacted twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactedVector(Vec<String>);

impl RedactedVector {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl fmt::Display for RedactedVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

/// Produce the redacted rendering of `args`.
///
/// Indices in `positions` past the end of `args` are ignored. `args` is not
/// modified.
pub fn redact(args: &ArgumentVector, positions: &SensitivePositions) -> RedactedVector {
    RedactedVector(
        args.iter()
            .enumerate()
            .map(|(i, value)| match positions.rule_at(i) {
                Some(rule) => rule.apply(value),
                None => value.clone(),
            })
            .collect(),
    )
}

/// Declarative flag-token → secret-kind table.
///
/// A listed flag marks the argument that *follows* it. Tokens not listed
/// are classified by name (`password`, `secret`, `token`) unless the table
/// was built with [`RedactionTable::exact`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactionTable {
    flags: BTreeMap<String, SecretKind>,
    match_by_name: bool,
}

impl Default for RedactionTable {
    /// The central table for every flag the external CLI is known to take
    /// a secret on.
    fn default() -> Self {
        let mut table = Self::exact();
        table.match_by_name = true;
        for (flag, kind) in [
            ("-p", SecretKind::Password),
            ("--password", SecretKind::Password),
            ("-t", SecretKind::Token),
            ("--token", SecretKind::Token),
            ("--userKey", SecretKind::Token),
            ("--refreshToken", SecretKind::Token),
            ("-S", SecretKind::ClientSecret),
            ("--applicationSecret", SecretKind::ClientSecret),
            ("--libraryOrchestratorApplicationSecret", SecretKind::ClientSecret),
        ] {
            table = table.with_flag(flag, kind);
        }
        table
    }
}

impl RedactionTable {
    /// An empty table with no name-based fallback.
    pub fn exact() -> Self {
        Self {
            flags: BTreeMap::new(),
            match_by_name: false,
        }
    }

    /// Add or replace a flag entry.
    pub fn with_flag(mut self, flag: impl Into<String>, kind: SecretKind) -> Self {
        self.flags.insert(flag.into(), kind);
        self
    }

    /// Secret kind of the value following `token`, if any.
    pub fn kind_for(&self, token: &str) -> Option<SecretKind> {
        self.flags.get(token).copied().or_else(|| {
            if self.match_by_name {
                SecretKind::from_flag_name(token)
            } else {
                None
            }
        })
    }

    /// Positions in `args` whose value follows a sensitive flag.
    ///
    /// A marked value is never itself treated as a flag, so a secret that
    /// happens to look like `-p` does not shift masking onto the next
    /// argument.
    pub fn positions(&self, args: &ArgumentVector) -> SensitivePositions {
        let mut positions = SensitivePositions::new();
        let mut index = 0;
        while index < args.len() {
            if let Some(kind) = self.kind_for(&args[index]) {
                if index + 1 < args.len() {
                    positions.mark(index + 1, kind.masking_rule());
                }
                index += 2;
            } else {
                index += 1;
            }
        }
        positions
    }

    /// Redact `args` using only this table.
    pub fn redact(&self, args: &ArgumentVector) -> RedactedVector {
        redact(args, &self.positions(args))
    }
}
