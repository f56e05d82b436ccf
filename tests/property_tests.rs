//! Property-based tests for the argument builder and redactor
//!
//! These tests verify:
//! - Redaction never changes the vector length or the raw vector
//! - Non-sensitive entries pass through untouched
//! - Full and partial masking reveal exactly what their rule allows
//! - The builder never emits an empty value or a dangling flag

use std::collections::HashMap;

use proptest::prelude::*;

use orchrun::arguments::{ArgumentVector, OptionSpec, Slot, build};
use orchrun::redact::{MaskingRule, RedactionTable, SecretKind, SensitivePositions, redact};

/// Plain argument values: never start with '-' so the table fallback
/// cannot classify them.
fn plain_value() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9/._:]{0,24}"
}

fn secret_value() -> impl Strategy<Value = String> {
    "\\PC{1,32}"
}

fn args_and_positions() -> impl Strategy<Value = (Vec<String>, Vec<usize>)> {
    prop::collection::vec(plain_value(), 0..16).prop_flat_map(|args| {
        let len = args.len();
        let positions = prop::collection::vec(0..len.max(1) + 4, 0..8);
        (Just(args), positions)
    })
}

// =============================================================================
// Redactor invariants
// =============================================================================

proptest! {
    /// Redacted length equals raw length, whatever the positions
    #[test]
    fn redact_preserves_length((args, marks) in args_and_positions()) {
        let vector = ArgumentVector::from(args.clone());
        let positions: SensitivePositions =
            marks.iter().map(|&i| (i, MaskingRule::Full)).collect();

        let redacted = redact(&vector, &positions);
        prop_assert_eq!(redacted.len(), args.len());
        prop_assert_eq!(vector.as_slice(), args.as_slice());
    }

    /// Entries not marked sensitive are equal to the raw entries
    #[test]
    fn redact_leaves_plain_entries_untouched((args, marks) in args_and_positions()) {
        let vector = ArgumentVector::from(args.clone());
        let positions: SensitivePositions =
            marks.iter().map(|&i| (i, MaskingRule::Partial(4))).collect();

        let redacted = redact(&vector, &positions);
        for (i, (raw, shown)) in args.iter().zip(redacted.iter()).enumerate() {
            if positions.rule_at(i).is_none() {
                prop_assert_eq!(raw, shown);
            }
        }
    }

    /// Full masking reveals only the character count
    #[test]
    fn full_mask_hides_every_char(secret in secret_value()) {
        let masked = MaskingRule::Full.apply(&secret);
        prop_assert_eq!(masked.chars().count(), secret.chars().count());
        prop_assert!(masked.chars().all(|c| c == '*'));
    }

    /// Partial masking keeps exactly the first n chars of a longer value
    #[test]
    fn partial_mask_keeps_prefix(secret in "\\PC{5,32}", n in 1usize..5) {
        let masked = MaskingRule::Partial(n).apply(&secret);
        let prefix: String = secret.chars().take(n).collect();
        prop_assert!(masked.starts_with(&prefix));
        prop_assert_eq!(masked.chars().count(), secret.chars().count());
        prop_assert!(masked.chars().skip(n).all(|c| c == '*'));
    }

    /// Partial masking of a value no longer than n masks everything
    #[test]
    fn partial_mask_short_value_fully_masked(secret in "\\PC{0,4}") {
        let masked = MaskingRule::Partial(4).apply(&secret);
        prop_assert!(masked.chars().all(|c| c == '*'));
        prop_assert_eq!(masked.chars().count(), secret.chars().count());
    }

    /// A secret passed through a declared flag never appears in the
    /// redacted rendering, except the token prefix
    #[test]
    fn declared_secret_never_logged(
        folder in "[a-zA-Z]{1,12}",
        password in "[a-zA-Z0-9!@#]{1,32}",
        token in "[a-zA-Z0-9]{5,40}",
    ) {
        let rendered = OptionSpec::command(&["package", "deploy"])
            .flag("-o", Some(&folder))
            .secret("-p", Some(&password), SecretKind::Password)
            .secret("-t", Some(&token), SecretKind::Token)
            .render(&RedactionTable::default());

        let shown = rendered.redacted.as_slice();
        prop_assert_eq!(&shown[3], &folder);
        prop_assert!(shown[5].chars().all(|c| c == '*'));
        prop_assert_eq!(&shown[7][..4], &token[..4]);
        prop_assert!(shown[7][4..].chars().all(|c| c == '*'));
    }
}

// =============================================================================
// Builder invariants
// =============================================================================

const ORDERING: [Slot; 4] = [
    Slot::positional("project"),
    Slot::flag("folder", "-o"),
    Slot::flag("environment", "-e"),
    Slot::secret("password", "-p", SecretKind::Password),
];

fn maybe_value() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        "[a-zA-Z0-9]{1,12}".prop_map(Some),
    ]
}

proptest! {
    /// Absent and empty values are omitted along with their flags
    #[test]
    fn build_omits_absent_and_empty(
        project in maybe_value(),
        folder in maybe_value(),
        environment in maybe_value(),
        password in maybe_value(),
    ) {
        let params: HashMap<&str, Option<String>> = HashMap::from([
            ("project", project.clone()),
            ("folder", folder.clone()),
            ("environment", environment.clone()),
            ("password", password.clone()),
        ]);
        let args = build(&params, &ORDERING);

        prop_assert!(args.iter().all(|a| !a.is_empty()));

        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        let expected_len = usize::from(present(&project))
            + 2 * [&folder, &environment, &password].iter().filter(|v| present(v)).count();
        prop_assert_eq!(args.len(), expected_len);

        for (flag, value) in [("-o", &folder), ("-e", &environment), ("-p", &password)] {
            prop_assert_eq!(args.contains(&flag.to_string()), present(value));
        }
    }
}
