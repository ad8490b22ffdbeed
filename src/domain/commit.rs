use regex::Regex;

use super::version::ChangeClass;

/// Whether a commit message carries the `!` breaking-change marker.
///
/// Supports formats:
/// - type!: description
/// - type(scope)!: description
///
/// The type must be ASCII word characters. `BREAKING CHANGE:` footers are
/// not inspected.
pub fn is_breaking_change(message: &str) -> bool {
    Regex::new(r"^[A-Za-z0-9_]+(\([^)]+\))?!: .+")
        .ok()
        .is_some_and(|re| re.is_match(message))
}

/// Classify an ordered list of commit messages.
///
/// Messages are scanned in the order given and the first signal wins: a
/// breaking marker yields `Major`, a message starting with `feat` yields
/// `Minor`. With no signal the result is `Patch`.
pub fn detect_change_type<S: AsRef<str>>(messages: &[S]) -> ChangeClass {
    for message in messages {
        let message = message.as_ref();
        if is_breaking_change(message) {
            return ChangeClass::Major;
        }
        if message.starts_with("feat") {
            return ChangeClass::Minor;
        }
    }

    ChangeClass::Patch
}
