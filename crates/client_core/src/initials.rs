//! Two-letter participant badges.

const SEPARATORS: [char; 4] = ['.', '-', '_', ' '];

/// Derives the badge text for a participant identifier.
///
/// Only the part before the first `@` is considered. It is split on runs of
/// `.`, `-`, `_` and spaces; a single fragment yields its first two
/// characters, two or more yield the first character of each of the first
/// two fragments. The result is uppercased.
pub fn abbreviate(identifier: &str) -> String {
    let local = identifier.split('@').next().unwrap_or_default();
    let mut fragments = local
        .split(|c: char| SEPARATORS.contains(&c))
        .filter(|fragment| !fragment.is_empty());

    match (fragments.next(), fragments.next()) {
        (None, _) => String::new(),
        (Some(only), None) => only.chars().take(2).flat_map(char::to_uppercase).collect(),
        (Some(first), Some(second)) => first
            .chars()
            .take(1)
            .chain(second.chars().take(1))
            .flat_map(char::to_uppercase)
            .collect(),
    }
}

#[cfg(test)]
#[path = "tests/initials_tests.rs"]
mod tests;
