// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Semicolon delimited token lists.
//!
//! Older records keep many-valued relations (a member's courses, a
//! teacher's disciplines) as a single `;` separated string. These helpers
//! convert between that form and an ordered, case-insensitively unique
//! list of names.

/// Separator used when joining tokens back into a single string.
pub const TOKEN_SEPARATOR: &str = "; ";

/// Splits a delimited string into trimmed, non-empty, unique tokens.
///
/// Duplicates are detected case-insensitively; the first spelling wins.
#[must_use]
pub fn parse_tokens(raw: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for part in raw.split(';') {
        let trimmed: &str = part.trim();
        if trimmed.is_empty() || contains_token(&tokens, trimmed) {
            continue;
        }
        tokens.push(trimmed.to_string());
    }
    tokens
}

/// Joins tokens with `"; "`, skipping blank entries.
#[must_use]
pub fn join_tokens<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<&str>>()
        .join(TOKEN_SEPARATOR)
}

/// Returns whether `needle` is present, ignoring case and surrounding whitespace.
#[must_use]
pub fn contains_token<S: AsRef<str>>(tokens: &[S], needle: &str) -> bool {
    let needle: String = needle.trim().to_lowercase();
    tokens
        .iter()
        .any(|t| t.as_ref().trim().to_lowercase() == needle)
}

/// Replaces every occurrence of `from` with `to`, keeping order.
///
/// Returns `None` when `from` is not present so callers can skip
/// records that need no update.
#[must_use]
pub fn rename_token<S: AsRef<str>>(tokens: &[S], from: &str, to: &str) -> Option<Vec<String>> {
    if !contains_token(tokens, from) {
        return None;
    }
    let from_lower: String = from.trim().to_lowercase();
    let mut renamed: Vec<String> = Vec::with_capacity(tokens.len());
    for token in tokens {
        let token: &str = token.as_ref().trim();
        let value: &str = if token.to_lowercase() == from_lower {
            to.trim()
        } else {
            token
        };
        if !value.is_empty() && !contains_token(&renamed, value) {
            renamed.push(value.to_string());
        }
    }
    Some(renamed)
}

/// Removes every occurrence of `name`.
///
/// Returns `None` when `name` is not present.
#[must_use]
pub fn remove_token<S: AsRef<str>>(tokens: &[S], name: &str) -> Option<Vec<String>> {
    if !contains_token(tokens, name) {
        return None;
    }
    let lower: String = name.trim().to_lowercase();
    Some(
        tokens
            .iter()
            .map(|t| t.as_ref().trim())
            .filter(|t| t.to_lowercase() != lower)
            .map(ToString::to_string)
            .collect(),
    )
}
