// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password rules for operator accounts.

use thiserror::Error;

/// Password policy errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min_length} characters long")]
    TooShort { min_length: usize },

    #[error(
        "Password must mix at least {required} kinds of characters among letters, digits and symbols (found {found})"
    )]
    TooSimple { required: usize, found: usize },

    #[error("Password must differ from the {field}")]
    SameAsIdentity { field: &'static str },

    #[error("Password and confirmation do not match")]
    ConfirmationMismatch,
}

/// Minimum length and character variety of an operator password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
    /// Kinds required among lowercase, uppercase, digit and symbol.
    pub min_kinds: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 10,
            min_kinds: 3,
        }
    }
}

impl PasswordPolicy {
    /// Checks a new password for an operator.
    ///
    /// # Errors
    ///
    /// Returns a `PasswordPolicyError` describing the first rule broken.
    pub fn validate(
        &self,
        password: &str,
        confirmation: &str,
        login_name: &str,
        display_name: &str,
    ) -> Result<(), PasswordPolicyError> {
        if password != confirmation {
            return Err(PasswordPolicyError::ConfirmationMismatch);
        }
        if password.chars().count() < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min_length: self.min_length,
            });
        }

        let found: usize = character_kinds(password);
        if found < self.min_kinds {
            return Err(PasswordPolicyError::TooSimple {
                required: self.min_kinds,
                found,
            });
        }

        let lowered: String = password.to_lowercase();
        if lowered == login_name.trim().to_lowercase() {
            return Err(PasswordPolicyError::SameAsIdentity {
                field: "login name",
            });
        }
        if lowered == display_name.trim().to_lowercase() {
            return Err(PasswordPolicyError::SameAsIdentity {
                field: "display name",
            });
        }
        Ok(())
    }
}

fn character_kinds(password: &str) -> usize {
    let kinds: [fn(char) -> bool; 4] = [
        |c: char| c.is_lowercase(),
        |c: char| c.is_uppercase(),
        |c: char| c.is_ascii_digit(),
        |c: char| !c.is_alphanumeric() && !c.is_whitespace(),
    ];
    kinds
        .iter()
        .filter(|is_kind| password.chars().any(|c| is_kind(c)))
        .count()
}
