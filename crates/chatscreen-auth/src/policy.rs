// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password strength rules.

/// Minimum password length, counted in characters.
pub const MIN_LENGTH: usize = 6;

/// Characters that satisfy the special-character rule.
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Grade `password` against every rule.
///
/// Returns one message per violated rule, in rule order. An empty vector
/// means the password is acceptable.
pub fn validate(password: &str) -> Vec<String> {
    let rules: [(bool, &str); 5] = [
        (
            password.chars().count() >= MIN_LENGTH,
            "Password must be at least 6 characters long.",
        ),
        (
            password.chars().any(|c| c.is_ascii_uppercase()),
            "Password must contain at least one uppercase letter.",
        ),
        (
            password.chars().any(|c| c.is_ascii_lowercase()),
            "Password must contain at least one lowercase letter.",
        ),
        (
            password.chars().any(|c| c.is_ascii_digit()),
            "Password must contain at least one digit.",
        ),
        (
            password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)),
            "Password must contain at least one special character.",
        ),
    ];

    rules
        .into_iter()
        .filter(|(passed, _)| !passed)
        .map(|(_, message)| message.to_string())
        .collect()
}
