use serde::Serialize;

pub const MIN_LENGTH: usize = 8;
const SPECIAL: &str = "!@#$%^&*(),.?\":{}|<>";

/// Which registration rules a password fails. All `false` means it passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PasswordCheck {
    pub too_short: bool,
    pub missing_uppercase: bool,
    pub missing_lowercase: bool,
    pub missing_number: bool,
    pub missing_special: bool,
}

impl PasswordCheck {
    pub fn is_valid(&self) -> bool {
        *self == PasswordCheck::default()
    }
}

pub fn check(password: &str) -> PasswordCheck {
    PasswordCheck {
        too_short: password.chars().count() < MIN_LENGTH,
        missing_uppercase: !password.chars().any(|c| c.is_ascii_uppercase()),
        missing_lowercase: !password.chars().any(|c| c.is_ascii_lowercase()),
        missing_number: !password.chars().any(|c| c.is_ascii_digit()),
        missing_special: !password.chars().any(|c| SPECIAL.contains(c)),
    }
}
