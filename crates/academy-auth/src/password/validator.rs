//! Password policy for new and reset passwords.

use academy_core::config::AuthConfig;
use academy_core::error::AppError;

/// Rejects short or guessable passwords with `WEAK_PASSWORD`.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
}

impl PasswordValidator {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::weak_password(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        if zxcvbn::zxcvbn(password, &[]).score() < zxcvbn::Score::Three {
            return Err(AppError::weak_password(
                "Password is too easy to guess. Use a longer or less common password.",
            ));
        }

        Ok(())
    }
}
