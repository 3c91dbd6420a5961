//! Password value object - Domain layer password handling.
//!
//! DDD: Encapsulates password hashing as a domain value object.
//! DRY: Centralized Argon2 configuration.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH, PASSWORD_SPECIAL_CHARS};
use crate::errors::{AppError, AppResult};

/// Password value object that handles hashing and verification.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output (security)
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Create a new password by hashing the plain text.
    ///
    /// # Errors
    /// Returns validation error if the password is shorter than 8 or longer
    /// than 100 characters.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        let length = plain_text.chars().count() as u64;
        if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length) {
            return Err(AppError::validation(format!(
                "Password must be between {} and {} characters",
                MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH
            )));
        }

        let hash = Self::hash(plain_text)?;
        Ok(Self { hash })
    }

    /// Hash a replacement password after checking it is strong enough.
    ///
    /// A strong password has at least 8 characters, one lowercase letter,
    /// one uppercase letter, one digit and one of `@$!%*?#&^_-`, and nothing
    /// outside those classes.
    pub fn new_strong(plain_text: &str) -> AppResult<Self> {
        if !Self::is_strong(plain_text) {
            return Err(AppError::validation(
                "New password must have at least 8 characters, including an uppercase letter, \
                 a lowercase letter, a digit and a special character",
            ));
        }
        Self::new(plain_text)
    }

    /// Check the strength rules used for password changes.
    pub fn is_strong(plain_text: &str) -> bool {
        let is_special = |c: char| PASSWORD_SPECIAL_CHARS.contains(c);

        plain_text.chars().count() >= MIN_PASSWORD_LENGTH as usize
            && plain_text.chars().any(|c| c.is_ascii_lowercase())
            && plain_text.chars().any(|c| c.is_ascii_uppercase())
            && plain_text.chars().any(|c| c.is_ascii_digit())
            && plain_text.chars().any(is_special)
            && plain_text
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || is_special(c))
    }

    /// Create a Password from an existing hash (from database).
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password against this hash.
    pub fn verify(&self, plain_text: &str) -> bool {
        Self::verify_hash(plain_text, &self.hash).unwrap_or(false)
    }

    fn hash(plain_text: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_hash(plain_text: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid hash format: {}", e)))?;
        Ok(Self::argon2()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok())
    }

    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Password {}
