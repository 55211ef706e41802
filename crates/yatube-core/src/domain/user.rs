use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Longest accepted username.
pub const MAX_USERNAME_LEN: usize = 150;

/// User entity - an account that can author posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(username: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Usernames are 1-150 characters of letters, digits and `@.+-_`.
    pub fn validate_username(username: &str) -> Result<(), DomainError> {
        if username.is_empty() || username.chars().count() > MAX_USERNAME_LEN {
            return Err(DomainError::Validation(format!(
                "Username must be between 1 and {MAX_USERNAME_LEN} characters"
            )));
        }

        let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
        if !username.chars().all(allowed) {
            return Err(DomainError::Validation(
                "Username may contain only letters, digits and @/./+/-/_".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(User::validate_username("wtf").is_ok());
        assert!(User::validate_username("leo.tolstoy+blog@ya_ru-1").is_ok());
        assert!(User::validate_username("").is_err());
        assert!(User::validate_username("has space").is_err());
        assert!(User::validate_username("slash/inside").is_err());
        assert!(User::validate_username(&"a".repeat(151)).is_err());
    }
}
