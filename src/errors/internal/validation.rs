use thiserror::Error;

/// Data model invariant violations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Unknown threat level: {0}")]
    UnknownThreatLevel(String),

    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Badge number already issued: {0}")]
    DuplicateBadge(String),

    #[error("User {user_id} already has a personnel profile")]
    ProfileExists { user_id: i32 },

    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("{field} exceeds {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("Threat {0} is already resolved")]
    AlreadyResolved(i32),

    #[error("Status '{0}' is only set by resolving the threat")]
    ReservedStatus(String),
}

impl ValidationError {
    /// Check a required text column against its schema width
    pub fn check_text(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::EmptyField { field });
        }
        if value.chars().count() > max {
            return Err(ValidationError::TooLong { field, max });
        }
        Ok(())
    }
}
