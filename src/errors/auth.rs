use thiserror::Error;

use crate::errors::InternalError;
use crate::types::db::UserRole;

/// Caller-visible session and access failures
///
/// Unknown usernames and wrong passwords are deliberately absent: those
/// surface as `Ok(None)` from `SessionManager::authenticate`.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Credentials were valid but the account is deactivated
    #[error("Account is disabled")]
    AccountDisabled,

    /// Signature verified but the expiry has passed
    #[error("Session expired")]
    TokenExpired,

    /// Bad signature, malformed token, or the subject is missing/inactive
    #[error("Invalid token")]
    InvalidToken,

    /// Protected operation invoked without a principal
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Principal's role is not in the operation's allow-list
    #[error("Insufficient privileges for role '{role}'")]
    InsufficientPrivileges { role: UserRole },

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl AuthError {
    /// Stable machine-readable code for the host application
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::AccountDisabled => "account_disabled",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidToken => "invalid_token",
            AuthError::NotAuthenticated => "not_authenticated",
            AuthError::InsufficientPrivileges { .. } => "insufficient_privileges",
            AuthError::Internal(_) => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_privileges_names_the_role() {
        let err = AuthError::InsufficientPrivileges { role: UserRole::ComplianceAuditor };
        assert_eq!(err.to_string(), "Insufficient privileges for role 'Compliance Auditor'");
        assert_eq!(err.code(), "insufficient_privileges");
    }

    #[test]
    fn test_codes_are_distinct() {
        let codes = [
            AuthError::AccountDisabled.code(),
            AuthError::TokenExpired.code(),
            AuthError::InvalidToken.code(),
            AuthError::NotAuthenticated.code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_internal_error_is_transparent() {
        let err = AuthError::from(InternalError::crypto("jwt_encode", "boom"));
        assert_eq!(err.to_string(), "Crypto error: jwt_encode failed: boom");
    }
}
