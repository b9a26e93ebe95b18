use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::config::{SecretManager, SessionSettings};
use crate::errors::{AuthError, InternalError};
use crate::types::internal::{AccessToken, Claims, Principal};

/// Mints and validates HS256 session tokens
///
/// Expiry is checked against a caller-supplied instant rather than the
/// system clock, so sessions follow the injected `Clock`.
pub struct TokenProvider {
    secret_manager: Arc<SecretManager>,
    settings: SessionSettings,
}

impl TokenProvider {
    pub fn new(secret_manager: Arc<SecretManager>, settings: SessionSettings) -> Self {
        Self {
            secret_manager,
            settings,
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Mint a token for `principal` valid from `issued_at` for the session duration
    pub fn issue(&self, principal: &Principal, issued_at: DateTime<Utc>) -> Result<(AccessToken, Claims), InternalError> {
        let iat = issued_at.timestamp();
        let claims = Claims {
            sub: principal.user_id.to_string(),
            username: principal.username.clone(),
            role: principal.role.as_str().to_string(),
            iat,
            exp: iat + self.settings.session_duration().num_seconds(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
        )
        .map_err(|e| InternalError::crypto("jwt_encode", e.to_string()))?;

        Ok((AccessToken::from(token), claims))
    }

    /// Verify signature and structure, then expiry against `now`
    pub fn validate(&self, token: &AccessToken, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<Claims>(
            token.as_str(),
            &DecodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
            &validation,
        )
        .map_err(|e| {
            tracing::debug!(reason = rejection_reason(e.kind()), "Token rejected");
            AuthError::InvalidToken
        })?
        .claims;

        if claims.exp <= now.timestamp() {
            tracing::debug!(sub = %claims.sub, exp = claims.exp, "Token expired");
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }

    /// Instant at which a proactive refresh should fire for these claims
    pub fn refresh_at(&self, claims: &Claims) -> Option<DateTime<Utc>> {
        claims
            .expires_at()
            .map(|expiry| expiry - self.settings.refresh_lead())
    }
}

fn rejection_reason(kind: &ErrorKind) -> &'static str {
    match kind {
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => "malformed",
        ErrorKind::InvalidSignature => "signature",
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => "algorithm",
        ErrorKind::MissingRequiredClaim(_) => "missing_claim",
        _ => "other",
    }
}

impl fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProvider")
            .field("jwt_secret", &"<redacted>")
            .field("session_minutes", &self.settings.session_duration().num_minutes())
            .field("refresh_lead_minutes", &self.settings.refresh_lead().num_minutes())
            .finish()
    }
}
