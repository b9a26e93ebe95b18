use std::fmt;

use crate::config::{EnvironmentProvider, SecretConfig, SecretType, SystemEnvironment};

/// Signing key used when `JWT_SECRET` is not set. Development only.
pub const DEV_FALLBACK_JWT_SECRET: &str = "fallback-secret-key-for-dev";

const JWT_SECRET_MIN_LENGTH: usize = 32;

#[derive(Debug)]
pub enum SecretError {
    InvalidLength { secret_name: String, expected: usize, actual: usize },
}

impl SecretError {
    pub fn invalid_length(secret_name: &str, expected: usize, actual: usize) -> Self {
        Self::InvalidLength {
            secret_name: secret_name.to_string(),
            expected,
            actual,
        }
    }
}

impl fmt::Display for SecretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength { secret_name, expected, actual } => {
                write!(
                    f,
                    "Secret '{}' must be at least {} characters, got {}",
                    secret_name, expected, actual
                )
            }
        }
    }
}

impl std::error::Error for SecretError {}

struct LoadedSecret {
    value: String,
    from_fallback: bool,
}

/// Holds the token signing key
pub struct SecretManager {
    jwt_secret: String,
    insecure: bool,
}

impl SecretManager {
    /// Load secrets from the process environment
    pub fn init() -> Result<Self, SecretError> {
        Self::from_env_provider(&SystemEnvironment)
    }

    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, SecretError> {
        let jwt = Self::load_secret(env, &Self::jwt_config())?;

        if jwt.from_fallback {
            tracing::warn!(
                "JWT_SECRET is not set; signing sessions with the built-in development key. \
                 Tokens are forgeable by anyone with the source. Do not use in production."
            );
        }

        Ok(Self {
            jwt_secret: jwt.value,
            insecure: jwt.from_fallback,
        })
    }

    /// Build directly from a known key, e.g. for embedding hosts and tests
    pub fn with_jwt_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            insecure: false,
        }
    }

    fn jwt_config() -> SecretConfig {
        SecretConfig::new(
            SecretType::EnvVar {
                name: "JWT_SECRET".to_string(),
            },
            DEV_FALLBACK_JWT_SECRET,
        )
        .min_length(JWT_SECRET_MIN_LENGTH)
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    /// True when the development fallback key is in use
    pub fn is_insecure(&self) -> bool {
        self.insecure
    }

    fn load_secret(env: &dyn EnvironmentProvider, config: &SecretConfig) -> Result<LoadedSecret, SecretError> {
        let name = config.secret_type.name();
        let value = match &config.secret_type {
            SecretType::EnvVar { name } => env.get_var(name).filter(|v| !v.is_empty()),
        };

        let Some(value) = value else {
            return Ok(LoadedSecret {
                value: config.fallback.to_string(),
                from_fallback: true,
            });
        };

        if let Some(min_len) = config.min_length {
            if value.len() < min_len {
                return Err(SecretError::invalid_length(name, min_len, value.len()));
            }
        }

        Ok(LoadedSecret {
            value,
            from_fallback: false,
        })
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("jwt_secret", &"<redacted>")
            .field("insecure", &self.insecure)
            .finish()
    }
}

impl fmt::Display for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretManager {{ insecure: {} }}", self.insecure)
    }
}
