use std::fmt;

use chrono::Duration;

use crate::config::{BootstrapError, EnvironmentProvider, SystemEnvironment};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://threatdesk.db?mode=rwc";
pub const DEFAULT_SESSION_HOURS: i64 = 8;
pub const DEFAULT_REFRESH_LEAD_MINUTES: i64 = 5;

/// Infrastructure settings needed before anything else starts
pub struct BootstrapSettings {
    database_url: String,
}

impl BootstrapSettings {
    pub fn from_env() -> Result<Self, BootstrapError> {
        Self::from_env_provider(&SystemEnvironment)
    }

    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, BootstrapError> {
        let database_url = env
            .get_var("DATABASE_URL")
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        if !database_url.contains("://") && !database_url.starts_with("sqlite:") {
            return Err(BootstrapError::InvalidDatabaseUrl(database_url));
        }

        Ok(Self { database_url })
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

impl fmt::Debug for BootstrapSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapSettings")
            .field("database_url", &self.database_url)
            .finish()
    }
}

/// Token lifetime and proactive refresh lead
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    session_duration: Duration,
    refresh_lead: Duration,
}

impl SessionSettings {
    /// The lead must be shorter than the session so the refresh lands before expiry.
    pub fn new(session_duration: Duration, refresh_lead: Duration) -> Result<Self, BootstrapError> {
        if session_duration <= Duration::zero() {
            return Err(BootstrapError::invalid_format(
                "SESSION_DURATION_HOURS",
                "a positive duration",
                session_duration.to_string(),
            ));
        }
        if refresh_lead < Duration::zero() || refresh_lead >= session_duration {
            return Err(BootstrapError::invalid_format(
                "TOKEN_REFRESH_LEAD_MINUTES",
                "a non-negative duration shorter than the session",
                refresh_lead.to_string(),
            ));
        }
        Ok(Self {
            session_duration,
            refresh_lead,
        })
    }

    pub fn from_env() -> Result<Self, BootstrapError> {
        Self::from_env_provider(&SystemEnvironment)
    }

    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, BootstrapError> {
        let hours = read_i64(env, "SESSION_DURATION_HOURS", DEFAULT_SESSION_HOURS)?;
        let lead_minutes = read_i64(env, "TOKEN_REFRESH_LEAD_MINUTES", DEFAULT_REFRESH_LEAD_MINUTES)?;

        Self::new(Duration::hours(hours), Duration::minutes(lead_minutes))
    }

    pub fn session_duration(&self) -> Duration {
        self.session_duration
    }

    pub fn refresh_lead(&self) -> Duration {
        self.refresh_lead
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            session_duration: Duration::hours(DEFAULT_SESSION_HOURS),
            refresh_lead: Duration::minutes(DEFAULT_REFRESH_LEAD_MINUTES),
        }
    }
}

fn read_i64(env: &dyn EnvironmentProvider, name: &str, default: i64) -> Result<i64, BootstrapError> {
    match env.get_var(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|v| (0..=10_000).contains(v))
            .ok_or_else(|| BootstrapError::invalid_format(name, "an integer between 0 and 10000", raw)),
    }
}
