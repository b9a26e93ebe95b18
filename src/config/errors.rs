use std::fmt;

/// Failures while reading startup configuration
#[derive(Debug)]
pub enum BootstrapError {
    InvalidDatabaseUrl(String),
    InvalidFormat {
        setting_name: String,
        expected: String,
        actual: String,
    },
}

impl BootstrapError {
    pub fn invalid_format(setting_name: &str, expected: &str, actual: impl Into<String>) -> Self {
        Self::InvalidFormat {
            setting_name: setting_name.to_string(),
            expected: expected.to_string(),
            actual: actual.into(),
        }
    }
}

impl fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDatabaseUrl(url) => {
                write!(f, "Invalid database URL format: {}", url)
            }
            Self::InvalidFormat { setting_name, expected, actual } => {
                write!(
                    f,
                    "Setting '{}' has invalid format. Expected: {}, got: {}",
                    setting_name, expected, actual
                )
            }
        }
    }
}

impl std::error::Error for BootstrapError {}
