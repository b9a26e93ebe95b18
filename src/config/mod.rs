mod database;
mod env_provider;
mod errors;
mod logging;
mod secret_config;
mod secret_manager;
mod settings;

pub use database::{commit_scope, init_database, migrate_database, session_scope};
#[cfg(test)]
pub use env_provider::MockEnvironment;
pub use env_provider::{EnvironmentProvider, SystemEnvironment};
pub use errors::BootstrapError;
pub use logging::{init_logging, LoggingConfig, LoggingError};
pub use secret_config::{SecretConfig, SecretType};
pub use secret_manager::{SecretError, SecretManager, DEV_FALLBACK_JWT_SECRET};
pub use settings::{BootstrapSettings, SessionSettings};
