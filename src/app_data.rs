use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::{EnvironmentProvider, SecretManager, SessionSettings, SystemEnvironment};
use crate::errors::InternalError;
use crate::providers::{Clock, SystemClock, TokenProvider};
use crate::services::SessionManager;
use crate::stores::{AuditStore, CheckpointStore, CredentialStore, PersonnelStore, ThreatStore, UserStore};

/// Centralized application data following the main-owned stores pattern
///
/// Every dependency is created once and shared by the session manager and
/// the coordinators.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init(db)
///   ├─ secret_manager, session settings, clock
///   ├─ credential_store → user_store
///   ├─ personnel / threat / audit / checkpoint stores
///   └─ token_provider
///   ↓ wrapped in Arc<AppData>
///   ├─ AppData::session_manager()
///   └─ IncidentCoordinator::new(app_data)
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub secret_manager: Arc<SecretManager>,
    pub session_settings: SessionSettings,
    pub clock: Arc<dyn Clock>,
    pub credential_store: Arc<CredentialStore>,
    pub user_store: Arc<UserStore>,
    pub personnel_store: Arc<PersonnelStore>,
    pub threat_store: Arc<ThreatStore>,
    pub audit_store: Arc<AuditStore>,
    pub checkpoint_store: Arc<CheckpointStore>,
    pub token_provider: Arc<TokenProvider>,
}

impl AppData {
    /// Initialize from the process environment
    ///
    /// The database should already be connected and migrated.
    ///
    /// # Errors
    ///
    /// Returns `InternalError` when the signing secret or the session
    /// settings are invalid
    pub async fn init(db: DatabaseConnection) -> Result<Self, InternalError> {
        Self::init_with_env(db, &SystemEnvironment)
    }

    pub fn init_with_env(db: DatabaseConnection, env: &dyn EnvironmentProvider) -> Result<Self, InternalError> {
        tracing::info!("Initializing AppData...");

        let secret_manager = SecretManager::from_env_provider(env)
            .map_err(|e| InternalError::parse("secret_manager", format!("Secret manager init failed: {}", e)))?;
        let session_settings = SessionSettings::from_env_provider(env)
            .map_err(|e| InternalError::parse("session_settings", e.to_string()))?;

        Ok(Self::from_parts(db, Arc::new(secret_manager), session_settings, Arc::new(SystemClock)))
    }

    /// Wire stores and providers around already-built configuration
    pub fn from_parts(
        db: DatabaseConnection,
        secret_manager: Arc<SecretManager>,
        session_settings: SessionSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let credential_store = Arc::new(CredentialStore::new());
        let user_store = Arc::new(UserStore::new(Arc::clone(&credential_store)));
        let token_provider = Arc::new(TokenProvider::new(Arc::clone(&secret_manager), session_settings));

        tracing::debug!("Stores and providers created");

        Self {
            db,
            secret_manager,
            session_settings,
            clock,
            credential_store,
            user_store,
            personnel_store: Arc::new(PersonnelStore::new()),
            threat_store: Arc::new(ThreatStore::new()),
            audit_store: Arc::new(AuditStore::new()),
            checkpoint_store: Arc::new(CheckpointStore::new()),
            token_provider,
        }
    }

    /// A fresh client session sharing this application's stores
    pub fn session_manager(&self) -> SessionManager {
        SessionManager::new(
            self.db.clone(),
            Arc::clone(&self.user_store),
            Arc::clone(&self.token_provider),
            Arc::clone(&self.clock),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;
    use crate::test::utils::setup_test_db;

    #[tokio::test]
    async fn test_init_reads_session_settings_from_env() {
        let db = setup_test_db().await;
        let env = MockEnvironment::empty()
            .with_var("JWT_SECRET", "app-data-test-secret-at-least-32-chars")
            .with_var("SESSION_DURATION_HOURS", "2");

        let app_data = AppData::init_with_env(db, &env).unwrap();

        assert_eq!(app_data.session_settings.session_duration(), chrono::Duration::hours(2));
        assert!(!app_data.secret_manager.is_insecure());
    }

    #[tokio::test]
    async fn test_init_rejects_short_secret() {
        let db = setup_test_db().await;
        let env = MockEnvironment::empty().with_var("JWT_SECRET", "short");

        assert!(AppData::init_with_env(db, &env).is_err());
    }
}
