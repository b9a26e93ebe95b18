// Common test utilities for integration tests
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use threatdesk::app_data::AppData;
use threatdesk::config::{SecretManager, SessionSettings, commit_scope, session_scope};
use threatdesk::providers::ManualClock;
use threatdesk::stores::user_store::NewUser;
use threatdesk::types::db::{UserRole, user};
use threatdesk::types::internal::{Principal, SessionContext};

pub const TEST_JWT_SECRET: &str = "integration-test-secret-at-least-32-characters";

/// Creates a test database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Application wiring over a fresh database and a manual clock
pub struct TestApp {
    pub app_data: Arc<AppData>,
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    pub fn now(&self) -> DateTime<Utc> {
        use threatdesk::providers::Clock;
        self.clock.now()
    }
}

/// Current time truncated to a whole second, matching JWT timestamp granularity
pub fn whole_second_now() -> DateTime<Utc> {
    DateTime::from_timestamp(Utc::now().timestamp(), 0).expect("current time is representable")
}

pub async fn setup_test_app() -> TestApp {
    let db = setup_test_db().await;
    let clock = Arc::new(ManualClock::new(whole_second_now()));
    let app_data = AppData::from_parts(
        db,
        Arc::new(SecretManager::with_jwt_secret(TEST_JWT_SECRET)),
        SessionSettings::default(),
        clock.clone(),
    );

    TestApp {
        app_data: Arc::new(app_data),
        clock,
    }
}

/// Insert an account whose password is `"<username>-pass"`
pub async fn create_user(app_data: &AppData, username: &str, role: UserRole) -> user::Model {
    let txn = session_scope(&app_data.db).await.expect("Failed to open scope");
    let password = format!("{}-pass", username);
    let created = app_data
        .user_store
        .create_user(
            &txn,
            NewUser {
                username,
                email: &format!("{}@example.com", username),
                role,
                password: &password,
            },
        )
        .await
        .expect("Failed to create test user");
    commit_scope(txn).await.expect("Failed to commit");
    created
}

/// Context for `user` without going through a login
pub fn context_for(user: &user::Model) -> SessionContext {
    SessionContext::for_principal(Principal::from(user))
}

/// Helper to manage environment variables in tests
///
/// Cleans up specified environment variables on creation and drop,
/// ensuring test isolation when dealing with global environment state.
pub struct EnvGuard {
    vars: Vec<String>,
}

impl EnvGuard {
    pub fn new(vars: Vec<&str>) -> Self {
        // Clean up before setting new values
        for var in &vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
        Self {
            vars: vars.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for var in &self.vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }
}

/// Global mutex for tests that modify environment variables
///
/// Environment variables are process-global, so tests that modify them
/// must run serially to avoid race conditions.
pub static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());
