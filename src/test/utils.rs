// Test utilities shared across unit tests
// Only compiled when running tests

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::stores::{CredentialStore, UserStore};
use crate::stores::user_store::NewUser;
use crate::types::db::{UserRole, user};

/// Fresh in-memory database with every migration applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Database plus a `UserStore` wired to a fresh `CredentialStore`
pub async fn setup_user_store() -> (DatabaseConnection, UserStore) {
    let db = setup_test_db().await;
    let store = UserStore::new(Arc::new(CredentialStore::new()));
    (db, store)
}

/// Insert a user whose password is `"<username>-pass"`
pub async fn create_test_user(
    db: &DatabaseConnection,
    store: &UserStore,
    username: &str,
    role: UserRole,
) -> user::Model {
    let password = format!("{}-pass", username);
    store
        .create_user(
            db,
            NewUser {
                username,
                email: &format!("{}@example.com", username),
                role,
                password: &password,
            },
        )
        .await
        .expect("Failed to create test user")
}
