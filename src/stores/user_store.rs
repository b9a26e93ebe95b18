use std::sync::Arc;

use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter, Set};

use crate::errors::InternalError;
use crate::errors::internal::ValidationError;
use crate::stores::{CredentialStore, unique_violation};
use crate::types::db::{UserRole, security_personnel, user};

const USERNAME_MAX_LEN: usize = 50;
const EMAIL_MAX_LEN: usize = 120;

/// Fields for a new account. The password is hashed before anything is written.
#[derive(Clone, Copy)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub role: UserRole,
    pub password: &'a str,
}

/// Repository for `users` rows
pub struct UserStore {
    credential_store: Arc<CredentialStore>,
}

impl UserStore {
    pub fn new(credential_store: Arc<CredentialStore>) -> Self {
        Self { credential_store }
    }

    pub fn credential_store(&self) -> &CredentialStore {
        &self.credential_store
    }

    /// Exact, case-sensitive username lookup
    pub async fn find_by_username(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_username", e))
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        id: i32,
    ) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))
    }

    /// Insert a new active account
    ///
    /// # Errors
    ///
    /// `ValidationError::DuplicateUsername` / `DuplicateEmail` when either
    /// unique column is taken, `InvalidEmail` for a malformed address.
    pub async fn create_user(
        &self,
        conn: &impl ConnectionTrait,
        new_user: NewUser<'_>,
    ) -> Result<user::Model, InternalError> {
        ValidationError::check_text("username", new_user.username, USERNAME_MAX_LEN)?;
        let email = user::normalize_email(new_user.email)?;
        if email.chars().count() > EMAIL_MAX_LEN {
            return Err(ValidationError::TooLong { field: "email", max: EMAIL_MAX_LEN }.into());
        }

        let mut active = user::ActiveModel {
            username: Set(new_user.username.to_string()),
            email: Set(email.clone()),
            role: Set(new_user.role),
            is_active: Set(true),
            last_login: Set(None),
            ..Default::default()
        };
        self.credential_store.set_password(&mut active, new_user.password)?;

        let created = active.insert(conn).await.map_err(|e| match unique_violation(&e) {
            Some(message) if message.contains("email") => ValidationError::DuplicateEmail(email).into(),
            Some(_) => ValidationError::DuplicateUsername(new_user.username.to_string()).into(),
            None => InternalError::database("create_user", e),
        })?;

        tracing::info!(user_id = created.id, username = %created.username, role = %created.role, "User created");

        Ok(created)
    }

    /// Enable or disable login for an account
    pub async fn set_active(
        &self,
        conn: &impl ConnectionTrait,
        user: user::Model,
        is_active: bool,
    ) -> Result<user::Model, InternalError> {
        let mut active: user::ActiveModel = user.into();
        active.is_active = Set(is_active);
        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("set_user_active", e))
    }

    pub async fn record_login(
        &self,
        conn: &impl ConnectionTrait,
        user: user::Model,
        at: i64,
    ) -> Result<user::Model, InternalError> {
        let mut active: user::ActiveModel = user.into();
        active.last_login = Set(Some(at));
        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("record_login", e))
    }

    /// Replace the stored digest
    pub async fn change_password(
        &self,
        conn: &impl ConnectionTrait,
        user: user::Model,
        new_password: &str,
    ) -> Result<user::Model, InternalError> {
        let mut active: user::ActiveModel = user.into();
        self.credential_store.set_password(&mut active, new_password)?;
        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("change_password", e))
    }

    /// The account's personnel profile, if one was registered
    pub async fn personnel_profile(
        &self,
        conn: &impl ConnectionTrait,
        user: &user::Model,
    ) -> Result<Option<security_personnel::Model>, InternalError> {
        user.find_related(security_personnel::Entity)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_personnel_profile", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{create_test_user, setup_user_store};

    #[tokio::test]
    async fn test_create_user_hashes_password_and_lowercases_email() {
        let (db, store) = setup_user_store().await;

        let user = store
            .create_user(
                &db,
                NewUser {
                    username: "alice",
                    email: "Alice@Example.COM",
                    role: UserRole::SecurityOfficer,
                    password: "Secr3t!",
                },
            )
            .await
            .unwrap();

        assert_eq!(user.email, "alice@example.com");
        assert_ne!(user.password_hash, "Secr3t!");
        assert!(user.is_active);
        assert!(user.created_at > 0);
        assert!(store.credential_store().check_password(&user, "Secr3t!").unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_typed() {
        let (db, store) = setup_user_store().await;
        create_test_user(&db, &store, "alice", UserRole::SecurityOfficer).await;

        let result = store
            .create_user(
                &db,
                NewUser {
                    username: "alice",
                    email: "other@example.com",
                    role: UserRole::SecurityOfficer,
                    password: "x",
                },
            )
            .await;

        assert!(matches!(
            result,
            Err(InternalError::Validation(ValidationError::DuplicateUsername(name))) if name == "alice"
        ));
    }

    #[tokio::test]
    async fn test_duplicate_email_differing_only_in_case_is_rejected() {
        let (db, store) = setup_user_store().await;
        create_test_user(&db, &store, "alice", UserRole::SecurityOfficer).await;

        let result = store
            .create_user(
                &db,
                NewUser {
                    username: "alice2",
                    email: "ALICE@example.com",
                    role: UserRole::SecurityOfficer,
                    password: "x",
                },
            )
            .await;

        assert!(matches!(
            result,
            Err(InternalError::Validation(ValidationError::DuplicateEmail(_)))
        ));
    }

    #[tokio::test]
    async fn test_invalid_email_is_rejected_before_insert() {
        let (db, store) = setup_user_store().await;

        let result = store
            .create_user(
                &db,
                NewUser {
                    username: "bob",
                    email: "bob@localhost",
                    role: UserRole::SecurityOfficer,
                    password: "x",
                },
            )
            .await;

        assert!(matches!(result, Err(InternalError::Validation(ValidationError::InvalidEmail(_)))));
        assert!(store.find_by_username(&db, "bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_username_is_case_sensitive() {
        let (db, store) = setup_user_store().await;
        let alice = create_test_user(&db, &store, "alice", UserRole::SecurityOfficer).await;

        assert_eq!(store.find_by_username(&db, "alice").await.unwrap().map(|u| u.id), Some(alice.id));
        assert!(store.find_by_username(&db, "Alice").await.unwrap().is_none());
        assert_eq!(store.find_by_id(&db, alice.id).await.unwrap().map(|u| u.username), Some("alice".to_string()));
        assert!(store.find_by_id(&db, alice.id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_active_and_record_login() {
        let (db, store) = setup_user_store().await;
        let alice = create_test_user(&db, &store, "alice", UserRole::SecurityOfficer).await;

        let alice = store.set_active(&db, alice, false).await.unwrap();
        assert!(!alice.is_active);

        let alice = store.record_login(&db, alice, 1_700_000_000).await.unwrap();
        assert_eq!(alice.last_login, Some(1_700_000_000));
    }

    #[tokio::test]
    async fn test_change_password_overwrites_digest() {
        let (db, store) = setup_user_store().await;
        let alice = create_test_user(&db, &store, "alice", UserRole::SecurityOfficer).await;
        let old_digest = alice.password_hash.clone();

        let alice = store.change_password(&db, alice, "n3w-pass").await.unwrap();

        assert_ne!(alice.password_hash, old_digest);
        assert!(store.credential_store().check_password(&alice, "n3w-pass").unwrap());
        assert!(!store.credential_store().check_password(&alice, "alice-pass").unwrap());
    }
}
