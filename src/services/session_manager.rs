use std::net::IpAddr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use sea_orm::DatabaseConnection;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::config::{commit_scope, session_scope};
use crate::errors::{AuthError, InternalError};
use crate::providers::{Clock, TokenProvider};
use crate::stores::UserStore;
use crate::types::db::user;
use crate::types::internal::{AccessToken, Claims, Principal, SessionContext};

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Notifications for the host application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A scheduled refresh minted a replacement token
    TokenRefreshed(AccessToken),
    LoggedOut,
}

/// Authenticates users, issues and verifies session tokens, and keeps the
/// single current principal of a client session
///
/// At most one refresh timer is pending at a time. Scheduling a new one,
/// logging out, or dropping the manager cancels the previous timer.
pub struct SessionManager {
    db: DatabaseConnection,
    user_store: Arc<UserStore>,
    token_provider: Arc<TokenProvider>,
    clock: Arc<dyn Clock>,
    current: Arc<Mutex<Option<Principal>>>,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionManager {
    pub fn new(
        db: DatabaseConnection,
        user_store: Arc<UserStore>,
        token_provider: Arc<TokenProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            db,
            user_store,
            token_provider,
            clock,
            current: Arc::new(Mutex::new(None)),
            refresh_task: Mutex::new(None),
            events,
        }
    }

    /// Check a username/password pair and open a session
    ///
    /// Returns `Ok(None)` for an unknown username and for a wrong password
    /// alike. Both paths do the same hashing work.
    ///
    /// # Errors
    ///
    /// `AccountDisabled` when the password is right but the account is
    /// inactive. `Internal` for storage or signing failures.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Option<AccessToken>, AuthError> {
        let txn = session_scope(&self.db).await?;
        let credentials = self.user_store.credential_store();

        let Some(user) = self.user_store.find_by_username(&txn, username).await? else {
            credentials.equalize_timing(password);
            tracing::info!("Login rejected: invalid credentials");
            return Ok(None);
        };

        if !credentials.check_password(&user, password).map_err(InternalError::from)? {
            tracing::info!("Login rejected: invalid credentials");
            return Ok(None);
        }

        if !user.is_active {
            tracing::warn!(user_id = user.id, username = %user.username, "Login attempt on disabled account");
            return Err(AuthError::AccountDisabled);
        }

        let now = self.clock.now();
        let principal = Principal::from(&user);
        let (token, claims) = self.token_provider.issue(&principal, now)?;

        self.user_store.record_login(&txn, user, now.timestamp()).await?;
        commit_scope(txn).await?;

        tracing::info!(user_id = principal.user_id, username = %principal.username, role = %principal.role, "Login succeeded");

        *self.current.lock() = Some(principal);
        self.arm_refresh(&claims)?;

        Ok(Some(token))
    }

    /// Resolve a token to its live, active user
    ///
    /// On success the user becomes the current principal.
    pub async fn verify_token(&self, token: &AccessToken) -> Result<user::Model, AuthError> {
        let claims = self.token_provider.validate(token, self.clock.now())?;
        let user_id = claims.user_id().ok_or_else(|| {
            tracing::debug!(sub = %claims.sub, "Token subject is not a user id");
            AuthError::InvalidToken
        })?;

        let user = match load_user(&self.db, &self.user_store, user_id).await? {
            Some(user) if user.is_active => user,
            Some(_) => {
                tracing::warn!(user_id, "Token presented for disabled account");
                return Err(AuthError::InvalidToken);
            }
            None => {
                tracing::warn!(user_id, "Token presented for unknown user");
                return Err(AuthError::InvalidToken);
            }
        };

        *self.current.lock() = Some(Principal::from(&user));

        Ok(user)
    }

    /// Arm a one-shot refresh at `exp - refresh_lead` for `token`
    ///
    /// Replaces any pending refresh. When it fires, the principal's account
    /// is reloaded: if it is still active a fresh token carrying its current
    /// role is broadcast as `SessionEvent::TokenRefreshed`, otherwise the
    /// session ends with `SessionEvent::LoggedOut`. The host re-arms by
    /// calling this again with the new token. Returns the instant the
    /// refresh is due.
    pub async fn schedule_refresh(&self, token: &AccessToken) -> Result<DateTime<Utc>, AuthError> {
        let claims = self.token_provider.validate(token, self.clock.now())?;
        self.arm_refresh(&claims)
    }

    fn arm_refresh(&self, claims: &Claims) -> Result<DateTime<Utc>, AuthError> {
        let refresh_at = self
            .token_provider
            .refresh_at(claims)
            .ok_or(AuthError::InvalidToken)?;

        let clock = Arc::clone(&self.clock);
        let provider = Arc::clone(&self.token_provider);
        let current = Arc::clone(&self.current);
        let events = self.events.clone();
        let db = self.db.clone();
        let user_store = Arc::clone(&self.user_store);

        let task = tokio::spawn(async move {
            clock.sleep_until(refresh_at).await;

            let Some(user_id) = current.lock().as_ref().map(|p| p.user_id) else {
                tracing::debug!("Refresh skipped: no active session");
                return;
            };

            let user = match load_user(&db, &user_store, user_id).await {
                Ok(user) => user,
                Err(e) => {
                    tracing::error!(user_id, error = %e, "Session token refresh failed");
                    return;
                }
            };

            let Some(user) = user.filter(|u| u.is_active) else {
                tracing::warn!(user_id, "Refresh withheld: account disabled or removed");
                current.lock().take();
                let _ = events.send(SessionEvent::LoggedOut);
                return;
            };

            let principal = Principal::from(&user);
            *current.lock() = Some(principal.clone());

            match provider.issue(&principal, clock.now()) {
                Ok((token, _)) => {
                    tracing::info!(user_id = principal.user_id, "Session token refreshed");
                    // No subscribers is not an error for the session.
                    let _ = events.send(SessionEvent::TokenRefreshed(token));
                }
                Err(e) => tracing::error!(user_id = principal.user_id, error = %e, "Session token refresh failed"),
            }
        });

        if let Some(previous) = self.refresh_task.lock().replace(task) {
            previous.abort();
        }

        tracing::debug!(refresh_at = %refresh_at, "Token refresh scheduled");

        Ok(refresh_at)
    }

    /// End the session: forget the principal and cancel any pending refresh
    ///
    /// Tokens already issued stay valid until they expire.
    pub fn logout(&self) {
        let previous = self.current.lock().take();
        self.cancel_refresh();

        if let Some(principal) = previous {
            tracing::info!(user_id = principal.user_id, username = %principal.username, "Logged out");
        }

        let _ = self.events.send(SessionEvent::LoggedOut);
    }

    fn cancel_refresh(&self) {
        if let Some(task) = self.refresh_task.lock().take() {
            task.abort();
        }
    }

    pub fn current_principal(&self) -> Option<Principal> {
        self.current.lock().clone()
    }

    /// Snapshot of the current principal for passing into protected operations
    pub fn context(&self, ip_address: Option<IpAddr>) -> SessionContext {
        SessionContext {
            principal: self.current_principal(),
            ip_address,
        }
    }

    /// True while a refresh timer is armed and has not fired
    pub fn refresh_pending(&self) -> bool {
        self.refresh_task
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

async fn load_user(
    db: &DatabaseConnection,
    user_store: &UserStore,
    user_id: i32,
) -> Result<Option<user::Model>, InternalError> {
    let txn = session_scope(db).await?;
    let user = user_store.find_by_id(&txn, user_id).await?;
    commit_scope(txn).await?;
    Ok(user)
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.cancel_refresh();
    }
}
