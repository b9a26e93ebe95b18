mod common;

use std::time::Duration as StdDuration;

use chrono::Duration;
use threatdesk::config::{commit_scope, session_scope};
use threatdesk::errors::AuthError;
use threatdesk::services::SessionEvent;
use threatdesk::types::db::UserRole;
use threatdesk::types::internal::AccessToken;

use common::{create_user, setup_test_app};

/// Flip one character inside the signature segment
fn tamper_signature(token: &AccessToken) -> AccessToken {
    let raw = token.as_str();
    let sig_start = raw.rfind('.').expect("JWT has three segments") + 1;
    let mut bytes = raw.as_bytes().to_vec();
    bytes[sig_start] = if bytes[sig_start] == b'A' { b'B' } else { b'A' };
    AccessToken::from(String::from_utf8(bytes).unwrap())
}

#[tokio::test]
async fn test_alice_scenario() {
    let app = setup_test_app().await;
    let db = &app.app_data.db;
    let users = &app.app_data.user_store;

    let alice = create_user(&app.app_data, "alice", UserRole::SecurityOfficer).await;
    let alice = users.change_password(db, alice, "Secr3t!").await.unwrap();
    let manager = app.app_data.session_manager();

    assert!(manager.authenticate("alice", "Secr3t!").await.unwrap().is_some());
    assert!(manager.authenticate("alice", "wrong").await.unwrap().is_none());

    users.set_active(db, alice, false).await.unwrap();

    assert!(matches!(
        manager.authenticate("alice", "Secr3t!").await,
        Err(AuthError::AccountDisabled)
    ));
}

#[tokio::test]
async fn test_token_identity_matches_stored_user() {
    let app = setup_test_app().await;
    let stored = create_user(&app.app_data, "dana", UserRole::ComplianceAuditor).await;
    let manager = app.app_data.session_manager();

    let token = manager.authenticate("dana", "dana-pass").await.unwrap().unwrap();
    let claims = app.app_data.token_provider.validate(&token, app.now()).unwrap();

    assert_eq!(claims.sub, stored.id.to_string());
    assert_eq!(claims.username, "dana");
    assert_eq!(claims.role, "Compliance Auditor");
    assert_eq!(claims.exp - claims.iat, 8 * 60 * 60);

    let verified = manager.verify_token(&token).await.unwrap();
    assert_eq!(verified.id, stored.id);
    assert_eq!(verified.username, stored.username);
    assert_eq!(verified.role, stored.role);
}

#[tokio::test]
async fn test_login_stamps_last_login() {
    let app = setup_test_app().await;
    let stored = create_user(&app.app_data, "erin", UserRole::SecuritySupervisor).await;
    assert_eq!(stored.last_login, None);
    let manager = app.app_data.session_manager();

    manager.authenticate("erin", "erin-pass").await.unwrap().unwrap();

    let reloaded = app.app_data.user_store.find_by_id(&app.app_data.db, stored.id).await.unwrap().unwrap();
    assert_eq!(reloaded.last_login, Some(app.now().timestamp()));
}

#[tokio::test]
async fn test_unknown_user_and_wrong_password_look_the_same() {
    let app = setup_test_app().await;
    create_user(&app.app_data, "alice", UserRole::SecurityOfficer).await;
    let manager = app.app_data.session_manager();

    let unknown = manager.authenticate("mallory", "alice-pass").await;
    let unknown_state = (manager.current_principal(), manager.refresh_pending());

    let wrong = manager.authenticate("alice", "not-it").await;
    let wrong_state = (manager.current_principal(), manager.refresh_pending());

    assert!(matches!(unknown, Ok(None)));
    assert!(matches!(wrong, Ok(None)));
    assert_eq!(unknown_state, (None, false));
    assert_eq!(unknown_state, wrong_state);
}

#[tokio::test]
async fn test_username_lookup_is_exact() {
    let app = setup_test_app().await;
    create_user(&app.app_data, "alice", UserRole::SecurityOfficer).await;
    let manager = app.app_data.session_manager();

    assert!(manager.authenticate("Alice", "alice-pass").await.unwrap().is_none());
    assert!(manager.authenticate("alice ", "alice-pass").await.unwrap().is_none());
}

#[tokio::test]
async fn test_expired_token_is_rejected_as_expired() {
    let app = setup_test_app().await;
    create_user(&app.app_data, "alice", UserRole::SecurityOfficer).await;
    let manager = app.app_data.session_manager();
    let token = manager.authenticate("alice", "alice-pass").await.unwrap().unwrap();

    app.clock.advance(Duration::hours(8) - Duration::seconds(1));
    assert!(manager.verify_token(&token).await.is_ok());

    app.clock.advance(Duration::seconds(1));
    assert!(matches!(manager.verify_token(&token).await, Err(AuthError::TokenExpired)));
}

#[tokio::test]
async fn test_tampered_and_garbage_tokens_are_invalid() {
    let app = setup_test_app().await;
    create_user(&app.app_data, "alice", UserRole::SecurityOfficer).await;
    let manager = app.app_data.session_manager();
    let token = manager.authenticate("alice", "alice-pass").await.unwrap().unwrap();

    assert!(matches!(
        manager.verify_token(&tamper_signature(&token)).await,
        Err(AuthError::InvalidToken)
    ));
    assert!(matches!(
        manager.verify_token(&AccessToken::from("not.a.jwt")).await,
        Err(AuthError::InvalidToken)
    ));
    assert!(matches!(
        manager.verify_token(&AccessToken::from("")).await,
        Err(AuthError::InvalidToken)
    ));
}

#[tokio::test]
async fn test_token_for_deactivated_user_is_invalid() {
    let app = setup_test_app().await;
    let alice = create_user(&app.app_data, "alice", UserRole::SecurityOfficer).await;
    let manager = app.app_data.session_manager();
    let token = manager.authenticate("alice", "alice-pass").await.unwrap().unwrap();

    let txn = session_scope(&app.app_data.db).await.unwrap();
    app.app_data.user_store.set_active(&txn, alice, false).await.unwrap();
    commit_scope(txn).await.unwrap();

    assert!(matches!(manager.verify_token(&token).await, Err(AuthError::InvalidToken)));
}

#[tokio::test]
async fn test_verify_sets_current_principal_on_fresh_session() {
    let app = setup_test_app().await;
    create_user(&app.app_data, "alice", UserRole::SecurityOfficer).await;
    let token = app
        .app_data
        .session_manager()
        .authenticate("alice", "alice-pass")
        .await
        .unwrap()
        .unwrap();

    let other = app.app_data.session_manager();
    assert!(other.current_principal().is_none());

    other.verify_token(&token).await.unwrap();

    assert_eq!(other.current_principal().map(|p| p.username), Some("alice".to_string()));
}

#[tokio::test]
async fn test_refresh_chain_can_be_rearmed_by_host() {
    let app = setup_test_app().await;
    create_user(&app.app_data, "alice", UserRole::SecurityOfficer).await;
    let manager = app.app_data.session_manager();
    let mut events = manager.subscribe();
    manager.authenticate("alice", "alice-pass").await.unwrap().unwrap();

    app.clock.advance(Duration::hours(7) + Duration::minutes(55));
    let Ok(Ok(SessionEvent::TokenRefreshed(renewed))) =
        tokio::time::timeout(StdDuration::from_secs(2), events.recv()).await
    else {
        panic!("first refresh did not fire");
    };

    let next_due = manager.schedule_refresh(&renewed).await.unwrap();
    assert_eq!(next_due, app.now() + Duration::hours(8) - Duration::minutes(5));

    app.clock.set(next_due);
    let second = tokio::time::timeout(StdDuration::from_secs(2), events.recv()).await;
    assert!(matches!(second, Ok(Ok(SessionEvent::TokenRefreshed(_)))));
}

#[tokio::test]
async fn test_refresh_logs_out_deactivated_user() {
    let app = setup_test_app().await;
    let alice = create_user(&app.app_data, "alice", UserRole::SecurityOfficer).await;
    let manager = app.app_data.session_manager();
    let mut events = manager.subscribe();
    manager.authenticate("alice", "alice-pass").await.unwrap().unwrap();

    let txn = session_scope(&app.app_data.db).await.unwrap();
    app.app_data.user_store.set_active(&txn, alice, false).await.unwrap();
    commit_scope(txn).await.unwrap();

    app.clock.advance(Duration::hours(7) + Duration::minutes(55));
    let event = tokio::time::timeout(StdDuration::from_secs(2), events.recv()).await;

    assert!(matches!(event, Ok(Ok(SessionEvent::LoggedOut))));
    assert!(manager.current_principal().is_none());
}

#[tokio::test]
async fn test_schedule_refresh_rejects_expired_token() {
    let app = setup_test_app().await;
    create_user(&app.app_data, "alice", UserRole::SecurityOfficer).await;
    let manager = app.app_data.session_manager();
    let token = manager.authenticate("alice", "alice-pass").await.unwrap().unwrap();

    app.clock.advance(Duration::hours(9));

    assert!(matches!(manager.schedule_refresh(&token).await, Err(AuthError::TokenExpired)));
}

#[tokio::test]
async fn test_logout_keeps_token_valid_until_expiry() {
    let app = setup_test_app().await;
    create_user(&app.app_data, "alice", UserRole::SecurityOfficer).await;
    let manager = app.app_data.session_manager();
    let token = manager.authenticate("alice", "alice-pass").await.unwrap().unwrap();

    manager.logout();
    assert!(manager.current_principal().is_none());

    // Stateless tokens are not revoked.
    assert!(manager.verify_token(&token).await.is_ok());
}
