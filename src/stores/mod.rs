// Stores layer - Data access and repository pattern
//
// Every query takes the connection to run on, so callers decide whether it
// joins an open session scope.
pub mod audit_store;
pub mod checkpoint_store;
pub mod credential_store;
pub mod personnel_store;
pub mod threat_store;
pub mod user_store;

pub use audit_store::AuditStore;
pub use checkpoint_store::CheckpointStore;
pub use credential_store::CredentialStore;
pub use personnel_store::PersonnelStore;
pub use threat_store::ThreatStore;
pub use user_store::UserStore;

use sea_orm::{DbErr, SqlErr};

/// Text of a unique-constraint failure, if `err` is one
///
/// SQLite reports these as `UNIQUE constraint failed: <table>.<column>`, so
/// the returned text names the offending column.
pub(crate) fn unique_violation(err: &DbErr) -> Option<String> {
    if let Some(SqlErr::UniqueConstraintViolation(message)) = err.sql_err() {
        return Some(message);
    }

    let text = err.to_string();
    text.contains("UNIQUE").then_some(text)
}
