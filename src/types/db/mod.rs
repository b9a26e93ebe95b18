// Database entities - SeaORM models
pub mod audit_log;
pub mod security_checkpoint;
pub mod security_personnel;
pub mod threat;
pub mod user;

pub use threat::ThreatLevel;
pub use user::UserRole;

/// Serialize a list column; an empty list is stored as NULL
pub(crate) fn encode_list(items: &[String]) -> Result<Option<String>, serde_json::Error> {
    if items.is_empty() {
        return Ok(None);
    }
    serde_json::to_string(items).map(Some)
}

pub(crate) fn decode_list(raw: Option<&str>) -> Result<Vec<String>, serde_json::Error> {
    match raw {
        None => Ok(Vec::new()),
        Some(s) if s.trim().is_empty() => Ok(Vec::new()),
        Some(s) => serde_json::from_str(s),
    }
}
