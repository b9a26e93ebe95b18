use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::errors::InternalError;
use crate::errors::internal::ValidationError;
use crate::types::db::audit_log;

const ACTION_MAX_LEN: usize = 50;
const IP_ADDRESS_MAX_LEN: usize = 45;

/// One row to append to the audit trail
#[derive(Debug, Clone, Default)]
pub struct NewAuditEntry {
    pub threat_id: Option<i32>,
    pub user_id: Option<i32>,
    pub action: String,
    pub details: Option<String>,
    pub ip_address: Option<String>,
}

impl NewAuditEntry {
    pub fn new(action: &str) -> Self {
        Self {
            action: action.to_string(),
            ..Default::default()
        }
    }

    pub fn threat(mut self, threat_id: i32) -> Self {
        self.threat_id = Some(threat_id);
        self
    }

    pub fn by(mut self, user_id: i32) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn ip_address(mut self, ip_address: Option<String>) -> Self {
        self.ip_address = ip_address;
        self
    }
}

/// Repository for the append-only `audit_logs` table
///
/// There is no update or delete path. The entity's `before_save` also
/// refuses updates.
#[derive(Debug, Default)]
pub struct AuditStore;

impl AuditStore {
    pub fn new() -> Self {
        Self
    }

    /// Append one entry
    ///
    /// # Errors
    ///
    /// Returns `InternalError` if the action or address overflows its
    /// column or the insert fails
    pub async fn append(
        &self,
        conn: &impl ConnectionTrait,
        entry: NewAuditEntry,
    ) -> Result<audit_log::Model, InternalError> {
        ValidationError::check_text("action", &entry.action, ACTION_MAX_LEN)?;
        if let Some(ip) = &entry.ip_address {
            if ip.chars().count() > IP_ADDRESS_MAX_LEN {
                return Err(ValidationError::TooLong { field: "ip_address", max: IP_ADDRESS_MAX_LEN }.into());
            }
        }

        let active = audit_log::ActiveModel {
            threat_id: Set(entry.threat_id),
            user_id: Set(entry.user_id),
            action: Set(entry.action),
            details: Set(entry.details),
            ip_address: Set(entry.ip_address),
            ..Default::default()
        };

        active
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("write_audit_log", e))
    }

    /// Every entry for a threat in the order it was written
    pub async fn trail_for_threat(
        &self,
        conn: &impl ConnectionTrait,
        threat_id: i32,
    ) -> Result<Vec<audit_log::Model>, InternalError> {
        audit_log::Entity::find()
            .filter(audit_log::Column::ThreatId.eq(threat_id))
            .order_by_asc(audit_log::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("read_audit_trail", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::threat_store::{NewThreat, ThreatStore};
    use crate::test::utils::setup_test_db;
    use crate::types::db::ThreatLevel;

    #[tokio::test]
    async fn test_trail_is_in_write_order_and_scoped_to_threat() {
        let db = setup_test_db().await;
        let threats = ThreatStore::new();
        let new_threat = NewThreat {
            title: "Bag".to_string(),
            description: "Unattended".to_string(),
            location: "Gate 4".to_string(),
            threat_level: ThreatLevel::Low,
            evidence_photos: Vec::new(),
        };
        let first = threats.create(&db, None, new_threat.clone()).await.unwrap();
        let second = threats.create(&db, None, new_threat).await.unwrap();
        let store = AuditStore::new();

        store.append(&db, NewAuditEntry::new("threat_reported").threat(first.id)).await.unwrap();
        store.append(&db, NewAuditEntry::new("threat_reported").threat(second.id)).await.unwrap();
        store
            .append(&db, NewAuditEntry::new("threat_confirmed").threat(first.id).details("checked"))
            .await
            .unwrap();

        let trail = store.trail_for_threat(&db, first.id).await.unwrap();
        let actions: Vec<&str> = trail.iter().map(|e| e.action.as_str()).collect();
        assert_eq!(actions, vec!["threat_reported", "threat_confirmed"]);
        assert_eq!(trail[1].details.as_deref(), Some("checked"));
        assert!(trail[0].created_at > 0);
    }

    #[tokio::test]
    async fn test_entries_cannot_be_updated() {
        let db = setup_test_db().await;
        let store = AuditStore::new();
        let entry = store.append(&db, NewAuditEntry::new("system_note")).await.unwrap();

        let mut active: audit_log::ActiveModel = entry.into();
        active.action = Set("tampered".to_string());

        assert!(active.update(&db).await.is_err());
    }

    #[tokio::test]
    async fn test_ipv6_address_fits_and_longer_is_rejected() {
        let db = setup_test_db().await;
        let store = AuditStore::new();
        let ipv6 = "ffff:ffff:ffff:ffff:ffff:ffff:255.255.255.255".to_string();

        assert!(store.append(&db, NewAuditEntry::new("ip_width_check").ip_address(Some(ipv6.clone()))).await.is_ok());

        let result = store
            .append(&db, NewAuditEntry::new("ip_width_check").ip_address(Some(format!("{}0", ipv6))))
            .await;
        assert!(matches!(
            result,
            Err(InternalError::Validation(ValidationError::TooLong { field: "ip_address", .. }))
        ));
    }
}
