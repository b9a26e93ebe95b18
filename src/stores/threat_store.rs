use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::errors::InternalError;
use crate::errors::internal::ValidationError;
use crate::types::db::threat::{self, STATUS_MAX_LEN, STATUS_RESOLVED};
use crate::types::db::{ThreatLevel, encode_list};

const TITLE_MAX_LEN: usize = 100;
const LOCATION_MAX_LEN: usize = 100;

/// Fields for a freshly filed threat report
#[derive(Debug, Clone)]
pub struct NewThreat {
    pub title: String,
    pub description: String,
    pub location: String,
    pub threat_level: ThreatLevel,
    pub evidence_photos: Vec<String>,
}

/// Repository for `threats` rows
#[derive(Debug, Default)]
pub struct ThreatStore;

impl ThreatStore {
    pub fn new() -> Self {
        Self
    }

    /// Insert a report in the "Reported" state, unconfirmed and unassigned
    pub async fn create(
        &self,
        conn: &impl ConnectionTrait,
        reporter_id: Option<i32>,
        new_threat: NewThreat,
    ) -> Result<threat::Model, InternalError> {
        ValidationError::check_text("title", &new_threat.title, TITLE_MAX_LEN)?;
        ValidationError::check_text("location", &new_threat.location, LOCATION_MAX_LEN)?;
        if new_threat.description.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "description" }.into());
        }

        let active = threat::ActiveModel {
            reporter_id: Set(reporter_id),
            assigned_officer_id: Set(None),
            title: Set(new_threat.title),
            description: Set(new_threat.description),
            location: Set(new_threat.location),
            threat_level: Set(new_threat.threat_level),
            is_confirmed: Set(false),
            resolved_at: Set(None),
            evidence_photos: Set(encode_list(&new_threat.evidence_photos)?),
            ..Default::default()
        };

        active
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("create_threat", e))
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        id: i32,
    ) -> Result<Option<threat::Model>, InternalError> {
        threat::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_threat_by_id", e))
    }

    pub async fn assign_officer(
        &self,
        conn: &impl ConnectionTrait,
        threat: threat::Model,
        officer_id: i32,
    ) -> Result<threat::Model, InternalError> {
        let mut active: threat::ActiveModel = threat.into();
        active.assigned_officer_id = Set(Some(officer_id));
        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("assign_officer", e))
    }

    pub async fn confirm(
        &self,
        conn: &impl ConnectionTrait,
        threat: threat::Model,
    ) -> Result<threat::Model, InternalError> {
        let mut active: threat::ActiveModel = threat.into();
        active.is_confirmed = Set(true);
        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("confirm_threat", e))
    }

    /// Set a free-form status label on an open threat. The resolved label
    /// belongs to `resolve`, which also stamps `resolved_at`.
    pub async fn set_status(
        &self,
        conn: &impl ConnectionTrait,
        threat: threat::Model,
        status: &str,
    ) -> Result<threat::Model, InternalError> {
        ValidationError::check_text("status", status, STATUS_MAX_LEN)?;
        if status.trim().eq_ignore_ascii_case(STATUS_RESOLVED) {
            return Err(ValidationError::ReservedStatus(status.to_string()).into());
        }
        if threat.is_resolved() {
            return Err(ValidationError::AlreadyResolved(threat.id).into());
        }

        let mut active: threat::ActiveModel = threat.into();
        active.status = Set(status.to_string());
        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("set_threat_status", e))
    }

    /// Close a threat. A threat resolves once; later attempts are rejected.
    pub async fn resolve(
        &self,
        conn: &impl ConnectionTrait,
        threat: threat::Model,
        at: i64,
    ) -> Result<threat::Model, InternalError> {
        if threat.is_resolved() {
            return Err(ValidationError::AlreadyResolved(threat.id).into());
        }

        let mut active: threat::ActiveModel = threat.into();
        active.status = Set(STATUS_RESOLVED.to_string());
        active.resolved_at = Set(Some(at));
        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("resolve_threat", e))
    }

    /// Unresolved threats, most severe first then oldest first
    pub async fn list_open(&self, conn: &impl ConnectionTrait) -> Result<Vec<threat::Model>, InternalError> {
        let mut open = threat::Entity::find()
            .filter(threat::Column::ResolvedAt.is_null())
            .order_by_asc(threat::Column::ReportedAt)
            .order_by_asc(threat::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_open_threats", e))?;

        // Stable sort keeps the age order within each level.
        open.sort_by_key(|t| std::cmp::Reverse(severity(t.threat_level)));
        Ok(open)
    }
}

fn severity(level: ThreatLevel) -> u8 {
    match level {
        ThreatLevel::Low => 0,
        ThreatLevel::Medium => 1,
        ThreatLevel::High => 2,
        ThreatLevel::Critical => 3,
    }
}
