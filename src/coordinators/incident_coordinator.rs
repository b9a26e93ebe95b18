use std::sync::Arc;

use sea_orm::{ConnectionTrait, DatabaseConnection};

use crate::app_data::AppData;
use crate::config::{commit_scope, session_scope};
use crate::errors::IncidentError;
use crate::providers::Clock;
use crate::services::require_role;
use crate::stores::audit_store::NewAuditEntry;
use crate::stores::checkpoint_store::NewCheckpoint;
use crate::stores::personnel_store::NewPersonnel;
use crate::stores::threat_store::NewThreat;
use crate::stores::user_store::NewUser;
use crate::stores::{AuditStore, CheckpointStore, PersonnelStore, ThreatStore, UserStore};
use crate::types::db::{UserRole, audit_log, security_checkpoint, security_personnel, threat, user};
use crate::types::internal::{Principal, SessionContext};

use UserRole::{Administrator, ComplianceAuditor, SecurityOfficer, SecuritySupervisor};

const FIELD_STAFF: &[UserRole] = &[Administrator, SecuritySupervisor, SecurityOfficer];
const SUPERVISORS: &[UserRole] = &[Administrator, SecuritySupervisor];
const OVERSIGHT: &[UserRole] = &[Administrator, SecuritySupervisor, ComplianceAuditor];
const ADMINISTRATORS: &[UserRole] = &[Administrator];

pub const ACTION_THREAT_REPORTED: &str = "threat_reported";
pub const ACTION_OFFICER_ASSIGNED: &str = "officer_assigned";
pub const ACTION_THREAT_CONFIRMED: &str = "threat_confirmed";
pub const ACTION_STATUS_UPDATED: &str = "status_updated";
pub const ACTION_THREAT_RESOLVED: &str = "threat_resolved";

/// Role-gated workflows of the incident tracker
///
/// Each mutating threat workflow runs in one session scope: change the
/// threat, append its audit entry, commit. A failure anywhere rolls back
/// both.
pub struct IncidentCoordinator {
    db: DatabaseConnection,
    clock: Arc<dyn Clock>,
    user_store: Arc<UserStore>,
    personnel_store: Arc<PersonnelStore>,
    threat_store: Arc<ThreatStore>,
    audit_store: Arc<AuditStore>,
    checkpoint_store: Arc<CheckpointStore>,
}

impl IncidentCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            clock: Arc::clone(&app_data.clock),
            user_store: Arc::clone(&app_data.user_store),
            personnel_store: Arc::clone(&app_data.personnel_store),
            threat_store: Arc::clone(&app_data.threat_store),
            audit_store: Arc::clone(&app_data.audit_store),
            checkpoint_store: Arc::clone(&app_data.checkpoint_store),
        }
    }

    fn audit_entry(ctx: &SessionContext, principal: &Principal, action: &str, threat_id: i32) -> NewAuditEntry {
        NewAuditEntry::new(action)
            .threat(threat_id)
            .by(principal.user_id)
            .ip_address(ctx.ip_address.map(|ip| ip.to_string()))
    }

    /// File a new threat report on behalf of the caller
    pub async fn report_threat(&self, ctx: &SessionContext, report: NewThreat) -> Result<threat::Model, IncidentError> {
        let principal = require_role(FIELD_STAFF).authorize(ctx)?;

        let txn = session_scope(&self.db).await?;
        let threat = self.threat_store.create(&txn, Some(principal.user_id), report).await?;
        self.audit_store
            .append(
                &txn,
                Self::audit_entry(ctx, principal, ACTION_THREAT_REPORTED, threat.id)
                    .details(format!("{} ({}) at {}", threat.title, threat.threat_level, threat.location)),
            )
            .await?;
        commit_scope(txn).await?;

        tracing::info!(threat_id = threat.id, level = %threat.threat_level, reporter = principal.user_id, "Threat reported");

        Ok(threat)
    }

    /// Put an officer on a threat
    pub async fn assign_officer(
        &self,
        ctx: &SessionContext,
        threat_id: i32,
        officer_id: i32,
    ) -> Result<threat::Model, IncidentError> {
        let principal = require_role(SUPERVISORS).authorize(ctx)?;

        let txn = session_scope(&self.db).await?;
        let threat = self.load_threat(&txn, threat_id).await?;
        let officer = self
            .personnel_store
            .find_by_id(&txn, officer_id)
            .await?
            .ok_or_else(|| IncidentError::not_found("officer", officer_id))?;

        let threat = self.threat_store.assign_officer(&txn, threat, officer.id).await?;
        self.audit_store
            .append(
                &txn,
                Self::audit_entry(ctx, principal, ACTION_OFFICER_ASSIGNED, threat.id)
                    .details(format!("{} (badge {})", officer.full_name(), officer.badge_number)),
            )
            .await?;
        commit_scope(txn).await?;

        tracing::info!(threat_id, officer_id, by = principal.user_id, "Officer assigned");

        Ok(threat)
    }

    pub async fn confirm_threat(&self, ctx: &SessionContext, threat_id: i32) -> Result<threat::Model, IncidentError> {
        let principal = require_role(FIELD_STAFF).authorize(ctx)?;

        let txn = session_scope(&self.db).await?;
        let threat = self.load_threat(&txn, threat_id).await?;
        let threat = self.threat_store.confirm(&txn, threat).await?;
        self.audit_store
            .append(&txn, Self::audit_entry(ctx, principal, ACTION_THREAT_CONFIRMED, threat.id))
            .await?;
        commit_scope(txn).await?;

        tracing::info!(threat_id, by = principal.user_id, "Threat confirmed");

        Ok(threat)
    }

    pub async fn update_status(
        &self,
        ctx: &SessionContext,
        threat_id: i32,
        status: &str,
    ) -> Result<threat::Model, IncidentError> {
        let principal = require_role(FIELD_STAFF).authorize(ctx)?;

        let txn = session_scope(&self.db).await?;
        let threat = self.load_threat(&txn, threat_id).await?;
        let previous = threat.status.clone();
        let threat = self.threat_store.set_status(&txn, threat, status).await?;
        self.audit_store
            .append(
                &txn,
                Self::audit_entry(ctx, principal, ACTION_STATUS_UPDATED, threat.id)
                    .details(format!("{} -> {}", previous, threat.status)),
            )
            .await?;
        commit_scope(txn).await?;

        Ok(threat)
    }

    /// Close a threat. Resolving an already resolved threat is rejected.
    pub async fn resolve_threat(
        &self,
        ctx: &SessionContext,
        threat_id: i32,
        notes: Option<&str>,
    ) -> Result<threat::Model, IncidentError> {
        let principal = require_role(SUPERVISORS).authorize(ctx)?;

        let txn = session_scope(&self.db).await?;
        let threat = self.load_threat(&txn, threat_id).await?;
        let threat = self
            .threat_store
            .resolve(&txn, threat, self.clock.now().timestamp())
            .await?;

        let mut entry = Self::audit_entry(ctx, principal, ACTION_THREAT_RESOLVED, threat.id);
        if let Some(notes) = notes {
            entry = entry.details(notes);
        }
        self.audit_store.append(&txn, entry).await?;
        commit_scope(txn).await?;

        tracing::info!(threat_id, by = principal.user_id, "Threat resolved");

        Ok(threat)
    }

    /// Audit entries for a threat, oldest first
    pub async fn threat_audit_trail(
        &self,
        ctx: &SessionContext,
        threat_id: i32,
    ) -> Result<Vec<audit_log::Model>, IncidentError> {
        require_role(OVERSIGHT)
            .guard_async(ctx, |_| async move {
                let txn = session_scope(&self.db).await?;
                self.load_threat(&txn, threat_id).await?;
                let trail = self.audit_store.trail_for_threat(&txn, threat_id).await?;
                commit_scope(txn).await?;
                Ok::<_, IncidentError>(trail)
            })
            .await
    }

    /// Unresolved threats, most severe first
    pub async fn open_threats(&self, ctx: &SessionContext) -> Result<Vec<threat::Model>, IncidentError> {
        require_role(FIELD_STAFF)
            .guard_async(ctx, |_| async move {
                let txn = session_scope(&self.db).await?;
                let open = self.threat_store.list_open(&txn).await?;
                commit_scope(txn).await?;
                Ok::<_, IncidentError>(open)
            })
            .await
    }

    pub async fn register_checkpoint(
        &self,
        ctx: &SessionContext,
        checkpoint: NewCheckpoint,
    ) -> Result<security_checkpoint::Model, IncidentError> {
        let principal = require_role(SUPERVISORS).authorize(ctx)?;

        let txn = session_scope(&self.db).await?;
        let created = self.checkpoint_store.create(&txn, checkpoint).await?;
        commit_scope(txn).await?;

        tracing::info!(checkpoint_id = created.id, name = %created.name, by = principal.user_id, "Checkpoint registered");

        Ok(created)
    }

    /// Stamp the checkpoint's last inspection with the current time
    pub async fn record_inspection(
        &self,
        ctx: &SessionContext,
        checkpoint_id: i32,
    ) -> Result<security_checkpoint::Model, IncidentError> {
        let principal = require_role(FIELD_STAFF).authorize(ctx)?;

        let txn = session_scope(&self.db).await?;
        let checkpoint = self
            .checkpoint_store
            .find_by_id(&txn, checkpoint_id)
            .await?
            .ok_or_else(|| IncidentError::not_found("checkpoint", checkpoint_id))?;
        let inspected = self
            .checkpoint_store
            .record_inspection(&txn, checkpoint, self.clock.now().timestamp())
            .await?;
        commit_scope(txn).await?;

        tracing::info!(checkpoint_id, by = principal.user_id, "Checkpoint inspected");

        Ok(inspected)
    }

    /// Attach a personnel profile to an existing account
    pub async fn register_personnel(
        &self,
        ctx: &SessionContext,
        profile: NewPersonnel,
    ) -> Result<security_personnel::Model, IncidentError> {
        require_role(ADMINISTRATORS).authorize(ctx)?;

        let txn = session_scope(&self.db).await?;
        let user_id = profile.user_id;
        self.user_store
            .find_by_id(&txn, user_id)
            .await?
            .ok_or_else(|| IncidentError::not_found("user", user_id))?;
        let created = self.personnel_store.create(&txn, profile).await?;
        commit_scope(txn).await?;

        Ok(created)
    }

    pub async fn create_user(&self, ctx: &SessionContext, new_user: NewUser<'_>) -> Result<user::Model, IncidentError> {
        let principal = require_role(ADMINISTRATORS).authorize(ctx)?;

        let txn = session_scope(&self.db).await?;
        let created = self.user_store.create_user(&txn, new_user).await?;
        commit_scope(txn).await?;

        tracing::info!(user_id = created.id, by = principal.user_id, "Account created by administrator");

        Ok(created)
    }

    async fn load_threat(
        &self,
        conn: &impl ConnectionTrait,
        threat_id: i32,
    ) -> Result<threat::Model, IncidentError> {
        self.threat_store
            .find_by_id(conn, threat_id)
            .await?
            .ok_or_else(|| IncidentError::not_found("threat", threat_id))
    }
}
