use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set};

use crate::errors::InternalError;
use crate::errors::internal::ValidationError;
use crate::stores::unique_violation;
use crate::types::db::{security_personnel, threat};

const BADGE_MAX_LEN: usize = 20;
const NAME_MAX_LEN: usize = 50;
const DEPARTMENT_MAX_LEN: usize = 50;

/// Fields for a personnel profile
#[derive(Debug, Clone)]
pub struct NewPersonnel {
    pub user_id: i32,
    pub badge_number: String,
    pub first_name: String,
    pub last_name: String,
    pub clearance_level: i32,
    pub department: Option<String>,
    pub is_armed: bool,
    pub certifications: Option<String>,
}

impl NewPersonnel {
    /// Unarmed, clearance 1, no department or certifications
    pub fn new(user_id: i32, badge_number: &str, first_name: &str, last_name: &str) -> Self {
        Self {
            user_id,
            badge_number: badge_number.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            clearance_level: 1,
            department: None,
            is_armed: false,
            certifications: None,
        }
    }
}

/// Repository for `security_personnel` rows
#[derive(Debug, Default)]
pub struct PersonnelStore;

impl PersonnelStore {
    pub fn new() -> Self {
        Self
    }

    /// Attach a profile to an existing user
    ///
    /// # Errors
    ///
    /// `ProfileExists` when the user already has one, `DuplicateBadge` when
    /// the badge number is already issued.
    pub async fn create(
        &self,
        conn: &impl ConnectionTrait,
        new_personnel: NewPersonnel,
    ) -> Result<security_personnel::Model, InternalError> {
        ValidationError::check_text("badge_number", &new_personnel.badge_number, BADGE_MAX_LEN)?;
        ValidationError::check_text("first_name", &new_personnel.first_name, NAME_MAX_LEN)?;
        ValidationError::check_text("last_name", &new_personnel.last_name, NAME_MAX_LEN)?;
        if let Some(department) = &new_personnel.department {
            ValidationError::check_text("department", department, DEPARTMENT_MAX_LEN)?;
        }

        let user_id = new_personnel.user_id;
        let badge_number = new_personnel.badge_number.clone();

        let active = security_personnel::ActiveModel {
            user_id: Set(new_personnel.user_id),
            badge_number: Set(new_personnel.badge_number),
            first_name: Set(new_personnel.first_name),
            last_name: Set(new_personnel.last_name),
            clearance_level: Set(new_personnel.clearance_level),
            department: Set(new_personnel.department),
            is_armed: Set(new_personnel.is_armed),
            certifications: Set(new_personnel.certifications),
            ..Default::default()
        };

        let created = active.insert(conn).await.map_err(|e| match unique_violation(&e) {
            Some(message) if message.contains("badge_number") => ValidationError::DuplicateBadge(badge_number).into(),
            Some(_) => ValidationError::ProfileExists { user_id }.into(),
            None => InternalError::database("create_personnel", e),
        })?;

        tracing::info!(personnel_id = created.id, user_id, badge = %created.badge_number, "Personnel profile registered");

        Ok(created)
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        id: i32,
    ) -> Result<Option<security_personnel::Model>, InternalError> {
        security_personnel::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_personnel_by_id", e))
    }

    pub async fn find_by_badge(
        &self,
        conn: &impl ConnectionTrait,
        badge_number: &str,
    ) -> Result<Option<security_personnel::Model>, InternalError> {
        security_personnel::Entity::find()
            .filter(security_personnel::Column::BadgeNumber.eq(badge_number))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_personnel_by_badge", e))
    }

    /// Threats currently assigned to this officer, oldest first
    pub async fn assigned_threats(
        &self,
        conn: &impl ConnectionTrait,
        officer: &security_personnel::Model,
    ) -> Result<Vec<threat::Model>, InternalError> {
        officer
            .find_related(threat::Entity)
            .order_by_asc(threat::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_assigned_threats", e))
    }
}
