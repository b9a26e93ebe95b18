use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Iterable, Set};

use crate::errors::internal::ValidationError;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+$").expect("email pattern is valid"));

/// Role attached to every account. Stored as its canonical display string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum UserRole {
    #[sea_orm(string_value = "Administrator")]
    Administrator,
    #[sea_orm(string_value = "Security Supervisor")]
    SecuritySupervisor,
    #[sea_orm(string_value = "Security Officer")]
    SecurityOfficer,
    #[sea_orm(string_value = "Compliance Auditor")]
    ComplianceAuditor,
}

impl UserRole {
    pub const fn as_str(&self) -> &'static str {
        match self {
            UserRole::Administrator => "Administrator",
            UserRole::SecuritySupervisor => "Security Supervisor",
            UserRole::SecurityOfficer => "Security Officer",
            UserRole::ComplianceAuditor => "Compliance Auditor",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserRole::iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownRole(s.to_string()))
    }
}

#[derive(Clone, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub last_login: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

// Hand-written so the digest never reaches a log line.
impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .field("is_active", &self.is_active)
            .field("last_login", &self.last_login)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::security_personnel::Entity")]
    SecurityPersonnel,
    #[sea_orm(has_many = "super::threat::Entity")]
    ReportedThreats,
    #[sea_orm(has_many = "super::audit_log::Entity")]
    AuditLogs,
}

impl Related<super::security_personnel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SecurityPersonnel.def()
    }
}

impl Related<super::threat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReportedThreats.def()
    }
}

impl Related<super::audit_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AuditLogs.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    /// Stamps timestamps and normalizes the email on every write.
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now().timestamp();
        if insert && self.created_at.is_not_set() {
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);

        if let ActiveValue::Set(email) = &self.email {
            let normalized = normalize_email(email).map_err(|e| DbErr::Custom(e.to_string()))?;
            self.email = Set(normalized);
        }

        Ok(self)
    }
}

/// Validate an email against `local@domain.tld` and lower-case it
pub fn normalize_email(email: &str) -> Result<String, ValidationError> {
    if !EMAIL_PATTERN.is_match(email) {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }
    Ok(email.to_lowercase())
}
