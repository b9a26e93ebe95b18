use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{Iterable, Set};

use crate::errors::internal::ValidationError;

/// Status given to every freshly filed report
pub const STATUS_REPORTED: &str = "Reported";
pub const STATUS_RESOLVED: &str = "Resolved";
pub const STATUS_MAX_LEN: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ThreatLevel {
    #[sea_orm(string_value = "Low")]
    Low,
    #[sea_orm(string_value = "Medium")]
    Medium,
    #[sea_orm(string_value = "High")]
    High,
    #[sea_orm(string_value = "Critical")]
    Critical,
}

impl ThreatLevel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ThreatLevel::Low => "Low",
            ThreatLevel::Medium => "Medium",
            ThreatLevel::High => "High",
            ThreatLevel::Critical => "Critical",
        }
    }
}

impl fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThreatLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ThreatLevel::iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownThreatLevel(s.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "threats")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub reporter_id: Option<i32>,
    pub assigned_officer_id: Option<i32>,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub location: String,
    pub threat_level: ThreatLevel,
    pub status: String,
    pub is_confirmed: bool,
    pub reported_at: i64,
    pub resolved_at: Option<i64>,
    /// JSON array of file paths
    #[sea_orm(column_type = "Text", nullable)]
    pub evidence_photos: Option<String>,
}

impl Model {
    pub fn evidence_photo_paths(&self) -> Result<Vec<String>, serde_json::Error> {
        super::decode_list(self.evidence_photos.as_deref())
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved_at.is_some()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReporterId",
        to = "super::user::Column::Id"
    )]
    Reporter,
    #[sea_orm(
        belongs_to = "super::security_personnel::Entity",
        from = "Column::AssignedOfficerId",
        to = "super::security_personnel::Column::Id"
    )]
    AssignedOfficer,
    #[sea_orm(has_many = "super::audit_log::Entity")]
    AuditLogs,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reporter.def()
    }
}

impl Related<super::security_personnel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssignedOfficer.def()
    }
}

impl Related<super::audit_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AuditLogs.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert {
            if self.reported_at.is_not_set() {
                self.reported_at = Set(Utc::now().timestamp());
            }
            if self.status.is_not_set() {
                self.status = Set(STATUS_REPORTED.to_string());
            }
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threat_level_parse_accepts_canonical_values_only() {
        assert_eq!("Critical".parse::<ThreatLevel>().unwrap(), ThreatLevel::Critical);
        assert!(matches!(
            "Severe".parse::<ThreatLevel>(),
            Err(ValidationError::UnknownThreatLevel(_))
        ));
    }

    #[test]
    fn test_every_level_round_trips_through_its_name() {
        for level in ThreatLevel::iter() {
            assert_eq!(level.to_string().parse::<ThreatLevel>().unwrap(), level);
        }
    }
}
