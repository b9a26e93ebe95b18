use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::Set;

/// Append-only record of an action taken on a threat
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub threat_id: Option<i32>,
    pub user_id: Option<i32>,
    pub action: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub details: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::threat::Entity",
        from = "Column::ThreatId",
        to = "super::threat::Column::Id"
    )]
    Threat,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::threat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Threat.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if !insert {
            return Err(DbErr::Custom("audit log entries are immutable".to_string()));
        }
        if self.created_at.is_not_set() {
            self.created_at = Set(Utc::now().timestamp());
        }
        Ok(self)
    }
}
