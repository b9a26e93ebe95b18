use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::Set;

/// Security profile extending a user 1:1
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "security_personnel")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: i32,
    #[sea_orm(unique)]
    pub badge_number: String,
    pub first_name: String,
    pub last_name: String,
    pub clearance_level: i32,
    pub department: Option<String>,
    pub hire_date: i64,
    pub is_armed: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub certifications: Option<String>,
}

impl Model {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::threat::Entity")]
    AssignedThreats,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::threat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssignedThreats.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert && self.hire_date.is_not_set() {
            self.hire_date = Set(Utc::now().timestamp());
        }
        Ok(self)
    }
}
