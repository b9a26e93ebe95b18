use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "security_checkpoints")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub location: String,
    pub is_active: bool,
    pub last_inspection: Option<i64>,
    pub required_clearance: i32,
    /// JSON array of equipment names
    #[sea_orm(column_type = "Text", nullable)]
    pub equipment: Option<String>,
}

impl Model {
    pub fn equipment_list(&self) -> Result<Vec<String>, serde_json::Error> {
        super::decode_list(self.equipment.as_deref())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
