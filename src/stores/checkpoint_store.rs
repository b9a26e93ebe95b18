use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::errors::InternalError;
use crate::errors::internal::ValidationError;
use crate::types::db::{encode_list, security_checkpoint};

const NAME_MAX_LEN: usize = 50;
const LOCATION_MAX_LEN: usize = 100;

#[derive(Debug, Clone)]
pub struct NewCheckpoint {
    pub name: String,
    pub location: String,
    pub required_clearance: i32,
    pub equipment: Vec<String>,
}

/// Repository for `security_checkpoints` rows
#[derive(Debug, Default)]
pub struct CheckpointStore;

impl CheckpointStore {
    pub fn new() -> Self {
        Self
    }

    pub async fn create(
        &self,
        conn: &impl ConnectionTrait,
        new_checkpoint: NewCheckpoint,
    ) -> Result<security_checkpoint::Model, InternalError> {
        ValidationError::check_text("name", &new_checkpoint.name, NAME_MAX_LEN)?;
        ValidationError::check_text("location", &new_checkpoint.location, LOCATION_MAX_LEN)?;

        let active = security_checkpoint::ActiveModel {
            name: Set(new_checkpoint.name),
            location: Set(new_checkpoint.location),
            is_active: Set(true),
            last_inspection: Set(None),
            required_clearance: Set(new_checkpoint.required_clearance),
            equipment: Set(encode_list(&new_checkpoint.equipment)?),
            ..Default::default()
        };

        active
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("create_checkpoint", e))
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        id: i32,
    ) -> Result<Option<security_checkpoint::Model>, InternalError> {
        security_checkpoint::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_checkpoint_by_id", e))
    }

    pub async fn record_inspection(
        &self,
        conn: &impl ConnectionTrait,
        checkpoint: security_checkpoint::Model,
        at: i64,
    ) -> Result<security_checkpoint::Model, InternalError> {
        let mut active: security_checkpoint::ActiveModel = checkpoint.into();
        active.last_inspection = Set(Some(at));
        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("record_inspection", e))
    }

    pub async fn set_active(
        &self,
        conn: &impl ConnectionTrait,
        checkpoint: security_checkpoint::Model,
        is_active: bool,
    ) -> Result<security_checkpoint::Model, InternalError> {
        let mut active: security_checkpoint::ActiveModel = checkpoint.into();
        active.is_active = Set(is_active);
        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("set_checkpoint_active", e))
    }

    pub async fn list_active(
        &self,
        conn: &impl ConnectionTrait,
    ) -> Result<Vec<security_checkpoint::Model>, InternalError> {
        security_checkpoint::Entity::find()
            .filter(security_checkpoint::Column::IsActive.eq(true))
            .order_by_asc(security_checkpoint::Column::Name)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_active_checkpoints", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::setup_test_db;

    fn checkpoint(name: &str) -> NewCheckpoint {
        NewCheckpoint {
            name: name.to_string(),
            location: "North perimeter".to_string(),
            required_clearance: 2,
            equipment: vec!["x-ray".to_string(), "wand".to_string()],
        }
    }

    #[tokio::test]
    async fn test_create_and_inspect() {
        let db = setup_test_db().await;
        let store = CheckpointStore::new();

        let created = store.create(&db, checkpoint("North Gate")).await.unwrap();
        assert!(created.is_active);
        assert_eq!(created.last_inspection, None);
        assert_eq!(created.equipment_list().unwrap(), vec!["x-ray", "wand"]);

        let inspected = store.record_inspection(&db, created, 1_700_000_000).await.unwrap();
        assert_eq!(inspected.last_inspection, Some(1_700_000_000));
    }

    #[tokio::test]
    async fn test_list_active_skips_disabled() {
        let db = setup_test_db().await;
        let store = CheckpointStore::new();
        let north = store.create(&db, checkpoint("North Gate")).await.unwrap();
        let south = store.create(&db, checkpoint("South Gate")).await.unwrap();
        store.set_active(&db, north, false).await.unwrap();

        let active: Vec<i32> = store.list_active(&db).await.unwrap().into_iter().map(|c| c.id).collect();

        assert_eq!(active, vec![south.id]);
    }
}
