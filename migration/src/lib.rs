pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users_and_personnel;
mod m20250301_000002_create_threats_and_audit_logs;
mod m20250301_000003_create_security_checkpoints;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users_and_personnel::Migration),
            Box::new(m20250301_000002_create_threats_and_audit_logs::Migration),
            Box::new(m20250301_000003_create_security_checkpoints::Migration),
        ]
    }
}
