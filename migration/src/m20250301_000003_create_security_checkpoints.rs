use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SecurityCheckpoints::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SecurityCheckpoints::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SecurityCheckpoints::Name).string_len(50).not_null())
                    .col(ColumnDef::new(SecurityCheckpoints::Location).string_len(100).not_null())
                    .col(ColumnDef::new(SecurityCheckpoints::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(SecurityCheckpoints::LastInspection).big_integer().null())
                    .col(ColumnDef::new(SecurityCheckpoints::RequiredClearance).integer().not_null().default(1))
                    .col(ColumnDef::new(SecurityCheckpoints::Equipment).text().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SecurityCheckpoints::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SecurityCheckpoints {
    Table,
    Id,
    Name,
    Location,
    IsActive,
    LastInspection,
    RequiredClearance,
    Equipment,
}
