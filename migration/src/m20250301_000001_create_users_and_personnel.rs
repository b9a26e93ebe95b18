use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Users::Username).string_len(50).not_null().unique_key())
                    .col(ColumnDef::new(Users::Email).string_len(120).not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string_len(128).not_null())
                    .col(ColumnDef::new(Users::Role).string_len(32).not_null())
                    .col(ColumnDef::new(Users::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SecurityPersonnel::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SecurityPersonnel::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SecurityPersonnel::UserId).integer().not_null().unique_key())
                    .col(ColumnDef::new(SecurityPersonnel::BadgeNumber).string_len(20).not_null().unique_key())
                    .col(ColumnDef::new(SecurityPersonnel::FirstName).string_len(50).not_null())
                    .col(ColumnDef::new(SecurityPersonnel::LastName).string_len(50).not_null())
                    .col(ColumnDef::new(SecurityPersonnel::ClearanceLevel).integer().not_null().default(1))
                    .col(ColumnDef::new(SecurityPersonnel::Department).string_len(50).null())
                    .col(ColumnDef::new(SecurityPersonnel::HireDate).big_integer().not_null())
                    .col(ColumnDef::new(SecurityPersonnel::IsArmed).boolean().not_null().default(false))
                    .col(ColumnDef::new(SecurityPersonnel::Certifications).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_security_personnel_user_id")
                            .from(SecurityPersonnel::Table, SecurityPersonnel::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SecurityPersonnel::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Role,
    IsActive,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum SecurityPersonnel {
    Table,
    Id,
    UserId,
    BadgeNumber,
    FirstName,
    LastName,
    ClearanceLevel,
    Department,
    HireDate,
    IsArmed,
    Certifications,
}
