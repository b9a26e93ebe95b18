use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_users_and_personnel::{SecurityPersonnel, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Threats::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Threats::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Threats::ReporterId).integer().null())
                    .col(ColumnDef::new(Threats::AssignedOfficerId).integer().null())
                    .col(ColumnDef::new(Threats::Title).string_len(100).not_null())
                    .col(ColumnDef::new(Threats::Description).text().not_null())
                    .col(ColumnDef::new(Threats::Location).string_len(100).not_null())
                    .col(ColumnDef::new(Threats::ThreatLevel).string_len(16).not_null())
                    .col(ColumnDef::new(Threats::Status).string_len(30).not_null().default("Reported"))
                    .col(ColumnDef::new(Threats::IsConfirmed).boolean().not_null().default(false))
                    .col(ColumnDef::new(Threats::ReportedAt).big_integer().not_null())
                    .col(ColumnDef::new(Threats::ResolvedAt).big_integer().null())
                    .col(ColumnDef::new(Threats::EvidencePhotos).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_threats_reporter_id")
                            .from(Threats::Table, Threats::ReporterId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_threats_assigned_officer_id")
                            .from(Threats::Table, Threats::AssignedOfficerId)
                            .to(SecurityPersonnel::Table, SecurityPersonnel::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_threats_status")
                    .table(Threats::Table)
                    .col(Threats::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AuditLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AuditLogs::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(AuditLogs::ThreatId).integer().null())
                    .col(ColumnDef::new(AuditLogs::UserId).integer().null())
                    .col(ColumnDef::new(AuditLogs::Action).string_len(50).not_null())
                    .col(ColumnDef::new(AuditLogs::Details).text().null())
                    .col(ColumnDef::new(AuditLogs::IpAddress).string_len(45).null())
                    .col(ColumnDef::new(AuditLogs::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_audit_logs_threat_id")
                            .from(AuditLogs::Table, AuditLogs::ThreatId)
                            .to(Threats::Table, Threats::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_audit_logs_user_id")
                            .from(AuditLogs::Table, AuditLogs::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_audit_logs_threat_id")
                    .table(AuditLogs::Table)
                    .col(AuditLogs::ThreatId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Threats::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Threats {
    Table,
    Id,
    ReporterId,
    AssignedOfficerId,
    Title,
    Description,
    Location,
    ThreatLevel,
    Status,
    IsConfirmed,
    ReportedAt,
    ResolvedAt,
    EvidencePhotos,
}

#[derive(DeriveIden)]
enum AuditLogs {
    Table,
    Id,
    ThreatId,
    UserId,
    Action,
    Details,
    IpAddress,
    CreatedAt,
}
