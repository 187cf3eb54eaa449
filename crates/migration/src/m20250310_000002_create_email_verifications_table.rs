use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250310_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EmailVerifications::Table)
                    .if_not_exists()
                    .col(uuid(EmailVerifications::Id).primary_key())
                    .col(uuid(EmailVerifications::Code).unique_key())
                    .col(uuid(EmailVerifications::UserId))
                    .col(
                        timestamp_with_time_zone(EmailVerifications::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone(EmailVerifications::Expiration))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_email_verifications_user")
                            .from(EmailVerifications::Table, EmailVerifications::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Issuance scans "newest unexpired record per user"
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_email_verifications_user_expiration")
                    .table(EmailVerifications::Table)
                    .col(EmailVerifications::UserId)
                    .col(EmailVerifications::Expiration)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EmailVerifications::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum EmailVerifications {
    Table,
    Id,
    Code,
    UserId,
    CreatedAt,
    Expiration,
}
