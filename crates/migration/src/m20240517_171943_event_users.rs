//! `event_users`: one row per (event, user) participation.

use sea_orm_migration::prelude::*;

use crate::{m20240509_163351_users::Users, m20240517_171303_events::Events};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum EventUsers {
    Table,
    Id,
    EventId,
    UserId,
    Paid,
    PaymentMethod,
    TeamColor,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EventUsers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EventUsers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EventUsers::EventId).integer().not_null())
                    .col(ColumnDef::new(EventUsers::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(EventUsers::Paid)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(EventUsers::PaymentMethod).string())
                    .col(ColumnDef::new(EventUsers::TeamColor).string())
                    .col(ColumnDef::new(EventUsers::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(EventUsers::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-event_users-event_id")
                            .from(EventUsers::Table, EventUsers::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-event_users-user_id")
                            .from(EventUsers::Table, EventUsers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-event_users-event_id-user_id-unique")
                    .table(EventUsers::Table)
                    .col(EventUsers::EventId)
                    .col(EventUsers::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-event_users-user_id")
                    .table(EventUsers::Table)
                    .col(EventUsers::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventUsers::Table).to_owned())
            .await
    }
}
