//! `events`: pick-up games created by a host.
//!
//! Team distribution is stored flat: `team_one_size`/`team_two_size` are set
//! only when distribution is enabled, the two color labels whenever the host
//! picked colors. `invite_code` is nullable and unique when present; the
//! sweeper nulls it once the event is cancelled or over.

use sea_orm_migration::prelude::*;

use crate::m20240509_163351_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub(crate) enum Events {
    Table,
    Id,
    Title,
    Location,
    Latitude,
    Longitude,
    Date,
    Time,
    NumberOfPlayers,
    TeamOneSize,
    TeamTwoSize,
    TeamOneColor,
    TeamTwoColor,
    PriceMinor,
    InviteCode,
    Status,
    HostId,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Events::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Events::Title).string().not_null())
                    .col(ColumnDef::new(Events::Location).string().not_null())
                    .col(ColumnDef::new(Events::Latitude).double())
                    .col(ColumnDef::new(Events::Longitude).double())
                    .col(ColumnDef::new(Events::Date).date().not_null())
                    .col(ColumnDef::new(Events::Time).time().not_null())
                    .col(ColumnDef::new(Events::NumberOfPlayers).integer().not_null())
                    .col(ColumnDef::new(Events::TeamOneSize).integer())
                    .col(ColumnDef::new(Events::TeamTwoSize).integer())
                    .col(ColumnDef::new(Events::TeamOneColor).string())
                    .col(ColumnDef::new(Events::TeamTwoColor).string())
                    .col(
                        ColumnDef::new(Events::PriceMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Events::InviteCode).string().unique_key())
                    .col(
                        ColumnDef::new(Events::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Events::HostId).integer().not_null())
                    .col(ColumnDef::new(Events::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Events::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-events-host_id")
                            .from(Events::Table, Events::HostId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-events-host_id")
                    .table(Events::Table)
                    .col(Events::HostId)
                    .to_owned(),
            )
            .await?;

        // Sweeper scans by status/date.
        manager
            .create_index(
                Index::create()
                    .name("idx-events-status-date")
                    .table(Events::Table)
                    .col(Events::Status)
                    .col(Events::Date)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await
    }
}
