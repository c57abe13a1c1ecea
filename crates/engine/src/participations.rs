//! Participations (`event_users`): the join record linking a user to an event,
//! with payment state and the assigned team color.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Paid to the host in person; counts as paid on join.
    Direct,
    /// Paid through the payment processor.
    Card,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Card => "card",
        }
    }

    /// Whether joining with this method marks the participation as paid.
    pub fn settles_on_join(self) -> bool {
        matches!(self, Self::Direct)
    }
}

impl TryFrom<&str> for PaymentMethod {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "direct" => Ok(Self::Direct),
            "card" => Ok(Self::Card),
            other => Err(EngineError::ValidationFailed(format!(
                "invalid payment method: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participation {
    pub id: i32,
    pub event_id: i32,
    pub user_id: i32,
    pub paid: bool,
    pub payment_method: Option<PaymentMethod>,
    pub team_color: Option<String>,
    pub joined_at: DateTime<Utc>,
}

/// A participation joined with the participant's profile fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub paid: bool,
    pub payment_method: Option<PaymentMethod>,
    pub team_color: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "event_users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub event_id: i32,
    pub user_id: i32,
    pub paid: bool,
    pub payment_method: Option<String>,
    pub team_color: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::events::Entity",
        from = "Column::EventId",
        to = "super::events::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Events,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

fn parse_method(value: Option<String>) -> Result<Option<PaymentMethod>, EngineError> {
    value
        .as_deref()
        .map(PaymentMethod::try_from)
        .transpose()
}

impl TryFrom<Model> for Participation {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            event_id: model.event_id,
            user_id: model.user_id,
            paid: model.paid,
            payment_method: parse_method(model.payment_method)?,
            team_color: model.team_color,
            joined_at: model.created_at,
        })
    }
}

impl TryFrom<(Model, super::users::Model)> for Participant {
    type Error = EngineError;

    fn try_from((row, user): (Model, super::users::Model)) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            paid: row.paid,
            payment_method: parse_method(row.payment_method)?,
            team_color: row.team_color,
        })
    }
}
