//! Events: a pick-up game a host organizes and guests join.
//!
//! Status is stored; "past" is derived from the start date/time and never
//! persisted. Team distribution is optional: when enabled, guests are seated
//! on team one until it is full, then on team two.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Active,
    Cancelled,
}

impl EventStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<&str> for EventStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "active" => Ok(Self::Active),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(EngineError::ValidationFailed(format!(
                "invalid event status: {other}"
            ))),
        }
    }
}

/// Seats per team when team distribution is enabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamDistribution {
    pub team_one: u32,
    pub team_two: u32,
}

/// Labels (shirt colors) identifying the two teams.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamColors {
    pub team_one_color: String,
    pub team_two_color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i32,
    pub title: String,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub number_of_players: u32,
    /// `None` when team distribution is disabled.
    pub team_distribution: Option<TeamDistribution>,
    pub team_colors: Option<TeamColors>,
    pub price_minor: i64,
    pub invite_code: Option<String>,
    pub status: EventStatus,
    pub host_id: i32,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Start of the event. Dates and times are interpreted as UTC.
    pub fn starts_at(&self) -> DateTime<Utc> {
        NaiveDateTime::new(self.date, self.time).and_utc()
    }

    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        self.starts_at() < now
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == EventStatus::Cancelled
    }

    /// Color the host wears: team one's label, when colors were picked.
    pub fn host_color(&self) -> Option<String> {
        self.team_colors
            .as_ref()
            .map(|colors| colors.team_one_color.clone())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub date: Date,
    pub time: Time,
    pub number_of_players: i32,
    pub team_one_size: Option<i32>,
    pub team_two_size: Option<i32>,
    pub team_one_color: Option<String>,
    pub team_two_color: Option<String>,
    pub price_minor: i64,
    #[sea_orm(unique)]
    pub invite_code: Option<String>,
    pub status: String,
    pub host_id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::HostId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Host,
    #[sea_orm(has_many = "super::participations::Entity")]
    Participations,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Host.def()
    }
}

impl Related<super::participations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

fn to_count(value: i32, label: &str) -> ResultEngine<u32> {
    u32::try_from(value)
        .map_err(|_| EngineError::ValidationFailed(format!("stored {label} is negative")))
}

fn to_column(value: u32, label: &str) -> ResultEngine<i32> {
    i32::try_from(value)
        .map_err(|_| EngineError::ValidationFailed(format!("{label} is too large")))
}

impl TryFrom<Model> for Event {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let team_distribution = match (model.team_one_size, model.team_two_size) {
            (Some(one), Some(two)) => Some(TeamDistribution {
                team_one: to_count(one, "team one size")?,
                team_two: to_count(two, "team two size")?,
            }),
            _ => None,
        };
        let team_colors = match (model.team_one_color, model.team_two_color) {
            (Some(team_one_color), Some(team_two_color)) => Some(TeamColors {
                team_one_color,
                team_two_color,
            }),
            _ => None,
        };

        Ok(Self {
            id: model.id,
            title: model.title,
            location: model.location,
            latitude: model.latitude,
            longitude: model.longitude,
            date: model.date,
            time: model.time,
            number_of_players: to_count(model.number_of_players, "number of players")?,
            team_distribution,
            team_colors,
            price_minor: model.price_minor,
            invite_code: model.invite_code,
            status: EventStatus::try_from(model.status.as_str())?,
            host_id: model.host_id,
            created_at: model.created_at,
        })
    }
}

impl TryFrom<&Event> for ActiveModel {
    type Error = EngineError;

    /// Builds an insertable row; the id is left to the database.
    fn try_from(event: &Event) -> Result<Self, Self::Error> {
        let (team_one_size, team_two_size) = match event.team_distribution {
            Some(d) => (
                Some(to_column(d.team_one, "team one size")?),
                Some(to_column(d.team_two, "team two size")?),
            ),
            None => (None, None),
        };
        let colors = event.team_colors.as_ref();
        Ok(Self {
            id: ActiveValue::NotSet,
            title: ActiveValue::Set(event.title.clone()),
            location: ActiveValue::Set(event.location.clone()),
            latitude: ActiveValue::Set(event.latitude),
            longitude: ActiveValue::Set(event.longitude),
            date: ActiveValue::Set(event.date),
            time: ActiveValue::Set(event.time),
            number_of_players: ActiveValue::Set(to_column(
                event.number_of_players,
                "number of players",
            )?),
            team_one_size: ActiveValue::Set(team_one_size),
            team_two_size: ActiveValue::Set(team_two_size),
            team_one_color: ActiveValue::Set(colors.map(|c| c.team_one_color.clone())),
            team_two_color: ActiveValue::Set(colors.map(|c| c.team_two_color.clone())),
            price_minor: ActiveValue::Set(event.price_minor),
            invite_code: ActiveValue::Set(event.invite_code.clone()),
            status: ActiveValue::Set(event.status.as_str().to_string()),
            host_id: ActiveValue::Set(event.host_id),
            created_at: ActiveValue::Set(event.created_at),
            updated_at: ActiveValue::Set(event.created_at),
        })
    }
}
