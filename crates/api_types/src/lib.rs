//! JSON bodies of the HTTP API.
//!
//! Field names are camelCase on the wire, as the mobile client expects.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Plain `{ "message": ... }` answer, used for errors too.
#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CreateAccount {
        pub first_name: String,
        pub last_name: String,
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        pub email: String,
        pub password: String,
    }

    /// `null` or an empty string clears the address.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PushToken {
        pub push_token: Option<String>,
    }

    /// Public profile; never carries the credential hash.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserView {
        pub id: i32,
        pub first_name: String,
        pub last_name: String,
        pub email: String,
        pub push_token: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoggedIn {
        pub message: String,
        pub user: UserView,
    }
}

pub mod event {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TeamDistribution {
        pub team_one: u32,
        pub team_two: u32,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TeamColors {
        pub team_one_color: String,
        pub team_two_color: String,
    }

    /// Request body for `POST /events/create-event`.
    ///
    /// `teamDistribution` and `teamColors` are only read when
    /// `isTeamDistributionEnabled` is true.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct EventNew {
        pub title: String,
        pub location: String,
        pub date: NaiveDate,
        pub time: NaiveTime,
        pub number_of_players: u32,
        #[serde(default)]
        pub is_team_distribution_enabled: bool,
        pub team_distribution: Option<TeamDistribution>,
        pub team_colors: Option<TeamColors>,
        /// Price in cents.
        #[serde(default)]
        pub price_minor: i64,
        pub host_id: i32,
        pub latitude: Option<f64>,
        pub longitude: Option<f64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct EventView {
        pub id: i32,
        pub title: String,
        pub location: String,
        pub latitude: Option<f64>,
        pub longitude: Option<f64>,
        pub date: NaiveDate,
        pub time: NaiveTime,
        pub number_of_players: u32,
        pub is_team_distribution_enabled: bool,
        pub team_distribution: Option<TeamDistribution>,
        pub team_colors: Option<TeamColors>,
        pub price_minor: i64,
        pub invite_code: Option<String>,
        /// `active` or `cancelled`.
        pub status: String,
        pub host_id: i32,
        pub is_past: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EventCreated {
        pub message: String,
        pub event: EventView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EventFound {
        pub event: EventView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct InviteCode {
        pub invite_code: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct JoinEvent {
        pub event_id: i32,
        pub user_id: i32,
        /// `direct` or `card`.
        pub payment_method: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ParticipationView {
        pub id: i32,
        pub event_id: i32,
        pub user_id: i32,
        pub paid: bool,
        pub payment_method: Option<String>,
        pub team_color: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Joined {
        pub message: String,
        pub participant: ParticipationView,
    }

    /// A participant with profile fields; `id` is the user id.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ParticipantView {
        pub id: i32,
        pub first_name: String,
        pub last_name: String,
        pub paid: bool,
        pub payment_method: Option<String>,
        pub team_color: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EventDetail {
        pub event: EventView,
        pub participants: Vec<ParticipantView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SwapColors {
        pub event_id: i32,
        pub participant1_id: i32,
        pub participant2_id: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LeaveEvent {
        pub event_id: i32,
        pub user_id: i32,
    }
}

pub mod payment {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PaymentSheetRequest {
        pub event_id: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PaymentSheetResponse {
        pub payment_intent: String,
        pub customer: String,
    }
}
