//! Command structs for engine operations.
//!
//! Write operations with more than a couple of inputs take one of these
//! instead of a long argument list. Validation lives next to the data so the
//! route layer and tests exercise the same rules.

use chrono::{NaiveDate, NaiveTime};

use crate::{EngineError, PaymentMethod, ResultEngine, TeamColors, TeamDistribution};

fn required(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::ValidationFailed(format!("{label} is required")));
    }
    Ok(trimmed.to_string())
}

/// Register a new user. `password_hash` is produced by the caller.
#[derive(Clone, Debug)]
pub struct NewUserCmd {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

impl NewUserCmd {
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }

    pub(crate) fn normalized(self) -> ResultEngine<Self> {
        let email = required(&self.email, "email")?.to_lowercase();
        if !email.contains('@') {
            return Err(EngineError::ValidationFailed(
                "email is malformed".to_string(),
            ));
        }
        if self.password_hash.is_empty() {
            return Err(EngineError::ValidationFailed(
                "password is required".to_string(),
            ));
        }
        Ok(Self {
            first_name: required(&self.first_name, "first name")?,
            last_name: required(&self.last_name, "last name")?,
            email,
            password_hash: self.password_hash,
        })
    }
}

/// Create an event hosted by `host_id`.
#[derive(Clone, Debug)]
pub struct NewEventCmd {
    pub host_id: i32,
    pub title: String,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub number_of_players: u32,
    pub price_minor: i64,
    /// `Some` enables team distribution.
    pub team_distribution: Option<TeamDistribution>,
    pub team_colors: Option<TeamColors>,
}

impl NewEventCmd {
    #[must_use]
    pub fn new(
        host_id: i32,
        title: impl Into<String>,
        location: impl Into<String>,
        date: NaiveDate,
        time: NaiveTime,
        number_of_players: u32,
    ) -> Self {
        Self {
            host_id,
            title: title.into(),
            location: location.into(),
            latitude: None,
            longitude: None,
            date,
            time,
            number_of_players,
            price_minor: 0,
            team_distribution: None,
            team_colors: None,
        }
    }

    #[must_use]
    pub fn coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    #[must_use]
    pub fn price_minor(mut self, price_minor: i64) -> Self {
        self.price_minor = price_minor;
        self
    }

    #[must_use]
    pub fn teams(
        mut self,
        team_one: u32,
        team_two: u32,
        team_one_color: impl Into<String>,
        team_two_color: impl Into<String>,
    ) -> Self {
        self.team_distribution = Some(TeamDistribution { team_one, team_two });
        self.team_colors = Some(TeamColors {
            team_one_color: team_one_color.into(),
            team_two_color: team_two_color.into(),
        });
        self
    }

    /// Check every field and return a trimmed copy.
    pub(crate) fn normalized(self) -> ResultEngine<Self> {
        let title = required(&self.title, "title")?;
        let location = required(&self.location, "location")?;

        if self.number_of_players == 0 {
            return Err(EngineError::ValidationFailed(
                "number of players must be positive".to_string(),
            ));
        }
        // Stored as a signed integer column.
        if i32::try_from(self.number_of_players).is_err() {
            return Err(EngineError::ValidationFailed(
                "number of players is too large".to_string(),
            ));
        }
        if self.price_minor < 0 {
            return Err(EngineError::ValidationFailed(
                "price must not be negative".to_string(),
            ));
        }

        match (self.latitude, self.longitude) {
            (None, None) => {}
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                    return Err(EngineError::ValidationFailed(
                        "coordinates out of range".to_string(),
                    ));
                }
            }
            _ => {
                return Err(EngineError::ValidationFailed(
                    "latitude and longitude go together".to_string(),
                ));
            }
        }

        let team_colors = match (self.team_distribution, self.team_colors) {
            (None, None) => None,
            (None, Some(_)) => {
                return Err(EngineError::ValidationFailed(
                    "team colors require team distribution".to_string(),
                ));
            }
            (Some(_), None) => {
                return Err(EngineError::ValidationFailed(
                    "team distribution requires team colors".to_string(),
                ));
            }
            (Some(distribution), Some(colors)) => {
                let team_one_color = required(&colors.team_one_color, "team one color")?;
                let team_two_color = required(&colors.team_two_color, "team two color")?;
                if team_one_color == team_two_color {
                    return Err(EngineError::ValidationFailed(
                        "team colors must differ".to_string(),
                    ));
                }
                if distribution.team_one == 0 || distribution.team_two == 0 {
                    return Err(EngineError::ValidationFailed(
                        "team sizes must be positive".to_string(),
                    ));
                }
                let seats = distribution
                    .team_one
                    .checked_add(distribution.team_two)
                    .ok_or_else(|| {
                        EngineError::ValidationFailed(
                            "team sizes exceed number of players".to_string(),
                        )
                    })?;
                if seats > self.number_of_players {
                    return Err(EngineError::ValidationFailed(
                        "team sizes exceed number of players".to_string(),
                    ));
                }
                Some(TeamColors {
                    team_one_color,
                    team_two_color,
                })
            }
        };

        Ok(Self {
            title,
            location,
            team_colors,
            ..self
        })
    }
}

/// Join an event as a guest.
#[derive(Clone, Debug)]
pub struct JoinEventCmd {
    pub event_id: i32,
    pub user_id: i32,
    pub payment_method: PaymentMethod,
}

impl JoinEventCmd {
    #[must_use]
    pub fn new(event_id: i32, user_id: i32, payment_method: PaymentMethod) -> Self {
        Self {
            event_id,
            user_id,
            payment_method,
        }
    }
}
