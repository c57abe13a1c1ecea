//! Team allocation for joining guests.
//!
//! The decision is a pure function of the event and the current occupancy so
//! it can be re-evaluated under the event lock right before the insert. Team
//! one is always filled first; the fill order is deterministic.

use crate::{EngineError, Event, ResultEngine, TeamColors};

/// Seats already taken on an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Occupancy {
    pub team_one: u32,
    pub team_two: u32,
    pub total: u32,
}

impl Occupancy {
    /// Tally participations by team color label. Rows whose color matches
    /// neither label only count towards the total.
    pub fn tally<'a, I>(colors: Option<&TeamColors>, seated: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut occupancy = Self::default();
        for color in seated {
            occupancy.total += 1;
            let (Some(colors), Some(color)) = (colors, color) else {
                continue;
            };
            if color == colors.team_one_color {
                occupancy.team_one += 1;
            } else if color == colors.team_two_color {
                occupancy.team_two += 1;
            }
        }
        occupancy
    }
}

/// Where a joining guest sits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Seat {
    TeamOne(String),
    TeamTwo(String),
    /// Team distribution disabled: the guest joins without a color.
    Unassigned,
}

impl Seat {
    pub fn team_color(&self) -> Option<String> {
        match self {
            Self::TeamOne(color) | Self::TeamTwo(color) => Some(color.clone()),
            Self::Unassigned => None,
        }
    }
}

/// Pick a seat for one more guest, or fail with `CapacityExceeded`.
pub fn allocate(event: &Event, occupancy: Occupancy) -> ResultEngine<Seat> {
    let Some(distribution) = event.team_distribution else {
        if occupancy.total >= event.number_of_players {
            return Err(EngineError::CapacityExceeded(
                "event is already full".to_string(),
            ));
        }
        return Ok(Seat::Unassigned);
    };
    let colors = event.team_colors.as_ref().ok_or_else(|| {
        EngineError::ValidationFailed("team distribution requires team colors".to_string())
    })?;

    if occupancy.team_one < distribution.team_one {
        Ok(Seat::TeamOne(colors.team_one_color.clone()))
    } else if occupancy.team_two < distribution.team_two {
        Ok(Seat::TeamTwo(colors.team_two_color.clone()))
    } else {
        Err(EngineError::CapacityExceeded(
            "teams are already full".to_string(),
        ))
    }
}
