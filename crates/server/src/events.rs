//! Event and participation endpoints

use api_types::{
    Message,
    event::{
        EventCreated, EventDetail, EventFound, EventNew, EventView, InviteCode, JoinEvent, Joined,
        LeaveEvent, ParticipantView, ParticipationView, SwapColors, TeamColors, TeamDistribution,
    },
    user::UserView,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{Event, JoinEventCmd, NewEventCmd, Participant, Participation, PaymentMethod};

use crate::{ServerError, server::ServerState, users::user_view};

fn event_view(event: Event) -> EventView {
    let is_past = event.is_past(Utc::now());
    EventView {
        id: event.id,
        title: event.title,
        location: event.location,
        latitude: event.latitude,
        longitude: event.longitude,
        date: event.date,
        time: event.time,
        number_of_players: event.number_of_players,
        is_team_distribution_enabled: event.team_distribution.is_some(),
        team_distribution: event.team_distribution.map(|d| TeamDistribution {
            team_one: d.team_one,
            team_two: d.team_two,
        }),
        team_colors: event.team_colors.map(|c| TeamColors {
            team_one_color: c.team_one_color,
            team_two_color: c.team_two_color,
        }),
        price_minor: event.price_minor,
        invite_code: event.invite_code,
        status: event.status.as_str().to_string(),
        host_id: event.host_id,
        is_past,
    }
}

fn participation_view(participation: Participation) -> ParticipationView {
    ParticipationView {
        id: participation.id,
        event_id: participation.event_id,
        user_id: participation.user_id,
        paid: participation.paid,
        payment_method: participation.payment_method.map(|m| m.as_str().to_string()),
        team_color: participation.team_color,
    }
}

fn participant_view(participant: Participant) -> ParticipantView {
    ParticipantView {
        id: participant.user_id,
        first_name: participant.first_name,
        last_name: participant.last_name,
        paid: participant.paid,
        payment_method: participant.payment_method.map(|m| m.as_str().to_string()),
        team_color: participant.team_color,
    }
}

fn new_event_cmd(payload: EventNew) -> NewEventCmd {
    let mut cmd = NewEventCmd::new(
        payload.host_id,
        payload.title,
        payload.location,
        payload.date,
        payload.time,
        payload.number_of_players,
    )
    .price_minor(payload.price_minor);
    cmd.latitude = payload.latitude;
    cmd.longitude = payload.longitude;
    if payload.is_team_distribution_enabled {
        cmd.team_distribution = payload.team_distribution.map(|d| engine::TeamDistribution {
            team_one: d.team_one,
            team_two: d.team_two,
        });
        cmd.team_colors = payload.team_colors.map(|c| engine::TeamColors {
            team_one_color: c.team_one_color,
            team_two_color: c.team_two_color,
        });
    }
    cmd
}

pub async fn create_event(
    State(state): State<ServerState>,
    Json(payload): Json<EventNew>,
) -> Result<(StatusCode, Json<EventCreated>), ServerError> {
    let event = state.engine.create_event(new_event_cmd(payload)).await?;
    Ok((
        StatusCode::CREATED,
        Json(EventCreated {
            message: "Event created successfully".to_string(),
            event: event_view(event),
        }),
    ))
}

pub async fn validate_invite_code(
    State(state): State<ServerState>,
    Json(payload): Json<InviteCode>,
) -> Result<Json<EventFound>, ServerError> {
    let event = state.engine.validate_invite_code(&payload.invite_code).await?;
    Ok(Json(EventFound {
        event: event_view(event),
    }))
}

pub async fn join_event(
    State(state): State<ServerState>,
    Json(payload): Json<JoinEvent>,
) -> Result<(StatusCode, Json<Joined>), ServerError> {
    let payment_method = PaymentMethod::try_from(payload.payment_method.as_str())?;
    let participation = state
        .engine
        .join_event(JoinEventCmd::new(
            payload.event_id,
            payload.user_id,
            payment_method,
        ))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(Joined {
            message: "Joined event successfully".to_string(),
            participant: participation_view(participation),
        }),
    ))
}

pub async fn event_detail(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<EventDetail>, ServerError> {
    let detail = state.engine.event_with_participants(id).await?;
    Ok(Json(EventDetail {
        event: event_view(detail.event),
        participants: detail.participants.into_iter().map(participant_view).collect(),
    }))
}

pub async fn user_events(
    State(state): State<ServerState>,
    Path(user_id): Path<i32>,
) -> Result<Json<Vec<EventView>>, ServerError> {
    let events = state.engine.user_events(user_id).await?;
    Ok(Json(events.into_iter().map(event_view).collect()))
}

/// Profile of an event's host.
pub async fn user(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<UserView>, ServerError> {
    let user = state.engine.user(id).await?;
    Ok(Json(user_view(user)))
}

pub async fn swap_colors(
    State(state): State<ServerState>,
    Json(payload): Json<SwapColors>,
) -> Result<Json<Message>, ServerError> {
    state
        .engine
        .swap_participant_colors(
            payload.event_id,
            payload.participant1_id,
            payload.participant2_id,
        )
        .await?;
    Ok(Json(Message::new("Participant colors updated successfully")))
}

pub async fn cancel_event(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Message>, ServerError> {
    state.engine.cancel_event(id).await?;
    Ok(Json(Message::new("Event cancelled successfully")))
}

pub async fn leave_event(
    State(state): State<ServerState>,
    Json(payload): Json<LeaveEvent>,
) -> Result<Json<Message>, ServerError> {
    state
        .engine
        .leave_event(payload.event_id, payload.user_id)
        .await?;
    Ok(Json(Message::new("User has left the event successfully")))
}
