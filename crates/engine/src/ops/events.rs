use chrono::Utc;
use sea_orm::{
    ActiveValue, JoinType, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
};
use serde::Serialize;

use crate::{
    EngineError, Event, EventStatus, NewEventCmd, Notification, Participant, PaymentMethod,
    PaymentSheet, ResultEngine, error::is_unique_violation, events, invite_codes, participations,
    users,
};

use super::{Engine, with_tx};

/// An event with its participants in join order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EventDetail {
    pub event: Event,
    pub participants: Vec<Participant>,
}

impl Engine {
    /// Create an event and seat its host, under a freshly drawn invite code.
    ///
    /// The code is checked against existing events before the insert, and a
    /// unique-index violation on insert triggers a new draw. After a handful
    /// of collisions the call fails with a dependency error.
    pub async fn create_event(&self, cmd: NewEventCmd) -> ResultEngine<Event> {
        let cmd = cmd.normalized()?;
        self.require_user(&self.database, cmd.host_id).await?;

        for attempt in 1..=invite_codes::MAX_CODE_ATTEMPTS {
            let code = invite_codes::generate();
            match self.insert_event(&cmd, code).await {
                Ok(Some(event)) => {
                    tracing::info!(event_id = event.id, host_id = event.host_id, "event created");
                    return Ok(event);
                }
                Ok(None) => {
                    tracing::debug!(attempt, "invite code already in use; drawing again");
                }
                Err(EngineError::Database(err)) if is_unique_violation(&err) => {
                    tracing::debug!(attempt, "invite code collided on insert; drawing again");
                }
                Err(err) => return Err(err),
            }
        }

        Err(EngineError::Dependency(
            "could not allocate a unique invite code".to_string(),
        ))
    }

    /// One attempt: `None` when the code is already held by another event.
    async fn insert_event(&self, cmd: &NewEventCmd, code: String) -> ResultEngine<Option<Event>> {
        with_tx!(self, |db_tx| {
            let taken = events::Entity::find()
                .filter(events::Column::InviteCode.eq(code.as_str()))
                .one(&db_tx)
                .await?
                .is_some();
            if taken {
                return Ok(None);
            }

            let now = Utc::now();
            let draft = Event {
                id: 0,
                title: cmd.title.clone(),
                location: cmd.location.clone(),
                latitude: cmd.latitude,
                longitude: cmd.longitude,
                date: cmd.date,
                time: cmd.time,
                number_of_players: cmd.number_of_players,
                team_distribution: cmd.team_distribution,
                team_colors: cmd.team_colors.clone(),
                price_minor: cmd.price_minor,
                invite_code: Some(code),
                status: EventStatus::Active,
                host_id: cmd.host_id,
                created_at: now,
            };
            let active = events::ActiveModel::try_from(&draft)?;
            let model = active.insert(&db_tx).await?;

            let host_seat = participations::ActiveModel {
                id: ActiveValue::NotSet,
                event_id: ActiveValue::Set(model.id),
                user_id: ActiveValue::Set(cmd.host_id),
                paid: ActiveValue::Set(true),
                payment_method: ActiveValue::Set(Some(PaymentMethod::Direct.as_str().to_string())),
                team_color: ActiveValue::Set(draft.host_color()),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            };
            host_seat.insert(&db_tx).await?;

            Event::try_from(model).map(Some)
        })
    }

    /// Resolve an invite code to its event.
    ///
    /// Unknown, cleared, cancelled and past codes all answer `NotFound`.
    pub async fn validate_invite_code(&self, raw: &str) -> ResultEngine<Event> {
        let code = invite_codes::normalize(raw)?;
        let model = events::Entity::find()
            .filter(events::Column::InviteCode.eq(code))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::NotFound("invite code".to_string()))?;
        let event = Event::try_from(model)?;
        if event.is_cancelled() || event.is_past(Utc::now()) {
            return Err(EngineError::NotFound("invite code".to_string()));
        }
        Ok(event)
    }

    /// Null the event's invite code. Returns whether anything changed.
    pub async fn clear_invite_code(&self, event_id: i32) -> ResultEngine<bool> {
        let model = events::Entity::find_by_id(event_id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::NotFound("event".to_string()))?;
        if model.invite_code.is_none() {
            return Ok(false);
        }
        let mut active: events::ActiveModel = model.into();
        active.invite_code = ActiveValue::Set(None);
        active.updated_at = ActiveValue::Set(Utc::now());
        active.update(&self.database).await?;
        tracing::debug!(event_id, "invite code cleared");
        Ok(true)
    }

    /// Move an event to `cancelled`. Cancelling twice is a no-op.
    ///
    /// Participants with a notification address are told once, after commit.
    /// The invite code stays until the next sweep.
    pub async fn cancel_event(&self, event_id: i32) -> ResultEngine<Event> {
        let _guard = self.locks.acquire(event_id).await;
        let (event, recipients) = with_tx!(self, |db_tx| {
            let model = events::Entity::find_by_id(event_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("event".to_string()))?;
            let event = Event::try_from(model.clone())?;
            if event.is_cancelled() {
                return Ok(event);
            }

            let mut active: events::ActiveModel = model.into();
            active.status = ActiveValue::Set(EventStatus::Cancelled.as_str().to_string());
            active.updated_at = ActiveValue::Set(Utc::now());
            let event = Event::try_from(active.update(&db_tx).await?)?;

            let recipients: Vec<String> = users::Entity::find()
                .join(JoinType::InnerJoin, users::Relation::Participations.def())
                .filter(participations::Column::EventId.eq(event_id))
                .filter(users::Column::Id.ne(event.host_id))
                .all(&db_tx)
                .await?
                .into_iter()
                .filter_map(|user| user.push_token)
                .collect();
            Ok::<_, EngineError>((event, recipients))
        })?;

        tracing::info!(event_id, notified = recipients.len(), "event cancelled");
        for address in recipients {
            self.dispatch(Notification {
                address,
                title: event.title.clone(),
                body: format!("{} on {} has been cancelled", event.title, event.date),
            });
        }
        Ok(event)
    }

    pub async fn event(&self, event_id: i32) -> ResultEngine<Event> {
        self.require_event(&self.database, event_id).await
    }

    /// The event plus every participant's profile, in join order.
    pub async fn event_with_participants(&self, event_id: i32) -> ResultEngine<EventDetail> {
        let event = self.require_event(&self.database, event_id).await?;
        let participants = participations::Entity::find()
            .filter(participations::Column::EventId.eq(event_id))
            .find_also_related(users::Entity)
            .order_by_asc(participations::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .filter_map(|(row, user)| user.map(|user| (row, user)))
            .map(Participant::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        Ok(EventDetail {
            event,
            participants,
        })
    }

    /// Events the user participates in (hosted ones included), by start.
    pub async fn user_events(&self, user_id: i32) -> ResultEngine<Vec<Event>> {
        self.require_user(&self.database, user_id).await?;
        events::Entity::find()
            .inner_join(participations::Entity)
            .filter(participations::Column::UserId.eq(user_id))
            .order_by_asc(events::Column::Date)
            .order_by_asc(events::Column::Time)
            .order_by_asc(events::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Event::try_from)
            .collect()
    }

    /// Ask the payment processor for a sheet covering the event price.
    pub async fn payment_sheet(&self, event_id: i32) -> ResultEngine<PaymentSheet> {
        let event = self.require_event(&self.database, event_id).await?;
        if event.price_minor == 0 {
            return Err(EngineError::ValidationFailed(
                "event is free of charge".to_string(),
            ));
        }
        let gateway = self
            .payments
            .as_ref()
            .ok_or_else(|| EngineError::Dependency("payments not configured".to_string()))?;
        gateway
            .create_payment_intent(event.price_minor, self.currency)
            .await
            .map_err(|err| {
                tracing::warn!(event_id, "payment intent failed: {err}");
                EngineError::Dependency(format!("payment processor: {err}"))
            })
    }
}
