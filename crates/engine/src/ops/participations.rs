use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, PaginatorTrait, QueryFilter, TransactionTrait, prelude::*,
};

use crate::{
    EngineError, Event, JoinEventCmd, Notification, Occupancy, Participation, ResultEngine,
    allocate, error::is_unique_violation, participations, users,
};

use super::{Engine, with_tx};

impl Engine {
    /// Seat a guest on an event.
    ///
    /// Runs under the event lock: the occupancy count and the insert see the
    /// same state, so concurrent joins never overfill a team.
    pub async fn join_event(&self, cmd: JoinEventCmd) -> ResultEngine<Participation> {
        let JoinEventCmd {
            event_id,
            user_id,
            payment_method,
        } = cmd;
        let _guard = self.locks.acquire(event_id).await;
        let (participation, event, guest) = with_tx!(self, |db_tx| {
            let event = self.require_event(&db_tx, event_id).await?;
            let guest = self.require_user(&db_tx, user_id).await?;
            if find_participation(&db_tx, event_id, user_id).await?.is_some() {
                return Err(EngineError::Conflict(
                    "user already joined this event".to_string(),
                ));
            }
            if event.is_cancelled() {
                return Err(EngineError::ValidationFailed(
                    "event is cancelled".to_string(),
                ));
            }
            if event.is_past(Utc::now()) {
                return Err(EngineError::ValidationFailed(
                    "event has already taken place".to_string(),
                ));
            }

            let seated = participations::Entity::find()
                .filter(participations::Column::EventId.eq(event_id))
                .all(&db_tx)
                .await?;
            let occupancy = Occupancy::tally(
                event.team_colors.as_ref(),
                seated.iter().map(|row| row.team_color.as_deref()),
            );
            let seat = allocate(&event, occupancy)?;

            let now = Utc::now();
            let model = participations::ActiveModel {
                id: ActiveValue::NotSet,
                event_id: ActiveValue::Set(event_id),
                user_id: ActiveValue::Set(user_id),
                paid: ActiveValue::Set(payment_method.settles_on_join()),
                payment_method: ActiveValue::Set(Some(payment_method.as_str().to_string())),
                team_color: ActiveValue::Set(seat.team_color()),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            }
            .insert(&db_tx)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    EngineError::Conflict("user already joined this event".to_string())
                } else {
                    EngineError::Database(err)
                }
            })?;
            Ok::<_, EngineError>((Participation::try_from(model)?, event, guest))
        })?;

        tracing::debug!(
            event_id,
            user_id,
            team_color = participation.team_color.as_deref().unwrap_or("-"),
            "guest joined"
        );
        self.notify_host(&event, user_id, || {
            format!("{} {} joined {}", guest.first_name, guest.last_name, event.title)
        })
        .await;
        Ok(participation)
    }

    /// Remove a guest from an event. The freed seat goes to whoever joins next.
    ///
    /// The host check comes before the participation lookup: the host always
    /// holds a seat, so a host id answers `ValidationFailed`, never `NotFound`.
    pub async fn leave_event(&self, event_id: i32, user_id: i32) -> ResultEngine<()> {
        let _guard = self.locks.acquire(event_id).await;
        let (event, guest) = with_tx!(self, |db_tx| {
            let event = self.require_event(&db_tx, event_id).await?;
            if event.host_id == user_id {
                return Err(EngineError::ValidationFailed(
                    "the host cannot leave their own event".to_string(),
                ));
            }
            let row = find_participation(&db_tx, event_id, user_id)
                .await?
                .ok_or_else(|| EngineError::NotFound("participant".to_string()))?;
            let guest = users::Entity::find_by_id(user_id).one(&db_tx).await?;
            row.delete(&db_tx).await?;
            Ok::<_, EngineError>((event, guest))
        })?;

        tracing::debug!(event_id, user_id, "guest left");
        if let Some(guest) = guest {
            self.notify_host(&event, user_id, || {
                format!("{} {} left {}", guest.first_name, guest.last_name, event.title)
            })
            .await;
        }
        Ok(())
    }

    /// Exchange two participants' team colors, both rows or neither.
    ///
    /// Returns the updated participations in argument order.
    pub async fn swap_participant_colors(
        &self,
        event_id: i32,
        first_user_id: i32,
        second_user_id: i32,
    ) -> ResultEngine<(Participation, Participation)> {
        if first_user_id == second_user_id {
            return Err(EngineError::ValidationFailed(
                "cannot swap a participant with themselves".to_string(),
            ));
        }
        let _guard = self.locks.acquire(event_id).await;
        with_tx!(self, |db_tx| {
            let first = find_participation(&db_tx, event_id, first_user_id)
                .await?
                .ok_or_else(|| EngineError::NotFound("participant".to_string()))?;
            let second = find_participation(&db_tx, event_id, second_user_id)
                .await?
                .ok_or_else(|| EngineError::NotFound("participant".to_string()))?;

            let now = Utc::now();
            let first_color = first.team_color.clone();
            let second_color = second.team_color.clone();

            let mut first: participations::ActiveModel = first.into();
            first.team_color = ActiveValue::Set(second_color);
            first.updated_at = ActiveValue::Set(now);
            let first = first.update(&db_tx).await?;

            let mut second: participations::ActiveModel = second.into();
            second.team_color = ActiveValue::Set(first_color);
            second.updated_at = ActiveValue::Set(now);
            let second = second.update(&db_tx).await?;

            tracing::debug!(event_id, first_user_id, second_user_id, "team colors swapped");
            Ok((
                Participation::try_from(first)?,
                Participation::try_from(second)?,
            ))
        })
    }

    /// Number of participations on the event, host included.
    pub async fn participant_count(&self, event_id: i32) -> ResultEngine<u64> {
        self.require_event(&self.database, event_id).await?;
        let count = participations::Entity::find()
            .filter(participations::Column::EventId.eq(event_id))
            .count(&self.database)
            .await?;
        Ok(count)
    }

    async fn notify_host<F>(&self, event: &Event, actor_id: i32, body: F)
    where
        F: FnOnce() -> String,
    {
        if event.host_id == actor_id {
            return;
        }
        let host = match users::Entity::find_by_id(event.host_id)
            .one(&self.database)
            .await
        {
            Ok(host) => host,
            Err(err) => {
                tracing::warn!(event_id = event.id, "host lookup for notification failed: {err}");
                return;
            }
        };
        if let Some(address) = host.and_then(|host| host.push_token) {
            self.dispatch(Notification {
                address,
                title: event.title.clone(),
                body: body(),
            });
        }
    }
}

async fn find_participation(
    db_tx: &DatabaseTransaction,
    event_id: i32,
    user_id: i32,
) -> ResultEngine<Option<participations::Model>> {
    let row = participations::Entity::find()
        .filter(participations::Column::EventId.eq(event_id))
        .filter(participations::Column::UserId.eq(user_id))
        .one(db_tx)
        .await?;
    Ok(row)
}
