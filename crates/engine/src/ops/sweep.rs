use chrono::{DateTime, Utc};
use sea_orm::{Condition, QueryFilter, QuerySelect, prelude::*};

use crate::{EventStatus, ResultEngine, events};

use super::Engine;

/// Outcome of one invite-code sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub cleared: usize,
    pub failed: usize,
}

impl Engine {
    /// Retire the invite codes of cancelled or already started events.
    ///
    /// Each event is cleared on its own; a failure is logged and counted and
    /// the pass moves on. Only the candidate query can fail the whole call.
    pub async fn sweep_invite_codes(&self, now: DateTime<Utc>) -> ResultEngine<SweepReport> {
        let today = now.date_naive();
        let started = Condition::any()
            .add(events::Column::Date.lt(today))
            .add(
                Condition::all()
                    .add(events::Column::Date.eq(today))
                    .add(events::Column::Time.lt(now.time())),
            );
        let candidates: Vec<i32> = events::Entity::find()
            .select_only()
            .column(events::Column::Id)
            .filter(events::Column::InviteCode.is_not_null())
            .filter(
                Condition::any()
                    .add(events::Column::Status.eq(EventStatus::Cancelled.as_str()))
                    .add(started),
            )
            .into_tuple()
            .all(&self.database)
            .await?;

        let mut report = SweepReport::default();
        for event_id in candidates {
            match self.clear_invite_code(event_id).await {
                Ok(true) => report.cleared += 1,
                Ok(false) => {}
                Err(err) => {
                    report.failed += 1;
                    tracing::warn!(event_id, "failed to clear invite code: {err}");
                }
            }
        }
        Ok(report)
    }
}
