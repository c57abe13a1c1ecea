use std::{fmt, sync::Arc};

use sea_orm::{ConnectionTrait, DatabaseConnection, prelude::*};

use crate::{
    Currency, EngineError, Event, Notification, NotificationQueue, PaymentGateway, ResultEngine,
    locks::EventLocks,
};

mod events;
mod participations;
mod sweep;
mod users;

pub use events::EventDetail;
pub use sweep::SweepReport;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

pub struct Engine {
    database: DatabaseConnection,
    locks: EventLocks,
    notifications: Option<NotificationQueue>,
    payments: Option<Arc<dyn PaymentGateway>>,
    currency: Currency,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("database", &self.database)
            .field("locks", &self.locks)
            .field("notifications", &self.notifications.is_some())
            .field("payments", &self.payments.is_some())
            .field("currency", &self.currency)
            .finish()
    }
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Drop lock entries nobody is waiting on. Returns how many were removed.
    pub fn prune_event_locks(&self) -> usize {
        self.locks.prune()
    }

    /// Hand a message to the notification worker, if one is attached.
    fn dispatch(&self, notification: Notification) {
        match &self.notifications {
            Some(queue) => queue.push(notification),
            None => {
                tracing::debug!(address = %notification.address, "notifications disabled; dropping message");
            }
        }
    }

    async fn require_event<C: ConnectionTrait>(&self, conn: &C, event_id: i32) -> ResultEngine<Event> {
        let model = crate::events::Entity::find_by_id(event_id)
            .one(conn)
            .await?
            .ok_or_else(|| EngineError::NotFound("event".to_string()))?;
        Event::try_from(model)
    }

    async fn require_user<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i32,
    ) -> ResultEngine<crate::users::Model> {
        crate::users::Entity::find_by_id(user_id)
            .one(conn)
            .await?
            .ok_or_else(|| EngineError::NotFound("user".to_string()))
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    notifications: Option<NotificationQueue>,
    payments: Option<Arc<dyn PaymentGateway>>,
    currency: Currency,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Queue used for participant notifications. Without one, messages are dropped.
    pub fn notifications(mut self, queue: NotificationQueue) -> EngineBuilder {
        self.notifications = Some(queue);
        self
    }

    pub fn payments(mut self, gateway: Arc<dyn PaymentGateway>) -> EngineBuilder {
        self.payments = Some(gateway);
        self
    }

    /// Currency of event prices.
    pub fn currency(mut self, currency: Currency) -> EngineBuilder {
        self.currency = currency;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            locks: EventLocks::default(),
            notifications: self.notifications,
            payments: self.payments,
            currency: self.currency,
        })
    }
}
