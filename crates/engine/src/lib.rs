//! Event participation and team assignment engine.
//!
//! Hosts create events, guests find them by invite code and join one of two
//! teams under capacity limits. Every write that reads-then-writes an event's
//! participations runs under that event's lock inside a DB transaction.

pub use allocator::{Occupancy, Seat, allocate};
pub use commands::{JoinEventCmd, NewEventCmd, NewUserCmd};
pub use currency::Currency;
pub use error::{EngineError, ErrorKind};
pub use events::{Event, EventStatus, TeamColors, TeamDistribution};
pub use notify::{Notification, NotificationQueue, NotificationWorker, Notifier, NotifyResult};
pub use ops::{Engine, EngineBuilder, EventDetail, SweepReport};
pub use participations::{Participant, Participation, PaymentMethod};
pub use payments::{PaymentGateway, PaymentResult, PaymentSheet};
pub use sweeper::Sweeper;
pub use users::User;

mod allocator;
mod commands;
mod currency;
mod error;
mod events;
pub mod invite_codes;
mod locks;
mod notify;
mod ops;
mod participations;
mod payments;
mod sweeper;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
