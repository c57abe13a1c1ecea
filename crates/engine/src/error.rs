//! The module contains the error the engine can throw.
//!
//! Every operation fails with exactly one of these variants:
//!
//! - [`ValidationFailed`] missing or malformed input, or a state that does not
//!   admit the operation (e.g. joining a cancelled event).
//! - [`NotFound`] event, user, participant or invite code absent.
//! - [`Conflict`] duplicate join or duplicate email.
//! - [`CapacityExceeded`] no seat left for a joining guest.
//! - [`Database`] and [`Dependency`] persistence or collaborator faults. They
//!   are never retried by the engine.
//!
//!  [`ValidationFailed`]: EngineError::ValidationFailed
//!  [`NotFound`]: EngineError::NotFound
//!  [`Conflict`]: EngineError::Conflict
//!  [`CapacityExceeded`]: EngineError::CapacityExceeded
//!  [`Database`]: EngineError::Database
//!  [`Dependency`]: EngineError::Dependency
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    ValidationFailed(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    CapacityExceeded(String),
    #[error("dependency failure: {0}")]
    Dependency(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

/// Coarse classification callers translate into transport status codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    ValidationFailed,
    NotFound,
    Conflict,
    CapacityExceeded,
    DependencyFailure,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ValidationFailed(_) => ErrorKind::ValidationFailed,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::CapacityExceeded(_) => ErrorKind::CapacityExceeded,
            Self::Dependency(_) | Self::Database(_) => ErrorKind::DependencyFailure,
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::ValidationFailed(a), Self::ValidationFailed(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::CapacityExceeded(a), Self::CapacityExceeded(b)) => a == b,
            (Self::Dependency(a), Self::Dependency(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

/// Returns `true` when the database rejected a write because of a unique
/// constraint (duplicate email, duplicate participation, invite code taken).
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
