use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::entities::{SessionEvent, SessionState};
use crate::value_objects::RecordId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("duplicate identifier '{0}' in roster")]
    DuplicateIdentifier(RecordId),
    #[error("invalid roster entry '{identifier}': {reason}")]
    InvalidSeed { identifier: RecordId, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("no record with identifier '{0}'")]
    UnknownIdentifier(RecordId),
    #[error("record '{identifier}' already checked in at {scanned_at}")]
    AlreadyPresent {
        identifier: RecordId,
        scanned_at: DateTime<Utc>,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("scanner permission denied")]
    PermissionDenied,
    #[error("scanner unavailable: {0}")]
    Unavailable(String),
    #[error("scanner closed")]
    Closed,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("cannot apply '{event}' while session is {from}")]
pub struct InvalidTransition {
    pub from: SessionState,
    pub event: SessionEvent,
}
