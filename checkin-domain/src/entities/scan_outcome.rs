// Scan outcome entity
// Result of classifying one scanned payload against an event's records

use serde::Serialize;

use crate::entities::AttendanceRecord;
use crate::value_objects::{EventId, RecordId};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanOutcome<K> {
    /// Carries the record as it reads after the check-in.
    Success { record: AttendanceRecord<K> },
    /// Carries the record untouched, including its original scan time.
    AlreadyScanned { record: AttendanceRecord<K> },
    NotFound {
        identifier: RecordId,
        reason: NotFoundReason,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotFoundReason {
    UnknownIdentifier,
    OtherEvent { event_id: EventId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeKind {
    Success,
    AlreadyScanned,
    NotFound,
}

impl OutcomeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeKind::Success => "SUCCESS",
            OutcomeKind::AlreadyScanned => "ALREADY_SCANNED",
            OutcomeKind::NotFound => "NOT_FOUND",
        }
    }
}

impl<K> ScanOutcome<K> {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            ScanOutcome::Success { .. } => OutcomeKind::Success,
            ScanOutcome::AlreadyScanned { .. } => OutcomeKind::AlreadyScanned,
            ScanOutcome::NotFound { .. } => OutcomeKind::NotFound,
        }
    }

    pub fn record(&self) -> Option<&AttendanceRecord<K>> {
        match self {
            ScanOutcome::Success { record } | ScanOutcome::AlreadyScanned { record } => Some(record),
            ScanOutcome::NotFound { .. } => None,
        }
    }

    pub fn not_found(identifier: RecordId) -> Self {
        ScanOutcome::NotFound {
            identifier,
            reason: NotFoundReason::UnknownIdentifier,
        }
    }
}
