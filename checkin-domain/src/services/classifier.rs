use chrono::{DateTime, Utc};

use crate::entities::{NotFoundReason, RecordKind, ScanOutcome};
use crate::services::AttendanceStore;
use crate::utils::normalize_payload;
use crate::value_objects::{EventId, RecordId};

/// Decides what a scan of `scanned` would do under the `event_id` scope
/// without touching the store. `at` is the time a successful check-in would
/// be stamped with, so the `Success` record already reads as present.
pub fn classify<K: RecordKind>(
    store: &AttendanceStore<K>,
    event_id: &EventId,
    scanned: &str,
    at: DateTime<Utc>,
) -> ScanOutcome<K> {
    let Some(identifier) = normalize_payload(scanned) else {
        return ScanOutcome::not_found(RecordId::new(scanned));
    };
    let Some(record) = store.get(identifier) else {
        return ScanOutcome::not_found(RecordId::new(identifier));
    };
    if record.event_id() != event_id {
        return ScanOutcome::NotFound {
            identifier: record.identifier().clone(),
            reason: NotFoundReason::OtherEvent {
                event_id: record.event_id().clone(),
            },
        };
    }
    if record.is_present() {
        ScanOutcome::AlreadyScanned {
            record: record.clone(),
        }
    } else {
        ScanOutcome::Success {
            record: record.checked_in_at(at),
        }
    }
}
