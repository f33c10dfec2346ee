use checkin_domain::{AttendanceRecord, AttendanceStatus, EventId, ScanOutcome};
use tracing::{info, warn};

use crate::{AppError, AppState, Rostered};

pub async fn scan_identifier<K: Rostered>(
    state: &AppState,
    event_id: &EventId,
    payload: &str,
) -> Result<ScanOutcome<K>, AppError> {
    let at = state.clock.utc();
    let outcome = K::registry(state)
        .write(event_id, |store| store.scan(event_id, payload, at))
        .await?;
    state.metrics.record_scan(outcome.kind());
    match &outcome {
        ScanOutcome::Success { record } => info!(
            "{} {} checked in for event {}",
            K::KIND.as_str(),
            record.identifier(),
            event_id
        ),
        ScanOutcome::AlreadyScanned { record } => warn!(
            "{} {} already scanned for event {} at {:?}",
            K::KIND.as_str(),
            record.identifier(),
            event_id,
            record.scanned_at()
        ),
        ScanOutcome::NotFound { identifier, reason } => warn!(
            "{} scan '{}' not found for event {}: {:?}",
            K::KIND.as_str(),
            identifier,
            event_id,
            reason
        ),
    }
    Ok(outcome)
}

pub async fn set_status<K: Rostered>(
    state: &AppState,
    event_id: &EventId,
    identifier: &str,
    status: AttendanceStatus,
) -> Result<AttendanceRecord<K>, AppError> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(AppError::BadRequest("identifier is required".to_string()));
    }
    let at = state.clock.utc();
    let record = K::registry(state)
        .write(event_id, |store| {
            store.set_status(identifier, status, at).map(Clone::clone)
        })
        .await??;
    state.metrics.record_status_override();
    info!(
        "{} {} manually set to {} for event {}",
        K::KIND.as_str(),
        identifier,
        status.as_str(),
        event_id
    );
    Ok(record)
}
