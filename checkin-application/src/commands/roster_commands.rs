use checkin_domain::{AttendanceSummary, EventId};
use tracing::info;

use crate::{AppError, AppState, Rostered};

/// Discards the event's in-memory check-ins and reloads its roster.
pub async fn reload_roster<K: Rostered>(
    state: &AppState,
    event_id: &EventId,
) -> Result<AttendanceSummary, AppError> {
    let registry = K::registry(state);
    let loaded = registry.reload(event_id).await?;
    state.metrics.record_roster_reload();
    info!(
        "reloaded {} roster for event {} ({} records)",
        K::KIND.as_str(),
        event_id,
        loaded
    );
    registry.read(event_id, |store| store.summary()).await
}
