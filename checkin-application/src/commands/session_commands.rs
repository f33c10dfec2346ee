use std::sync::Arc;
use std::time::Duration;

use checkin_domain::{CrewMember, EventId, KindTag, SessionEvent, SessionId, SessionState, TicketHolder};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::commands::checkin_commands::scan_identifier;
use crate::dtos::{SessionOutcome, SessionView};
use crate::ops::{DeviceLease, ScanSession};
use crate::{AppError, AppState, Rostered};

const REAPER_INTERVAL_SECONDS: u64 = 30;

/// Opens a session and acquires the scanner. A refused or failing device is
/// not an error here: the session is returned in `PermissionDenied` or
/// `DeviceError` so the operator sees why, and can close it.
pub async fn open_session(
    state: &AppState,
    kind: KindTag,
    event_id: &EventId,
) -> Result<SessionView, AppError> {
    // Load the roster up front so a broken source fails before the device
    // is touched.
    roster_size(state, kind, event_id).await?;

    let now = state.clock.utc();
    let mut session = ScanSession::new(kind, event_id.clone(), now);
    session.apply(SessionEvent::Open, now)?;
    let session_id = session.id();
    let handle = state.sessions.insert(session).await;
    state.metrics.record_session_opened();
    info!(
        "scan session {} opened for {} roster of event {}",
        session_id,
        kind.as_str(),
        event_id
    );

    let acquired = state.scanner.acquire().await;
    let mut session = handle.lock().await;
    let now = state.clock.utc();
    if session.state() != SessionState::AcquiringInput {
        // Closed while acquiring; dropping the lease hands the device back.
        if let Ok(device) = acquired {
            drop(DeviceLease::new(device, state.metrics.clone()));
        }
        return Err(AppError::Conflict(format!(
            "session {} closed during acquisition",
            session_id
        )));
    }
    match acquired {
        Ok(device) => {
            session.attach_device(DeviceLease::new(device, state.metrics.clone()), now)?;
            debug!("scan session {} ready", session_id);
        }
        Err(err) => {
            state.metrics.record_device_failure();
            warn!("scan session {} could not acquire scanner: {}", session_id, err);
            session.fail_acquire(&err, now)?;
        }
    }
    Ok(session.view())
}

pub async fn start_scan(state: &AppState, session_id: &SessionId) -> Result<SessionView, AppError> {
    let handle = find_session(state, session_id).await?;
    let mut session = handle.lock().await;
    let (generation, lease) = session.begin_decode(state.clock.utc())?;
    let task = tokio::spawn(run_decode(state.clone(), handle.clone(), lease, generation));
    session.set_decode_task(task);
    debug!("scan session {} decoding (generation {})", session_id, generation);
    Ok(session.view())
}

pub async fn rescan(state: &AppState, session_id: &SessionId) -> Result<SessionView, AppError> {
    let handle = find_session(state, session_id).await?;
    let mut session = handle.lock().await;
    session.rescan(state.clock.utc())?;
    Ok(session.view())
}

pub async fn close_session(
    state: &AppState,
    session_id: &SessionId,
) -> Result<SessionView, AppError> {
    let handle = state
        .sessions
        .remove(session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("session '{}'", session_id)))?;
    let mut session = handle.lock().await;
    let released = session.close(state.clock.utc()).await;
    state.metrics.record_session_closed();
    info!(
        "scan session {} closed (device released: {})",
        session_id, released
    );
    Ok(session.view())
}

/// Closes sessions with no activity for longer than the configured idle
/// timeout. Returns how many were closed.
pub async fn reap_idle_sessions(state: &AppState) -> usize {
    let timeout = chrono::Duration::seconds(
        i64::try_from(state.config.session_idle_timeout_seconds).unwrap_or(i64::MAX),
    );
    let cutoff = state.clock.utc() - timeout;
    let mut reaped = 0;
    for (session_id, handle) in state.sessions.snapshot().await {
        if handle.lock().await.updated_at() >= cutoff {
            continue;
        }
        if close_session(state, &session_id).await.is_ok() {
            info!("scan session {} reaped after idle timeout", session_id);
            reaped += 1;
        }
    }
    reaped
}

pub async fn run_session_reaper(state: AppState) {
    let mut ticker = tokio::time::interval(Duration::from_secs(REAPER_INTERVAL_SECONDS));
    loop {
        ticker.tick().await;
        let reaped = reap_idle_sessions(&state).await;
        if reaped > 0 {
            debug!("session reaper closed {} sessions", reaped);
        }
    }
}

async fn find_session(
    state: &AppState,
    session_id: &SessionId,
) -> Result<Arc<Mutex<ScanSession>>, AppError> {
    state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("session '{}'", session_id)))
}

async fn roster_size(state: &AppState, kind: KindTag, event_id: &EventId) -> Result<usize, AppError> {
    match kind {
        KindTag::Ticket => TicketHolder::registry(state).read(event_id, |store| store.len()).await,
        KindTag::Crew => CrewMember::registry(state).read(event_id, |store| store.len()).await,
    }
}

async fn scan_for_kind(
    state: &AppState,
    kind: KindTag,
    event_id: &EventId,
    payload: &str,
) -> Result<SessionOutcome, AppError> {
    match kind {
        KindTag::Ticket => scan_identifier::<TicketHolder>(state, event_id, payload)
            .await
            .map(TicketHolder::session_outcome),
        KindTag::Crew => scan_identifier::<CrewMember>(state, event_id, payload)
            .await
            .map(CrewMember::session_outcome),
    }
}

async fn run_decode(
    state: AppState,
    handle: Arc<Mutex<ScanSession>>,
    lease: Arc<Mutex<DeviceLease>>,
    generation: u64,
) {
    let decoded = lease.lock().await.decode_next().await;
    drop(lease);

    let mut session = handle.lock().await;
    if !session.is_current(generation) {
        debug!(
            "discarding stale decode for session {} (generation {})",
            session.id(),
            generation
        );
        return;
    }
    match decoded {
        Ok(payload) => {
            let (kind, event_id) = (session.kind(), session.event_id().clone());
            let result = scan_for_kind(&state, kind, &event_id, &payload)
                .await
                .map_err(|err| err.to_string());
            session.finish_decode(generation, result, state.clock.utc());
        }
        Err(err) => {
            state.metrics.record_device_failure();
            warn!("scan session {} decode failed: {}", session.id(), err);
            session.fail_decode(generation, &err, state.clock.utc()).await;
        }
    }
}
