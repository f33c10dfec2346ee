use checkin_domain::SessionId;

use crate::dtos::SessionView;
use crate::{AppError, AppState};

pub async fn get_session(state: &AppState, session_id: &SessionId) -> Result<SessionView, AppError> {
    let handle = state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("session '{}'", session_id)))?;
    let session = handle.lock().await;
    Ok(session.view())
}

pub async fn list_sessions(state: &AppState) -> Vec<SessionView> {
    let mut views = Vec::new();
    for (_, handle) in state.sessions.snapshot().await {
        views.push(handle.lock().await.view());
    }
    views.sort_by(|a, b| a.opened_at.cmp(&b.opened_at));
    views
}
