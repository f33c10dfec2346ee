use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use checkin_application::commands::session_commands;
use checkin_application::dtos::SessionView;
use checkin_application::queries::session_queries;
use checkin_application::{AppState, Rostered};
use checkin_domain::SessionId;

use crate::error::HttpError;
use crate::handlers::attendance_handlers::event;
use crate::middleware::authorize;

/// Opens a scan session against the event's roster of kind `K`. A refused
/// scanner still creates the session; its state says why it cannot scan.
pub async fn open_session<K: Rostered>(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<String>,
) -> Result<(StatusCode, Json<SessionView>), HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let view = session_commands::open_session(&state, K::KIND, &event(&event_id)?).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn list_sessions(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<SessionView>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(session_queries::list_sessions(&state).await))
}

pub async fn get_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let view = session_queries::get_session(&state, &session(&session_id)?).await?;
    Ok(Json(view))
}

pub async fn start_scan(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(session_id): Path<String>,
) -> Result<(StatusCode, Json<SessionView>), HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let view = session_commands::start_scan(&state, &session(&session_id)?).await?;
    Ok((StatusCode::ACCEPTED, Json(view)))
}

pub async fn rescan(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let view = session_commands::rescan(&state, &session(&session_id)?).await?;
    Ok(Json(view))
}

pub async fn close_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let view = session_commands::close_session(&state, &session(&session_id)?).await?;
    Ok(Json(view))
}

fn session(raw: &str) -> Result<SessionId, HttpError> {
    SessionId::parse(raw)
        .ok_or_else(|| HttpError::BadRequest(format!("invalid session id '{}'", raw)))
}
