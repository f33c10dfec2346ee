use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use checkin_application::commands::{checkin_commands, roster_commands};
use checkin_application::dtos::RecordPage;
use checkin_application::queries::attendance_queries;
use checkin_application::{AppState, Rostered};
use checkin_domain::{
    AttendanceRecord, AttendanceStatus, AttendanceSummary, EventId, RecordListQuery, ScanOutcome,
};

use crate::error::HttpError;
use crate::middleware::authorize;

#[derive(Deserialize)]
pub struct ScanRequest {
    pub payload: String,
}

#[derive(Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

pub async fn list_records<K: Rostered>(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<String>,
    Query(query): Query<RecordListQuery>,
) -> Result<Json<RecordPage<K>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let page = attendance_queries::list_records::<K>(&state, &event(&event_id)?, query).await?;
    Ok(Json(page))
}

pub async fn get_summary<K: Rostered>(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<String>,
) -> Result<Json<AttendanceSummary>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let summary = attendance_queries::attendance_summary::<K>(&state, &event(&event_id)?).await?;
    Ok(Json(summary))
}

/// Every decoded payload gets a 200 with its outcome, including repeats and
/// unknown identifiers.
pub async fn scan<K: Rostered>(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<String>,
    Json(payload): Json<ScanRequest>,
) -> Result<Json<ScanOutcome<K>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let outcome =
        checkin_commands::scan_identifier::<K>(&state, &event(&event_id)?, &payload.payload)
            .await?;
    Ok(Json(outcome))
}

pub async fn update_status<K: Rostered>(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((event_id, identifier)): Path<(String, String)>,
    Json(payload): Json<StatusUpdateRequest>,
) -> Result<Json<AttendanceRecord<K>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let status = AttendanceStatus::parse(&payload.status).ok_or_else(|| {
        HttpError::BadRequest(format!("unknown status '{}'", payload.status))
    })?;
    let record =
        checkin_commands::set_status::<K>(&state, &event(&event_id)?, &identifier, status).await?;
    Ok(Json(record))
}

pub async fn reload<K: Rostered>(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<String>,
) -> Result<Json<AttendanceSummary>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let summary = roster_commands::reload_roster::<K>(&state, &event(&event_id)?).await?;
    Ok(Json(summary))
}

pub(crate) fn event(raw: &str) -> Result<EventId, HttpError> {
    let event_id = EventId::new(raw);
    if event_id.as_str().is_empty() {
        return Err(HttpError::BadRequest("event id is required".to_string()));
    }
    Ok(event_id)
}
