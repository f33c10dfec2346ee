use axum::routing::{get, post, put};
use axum::Router;

use checkin_application::{AppState, Rostered};
use checkin_domain::{CrewMember, TicketHolder};

use crate::handlers::{attendance_handlers, ops_handlers, session_handlers};

pub fn build_router(state: AppState) -> Router {
    let router = Router::new();
    let router = roster_routes::<TicketHolder>(router, "tickets");
    let router = roster_routes::<CrewMember>(router, "crew");
    router
        .route("/v1/sessions", get(session_handlers::list_sessions))
        .route(
            "/v1/sessions/:session_id",
            get(session_handlers::get_session).delete(session_handlers::close_session),
        )
        .route(
            "/v1/sessions/:session_id/scan",
            post(session_handlers::start_scan),
        )
        .route(
            "/v1/sessions/:session_id/rescan",
            post(session_handlers::rescan),
        )
        .route("/v1/ops/health/live", get(ops_handlers::health_live))
        .route(
            "/v1/ops/metrics/prometheus",
            get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}

fn roster_routes<K: Rostered>(router: Router<AppState>, segment: &str) -> Router<AppState> {
    let base = format!("/v1/events/:event_id/{}", segment);
    router
        .route(&base, get(attendance_handlers::list_records::<K>))
        .route(
            &format!("{}/summary", base),
            get(attendance_handlers::get_summary::<K>),
        )
        .route(
            &format!("{}/scan", base),
            post(attendance_handlers::scan::<K>),
        )
        .route(
            &format!("{}/reload", base),
            post(attendance_handlers::reload::<K>),
        )
        .route(
            &format!("{}/sessions", base),
            post(session_handlers::open_session::<K>),
        )
        .route(
            &format!("{}/:identifier/status", base),
            put(attendance_handlers::update_status::<K>),
        )
}
