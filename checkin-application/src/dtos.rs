use chrono::{DateTime, Utc};
use serde::Serialize;

use checkin_domain::{
    AttendanceRecord, AttendanceSummary, CrewMember, EventId, KindTag, OutcomeKind, ScanOutcome,
    SessionId, SessionState, TicketHolder,
};

/// Outcome shown by a scan session, whichever kind of roster it scans.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SessionOutcome {
    Ticket(ScanOutcome<TicketHolder>),
    Crew(ScanOutcome<CrewMember>),
}

impl SessionOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            SessionOutcome::Ticket(outcome) => outcome.kind(),
            SessionOutcome::Crew(outcome) => outcome.kind(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub kind: KindTag,
    pub event_id: EventId,
    pub state: SessionState,
    pub busy: bool,
    pub scans_completed: u32,
    pub last_outcome: Option<SessionOutcome>,
    pub last_error: Option<String>,
    pub opened_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordPage<K> {
    pub event_id: EventId,
    pub kind: KindTag,
    pub page: usize,
    pub per_page: usize,
    pub total_matching: usize,
    pub summary: AttendanceSummary,
    pub records: Vec<AttendanceRecord<K>>,
}
