// Attendance record entity
// One attendee or crew member of a single event, with check-in state

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entities::RecordKind;
use crate::error::RosterError;
use crate::value_objects::{AttendanceStatus, EventId, KindTag, RecordId};

/// Status and scan time only change through [`crate::AttendanceStore`], which
/// keeps `scanned_at` set exactly when the record is present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceRecord<K> {
    identifier: RecordId,
    event_id: EventId,
    display_name: String,
    #[serde(flatten)]
    details: K,
    status: AttendanceStatus,
    scanned_at: Option<DateTime<Utc>>,
}

impl<K: RecordKind> AttendanceRecord<K> {
    pub fn new(
        identifier: RecordId,
        event_id: EventId,
        display_name: impl Into<String>,
        details: K,
    ) -> Self {
        Self {
            identifier,
            event_id,
            display_name: display_name.into(),
            details,
            status: AttendanceStatus::NotPresent,
            scanned_at: None,
        }
    }

    pub fn from_seed(
        identifier: RecordId,
        event_id: EventId,
        display_name: impl Into<String>,
        details: K,
        status: AttendanceStatus,
        scanned_at: Option<DateTime<Utc>>,
    ) -> Result<Self, RosterError> {
        if identifier.as_str().trim().is_empty() {
            return Err(RosterError::InvalidSeed {
                identifier,
                reason: "identifier must not be empty".to_string(),
            });
        }
        let mut record = Self::new(identifier, event_id, display_name, details);
        match (status, scanned_at) {
            (AttendanceStatus::Present, Some(at)) => record.mark_present(at),
            (AttendanceStatus::Present, None) => {
                return Err(RosterError::InvalidSeed {
                    identifier: record.identifier,
                    reason: "present without scan time".to_string(),
                });
            }
            // A stale scan time on an absent record is dropped.
            (AttendanceStatus::NotPresent, _) => {}
        }
        Ok(record)
    }

    pub fn identifier(&self) -> &RecordId {
        &self.identifier
    }

    pub fn event_id(&self) -> &EventId {
        &self.event_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn details(&self) -> &K {
        &self.details
    }

    pub fn role_or_category(&self) -> &str {
        self.details.category()
    }

    pub fn kind(&self) -> KindTag {
        K::KIND
    }

    pub fn status(&self) -> AttendanceStatus {
        self.status
    }

    pub fn scanned_at(&self) -> Option<DateTime<Utc>> {
        self.scanned_at
    }

    pub fn is_present(&self) -> bool {
        self.status.is_present()
    }

    pub(crate) fn mark_present(&mut self, at: DateTime<Utc>) {
        self.status = AttendanceStatus::Present;
        self.scanned_at = Some(at);
    }

    pub(crate) fn mark_not_present(&mut self) {
        self.status = AttendanceStatus::NotPresent;
        self.scanned_at = None;
    }

    pub(crate) fn checked_in_at(&self, at: DateTime<Utc>) -> Self {
        let mut preview = self.clone();
        preview.mark_present(at);
        preview
    }
}
