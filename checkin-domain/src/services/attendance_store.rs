use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::entities::{AttendanceRecord, AttendanceSummary, RecordKind, ScanOutcome};
use crate::error::{RosterError, TransitionError};
use crate::services::classify;
use crate::value_objects::{AttendanceStatus, EventId, RecordId};

/// In-memory attendance records of one event, keyed by identifier.
///
/// Listing order is insertion order, except that a record moving to
/// `Present` is surfaced first so operators working a queue see the latest
/// check-in on top.
#[derive(Debug, Clone)]
pub struct AttendanceStore<K> {
    records: HashMap<RecordId, AttendanceRecord<K>>,
    display_order: Vec<RecordId>,
}

impl<K> Default for AttendanceStore<K> {
    fn default() -> Self {
        Self {
            records: HashMap::new(),
            display_order: Vec::new(),
        }
    }
}

impl<K: RecordKind> AttendanceStore<K> {
    pub fn from_records(records: Vec<AttendanceRecord<K>>) -> Result<Self, RosterError> {
        let mut store = Self::default();
        for record in records {
            let identifier = record.identifier().clone();
            if store.records.contains_key(&identifier) {
                return Err(RosterError::DuplicateIdentifier(identifier));
            }
            store.display_order.push(identifier.clone());
            store.records.insert(identifier, record);
        }
        Ok(store)
    }

    pub fn get(&self, identifier: &str) -> Option<&AttendanceRecord<K>> {
        self.records.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &AttendanceRecord<K>> + '_ {
        self.display_order
            .iter()
            .filter_map(|identifier| self.records.get(identifier))
    }

    pub fn summary(&self) -> AttendanceSummary {
        let present = self.records.values().filter(|r| r.is_present()).count();
        AttendanceSummary {
            total: self.records.len(),
            present,
            not_present: self.records.len() - present,
        }
    }

    /// Marks a record present exactly once. A second call reports
    /// `AlreadyPresent` and leaves the original scan time in place.
    pub fn check_in(
        &mut self,
        identifier: &str,
        at: DateTime<Utc>,
    ) -> Result<&AttendanceRecord<K>, TransitionError> {
        let record = self
            .records
            .get_mut(identifier)
            .ok_or_else(|| TransitionError::UnknownIdentifier(RecordId::new(identifier)))?;
        if let Some(scanned_at) = record.scanned_at() {
            return Err(TransitionError::AlreadyPresent {
                identifier: record.identifier().clone(),
                scanned_at,
            });
        }
        record.mark_present(at);
        let identifier = record.identifier().clone();
        self.promote(&identifier);
        self.lookup(&identifier)
    }

    /// Classifies the payload and applies the check-in on success, under the
    /// same exclusive borrow so duplicate decodes cannot stamp twice.
    pub fn scan(&mut self, event_id: &EventId, scanned: &str, at: DateTime<Utc>) -> ScanOutcome<K> {
        match classify(self, event_id, scanned, at) {
            ScanOutcome::Success { record } => {
                match self.check_in(record.identifier().as_str(), at) {
                    Ok(updated) => ScanOutcome::Success {
                        record: updated.clone(),
                    },
                    Err(_) => classify(self, event_id, scanned, at),
                }
            }
            other => other,
        }
    }

    /// Operator override. Forcing `Present` on a record that is already
    /// present keeps its original scan time; forcing `NotPresent` clears it.
    pub fn set_status(
        &mut self,
        identifier: &str,
        status: AttendanceStatus,
        at: DateTime<Utc>,
    ) -> Result<&AttendanceRecord<K>, TransitionError> {
        let record = self
            .records
            .get_mut(identifier)
            .ok_or_else(|| TransitionError::UnknownIdentifier(RecordId::new(identifier)))?;
        let identifier = record.identifier().clone();
        match status {
            AttendanceStatus::NotPresent => record.mark_not_present(),
            AttendanceStatus::Present if record.is_present() => {}
            AttendanceStatus::Present => {
                record.mark_present(at);
                self.promote(&identifier);
            }
        }
        self.lookup(&identifier)
    }

    fn promote(&mut self, identifier: &RecordId) {
        self.display_order.retain(|candidate| candidate != identifier);
        self.display_order.insert(0, identifier.clone());
    }

    fn lookup(&self, identifier: &RecordId) -> Result<&AttendanceRecord<K>, TransitionError> {
        self.records
            .get(identifier)
            .ok_or_else(|| TransitionError::UnknownIdentifier(identifier.clone()))
    }
}
