use std::collections::HashMap;
use std::sync::Arc;

use checkin_domain::ports::RecordSource;
use checkin_domain::{
    AttendanceStore, CrewMember, EventId, RecordKind, ScanOutcome, TicketHolder,
};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::dtos::SessionOutcome;
use crate::{AppError, AppState};

/// Attendance stores of one record kind, one per event, loaded lazily from
/// the record source and then owned in memory.
pub struct RosterRegistry<K: RecordKind> {
    source: Arc<dyn RecordSource<K>>,
    stores: RwLock<HashMap<EventId, AttendanceStore<K>>>,
}

impl<K: RecordKind> RosterRegistry<K> {
    pub fn new(source: Arc<dyn RecordSource<K>>) -> Self {
        Self {
            source,
            stores: RwLock::new(HashMap::new()),
        }
    }

    pub async fn read<R>(
        &self,
        event_id: &EventId,
        f: impl FnOnce(&AttendanceStore<K>) -> R,
    ) -> Result<R, AppError> {
        self.ensure_loaded(event_id).await?;
        let stores = self.stores.read().await;
        let store = stores
            .get(event_id)
            .ok_or_else(|| unknown_event(event_id))?;
        Ok(f(store))
    }

    pub async fn write<R>(
        &self,
        event_id: &EventId,
        f: impl FnOnce(&mut AttendanceStore<K>) -> R,
    ) -> Result<R, AppError> {
        self.ensure_loaded(event_id).await?;
        let mut stores = self.stores.write().await;
        let store = stores
            .get_mut(event_id)
            .ok_or_else(|| unknown_event(event_id))?;
        Ok(f(store))
    }

    /// Replaces the event's store with a fresh copy from the source, dropping
    /// every in-memory check-in for that event. An event whose roster is now
    /// empty is forgotten.
    pub async fn reload(&self, event_id: &EventId) -> Result<usize, AppError> {
        let store = self.load(event_id).await?;
        let mut stores = self.stores.write().await;
        if store.is_empty() {
            stores.remove(event_id);
            return Err(unknown_event(event_id));
        }
        let len = store.len();
        stores.insert(event_id.clone(), store);
        Ok(len)
    }

    async fn ensure_loaded(&self, event_id: &EventId) -> Result<(), AppError> {
        if self.stores.read().await.contains_key(event_id) {
            return Ok(());
        }
        let store = self.load(event_id).await?;
        // Events without a single record are never cached.
        if store.is_empty() {
            return Err(unknown_event(event_id));
        }
        // Another request may have loaded it meanwhile; keep the first copy so
        // check-ins made against it survive.
        self.stores
            .write()
            .await
            .entry(event_id.clone())
            .or_insert(store);
        Ok(())
    }

    async fn load(&self, event_id: &EventId) -> Result<AttendanceStore<K>, AppError> {
        let records = self
            .source
            .load_records_for_event(event_id)
            .await
            .map_err(|err| {
                warn!(
                    "failed to load {} roster for event {}: {}",
                    K::KIND.as_str(),
                    event_id,
                    err
                );
                AppError::Internal(err)
            })?;
        let loaded = records.len();
        let records = records
            .into_iter()
            .filter(|record| record.event_id() == event_id)
            .collect::<Vec<_>>();
        if records.len() != loaded {
            warn!(
                "dropped {} {} records of other events while loading event {}",
                loaded - records.len(),
                K::KIND.as_str(),
                event_id
            );
        }
        let store = AttendanceStore::from_records(records)
            .map_err(|err| AppError::Internal(err.into()))?;
        info!(
            "loaded {} {} records for event {}",
            store.len(),
            K::KIND.as_str(),
            event_id
        );
        Ok(store)
    }
}

fn unknown_event(event_id: &EventId) -> AppError {
    AppError::NotFound(format!("event '{}'", event_id))
}

/// Record kinds the service keeps a registry for.
pub trait Rostered: RecordKind {
    fn registry(state: &AppState) -> &RosterRegistry<Self>;

    fn session_outcome(outcome: ScanOutcome<Self>) -> SessionOutcome;
}

impl Rostered for TicketHolder {
    fn registry(state: &AppState) -> &RosterRegistry<Self> {
        &state.tickets
    }

    fn session_outcome(outcome: ScanOutcome<Self>) -> SessionOutcome {
        SessionOutcome::Ticket(outcome)
    }
}

impl Rostered for CrewMember {
    fn registry(state: &AppState) -> &RosterRegistry<Self> {
        &state.crew
    }

    fn session_outcome(outcome: ScanOutcome<Self>) -> SessionOutcome {
        SessionOutcome::Crew(outcome)
    }
}
