//! Shared test doubles for application tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use checkin_domain::ports::{RecordSource, Scanner, ScannerDevice};
use checkin_domain::{
    AttendanceRecord, CrewMember, DeviceError, EventId, RecordId, RecordKind, RuntimeConfig,
    TicketHolder,
};
use mockable::Clock;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::ops::ScanSessionHub;
use crate::{AppState, Metrics, RosterRegistry};

pub fn fixed_time() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2026, 3, 14, 18, 30, 0).single() {
        Some(time) => time,
        None => panic!("valid fixture time"),
    }
}

pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

pub fn ticket(identifier: &str, event: &str) -> AttendanceRecord<TicketHolder> {
    AttendanceRecord::new(
        RecordId::new(identifier),
        EventId::new(event),
        format!("Guest {identifier}"),
        TicketHolder {
            ticket_type: "General Admission".to_string(),
            order_id: None,
            email: None,
        },
    )
}

pub fn crew(identifier: &str, event: &str) -> AttendanceRecord<CrewMember> {
    AttendanceRecord::new(
        RecordId::new(identifier),
        EventId::new(event),
        format!("Crew {identifier}"),
        CrewMember {
            role: "Usher".to_string(),
            phone: None,
            email: None,
        },
    )
}

/// Serves a fixed list of records, whatever event is asked for.
pub struct StaticSource<K>(pub Vec<AttendanceRecord<K>>);

#[async_trait]
impl<K: RecordKind> RecordSource<K> for StaticSource<K> {
    async fn load_records_for_event(
        &self,
        _event_id: &EventId,
    ) -> anyhow::Result<Vec<AttendanceRecord<K>>> {
        Ok(self.0.clone())
    }
}

/// Scanner whose payloads are pushed by the test. Every acquired device
/// reads from the same feed.
#[derive(Clone)]
pub struct ScriptedScanner {
    failure: Option<DeviceError>,
    acquisitions: Arc<AtomicUsize>,
    releases: Arc<AtomicUsize>,
    sender: UnboundedSender<Result<String, DeviceError>>,
    receiver: Arc<tokio::sync::Mutex<UnboundedReceiver<Result<String, DeviceError>>>>,
}

impl Default for ScriptedScanner {
    fn default() -> Self {
        let (sender, receiver) = unbounded_channel();
        Self {
            failure: None,
            acquisitions: Arc::new(AtomicUsize::new(0)),
            releases: Arc::new(AtomicUsize::new(0)),
            sender,
            receiver: Arc::new(tokio::sync::Mutex::new(receiver)),
        }
    }
}

impl ScriptedScanner {
    pub fn failing(error: DeviceError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub fn feed(&self, payload: &str) {
        let _ = self.sender.send(Ok(payload.to_string()));
    }

    pub fn feed_error(&self, error: DeviceError) {
        let _ = self.sender.send(Err(error));
    }

    pub fn acquisitions(&self) -> usize {
        self.acquisitions.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Scanner for ScriptedScanner {
    async fn acquire(&self) -> Result<Box<dyn ScannerDevice>, DeviceError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        self.acquisitions.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedDevice {
            releases: self.releases.clone(),
            receiver: self.receiver.clone(),
        }))
    }
}

struct ScriptedDevice {
    releases: Arc<AtomicUsize>,
    receiver: Arc<tokio::sync::Mutex<UnboundedReceiver<Result<String, DeviceError>>>>,
}

#[async_trait]
impl ScannerDevice for ScriptedDevice {
    async fn decode_next(&mut self) -> Result<String, DeviceError> {
        match self.receiver.lock().await.recv().await {
            Some(result) => result,
            None => Err(DeviceError::Closed),
        }
    }

    fn release(&mut self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn test_state(
    tickets: Vec<AttendanceRecord<TicketHolder>>,
    crew: Vec<AttendanceRecord<CrewMember>>,
) -> (AppState, Arc<MutableClock>) {
    test_state_with_scanner(tickets, crew, ScriptedScanner::default())
}

pub fn test_state_with_scanner(
    tickets: Vec<AttendanceRecord<TicketHolder>>,
    crew: Vec<AttendanceRecord<CrewMember>>,
    scanner: ScriptedScanner,
) -> (AppState, Arc<MutableClock>) {
    let clock = Arc::new(MutableClock::new(fixed_time()));
    let state = AppState {
        config: RuntimeConfig::default(),
        tickets: Arc::new(RosterRegistry::new(Arc::new(StaticSource(tickets)))),
        crew: Arc::new(RosterRegistry::new(Arc::new(StaticSource(crew)))),
        scanner: Arc::new(scanner),
        sessions: Arc::new(ScanSessionHub::default()),
        clock: clock.clone(),
        metrics: Arc::new(Metrics::default()),
    };
    (state, clock)
}
