use std::sync::Arc;

use chrono::{DateTime, Utc};
use checkin_domain::{
    DeviceError, EventId, InvalidTransition, KindTag, SessionEvent, SessionId, SessionState,
};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::dtos::{SessionOutcome, SessionView};
use crate::ops::DeviceLease;
use crate::AppError;

/// One operator's scanning session.
///
/// Each decode started from `Ready` gets a new generation number; a decode
/// result is only applied while its generation is still current, so closing
/// or restarting a session makes any in-flight result stale.
pub struct ScanSession {
    id: SessionId,
    kind: KindTag,
    event_id: EventId,
    state: SessionState,
    generation: u64,
    lease: Option<Arc<Mutex<DeviceLease>>>,
    decode_task: Option<JoinHandle<()>>,
    scans_completed: u32,
    last_outcome: Option<SessionOutcome>,
    last_error: Option<String>,
    opened_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ScanSession {
    pub fn new(kind: KindTag, event_id: EventId, now: DateTime<Utc>) -> Self {
        Self {
            id: SessionId::generate(),
            kind,
            event_id,
            state: SessionState::Idle,
            generation: 0,
            lease: None,
            decode_task: None,
            scans_completed: 0,
            last_outcome: None,
            last_error: None,
            opened_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn kind(&self) -> KindTag {
        self.kind
    }

    pub fn event_id(&self) -> &EventId {
        &self.event_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation && self.state == SessionState::Decoding
    }

    pub fn apply(
        &mut self,
        event: SessionEvent,
        now: DateTime<Utc>,
    ) -> Result<SessionState, InvalidTransition> {
        self.state = self.state.apply(event)?;
        self.updated_at = now;
        Ok(self.state)
    }

    pub fn attach_device(
        &mut self,
        lease: DeviceLease,
        now: DateTime<Utc>,
    ) -> Result<(), InvalidTransition> {
        self.apply(SessionEvent::Acquired, now)?;
        self.lease = Some(Arc::new(Mutex::new(lease)));
        Ok(())
    }

    pub fn fail_acquire(
        &mut self,
        err: &DeviceError,
        now: DateTime<Utc>,
    ) -> Result<(), InvalidTransition> {
        let event = match err {
            DeviceError::PermissionDenied => SessionEvent::PermissionDenied,
            DeviceError::Unavailable(_) | DeviceError::Closed => SessionEvent::DeviceFailed,
        };
        self.apply(event, now)?;
        self.last_error = Some(err.to_string());
        Ok(())
    }

    /// Moves to `Decoding` and hands out what the decode task needs.
    pub fn begin_decode(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<(u64, Arc<Mutex<DeviceLease>>), AppError> {
        match self.state {
            SessionState::PermissionDenied => {
                return Err(AppError::DeviceUnavailable(DeviceError::PermissionDenied));
            }
            SessionState::DeviceError => {
                return Err(AppError::DeviceUnavailable(DeviceError::Unavailable(
                    self.last_error
                        .clone()
                        .unwrap_or_else(|| "device error".to_string()),
                )));
            }
            _ => {}
        }
        let next = self.state.apply(SessionEvent::StartScan)?;
        let lease = self
            .lease
            .clone()
            .ok_or(AppError::DeviceUnavailable(DeviceError::Closed))?;
        self.state = next;
        self.updated_at = now;
        self.generation += 1;
        self.last_error = None;
        Ok((self.generation, lease))
    }

    pub fn set_decode_task(&mut self, task: JoinHandle<()>) {
        if let Some(previous) = self.decode_task.replace(task) {
            previous.abort();
        }
    }

    /// Records the result of decode `generation`. Returns false when the
    /// result is stale and was dropped.
    pub fn finish_decode(
        &mut self,
        generation: u64,
        result: Result<SessionOutcome, String>,
        now: DateTime<Utc>,
    ) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        match result {
            Ok(outcome) => {
                self.last_outcome = Some(outcome);
                self.last_error = None;
                self.scans_completed += 1;
            }
            Err(message) => {
                self.last_outcome = None;
                self.last_error = Some(message);
            }
        }
        self.decode_task = None;
        self.apply(SessionEvent::Decoded, now).is_ok()
    }

    /// The device failed mid-decode: the session becomes `DeviceError` and
    /// gives the device back.
    pub async fn fail_decode(
        &mut self,
        generation: u64,
        err: &DeviceError,
        now: DateTime<Utc>,
    ) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.decode_task = None;
        self.last_error = Some(err.to_string());
        let applied = self.apply(SessionEvent::DeviceFailed, now).is_ok();
        self.release_device().await;
        applied
    }

    pub fn rescan(&mut self, now: DateTime<Utc>) -> Result<(), InvalidTransition> {
        self.apply(SessionEvent::Rescan, now).map(|_| ())
    }

    /// Cancels any in-flight decode and releases the device. Safe to call
    /// more than once; returns true only when a device was released.
    pub async fn close(&mut self, now: DateTime<Utc>) -> bool {
        self.generation += 1;
        if let Some(task) = self.decode_task.take() {
            task.abort();
        }
        let released = self.release_device().await;
        self.state = SessionState::Idle;
        self.updated_at = now;
        released
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            session_id: self.id,
            kind: self.kind,
            event_id: self.event_id.clone(),
            state: self.state,
            busy: self.state.is_busy(),
            scans_completed: self.scans_completed,
            last_outcome: self.last_outcome.clone(),
            last_error: self.last_error.clone(),
            opened_at: self.opened_at,
            updated_at: self.updated_at,
        }
    }

    async fn release_device(&mut self) -> bool {
        match self.lease.take() {
            Some(lease) => lease.lock().await.release(),
            None => false,
        }
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        if let Some(task) = self.decode_task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixed_time, ScriptedScanner};
    use crate::Metrics;
    use checkin_domain::ports::Scanner;

    async fn ready_session(scanner: &ScriptedScanner) -> ScanSession {
        let mut session = ScanSession::new(KindTag::Ticket, EventId::new("101"), fixed_time());
        session.apply(SessionEvent::Open, fixed_time()).expect("open");
        let device = scanner.acquire().await.expect("device");
        session
            .attach_device(
                DeviceLease::new(device, Arc::new(Metrics::default())),
                fixed_time(),
            )
            .expect("attach");
        session
    }

    #[tokio::test]
    async fn stale_generation_is_discarded() {
        let scanner = ScriptedScanner::default();
        let mut session = ready_session(&scanner).await;
        let (generation, _lease) = session.begin_decode(fixed_time()).expect("decode");

        session.close(fixed_time()).await;
        let applied = session.finish_decode(
            generation,
            Err("late result".to_string()),
            fixed_time(),
        );
        assert!(!applied);
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.view().last_error.is_none());
    }

    #[tokio::test]
    async fn close_twice_releases_once() {
        let scanner = ScriptedScanner::default();
        let mut session = ready_session(&scanner).await;
        assert!(session.close(fixed_time()).await);
        assert!(!session.close(fixed_time()).await);
        assert_eq!(scanner.releases(), 1);
    }

    #[tokio::test]
    async fn denied_session_refuses_to_scan() {
        let mut session = ScanSession::new(KindTag::Crew, EventId::new("101"), fixed_time());
        session.apply(SessionEvent::Open, fixed_time()).expect("open");
        session
            .fail_acquire(&DeviceError::PermissionDenied, fixed_time())
            .expect("fail");
        assert_eq!(session.state(), SessionState::PermissionDenied);
        let Err(err) = session.begin_decode(fixed_time()) else {
            panic!("denied session started decoding");
        };
        assert!(matches!(
            err,
            AppError::DeviceUnavailable(DeviceError::PermissionDenied)
        ));
    }

    #[tokio::test]
    async fn scan_during_acquisition_is_a_conflict() {
        let mut session = ScanSession::new(KindTag::Ticket, EventId::new("101"), fixed_time());
        session.apply(SessionEvent::Open, fixed_time()).expect("open");
        let Err(err) = session.begin_decode(fixed_time()) else {
            panic!("decode started before the scanner was acquired");
        };
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(session.state(), SessionState::AcquiringInput);
    }
}
