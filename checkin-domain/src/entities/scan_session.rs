// Scan session state machine
//
// Idle -> AcquiringInput -> Ready -> Decoding -> ResultShown -> Ready ...
// AcquiringInput ends in PermissionDenied or DeviceError when the scanner
// cannot be acquired; both only leave through Close. Close returns any
// state to Idle.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InvalidTransition;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    #[default]
    Idle,
    AcquiringInput,
    Ready,
    Decoding,
    ResultShown,
    PermissionDenied,
    DeviceError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEvent {
    Open,
    Acquired,
    PermissionDenied,
    DeviceFailed,
    StartScan,
    Decoded,
    Rescan,
    Close,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "IDLE",
            SessionState::AcquiringInput => "ACQUIRING_INPUT",
            SessionState::Ready => "READY",
            SessionState::Decoding => "DECODING",
            SessionState::ResultShown => "RESULT_SHOWN",
            SessionState::PermissionDenied => "PERMISSION_DENIED",
            SessionState::DeviceError => "DEVICE_ERROR",
        }
    }

    pub fn apply(self, event: SessionEvent) -> Result<SessionState, InvalidTransition> {
        use SessionEvent as E;
        use SessionState as S;

        let next = match (self, event) {
            (_, E::Close) => S::Idle,
            (S::Idle, E::Open) => S::AcquiringInput,
            (S::AcquiringInput, E::Acquired) => S::Ready,
            (S::AcquiringInput, E::PermissionDenied) => S::PermissionDenied,
            (S::AcquiringInput | S::Decoding, E::DeviceFailed) => S::DeviceError,
            (S::Ready, E::StartScan) => S::Decoding,
            (S::Decoding, E::Decoded) => S::ResultShown,
            (S::ResultShown, E::Rescan) => S::Ready,
            (from, event) => return Err(InvalidTransition { from, event }),
        };
        Ok(next)
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, SessionState::AcquiringInput | SessionState::Decoding)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionEvent::Open => "open",
            SessionEvent::Acquired => "acquired",
            SessionEvent::PermissionDenied => "permission_denied",
            SessionEvent::DeviceFailed => "device_failed",
            SessionEvent::StartScan => "start_scan",
            SessionEvent::Decoded => "decoded",
            SessionEvent::Rescan => "rescan",
            SessionEvent::Close => "close",
        };
        f.write_str(name)
    }
}
