pub mod device_lease;
pub mod scan_session;
pub mod session_hub;

pub use device_lease::DeviceLease;
pub use scan_session::ScanSession;
pub use session_hub::ScanSessionHub;
