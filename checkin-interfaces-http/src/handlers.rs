pub mod attendance_handlers;
pub mod ops_handlers;
pub mod session_handlers;
