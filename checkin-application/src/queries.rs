pub mod attendance_queries;
pub mod session_queries;
