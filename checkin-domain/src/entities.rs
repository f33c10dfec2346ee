// Domain entities
pub mod attendance_record;
pub mod attendance_summary;
pub mod record_kinds;
pub mod record_query;
pub mod runtime_config;
pub mod scan_outcome;
pub mod scan_session;

pub use attendance_record::*;
pub use attendance_summary::*;
pub use record_kinds::*;
pub use record_query::*;
pub use runtime_config::*;
pub use scan_outcome::*;
pub use scan_session::*;
