// Domain value objects
pub mod attendance_status;
pub mod identifiers;
pub mod kind_tag;

pub use attendance_status::*;
pub use identifiers::*;
pub use kind_tag::*;
