// Domain services
pub mod attendance_store;
pub mod classifier;

pub use attendance_store::*;
pub use classifier::*;
