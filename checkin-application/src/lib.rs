// Check-in Application Layer

pub mod commands;
pub mod dtos;
pub mod error;
pub mod metrics;
pub mod ops;
pub mod queries;
pub mod roster;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::AppError;
pub use metrics::Metrics;
pub use roster::{RosterRegistry, Rostered};
pub use state::AppState;
