pub mod simulated_scanner;

pub use simulated_scanner::*;
