pub mod roster_files;

pub use roster_files::*;
