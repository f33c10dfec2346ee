pub mod checkin_commands;
pub mod roster_commands;
pub mod session_commands;
