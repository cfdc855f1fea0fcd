//! CLI command implementations
//!
//! ## Board commands
//!
//! `dump` opens a transport and reads the SPD EEPROM through it.
//!
//! ## Host commands
//!
//! `analyse` works on a saved console capture and never touches a bus.

pub mod analyse;
pub mod dump;
mod list;

pub use list::list_transports;
