//! Verified SPD EEPROM reads
//!
//! The reader fetches the SPD region twice over one bus acquisition and
//! only hands out an image when both samples agree.

mod reader;
mod request;
mod verify;

pub use reader::{EepromReader, SpdImage};
pub use request::*;
pub use verify::{first_mismatch, Mismatch};
