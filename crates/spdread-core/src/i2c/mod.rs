//! I2C transport traits and status codes
//!
//! This module defines the trait every bus driver implements so the reader
//! can run against real hardware or an in-memory EEPROM alike.

mod status;
mod traits;

pub use status::StatusCode;
pub use traits::*;
