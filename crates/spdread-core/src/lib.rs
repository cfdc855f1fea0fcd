//! spdread-core - Core library for DDR4 SPD EEPROM bring-up
//!
//! This crate reads the Serial Presence Detect EEPROM of a DDR4 module over
//! I2C, verifies the read by sampling it twice, and decodes the JEDEC fields
//! that matter during board bring-up. It is `no_std` compatible so the same
//! code can run on a soft processor next to the memory controller.
//!
//! # Features
//!
//! - `std` - Enable standard library support (includes `alloc`) and the
//!   console capture parser
//! - `alloc` - Enable heap allocation
//! - `serde` - Derive `Serialize` for decoded reports
//!
//! # Example
//!
//! ```ignore
//! use spdread_core::{eeprom::{EepromReader, ReadRequest}, spd, i2c::I2cMaster};
//!
//! fn show<M: I2cMaster>(bus: &mut M) -> spdread_core::Result<()> {
//!     let image = EepromReader::new(bus).read(&ReadRequest::ddr4())?;
//!     if let Some(region) = image.ddr4_region() {
//!         println!("{}", spd::decode(region));
//!     }
//!     Ok(())
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

#[cfg(feature = "std")]
pub mod capture;
pub mod dump;
pub mod eeprom;
pub mod error;
pub mod i2c;
pub mod spd;

pub use error::{Error, Result, TransferFailure};
