//! spdread-linux-i2c - Linux i2c-dev support
//!
//! This crate reads SPD EEPROMs through the Linux `/dev/i2c-N` character
//! devices.
//!
//! # Overview
//!
//! Every I2C adapter the kernel knows about (SMBus controllers on the
//! chipset, FPGA I2C cores, USB bridges) shows up as `/dev/i2c-N` once the
//! `i2c-dev` module is loaded. The offset write and the data read are issued
//! as a single `I2C_RDWR` transaction so the EEPROM sees a repeated START.
//!
//! # Example
//!
//! ```no_run
//! use spdread_linux_i2c::{LinuxI2c, LinuxI2cConfig};
//! use spdread_core::eeprom::{EepromReader, ReadRequest};
//!
//! let mut i2c = LinuxI2c::open(&LinuxI2cConfig::for_bus(1))?;
//! let image = EepromReader::new(&mut i2c).read(&ReadRequest::ddr4())?;
//! println!("{:?}", image);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Usage with spdread CLI
//!
//! ```bash
//! # Dump the DIMM in the first slot of bus 1
//! spdread dump -t linux_i2c:bus=1
//!
//! # Second slot, reading past an ee1004 driver bound to it
//! spdread dump -t linux_i2c:dev=/dev/i2c-1,force=yes -a 0x51
//! ```
//!
//! # System Requirements
//!
//! - Linux kernel with `CONFIG_I2C_CHARDEV`
//! - Read/write access to `/dev/i2c-N` (usually the `i2c` group)
//! - An adapter that supports plain I2C messages, not SMBus only

pub mod device;
pub mod error;

// Re-exports
pub use device::{failure_from_errno, parse_options, LinuxI2c, LinuxI2cConfig};
pub use error::{LinuxI2cError, Result};

/// Open a Linux I2C device and return a boxed I2cMaster
///
/// This is a convenience function for use in the CLI transport dispatch.
///
/// # Options
///
/// - `dev=/dev/i2c-1` - device path
/// - `bus=1` - shorthand for `dev=/dev/i2c-1`
/// - `force=yes` - claim the target even if a kernel driver owns it
pub fn open_linux_i2c(
    options: &[(&str, &str)],
) -> std::result::Result<
    Box<dyn spdread_core::i2c::I2cMaster + Send>,
    Box<dyn std::error::Error>,
> {
    let config = parse_options(options)?;
    let i2c = LinuxI2c::open(&config)?;
    Ok(Box::new(i2c))
}
