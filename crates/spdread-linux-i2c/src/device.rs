//! Linux I2C device implementation
//!
//! This module provides the `LinuxI2c` struct that implements the
//! `I2cMaster` trait using Linux's i2c-dev interface.

use crate::error::{LinuxI2cError, Result};

use bitflags::bitflags;
use spdread_core::error::{Error as CoreError, Result as CoreResult, TransferFailure};
use spdread_core::i2c::{I2cMaster, MAX_7BIT_ADDRESS};

use std::fs::{File, OpenOptions};
use std::os::unix::io::AsRawFd;

/// Linux i2c-dev ioctl constants
mod ioctl {
    use nix::{ioctl_read_bad, ioctl_write_int_bad, ioctl_write_ptr_bad};

    /// Use this target address
    const I2C_SLAVE: u16 = 0x0703;
    /// Use this target address, even if it is claimed by a driver
    const I2C_SLAVE_FORCE: u16 = 0x0706;
    /// Get the adapter functionality mask
    const I2C_FUNCS: u16 = 0x0705;
    /// Combined R/W transfer (one STOP only)
    const I2C_RDWR: u16 = 0x0707;

    ioctl_write_int_bad!(i2c_slave, I2C_SLAVE);
    ioctl_write_int_bad!(i2c_slave_force, I2C_SLAVE_FORCE);
    ioctl_read_bad!(i2c_funcs, I2C_FUNCS, libc::c_ulong);
    ioctl_write_ptr_bad!(i2c_rdwr, I2C_RDWR, super::I2cRdwrIoctlData);
}

bitflags! {
    /// `struct i2c_msg` flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MsgFlags: u16 {
        /// Read data, from target to master
        const RD = 0x0001;
        /// Ten bit target address
        const TEN = 0x0010;
        /// Skip the repeated START before this message
        const NOSTART = 0x4000;
    }
}

bitflags! {
    /// Adapter functionality reported by `I2C_FUNCS`
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Functionality: libc::c_ulong {
        /// Plain I2C messages (`I2C_RDWR`)
        const I2C = 0x0000_0001;
        /// Ten bit addressing
        const TEN_BIT_ADDR = 0x0000_0002;
        /// Protocol mangling flags
        const PROTOCOL_MANGLING = 0x0000_0004;
        /// SMBus packet error checking
        const SMBUS_PEC = 0x0000_0008;
        /// Messages without repeated START
        const NOSTART = 0x0000_0010;
    }
}

/// `struct i2c_msg` for the I2C_RDWR ioctl
/// This must match the kernel's layout
#[repr(C)]
#[derive(Debug)]
struct I2cMsg {
    addr: u16,     // __u16 addr
    flags: u16,    // __u16 flags
    len: u16,      // __u16 len
    buf: *mut u8,  // __u8 *buf
}

/// `struct i2c_rdwr_ioctl_data`
#[repr(C)]
#[derive(Debug)]
pub(crate) struct I2cRdwrIoctlData {
    msgs: *mut I2cMsg, // struct i2c_msg *msgs
    nmsgs: u32,        // __u32 nmsgs
}

/// Configuration for opening a Linux I2C device
#[derive(Debug, Clone, Default)]
pub struct LinuxI2cConfig {
    /// Device path (e.g., "/dev/i2c-0")
    pub device: String,
    /// Claim the target even if a kernel driver (ee1004, at24) owns it
    pub force: bool,
}

impl LinuxI2cConfig {
    /// Create a new configuration with the given device path
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            ..Default::default()
        }
    }

    /// Create a configuration for bus number `bus`
    pub fn for_bus(bus: u32) -> Self {
        Self::new(format!("/dev/i2c-{}", bus))
    }

    /// Claim the target even if a kernel driver is bound to it
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// Linux I2C transport using the i2c-dev interface
pub struct LinuxI2c {
    /// File handle for the i2c-dev node
    file: File,
    /// Path, for diagnostics
    path: String,
    /// Adapter capabilities
    funcs: Functionality,
    /// Current target address
    target: Option<u8>,
    /// Use I2C_SLAVE_FORCE
    force: bool,
}

impl LinuxI2c {
    /// Open a Linux I2C device with the given configuration
    pub fn open(config: &LinuxI2cConfig) -> Result<Self> {
        if config.device.is_empty() {
            return Err(LinuxI2cError::NoDevice);
        }

        log::debug!("linux_i2c: Opening device {}", config.device);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&config.device)
            .map_err(|e| LinuxI2cError::OpenFailed {
                path: config.device.clone(),
                source: e,
            })?;

        let mut raw: libc::c_ulong = 0;
        unsafe {
            ioctl::i2c_funcs(file.as_raw_fd(), &mut raw).map_err(|e| {
                LinuxI2cError::FuncsFailed(std::io::Error::from_raw_os_error(e as i32))
            })?;
        }
        let funcs = Functionality::from_bits_truncate(raw);
        log::debug!("linux_i2c: Adapter functionality {:?}", funcs);

        if !funcs.contains(Functionality::I2C) {
            return Err(LinuxI2cError::UnsupportedAdapter {
                path: config.device.clone(),
            });
        }

        log::info!("linux_i2c: Opened {}", config.device);

        Ok(Self {
            file,
            path: config.device.clone(),
            funcs,
            target: None,
            force: config.force,
        })
    }

    /// Open a device with default settings
    pub fn open_device(device: &str) -> Result<Self> {
        Self::open(&LinuxI2cConfig::new(device))
    }

    /// Adapter capabilities
    pub fn functionality(&self) -> Functionality {
        self.funcs
    }

    /// Claim `address` for this file descriptor
    fn claim(&mut self, address: u8) -> Result<()> {
        let fd = self.file.as_raw_fd();
        let arg = libc::c_int::from(address);
        let ret = unsafe {
            if self.force {
                ioctl::i2c_slave_force(fd, arg)
            } else {
                ioctl::i2c_slave(fd, arg)
            }
        };
        ret.map_err(|e| LinuxI2cError::SetTargetFailed {
            address,
            source: std::io::Error::from_raw_os_error(e as i32),
        })?;
        log::debug!("linux_i2c: {} target 0x{:02x}", self.path, address);
        Ok(())
    }

    /// Write then read as one I2C_RDWR transaction with a repeated START
    fn i2c_transfer(&mut self, address: u8, write: &[u8], read: &mut [u8]) -> Result<()> {
        let write_len = u16::try_from(write.len())
            .map_err(|_| LinuxI2cError::InvalidParameter("write too long".into()))?;
        let read_len = u16::try_from(read.len())
            .map_err(|_| LinuxI2cError::InvalidParameter("read too long".into()))?;

        let mut msgs = Vec::with_capacity(2);
        if !write.is_empty() {
            msgs.push(I2cMsg {
                addr: u16::from(address),
                flags: 0,
                len: write_len,
                // The kernel only reads from write buffers
                buf: write.as_ptr() as *mut u8,
            });
        }
        if !read.is_empty() {
            msgs.push(I2cMsg {
                addr: u16::from(address),
                flags: MsgFlags::RD.bits(),
                len: read_len,
                buf: read.as_mut_ptr(),
            });
        }
        if msgs.is_empty() {
            return Ok(());
        }

        let data = I2cRdwrIoctlData {
            msgs: msgs.as_mut_ptr(),
            nmsgs: msgs.len() as u32,
        };

        unsafe {
            ioctl::i2c_rdwr(self.file.as_raw_fd(), &data).map_err(|e| {
                LinuxI2cError::TransferFailed(std::io::Error::from_raw_os_error(e as i32))
            })?;
        }

        Ok(())
    }
}

/// Map an errno from the i2c core onto a transfer failure
///
/// Follows Documentation/i2c/fault-codes.rst.
pub fn failure_from_errno(errno: i32) -> TransferFailure {
    match errno {
        libc::ENXIO | libc::ENODEV | libc::EREMOTEIO => TransferFailure::Nack,
        libc::EAGAIN => TransferFailure::ArbitrationLost,
        libc::ETIMEDOUT => TransferFailure::Timeout,
        libc::EBUSY => TransferFailure::Busy,
        libc::EINVAL => TransferFailure::BadArgument,
        libc::EOVERFLOW | libc::EMSGSIZE => TransferFailure::OutOfRange,
        _ => TransferFailure::Error,
    }
}

impl I2cMaster for LinuxI2c {
    fn set_target(&mut self, address: u8) -> CoreResult<()> {
        if address > MAX_7BIT_ADDRESS {
            return Err(CoreError::TransportUnavailable);
        }
        self.claim(address).map_err(|e| {
            log::error!("linux_i2c: {}", e);
            CoreError::TransportUnavailable
        })?;
        self.target = Some(address);
        Ok(())
    }

    fn write_read(&mut self, write: &[u8], read: &mut [u8]) -> CoreResult<()> {
        let address = self.target.ok_or(CoreError::TransportUnavailable)?;
        self.i2c_transfer(address, write, read).map_err(|e| {
            log::debug!("linux_i2c: {}", e);
            match e {
                LinuxI2cError::TransferFailed(io) => CoreError::TransferFailed(
                    io.raw_os_error()
                        .map(failure_from_errno)
                        .unwrap_or(TransferFailure::Error),
                ),
                LinuxI2cError::InvalidParameter(_) => TransferFailure::OutOfRange.into(),
                _ => TransferFailure::Error.into(),
            }
        })
    }
}

/// Parse transport options from a list of key-value pairs
pub fn parse_options(options: &[(&str, &str)]) -> std::result::Result<LinuxI2cConfig, String> {
    let mut config = LinuxI2cConfig::default();

    for (key, value) in options {
        match *key {
            "dev" => {
                config.device = value.to_string();
            }
            "bus" => {
                let bus: u32 = value
                    .parse()
                    .map_err(|_| format!("Invalid bus number: {}", value))?;
                config.device = format!("/dev/i2c-{}", bus);
            }
            "force" => {
                config.force = match *value {
                    "1" | "yes" | "true" => true,
                    "0" | "no" | "false" => false,
                    _ => return Err(format!("Invalid force value: {}", value)),
                };
            }
            _ => {
                log::warn!("linux_i2c: Unknown option: {}={}", key, value);
            }
        }
    }

    if config.device.is_empty() {
        return Err("No device specified. Use dev=/dev/i2c-N or bus=N".to_string());
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options() {
        let config = parse_options(&[("dev", "/dev/i2c-3")]).unwrap();
        assert_eq!(config.device, "/dev/i2c-3");
        assert!(!config.force);

        let config = parse_options(&[("bus", "7"), ("force", "yes")]).unwrap();
        assert_eq!(config.device, "/dev/i2c-7");
        assert!(config.force);

        assert!(parse_options(&[]).is_err());
        assert!(parse_options(&[("bus", "x")]).is_err());
        assert!(parse_options(&[("dev", "/dev/i2c-0"), ("force", "maybe")]).is_err());
    }

    #[test]
    fn test_errno_mapping() {
        assert_eq!(failure_from_errno(libc::ENXIO), TransferFailure::Nack);
        assert_eq!(failure_from_errno(libc::EREMOTEIO), TransferFailure::Nack);
        assert_eq!(failure_from_errno(libc::EAGAIN), TransferFailure::ArbitrationLost);
        assert_eq!(failure_from_errno(libc::ETIMEDOUT), TransferFailure::Timeout);
        assert_eq!(failure_from_errno(libc::EIO), TransferFailure::Error);
    }

    #[test]
    fn test_open_missing_device() {
        let err = LinuxI2c::open_device("/nonexistent/i2c-99").err().unwrap();
        assert!(matches!(err, LinuxI2cError::OpenFailed { .. }));
        assert!(matches!(
            LinuxI2c::open(&LinuxI2cConfig::default()),
            Err(LinuxI2cError::NoDevice)
        ));
    }

    #[test]
    fn test_ioctl_struct_layout() {
        // Three u16 fields padded to pointer alignment, then the buffer
        assert_eq!(
            std::mem::size_of::<I2cMsg>(),
            8 + std::mem::size_of::<*mut u8>()
        );
    }
}
