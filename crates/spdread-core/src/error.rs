//! Error types for spdread-core
//!
//! This module provides a no_std compatible error type that can be used
//! throughout the crate.

use core::fmt;

/// Reason an I2C transfer did not complete
///
/// One variant per non-success status a bus driver can report. Transports
/// that surface OS error numbers map them onto the closest variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TransferFailure {
    /// Generic driver error
    Error,
    /// Transfer timed out
    Timeout,
    /// Driver rejected an argument
    BadArgument,
    /// Argument outside the range the driver accepts
    OutOfRange,
    /// Target did not acknowledge
    Nack,
    /// Another controller won arbitration
    ArbitrationLost,
    /// Controller busy
    Busy,
    /// Driver returned its "true" sentinel instead of success
    AckSentinel,
    /// Status code the driver does not document
    Unknown(i32),
}

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The bus could not be opened or the target could not be addressed
    TransportUnavailable,
    /// The transport reported a failed transfer
    TransferFailed(TransferFailure),
    /// The two reads of the EEPROM disagree
    VerificationMismatch {
        /// Offset of the first differing byte, relative to the read start
        offset: usize,
        /// Value seen by the first read
        first: u8,
        /// Value seen by the second read
        second: u8,
    },
    /// Requested window does not fit in the device address space
    RequestOutOfRange {
        /// Start offset inside the device
        offset: u16,
        /// Requested length
        len: usize,
        /// Addressable size of the device
        capacity: usize,
    },
}

impl fmt::Display for TransferFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "ERROR"),
            Self::Timeout => write!(f, "TIMEOUT"),
            Self::BadArgument => write!(f, "BAD_ARG"),
            Self::OutOfRange => write!(f, "RANGE"),
            Self::Nack => write!(f, "NACK error"),
            Self::ArbitrationLost => write!(f, "ARB_LOST error"),
            Self::Busy => write!(f, "BUSY"),
            Self::AckSentinel => write!(f, "TRUE"),
            Self::Unknown(code) => write!(f, "unknown status code {}", code),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransportUnavailable => write!(f, "I2C transport unavailable"),
            Self::TransferFailed(failure) => write!(f, "I2C transfer failed: {}", failure),
            Self::VerificationMismatch {
                offset,
                first,
                second,
            } => write!(
                f,
                "Difference in EEPROM download at address 0x{:03x}: 0x{:02x} != 0x{:02x}",
                offset, first, second
            ),
            Self::RequestOutOfRange {
                offset,
                len,
                capacity,
            } => write!(
                f,
                "read of {} bytes at 0x{:04x} exceeds device size of {} bytes",
                len, offset, capacity
            ),
        }
    }
}

impl From<TransferFailure> for Error {
    fn from(failure: TransferFailure) -> Self {
        Self::TransferFailed(failure)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
