//! Driver status codes
//!
//! Bus drivers written against a C HAL hand back a small signed status code.
//! `StatusCode` gives those codes names and folds every non-success value
//! into a [`TransferFailure`].

use crate::error::{Result, TransferFailure};
use core::fmt;

/// Status returned by a vendor I2C driver call
///
/// Raw values follow the Avalon I2C HAL numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// "True" sentinel returned by query functions
    True,
    /// Transfer completed
    Success,
    /// Generic error
    Error,
    /// Timed out waiting for the bus
    Timeout,
    /// Invalid argument
    BadArgument,
    /// Argument out of range
    OutOfRange,
    /// Target did not acknowledge
    NackError,
    /// Arbitration lost to another controller
    ArbitrationLostError,
    /// Controller busy
    Busy,
    /// Undocumented code
    Other(i32),
}

impl StatusCode {
    /// Raw value of `True`
    pub const RAW_TRUE: i32 = 1;
    /// Raw value of `Success`
    pub const RAW_SUCCESS: i32 = 0;
    /// Raw value of `Error`
    pub const RAW_ERROR: i32 = -1;
    /// Raw value of `Timeout`
    pub const RAW_TIMEOUT: i32 = -2;
    /// Raw value of `BadArgument`
    pub const RAW_BAD_ARG: i32 = -5;
    /// Raw value of `OutOfRange`
    pub const RAW_RANGE: i32 = -7;
    /// Raw value of `NackError`
    pub const RAW_NACK_ERR: i32 = -9;
    /// Raw value of `ArbitrationLostError`
    pub const RAW_ARB_LOST_ERR: i32 = -10;
    /// Raw value of `Busy`
    pub const RAW_BUSY: i32 = -11;

    /// Interpret a raw driver status
    pub const fn from_raw(raw: i32) -> Self {
        match raw {
            Self::RAW_TRUE => Self::True,
            Self::RAW_SUCCESS => Self::Success,
            Self::RAW_ERROR => Self::Error,
            Self::RAW_TIMEOUT => Self::Timeout,
            Self::RAW_BAD_ARG => Self::BadArgument,
            Self::RAW_RANGE => Self::OutOfRange,
            Self::RAW_NACK_ERR => Self::NackError,
            Self::RAW_ARB_LOST_ERR => Self::ArbitrationLostError,
            Self::RAW_BUSY => Self::Busy,
            other => Self::Other(other),
        }
    }

    /// Raw driver value for this status
    pub const fn to_raw(self) -> i32 {
        match self {
            Self::True => Self::RAW_TRUE,
            Self::Success => Self::RAW_SUCCESS,
            Self::Error => Self::RAW_ERROR,
            Self::Timeout => Self::RAW_TIMEOUT,
            Self::BadArgument => Self::RAW_BAD_ARG,
            Self::OutOfRange => Self::RAW_RANGE,
            Self::NackError => Self::RAW_NACK_ERR,
            Self::ArbitrationLostError => Self::RAW_ARB_LOST_ERR,
            Self::Busy => Self::RAW_BUSY,
            Self::Other(raw) => raw,
        }
    }

    /// Failure subtype for this status, or `None` for `Success`
    pub const fn failure(self) -> Option<TransferFailure> {
        match self {
            Self::Success => None,
            Self::True => Some(TransferFailure::AckSentinel),
            Self::Error => Some(TransferFailure::Error),
            Self::Timeout => Some(TransferFailure::Timeout),
            Self::BadArgument => Some(TransferFailure::BadArgument),
            Self::OutOfRange => Some(TransferFailure::OutOfRange),
            Self::NackError => Some(TransferFailure::Nack),
            Self::ArbitrationLostError => Some(TransferFailure::ArbitrationLost),
            Self::Busy => Some(TransferFailure::Busy),
            Self::Other(raw) => Some(TransferFailure::Unknown(raw)),
        }
    }

    /// Convert to a core `Result`; only `Success` is `Ok`
    pub fn into_result(self) -> Result<()> {
        match self.failure() {
            None => Ok(()),
            Some(failure) => Err(failure.into()),
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::True => write!(f, "Status code = TRUE"),
            Self::Success => write!(f, "Status code = SUCCESS"),
            Self::Error => write!(f, "Status code = ERROR"),
            Self::Timeout => write!(f, "Status code = TIMEOUT"),
            Self::BadArgument => write!(f, "Status code = BAD_ARG"),
            Self::OutOfRange => write!(f, "Status code = RANGE"),
            Self::NackError => write!(f, "Status code = NACK error"),
            Self::ArbitrationLostError => write!(f, "Status code = ARB_LOST error"),
            Self::Busy => write!(f, "Status code = BUSY"),
            Self::Other(raw) => write!(f, "Unknown status code = {}", raw),
        }
    }
}
