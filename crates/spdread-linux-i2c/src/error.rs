//! Error types for Linux I2C operations

use thiserror::Error;

/// Linux I2C specific errors
#[derive(Debug, Error)]
pub enum LinuxI2cError {
    /// Failed to open device
    #[error("Failed to open {path}: {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to query adapter functionality
    #[error("Failed to query adapter functionality: {0}")]
    FuncsFailed(#[source] std::io::Error),

    /// Adapter cannot do plain I2C combined transfers
    #[error("{path} does not support plain I2C transfers (SMBus-only adapter?)")]
    UnsupportedAdapter { path: String },

    /// Failed to claim the target address
    #[error("Failed to address 0x{address:02x}: {source}")]
    SetTargetFailed {
        address: u8,
        #[source]
        source: std::io::Error,
    },

    /// I2C transfer failed
    #[error("I2C transfer failed: {0}")]
    TransferFailed(#[source] std::io::Error),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Device not specified
    #[error("No device specified. Use dev=/dev/i2c-N or bus=N")]
    NoDevice,
}

/// Result type for Linux I2C operations
pub type Result<T> = std::result::Result<T, LinuxI2cError>;
