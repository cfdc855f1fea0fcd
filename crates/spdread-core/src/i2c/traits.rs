//! I2C master trait definitions

use crate::error::Result;

/// Highest valid 7-bit target address
pub const MAX_7BIT_ADDRESS: u8 = 0x7F;

/// I2C master trait
///
/// This trait represents an open bus that can address a target device and
/// run combined transactions against it. Access is exclusive for the
/// lifetime of the `&mut` borrow; a driver shared between threads must be
/// serialised outside this trait.
///
/// ## Example: vendor HAL binding
///
/// ```ignore
/// impl I2cMaster for AvalonI2c {
///     fn set_target(&mut self, address: u8) -> Result<()> {
///         unsafe { alt_avalon_i2c_master_target_set(self.dev, address as u32) };
///         Ok(())
///     }
///
///     fn write_read(&mut self, write: &[u8], read: &mut [u8]) -> Result<()> {
///         let status = unsafe { alt_avalon_i2c_master_tx_rx(/* ... */) };
///         StatusCode::from_raw(status).into_result()
///     }
/// }
/// ```
pub trait I2cMaster {
    /// Select the 7-bit address used by subsequent transactions
    ///
    /// Returns `Error::TransportUnavailable` when the target cannot be
    /// addressed (for example because another driver has claimed it).
    fn set_target(&mut self, address: u8) -> Result<()>;

    /// Write `write`, then read `read.len()` bytes without releasing the bus
    ///
    /// The read phase must follow a repeated START so that no other
    /// controller can move the device's internal pointer in between.
    fn write_read(&mut self, write: &[u8], read: &mut [u8]) -> Result<()>;
}

impl<M: I2cMaster + ?Sized> I2cMaster for &mut M {
    fn set_target(&mut self, address: u8) -> Result<()> {
        (**self).set_target(address)
    }

    fn write_read(&mut self, write: &[u8], read: &mut [u8]) -> Result<()> {
        (**self).write_read(write, read)
    }
}

// Blanket impl for boxed masters so the CLI can hold any transport
#[cfg(feature = "alloc")]
impl I2cMaster for alloc::boxed::Box<dyn I2cMaster + Send> {
    fn set_target(&mut self, address: u8) -> Result<()> {
        (**self).set_target(address)
    }

    fn write_read(&mut self, write: &[u8], read: &mut [u8]) -> Result<()> {
        (**self).write_read(write, read)
    }
}
