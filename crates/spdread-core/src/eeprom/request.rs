//! Transaction descriptor for SPD reads

use crate::error::{Error, Result};

/// Conventional I2C address of the SPD EEPROM on DIMM slot 0
pub const SPD_DEFAULT_ADDRESS: u8 = 0x50;

/// Addressable size of a DDR4 SPD EEPROM
pub const SPD_EEPROM_SIZE: usize = 512;

/// Size of the DDR4 SPD region that is downloaded and decoded
pub const SPD_DDR4_LEN: usize = 384;

/// Description of one EEPROM read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadRequest {
    /// 7-bit target address
    pub address: u8,
    /// Start offset inside the device, sent big-endian
    pub offset: u16,
    /// Number of bytes to read
    pub len: usize,
}

impl Default for ReadRequest {
    fn default() -> Self {
        Self::ddr4()
    }
}

impl ReadRequest {
    /// Standard DDR4 request: 384 bytes from offset 0 at address 0x50
    pub const fn ddr4() -> Self {
        Self {
            address: SPD_DEFAULT_ADDRESS,
            offset: 0,
            len: SPD_DDR4_LEN,
        }
    }

    /// Set the target address
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Set the start offset
    pub fn with_offset(mut self, offset: u16) -> Self {
        self.offset = offset;
        self
    }

    /// Set the number of bytes to read
    pub fn with_len(mut self, len: usize) -> Self {
        self.len = len;
        self
    }

    /// Offset bytes written before the read phase
    pub fn offset_bytes(&self) -> [u8; 2] {
        self.offset.to_be_bytes()
    }

    /// Check the request fits the device and the address is 7-bit
    pub fn validate(&self) -> Result<()> {
        if self.address > crate::i2c::MAX_7BIT_ADDRESS {
            return Err(Error::TransportUnavailable);
        }
        let end = (self.offset as usize).checked_add(self.len);
        if end.map_or(true, |end| end > SPD_EEPROM_SIZE) {
            return Err(Error::RequestOutOfRange {
                offset: self.offset,
                len: self.len,
                capacity: SPD_EEPROM_SIZE,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_request() {
        let req = ReadRequest::default();
        assert_eq!(req.address, 0x50);
        assert_eq!(req.offset_bytes(), [0x00, 0x00]);
        assert_eq!(req.len, 384);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_offset_is_big_endian() {
        let req = ReadRequest::ddr4().with_offset(0x0180);
        assert_eq!(req.offset_bytes(), [0x01, 0x80]);
    }

    #[test]
    fn test_request_must_fit_device() {
        assert!(ReadRequest::ddr4().with_len(512).validate().is_ok());
        assert_eq!(
            ReadRequest::ddr4().with_offset(0x100).validate(),
            Err(Error::RequestOutOfRange {
                offset: 0x100,
                len: 384,
                capacity: 512
            })
        );
    }

    #[test]
    fn test_huge_length_is_out_of_range() {
        assert_eq!(
            ReadRequest::ddr4()
                .with_offset(1)
                .with_len(usize::MAX)
                .validate(),
            Err(Error::RequestOutOfRange {
                offset: 1,
                len: usize::MAX,
                capacity: 512
            })
        );
    }

    #[test]
    fn test_rejects_8bit_address() {
        assert_eq!(
            ReadRequest::ddr4().with_address(0xA0).validate(),
            Err(Error::TransportUnavailable)
        );
    }
}
