//! EEPROM reader

use super::request::{ReadRequest, SPD_DDR4_LEN, SPD_EEPROM_SIZE};
use super::verify::first_mismatch;
use crate::error::Result;
use crate::i2c::I2cMaster;

/// Fill pattern for the first sample buffer
const FILL_FIRST: u8 = 0xAA;
/// Fill pattern for the second sample buffer
const FILL_SECOND: u8 = 0xBB;

/// A verified copy of (part of) an SPD EEPROM
#[derive(Clone, PartialEq, Eq)]
pub struct SpdImage {
    data: [u8; SPD_EEPROM_SIZE],
    offset: u16,
    len: usize,
}

impl SpdImage {
    /// Build an image from bytes obtained elsewhere (e.g. a saved dump)
    ///
    /// Bytes beyond the EEPROM size are ignored.
    pub fn from_bytes(offset: u16, bytes: &[u8]) -> Self {
        let len = core::cmp::min(bytes.len(), SPD_EEPROM_SIZE);
        let mut data = [0u8; SPD_EEPROM_SIZE];
        data[..len].copy_from_slice(&bytes[..len]);
        Self { data, offset, len }
    }

    /// The verified bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Device offset of the first byte
    pub fn offset(&self) -> u16 {
        self.offset
    }

    /// Number of verified bytes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the image holds no bytes
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The DDR4 SPD region, if the image starts at 0 and covers it
    pub fn ddr4_region(&self) -> Option<&[u8; SPD_DDR4_LEN]> {
        if self.offset != 0 || self.len < SPD_DDR4_LEN {
            return None;
        }
        self.data[..SPD_DDR4_LEN].try_into().ok()
    }
}

impl core::fmt::Debug for SpdImage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SpdImage")
            .field("offset", &self.offset)
            .field("len", &self.len)
            .finish()
    }
}

/// Reads an SPD EEPROM twice and accepts the data only if both reads agree
pub struct EepromReader<'a, M: I2cMaster + ?Sized> {
    master: &'a mut M,
}

impl<'a, M: I2cMaster + ?Sized> EepromReader<'a, M> {
    /// Create a reader over an open bus
    pub fn new(master: &'a mut M) -> Self {
        Self { master }
    }

    /// Perform the verified read described by `request`
    ///
    /// The target is addressed once, then two write-then-read transactions
    /// fill independent buffers. A failing transfer or any differing byte
    /// aborts the whole read.
    pub fn read(&mut self, request: &ReadRequest) -> Result<SpdImage> {
        request.validate()?;

        let len = request.len;
        let offset = request.offset_bytes();

        let mut first = [FILL_FIRST; SPD_EEPROM_SIZE];
        let mut second = [FILL_SECOND; SPD_EEPROM_SIZE];

        self.master.set_target(request.address)?;
        log::debug!(
            "eeprom: reading {} bytes at 0x{:04x} from 0x{:02x}",
            len,
            request.offset,
            request.address
        );

        self.master.write_read(&offset, &mut first[..len])?;
        self.master.write_read(&offset, &mut second[..len])?;

        if let Some(mismatch) = first_mismatch(&first[..len], &second[..len]) {
            log::warn!(
                "eeprom: samples differ at 0x{:03x}: 0x{:02x} != 0x{:02x}",
                mismatch.offset,
                mismatch.first,
                mismatch.second
            );
            return Err(mismatch.into());
        }

        log::debug!("eeprom: both samples agree");

        Ok(SpdImage {
            data: first,
            offset: request.offset,
            len,
        })
    }
}
