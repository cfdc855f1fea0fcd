//! SPD block checksums
//!
//! DDR4 SPD protects the base configuration block (bytes 0-125) and the
//! module specific block (bytes 128-253) with a CRC-16 (polynomial 0x1021,
//! initial value 0), stored little endian right after each block.

use super::offsets;
use crc::{Crc, CRC_16_XMODEM};

const CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_XMODEM);

/// Checksummed SPD block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CrcBlock {
    /// Bytes 0-125, CRC in 126-127
    Base,
    /// Bytes 128-253, CRC in 254-255
    ModuleSpecific,
}

impl CrcBlock {
    fn crc_offset(self) -> usize {
        match self {
            Self::Base => offsets::CRC_BASE_LSB,
            Self::ModuleSpecific => offsets::CRC_MODULE_LSB,
        }
    }

    fn start(self) -> usize {
        match self {
            Self::Base => 0,
            Self::ModuleSpecific => 128,
        }
    }
}

/// Outcome of a block checksum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CrcStatus {
    /// Stored CRC matches
    Valid(u16),
    /// Stored CRC does not match the contents
    Invalid {
        /// CRC found in the image
        stored: u16,
        /// CRC computed over the block
        computed: u16,
    },
    /// The image does not cover the block
    NotCovered,
}

impl CrcStatus {
    /// Returns true for `Valid`
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// CRC-16 as used by SPD
pub fn spd_crc(bytes: &[u8]) -> u16 {
    CRC16.checksum(bytes)
}

/// Check one SPD block of an image that starts at device offset 0
pub fn check_crc(spd: &[u8], block: CrcBlock) -> CrcStatus {
    let crc_at = block.crc_offset();
    if spd.len() < crc_at + 2 {
        return CrcStatus::NotCovered;
    }

    let stored = u16::from_le_bytes([spd[crc_at], spd[crc_at + 1]]);
    let computed = spd_crc(&spd[block.start()..crc_at]);
    if stored == computed {
        CrcStatus::Valid(stored)
    } else {
        CrcStatus::Invalid { stored, computed }
    }
}
