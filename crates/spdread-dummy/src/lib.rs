//! spdread-dummy - In-memory SPD EEPROM emulator for testing
//!
//! This crate provides a dummy I2C transport with a DDR4 SPD EEPROM behind
//! it. It's useful for testing and development without real hardware, and
//! can inject the bus faults the reader has to survive.

#![cfg_attr(not(feature = "std"), no_std)]

use spdread_core::eeprom::{SPD_DEFAULT_ADDRESS, SPD_EEPROM_SIZE};
use spdread_core::error::{Error, Result, TransferFailure};
use spdread_core::i2c::{I2cMaster, StatusCode};
use spdread_core::spd::spd_crc;

/// Corrupt one byte of one transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flip {
    /// Zero-based transaction index to corrupt
    pub transaction: usize,
    /// Offset within the read buffer
    pub offset: usize,
    /// Value XORed into the byte
    pub xor: u8,
}

/// Configuration for the dummy EEPROM
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Address the EEPROM answers on
    pub address: u8,
    /// Status every transfer completes with
    pub status: StatusCode,
    /// Optional single-byte corruption
    pub flip: Option<Flip>,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            address: SPD_DEFAULT_ADDRESS,
            status: StatusCode::Success,
            flip: None,
        }
    }
}

/// Dummy SPD EEPROM
///
/// Behaves like a 512-byte EEPROM with a 16-bit internal address pointer
/// that wraps at the end of the device.
pub struct DummyEeprom {
    config: DummyConfig,
    data: [u8; SPD_EEPROM_SIZE],
    target: Option<u8>,
    pointer: usize,
    transactions: usize,
}

impl DummyEeprom {
    /// Create a dummy EEPROM holding the sample SO-DIMM image
    pub fn new(config: DummyConfig) -> Self {
        Self::with_data(config, &sample_ddr4_sodimm())
    }

    /// Create a dummy EEPROM with default configuration
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Create a dummy EEPROM with pre-filled data; the rest reads as 0xFF
    pub fn with_data(config: DummyConfig, initial_data: &[u8]) -> Self {
        let mut data = [0xFF; SPD_EEPROM_SIZE];
        let len = core::cmp::min(initial_data.len(), data.len());
        data[..len].copy_from_slice(&initial_data[..len]);
        Self {
            config,
            data,
            target: None,
            pointer: 0,
            transactions: 0,
        }
    }

    /// Get a reference to the EEPROM contents
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get a mutable reference to the EEPROM contents
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Get the configuration
    pub fn config(&self) -> &DummyConfig {
        &self.config
    }

    /// Number of write-then-read transactions completed so far
    pub fn transactions(&self) -> usize {
        self.transactions
    }
}

impl I2cMaster for DummyEeprom {
    fn set_target(&mut self, address: u8) -> Result<()> {
        log::debug!("dummy: target 0x{:02x}", address);
        self.target = Some(address);
        Ok(())
    }

    fn write_read(&mut self, write: &[u8], read: &mut [u8]) -> Result<()> {
        let target = self.target.ok_or(Error::TransportUnavailable)?;
        if target != self.config.address {
            return Err(TransferFailure::Nack.into());
        }
        self.config.status.into_result()?;

        // Address phase: the EEPROM takes a big-endian word address
        match *write {
            [hi, lo] => {
                self.pointer = u16::from_be_bytes([hi, lo]) as usize % SPD_EEPROM_SIZE;
            }
            [] => {}
            _ => return Err(TransferFailure::BadArgument.into()),
        }

        for byte in read.iter_mut() {
            *byte = self.data[self.pointer];
            self.pointer = (self.pointer + 1) % SPD_EEPROM_SIZE;
        }

        if let Some(flip) = self.config.flip {
            if flip.transaction == self.transactions {
                if let Some(byte) = read.get_mut(flip.offset) {
                    log::debug!(
                        "dummy: corrupting byte {} of transaction {}",
                        flip.offset,
                        flip.transaction
                    );
                    *byte ^= flip.xor;
                }
            }
        }

        self.transactions += 1;
        Ok(())
    }
}

/// Sample SPD of an 8 GB single-rank DDR4-2666 SO-DIMM built from x8 8Gb parts
pub fn sample_ddr4_sodimm() -> [u8; SPD_EEPROM_SIZE] {
    let mut spd = [0u8; SPD_EEPROM_SIZE];

    // Base configuration
    spd[0x00] = 0x23; // 384 bytes used, 512 total
    spd[0x01] = 0x11; // revision 1.1
    spd[0x02] = 0x0C; // DDR4
    spd[0x03] = 0x03; // SO-DIMM
    spd[0x04] = 0x45; // 8 Gb, 4 banks, 2 bank groups
    spd[0x05] = 0x21; // 16 row, 10 column bits
    spd[0x06] = 0x00; // monolithic, single die
    spd[0x0B] = 0x03; // 1.2 V
    spd[0x0C] = 0x01; // 1 rank, x8
    spd[0x0D] = 0x03; // 64-bit bus, no ECC
    spd[0x11] = 0x00; // 125 ps MTB, 1 ps FTB
    spd[0x12] = 0x06; // tCKAVGmin 750 ps
    spd[0x13] = 0x0D; // tCKAVGmax 1.6 ns
    spd[0x75] = 0x80;
    spd[0x76] = 0xCE;

    let crc = spd_crc(&spd[..126]);
    spd[126..128].copy_from_slice(&crc.to_le_bytes());

    // Module specific block: raw card A, 1 mm thick
    spd[0x80] = 0x0F;
    spd[0x81] = 0x11;
    spd[0x82] = 0x00;
    let crc = spd_crc(&spd[128..254]);
    spd[254..256].copy_from_slice(&crc.to_le_bytes());

    // Manufacturing information
    spd[0x140] = 0x80;
    spd[0x141] = 0xCE;
    let part = b"M471A1K43DB1-CTD    ";
    spd[0x149..0x149 + part.len()].copy_from_slice(part);

    spd
}
