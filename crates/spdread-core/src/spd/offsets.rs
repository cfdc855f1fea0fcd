//! Byte offsets of the DDR4 SPD fields used by this crate

/// Bytes used / total
pub const BYTES_USED_TOTAL: usize = 0x00;
/// SPD revision
pub const REVISION: usize = 0x01;
/// DRAM device type
pub const DRAM_TYPE: usize = 0x02;
/// Module type
pub const MODULE_TYPE: usize = 0x03;
/// SDRAM density and banks
pub const DENSITY_BANKS: usize = 0x04;
/// SDRAM addressing
pub const ADDRESSING: usize = 0x05;
/// Primary SDRAM package type
pub const PACKAGE_TYPE: usize = 0x06;
/// Module organization
pub const ORGANIZATION: usize = 0x0C;
/// Module memory bus width
pub const BUS_WIDTH: usize = 0x0D;
/// Minimum cycle time (tCKAVGmin), MTB units
pub const TCK_MIN_MTB: usize = 0x12;
/// Manufacturer ID, continuation byte
pub const MANUFACTURER_LSB: usize = 0x75;
/// Manufacturer ID, code byte
pub const MANUFACTURER_MSB: usize = 0x76;
/// Fine offset for tCKAVGmin, FTB units (signed)
pub const TCK_MIN_FTB: usize = 0x7D;
/// CRC of the base configuration block, low byte
pub const CRC_BASE_LSB: usize = 0x7E;
/// CRC of the module specific block, low byte
pub const CRC_MODULE_LSB: usize = 0xFE;
