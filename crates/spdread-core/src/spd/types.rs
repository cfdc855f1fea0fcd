//! SPD field types

use core::fmt;

/// Module type (byte 0x03)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ModuleType {
    /// Unbuffered DIMM
    Udimm,
    /// Small outline DIMM
    SoDimm,
    /// Mini unbuffered DIMM
    MiniUdimm,
    /// 72-bit small outline unbuffered DIMM
    SoUdimm72,
    /// 16-bit small outline unbuffered DIMM
    SoUdimm16,
    /// 32-bit small outline unbuffered DIMM
    SoUdimm32,
    /// Any other code, kept verbatim
    Unknown(u8),
}

impl ModuleType {
    /// Look up a module type code
    pub const fn from_code(code: u8) -> Self {
        match code {
            0x02 => Self::Udimm,
            0x03 => Self::SoDimm,
            0x06 => Self::MiniUdimm,
            0x09 => Self::SoUdimm72,
            0x0C => Self::SoUdimm16,
            0x0D => Self::SoUdimm32,
            other => Self::Unknown(other),
        }
    }

    /// Raw code
    pub const fn code(self) -> u8 {
        match self {
            Self::Udimm => 0x02,
            Self::SoDimm => 0x03,
            Self::MiniUdimm => 0x06,
            Self::SoUdimm72 => 0x09,
            Self::SoUdimm16 => 0x0C,
            Self::SoUdimm32 => 0x0D,
            Self::Unknown(code) => code,
        }
    }

    /// Returns true if the code is not in the lookup table
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Udimm => write!(f, "UDIMM"),
            Self::SoDimm => write!(f, "SO-DIMM"),
            Self::MiniUdimm => write!(f, "mini-UDIMM"),
            Self::SoUdimm72 => write!(f, "72b SO-UDIMM"),
            Self::SoUdimm16 => write!(f, "16b SO-UDIMM"),
            Self::SoUdimm32 => write!(f, "32b SO-UDIMM"),
            Self::Unknown(code) => write!(f, "Unknown(0x{:02x})", code),
        }
    }
}

/// Rank organization (byte 0x0C bit 6)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Symmetry {
    /// All ranks use the same SDRAM
    Symmetric,
    /// Ranks use different SDRAM densities or widths
    Asymmetric,
}

impl fmt::Display for Symmetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symmetric => write!(f, "Symmetric"),
            Self::Asymmetric => write!(f, "Asymmetric"),
        }
    }
}

/// DRAM device type (byte 0x02)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum MemoryType {
    /// DDR3 SDRAM
    Ddr3,
    /// DDR4 SDRAM
    Ddr4,
    /// DDR4E SDRAM
    Ddr4E,
    /// LPDDR3 SDRAM
    LpDdr3,
    /// LPDDR4 SDRAM
    LpDdr4,
    /// DDR5 SDRAM
    Ddr5,
    /// Anything else
    Other(u8),
}

impl MemoryType {
    /// Look up a DRAM device type code
    pub const fn from_code(code: u8) -> Self {
        match code {
            0x0B => Self::Ddr3,
            0x0C => Self::Ddr4,
            0x0E => Self::Ddr4E,
            0x0F => Self::LpDdr3,
            0x10 => Self::LpDdr4,
            0x12 => Self::Ddr5,
            other => Self::Other(other),
        }
    }

    /// Raw code
    pub const fn code(self) -> u8 {
        match self {
            Self::Ddr3 => 0x0B,
            Self::Ddr4 => 0x0C,
            Self::Ddr4E => 0x0E,
            Self::LpDdr3 => 0x0F,
            Self::LpDdr4 => 0x10,
            Self::Ddr5 => 0x12,
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for MemoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ddr3 => write!(f, "DDR3"),
            Self::Ddr4 => write!(f, "DDR4"),
            Self::Ddr4E => write!(f, "DDR4E"),
            Self::LpDdr3 => write!(f, "LPDDR3"),
            Self::LpDdr4 => write!(f, "LPDDR4"),
            Self::Ddr5 => write!(f, "DDR5"),
            Self::Other(code) => write!(f, "unknown (code={})", code),
        }
    }
}

/// JEP-106 manufacturer ID as stored in the SPD
///
/// The low byte holds the number of continuation codes (bits 6:0) plus an
/// odd parity bit; the high byte is the code within that bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ManufacturerId(pub u16);

impl ManufacturerId {
    /// Combine the two SPD bytes (little endian)
    pub const fn from_bytes(low: u8, high: u8) -> Self {
        Self(low as u16 | (high as u16) << 8)
    }

    /// JEP-106 bank number, 1-based
    pub const fn bank(self) -> u8 {
        (self.0 as u8 & 0x7F) + 1
    }

    /// Manufacturer code within the bank, parity bit stripped
    pub const fn code(self) -> u8 {
        (self.0 >> 8) as u8 & 0x7F
    }
}

impl fmt::Display for ManufacturerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04x} = {}", self.0, self.0)
    }
}
