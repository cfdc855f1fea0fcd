//! Bring-up decode table

use super::offsets;
use super::types::{ManufacturerId, ModuleType, Symmetry};
use crate::eeprom::SPD_DDR4_LEN;
use core::fmt;

/// Fields decoded from a DDR4 SPD region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Report {
    /// SPD revision byte (0x11 or 0x12 expected, not enforced)
    pub spd_revision: u8,
    /// Capacity per die as `256 << n`
    pub die_capacity_mb: u32,
    /// Number of banks per bank group
    pub bank_count: u8,
    /// Number of bank groups
    pub bank_groups: u8,
    /// Row address bits
    pub row_address_bits: u8,
    /// Column address bits
    pub column_address_bits: u8,
    /// Module type
    pub module_type: ModuleType,
    /// Dies per package
    pub die_count: u8,
    /// Package ranks per DIMM
    pub package_ranks: u8,
    /// SDRAM device width in bits
    pub device_width: u16,
    /// Rank organization
    pub symmetry: Symmetry,
    /// JEP-106 module manufacturer
    pub manufacturer_id: ManufacturerId,
}

impl Report {
    /// Capacity per die in GB, truncated
    pub fn die_capacity_gb(&self) -> u32 {
        self.die_capacity_mb / 1024
    }
}

/// Decode the bring-up fields of a DDR4 SPD region
///
/// Never fails: out-of-table codes are carried through for the reader to
/// judge.
pub fn decode(spd: &[u8; SPD_DDR4_LEN]) -> Report {
    let density = spd[offsets::DENSITY_BANKS];
    let addressing = spd[offsets::ADDRESSING];
    let org = spd[offsets::ORGANIZATION];

    Report {
        spd_revision: spd[offsets::REVISION],
        die_capacity_mb: 256 << (density & 0x0F),
        bank_count: 4 << ((density >> 4) & 0x03),
        bank_groups: 2 * ((density >> 6) & 0x03),
        row_address_bits: ((addressing >> 3) & 0x07) + 12,
        column_address_bits: (addressing & 0x07) + 9,
        module_type: ModuleType::from_code(spd[offsets::MODULE_TYPE]),
        die_count: ((spd[offsets::PACKAGE_TYPE] >> 4) & 0x07) + 1,
        package_ranks: ((org >> 3) & 0x07) + 1,
        device_width: 4 << (org & 0x07),
        symmetry: if org & (1 << 6) != 0 {
            Symmetry::Asymmetric
        } else {
            Symmetry::Symmetric
        },
        manufacturer_id: ManufacturerId::from_bytes(
            spd[offsets::MANUFACTURER_LSB],
            spd[offsets::MANUFACTURER_MSB],
        ),
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "SPD revision = 0x{:02x} (expecting 0x11 or 0x12)",
            self.spd_revision
        )?;
        writeln!(
            f,
            "Capacity per die = {} MB = {} GB",
            self.die_capacity_mb,
            self.die_capacity_gb()
        )?;
        writeln!(f, "Number of banks = {}", self.bank_count)?;
        writeln!(f, "Bank groups = {}", self.bank_groups)?;
        writeln!(
            f,
            "Row address bits = {} \tColumn address bits = {}",
            self.row_address_bits, self.column_address_bits
        )?;
        writeln!(f, "UDIMM scheme: {}", self.module_type)?;
        writeln!(f, "Die count = {}", self.die_count)?;
        writeln!(
            f,
            "Module organization: {}, Num package ranks per DIMM = {}, SDRAM device width = {}",
            self.symmetry, self.package_ranks, self.device_width
        )?;
        write!(
            f,
            "JEP-106 module manufacturer ID = {}",
            self.manufacturer_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank() -> [u8; SPD_DDR4_LEN] {
        [0u8; SPD_DDR4_LEN]
    }

    #[test]
    fn test_capacity() {
        let mut spd = blank();
        spd[0x04] = 0x09;
        let report = decode(&spd);
        assert_eq!(report.die_capacity_mb, 131072);
        assert_eq!(report.die_capacity_gb(), 128);
    }

    #[test]
    fn test_banks_and_groups() {
        let mut spd = blank();
        spd[0x04] = 0x31;
        let report = decode(&spd);
        assert_eq!(report.bank_count, 32);
        assert_eq!(report.bank_groups, 0);
        assert_eq!(report.die_capacity_mb, 512);

        spd[0x04] = 0x85;
        let report = decode(&spd);
        assert_eq!(report.bank_count, 4);
        assert_eq!(report.bank_groups, 4);
        assert_eq!(report.die_capacity_mb, 8192);
        assert_eq!(report.die_capacity_gb(), 8);
    }

    #[test]
    fn test_addressing() {
        let mut spd = blank();
        spd[0x05] = 0x21;
        let report = decode(&spd);
        assert_eq!(report.row_address_bits, 16);
        assert_eq!(report.column_address_bits, 10);

        spd[0x05] = 0xFF;
        let report = decode(&spd);
        assert_eq!(report.row_address_bits, 19);
        assert_eq!(report.column_address_bits, 16);
    }

    #[test]
    fn test_module_type() {
        let mut spd = blank();
        spd[0x03] = 0x03;
        assert_eq!(decode(&spd).module_type, ModuleType::SoDimm);
        spd[0x03] = 0xFF;
        let report = decode(&spd);
        assert_eq!(report.module_type, ModuleType::Unknown(0xFF));
        assert_eq!(std::format!("{}", report.module_type), "Unknown(0xff)");
    }

    #[test]
    fn test_organization() {
        let mut spd = blank();
        spd[0x06] = 0x30;
        spd[0x0C] = 0x4B;
        let report = decode(&spd);
        assert_eq!(report.die_count, 4);
        assert_eq!(report.package_ranks, 2);
        assert_eq!(report.device_width, 32);
        assert_eq!(report.symmetry, Symmetry::Asymmetric);

        spd[0x0C] = 0x07;
        let report = decode(&spd);
        assert_eq!(report.package_ranks, 1);
        assert_eq!(report.device_width, 512);
        assert_eq!(report.symmetry, Symmetry::Symmetric);
    }

    #[test]
    fn test_manufacturer_id() {
        let mut spd = blank();
        spd[0x75] = 0x34;
        spd[0x76] = 0x12;
        assert_eq!(decode(&spd).manufacturer_id, ManufacturerId(0x1234));
    }

    #[test]
    fn test_revision_is_not_validated() {
        let mut spd = blank();
        spd[0x01] = 0x99;
        let report = decode(&spd);
        assert_eq!(report.spd_revision, 0x99);
        assert_eq!(decode(&spd), report);
    }

    #[test]
    fn test_display() {
        let mut spd = blank();
        spd[0x01] = 0x11;
        spd[0x03] = 0x03;
        spd[0x04] = 0x45;
        spd[0x05] = 0x21;
        spd[0x0C] = 0x01;
        spd[0x75] = 0x80;
        spd[0x76] = 0xCE;
        let text = std::format!("{}", decode(&spd));
        let lines: std::vec::Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "SPD revision = 0x11 (expecting 0x11 or 0x12)");
        assert_eq!(lines[1], "Capacity per die = 8192 MB = 8 GB");
        assert_eq!(lines[2], "Number of banks = 4");
        assert_eq!(lines[3], "Bank groups = 2");
        assert_eq!(lines[4], "Row address bits = 16 \tColumn address bits = 10");
        assert_eq!(lines[5], "UDIMM scheme: SO-DIMM");
        assert_eq!(lines[6], "Die count = 1");
        assert_eq!(
            lines[7],
            "Module organization: Symmetric, Num package ranks per DIMM = 1, SDRAM device width = 8"
        );
        assert_eq!(
            lines[8],
            "JEP-106 module manufacturer ID = 0xce80 = 52864"
        );
    }
}
