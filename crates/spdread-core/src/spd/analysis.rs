//! Module-level analysis of a DDR4 SPD image

use super::checksum::{check_crc, CrcBlock, CrcStatus};
use super::decode::{decode, Report};
use super::offsets;
use super::types::MemoryType;
use crate::eeprom::SpdImage;
use core::fmt;

/// Medium timebase, picoseconds
const MTB_PS: i32 = 125;

/// JEDEC DDR4 speed bins and their minimum tCK in picoseconds
const SPEED_BINS: [(u16, u32); 7] = [
    (1600, 1250),
    (1866, 1071),
    (2133, 938),
    (2400, 833),
    (2666, 750),
    (2933, 682),
    (3200, 625),
];

/// Figures derived from a full DDR4 SPD image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Analysis {
    /// DRAM device type
    pub memory_type: MemoryType,
    /// Bring-up fields
    pub report: Report,
    /// Bytes of the image that were downloaded
    pub downloaded: usize,
    /// SPD bytes used, per byte 0 bits 3:0
    pub bytes_used: Option<u16>,
    /// SPD bytes total, per byte 0 bits 6:4
    pub bytes_total: Option<u16>,
    /// Primary bus width in bits
    pub bus_width: u16,
    /// ECC bus width in bits
    pub ecc_width: u8,
    /// Minimum cycle time in picoseconds, including the fine offset
    pub tck_min_ps: Option<u32>,
    /// Set when the package is a 3DS stack (byte 0x06 bits 1:0 = 0b10)
    pub stacked: bool,
    /// Base block checksum
    pub crc_base: CrcStatus,
    /// Module specific block checksum
    pub crc_module: CrcStatus,
}

impl Analysis {
    /// Analyse an image; `None` if it does not cover the DDR4 SPD region
    pub fn from_image(image: &SpdImage) -> Option<Self> {
        let spd = image.ddr4_region()?;

        let size = spd[offsets::BYTES_USED_TOTAL];
        let bytes_used = match size & 0x0F {
            n @ 1..=4 => Some(u16::from(n) * 128),
            _ => None,
        };
        let bytes_total = match (size >> 4) & 0x07 {
            1 => Some(256),
            2 => Some(512),
            _ => None,
        };

        let bus = spd[offsets::BUS_WIDTH];
        let mtb = spd[offsets::TCK_MIN_MTB];
        let ftb = spd[offsets::TCK_MIN_FTB] as i8;
        let tck_min_ps = match i32::from(mtb) * MTB_PS + i32::from(ftb) {
            ps if mtb != 0 && ps > 0 => Some(ps as u32),
            _ => None,
        };

        Some(Self {
            memory_type: MemoryType::from_code(spd[offsets::DRAM_TYPE]),
            report: decode(spd),
            downloaded: image.len(),
            bytes_used,
            bytes_total,
            bus_width: 8 << (bus & 0x07),
            ecc_width: 8 * ((bus >> 3) & 0x03),
            tck_min_ps,
            stacked: spd[offsets::PACKAGE_TYPE] & 0x03 == 0x02,
            crc_base: check_crc(image.as_bytes(), CrcBlock::Base),
            crc_module: check_crc(image.as_bytes(), CrcBlock::ModuleSpecific),
        })
    }

    /// Returns true if byte 0x02 identifies DDR4
    pub fn is_ddr4(&self) -> bool {
        self.memory_type == MemoryType::Ddr4
    }

    /// Data rate in MT/s derived from tCK, truncated
    pub fn data_rate(&self) -> Option<u32> {
        self.tck_min_ps.map(|ps| 2_000_000 / ps)
    }

    /// Fastest JEDEC speed bin the module's tCK allows
    pub fn speed_grade(&self) -> Option<u16> {
        let tck = self.tck_min_ps?;
        SPEED_BINS
            .iter()
            .rev()
            .find(|(_, bin_tck)| *bin_tck >= tck)
            .map(|(grade, _)| *grade)
    }

    /// Ranks seen by the memory controller
    pub fn logical_ranks(&self) -> u32 {
        let ranks = u32::from(self.report.package_ranks);
        if self.stacked {
            ranks * u32::from(self.report.die_count)
        } else {
            ranks
        }
    }

    /// Total module capacity in MB
    ///
    /// `die_capacity_mb` is in megabits per JEDEC, hence the divide by 8.
    pub fn module_capacity_mb(&self) -> u64 {
        u64::from(self.report.die_capacity_mb) / 8 * u64::from(self.bus_width)
            / u64::from(self.report.device_width)
            * u64::from(self.logical_ranks())
    }
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_ddr4() {
            return write!(
                f,
                "Not a DDR4 format: code={}",
                self.memory_type.code()
            );
        }

        let report = &self.report;
        writeln!(f, "Found DDR4 memory format")?;
        match self.bytes_used {
            Some(used) => writeln!(
                f,
                "Number of bytes in EEPROM = {} and {} have been downloaded",
                used, self.downloaded
            )?,
            None => writeln!(
                f,
                "Number of bytes in EEPROM = undefined and {} have been downloaded",
                self.downloaded
            )?,
        }
        writeln!(f, "SPD revision hex = 0x{:02x}", report.spd_revision)?;
        writeln!(f, "UDIMM format: {}", report.module_type)?;
        writeln!(f, "chip organization:")?;
        writeln!(f, "   die count = {}", report.die_count)?;
        writeln!(f, "   {}", report.symmetry)?;
        writeln!(f, "   package ranks = {}", report.package_ranks)?;
        writeln!(f, "   width (per chip) = {}", report.device_width)?;
        writeln!(f, "Module bus width = {}", self.bus_width)?;
        writeln!(f, "Module ecc width = {}", self.ecc_width)?;
        match (self.data_rate(), self.speed_grade()) {
            (Some(rate), Some(bin)) if u32::from(bin) != rate => writeln!(
                f,
                "Speed grade = DDR4-{} (JEDEC bin DDR4-{})",
                rate, bin
            )?,
            (Some(rate), _) => writeln!(f, "Speed grade = DDR4-{}", rate)?,
            (None, _) => writeln!(f, "Speed grade = unknown")?,
        }
        writeln!(
            f,
            "Density per chip = {} Mb = {}Gb",
            report.die_capacity_mb,
            report.die_capacity_gb()
        )?;
        let total = self.module_capacity_mb();
        writeln!(f, "Total capacity = {} MB = {}GB", total, total / 1024)?;
        let id = report.manufacturer_id;
        write!(
            f,
            "Manufacturer = {} (JEP-106 bank {}, code 0x{:02x})",
            id,
            id.bank(),
            id.code()
        )?;
        write_crc(f, "Base block CRC", &self.crc_base)?;
        write_crc(f, "Module block CRC", &self.crc_module)
    }
}

fn write_crc(f: &mut fmt::Formatter<'_>, label: &str, status: &CrcStatus) -> fmt::Result {
    match status {
        CrcStatus::Valid(crc) => write!(f, "\n{} = 0x{:04x} (ok)", label, crc),
        CrcStatus::Invalid { stored, computed } => write!(
            f,
            "\n{} = 0x{:04x} (MISMATCH, computed 0x{:04x})",
            label, stored, computed
        ),
        CrcStatus::NotCovered => write!(f, "\n{} = not downloaded", label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spd::spd_crc;

    /// 8 GB single rank DDR4-2666 SO-DIMM, x8 8Gb parts
    fn sodimm() -> [u8; 384] {
        let mut spd = [0u8; 384];
        spd[0x00] = 0x23;
        spd[0x01] = 0x11;
        spd[0x02] = 0x0C;
        spd[0x03] = 0x03;
        spd[0x04] = 0x45;
        spd[0x05] = 0x21;
        spd[0x0C] = 0x01;
        spd[0x0D] = 0x03;
        spd[0x12] = 0x06;
        spd[0x75] = 0x80;
        spd[0x76] = 0xCE;
        let crc = spd_crc(&spd[..126]);
        spd[126..128].copy_from_slice(&crc.to_le_bytes());
        let crc = spd_crc(&spd[128..254]);
        spd[254..256].copy_from_slice(&crc.to_le_bytes());
        spd
    }

    #[test]
    fn test_sodimm() {
        let image = SpdImage::from_bytes(0, &sodimm());
        let a = Analysis::from_image(&image).unwrap();
        assert!(a.is_ddr4());
        assert_eq!(a.bytes_used, Some(384));
        assert_eq!(a.bytes_total, Some(512));
        assert_eq!(a.bus_width, 64);
        assert_eq!(a.ecc_width, 0);
        assert_eq!(a.tck_min_ps, Some(750));
        assert_eq!(a.speed_grade(), Some(2666));
        assert_eq!(a.module_capacity_mb(), 8192);
        assert!(a.crc_base.is_valid());
        assert!(a.crc_module.is_valid());
    }

    #[test]
    fn test_fine_offset() {
        // DDR4-2400: 7 * 125 ps - 42 ps = 833 ps
        let mut spd = sodimm();
        spd[0x12] = 0x07;
        spd[0x7D] = 0xD6;
        let a = Analysis::from_image(&SpdImage::from_bytes(0, &spd)).unwrap();
        assert_eq!(a.tck_min_ps, Some(833));
        assert_eq!(a.speed_grade(), Some(2400));
        assert_eq!(a.data_rate(), Some(2400));
        assert!(!a.crc_base.is_valid());
    }

    #[test]
    fn test_ecc_dual_rank_udimm() {
        let mut spd = sodimm();
        spd[0x03] = 0x02;
        spd[0x0C] = 0x09;
        spd[0x0D] = 0x0B;
        let a = Analysis::from_image(&SpdImage::from_bytes(0, &spd)).unwrap();
        assert_eq!(a.ecc_width, 8);
        assert_eq!(a.report.package_ranks, 2);
        assert_eq!(a.module_capacity_mb(), 16384);
    }

    #[test]
    fn test_3ds_stack() {
        let mut spd = sodimm();
        spd[0x06] = 0x32;
        let a = Analysis::from_image(&SpdImage::from_bytes(0, &spd)).unwrap();
        assert!(a.stacked);
        assert_eq!(a.logical_ranks(), 4);
    }

    #[test]
    fn test_not_ddr4() {
        let mut spd = sodimm();
        spd[0x02] = 0x0B;
        let a = Analysis::from_image(&SpdImage::from_bytes(0, &spd)).unwrap();
        assert!(!a.is_ddr4());
        assert_eq!(std::format!("{}", a), "Not a DDR4 format: code=11");
    }

    #[test]
    fn test_short_image() {
        let image = SpdImage::from_bytes(0, &sodimm()[..256]);
        assert!(Analysis::from_image(&image).is_none());
    }

    #[test]
    fn test_speed_grade_is_raw_data_rate() {
        let mut spd = sodimm();
        spd[0x12] = 0x07;
        let a = Analysis::from_image(&SpdImage::from_bytes(0, &spd)).unwrap();
        assert_eq!(a.tck_min_ps, Some(875));
        assert_eq!(a.data_rate(), Some(2285));
        assert_eq!(a.speed_grade(), Some(2133));
        let text = std::format!("{}", a);
        assert!(text.contains("Speed grade = DDR4-2285 (JEDEC bin DDR4-2133)\n"));

        let a = Analysis::from_image(&SpdImage::from_bytes(0, &sodimm())).unwrap();
        assert!(std::format!("{}", a).contains("Speed grade = DDR4-2666\n"));
    }

    #[test]
    fn test_undefined_sizes() {
        let mut spd = sodimm();
        spd[0x00] = 0x00;
        let a = Analysis::from_image(&SpdImage::from_bytes(0, &spd)).unwrap();
        assert_eq!(a.bytes_used, None);
        assert_eq!(a.bytes_total, None);
        assert!(std::format!("{}", a)
            .contains("Number of bytes in EEPROM = undefined and 384 have been downloaded\n"));
    }

    #[test]
    fn test_slow_module_has_no_bin() {
        let mut spd = sodimm();
        spd[0x12] = 0x0F;
        let a = Analysis::from_image(&SpdImage::from_bytes(0, &spd)).unwrap();
        assert_eq!(a.speed_grade(), None);
        assert_eq!(a.data_rate(), Some(1066));
        assert!(std::format!("{}", a).contains("Speed grade = DDR4-1066\n"));
    }
}
