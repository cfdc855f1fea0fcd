//! Analyse command implementation
//!
//! Decodes a dump recovered from a saved console capture, without access
//! to the board.

use spdread_core::capture::Capture;
use spdread_core::eeprom::SPD_DDR4_LEN;
use spdread_core::spd::{Analysis, CrcStatus};
use std::fs::File;
use std::io;
use std::path::Path;

/// Run the analyse command
pub fn run(
    input: Option<&Path>,
    channel: &str,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let capture = match input {
        Some(path) => {
            log::info!("Reading capture from {:?}", path);
            Capture::from_reader(File::open(path)?)?
        }
        None => {
            log::info!("Reading capture from stdin");
            Capture::from_reader(io::stdin().lock())?
        }
    };

    println!("{}", analyse(&capture, channel, json)?);
    Ok(())
}

/// Analyse one channel of a capture and render the result
pub fn analyse(
    capture: &Capture,
    channel: &str,
    json: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    let image = capture.image(channel).inspect_err(|_| {
        let names: Vec<&str> = capture.channel_names().collect();
        log::info!("Channels in capture: {}", names.join(", "));
    })?;

    let analysis = Analysis::from_image(&image).ok_or_else(|| {
        format!(
            "Channel '{}' holds {} bytes, at least {} are needed",
            channel,
            image.len(),
            SPD_DDR4_LEN
        )
    })?;

    if !analysis.is_ddr4() {
        log::warn!(
            "Memory type code {} is not DDR4",
            analysis.memory_type.code()
        );
    } else {
        for (name, status) in [("base", analysis.crc_base), ("module", analysis.crc_module)] {
            if let CrcStatus::Invalid { stored, computed } = status {
                log::warn!(
                    "CRC mismatch in {} block: stored 0x{:04x}, computed 0x{:04x}",
                    name,
                    stored,
                    computed
                );
            }
        }
    }

    if json {
        Ok(serde_json::to_string_pretty(&analysis)?)
    } else {
        Ok(analysis.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spdread_core::dump::{write_channel, write_dump_end, write_dump_start};

    fn capture_of(channel: &str, bytes: &[u8]) -> Capture {
        let mut text = String::from("DDR4 bring-up\n");
        write_dump_start(&mut text).unwrap();
        write_channel(&mut text, channel, bytes).unwrap();
        write_dump_end(&mut text, true).unwrap();
        Capture::parse(&text).unwrap()
    }

    #[test]
    fn test_analyse_sample() {
        let spd = spdread_dummy::sample_ddr4_sodimm();
        let capture = capture_of("DDR4_B", &spd[..SPD_DDR4_LEN]);
        let text = analyse(&capture, "DDR4_B", false).unwrap();

        assert!(text.starts_with("Found DDR4 memory format\n"));
        assert!(text.contains("Number of bytes in EEPROM = 384 and 384 have been downloaded"));
        assert!(text.contains("Speed grade = DDR4-2666"));
        assert!(text.contains("Total capacity = 8192 MB = 8GB"));
        assert!(text.contains("JEP-106 bank 1, code 0x4e"));
        assert!(text.contains("Base block CRC = 0x"));
        assert!(!text.contains("MISMATCH"));
    }

    #[test]
    fn test_analyse_json() {
        let spd = spdread_dummy::sample_ddr4_sodimm();
        let capture = capture_of("DDR4_A", &spd[..SPD_DDR4_LEN]);
        let text = analyse(&capture, "DDR4_A", true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["bus_width"], 64);
        assert_eq!(value["report"]["package_ranks"], 1);
    }

    #[test]
    fn test_not_ddr4() {
        let mut spd = spdread_dummy::sample_ddr4_sodimm();
        spd[2] = 0x0B;
        let capture = capture_of("DDR4_B", &spd[..SPD_DDR4_LEN]);
        assert_eq!(
            analyse(&capture, "DDR4_B", false).unwrap(),
            "Not a DDR4 format: code=11"
        );
    }

    #[test]
    fn test_short_or_missing_channel() {
        let capture = capture_of("DDR4_B", &[0x23, 0x11, 0x0C]);
        assert!(analyse(&capture, "DDR4_B", false).is_err());
        assert!(analyse(&capture, "DDR4_A", false).is_err());
    }
}
