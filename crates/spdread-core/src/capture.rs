//! Console capture parsing
//!
//! A capture is whatever the serial terminal recorded while the bring-up
//! firmware ran: free-form log lines followed by the JSON dump between the
//! [`DUMP_START`] and [`DUMP_END`] markers. This module extracts that dump
//! and turns each channel back into an [`SpdImage`].

use crate::dump::{DUMP_END, DUMP_START};
use crate::eeprom::SpdImage;
use std::collections::BTreeMap;
use std::io::Read;
use std::string::{String, ToString};
use std::vec::Vec;
use thiserror::Error;

/// Channel name used by the bring-up firmware
pub const DEFAULT_CHANNEL: &str = "DDR4_B";

/// Errors while reading a console capture
#[derive(Debug, Error)]
pub enum CaptureError {
    /// No start marker
    #[error("no JSON DUMP START marker in capture")]
    MissingStart,

    /// Start marker without end marker
    #[error("capture ends before the JSON DUMP END marker")]
    MissingEnd,

    /// The firmware reported a failed download
    #[error("capture reports a FAILED EEPROM download")]
    DownloadFailed,

    /// The dump is not valid JSON
    #[error("malformed JSON dump: {0}")]
    Json(#[from] serde_json::Error),

    /// Requested channel missing from the dump
    #[error("channel '{0}' not present in dump")]
    MissingChannel(String),

    /// Reading the capture failed
    #[error("failed to read capture: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for capture parsing
pub type Result<T> = std::result::Result<T, CaptureError>;

/// Return the text between the dump marker lines
pub fn extract_json(text: &str) -> Result<String> {
    let mut lines = text.lines();
    if !lines.any(|line| line.contains(DUMP_START)) {
        return Err(CaptureError::MissingStart);
    }

    let mut json = String::new();
    for line in lines {
        if line.contains(DUMP_END) {
            return Ok(json);
        }
        json.push_str(line);
        json.push('\n');
    }
    Err(CaptureError::MissingEnd)
}

/// Channels recovered from a console capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    channels: BTreeMap<String, Vec<u8>>,
}

impl Capture {
    /// Parse capture text
    pub fn parse(text: &str) -> Result<Self> {
        let json = extract_json(text)?;
        if json.lines().any(|line| line.trim() == "FAILED") {
            return Err(CaptureError::DownloadFailed);
        }

        let channels: BTreeMap<String, Vec<u8>> = serde_json::from_str(&json)?;
        log::debug!("capture: found {} channel(s)", channels.len());
        Ok(Self { channels })
    }

    /// Read and parse a capture from any reader
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::parse(&text)
    }

    /// Names of the channels in the dump
    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    /// Raw bytes of one channel
    pub fn bytes(&self, channel: &str) -> Result<&[u8]> {
        self.channels
            .get(channel)
            .map(Vec::as_slice)
            .ok_or_else(|| CaptureError::MissingChannel(channel.to_string()))
    }

    /// One channel as an image starting at device offset 0
    pub fn image(&self, channel: &str) -> Result<SpdImage> {
        let bytes = self.bytes(channel)?;
        if bytes.len() > crate::eeprom::SPD_EEPROM_SIZE {
            log::warn!(
                "capture: channel '{}' has {} bytes, keeping the first {}",
                channel,
                bytes.len(),
                crate::eeprom::SPD_EEPROM_SIZE
            );
        }
        Ok(SpdImage::from_bytes(0, bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump::{write_channel, write_dump_end, write_dump_start, write_failure};

    fn capture_of(bytes: &[u8]) -> String {
        let mut s = String::from("Nios II boot\nsome log line\n");
        write_dump_start(&mut s).unwrap();
        write_channel(&mut s, DEFAULT_CHANNEL, bytes).unwrap();
        write_dump_end(&mut s, true).unwrap();
        s
    }

    #[test]
    fn test_round_trip_through_console_format() {
        let bytes: Vec<u8> = (0..=255).chain(0..128).collect();
        let capture = Capture::parse(&capture_of(&bytes)).unwrap();
        assert_eq!(capture.channel_names().collect::<Vec<_>>(), [DEFAULT_CHANNEL]);
        let image = capture.image(DEFAULT_CHANNEL).unwrap();
        assert_eq!(image.len(), 384);
        assert_eq!(image.as_bytes(), &bytes[..]);
        assert!(image.ddr4_region().is_some());
    }

    #[test]
    fn test_missing_markers() {
        assert!(matches!(
            Capture::parse("no dump here"),
            Err(CaptureError::MissingStart)
        ));
        let text = std::format!("{}\n{{ }}\n", DUMP_START);
        assert!(matches!(
            Capture::parse(&text),
            Err(CaptureError::MissingEnd)
        ));
    }

    #[test]
    fn test_failed_download() {
        let mut s = String::new();
        write_dump_start(&mut s).unwrap();
        write_failure(&mut s).unwrap();
        write_dump_end(&mut s, false).unwrap();
        assert!(matches!(
            Capture::parse(&s),
            Err(CaptureError::DownloadFailed)
        ));
    }

    #[test]
    fn test_missing_channel() {
        let capture = Capture::parse(&capture_of(&[1, 2, 3])).unwrap();
        assert!(matches!(
            capture.bytes("DDR4_A"),
            Err(CaptureError::MissingChannel(name)) if name == "DDR4_A"
        ));
    }

    #[test]
    fn test_values_must_be_bytes() {
        let text = std::format!(
            "{}\n{{ \"DDR4_B\": [1, 256] }}\n{}\n",
            DUMP_START,
            DUMP_END
        );
        assert!(matches!(Capture::parse(&text), Err(CaptureError::Json(_))));
    }
}
