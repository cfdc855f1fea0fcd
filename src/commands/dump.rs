//! Dump command implementation
//!
//! Reads the EEPROM twice, prints the decoded report and then the framed
//! JSON dump that host tooling scrapes from the console.

use crate::cli::DumpArgs;
use crate::transports;
use spdread_core::dump::{write_channel, write_dump_end, write_dump_start, write_failure};
use spdread_core::eeprom::{EepromReader, ReadRequest, SpdImage};
use spdread_core::i2c::I2cMaster;
use spdread_core::spd;
use std::fmt::Write;

/// What to render around the raw dump
#[derive(Debug, Clone)]
pub struct DumpOptions<'a> {
    /// Channel name in the JSON object
    pub channel: &'a str,
    /// Print the decoded report
    pub decode: bool,
    /// Decoded report as JSON instead of text
    pub json: bool,
    /// Send EOT after the dump
    pub eot: bool,
}

impl<'a> From<&'a DumpArgs> for DumpOptions<'a> {
    fn from(args: &'a DumpArgs) -> Self {
        Self {
            channel: &args.channel,
            decode: !args.no_decode,
            json: args.json,
            eot: args.eot,
        }
    }
}

/// Run the dump command
pub fn run(args: &DumpArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut transport = transports::open_transport(&args.transport)?;
    let request = ReadRequest::ddr4()
        .with_address(args.address)
        .with_offset(args.offset)
        .with_len(usize::from(args.length));

    let mut out = String::new();
    let result = render(&mut transport, &request, &DumpOptions::from(args), &mut out);
    print!("{}", out);
    let image = result?;

    if let Some(path) = &args.output {
        std::fs::write(path, image.as_bytes())?;
        log::info!("Wrote {} bytes to {:?}", image.len(), path);
    }

    Ok(())
}

/// Read the EEPROM and render the console output into `out`
///
/// The framing is written even when the read fails, with a `FAILED` body,
/// so the capture stays parseable.
pub fn render<M, W>(
    master: &mut M,
    request: &ReadRequest,
    options: &DumpOptions<'_>,
    out: &mut W,
) -> Result<SpdImage, Box<dyn std::error::Error>>
where
    M: I2cMaster + ?Sized,
    W: Write,
{
    log::info!(
        "Reading {} bytes at 0x{:03x} from target 0x{:02x}...",
        request.len,
        request.offset,
        request.address
    );

    let image = match EepromReader::new(master).read(request) {
        Ok(image) => image,
        Err(e) => {
            log::error!("SPD EEPROM download failed: {}", e);
            write_dump_start(out)?;
            write_failure(out)?;
            write_dump_end(out, options.eot)?;
            return Err(e.into());
        }
    };

    if options.decode {
        match image.ddr4_region() {
            Some(region) => {
                let report = spd::decode(region);
                if options.json {
                    writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
                } else {
                    writeln!(out, "{}", report)?;
                }
            }
            None => log::info!("Partial read, skipping decode"),
        }
    }

    write_dump_start(out)?;
    write_channel(out, options.channel, image.as_bytes())?;
    write_dump_end(out, options.eot)?;

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spdread_core::capture::Capture;
    use spdread_core::Error;
    use spdread_dummy::{DummyConfig, DummyEeprom, Flip};

    fn options() -> DumpOptions<'static> {
        DumpOptions {
            channel: "DDR4_B",
            decode: true,
            json: false,
            eot: false,
        }
    }

    #[test]
    fn test_dump_round_trips_through_capture() {
        let mut eeprom = DummyEeprom::new_default();
        let mut out = String::new();
        let image = render(&mut eeprom, &ReadRequest::ddr4(), &options(), &mut out).unwrap();

        assert!(out.starts_with("SPD revision = 0x11"));
        assert!(out.contains("UDIMM scheme: SO-DIMM"));
        assert!(out.contains("JEP-106 module manufacturer ID = 0xce80"));

        let capture = Capture::parse(&out).unwrap();
        assert_eq!(capture.bytes("DDR4_B").unwrap(), image.as_bytes());
    }

    #[test]
    fn test_mismatch_prints_failed() {
        let config = DummyConfig {
            flip: Some(Flip {
                transaction: 1,
                offset: 3,
                xor: 0x80,
            }),
            ..Default::default()
        };
        let mut eeprom = DummyEeprom::new(config);
        let mut out = String::new();
        let opts = DumpOptions {
            eot: true,
            ..options()
        };
        let err = render(&mut eeprom, &ReadRequest::ddr4(), &opts, &mut out).unwrap_err();

        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::VerificationMismatch {
                offset: 3,
                first: 0x03,
                second: 0x83
            })
        );
        assert!(!out.contains("SPD revision"));
        assert!(out.contains("{ \nFAILED\n }"));
        assert!(out.ends_with("--------JSON DUMP END--------\n\u{4}\n"));
    }

    #[test]
    fn test_partial_read_skips_decode() {
        let mut eeprom = DummyEeprom::new_default();
        let mut out = String::new();
        let request = ReadRequest::ddr4().with_offset(0x140).with_len(2);
        render(&mut eeprom, &request, &options(), &mut out).unwrap();
        assert!(out.starts_with("--------JSON DUMP START--------\n"));
        assert!(out.contains("\"DDR4_B\": [128, 206]"));
    }

    #[test]
    fn test_json_report() {
        let mut eeprom = DummyEeprom::new_default();
        let mut out = String::new();
        let opts = DumpOptions {
            json: true,
            ..options()
        };
        render(&mut eeprom, &ReadRequest::ddr4(), &opts, &mut out).unwrap();
        let (report, _) = out.split_once("--------JSON DUMP START").unwrap();
        let value: serde_json::Value = serde_json::from_str(report).unwrap();
        assert_eq!(value["die_capacity_mb"], 8192);
        assert_eq!(value["device_width"], 8);
    }

    #[test]
    fn test_out_of_range_request() {
        let mut eeprom = DummyEeprom::new_default();
        let mut out = String::new();
        let request = ReadRequest::ddr4().with_offset(0x100);
        let err = render(&mut eeprom, &request, &options(), &mut out).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::RequestOutOfRange { .. })
        ));
        assert_eq!(eeprom.transactions(), 0);
    }
}
