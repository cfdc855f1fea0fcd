//! CLI argument parsing

use crate::transports;
use clap::{Args, Parser, Subcommand};
use spdread_core::capture::DEFAULT_CHANNEL;
use std::path::PathBuf;

/// Parse a string as a hex or decimal u32
fn parse_hex_u32(s: &str) -> Result<u32, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u32>().map_err(|e| format!("Invalid number: {}", e))
    }
}

/// Parse a string as a hex or decimal u8
pub fn parse_hex_u8(s: &str) -> Result<u8, String> {
    let value = parse_hex_u32(s)?;
    u8::try_from(value).map_err(|_| format!("Value out of range (max 0xff): {}", s))
}

/// Parse a string as a hex or decimal u16
pub fn parse_hex_u16(s: &str) -> Result<u16, String> {
    let value = parse_hex_u32(s)?;
    u16::try_from(value).map_err(|_| format!("Value out of range (max 0xffff): {}", s))
}

/// Generate dynamic help text for the transport argument
fn transport_help() -> String {
    format!(
        "Transport to use [available: {}]",
        transports::transport_names_short()
    )
}

#[derive(Parser)]
#[command(name = "spdread")]
#[command(author, version, about = "DDR4 SPD EEPROM reader", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options of the dump command
#[derive(Args, Debug, Clone)]
pub struct DumpArgs {
    /// Transport to use
    #[arg(short, long, help = transport_help())]
    pub transport: String,

    /// 7-bit I2C address of the SPD EEPROM
    #[arg(short, long, default_value = "0x50", value_parser = parse_hex_u8)]
    pub address: u8,

    /// Start offset inside the EEPROM
    #[arg(long, default_value = "0", value_parser = parse_hex_u16)]
    pub offset: u16,

    /// Number of bytes to read
    #[arg(short, long, default_value = "384", value_parser = parse_hex_u16)]
    pub length: u16,

    /// Channel name used in the JSON dump
    #[arg(short, long, default_value = DEFAULT_CHANNEL)]
    pub channel: String,

    /// Skip the decoded report
    #[arg(long)]
    pub no_decode: bool,

    /// Print the decoded report as JSON
    #[arg(long)]
    pub json: bool,

    /// Terminate the dump with an EOT byte (closes serial terminal sessions)
    #[arg(long)]
    pub eot: bool,

    /// Also write the verified raw image to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read, verify and dump an SPD EEPROM
    Dump(DumpArgs),

    /// Decode the JSON dump found in a saved console capture
    Analyse {
        /// Capture file (reads stdin if not specified)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Channel to decode
        #[arg(short, long, default_value = DEFAULT_CHANNEL)]
        channel: String,

        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// List supported transports
    ListTransports,
}
