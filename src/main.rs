//! spdread - DDR4 SPD EEPROM reader
//!
//! Reads the Serial Presence Detect EEPROM of a DDR4 module over I2C,
//! verifies the download by reading it twice, decodes the fields that matter
//! during memory bring-up and prints the raw bytes as a framed JSON dump.
//!
//! # Architecture
//!
//! Every bus is reached through the `I2cMaster` trait from `spdread-core`:
//! - **dummy** - In-memory EEPROM with fault injection, for testing
//! - **linux_i2c** - Linux i2c-dev adapters
//!
//! The `analyse` command decodes a dump recovered from a console capture,
//! so a board without a host-visible bus can still be inspected.

mod cli;
mod commands;
mod transports;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    match cli.command {
        Commands::Dump(args) => commands::dump::run(&args),
        Commands::Analyse {
            input,
            channel,
            json,
        } => commands::analyse::run(input.as_deref(), &channel, json),
        Commands::ListTransports => {
            commands::list_transports();
            Ok(())
        }
    }
}
