//! Transport registration and dispatch
//!
//! This module provides a centralized registry for all I2C transports, with
//! support for feature-gated inclusion and dynamic help text generation.

use spdread_core::i2c::{I2cMaster, StatusCode};
use std::collections::HashMap;

/// An open transport, whatever backs it
pub type Transport = Box<dyn I2cMaster + Send>;

/// Information about a transport
pub struct TransportInfo {
    /// Primary name (used for matching)
    pub name: &'static str,
    /// Alternative names/aliases
    pub aliases: &'static [&'static str],
    /// Short description
    pub description: &'static str,
}

/// Get information about all available transports (enabled at compile time)
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_transports() -> Vec<TransportInfo> {
    let mut transports = Vec::new();

    #[cfg(feature = "dummy")]
    transports.push(TransportInfo {
        name: "dummy",
        aliases: &[],
        description:
            "In-memory SPD EEPROM (file=<image>,addr=<hex>,flip=<offset>,flip-on=<n>,fail=<status>)",
    });

    #[cfg(feature = "linux-i2c")]
    transports.push(TransportInfo {
        name: "linux_i2c",
        aliases: &["linux-i2c", "i2cdev"],
        description: "Linux i2c-dev interface (dev=/dev/i2c-N or bus=N,force=<yes|no>)",
    });

    transports
}

/// Generate a short list of transport names for CLI help
pub fn transport_names_short() -> String {
    let transports = available_transports();
    let names: Vec<&str> = transports.iter().map(|t| t.name).collect();
    names.join(", ")
}

/// Parsed transport parameters
#[derive(Debug)]
pub struct TransportParams {
    /// Transport name as given
    pub name: String,
    /// Key-value parameters
    pub params: HashMap<String, String>,
}

impl TransportParams {
    /// Parameters as borrowed pairs, the form transport crates take
    pub fn options(&self) -> Vec<(&str, &str)> {
        self.params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

/// Parse a transport string into name and parameters
///
/// Format: "name" or "name:key1=value1,key2=value2"
pub fn parse_transport_params(s: &str) -> Result<TransportParams, Box<dyn std::error::Error>> {
    let (name, opts_str) = s.split_once(':').unwrap_or((s, ""));

    let mut params = HashMap::new();
    if !opts_str.is_empty() {
        for opt in opts_str.split(',') {
            if let Some((key, value)) = opt.split_once('=') {
                params.insert(key.to_string(), value.to_string());
            } else {
                return Err(
                    format!("Invalid parameter format: '{}' (expected key=value)", opt).into(),
                );
            }
        }
    }

    Ok(TransportParams {
        name: name.to_string(),
        params,
    })
}

/// Open a transport from its CLI string
pub fn open_transport(transport: &str) -> Result<Transport, Box<dyn std::error::Error>> {
    let params = parse_transport_params(transport)?;

    match params.name.as_str() {
        #[cfg(feature = "dummy")]
        "dummy" => open_dummy(&params),

        #[cfg(feature = "linux-i2c")]
        "linux_i2c" | "linux-i2c" | "i2cdev" => open_linux_i2c(&params),

        _ => Err(format!(
            "Unknown transport: {} (available: {})",
            params.name,
            transport_names_short()
        )
        .into()),
    }
}

/// Parse a status name or raw HAL status value
#[allow(dead_code)]
pub fn parse_status(s: &str) -> Result<StatusCode, String> {
    let status = match s {
        "true" | "ack" => StatusCode::True,
        "error" => StatusCode::Error,
        "timeout" => StatusCode::Timeout,
        "bad-arg" => StatusCode::BadArgument,
        "range" => StatusCode::OutOfRange,
        "nack" => StatusCode::NackError,
        "arb-lost" => StatusCode::ArbitrationLostError,
        "busy" => StatusCode::Busy,
        raw => StatusCode::from_raw(
            raw.parse::<i32>()
                .map_err(|_| format!("Unknown status: {}", raw))?,
        ),
    };
    Ok(status)
}

#[cfg(feature = "dummy")]
fn open_dummy(params: &TransportParams) -> Result<Transport, Box<dyn std::error::Error>> {
    use crate::cli::{parse_hex_u16, parse_hex_u8};
    use spdread_dummy::{DummyConfig, DummyEeprom, Flip};

    let mut config = DummyConfig::default();

    if let Some(addr) = params.params.get("addr") {
        config.address = parse_hex_u8(addr)?;
    }
    if let Some(fail) = params.params.get("fail") {
        config.status = parse_status(fail)?;
    }
    if let Some(offset) = params.params.get("flip") {
        let transaction = match params.params.get("flip-on") {
            Some(n) => n
                .parse()
                .map_err(|_| format!("Invalid flip-on value: {}", n))?,
            // The verification read
            None => 1,
        };
        config.flip = Some(Flip {
            transaction,
            offset: usize::from(parse_hex_u16(offset)?),
            xor: 0x01,
        });
    }

    let eeprom = match params.params.get("file") {
        Some(path) => {
            let data = std::fs::read(path)
                .map_err(|e| format!("Failed to read SPD image {}: {}", path, e))?;
            log::info!("dummy: Loaded {} bytes from {}", data.len(), path);
            DummyEeprom::with_data(config, &data)
        }
        None => DummyEeprom::new(config),
    };

    log::info!("Opened dummy transport");
    Ok(Box::new(eeprom))
}

#[cfg(feature = "linux-i2c")]
fn open_linux_i2c(params: &TransportParams) -> Result<Transport, Box<dyn std::error::Error>> {
    log::info!("Opening Linux I2C transport...");

    spdread_linux_i2c::open_linux_i2c(&params.options()).map_err(|e| {
        format!(
            "Failed to open Linux I2C device: {}\n\
             Make sure i2c-dev is loaded and you have read/write permissions.\n\
             You may need to: sudo usermod -aG i2c $USER",
            e
        )
        .into()
    })
}
