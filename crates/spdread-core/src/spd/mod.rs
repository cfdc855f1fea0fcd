//! DDR4 SPD decoding
//!
//! Field offsets and encodings follow JEDEC 21-C Annex L (DDR4 SPD).
//! [`decode`] extracts the fields checked during bring-up; [`Analysis`]
//! adds the module-level figures derived from them.

mod analysis;
mod checksum;
mod decode;
pub mod offsets;
mod types;

pub use analysis::Analysis;
pub use checksum::{check_crc, spd_crc, CrcBlock, CrcStatus};
pub use decode::{decode, Report};
pub use types::*;
