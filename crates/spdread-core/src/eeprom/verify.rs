//! Double-sample comparison

use crate::error::Error;

/// First byte at which two samples disagree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    /// Offset relative to the start of the samples
    pub offset: usize,
    /// Value in the first sample
    pub first: u8,
    /// Value in the second sample
    pub second: u8,
}

impl From<Mismatch> for Error {
    fn from(m: Mismatch) -> Self {
        Error::VerificationMismatch {
            offset: m.offset,
            first: m.first,
            second: m.second,
        }
    }
}

/// Find the first differing byte of two samples
///
/// Only the common prefix is compared.
pub fn first_mismatch(first: &[u8], second: &[u8]) -> Option<Mismatch> {
    first
        .iter()
        .zip(second)
        .position(|(a, b)| a != b)
        .map(|offset| Mismatch {
            offset,
            first: first[offset],
            second: second[offset],
        })
}
