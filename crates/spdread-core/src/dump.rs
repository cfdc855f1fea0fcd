//! Raw SPD dump rendering
//!
//! The console dump is the contract with host-side tooling: a JSON object
//! framed by marker lines, one array of decimal byte values per memory
//! channel. Everything here writes to a `core::fmt::Write` sink so the same
//! code runs on the soft processor and on the host.

use core::fmt::{self, Write};

/// Line that opens the JSON section of a console capture
pub const DUMP_START: &str = "--------JSON DUMP START--------";
/// Line that closes the JSON section of a console capture
pub const DUMP_END: &str = "--------JSON DUMP END--------";
/// End-of-transmission byte that closes a serial terminal session
pub const EOT: char = '\u{4}';
/// Byte values per dump line
pub const VALUES_PER_LINE: usize = 8;

/// Indent of dump continuation lines
const CONTINUATION: &str = "\n             ";

/// Decimal text of one byte
pub type ByteText = heapless::String<3>;

/// Render each byte as an unpadded decimal string
pub fn raw_dump(bytes: &[u8]) -> impl Iterator<Item = ByteText> + '_ {
    bytes.iter().map(|b| {
        let mut text = ByteText::new();
        // At most three digits, always fits
        let _ = write!(text, "{}", b);
        text
    })
}

/// Write the raw dump as `", "` separated decimal values
pub fn write_raw_dump<W: Write + ?Sized>(w: &mut W, bytes: &[u8]) -> fmt::Result {
    for (i, text) in raw_dump(bytes).enumerate() {
        if i > 0 {
            w.write_str(", ")?;
        }
        w.write_str(&text)?;
    }
    Ok(())
}

/// Write one `"<channel>": [ ... ]` member of the dump object
///
/// Values are right-aligned to three columns and wrapped every
/// [`VALUES_PER_LINE`] values.
pub fn write_channel<W: Write + ?Sized>(w: &mut W, channel: &str, bytes: &[u8]) -> fmt::Result {
    write!(w, "\"{}\": [", channel)?;
    for (i, b) in bytes.iter().enumerate() {
        write!(w, "{:3}", b)?;
        if i + 1 < bytes.len() {
            w.write_str(", ")?;
        }
        if i % VALUES_PER_LINE == VALUES_PER_LINE - 1 {
            w.write_str(CONTINUATION)?;
        }
    }
    w.write_str("]\n")
}

/// Open the JSON section
pub fn write_dump_start<W: Write + ?Sized>(w: &mut W) -> fmt::Result {
    writeln!(w, "{}", DUMP_START)?;
    w.write_str("{ ")
}

/// Mark the dump object as failed
pub fn write_failure<W: Write + ?Sized>(w: &mut W) -> fmt::Result {
    w.write_str("\nFAILED\n")
}

/// Close the JSON section, optionally sending EOT
pub fn write_dump_end<W: Write + ?Sized>(w: &mut W, eot: bool) -> fmt::Result {
    w.write_str(" }\n\n")?;
    writeln!(w, "{}", DUMP_END)?;
    if eot {
        writeln!(w, "{}", EOT)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::String;
    use std::vec::Vec;

    #[test]
    fn test_raw_dump() {
        let texts: Vec<ByteText> = raw_dump(&[0, 255, 16]).collect();
        let texts: Vec<&str> = texts.iter().map(|t| t.as_str()).collect();
        assert_eq!(texts, ["0", "255", "16"]);

        let mut s = String::new();
        write_raw_dump(&mut s, &[0, 255, 16]).unwrap();
        assert_eq!(s, "0, 255, 16");
    }

    #[test]
    fn test_channel_short() {
        let mut s = String::new();
        write_channel(&mut s, "DDR4_B", &[0, 255, 16]).unwrap();
        assert_eq!(s, "\"DDR4_B\": [  0, 255,  16]\n");
    }

    #[test]
    fn test_channel_wraps_every_eight() {
        let bytes: Vec<u8> = (0..16).collect();
        let mut s = String::new();
        write_channel(&mut s, "DDR4_B", &bytes).unwrap();
        let lines: Vec<&str> = s.lines().collect();
        assert_eq!(lines[0], "\"DDR4_B\": [  0,   1,   2,   3,   4,   5,   6,   7, ");
        assert_eq!(lines[1], "               8,   9,  10,  11,  12,  13,  14,  15");
        assert_eq!(lines[2], "             ]");
    }

    #[test]
    fn test_framing() {
        let mut s = String::new();
        write_dump_start(&mut s).unwrap();
        write_failure(&mut s).unwrap();
        write_dump_end(&mut s, true).unwrap();
        assert_eq!(
            s,
            "--------JSON DUMP START--------\n{ \nFAILED\n }\n\n--------JSON DUMP END--------\n\u{4}\n"
        );
    }
}
