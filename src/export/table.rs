//! Text table export
//!
//! One fixed header line, then one row per frame: the decimal frame index
//! followed by the 25 register values, all separated by `", "`.

use std::fmt;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::capture::{FrameBuffer, RegisterSnapshot};
use crate::constants::{TABLE_HEADER, TABLE_SEPARATOR};
use crate::{Result, SidCapError};

/// Numeric base for register values in a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericBase {
    /// Two-digit uppercase hexadecimal, no prefix
    Hex,
    /// Plain decimal, no padding
    Decimal,
}

impl NumericBase {
    /// Append `value` to `out` in this base
    pub fn format_value(self, value: u8, out: &mut String) {
        // Writing into a String cannot fail
        let _ = match self {
            NumericBase::Hex => write!(out, "{value:02X}"),
            NumericBase::Decimal => write!(out, "{value}"),
        };
    }

    /// Parse a register value written in this base
    pub fn parse_value(self, text: &str) -> Option<u8> {
        let radix = match self {
            NumericBase::Hex => 16,
            NumericBase::Decimal => 10,
        };
        u8::from_str_radix(text, radix).ok()
    }
}

impl fmt::Display for NumericBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NumericBase::Hex => "hexadecimal",
            NumericBase::Decimal => "decimal",
        })
    }
}

impl FromStr for NumericBase {
    type Err = SidCapError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "hex" | "hexadecimal" => Ok(NumericBase::Hex),
            "dec" | "decimal" => Ok(NumericBase::Decimal),
            _ => Err(SidCapError::Config(format!(
                "unknown numeric base '{value}' (expected hex or decimal)"
            ))),
        }
    }
}

/// Render one data row (without the trailing newline)
pub fn format_row(frame: usize, registers: &RegisterSnapshot, base: NumericBase) -> String {
    let mut line = String::with_capacity(8 + registers.len() * 5);
    let _ = write!(line, "{frame}");
    for &value in registers {
        line.push_str(TABLE_SEPARATOR);
        base.format_value(value, &mut line);
    }
    line
}

/// Write the header and one row per frame to `writer`
pub fn write_table<W: Write>(buffer: &FrameBuffer, base: NumericBase, writer: &mut W) -> Result<()> {
    writeln!(writer, "{TABLE_HEADER}")?;
    for (frame, registers) in buffer.frames().enumerate() {
        writeln!(writer, "{}", format_row(frame, registers, base))?;
    }
    writer.flush()?;
    Ok(())
}

/// Export the frame buffer as a text table file
///
/// Rows already flushed before an I/O failure stay in the file; the error is
/// still returned.
pub fn export_table<P: AsRef<Path>>(
    buffer: &FrameBuffer,
    base: NumericBase,
    output_path: P,
) -> Result<()> {
    let mut writer = BufWriter::new(File::create(output_path.as_ref())?);
    write_table(buffer, base, &mut writer)?;
    writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;
    tracing::debug!(rows = buffer.frame_count(), %base, "register table written");
    Ok(())
}
