//! Text Table Source
//!
//! Reads back the tabular export (`Frame, R00, ..., R24` followed by one row
//! per frame) in either numeric base, so a table can be re-exported as a
//! binary dump or rendered to audio.

use std::io::Read;

use super::{FrameSource, RegisterSnapshot};
use crate::constants::{REGISTER_COUNT, TABLE_HEADER, TABLE_SEPARATOR};
use crate::export::NumericBase;
use crate::{Result, SidCapError};

fn csv_error(err: csv::Error) -> SidCapError {
    let line = err.position().map(|p| p.line());
    match err.into_kind() {
        csv::ErrorKind::Io(io) => SidCapError::Io(io),
        kind => match line {
            Some(line) => SidCapError::InvalidInput(format!("table line {line}: {kind:?}")),
            None => SidCapError::InvalidInput(format!("table: {kind:?}")),
        },
    }
}

/// Parse a register table written in `base`
///
/// The header must match the fixed table header and frame indices must run
/// 0, 1, 2, ... without gaps.
pub fn parse_table<R: Read>(reader: R, base: NumericBase) -> Result<Vec<RegisterSnapshot>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().map_err(csv_error)?;
    let expected = TABLE_HEADER.split(TABLE_SEPARATOR);
    if headers.len() != REGISTER_COUNT + 1 || !headers.iter().eq(expected) {
        return Err("table header does not match the register table layout".into());
    }

    let mut frames = Vec::new();
    for (index, record) in rdr.records().enumerate() {
        let record = record.map_err(csv_error)?;

        let frame_field = record.get(0).unwrap_or_default();
        let frame: usize = frame_field
            .parse()
            .map_err(|_| format!("row {index}: invalid frame index '{frame_field}'"))?;
        if frame != index {
            return Err(format!("row {index}: expected frame {index}, found {frame}").into());
        }

        let mut snapshot = [0u8; REGISTER_COUNT];
        for (reg, field) in record.iter().skip(1).enumerate() {
            snapshot[reg] = base.parse_value(field).ok_or_else(|| {
                format!("frame {frame} R{reg:02}: '{field}' is not a {base} register value")
            })?;
        }

        frames.push(snapshot);
    }

    Ok(frames)
}

/// Replays the frames of a parsed register table
#[derive(Debug, Clone)]
pub struct TableSource {
    frames: std::vec::IntoIter<RegisterSnapshot>,
    total: usize,
    current: RegisterSnapshot,
}

impl TableSource {
    /// Parse a table from `reader` and create a source over it
    pub fn from_reader<R: Read>(reader: R, base: NumericBase) -> Result<Self> {
        let frames = parse_table(reader, base)?;
        Ok(TableSource {
            total: frames.len(),
            frames: frames.into_iter(),
            current: [0u8; REGISTER_COUNT],
        })
    }

    /// Total frames held by the table
    pub fn frames_available(&self) -> usize {
        self.total
    }
}

impl FrameSource for TableSource {
    fn advance_frame(&mut self) -> Result<()> {
        self.current = self.frames.next().ok_or_else(|| {
            SidCapError::InvalidInput(format!("register table exhausted after {} frames", self.total))
        })?;
        Ok(())
    }

    fn registers(&self) -> RegisterSnapshot {
        self.current
    }
}
