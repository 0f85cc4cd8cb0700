//! Raw Register Dump Source
//!
//! Parses raw sequences of SID register frames, the same layout the binary
//! exporter writes: 25 bytes per frame representing registers R0-R24, no
//! header. A parsed dump can be replayed as a [`FrameSource`].

use super::{FrameSource, RegisterSnapshot};
use crate::constants::REGISTER_COUNT;
use crate::{Result, SidCapError};

/// Parse raw register frames
///
/// Expects data as a sequence of 25-byte register frames.
pub fn parse_dump(data: &[u8]) -> Result<Vec<RegisterSnapshot>> {
    if !data.len().is_multiple_of(REGISTER_COUNT) {
        return Err(format!(
            "Data length {} is not a multiple of {} (expected register frames)",
            data.len(),
            REGISTER_COUNT
        )
        .into());
    }

    let num_frames = data.len() / REGISTER_COUNT;
    let mut frames = Vec::new();
    frames
        .try_reserve_exact(num_frames)
        .map_err(|e| SidCapError::allocation("dump frames", num_frames, e))?;

    for chunk in data.chunks_exact(REGISTER_COUNT) {
        let mut frame = [0u8; REGISTER_COUNT];
        frame.copy_from_slice(chunk);
        frames.push(frame);
    }

    Ok(frames)
}

/// Replays a previously captured register log one frame at a time
#[derive(Debug, Clone)]
pub struct DumpSource {
    frames: Vec<RegisterSnapshot>,
    /// Index of the next frame to load
    next: usize,
    current: RegisterSnapshot,
}

impl DumpSource {
    /// Create a source over already parsed frames
    pub fn new(frames: Vec<RegisterSnapshot>) -> Self {
        DumpSource {
            frames,
            next: 0,
            current: [0u8; REGISTER_COUNT],
        }
    }

    /// Parse `data` as a raw dump and create a source over it
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(Self::new(parse_dump(data)?))
    }

    /// Total frames held by the dump
    pub fn frames_available(&self) -> usize {
        self.frames.len()
    }

    /// Frames not yet replayed
    pub fn frames_remaining(&self) -> usize {
        self.frames.len() - self.next
    }
}

impl FrameSource for DumpSource {
    fn advance_frame(&mut self) -> Result<()> {
        let frame = self.frames.get(self.next).ok_or_else(|| {
            SidCapError::InvalidInput(format!(
                "register dump exhausted after {} frames",
                self.frames.len()
            ))
        })?;
        self.current = *frame;
        self.next += 1;
        Ok(())
    }

    fn registers(&self) -> RegisterSnapshot {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::capture_frames;

    #[test]
    fn test_parse_single_frame() {
        let data = vec![0u8; REGISTER_COUNT];
        let frames = parse_dump(&data).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0], [0u8; REGISTER_COUNT]);
    }

    #[test]
    fn test_parse_multiple_frames() {
        let data: Vec<u8> = (0..75u8).collect(); // 3 frames
        let frames = parse_dump(&data).unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[1][0], 25);
        assert_eq!(frames[2][24], 74);
    }

    #[test]
    fn test_parse_invalid_length() {
        let data = vec![0u8; 26]; // Not a multiple of 25
        let result = parse_dump(&data);
        assert!(matches!(result, Err(SidCapError::InvalidInput(_))));
    }

    #[test]
    fn test_parse_empty_dump() {
        assert!(parse_dump(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_source_replays_then_exhausts() {
        let data: Vec<u8> = (0..50u8).collect();
        let mut source = DumpSource::from_bytes(&data).unwrap();
        assert_eq!(source.frames_available(), 2);

        source.advance_frame().unwrap();
        assert_eq!(source.registers()[0], 0);
        source.advance_frame().unwrap();
        assert_eq!(source.registers()[0], 25);
        assert_eq!(source.frames_remaining(), 0);

        let err = source.advance_frame().unwrap_err();
        assert!(err.to_string().contains("exhausted after 2 frames"));
    }

    #[test]
    fn test_capture_from_dump_reproduces_bytes() {
        let data: Vec<u8> = (0..250u32).map(|b| (b * 7 % 256) as u8).collect();
        let mut source = DumpSource::from_bytes(&data).unwrap();
        let buffer = capture_frames(&mut source, 10).unwrap();
        assert_eq!(buffer.as_bytes(), data.as_slice());
    }
}
