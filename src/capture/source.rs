//! Frame sources and the capture loop
//!
//! A [`FrameSource`] is whatever drives the SID forward one frame at a time:
//! a 6502 player calling the tune's play routine, or a replay of a previously
//! captured log. The capture loop advances the source once per frame and
//! copies its register state into a [`FrameBuffer`].

use super::{FrameBuffer, RegisterSnapshot};
use crate::Result;

/// Producer of one register snapshot per emulated frame
pub trait FrameSource {
    /// Drive the chip state forward by one frame
    fn advance_frame(&mut self) -> Result<()>;

    /// Current register state (R0-R24)
    fn registers(&self) -> RegisterSnapshot;
}

/// Capture `frame_count` frames from `source` into a new buffer
///
/// For each frame the source is advanced once, then its registers are
/// copied in. The first source error aborts the capture.
pub fn capture_frames<S: FrameSource + ?Sized>(
    source: &mut S,
    frame_count: usize,
) -> Result<FrameBuffer> {
    let mut buffer = FrameBuffer::new(frame_count)?;
    tracing::debug!(frame_count, "capturing register frames");

    for frame in 0..frame_count {
        source.advance_frame()?;
        buffer.capture(frame, &source.registers())?;
    }

    tracing::debug!(
        frames = buffer.captured_frames(),
        bytes = buffer.byte_len(),
        "capture complete"
    );
    Ok(buffer)
}
