//! Register Capture Domain
//!
//! Owns the frame buffer that holds one register snapshot per emulated
//! frame, the capture driver that fills it, and the frame sources that can
//! feed it (live players behind [`FrameSource`], raw dumps, text tables).

pub mod dump;
pub mod source;
pub mod table;

pub use dump::{parse_dump, DumpSource};
pub use source::{capture_frames, FrameSource};
pub use table::{parse_table, TableSource};

use crate::constants::REGISTER_COUNT;
use crate::{Result, SidCapError};

/// Full register state of the SID at one frame boundary (R0-R24)
pub type RegisterSnapshot = [u8; REGISTER_COUNT];

/// Fixed-size log of register snapshots, one per frame
///
/// The buffer is sized once for `frame_count` frames and zero-filled. Frames
/// must be captured in strictly increasing order starting at 0. The flat byte
/// view is always exactly `frame_count * 25` bytes, with frame `f` register
/// `r` at offset `f * 25 + r`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    frames: Vec<RegisterSnapshot>,
    captured: usize,
}

impl FrameBuffer {
    /// Allocate a zero-filled buffer for `frame_count` frames
    ///
    /// # Errors
    /// Returns [`SidCapError::AllocationFailure`] if the storage cannot be reserved.
    pub fn new(frame_count: usize) -> Result<Self> {
        let mut frames = Vec::new();
        frames
            .try_reserve_exact(frame_count)
            .map_err(|e| SidCapError::allocation("register frames", frame_count, e))?;
        frames.resize(frame_count, [0u8; REGISTER_COUNT]);
        Ok(FrameBuffer {
            frames,
            captured: 0,
        })
    }

    /// Build a fully captured buffer from existing snapshots
    pub fn from_frames(frames: Vec<RegisterSnapshot>) -> Self {
        let captured = frames.len();
        FrameBuffer { frames, captured }
    }

    /// Store `snapshot` as frame `frame_index`
    ///
    /// # Errors
    /// Returns [`SidCapError::InvalidInput`] if `frame_index` is not the next
    /// frame in sequence or lies beyond the configured frame count.
    pub fn capture(&mut self, frame_index: usize, snapshot: &RegisterSnapshot) -> Result<()> {
        if frame_index >= self.frames.len() {
            return Err(format!(
                "frame {} is outside the buffer of {} frames",
                frame_index,
                self.frames.len()
            )
            .into());
        }
        if frame_index != self.captured {
            return Err(format!(
                "frame {} captured out of order (expected frame {})",
                frame_index, self.captured
            )
            .into());
        }

        self.frames[frame_index] = *snapshot;
        self.captured += 1;
        Ok(())
    }

    /// Capture `snapshot` as the next frame in sequence
    pub fn push(&mut self, snapshot: &RegisterSnapshot) -> Result<()> {
        self.capture(self.captured, snapshot)
    }

    /// Configured number of frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Number of frames captured so far
    pub fn captured_frames(&self) -> usize {
        self.captured
    }

    /// True once every frame has been captured
    pub fn is_complete(&self) -> bool {
        self.captured == self.frames.len()
    }

    /// Snapshot of frame `frame`, if in range
    pub fn frame(&self, frame: usize) -> Option<&RegisterSnapshot> {
        self.frames.get(frame)
    }

    /// Value of register `reg` in frame `frame`, if both are in range
    pub fn register(&self, frame: usize, reg: usize) -> Option<u8> {
        self.frames.get(frame)?.get(reg).copied()
    }

    /// Iterate over all frames in order
    pub fn frames(&self) -> std::slice::Iter<'_, RegisterSnapshot> {
        self.frames.iter()
    }

    /// Flat byte view (`frame_count * 25` bytes)
    pub fn as_bytes(&self) -> &[u8] {
        self.frames.as_flattened()
    }

    /// Total size of the flat byte view
    pub fn byte_len(&self) -> usize {
        self.frames.len() * REGISTER_COUNT
    }
}
