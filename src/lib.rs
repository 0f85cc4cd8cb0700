//! SID register capture and export
//!
//! Captures the per-frame register state of a MOS 6581/8580 SID into a flat
//! frame buffer and re-exports it as a raw binary dump, a text table, or a
//! rendered 16-bit PCM WAV file.
//!
//! # Features
//! - Fixed-width frame buffer (25 registers per frame, `$D400-$D418`)
//! - Capture driver over any [`FrameSource`] (raw dumps and text tables included)
//! - Raw binary and hexadecimal/decimal table export
//! - Audio rendering through a fresh [`Sid`] with explicit chip model
//! - Mono or duplicated-stereo WAV output
//!
//! # Crate feature flags
//! - `cli` (default): the `sidcap` command-line front end
//!
//! # Quick start
//! ```no_run
//! use sidcap::{capture_frames, export, DumpSource, ExportMode, RenderConfig, SidModel};
//! use sidcap::export::{AudioOptions, ChannelLayout};
//!
//! let data = std::fs::read("tune.sidregs").unwrap();
//! let mut source = DumpSource::from_bytes(&data).unwrap();
//! let frames = source.frames_available();
//! let buffer = capture_frames(&mut source, frames).unwrap();
//!
//! let mode = ExportMode::Audio(AudioOptions {
//!     layout: ChannelLayout::Stereo,
//!     render: RenderConfig::new(SidModel::Mos8580),
//! });
//! let report = export(&buffer, &mode, "tune.wav").unwrap();
//! println!("{report}");
//! ```

#![warn(missing_docs)]

pub mod capture; // Frame buffer, capture driver and frame sources
pub mod config; // Run configuration
pub mod constants;
pub mod export; // Binary, table and WAV exporters
pub mod render; // Register log to PCM rendering
pub mod sid; // SID chip model

use std::collections::TryReserveError;

/// Error types for capture and export operations
#[derive(thiserror::Error, Debug)]
pub enum SidCapError {
    /// Malformed or missing source data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A frame or sample buffer could not be reserved
    #[error("Allocation of {requested} {what} failed: {source}")]
    AllocationFailure {
        /// What was being allocated
        what: &'static str,
        /// Number of elements requested
        requested: usize,
        /// Underlying reservation error
        source: TryReserveError,
    },

    /// IO error from filesystem or output stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error writing the audio container
    #[error("Audio file write error: {0}")]
    AudioFile(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SidCapError {
    pub(crate) fn allocation(what: &'static str, requested: usize, source: TryReserveError) -> Self {
        SidCapError::AllocationFailure {
            what,
            requested,
            source,
        }
    }
}

impl From<String> for SidCapError {
    /// Converts a String into `SidCapError::InvalidInput`.
    ///
    /// Most ad-hoc messages in this crate describe bad source data. Use
    /// `SidCapError::Config(msg)` explicitly for configuration problems.
    fn from(msg: String) -> Self {
        SidCapError::InvalidInput(msg)
    }
}

impl From<&str> for SidCapError {
    fn from(msg: &str) -> Self {
        SidCapError::InvalidInput(msg.to_string())
    }
}

impl From<hound::Error> for SidCapError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(io) => SidCapError::Io(io),
            other => SidCapError::AudioFile(other.to_string()),
        }
    }
}

/// Result type for capture and export operations
pub type Result<T> = std::result::Result<T, SidCapError>;

// Public API exports
pub use capture::{
    capture_frames, parse_dump, parse_table, DumpSource, FrameBuffer, FrameSource,
    RegisterSnapshot, TableSource,
};
pub use config::RunConfig;
pub use constants::{DEFAULT_FRAME_RATE, DEFAULT_SAMPLE_RATE, PAL_CLOCK_HZ, REGISTER_COUNT};
pub use export::{export, ChannelLayout, ExportMode, ExportReport, NumericBase};
pub use render::{audio_duration_seconds, AudioRenderer, FrameClock, RenderConfig, RenderedAudio};
pub use sid::{Sid, SidBackend, SidModel};
