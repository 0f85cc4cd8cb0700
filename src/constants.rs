//! SID Capture Constants
//!
//! Shared constants for the frame layout, timing and export formats.

/// Number of writable SID registers captured per frame (`$D400-$D418`)
pub const REGISTER_COUNT: usize = 25;

/// Default capture rate in frames per second (PAL vertical blank)
pub const DEFAULT_FRAME_RATE: u32 = 50;

/// Default PCM output sample rate in Hz
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// PAL C64 system clock in Hz (drives the SID)
pub const PAL_CLOCK_HZ: u32 = 985_248;

/// NTSC C64 system clock in Hz
pub const NTSC_CLOCK_HZ: u32 = 1_022_727;

/// Fixed header line of the tabular export
pub const TABLE_HEADER: &str = "Frame, R00, R01, R02, R03, R04, R05, R06, R07, R08, R09, R10, R11, R12, R13, R14, R15, R16, R17, R18, R19, R20, R21, R22, R23, R24";

/// Separator between fields of a table row
pub const TABLE_SEPARATOR: &str = ", ";
