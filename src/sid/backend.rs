//! Backend trait abstraction for SID chip implementations
//!
//! The audio renderer replays captured register frames through any type
//! implementing [`SidBackend`], so alternative chip models can be swapped in
//! without touching the render loop.

use super::SidModel;
use crate::capture::RegisterSnapshot;

/// Common interface for SID chip backends
///
/// # Example
///
/// ```
/// use sidcap::{Sid, SidBackend, SidModel};
///
/// fn play_note<B: SidBackend>(chip: &mut B) {
///     chip.write_register(0x00, 0x1C); // Voice 1 frequency low
///     chip.write_register(0x01, 0x1D); // Voice 1 frequency high
///     chip.write_register(0x06, 0xF0); // Voice 1 sustain
///     chip.write_register(0x18, 0x0F); // Master volume
///     chip.write_register(0x04, 0x21); // Sawtooth + gate
///
///     chip.clock();
///     let sample = chip.get_sample();
///     assert!(sample.abs() <= 1.0);
/// }
///
/// play_note(&mut Sid::new(SidModel::Mos8580));
/// ```
pub trait SidBackend: Send {
    /// Create a backend for `model` with explicit system clock and output rate
    ///
    /// # Arguments
    ///
    /// * `model` - Chip revision to emulate
    /// * `clock_hz` - System clock driving the chip in Hz
    /// * `sample_rate` - Audio output sample rate in Hz
    fn with_clocks(model: SidModel, clock_hz: u32, sample_rate: u32) -> Self
    where
        Self: Sized;

    /// Chip revision being emulated
    fn model(&self) -> SidModel;

    /// Reset to power-on state
    ///
    /// Clears all registers, oscillators, envelopes and filter state.
    fn reset(&mut self);

    /// Write a register (`0x00-0x18`); other addresses are ignored
    fn write_register(&mut self, addr: u8, value: u8);

    /// Read a register
    ///
    /// Only the voice 3 oscillator (`0x1B`) and envelope (`0x1C`) read back
    /// live values; write-only registers read as 0.
    fn read_register(&self, addr: u8) -> u8;

    /// Load all 25 writable registers at once, in address order
    fn load_registers(&mut self, regs: &RegisterSnapshot) {
        for (addr, &value) in regs.iter().enumerate() {
            self.write_register(addr as u8, value);
        }
    }

    /// Last values written to the 25 writable registers
    fn dump_registers(&self) -> RegisterSnapshot;

    /// Advance the chip by one output sample period
    fn clock(&mut self);

    /// Last generated sample, normalized to [-1.0, 1.0]
    fn get_sample(&self) -> f32;

    /// Generate multiple audio samples
    fn generate_samples(&mut self, count: usize) -> Vec<f32> {
        let mut samples = vec![0.0; count];
        self.generate_samples_into(&mut samples);
        samples
    }

    /// Generate audio samples into a caller-provided buffer
    fn generate_samples_into(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            self.clock();
            *sample = self.get_sample();
        }
    }
}
