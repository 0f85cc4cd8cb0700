//! SID voice: oscillator and waveform generation.
//!
//! Each voice has a 24-bit phase accumulator clocked at the system rate,
//! four selectable waveforms (combined by AND when several are enabled),
//! ring modulation, hard sync, and a test bit that holds the oscillator.

use super::registers::VoiceControl;

/// Noise LFSR power-on state
const NOISE_LFSR_SEED: u32 = 0x7F_FFFF;

const ACC_MASK: u32 = 0x00FF_FFFF;
const ACC_MSB: u32 = 0x0080_0000;

/// A single SID voice oscillator
#[derive(Debug, Clone)]
pub struct Voice {
    /// 24-bit phase accumulator
    pub accumulator: u32,
    /// 16-bit frequency register
    pub frequency: u16,
    /// 12-bit pulse width register
    pub pulse_width: u16,
    /// Control register
    pub control: VoiceControl,
    /// 23-bit noise LFSR
    noise_lfsr: u32,
}

impl Voice {
    /// Create a voice in power-on state
    pub fn new() -> Self {
        Voice {
            accumulator: 0,
            frequency: 0,
            pulse_width: 0,
            control: VoiceControl::empty(),
            noise_lfsr: NOISE_LFSR_SEED,
        }
    }

    /// Step the phase accumulator by the frequency register
    ///
    /// While the test bit is set the accumulator is held at 0 and the noise
    /// LFSR is reset.
    pub fn clock_accumulator(&mut self) {
        if self.control.contains(VoiceControl::TEST) {
            self.accumulator = 0;
            self.noise_lfsr = NOISE_LFSR_SEED;
            return;
        }

        let prev = self.accumulator;
        self.accumulator = prev.wrapping_add(u32::from(self.frequency)) & ACC_MASK;

        // Noise shifts on the rising edge of accumulator bit 19
        if self.accumulator & (1 << 19) != 0 && prev & (1 << 19) == 0 {
            let feedback = ((self.noise_lfsr >> 17) ^ (self.noise_lfsr >> 22)) & 1;
            self.noise_lfsr = ((self.noise_lfsr << 1) | feedback) & 0x7F_FFFF;
        }
    }

    /// Reset the accumulator if the sync source's MSB had a rising edge
    pub fn apply_sync(&mut self, source_prev_msb: bool, source_curr_msb: bool) {
        if self.control.contains(VoiceControl::SYNC) && source_curr_msb && !source_prev_msb {
            self.accumulator = 0;
        }
    }

    /// Compute the 12-bit waveform output
    ///
    /// `ring_mod_source_msb` is the MSB of the ring-modulation source voice.
    pub fn waveform_output(&self, ring_mod_source_msb: bool) -> u16 {
        let mut output: Option<u16> = None;
        let mut combine = |value: u16| {
            output = Some(output.map_or(value, |o| o & value));
        };

        if self.control.contains(VoiceControl::TRIANGLE) {
            let mut tri = self.accumulator;
            if self.control.contains(VoiceControl::RING_MOD) && ring_mod_source_msb {
                tri ^= ACC_MSB;
            }
            let folded = if tri & ACC_MSB != 0 {
                (tri ^ 0x007F_FFFF) >> 11
            } else {
                tri >> 11
            };
            combine((folded & 0xFFF) as u16);
        }

        if self.control.contains(VoiceControl::SAWTOOTH) {
            combine(((self.accumulator >> 12) & 0xFFF) as u16);
        }

        if self.control.contains(VoiceControl::PULSE) {
            let acc12 = ((self.accumulator >> 12) & 0xFFF) as u16;
            combine(if acc12 < (self.pulse_width & 0xFFF) { 0xFFF } else { 0x000 });
        }

        if self.control.contains(VoiceControl::NOISE) {
            // LFSR taps 20, 18, 14, 11, 9, 5, 2, 0 form output bits 11..4
            let lfsr = self.noise_lfsr;
            let noise = (((lfsr >> 20) & 1) << 11)
                | (((lfsr >> 18) & 1) << 10)
                | (((lfsr >> 14) & 1) << 9)
                | (((lfsr >> 11) & 1) << 8)
                | (((lfsr >> 9) & 1) << 7)
                | (((lfsr >> 5) & 1) << 6)
                | (((lfsr >> 2) & 1) << 5)
                | ((lfsr & 1) << 4);
            combine(noise as u16);
        }

        output.unwrap_or(0)
    }

    /// MSB of the accumulator (bit 23)
    pub fn msb(&self) -> bool {
        self.accumulator & ACC_MSB != 0
    }

    /// Whether the gate bit is set
    pub fn gate(&self) -> bool {
        self.control.contains(VoiceControl::GATE)
    }
}

impl Default for Voice {
    fn default() -> Self {
        Self::new()
    }
}
