//! SID Register Definitions
//!
//! The 25 writable registers `$D400-$D418`: three identical 7-register voice
//! blocks followed by the filter and volume registers.

use bitflags::bitflags;

/// Registers per voice block
pub const VOICE_STRIDE: u8 = 7;

/// Offsets inside a voice block
pub const FREQ_LO: u8 = 0x00;
/// Frequency high byte
pub const FREQ_HI: u8 = 0x01;
/// Pulse width low byte
pub const PW_LO: u8 = 0x02;
/// Pulse width high nibble
pub const PW_HI: u8 = 0x03;
/// Waveform and control bits
pub const CONTROL: u8 = 0x04;
/// Attack / decay nibbles
pub const ATTACK_DECAY: u8 = 0x05;
/// Sustain / release nibbles
pub const SUSTAIN_RELEASE: u8 = 0x06;

/// Filter cutoff, low 3 bits
pub const FILTER_CUTOFF_LO: u8 = 0x15;
/// Filter cutoff, high 8 bits
pub const FILTER_CUTOFF_HI: u8 = 0x16;
/// Resonance (high nibble) and voice routing (low nibble)
pub const FILTER_RES_ROUTING: u8 = 0x17;
/// Filter mode (high nibble) and master volume (low nibble)
pub const MODE_VOLUME: u8 = 0x18;
/// Voice 3 oscillator output (read-only)
pub const OSC3: u8 = 0x1B;
/// Voice 3 envelope output (read-only)
pub const ENV3: u8 = 0x1C;

bitflags! {
    /// Voice control register bitflags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct VoiceControl: u8 {
        /// Envelope gate (rising edge starts attack, falling edge release)
        const GATE = 0x01;
        /// Hard sync with the previous voice
        const SYNC = 0x02;
        /// Ring modulation with the previous voice (triangle only)
        const RING_MOD = 0x04;
        /// Holds the oscillator at zero and resets noise
        const TEST = 0x08;
        /// Triangle waveform
        const TRIANGLE = 0x10;
        /// Sawtooth waveform
        const SAWTOOTH = 0x20;
        /// Pulse waveform
        const PULSE = 0x40;
        /// Noise waveform
        const NOISE = 0x80;
    }
}

bitflags! {
    /// Filter mode bits in the upper nibble of `$D418`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FilterMode: u8 {
        /// Low-pass output enabled
        const LOW_PASS = 0x10;
        /// Band-pass output enabled
        const BAND_PASS = 0x20;
        /// High-pass output enabled
        const HIGH_PASS = 0x40;
        /// Voice 3 disconnected from the output
        const VOICE3_OFF = 0x80;
    }
}

/// Voice index and in-block offset for a voice register address
pub fn voice_register(addr: u8) -> Option<(usize, u8)> {
    if addr < 3 * VOICE_STRIDE {
        Some(((addr / VOICE_STRIDE) as usize, addr % VOICE_STRIDE))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_register_mapping() {
        assert_eq!(voice_register(0x00), Some((0, FREQ_LO)));
        assert_eq!(voice_register(0x04), Some((0, CONTROL)));
        assert_eq!(voice_register(0x0B), Some((1, CONTROL)));
        assert_eq!(voice_register(0x14), Some((2, SUSTAIN_RELEASE)));
        assert_eq!(voice_register(FILTER_CUTOFF_LO), None);
    }

    #[test]
    fn test_control_waveform_bits() {
        let ctrl = VoiceControl::from_bits_truncate(0x41);
        assert!(ctrl.contains(VoiceControl::GATE | VoiceControl::PULSE));
        assert!(!ctrl.contains(VoiceControl::TEST));
    }
}
