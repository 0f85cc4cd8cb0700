//! SID chip: three voices, envelopes, filter and master volume.
//!
//! The chip ticks at the system clock. Each output sample averages the
//! ticks that fall inside its period; the fractional tick count is carried
//! to the next sample so long renders do not drift.

use super::backend::SidBackend;
use super::envelope::Envelope;
use super::filter::Filter;
use super::registers::{
    self, FilterMode, VoiceControl, FILTER_CUTOFF_HI, FILTER_CUTOFF_LO, FILTER_RES_ROUTING,
    MODE_VOLUME,
};
use super::voice::Voice;
use super::SidModel;
use crate::capture::RegisterSnapshot;
use crate::constants::{DEFAULT_SAMPLE_RATE, PAL_CLOCK_HZ, REGISTER_COUNT};

/// Full-scale mix of three centred 12-bit voices
const MIX_FULL_SCALE: f32 = 3.0 * 2048.0;

/// MOS 6581/8580 SID emulator
#[derive(Debug, Clone)]
pub struct Sid {
    model: SidModel,
    voices: [Voice; 3],
    envelopes: [Envelope; 3],
    filter: Filter,
    volume: u8,
    regs: RegisterSnapshot,
    ticks_per_sample: f64,
    tick_phase: f64,
    last_sample: f32,
}

impl Sid {
    /// Create a SID with PAL clock and 44.1 kHz output
    pub fn new(model: SidModel) -> Self {
        Self::with_clocks(model, PAL_CLOCK_HZ, DEFAULT_SAMPLE_RATE)
    }

    /// Run the chip for one system clock tick and return the mixed output
    pub fn tick(&mut self) -> f32 {
        let prev_msb = [
            self.voices[0].msb(),
            self.voices[1].msb(),
            self.voices[2].msb(),
        ];

        for voice in &mut self.voices {
            voice.clock_accumulator();
        }

        // Sync and ring sources: voice 3 -> 1, 1 -> 2, 2 -> 3
        for i in 0..3 {
            let src = (i + 2) % 3;
            let src_msb = self.voices[src].msb();
            self.voices[i].apply_sync(prev_msb[src], src_msb);
        }

        for (env, voice) in self.envelopes.iter_mut().zip(self.voices.iter()) {
            env.clock(voice.gate());
        }

        let voice3_off = self.filter.mode.contains(FilterMode::VOICE3_OFF);
        let mut filtered = 0.0f32;
        let mut direct = 0.0f32;
        for i in 0..3 {
            let ring_msb = self.voices[(i + 2) % 3].msb();
            let waveform = self.voices[i].waveform_output(ring_msb);
            let level = self.envelopes[i].level;
            let amplitude = (f32::from(waveform) - 2048.0) * f32::from(level) / 255.0;

            // Voice 3 off only disconnects it from the unfiltered path
            if self.filter.voice_routed(i) {
                filtered += amplitude;
            } else if !(i == 2 && voice3_off) {
                direct += amplitude;
            }
        }

        let mixed = (self.filter.clock(filtered) + direct) * f32::from(self.volume) / 15.0;
        mixed / MIX_FULL_SCALE
    }

    fn write_voice(&mut self, voice: usize, offset: u8, value: u8) {
        let v = &mut self.voices[voice];
        match offset {
            registers::FREQ_LO => v.frequency = (v.frequency & 0xFF00) | u16::from(value),
            registers::FREQ_HI => v.frequency = (v.frequency & 0x00FF) | (u16::from(value) << 8),
            registers::PW_LO => v.pulse_width = (v.pulse_width & 0x0F00) | u16::from(value),
            registers::PW_HI => {
                v.pulse_width = (v.pulse_width & 0x00FF) | (u16::from(value & 0x0F) << 8)
            }
            registers::CONTROL => v.control = VoiceControl::from_bits_truncate(value),
            registers::ATTACK_DECAY => self.envelopes[voice].set_attack_decay(value),
            registers::SUSTAIN_RELEASE => self.envelopes[voice].set_sustain_release(value),
            _ => {}
        }
    }
}

impl SidBackend for Sid {
    fn with_clocks(model: SidModel, clock_hz: u32, sample_rate: u32) -> Self {
        let ticks_per_sample = if sample_rate == 0 {
            0.0
        } else {
            f64::from(clock_hz) / f64::from(sample_rate)
        };
        Sid {
            model,
            voices: [Voice::new(), Voice::new(), Voice::new()],
            envelopes: [Envelope::new(), Envelope::new(), Envelope::new()],
            filter: Filter::new(model),
            volume: 0,
            regs: [0u8; REGISTER_COUNT],
            ticks_per_sample,
            tick_phase: 0.0,
            last_sample: 0.0,
        }
    }

    fn model(&self) -> SidModel {
        self.model
    }

    fn reset(&mut self) {
        self.voices = [Voice::new(), Voice::new(), Voice::new()];
        self.envelopes = [Envelope::new(), Envelope::new(), Envelope::new()];
        self.filter = Filter::new(self.model);
        self.volume = 0;
        self.regs = [0u8; REGISTER_COUNT];
        self.tick_phase = 0.0;
        self.last_sample = 0.0;
    }

    fn write_register(&mut self, addr: u8, value: u8) {
        let Some(slot) = self.regs.get_mut(addr as usize) else {
            return;
        };
        *slot = value;

        if let Some((voice, offset)) = registers::voice_register(addr) {
            self.write_voice(voice, offset, value);
            return;
        }

        match addr {
            FILTER_CUTOFF_LO => self.filter.set_cutoff_lo(value),
            FILTER_CUTOFF_HI => self.filter.set_cutoff_hi(value),
            FILTER_RES_ROUTING => {
                self.filter.resonance = value >> 4;
                self.filter.routing = value & 0x07;
            }
            MODE_VOLUME => {
                self.volume = value & 0x0F;
                self.filter.mode = FilterMode::from_bits_truncate(value);
            }
            _ => {}
        }
    }

    fn read_register(&self, addr: u8) -> u8 {
        match addr {
            registers::OSC3 => {
                let ring_msb = self.voices[1].msb();
                (self.voices[2].waveform_output(ring_msb) >> 4) as u8
            }
            registers::ENV3 => self.envelopes[2].level,
            _ => 0,
        }
    }

    fn dump_registers(&self) -> RegisterSnapshot {
        self.regs
    }

    fn clock(&mut self) {
        self.tick_phase += self.ticks_per_sample;
        let ticks = self.tick_phase as u32;
        if ticks == 0 {
            return;
        }
        self.tick_phase -= f64::from(ticks);

        let mut sum = 0.0f32;
        for _ in 0..ticks {
            sum += self.tick();
        }
        self.last_sample = (sum / ticks as f32).clamp(-1.0, 1.0);
    }

    fn get_sample(&self) -> f32 {
        self.last_sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sawtooth_chip(model: SidModel) -> Sid {
        let mut sid = Sid::new(model);
        // Voice 1 sawtooth ~440 Hz, instant attack, full sustain, volume 15
        let freq: u16 = 7479;
        sid.write_register(0x00, (freq & 0xFF) as u8);
        sid.write_register(0x01, (freq >> 8) as u8);
        sid.write_register(0x05, 0x00);
        sid.write_register(0x06, 0xF0);
        sid.write_register(0x18, 0x0F);
        sid.write_register(0x04, 0x21);
        sid
    }

    #[test]
    fn test_zero_registers_are_silent() {
        let mut sid = Sid::new(SidModel::Mos8580);
        sid.load_registers(&[0u8; REGISTER_COUNT]);
        let samples = sid.generate_samples(882 * 5);
        assert!(samples.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_sawtooth_swings_both_ways() {
        let mut sid = sawtooth_chip(SidModel::Mos6581);
        let samples = sid.generate_samples(4410);
        assert!(samples.iter().any(|&s| s > 0.01));
        assert!(samples.iter().any(|&s| s < -0.01));
        assert!(samples.iter().all(|s| s.abs() <= 1.0));
    }

    #[test]
    fn test_dump_returns_written_registers() {
        let mut sid = Sid::new(SidModel::Mos8580);
        let mut regs = [0u8; REGISTER_COUNT];
        for (i, r) in regs.iter_mut().enumerate() {
            *r = i as u8 * 3;
        }
        sid.load_registers(&regs);
        assert_eq!(sid.dump_registers(), regs);

        sid.write_register(0x1F, 0xAA);
        assert_eq!(sid.dump_registers(), regs);
    }

    #[test]
    fn test_env3_reads_back() {
        let mut sid = Sid::new(SidModel::Mos6581);
        sid.write_register(0x13, 0x00);
        sid.write_register(0x14, 0xF0);
        sid.write_register(0x12, 0x01);
        for _ in 0..3000 {
            sid.tick();
        }
        assert_eq!(sid.read_register(registers::ENV3), 0xFF);
        assert_eq!(sid.read_register(0x00), 0);
    }

    #[test]
    fn test_reset_restores_silence() {
        let mut sid = sawtooth_chip(SidModel::Mos8580);
        sid.generate_samples(1000);
        sid.reset();
        assert_eq!(sid.dump_registers(), [0u8; REGISTER_COUNT]);
        assert!(sid.generate_samples(100).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_tick_carry_keeps_clock_exact() {
        // 985248 / 44100 = 22.34...; over one second exactly 985248 ticks run
        let mut sid = Sid::new(SidModel::Mos8580);
        let mut ticks = 0u64;
        for _ in 0..DEFAULT_SAMPLE_RATE {
            let before = sid.tick_phase;
            sid.clock();
            ticks += (before + sid.ticks_per_sample - sid.tick_phase).round() as u64;
        }
        assert!(ticks.abs_diff(u64::from(PAL_CLOCK_HZ)) <= 1);
    }

    #[test]
    fn test_models_differ_when_filtered() {
        let render = |model: SidModel| {
            let mut sid = sawtooth_chip(model);
            sid.write_register(0x16, 0x20);
            sid.write_register(0x17, 0xF1);
            sid.write_register(0x18, 0x1F);
            sid.generate_samples(2000)
        };
        assert_ne!(render(SidModel::Mos6581), render(SidModel::Mos8580));
    }
}
