//! SID state-variable multi-mode filter.
//!
//! Two-integrator-loop filter with low-pass, band-pass and high-pass outputs
//! that can be summed. The cutoff and resonance curves depend on the chip
//! model: the 6581 has a non-linear cutoff with a high floor and a higher Q
//! ceiling, the 8580 a wider linear range.

use super::registers::FilterMode;
use super::SidModel;

/// State-variable filter
#[derive(Debug, Clone)]
pub struct Filter {
    lp: f32,
    bp: f32,
    /// 11-bit cutoff register
    pub cutoff: u16,
    /// 4-bit resonance register
    pub resonance: u8,
    /// Voices routed through the filter (bits 0-2)
    pub routing: u8,
    /// Active filter outputs
    pub mode: FilterMode,
    model: SidModel,
}

impl Filter {
    /// Create a filter for `model` with all state cleared
    pub fn new(model: SidModel) -> Self {
        Filter {
            lp: 0.0,
            bp: 0.0,
            cutoff: 0,
            resonance: 0,
            routing: 0,
            mode: FilterMode::empty(),
            model,
        }
    }

    /// Set the low 3 cutoff bits
    pub fn set_cutoff_lo(&mut self, value: u8) {
        self.cutoff = (self.cutoff & 0x7F8) | u16::from(value & 0x07);
    }

    /// Set the high 8 cutoff bits
    pub fn set_cutoff_hi(&mut self, value: u8) {
        self.cutoff = (self.cutoff & 0x007) | (u16::from(value) << 3);
    }

    /// Process one tick's input and return the sum of the active outputs
    pub fn clock(&mut self, input: f32) -> f32 {
        let fc = self.cutoff_coefficient();
        let q = self.resonance_coefficient();

        let hp = input - self.lp - q * self.bp;
        self.bp += fc * hp;
        self.lp += fc * self.bp;

        let mut output = 0.0;
        if self.mode.contains(FilterMode::LOW_PASS) {
            output += self.lp;
        }
        if self.mode.contains(FilterMode::BAND_PASS) {
            output += self.bp;
        }
        if self.mode.contains(FilterMode::HIGH_PASS) {
            output += hp;
        }
        output
    }

    fn cutoff_coefficient(&self) -> f32 {
        let x = f32::from(self.cutoff) / 2047.0;
        match self.model {
            SidModel::Mos6581 => (0.003 + 0.02 * x + 0.33 * x * x).clamp(0.002, 0.36),
            SidModel::Mos8580 => 0.001 + x * 0.549,
        }
    }

    /// Damping term; lower values ring more
    fn resonance_coefficient(&self) -> f32 {
        let r = f32::from(self.resonance) / 15.0;
        match self.model {
            SidModel::Mos6581 => 1.7 - r,
            SidModel::Mos8580 => 1.4 - r * 0.7,
        }
    }

    /// Whether voice `voice` (0-2) passes through the filter
    pub fn voice_routed(&self, voice: usize) -> bool {
        self.routing & (1 << voice) != 0
    }
}
