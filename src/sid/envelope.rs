//! SID ADSR envelope generator.
//!
//! A rate counter sets the step speed of each phase. Decay and release add an
//! exponential counter whose period grows as the level falls, approximating
//! the chip's exponential curve.

/// Rate counter periods in system clock ticks, indexed by the 4-bit rate
const RATE_PERIODS: [u16; 16] = [
    9, 32, 63, 95, 149, 220, 267, 313, 392, 977, 1954, 3126, 3907, 11_720, 19_532, 31_251,
];

/// Envelope phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Linear rise to 0xFF
    Attack,
    /// Exponential fall to the sustain level
    Decay,
    /// Held at the sustain level
    Sustain,
    /// Exponential fall to zero
    Release,
}

/// ADSR envelope generator for one voice
#[derive(Debug, Clone)]
pub struct Envelope {
    /// Current output level (0-255)
    pub level: u8,
    /// Current phase
    pub phase: Phase,
    /// Attack rate (0-15)
    pub attack: u8,
    /// Decay rate (0-15)
    pub decay: u8,
    /// Sustain level nibble (0-15)
    pub sustain: u8,
    /// Release rate (0-15)
    pub release: u8,
    rate_counter: u16,
    exp_counter: u8,
    exp_period: u8,
    prev_gate: bool,
}

impl Envelope {
    /// Create an envelope at rest (level 0, release phase)
    pub fn new() -> Self {
        Envelope {
            level: 0,
            phase: Phase::Release,
            attack: 0,
            decay: 0,
            sustain: 0,
            release: 0,
            rate_counter: 0,
            exp_counter: 0,
            exp_period: 1,
            prev_gate: false,
        }
    }

    /// Load the attack/decay register
    pub fn set_attack_decay(&mut self, value: u8) {
        self.attack = value >> 4;
        self.decay = value & 0x0F;
    }

    /// Load the sustain/release register
    pub fn set_sustain_release(&mut self, value: u8) {
        self.sustain = value >> 4;
        self.release = value & 0x0F;
    }

    fn sustain_level(&self) -> u8 {
        self.sustain * 0x11
    }

    /// Clock the envelope once per system tick
    pub fn clock(&mut self, gate: bool) {
        if gate && !self.prev_gate {
            self.phase = Phase::Attack;
            self.rate_counter = 0;
            self.exp_counter = 0;
        } else if !gate && self.prev_gate {
            self.phase = Phase::Release;
        }
        self.prev_gate = gate;

        let rate = match self.phase {
            Phase::Attack => self.attack,
            Phase::Decay => self.decay,
            Phase::Sustain => return,
            Phase::Release => self.release,
        };

        self.rate_counter = self.rate_counter.wrapping_add(1);
        if self.rate_counter < RATE_PERIODS[rate as usize] {
            return;
        }
        self.rate_counter = 0;

        match self.phase {
            Phase::Attack => {
                self.level = self.level.saturating_add(1);
                if self.level == 0xFF {
                    self.phase = Phase::Decay;
                }
                self.update_exp_period();
            }
            Phase::Decay => {
                if !self.exp_step() {
                    return;
                }
                let sustain = self.sustain_level();
                if self.level > sustain {
                    self.level -= 1;
                    self.update_exp_period();
                }
                if self.level <= sustain {
                    self.level = sustain;
                    self.phase = Phase::Sustain;
                }
            }
            Phase::Release => {
                if self.exp_step() && self.level > 0 {
                    self.level -= 1;
                    self.update_exp_period();
                }
            }
            Phase::Sustain => {}
        }
    }

    fn exp_step(&mut self) -> bool {
        self.exp_counter = self.exp_counter.wrapping_add(1);
        if self.exp_counter < self.exp_period {
            return false;
        }
        self.exp_counter = 0;
        true
    }

    fn update_exp_period(&mut self) {
        self.exp_period = match self.level {
            0x5D..=0xFF => 1,
            0x36..=0x5C => 2,
            0x1A..=0x35 => 4,
            0x0E..=0x19 => 8,
            0x06..=0x0D => 16,
            _ => 30,
        };
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}
