//! Frame-to-sample timing
//!
//! Splits the output sample rate into per-frame chunks. When the sample rate
//! is not a multiple of the frame rate, the remainder is carried from frame
//! to frame so every `frame_rate` consecutive frames total exactly
//! `sample_rate` samples.

/// Per-frame sample counter with remainder carry
#[derive(Debug, Clone)]
pub struct FrameClock {
    sample_rate: u32,
    frame_rate: u32,
    /// Carried remainder, always below `frame_rate`
    remainder: u32,
    /// Frames clocked so far
    frame_count: u64,
    /// Samples handed out so far
    samples_emitted: u64,
}

impl FrameClock {
    /// Create a clock for `sample_rate` Hz output at `frame_rate` frames/s
    ///
    /// `frame_rate` must be non-zero.
    pub fn new(sample_rate: u32, frame_rate: u32) -> Self {
        debug_assert!(frame_rate > 0, "frame rate must be non-zero");
        FrameClock {
            sample_rate,
            frame_rate,
            remainder: 0,
            frame_count: 0,
            samples_emitted: 0,
        }
    }

    /// Number of samples belonging to the next frame
    pub fn next_frame_samples(&mut self) -> usize {
        let total = u64::from(self.sample_rate) + u64::from(self.remainder);
        let rate = u64::from(self.frame_rate);
        let samples = total / rate;
        self.remainder = (total % rate) as u32;
        self.frame_count += 1;
        self.samples_emitted += samples;
        samples as usize
    }

    /// Whole samples per frame before remainder carry
    pub fn base_samples_per_frame(&self) -> usize {
        (self.sample_rate / self.frame_rate) as usize
    }

    /// Largest chunk a single frame can yield
    pub fn max_frame_samples(&self) -> usize {
        self.sample_rate.div_ceil(self.frame_rate) as usize
    }

    /// Frames clocked so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Samples handed out so far
    pub fn samples_emitted(&self) -> u64 {
        self.samples_emitted
    }

    /// Elapsed output time in seconds
    pub fn elapsed_seconds(&self) -> f64 {
        self.samples_emitted as f64 / f64::from(self.sample_rate)
    }

    /// Rewind to frame zero
    pub fn reset(&mut self) {
        self.remainder = 0;
        self.frame_count = 0;
        self.samples_emitted = 0;
    }
}
