//! Register log to PCM rendering
//!
//! Replays a captured [`FrameBuffer`] through a fresh SID backend, one
//! snapshot per frame, and synthesizes a continuous 16-bit PCM stream.
//!
//! The rendered duration is `floor(frame_count / frame_rate)` whole seconds.
//! Trailing frames that do not complete a second are dropped.

mod frame_clock;

pub use frame_clock::FrameClock;

use serde::{Deserialize, Serialize};

use crate::capture::FrameBuffer;
use crate::constants::{DEFAULT_FRAME_RATE, DEFAULT_SAMPLE_RATE, PAL_CLOCK_HZ};
use crate::sid::{SidBackend, SidModel};
use crate::{Result, SidCapError};

/// Audio render settings
///
/// The chip model has no default; callers always choose it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Chip revision used for playback
    pub model: SidModel,
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Register frames per second in the capture
    pub frame_rate: u32,
    /// System clock driving the chip in Hz
    pub clock_hz: u32,
    /// First frame of the buffer to replay
    pub start_frame: usize,
    /// Upper bound on frames to replay
    pub max_frames: Option<usize>,
}

impl RenderConfig {
    /// 44.1 kHz, 50 Hz frames, PAL clock, whole buffer
    pub fn new(model: SidModel) -> Self {
        RenderConfig {
            model,
            sample_rate: DEFAULT_SAMPLE_RATE,
            frame_rate: DEFAULT_FRAME_RATE,
            clock_hz: PAL_CLOCK_HZ,
            start_frame: 0,
            max_frames: None,
        }
    }

    /// Override the output sample rate
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Override the capture frame rate
    pub fn with_frame_rate(mut self, frame_rate: u32) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    /// Override the chip clock
    pub fn with_clock(mut self, clock_hz: u32) -> Self {
        self.clock_hz = clock_hz;
        self
    }

    /// Start replay at `frame`
    pub fn starting_at(mut self, frame: usize) -> Self {
        self.start_frame = frame;
        self
    }

    /// Stop after `frames` frames
    pub fn max_frames(mut self, frames: usize) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Reject settings the renderer cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(SidCapError::Config("sample rate must be non-zero".into()));
        }
        if self.frame_rate == 0 {
            return Err(SidCapError::Config("frame rate must be non-zero".into()));
        }
        if self.clock_hz < self.sample_rate {
            return Err(SidCapError::Config(format!(
                "chip clock {} Hz is below the sample rate {} Hz",
                self.clock_hz, self.sample_rate
            )));
        }
        Ok(())
    }
}

/// Whole seconds of audio produced by `frame_count` frames (truncating)
pub fn audio_duration_seconds(frame_count: usize, frame_rate: u32) -> usize {
    if frame_rate == 0 {
        return 0;
    }
    frame_count / frame_rate as usize
}

/// Output of a render pass
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedAudio {
    /// Mono PCM samples; unrendered tail samples are silent
    pub samples: Vec<i16>,
    /// Source frames replayed, including one cut short by a full buffer
    pub frames_rendered: usize,
    /// Sample rate of `samples`
    pub sample_rate: u32,
    /// Nominal duration in whole seconds
    pub duration_seconds: usize,
}

/// Replays frame buffers through a SID backend
pub struct AudioRenderer<B: SidBackend> {
    chip: B,
    config: RenderConfig,
}

impl<B: SidBackend> AudioRenderer<B> {
    /// Build a renderer with a freshly created chip
    pub fn new(config: RenderConfig) -> Result<Self> {
        config.validate()?;
        let chip = B::with_clocks(config.model, config.clock_hz, config.sample_rate);
        Ok(AudioRenderer { chip, config })
    }

    /// Render settings
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Backend used for playback
    pub fn chip(&self) -> &B {
        &self.chip
    }

    /// Render `buffer` to mono PCM
    ///
    /// Stops at whichever comes first: the sample buffer is full, `max_frames`
    /// frames have been replayed, or the buffer has no captured frames left.
    /// Uncaptured frames of a partial buffer are never replayed.
    pub fn render(&mut self, buffer: &FrameBuffer) -> Result<RenderedAudio> {
        let config = self.config;
        self.chip.reset();

        let duration_seconds = audio_duration_seconds(buffer.frame_count(), config.frame_rate);
        let total = (config.sample_rate as usize)
            .checked_mul(duration_seconds)
            .ok_or_else(|| {
                SidCapError::InvalidInput(format!(
                    "{duration_seconds}s at {} Hz overflows the sample count",
                    config.sample_rate
                ))
            })?;

        let mut samples: Vec<i16> = Vec::new();
        samples
            .try_reserve_exact(total)
            .map_err(|e| SidCapError::allocation("PCM sample buffer", total, e))?;
        samples.resize(total, 0);

        let mut clock = FrameClock::new(config.sample_rate, config.frame_rate);
        let chunk_len = clock.max_frame_samples();
        let mut scratch: Vec<f32> = Vec::new();
        scratch
            .try_reserve_exact(chunk_len)
            .map_err(|e| SidCapError::allocation("frame sample scratch", chunk_len, e))?;
        scratch.resize(chunk_len, 0.0);

        tracing::debug!(
            model = %config.model,
            duration_seconds,
            total_samples = total,
            start_frame = config.start_frame,
            "render started"
        );

        let limit = config.max_frames.unwrap_or(usize::MAX);
        let mut cursor = 0usize;
        let mut frames_rendered = 0usize;

        let captured = buffer.frames().take(buffer.captured_frames());
        for regs in captured.skip(config.start_frame) {
            if cursor >= total || frames_rendered >= limit {
                break;
            }

            self.chip.load_registers(regs);
            let wanted = clock.next_frame_samples().min(total - cursor);
            let chunk = &mut scratch[..wanted];
            self.chip.generate_samples_into(chunk);

            for (out, &sample) in samples[cursor..cursor + wanted].iter_mut().zip(chunk.iter()) {
                *out = to_pcm16(sample);
            }
            cursor += wanted;
            frames_rendered += 1;
        }

        tracing::debug!(frames_rendered, samples_written = cursor, "render finished");

        Ok(RenderedAudio {
            samples,
            frames_rendered,
            sample_rate: config.sample_rate,
            duration_seconds,
        })
    }
}

fn to_pcm16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}
