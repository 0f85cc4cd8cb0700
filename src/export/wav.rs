//! WAV file export functionality
//!
//! Serializes a rendered 16-bit sample stream into a PCM WAV container.
//! Stereo output is the mono stream duplicated into both channels.

use std::io::{BufWriter, Write};
use std::path::Path;

use super::write_atomically;
use crate::{Result, SidCapError};

/// Write `samples` as a single-channel WAV file
pub fn write_mono<P: AsRef<Path>>(samples: &[i16], sample_rate: u32, output_path: P) -> Result<()> {
    write_wav(output_path.as_ref(), samples, sample_rate, 1)
}

/// Write `samples` duplicated into both channels of a stereo WAV file
pub fn write_stereo<P: AsRef<Path>>(
    samples: &[i16],
    sample_rate: u32,
    output_path: P,
) -> Result<()> {
    let stereo = mono_to_stereo(samples)?;
    write_wav(output_path.as_ref(), &stereo, sample_rate, 2)
}

/// Convert mono samples to stereo (duplicate each sample, interleaved L/R)
pub fn mono_to_stereo(mono: &[i16]) -> Result<Vec<i16>> {
    let len = mono.len() * 2;
    let mut stereo = Vec::new();
    stereo
        .try_reserve_exact(len)
        .map_err(|e| SidCapError::allocation("stereo samples", len, e))?;
    for &sample in mono {
        stereo.push(sample);
        stereo.push(sample);
    }
    Ok(stereo)
}

/// Write interleaved 16-bit samples to a WAV file
///
/// The file only appears at `path` once the header and the whole payload
/// have been written.
pub fn write_wav(path: &Path, samples: &[i16], sample_rate: u32, channels: u16) -> Result<()> {
    if channels == 0 {
        return Err(SidCapError::Config("WAV output needs at least one channel".into()));
    }
    if sample_rate == 0 {
        return Err(SidCapError::Config("WAV sample rate cannot be zero".into()));
    }

    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    write_atomically(path, |file| {
        let mut out = BufWriter::new(file);
        let mut writer = hound::WavWriter::new(&mut out, spec)?;
        for &sample in samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        out.flush()?;
        Ok(())
    })?;

    tracing::debug!(
        path = %path.display(),
        channels,
        sample_rate,
        frames = samples.len() / channels as usize,
        "WAV file written"
    );
    Ok(())
}
