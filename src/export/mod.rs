//! Export Dispatch
//!
//! Turns a captured [`FrameBuffer`] into exactly one output artifact: a raw
//! binary dump, a text table, or a rendered WAV file. The mode is selected
//! once as an [`ExportMode`] and only that path runs.

pub mod binary;
pub mod table;
pub mod wav;

pub use binary::{export_binary, write_binary};
pub use table::{export_table, write_table, NumericBase};
pub use wav::{mono_to_stereo, write_mono, write_stereo, write_wav};

use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::capture::FrameBuffer;
use crate::render::{AudioRenderer, RenderConfig};
use crate::sid::Sid;
use crate::{Result, SidCapError};

/// Output channel layout for audio export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelLayout {
    /// Single channel
    Mono,
    /// Mono render duplicated into left and right
    Stereo,
}

impl ChannelLayout {
    /// Number of interleaved channels written to the container
    pub fn channels(self) -> u16 {
        match self {
            ChannelLayout::Mono => 1,
            ChannelLayout::Stereo => 2,
        }
    }
}

impl fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChannelLayout::Mono => "mono",
            ChannelLayout::Stereo => "stereo",
        })
    }
}

impl FromStr for ChannelLayout {
    type Err = SidCapError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "mono" => Ok(ChannelLayout::Mono),
            "stereo" => Ok(ChannelLayout::Stereo),
            _ => Err(SidCapError::Config(format!(
                "unknown channel layout '{value}' (expected mono or stereo)"
            ))),
        }
    }
}

/// Settings for the audio export path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioOptions {
    /// Mono or duplicated stereo
    pub layout: ChannelLayout,
    /// Chip model, rates and frame window for the render
    pub render: RenderConfig,
}

/// The single export path taken by a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExportMode {
    /// Frame buffer written verbatim
    Binary,
    /// Text table in the given base
    Table(NumericBase),
    /// Rendered PCM audio
    Audio(AudioOptions),
}

impl ExportMode {
    /// Resolve the mode from independent selectors
    ///
    /// Audio takes precedence over a table, and binary is the default when
    /// neither is requested.
    pub fn from_selectors(audio: Option<AudioOptions>, table: Option<NumericBase>) -> Self {
        match (audio, table) {
            (Some(options), _) => ExportMode::Audio(options),
            (None, Some(base)) => ExportMode::Table(base),
            (None, None) => ExportMode::Binary,
        }
    }
}

/// What an export wrote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportReport {
    /// Raw dump size
    Binary {
        /// Bytes written
        bytes: usize,
    },
    /// Table rows (excluding the header)
    Table {
        /// Data rows written
        rows: usize,
        /// Base used for register values
        base: NumericBase,
    },
    /// Rendered audio
    Audio {
        /// Source frames replayed through the chip
        frames_rendered: usize,
        /// Samples written per channel
        samples_per_channel: usize,
        /// Channel layout of the container
        layout: ChannelLayout,
        /// Container sample rate
        sample_rate: u32,
    },
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportReport::Binary { bytes } => write!(f, "binary dump, {bytes} bytes"),
            ExportReport::Table { rows, base } => write!(f, "{base} table, {rows} frames"),
            ExportReport::Audio {
                frames_rendered,
                samples_per_channel,
                layout,
                sample_rate,
            } => write!(
                f,
                "{layout} WAV, {frames_rendered} frames rendered, {samples_per_channel} samples at {sample_rate} Hz ({:.2}s)",
                *samples_per_channel as f64 / f64::from(*sample_rate)
            ),
        }
    }
}

/// Run the export path selected by `mode`, writing to `output_path`
pub fn export<P: AsRef<Path>>(
    buffer: &FrameBuffer,
    mode: &ExportMode,
    output_path: P,
) -> Result<ExportReport> {
    let path = output_path.as_ref();
    if !buffer.is_complete() {
        tracing::warn!(
            captured = buffer.captured_frames(),
            frame_count = buffer.frame_count(),
            "exporting a partially captured buffer"
        );
    }
    match *mode {
        ExportMode::Binary => {
            tracing::info!(path = %path.display(), "exporting binary dump");
            export_binary(buffer, path)?;
            Ok(ExportReport::Binary {
                bytes: buffer.byte_len(),
            })
        }
        ExportMode::Table(base) => {
            tracing::info!(path = %path.display(), %base, "exporting register table");
            export_table(buffer, base, path)?;
            Ok(ExportReport::Table {
                rows: buffer.frame_count(),
                base,
            })
        }
        ExportMode::Audio(options) => {
            tracing::info!(
                path = %path.display(),
                model = %options.render.model,
                layout = %options.layout,
                "rendering audio"
            );
            let mut renderer = AudioRenderer::<Sid>::new(options.render)?;
            let audio = renderer.render(buffer)?;
            let sample_rate = options.render.sample_rate;
            match options.layout {
                ChannelLayout::Mono => write_mono(&audio.samples, sample_rate, path)?,
                ChannelLayout::Stereo => write_stereo(&audio.samples, sample_rate, path)?,
            }
            Ok(ExportReport::Audio {
                frames_rendered: audio.frames_rendered,
                samples_per_channel: audio.samples.len(),
                layout: options.layout,
                sample_rate,
            })
        }
    }
}

/// Write a file so that it either appears complete or not at all
///
/// Content goes to a temporary file next to `path`, which is renamed into
/// place only after `write` succeeds and the data is flushed.
pub(crate) fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    write(tmp.as_file_mut())?;
    tmp.as_file_mut().flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sid::SidModel;

    fn audio(layout: ChannelLayout) -> AudioOptions {
        AudioOptions {
            layout,
            render: RenderConfig::new(SidModel::Mos8580),
        }
    }

    #[test]
    fn test_selector_parsing() {
        assert_eq!("Stereo".parse::<ChannelLayout>().unwrap(), ChannelLayout::Stereo);
        assert_eq!("hex".parse::<NumericBase>().unwrap(), NumericBase::Hex);
        assert_eq!("decimal".parse::<NumericBase>().unwrap(), NumericBase::Decimal);
        assert!("quad".parse::<ChannelLayout>().is_err());
    }

    #[test]
    fn test_binary_is_default() {
        assert_eq!(ExportMode::from_selectors(None, None), ExportMode::Binary);
    }

    #[test]
    fn test_table_selected_without_audio() {
        assert_eq!(
            ExportMode::from_selectors(None, Some(NumericBase::Hex)),
            ExportMode::Table(NumericBase::Hex)
        );
    }

    #[test]
    fn test_audio_takes_precedence_over_table() {
        let mode = ExportMode::from_selectors(
            Some(audio(ChannelLayout::Stereo)),
            Some(NumericBase::Decimal),
        );
        assert_eq!(mode, ExportMode::Audio(audio(ChannelLayout::Stereo)));
    }

    #[test]
    fn test_channel_counts() {
        assert_eq!(ChannelLayout::Mono.channels(), 1);
        assert_eq!(ChannelLayout::Stereo.channels(), 2);
    }

    #[test]
    fn test_failed_atomic_write_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");

        let result = write_atomically(&path, |file| {
            file.write_all(b"partial")?;
            Err("aborted".into())
        });

        assert!(result.is_err());
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_atomic_write_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        std::fs::write(&path, b"old contents").unwrap();

        write_atomically(&path, |file| Ok(file.write_all(b"new")?)).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn test_report_display() {
        let report = ExportReport::Audio {
            frames_rendered: 50,
            samples_per_channel: 44_100,
            layout: ChannelLayout::Mono,
            sample_rate: 44_100,
        };
        assert_eq!(
            report.to_string(),
            "mono WAV, 50 frames rendered, 44100 samples at 44100 Hz (1.00s)"
        );
    }
}
