//! Run configuration
//!
//! Everything one capture-and-export run needs, loadable from JSON. Missing
//! keys fall back to [`RunConfig::default`].
//!
//! ```json
//! {
//!     "input": "tune.sidregs",
//!     "output": "tune.wav",
//!     "audio": "stereo",
//!     "model": "8580"
//! }
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_FRAME_RATE, DEFAULT_SAMPLE_RATE, PAL_CLOCK_HZ};
use crate::export::{AudioOptions, ChannelLayout, ExportMode, NumericBase};
use crate::render::RenderConfig;
use crate::sid::SidModel;
use crate::{Result, SidCapError};

/// Encoding of the capture input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// Raw 25-byte-per-frame register dump
    #[default]
    Dump,
    /// Text register table
    Table,
}

impl FromStr for InputFormat {
    type Err = SidCapError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "dump" | "bin" | "binary" => Ok(InputFormat::Dump),
            "table" | "txt" | "text" => Ok(InputFormat::Table),
            _ => Err(SidCapError::Config(format!(
                "unknown input format '{value}' (expected dump or table)"
            ))),
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InputFormat::Dump => "dump",
            InputFormat::Table => "table",
        })
    }
}

/// Settings for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Capture input file
    pub input: Option<PathBuf>,
    /// Input encoding
    pub input_format: InputFormat,
    /// Numeric base of a table input
    pub input_base: NumericBase,
    /// Frames to capture; all available when unset
    pub frames: Option<usize>,
    /// Output file
    pub output: Option<PathBuf>,
    /// Audio export with this channel layout (takes precedence over `table`)
    pub audio: Option<ChannelLayout>,
    /// Table export in this base
    pub table: Option<NumericBase>,
    /// Chip revision for audio export
    pub model: Option<SidModel>,
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Capture frame rate in Hz
    pub frame_rate: u32,
    /// Chip clock in Hz
    pub clock_hz: u32,
    /// First frame replayed by the audio renderer
    pub start_frame: usize,
    /// Cap on frames replayed by the audio renderer
    pub max_frames: Option<usize>,
    /// Debug-level diagnostics
    pub verbose: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            input: None,
            input_format: InputFormat::Dump,
            input_base: NumericBase::Hex,
            frames: None,
            output: None,
            audio: None,
            table: None,
            model: None,
            sample_rate: DEFAULT_SAMPLE_RATE,
            frame_rate: DEFAULT_FRAME_RATE,
            clock_hz: PAL_CLOCK_HZ,
            start_frame: 0,
            max_frames: None,
            verbose: false,
        }
    }
}

impl RunConfig {
    /// Load a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
            .map_err(|e| SidCapError::Config(format!("{}: {e}", path.display())))
    }

    /// Parse a configuration from JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| SidCapError::Config(e.to_string()))
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| SidCapError::Config(e.to_string()))
    }

    /// Check that the run is fully specified
    pub fn validate(&self) -> Result<()> {
        if self.input.is_none() {
            return Err(SidCapError::Config("no input file given".into()));
        }
        if self.output.is_none() {
            return Err(SidCapError::Config("no output file given".into()));
        }
        if self.audio.is_some() {
            self.render_config()?.validate()?;
        }
        Ok(())
    }

    /// Render settings for the audio path
    ///
    /// Fails when no chip model was chosen.
    pub fn render_config(&self) -> Result<RenderConfig> {
        let model = self.model.ok_or_else(|| {
            SidCapError::Config("audio export needs an explicit SID model (6581 or 8580)".into())
        })?;
        let mut render = RenderConfig::new(model)
            .with_sample_rate(self.sample_rate)
            .with_frame_rate(self.frame_rate)
            .with_clock(self.clock_hz)
            .starting_at(self.start_frame);
        render.max_frames = self.max_frames;
        Ok(render)
    }

    /// Select the single export path: audio, else table, else binary
    pub fn export_mode(&self) -> Result<ExportMode> {
        let audio = match self.audio {
            Some(layout) => Some(AudioOptions {
                layout,
                render: self.render_config()?,
            }),
            None => None,
        };
        Ok(ExportMode::from_selectors(audio, self.table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.sample_rate, 44_100);
        assert_eq!(config.frame_rate, 50);
        assert_eq!(config.export_mode().unwrap(), ExportMode::Binary);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = RunConfig::from_json_str(
            r#"{ "input": "in.bin", "output": "out.txt", "table": "decimal" }"#,
        )
        .unwrap();
        assert_eq!(config.input, Some(PathBuf::from("in.bin")));
        assert_eq!(config.sample_rate, 44_100);
        assert_eq!(
            config.export_mode().unwrap(),
            ExportMode::Table(NumericBase::Decimal)
        );
        config.validate().unwrap();
    }

    #[test]
    fn test_audio_takes_precedence() {
        let config = RunConfig {
            audio: Some(ChannelLayout::Mono),
            table: Some(NumericBase::Hex),
            model: Some(SidModel::Mos6581),
            ..RunConfig::default()
        };
        match config.export_mode().unwrap() {
            ExportMode::Audio(options) => {
                assert_eq!(options.layout, ChannelLayout::Mono);
                assert_eq!(options.render.model, SidModel::Mos6581);
            }
            other => panic!("expected audio mode, got {other:?}"),
        }
    }

    #[test]
    fn test_audio_requires_model() {
        let config = RunConfig {
            input: Some("in.bin".into()),
            output: Some("out.wav".into()),
            audio: Some(ChannelLayout::Stereo),
            ..RunConfig::default()
        };
        assert!(matches!(config.validate(), Err(SidCapError::Config(_))));
        assert!(config.export_mode().is_err());
    }

    #[test]
    fn test_missing_paths_rejected() {
        assert!(RunConfig::default().validate().is_err());
    }

    #[test]
    fn test_render_window_carried() {
        let config = RunConfig {
            model: Some(SidModel::Mos8580),
            start_frame: 10,
            max_frames: Some(20),
            ..RunConfig::default()
        };
        let render = config.render_config().unwrap();
        assert_eq!(render.start_frame, 10);
        assert_eq!(render.max_frames, Some(20));
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        let config = RunConfig {
            input: Some("tune.sidregs".into()),
            output: Some("tune.wav".into()),
            audio: Some(ChannelLayout::Stereo),
            model: Some(SidModel::Mos8580),
            ..RunConfig::default()
        };
        fs::write(&path, config.to_json_string().unwrap()).unwrap();
        assert_eq!(RunConfig::from_json_file(&path).unwrap(), config);
    }

    #[test]
    fn test_bad_json_is_config_error() {
        assert!(matches!(
            RunConfig::from_json_str("{ \"sample_rate\": \"fast\" }"),
            Err(SidCapError::Config(_))
        ));
    }

    #[test]
    fn test_input_format_parsing() {
        assert_eq!("TABLE".parse::<InputFormat>().unwrap(), InputFormat::Table);
        assert_eq!("dump".parse::<InputFormat>().unwrap(), InputFormat::Dump);
        assert!("wav".parse::<InputFormat>().is_err());
    }
}
