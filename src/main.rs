//! sidcap
//!
//! Replays a captured SID register log and exports it as a raw dump, a
//! register table, or a rendered WAV file.
//!
//! # Usage
//!
//! ```bash
//! sidcap tune.sidregs -o tune.txt --table decimal
//! sidcap tune.sidregs -o tune.wav --audio stereo --model 8580
//! sidcap --config run.json --verbose
//! sidcap tune.sidregs -o tune.wav --audio mono --model 6581 --ntsc
//! ```
//!
//! Audio export takes precedence over `--table`; with neither, the frames
//! are written back as a raw 25-byte-per-frame dump.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sidcap::config::InputFormat;
use sidcap::constants::NTSC_CLOCK_HZ;
use sidcap::{
    capture_frames, export, ChannelLayout, DumpSource, FrameSource, NumericBase, RunConfig,
    SidModel, TableSource,
};

#[doc(hidden)]
#[derive(Parser, Debug)]
#[command(version, about = "Capture SID register frames and export them", long_about = None)]
struct Args {
    #[arg(help = "Register log to replay")]
    input: Option<PathBuf>,

    #[arg(short, long, help = "Output file")]
    output: Option<PathBuf>,

    #[arg(short, long, help = "JSON run configuration; flags override its values")]
    config: Option<PathBuf>,

    #[arg(long, help = "Input encoding: dump or table")]
    input_format: Option<InputFormat>,

    #[arg(long, help = "Numeric base of a table input: hex or decimal")]
    input_base: Option<NumericBase>,

    #[arg(short, long, help = "Frames to capture (default: all available)")]
    frames: Option<usize>,

    #[arg(short, long, help = "Render audio: mono or stereo")]
    audio: Option<ChannelLayout>,

    #[arg(short, long, help = "Write a register table: hex or decimal")]
    table: Option<NumericBase>,

    #[arg(short, long, help = "SID model for audio: 6581 or 8580")]
    model: Option<SidModel>,

    #[arg(long, help = "Output sample rate in Hz")]
    sample_rate: Option<u32>,

    #[arg(long, help = "Capture frame rate in Hz")]
    frame_rate: Option<u32>,

    #[arg(long, help = "Chip clock in Hz")]
    clock: Option<u32>,

    #[arg(long, conflicts_with = "clock", help = "Use the NTSC C64 clock (1022727 Hz)")]
    ntsc: bool,

    #[arg(long, help = "First frame to render")]
    start_frame: Option<usize>,

    #[arg(long, help = "Maximum number of frames to render")]
    max_frames: Option<usize>,

    #[arg(short, long, help = "Debug-level diagnostics")]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> anyhow::Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => RunConfig::default(),
        };

        if self.input.is_some() {
            config.input = self.input;
        }
        if self.output.is_some() {
            config.output = self.output;
        }
        if let Some(format) = self.input_format {
            config.input_format = format;
        }
        if let Some(base) = self.input_base {
            config.input_base = base;
        }
        if self.frames.is_some() {
            config.frames = self.frames;
        }
        if self.audio.is_some() {
            config.audio = self.audio;
        }
        if self.table.is_some() {
            config.table = self.table;
        }
        if self.model.is_some() {
            config.model = self.model;
        }
        if let Some(rate) = self.sample_rate {
            config.sample_rate = rate;
        }
        if let Some(rate) = self.frame_rate {
            config.frame_rate = rate;
        }
        if let Some(clock) = self.clock {
            config.clock_hz = clock;
        } else if self.ntsc {
            config.clock_hz = NTSC_CLOCK_HZ;
        }
        if let Some(frame) = self.start_frame {
            config.start_frame = frame;
        }
        if self.max_frames.is_some() {
            config.max_frames = self.max_frames;
        }
        config.verbose |= self.verbose;

        config.validate()?;
        Ok(config)
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn open_source(config: &RunConfig) -> anyhow::Result<(Box<dyn FrameSource>, usize)> {
    let Some(path) = config.input.as_ref() else {
        bail!("no input file given");
    };

    match config.input_format {
        InputFormat::Dump => {
            let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            let source = DumpSource::from_bytes(&data)
                .with_context(|| format!("parsing register dump {}", path.display()))?;
            let available = source.frames_available();
            Ok((Box::new(source), available))
        }
        InputFormat::Table => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            let source = TableSource::from_reader(BufReader::new(file), config.input_base)
                .with_context(|| format!("parsing register table {}", path.display()))?;
            let available = source.frames_available();
            Ok((Box::new(source), available))
        }
    }
}

fn main() -> anyhow::Result<()> {
    let config = Args::parse().into_config()?;
    init_logging(config.verbose);

    let (mut source, available) = open_source(&config)?;
    let frame_count = config.frames.unwrap_or(available);
    tracing::info!(frames = frame_count, format = %config.input_format, "capturing");

    let buffer = capture_frames(source.as_mut(), frame_count).context("capturing frames")?;

    let mode = config.export_mode()?;
    let Some(output) = config.output.as_ref() else {
        bail!("no output file given");
    };
    let report = export(&buffer, &mode, output)
        .with_context(|| format!("exporting to {}", output.display()))?;

    tracing::info!("{report}");
    Ok(())
}
