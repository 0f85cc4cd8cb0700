//! Integration tests for the capture-and-export pipeline
//!
//! Each test captures frames from an in-memory source and runs exactly one
//! export path into a scratch directory.

use std::fs;

use sidcap::export::AudioOptions;
use sidcap::{
    capture_frames, export, parse_table, ChannelLayout, DumpSource, ExportMode, ExportReport,
    FrameBuffer, NumericBase, RenderConfig, SidModel, TableSource, REGISTER_COUNT,
};

/// Capture `frames` all-zero register frames
fn zero_capture(frames: usize) -> FrameBuffer {
    let data = vec![0u8; frames * REGISTER_COUNT];
    let mut source = DumpSource::from_bytes(&data).unwrap();
    capture_frames(&mut source, frames).unwrap()
}

/// Frames playing a sawtooth on voice 1 at full volume
fn tone_capture(frames: usize) -> FrameBuffer {
    let mut regs = [0u8; REGISTER_COUNT];
    regs[0x00] = 0x1C;
    regs[0x01] = 0x1D;
    regs[0x06] = 0xF0;
    regs[0x04] = 0x21;
    regs[0x18] = 0x0F;
    let data: Vec<u8> = (0..frames).flat_map(|_| regs).collect();
    let mut source = DumpSource::from_bytes(&data).unwrap();
    capture_frames(&mut source, frames).unwrap()
}

fn audio(layout: ChannelLayout) -> ExportMode {
    ExportMode::Audio(AudioOptions {
        layout,
        render: RenderConfig::new(SidModel::Mos8580),
    })
}

fn read_wav(path: &std::path::Path) -> (hound::WavSpec, Vec<i16>) {
    let mut reader = hound::WavReader::open(path).unwrap();
    let spec = reader.spec();
    let samples = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    (spec, samples)
}

#[test]
fn test_binary_export_of_zero_frames() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("regs.bin");

    let report = export(&zero_capture(10), &ExportMode::Binary, &path).unwrap();

    assert_eq!(report, ExportReport::Binary { bytes: 250 });
    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 250);
    assert!(bytes.iter().all(|&b| b == 0));
}

#[test]
fn test_binary_length_is_frames_times_width() {
    let dir = tempfile::tempdir().unwrap();
    for frames in [0usize, 1, 7, 64] {
        let path = dir.path().join(format!("regs-{frames}.bin"));
        export(&zero_capture(frames), &ExportMode::Binary, &path).unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len() as usize, frames * 25);
    }
}

#[test]
fn test_decimal_table_of_zero_frames() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("regs.txt");

    export(&zero_capture(10), &ExportMode::Table(NumericBase::Decimal), &path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 11);
    assert!(lines[0].starts_with("Frame, R00, R01"));
    assert!(lines[0].ends_with("R23, R24"));

    let zeros = vec!["0"; 25].join(", ");
    for (i, line) in lines[1..].iter().enumerate() {
        assert_eq!(*line, format!("{i}, {zeros}"));
    }
}

#[test]
fn test_hex_table_reimports() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("regs.txt");
    let buffer = tone_capture(5);

    export(&buffer, &ExportMode::Table(NumericBase::Hex), &path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.lines().nth(1).unwrap().starts_with("0, 1C, 1D, 00"));

    let frames = parse_table(text.as_bytes(), NumericBase::Hex).unwrap();
    assert_eq!(frames.len(), 5);
    assert_eq!(&frames[..], buffer.frames().as_slice());

    let mut source = TableSource::from_reader(text.as_bytes(), NumericBase::Hex).unwrap();
    let recaptured = capture_frames(&mut source, 5).unwrap();
    assert_eq!(recaptured.as_bytes(), buffer.as_bytes());
}

#[test]
fn test_mono_audio_of_zero_frames_is_one_second_of_silence() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("silence.wav");

    let report = export(&zero_capture(50), &audio(ChannelLayout::Mono), &path).unwrap();

    assert_eq!(
        report,
        ExportReport::Audio {
            frames_rendered: 50,
            samples_per_channel: 44_100,
            layout: ChannelLayout::Mono,
            sample_rate: 44_100,
        }
    );
    let (spec, samples) = read_wav(&path);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 44_100);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(samples.len(), 44_100);
    assert!(samples.iter().all(|&s| s == 0));
}

#[test]
fn test_stereo_duplicates_mono() {
    let dir = tempfile::tempdir().unwrap();
    let mono_path = dir.path().join("mono.wav");
    let stereo_path = dir.path().join("stereo.wav");
    let buffer = tone_capture(50);

    export(&buffer, &audio(ChannelLayout::Mono), &mono_path).unwrap();
    export(&buffer, &audio(ChannelLayout::Stereo), &stereo_path).unwrap();

    let (_, mono) = read_wav(&mono_path);
    let (spec, stereo) = read_wav(&stereo_path);
    assert_eq!(spec.channels, 2);
    assert_eq!(stereo.len(), mono.len() * 2);
    assert!(mono.iter().any(|&s| s != 0));
    for (pair, &m) in stereo.chunks_exact(2).zip(mono.iter()) {
        assert_eq!(pair, [m, m]);
    }
}

#[test]
fn test_audio_duration_truncates_partial_second() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.wav");

    export(&zero_capture(149), &audio(ChannelLayout::Mono), &path).unwrap();

    let (_, samples) = read_wav(&path);
    assert_eq!(samples.len(), 2 * 44_100);
}

#[test]
fn test_audio_takes_precedence_over_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out");
    let options = AudioOptions {
        layout: ChannelLayout::Mono,
        render: RenderConfig::new(SidModel::Mos6581),
    };
    let mode = ExportMode::from_selectors(Some(options), Some(NumericBase::Hex));

    let report = export(&zero_capture(50), &mode, &path).unwrap();

    assert!(matches!(report, ExportReport::Audio { .. }));
    assert!(hound::WavReader::open(&path).is_ok());
}

#[test]
fn test_max_frames_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("capped.wav");
    let mode = ExportMode::Audio(AudioOptions {
        layout: ChannelLayout::Mono,
        render: RenderConfig::new(SidModel::Mos8580).max_frames(20),
    });

    let report = export(&tone_capture(100), &mode, &path).unwrap();

    match report {
        ExportReport::Audio {
            frames_rendered,
            samples_per_channel,
            ..
        } => {
            assert_eq!(frames_rendered, 20);
            assert_eq!(samples_per_channel, 2 * 44_100);
        }
        other => panic!("expected audio report, got {other:?}"),
    }
}

#[test]
fn test_unwritable_destination_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("regs.bin");

    let result = export(&zero_capture(2), &ExportMode::Binary, &path);

    assert!(matches!(result, Err(sidcap::SidCapError::Io(_))));
    assert!(!path.exists());
}
