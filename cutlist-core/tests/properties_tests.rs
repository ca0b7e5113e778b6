// cutlist-core/tests/properties_tests.rs
//
// Behaviour the rest of the pipeline relies on: frame arithmetic, range
// parsing, proxy resolution, the validator's classification, placement and
// store fidelity.

use cutlist_core::external::mocks::{MockMediaInspector, video_report};
use cutlist_core::media::resolve;
use cutlist_core::store::{read_records, write_records};
use cutlist_core::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"media").expect("Failed to create dummy media");
    path
}

fn rate(num: u32) -> FrameRate {
    FrameRate::new(num, 1).unwrap()
}

fn ok_clip(
    name: &str,
    range: &str,
    fps: FrameRate,
    frame_count: u64,
    audio_tracks: usize,
) -> RowRecord {
    RowRecord {
        filename: name.to_string(),
        range: range.to_string(),
        row_type: Some(RowType::Clip),
        status: RowStatus::Ok,
        full_path: Some(PathBuf::from("/media").join(name)),
        codec: "prores".to_string(),
        color_profile: ColorProfile::Rec709,
        frame_rate: Some(fps),
        frame_count,
        audio_tracks,
        ..RowRecord::default()
    }
}

// --- Timecode ---

#[test]
fn test_timecode_projection_is_stable() {
    for (text, fps) in [
        ("00:01:00:12", 25.0),
        ("01:00:05:12", 25.0),
        ("00:00:59:23", 24.0),
        ("00:10:00:00", 30.0),
        ("00:00:10", 25.0),
        ("02:30", 50.0),
    ] {
        let count = frames(text, fps).unwrap();
        let back = frames(&to_timecode(count as u64, fps), fps).unwrap();
        assert_eq!(back, count, "round trip of {text} at {fps}");
    }
}

#[test]
fn test_minute_plus_frames() {
    assert_eq!(frames("00:01:00:12", 25.0).unwrap(), 1512);
}

#[test]
fn test_range_with_dash() {
    assert_eq!(parse_range("00:10-00:20", 25.0).unwrap(), (250, 500));
}

#[test]
fn test_range_without_dash_splits_at_last_colon() {
    // splits into "00:10:00" and "20"; a lone field is not a timecode
    assert_eq!(
        parse_range("00:10:00:20", 25.0),
        Err(TimecodeError::MalformedTimecode("20".to_string()))
    );
    assert_eq!(
        parse_range("00:10:20", 25.0),
        Err(TimecodeError::MalformedTimecode("20".to_string()))
    );
    assert_eq!(
        parse_range("no separator", 25.0),
        Err(TimecodeError::MalformedRange("no separator".to_string()))
    );
}

// --- Resolver ---

#[test]
fn test_resolver_prefers_proxy() {
    let dir = tempdir().unwrap();
    let proxy = touch(dir.path(), "clip_Proxy.mp4");
    assert_eq!(resolve(dir.path(), "clip.mp4"), Some(proxy));
}

#[test]
fn test_resolver_falls_back_to_name_then_not_found() {
    let dir = tempdir().unwrap();
    let original = touch(dir.path(), "clip.mov");
    assert_eq!(resolve(dir.path(), "clip.mov"), Some(original));
    assert_eq!(resolve(dir.path(), "other.mov"), None);
}

// --- Validator ---

#[test]
fn test_validator_classifications() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    touch(dir.path(), "zero.mov");
    touch(dir.path(), "good.mov");
    let mock = MockMediaInspector::new();
    mock.add_report("zero.mov", video_report("h264", 1920, 1080, "0/1", 100, 2));
    mock.add_report("good.mov", video_report("h264", 1920, 1080, "25/1", 500, 2));

    let validator = Validator::new(dir.path(), &mock);
    assert_eq!(validator.validate("zero.mov", "00:01 - 00:02").status, RowStatus::InvalidFps);
    assert_eq!(validator.validate("good.mov", "00:02 - 00:02").status, RowStatus::OutBeforeIn);

    let first = validator.validate("good.mov", "00:01 - 00:02");
    let again = validator.validate(&first.filename, &first.range);
    assert_eq!(first.status, RowStatus::Ok);
    assert_eq!(again, first);
    Ok(())
}

// --- Compiler ---

#[test]
fn test_consecutive_clips_and_gap() {
    let fps = rate(25);
    let a = ok_clip("a.mov", "00:00:00:00 - 00:00:04:00", fps, 1000, 1);
    let b = ok_clip("b.mov", "00:00:00:00 - 00:00:02:00", fps, 1000, 1);
    let gap = RowRecord::gap("", "00:00:00:00 - 00:00:01:05");

    let compiler = TimelineCompiler::new(fps, Resolution::HD_1080P, "Props");
    let plain = compiler.compile(&[a.clone(), b.clone()], &EventDispatcher::new());
    let spans: Vec<_> = plain.sequence.video_track.iter().map(|c| (c.start, c.end)).collect();
    assert_eq!(spans, vec![(0, 100), (100, 150)]);

    let gapped = compiler.compile(&[a, gap, b], &EventDispatcher::new());
    let spans: Vec<_> = gapped.sequence.video_track.iter().map(|c| (c.start, c.end)).collect();
    assert_eq!(spans, vec![(0, 100), (130, 180)]);
    assert_eq!(gapped.sequence.duration, 180);
    assert_eq!(gapped.gaps, 1);
}

#[test]
fn test_three_audio_tracks_are_cross_linked() {
    let row = ok_clip("a.mov", "00:00 - 00:02", rate(25), 1000, 3);
    let report = TimelineCompiler::new(rate(25), Resolution::HD_1080P, "Props")
        .compile(&[row], &EventDispatcher::new());

    let clips: Vec<_> = report.sequence.clips().collect();
    assert_eq!(clips.len(), 4);
    for clip in clips {
        assert_eq!(clip.links.len(), 4);
        assert_eq!(clip.links.iter().filter(|l| l.group_index.is_some()).count(), 3);
        let own = clip.links.iter().find(|l| l.clip_ref == clip.id).unwrap();
        assert_eq!(own.group_index, None);
    }
}

#[test]
fn test_frame_rate_conversion() {
    let row = ok_clip("a.mov", "00:00:00:00 - 00:00:02:00", rate(24), 1000, 0);
    let report = TimelineCompiler::new(rate(30), Resolution::HD_1080P, "Props")
        .compile(&[row], &EventDispatcher::new());
    let clip = &report.sequence.video_track[0];
    assert_eq!((clip.in_frame, clip.out_frame), (0, 48));
    assert_eq!(clip.end - clip.start, 60);
}

// --- Store ---

#[test]
fn test_store_round_trip_keeps_statuses() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("shots.csv");
    let rows = vec![
        ok_clip("a.mov", "00:01 - 00:02", rate(25), 500, 2),
        ok_clip("b.mov", "00:03 - 00:06", FrameRate::from_fps(29.97).unwrap(), 900, 1),
    ];

    write_records(&path, &rows)?;
    let reread = read_records(&path)?;
    let statuses: Vec<_> = reread.iter().map(|row| row.status.clone()).collect();
    assert_eq!(statuses, vec![RowStatus::Ok, RowStatus::Ok]);
    assert_eq!(reread[1].frame_rate, FrameRate::from_fps(29.97));
    assert_eq!(reread[0].frame_count, 500);
    Ok(())
}
