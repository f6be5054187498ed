/*!
 * Tests for caption cue parsing and timestamps
 */

use anyhow::Result;
use phrasereel::cue_processor::{cue_window, parse_timecode, seconds_to_timestamp, strip_markers, Cue, CueTrack};
use phrasereel::errors::CueError;
use crate::common;

/// Test timecode parsing and timestamp formatting together
#[test]
fn test_timecode_withHoursMinutesSeconds_shouldConvertBothWays() {
    let seconds = parse_timecode("1:23:45,600").unwrap();
    assert!((seconds - 5025.6).abs() < 1e-9);
    assert_eq!(seconds_to_timestamp(seconds), "1:23:45.60");
}

#[test]
fn test_seconds_to_timestamp_withLargeHours_shouldNotPadHours() {
    assert_eq!(seconds_to_timestamp(36_000.0), "10:00:00.00");
    assert_eq!(seconds_to_timestamp(61.0), "0:01:01.00");
    assert_eq!(seconds_to_timestamp(f64::NAN), "0:00:00.00");
}

#[test]
fn test_strip_markers_withMarkedText_shouldRemoveTagsOnly() {
    assert_eq!(strip_markers("see <u>you</u> later"), "see you later");
    assert_eq!(strip_markers("no markers"), "no markers");
}

#[test]
fn test_cue_new_withMarker_shouldDetectHighlight() {
    let cue = Cue::new(1.0, 2.5, "I <u>said</u> hi").unwrap();
    assert_eq!(cue.highlight(), Some("said"));
    assert_eq!(cue.plain_text(), "I said hi");
    assert_eq!((cue.start(), cue.end()), (1.0, 2.5));
    assert!((cue.duration() - 1.5).abs() < 1e-9);

    let plain = Cue::new(0.0, 1.0, "nothing marked").unwrap();
    assert!(plain.highlight().is_none());
    assert_eq!(plain.text(), "nothing marked");
}

#[test]
fn test_cue_new_withInvertedRange_shouldFail() {
    let result = Cue::new(3.0, 2.0, "<u>x</u>");
    assert_eq!(result, Err(CueError::InvertedRange { start: 3.0, end: 2.0 }));
    assert!(Cue::new(2.0, 2.0, "<u>x</u>").is_ok());
}

#[test]
fn test_cue_new_withNonFiniteTimes_shouldFail() {
    assert!(Cue::new(f64::NAN, 1.0, "<u>x</u>").is_err());
    assert!(Cue::new(0.0, f64::INFINITY, "<u>x</u>").is_err());
}

#[test]
fn test_parse_block_withTooFewLines_shouldReportMalformed() {
    let result = Cue::parse_block("1\n0:00:00,000 --> 0:00:01,000");
    assert!(matches!(result, Err(CueError::MalformedBlock(_))));
}

#[test]
fn test_cue_display_withMarkedText_shouldShowTimesAndText() {
    let cue = Cue::new(0.5, 1.0, "<u>Hi</u>").unwrap();
    assert_eq!(cue.to_string(), "0:00:00.50 --> 0:00:01.00 <u>Hi</u>");
}

#[test]
fn test_track_from_file_withGeneratedCaptions_shouldUseLastCueAsPhrase() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_caption_file(temp_dir.path(), "clip.srt", "See you later")?;

    let track = CueTrack::from_file(&path)?;

    assert_eq!(track.len(), 3);
    assert_eq!(track.phrase(), "See you later");
    assert_eq!(track.window(), (0.0, 1.5));
    assert_eq!(track.cues()[2].highlight(), Some("later"));
    Ok(())
}

#[test]
fn test_track_from_file_withMissingFile_shouldFail() {
    assert!(CueTrack::from_file("/definitely/not/here.srt").is_err());
}

#[test]
fn test_cue_window_shouldSpanFirstStartToLastEnd() {
    let cues = vec![
        Cue::new(1.5, 2.0, "<u>a</u>").unwrap(),
        Cue::new(2.0, 3.25, "<u>b</u>").unwrap(),
    ];
    assert_eq!(cue_window(&cues), (1.5, 3.25));
    assert_eq!(cue_window(&[]), (0.0, 5.0));
    assert_eq!(CueTrack::new(cues).window(), (1.5, 3.25));
}
