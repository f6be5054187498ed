use std::fmt;
use std::path::Path;
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Context, Result};
use log::{debug, info};

use crate::errors::CueError;

// @module: Caption cue parsing and timebase conversion

// @const: Block separator (a blank or whitespace-only line)
static BLOCK_SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n\s*\n").unwrap()
});

// @const: Timecode line, anchored at the start of the line
static TIMECODE_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+:\d+:\d+,\d+)\s*-->\s*(\d+:\d+:\d+,\d+)").unwrap()
});

// @const: Single timecode H:MM:SS,mmm
static TIMECODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d+):(\d+),(\d+)$").unwrap()
});

// @const: Emphasized span written by the upstream extractor
static HIGHLIGHT_MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<u>(.*?)</u>").unwrap()
});

// @const: Marker tags stripped when deriving a phrase
static MARKER_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"</?u>").unwrap()
});

/// Parse a `H:MM:SS,mmm` timecode into seconds.
///
/// The millisecond group is read as an integer and divided by 1000, so
/// `0:00:01,5` is 1.005 seconds.
pub fn parse_timecode(timecode: &str) -> Result<f64, CueError> {
    let caps = TIMECODE_REGEX
        .captures(timecode.trim())
        .ok_or_else(|| CueError::InvalidTimecode(timecode.to_string()))?;

    let field = |idx: usize| -> Result<f64, CueError> {
        caps[idx]
            .parse::<u64>()
            .map(|v| v as f64)
            .map_err(|_| CueError::InvalidTimecode(timecode.to_string()))
    };

    Ok(field(1)? * 3600.0 + field(2)? * 60.0 + field(3)? + field(4)? / 1000.0)
}

/// Format seconds as an ASS timestamp `H:MM:SS.cc`.
///
/// Hours are not padded; the seconds field is rendered with two decimals and
/// zero-padded to five characters. Negative input is clamped to zero.
pub fn seconds_to_timestamp(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let hours = (seconds / 3600.0).floor() as u64;
    let minutes = ((seconds % 3600.0) / 60.0).floor() as u64;
    let secs = seconds % 60.0;
    format!("{}:{:02}:{:05.2}", hours, minutes, secs)
}

/// Remove inline highlight markup from caption text
pub fn strip_markers(text: &str) -> String {
    MARKER_TAG_REGEX.replace_all(text, "").into_owned()
}

/// Timing window covering `cues`: first start to last end, `[0, 5]` when empty
pub fn cue_window(cues: &[Cue]) -> (f64, f64) {
    match (cues.first(), cues.last()) {
        (Some(first), Some(last)) => (first.start, last.end),
        _ => (0.0, 5.0),
    }
}

// @struct: Single timed caption unit, immutable once built
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    // @field: Start in seconds
    start: f64,

    // @field: End in seconds, never before start
    end: f64,

    // @field: Caption text including inline markup
    text: String,

    // @field: Content of the first emphasized span
    highlight: Option<String>,
}

impl Cue {
    // @creates: Validated cue
    // @validates: finite times, start <= end
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Result<Self, CueError> {
        if !start.is_finite() || !end.is_finite() || end < start {
            return Err(CueError::InvertedRange { start, end });
        }
        let text = text.into();
        let highlight = Self::find_highlight(&text);
        Ok(Cue { start, end, text, highlight })
    }

    /// Start in seconds
    pub fn start(&self) -> f64 {
        self.start
    }

    /// End in seconds
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Caption text including highlight markup
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Content of the first `<u>...</u>` span, if any
    pub fn highlight(&self) -> Option<&str> {
        self.highlight.as_deref()
    }

    /// Duration of the cue in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Caption text with highlight markup removed
    pub fn plain_text(&self) -> String {
        strip_markers(&self.text)
    }

    fn find_highlight(text: &str) -> Option<String> {
        HIGHLIGHT_MARKER_REGEX
            .captures(text)
            .map(|caps| caps[1].to_string())
    }

    /// Parse one caption block (index, timecode line, text lines)
    pub fn parse_block(block: &str) -> Result<Self, CueError> {
        let lines: Vec<&str> = block.trim().lines().collect();
        if lines.len() < 3 {
            return Err(CueError::MalformedBlock(format!(
                "expected at least 3 lines, found {}",
                lines.len()
            )));
        }

        let caps = TIMECODE_LINE_REGEX
            .captures(lines[1])
            .ok_or_else(|| CueError::InvalidTimecode(lines[1].to_string()))?;
        let start = parse_timecode(&caps[1])?;
        let end = parse_timecode(&caps[2])?;
        let text = lines[2..].join(" ");

        Self::new(start, end, text)
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} --> {} {}",
            seconds_to_timestamp(self.start),
            seconds_to_timestamp(self.end),
            self.text
        )
    }
}

/// Ordered cues of one video's caption track
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CueTrack {
    // @field: Cues carrying a highlight marker, in file order
    cues: Vec<Cue>,
}

impl CueTrack {
    /// Create a track from already-built cues
    pub fn new(cues: Vec<Cue>) -> Self {
        CueTrack { cues }
    }

    /// Parse a caption track blob.
    ///
    /// Blocks that are malformed, have unreadable timecodes or carry no
    /// highlight marker are dropped; the rest of the file is still read.
    pub fn parse(content: &str) -> Self {
        let content = content.replace("\r\n", "\n");
        let content = content.trim();
        if content.is_empty() {
            return Self::default();
        }

        let mut cues = Vec::new();
        for (block_idx, block) in BLOCK_SEPARATOR_REGEX.split(content).enumerate() {
            match Cue::parse_block(block) {
                Ok(cue) if cue.highlight.is_some() => cues.push(cue),
                Ok(_) => debug!("Skipping block {}: no highlight marker", block_idx + 1),
                Err(e) => debug!("Skipping block {}: {}", block_idx + 1, e),
            }
        }

        debug!("Found {} cues in caption track", cues.len());
        CueTrack { cues }
    }

    /// Read and parse a caption file from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read caption file: {:?}", path))?;
        let track = Self::parse(&content);
        info!("Parsed {} cues from {:?}", track.len(), path);
        Ok(track)
    }

    /// Full phrase of the video: the last cue's text without markup
    pub fn phrase(&self) -> String {
        self.cues
            .last()
            .map(|cue| cue.plain_text())
            .unwrap_or_default()
    }

    /// Cues in file order
    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    /// Timing window covering all cues, `[0, 5]` when there are none
    pub fn window(&self) -> (f64, f64) {
        cue_window(&self.cues)
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}
