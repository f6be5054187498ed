use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Output canvas size
    #[serde(default)]
    pub canvas: CanvasConfig,

    /// Overlay styling
    #[serde(default)]
    pub overlay: OverlayConfig,

    /// Explicit highlight phrase; computed from the captions when absent
    #[serde(default)]
    pub highlight_phrase: Option<String>,

    /// Target language codes (ISO 639-1 or 639-2); empty means no translation
    #[serde(default)]
    pub target_languages: Vec<String>,

    /// Maximum number of documents built concurrently
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Size of the video canvas the overlay is rendered on
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct CanvasConfig {
    /// Width in pixels
    #[serde(default = "default_canvas_width")]
    pub width: u32,

    /// Height in pixels
    #[serde(default = "default_canvas_height")]
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_canvas_width(),
            height: default_canvas_height(),
        }
    }
}

impl CanvasConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Geometry scale relative to the 640 pixel reference width
    pub fn scale(&self) -> f64 {
        self.width as f64 / REFERENCE_WIDTH
    }

    /// Parse `WIDTHxHEIGHT`, falling back to the default canvas on bad input
    pub fn parse_or_default(value: &str) -> Self {
        match value.parse() {
            Ok(canvas) => canvas,
            Err(e) => {
                warn!("Error parsing video size '{}': {}. Defaulting to 640x480.", value, e);
                Self::default()
            }
        }
    }
}

// Implement Display trait for CanvasConfig
impl std::fmt::Display for CanvasConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// Implement FromStr trait for CanvasConfig
impl std::str::FromStr for CanvasConfig {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| anyhow!("Invalid video size: {}", s))?;
        let width: u32 = w.trim().parse().context("Failed to parse width")?;
        let height: u32 = h.trim().parse().context("Failed to parse height")?;
        if width == 0 || height == 0 {
            return Err(anyhow!("Video size must be non-zero: {}", s));
        }
        Ok(Self { width, height })
    }
}

/// Font, colour and placement of one overlay line
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TextStyleConfig {
    /// Font name as known to the renderer
    #[serde(default = "default_font")]
    pub font: String,

    /// Font size in points at the reference width
    pub size: u32,

    /// Colour name (see `overlay::document::color_code`)
    #[serde(default = "default_text_color")]
    pub color: String,

    /// Numpad-style alignment (2 = bottom centre, 8 = top centre)
    pub alignment: u8,

    /// Vertical margin in pixels at the reference width
    pub margin_v: u32,
}

/// Styling shared by every generated document
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OverlayConfig {
    /// Main phrase line
    #[serde(default = "default_phrase_style")]
    pub phrase: TextStyleConfig,

    /// Translation line
    #[serde(default = "default_translation_style")]
    pub translation: TextStyleConfig,

    /// Watermark line
    #[serde(default = "default_watermark_style")]
    pub watermark: TextStyleConfig,

    /// Colour of the highlighted span inside the phrase
    #[serde(default = "default_phrase_highlight_color")]
    pub phrase_highlight_color: String,

    /// Colour of the word revealed by each karaoke event
    #[serde(default = "default_word_highlight_color")]
    pub word_highlight_color: String,

    /// Fixed watermark text
    #[serde(default = "default_watermark_text")]
    pub watermark_text: String,

    /// Left/right margin in pixels at the reference width
    #[serde(default = "default_margin_lr")]
    pub margin_lr: u32,

    /// Outline width in pixels at the reference width
    #[serde(default = "default_outline")]
    pub outline: u32,

    /// Shrink phrase and translation to fit two lines
    #[serde(default = "default_true")]
    pub auto_fit: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            phrase: default_phrase_style(),
            translation: default_translation_style(),
            watermark: default_watermark_style(),
            phrase_highlight_color: default_phrase_highlight_color(),
            word_highlight_color: default_word_highlight_color(),
            watermark_text: default_watermark_text(),
            margin_lr: default_margin_lr(),
            outline: default_outline(),
            auto_fit: true,
        }
    }
}

impl OverlayConfig {
    /// Use `size` for the phrase and scale translation and watermark with it
    pub fn with_font_size(mut self, size: u32) -> Self {
        let scaled = |ratio: f64| (size as f64 * ratio).round_ties_even() as u32;
        self.phrase.size = size;
        self.translation.size = scaled(24.0 / 34.0);
        self.watermark.size = scaled(20.0 / 34.0);
        self
    }

    /// Use `font` for every overlay line
    pub fn with_font(mut self, font: &str) -> Self {
        self.phrase.font = font.to_string();
        self.translation.font = font.to_string();
        self.watermark.font = font.to_string();
        self
    }

    fn validate(&self) -> Result<()> {
        for (name, style) in [
            ("phrase", &self.phrase),
            ("translation", &self.translation),
            ("watermark", &self.watermark),
        ] {
            if style.size == 0 {
                return Err(anyhow!("Font size for {} must be positive", name));
            }
            if !(1..=9).contains(&style.alignment) {
                return Err(anyhow!("Alignment for {} must be between 1 and 9, got {}", name, style.alignment));
            }
            if style.font.trim().is_empty() {
                return Err(anyhow!("Font for {} must not be empty", name));
            }
        }
        Ok(())
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

const REFERENCE_WIDTH: f64 = 640.0;

fn default_canvas_width() -> u32 {
    640
}

fn default_canvas_height() -> u32 {
    480
}

fn default_concurrency() -> usize {
    4
}

fn default_font() -> String {
    "Roboto-Regular".to_string()
}

fn default_text_color() -> String {
    "white".to_string()
}

fn default_phrase_style() -> TextStyleConfig {
    TextStyleConfig {
        font: default_font(),
        size: 38,
        color: default_text_color(),
        alignment: 2, // bottom center
        margin_v: 80,
    }
}

fn default_translation_style() -> TextStyleConfig {
    TextStyleConfig {
        font: default_font(),
        size: 24,
        color: default_text_color(),
        alignment: 2,
        margin_v: 20,
    }
}

fn default_watermark_style() -> TextStyleConfig {
    TextStyleConfig {
        font: default_font(),
        size: 20,
        color: default_text_color(),
        alignment: 8, // top center
        margin_v: 10,
    }
}

fn default_phrase_highlight_color() -> String {
    "yellow".to_string()
}

fn default_word_highlight_color() -> String {
    "green".to_string()
}

fn default_watermark_text() -> String {
    "playphrase.me".to_string()
}

fn default_margin_lr() -> u32 {
    10
}

fn default_outline() -> u32 {
    2
}

fn default_true() -> bool {
    true
}

impl Config {

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(anyhow!("Canvas size must be non-zero, got {}", self.canvas));
        }

        self.overlay.validate()?;

        for lang in &self.target_languages {
            crate::language_utils::validate_language_code(lang)?;
        }

        if self.concurrency == 0 {
            return Err(anyhow!("Concurrency must be at least 1"));
        }

        Ok(())
    }

    /// Load the configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {:?}", path))?;
        Ok(())
    }

    /// Load the configuration, writing a default one when the file is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Target languages with duplicates (same language, different code) removed
    pub fn unique_target_languages(&self) -> Vec<String> {
        let mut unique: Vec<String> = Vec::new();
        for lang in &self.target_languages {
            let lang = lang.trim();
            if lang.is_empty() {
                continue;
            }
            if !unique.iter().any(|seen| crate::language_utils::language_codes_match(seen, lang)) {
                unique.push(lang.to_string());
            }
        }
        unique
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            canvas: CanvasConfig::default(),
            overlay: OverlayConfig::default(),
            highlight_phrase: None,
            target_languages: Vec::new(),
            concurrency: default_concurrency(),
            log_level: LogLevel::default(),
        }
    }
}
