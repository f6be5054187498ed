/*!
 * Styled subtitle document (ASS) assembly.
 *
 * A [`SubtitleDocument`] carries the script header, the four overlay styles
 * and the dialogue events of one video. Its `Display` output is the exact
 * text consumed by the hard-subtitle renderer, so column order and
 * separators must not change.
 */

use std::fmt;
use log::{debug, info};

use crate::app_config::{CanvasConfig, OverlayConfig, TextStyleConfig};
use crate::cue_processor::{cue_window, seconds_to_timestamp, Cue};
use super::autofit::{AutoFit, FitRequest, TextMeasure};
use super::words::{locate_in_phrase, HighlightSpan};

/// Style names, in the order they appear in the style table
pub const STYLE_BASE: &str = "Base";
pub const STYLE_HIGHLIGHT: &str = "Highlight";
pub const STYLE_TRANSLATION: &str = "Translation";
pub const STYLE_WATERMARK: &str = "Watermark";

const STYLE_FORMAT: &str = "Format: Name,Fontname,Fontsize,PrimaryColour,SecondaryColour,OutlineColour,BackColour,\
Bold,Italic,Underline,StrikeOut,ScaleX,ScaleY,Spacing,Angle,BorderStyle,Outline,Shadow,\
Alignment,MarginL,MarginR,MarginV,Encoding";

const EVENT_FORMAT: &str = "Format: Layer,Start,End,Style,Name,MarginL,MarginR,MarginV,Effect,Text";

const OUTLINE_COLOUR: &str = "&H00000000";
const BACK_COLOUR: &str = "&H64000000";

const ALPHA_OPAQUE: &str = "{\\alpha&H00&}";
const ALPHA_HIDDEN: &str = "{\\alpha&HFF&}";
const WRAP_OVERRIDE: &str = "{\\q3}";

/// `&HAABBGGRR` code for a colour name; unknown names are opaque white
pub fn color_code(name: &str) -> &'static str {
    match name.to_lowercase().as_str() {
        "white" => "&H00FFFFFF",
        "black" => "&H00000000",
        "yellow" => "&H0031D1FD",
        "red" => "&H000000FF",
        "green" => "&H0000FF00",
        "blue" => "&H00FF0000",
        "cyan" => "&H00FFFF00",
        "gray" => "&H00AAAAAA",
        "transparent" => "&HFF000000",
        _ => "&H00FFFFFF",
    }
}

/// One row of the style table
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub name: String,
    pub font: String,
    pub size: u32,
    pub primary_color: String,
    pub secondary_color: String,
    pub outline_color: String,
    pub back_color: String,
    pub alignment: u8,
    pub margin_l: u32,
    pub margin_r: u32,
    pub margin_v: u32,
    pub outline_width: u32,
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle and
        // BorderStyle are fixed; so are Shadow and Encoding.
        write!(
            f,
            "Style: {},{},{},{},{},{},{},0,0,0,0,100,100,0,0,1,{},0,{},{},{},{},1",
            self.name,
            self.font,
            self.size,
            self.primary_color,
            self.secondary_color,
            self.outline_color,
            self.back_color,
            self.outline_width,
            self.alignment,
            self.margin_l,
            self.margin_r,
            self.margin_v,
        )
    }
}

/// One timed line of the event list
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueEvent {
    pub layer: u32,
    pub start: f64,
    pub end: f64,
    pub style: String,
    pub text: String,
}

impl fmt::Display for DialogueEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Dialogue: {},{},{},{},,0,0,0,,{}",
            self.layer,
            seconds_to_timestamp(self.start),
            seconds_to_timestamp(self.end),
            self.style,
            self.text
        )
    }
}

/// Script header
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptInfo {
    pub play_res_x: u32,
    pub play_res_y: u32,
    pub wrap_style: u8,
    pub scaled_border_and_shadow: bool,
}

impl fmt::Display for ScriptInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "[Script Info]")?;
        writeln!(f, "ScriptType: v4.00+")?;
        writeln!(f, "PlayResX: {}", self.play_res_x)?;
        writeln!(f, "PlayResY: {}", self.play_res_y)?;
        writeln!(
            f,
            "ScaledBorderAndShadow: {}",
            if self.scaled_border_and_shadow { "yes" } else { "no" }
        )?;
        writeln!(f, "WrapStyle: {}", self.wrap_style)
    }
}

/// Complete styled caption document for one (video, language) pair
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleDocument {
    pub info: ScriptInfo,
    pub styles: Vec<Style>,
    pub events: Vec<DialogueEvent>,
    /// Span of the highlight target inside the phrase tokens
    pub highlight: HighlightSpan,
}

impl SubtitleDocument {
    /// Style by name
    pub fn style(&self, name: &str) -> Option<&Style> {
        self.styles.iter().find(|s| s.name == name)
    }

    /// Events using the given style, in document order
    pub fn events_for(&self, style: &str) -> Vec<&DialogueEvent> {
        self.events.iter().filter(|e| e.style == style).collect()
    }

    /// Serialized document text
    pub fn to_ass_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SubtitleDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.info)?;
        writeln!(f)?;
        writeln!(f, "[V4+ Styles]")?;
        writeln!(f, "{}", STYLE_FORMAT)?;
        for style in &self.styles {
            writeln!(f, "{}", style)?;
        }
        writeln!(f)?;
        writeln!(f, "[Events]")?;
        writeln!(f, "{}", EVENT_FORMAT)?;
        for event in &self.events {
            writeln!(f, "{}", event)?;
        }
        Ok(())
    }
}

/// Builds [`SubtitleDocument`]s from cues, phrase and styling
pub struct DocumentBuilder<'a> {
    config: &'a OverlayConfig,
    measure: Option<&'a dyn TextMeasure>,
}

impl<'a> DocumentBuilder<'a> {
    pub fn new(config: &'a OverlayConfig) -> Self {
        Self { config, measure: None }
    }

    /// Use a font-metrics backend for auto-fit
    pub fn with_measure(mut self, measure: &'a dyn TextMeasure) -> Self {
        self.measure = Some(measure);
        self
    }

    /// Build the document for one video.
    ///
    /// `highlight_target` is located inside `phrase` and drawn in the phrase
    /// highlight colour. Karaoke events pair cue `i` with word `i` of the
    /// phrase by position only.
    pub fn build(
        &self,
        cues: &[Cue],
        phrase: &str,
        highlight_target: &str,
        translation: Option<&str>,
        canvas: &CanvasConfig,
    ) -> SubtitleDocument {
        let (window_start, window_end) = cue_window(cues);
        debug!(
            "Subtitle time interval: {} - {}",
            seconds_to_timestamp(window_start),
            seconds_to_timestamp(window_end)
        );

        let translation = translation.filter(|t| !t.trim().is_empty());
        let styles = self.build_styles(phrase, translation, canvas);

        let words: Vec<&str> = phrase.split_whitespace().collect();
        let highlight = locate_in_phrase(phrase, highlight_target);
        debug!("Highlighted word span: {:?}", highlight);

        let mut events = Vec::with_capacity(words.len().min(cues.len()) + 3);
        events.push(DialogueEvent {
            layer: 0,
            start: window_start,
            end: window_end,
            style: STYLE_BASE.to_string(),
            text: self.base_line(&words, highlight),
        });

        for (i, cue) in cues.iter().take(words.len()).enumerate() {
            events.push(DialogueEvent {
                layer: 1,
                start: cue.start(),
                end: cue.end(),
                style: STYLE_HIGHLIGHT.to_string(),
                text: Self::reveal_line(&words, i),
            });
        }

        if let Some(text) = translation {
            events.push(DialogueEvent {
                layer: 0,
                start: window_start,
                end: window_end,
                style: STYLE_TRANSLATION.to_string(),
                text: format!("{}{}", WRAP_OVERRIDE, text),
            });
        }

        events.push(DialogueEvent {
            layer: 2,
            start: window_start,
            end: window_end,
            style: STYLE_WATERMARK.to_string(),
            text: self.config.watermark_text.clone(),
        });

        info!("Built subtitle document with {} events", events.len());

        SubtitleDocument {
            info: ScriptInfo {
                play_res_x: canvas.width,
                play_res_y: canvas.height,
                wrap_style: 3,
                scaled_border_and_shadow: true,
            },
            styles,
            events,
            highlight,
        }
    }

    fn build_styles(&self, phrase: &str, translation: Option<&str>, canvas: &CanvasConfig) -> Vec<Style> {
        let scale = canvas.scale();
        let scaled = |value: u32| (value as f64 * scale).round_ties_even() as u32;

        let margin_lr = scaled(self.config.margin_lr);
        let outline = scaled(self.config.outline);
        let mut phrase_size = scaled(self.config.phrase.size);
        let mut translation_size = scaled(self.config.translation.size);

        if self.config.auto_fit {
            let request = FitRequest {
                phrase,
                phrase_font: &self.config.phrase.font,
                phrase_size: phrase_size as f64,
                translation,
                translation_font: &self.config.translation.font,
                translation_size: translation_size as f64,
                max_width_px: canvas.width.saturating_sub(2 * margin_lr) as f64,
            };
            let fit = AutoFit::fit_scale(&request, self.measure);
            phrase_size = AutoFit::apply(phrase_size as f64, fit);
            translation_size = AutoFit::apply(translation_size as f64, fit);
            debug!("Auto-fit scale {:.2}: phrase {}pt, translation {}pt", fit, phrase_size, translation_size);
        }

        let make = |name: &str, style: &TextStyleConfig, size: u32, primary: &str, secondary: &str| Style {
            name: name.to_string(),
            font: style.font.clone(),
            size,
            primary_color: primary.to_string(),
            secondary_color: secondary.to_string(),
            outline_color: OUTLINE_COLOUR.to_string(),
            back_color: BACK_COLOUR.to_string(),
            alignment: style.alignment,
            margin_l: margin_lr,
            margin_r: margin_lr,
            margin_v: scaled(style.margin_v),
            outline_width: outline,
        };

        let cfg = self.config;
        vec![
            make(STYLE_BASE, &cfg.phrase, phrase_size, color_code(&cfg.phrase.color), color_code(&cfg.phrase.color)),
            make(
                STYLE_HIGHLIGHT,
                &cfg.phrase,
                phrase_size,
                color_code(&cfg.word_highlight_color),
                color_code("transparent"),
            ),
            make(
                STYLE_TRANSLATION,
                &cfg.translation,
                translation_size,
                color_code(&cfg.translation.color),
                color_code(&cfg.translation.color),
            ),
            make(
                STYLE_WATERMARK,
                &cfg.watermark,
                scaled(cfg.watermark.size),
                color_code(&cfg.watermark.color),
                color_code(&cfg.watermark.color),
            ),
        ]
    }

    /// Full phrase with the highlight span recoloured inline
    fn base_line(&self, words: &[&str], highlight: HighlightSpan) -> String {
        let base = color_code(&self.config.phrase.color);
        let accent = color_code(&self.config.phrase_highlight_color);
        words
            .iter()
            .enumerate()
            .map(|(i, word)| {
                if highlight.contains(i) {
                    format!("{{\\c{}}}{}{{\\c{}}}", accent, word, base)
                } else {
                    word.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Every word hidden except word `index`
    fn reveal_line(words: &[&str], index: usize) -> String {
        words
            .iter()
            .enumerate()
            .map(|(j, word)| {
                if j == index {
                    format!("{}{}{}", ALPHA_OPAQUE, word, ALPHA_HIDDEN)
                } else {
                    format!("{}{}", ALPHA_HIDDEN, word)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
