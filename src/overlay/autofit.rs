/*!
 * Font auto-fit.
 *
 * Shrinks the phrase (and translation) font size until the wrapped text fits
 * in two lines. Line counts come from an injected [`TextMeasure`]; without
 * one, or when it fails, an analytic width estimate is used instead.
 */

use log::{debug, warn};

use crate::errors::MeasureError;

/// Maximum number of wrapped lines a caption may occupy
pub const MAX_LINES: usize = 2;

/// Smallest scale factor tried by the measured search
pub const MIN_SCALE: f64 = 0.1;

/// Decrement applied to the scale factor on each measured step
pub const SCALE_STEP: f64 = 0.05;

/// Absolute floor for any fitted font size, in points
pub const MIN_FONT_SIZE: u32 = 10;

/// Average glyph width as a fraction of the font size
pub const AVG_CHAR_WIDTH_EM: f64 = 0.6;

/// Width budget of the analytic fallback, in multiples of the line width
pub const ANALYTIC_WIDTH_LINES: f64 = 2.5;

/// Text measurement capability backed by real font metrics
pub trait TextMeasure: Send + Sync {
    /// Number of lines `text` wraps to at `size` points within `max_width_px`
    fn line_count(&self, text: &str, font: &str, size: f64, max_width_px: f64) -> Result<usize, MeasureError>;
}

/// Greedy word-wrap measurement with a fixed average glyph width.
///
/// Useful when no font backend is available but a line-count estimate that
/// respects word boundaries is still wanted.
#[derive(Debug, Clone)]
pub struct CharWidthMeasure {
    /// Glyph width as a fraction of the font size
    pub em_ratio: f64,
}

impl Default for CharWidthMeasure {
    fn default() -> Self {
        Self { em_ratio: AVG_CHAR_WIDTH_EM }
    }
}

impl TextMeasure for CharWidthMeasure {
    fn line_count(&self, text: &str, _font: &str, size: f64, max_width_px: f64) -> Result<usize, MeasureError> {
        if size <= 0.0 || max_width_px <= 0.0 {
            return Err(MeasureError::Failed(format!(
                "invalid geometry: size {} width {}",
                size, max_width_px
            )));
        }

        let char_width = size * self.em_ratio;
        let space_width = char_width;
        let mut lines = 0;
        let mut current = 0.0;

        for word in text.split_whitespace() {
            let word_width = word.chars().count() as f64 * char_width;
            if lines == 0 {
                lines = 1;
                current = word_width;
            } else if current + space_width + word_width <= max_width_px {
                current += space_width + word_width;
            } else {
                lines += 1;
                current = word_width;
            }
            // A single word wider than the line wraps mid-word
            if current > max_width_px {
                let extra = (current / max_width_px).ceil() as usize - 1;
                lines += extra;
                current -= extra as f64 * max_width_px;
            }
        }

        Ok(lines)
    }
}

/// Text to be fitted together: the phrase and an optional translation
#[derive(Debug, Clone)]
pub struct FitRequest<'a> {
    pub phrase: &'a str,
    pub phrase_font: &'a str,
    pub phrase_size: f64,
    pub translation: Option<&'a str>,
    pub translation_font: &'a str,
    pub translation_size: f64,
    /// Usable line width in pixels
    pub max_width_px: f64,
}

/// Font size auto-fit
pub struct AutoFit;

impl AutoFit {
    /// Scale factor to apply to the phrase and translation sizes.
    ///
    /// Uses `measure` when given; a measurement error switches to the analytic
    /// estimate for the whole request.
    pub fn fit_scale(request: &FitRequest<'_>, measure: Option<&dyn TextMeasure>) -> f64 {
        if let Some(measure) = measure {
            match Self::measured_scale(request, measure) {
                Ok(scale) => return scale,
                Err(e) => warn!("Text measurement failed, using width estimate: {}", e),
            }
        }
        Self::analytic_scale(request)
    }

    /// Fitted phrase size in points, never below [`MIN_FONT_SIZE`]
    pub fn fit_size(request: &FitRequest<'_>, measure: Option<&dyn TextMeasure>) -> u32 {
        let scale = Self::fit_scale(request, measure);
        Self::apply(request.phrase_size, scale)
    }

    /// `round(base * scale)` floored at [`MIN_FONT_SIZE`]; halves round to even
    pub fn apply(base: f64, scale: f64) -> u32 {
        let size = (base * scale).round_ties_even();
        if size.is_finite() && size > MIN_FONT_SIZE as f64 {
            size as u32
        } else {
            MIN_FONT_SIZE
        }
    }

    fn measured_scale(request: &FitRequest<'_>, measure: &dyn TextMeasure) -> Result<f64, MeasureError> {
        let translation = request.translation.filter(|t| !t.trim().is_empty());
        // Step i tries 1.0 - i * SCALE_STEP; the last step is MIN_SCALE
        let last_step = ((1.0 - MIN_SCALE) / SCALE_STEP).round() as u32;

        for step in 0..=last_step {
            let scale = 1.0 - step as f64 * SCALE_STEP;
            let phrase_lines = measure.line_count(
                request.phrase,
                request.phrase_font,
                request.phrase_size * scale,
                request.max_width_px,
            )?;
            let translation_lines = match translation {
                Some(text) => measure.line_count(
                    text,
                    request.translation_font,
                    request.translation_size * scale,
                    request.max_width_px,
                )?,
                None => 0,
            };

            if phrase_lines <= MAX_LINES && translation_lines <= MAX_LINES {
                debug!("Measured auto-fit scale: {:.2}", scale);
                return Ok(scale);
            }
        }

        debug!("Auto-fit reached minimum scale without fitting");
        Ok(1.0 - last_step as f64 * SCALE_STEP)
    }

    /// Largest factor (at most 1.0) letting the text fit `2.5` line widths
    fn analytic_factor(text: &str, base_size: f64, max_width_px: f64) -> f64 {
        let chars = text.chars().count();
        if chars == 0 || base_size <= 0.0 {
            return 1.0;
        }
        let budget = ANALYTIC_WIDTH_LINES * max_width_px.max(0.0);
        let max_size = budget / (chars as f64 * AVG_CHAR_WIDTH_EM);
        (max_size / base_size).min(1.0)
    }

    fn analytic_scale(request: &FitRequest<'_>) -> f64 {
        let phrase_factor = Self::analytic_factor(request.phrase, request.phrase_size, request.max_width_px);
        let translation_factor = request
            .translation
            .filter(|t| !t.trim().is_empty())
            .map(|t| Self::analytic_factor(t, request.translation_size, request.max_width_px))
            .unwrap_or(1.0);
        let scale = phrase_factor.min(translation_factor);
        debug!("Analytic auto-fit scale: {:.2}", scale);
        scale
    }
}
