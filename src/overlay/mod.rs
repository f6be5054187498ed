/*!
 * Caption-to-overlay synthesis.
 *
 * - `words`: word normalization and contiguous-run location
 * - `matcher`: common phrase across several videos
 * - `autofit`: font size fitting against a line budget
 * - `document`: styled subtitle document assembly
 */

pub mod autofit;
pub mod document;
pub mod matcher;
pub mod words;

pub use autofit::{AutoFit, CharWidthMeasure, FitRequest, TextMeasure};
pub use document::{color_code, DialogueEvent, DocumentBuilder, Style, SubtitleDocument};
pub use matcher::{calculate_highlight_phrase, common_phrase};
pub use words::{locate, locate_in_phrase, normalize, HighlightSpan, WordSequence};
