/*!
 * Tests for error types and conversions
 */

use phrasereel::cue_processor::Cue;
use phrasereel::errors::{AppError, CueError, MeasureError, TranslationError};

#[test]
fn test_cueError_invalidTimecode_shouldDisplayCorrectly() {
    let error = CueError::InvalidTimecode("1:2".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Invalid timecode"));
    assert!(display.contains("1:2"));
}

#[test]
fn test_cueError_invertedRange_shouldDisplayBothEnds() {
    let error = CueError::InvertedRange { start: 3.5, end: 1.25 };
    let display = format!("{}", error);
    assert!(display.contains("3.5"));
    assert!(display.contains("1.25"));
}

#[test]
fn test_measureError_fontUnavailable_shouldDisplayFont() {
    let error = MeasureError::FontUnavailable("Roboto-Regular".to_string());
    assert!(error.to_string().contains("Roboto-Regular"));
}

#[test]
fn test_translationError_unsupportedLanguage_shouldDisplayCode() {
    let error = TranslationError::UnsupportedLanguage("zz".to_string());
    assert_eq!(error.to_string(), "Unsupported target language: zz");
}

#[test]
fn test_appError_fromCueError_shouldWrapWithQuestionMark() {
    fn parse() -> Result<Cue, AppError> {
        Ok(Cue::parse_block("only one line")?)
    }
    let error = parse().unwrap_err();
    assert!(matches!(error, AppError::Cue(CueError::MalformedBlock(_))));
    assert!(error.to_string().starts_with("Cue error:"));
}

#[test]
fn test_appError_fromIoError_shouldBecomeFileError() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.srt");
    let error: AppError = io.into();
    assert!(matches!(error, AppError::File(_)));
    assert!(error.to_string().contains("missing.srt"));
}

#[test]
fn test_appError_fromAnyhow_shouldBecomeUnknown() {
    let error: AppError = anyhow::anyhow!("boom").into();
    assert!(matches!(error, AppError::Unknown(ref msg) if msg == "boom"));
}

#[test]
fn test_appError_fromTranslationError_shouldWrap() {
    let error: AppError = TranslationError::LoadFailed("tr.json".to_string()).into();
    assert!(matches!(error, AppError::Translation(TranslationError::LoadFailed(_))));
}
