/*!
 * Tests for word normalization and subsequence location
 */

use phrasereel::overlay::words::{contains_run, locate, locate_in_phrase, normalize, HighlightSpan, WordSequence};

fn words(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|w| w.to_string()).collect()
}

#[test]
fn test_normalize_withPunctuationAndCase_shouldKeepWordCharacters() {
    assert_eq!(normalize("Don't!"), "dont");
    assert_eq!(normalize("ÉCOLE,"), "école");
    assert_eq!(normalize("snake_case"), "snake_case");
    assert_eq!(normalize("--"), "");
}

#[test]
fn test_normalize_isIdempotent() {
    for raw in ["Hello,", "WORLD?!", "it's", "42nd"] {
        let once = normalize(raw);
        assert_eq!(normalize(&once), once);
    }
}

#[test]
fn test_word_sequence_from_phrase_shouldDropEmptyTokens() {
    let seq = WordSequence::from_phrase("Wait - what?");
    assert_eq!(seq.words(), &["wait".to_string(), "what".to_string()]);
    assert_eq!(seq.to_string(), "wait what");
}

#[test]
fn test_locate_withRepeatedNeedle_shouldReturnLeftmost() {
    let haystack = words(&["a", "b", "a", "b"]);
    let span = locate(&haystack, &words(&["a", "b"]));
    assert_eq!(span, HighlightSpan { start_index: 0, length: 2 });
}

#[test]
fn test_locate_withEmptyInputs_shouldReturnEmptySpan() {
    let haystack = words(&["a"]);
    assert!(locate(&haystack, &[]).is_empty());
    assert!(locate(&[] as &[String], &haystack).is_empty());
    assert!(locate(&haystack, &words(&["a", "b"])).is_empty());
}

#[test]
fn test_locate_withMatch_shouldPointAtEqualSlice() {
    let haystack = words(&["well", "see", "you", "later", "then"]);
    let needle = words(&["you", "later"]);
    let span = locate(&haystack, &needle);
    assert_eq!(&haystack[span.start_index..span.start_index + span.length], needle.as_slice());
}

#[test]
fn test_contains_run_withEmptyNeedle_shouldBeTrue() {
    assert!(contains_run(&words(&["x"]), &[]));
    assert!(!contains_run(&words(&["x", "y"]), &words(&["y", "x"])));
}

#[test]
fn test_locate_in_phrase_withDashToken_shouldKeepRawPositions() {
    let span = locate_in_phrase("Well - see you later", "see you");
    assert_eq!(span, HighlightSpan { start_index: 2, length: 2 });
    assert!(span.contains(3));
    assert!(!span.contains(4));
}

#[test]
fn test_locate_in_phrase_withCaseAndPunctuation_shouldMatch() {
    let span = locate_in_phrase("Hello, World!", "hello world");
    assert_eq!(span, HighlightSpan { start_index: 0, length: 2 });
    assert!(locate_in_phrase("Hello world", "goodbye").is_empty());
}
