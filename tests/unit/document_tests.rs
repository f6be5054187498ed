/*!
 * Tests for ASS document assembly
 */

use phrasereel::app_config::{CanvasConfig, OverlayConfig};
use phrasereel::cue_processor::Cue;
use phrasereel::errors::MeasureError;
use phrasereel::overlay::autofit::TextMeasure;
use phrasereel::overlay::document::{
    color_code, DocumentBuilder, STYLE_BASE, STYLE_HIGHLIGHT, STYLE_TRANSLATION, STYLE_WATERMARK,
};

/// Three lines above 20pt, one line otherwise
struct ThresholdMeasure;

impl TextMeasure for ThresholdMeasure {
    fn line_count(&self, _: &str, _: &str, size: f64, _: f64) -> Result<usize, MeasureError> {
        Ok(if size > 20.0 { 3 } else { 1 })
    }
}

fn fixed_config() -> OverlayConfig {
    OverlayConfig { auto_fit: false, ..OverlayConfig::default() }
}

#[test]
fn test_color_code_withKnownNames_shouldBeCaseInsensitive() {
    assert_eq!(color_code("WHITE"), "&H00FFFFFF");
    assert_eq!(color_code("Green"), "&H0000FF00");
    assert_eq!(color_code("gray"), "&H00AAAAAA");
    assert_eq!(color_code(""), "&H00FFFFFF");
}

#[test]
fn test_build_withoutCues_shouldUseDefaultWindow() {
    let config = fixed_config();
    let doc = DocumentBuilder::new(&config).build(&[], "Hi there", "", Some("Salut"), &CanvasConfig::default());

    let styles: Vec<&str> = doc.events.iter().map(|e| e.style.as_str()).collect();
    assert_eq!(styles, vec![STYLE_BASE, STYLE_TRANSLATION, STYLE_WATERMARK]);
    for event in &doc.events {
        assert_eq!(event.start, 0.0);
        assert_eq!(event.end, 5.0);
    }
    assert_eq!(doc.events[1].text, "{\\q3}Salut");
    assert_eq!(doc.events[2].layer, 2);
    assert_eq!(doc.events[2].text, "playphrase.me");
}

#[test]
fn test_build_withBlankTranslation_shouldOmitTranslationEvent() {
    let config = fixed_config();
    let builder = DocumentBuilder::new(&config);
    let canvas = CanvasConfig::default();
    assert!(builder.build(&[], "Hi", "", Some("  "), &canvas).events_for(STYLE_TRANSLATION).is_empty());
    assert!(builder.build(&[], "Hi", "", None, &canvas).events_for(STYLE_TRANSLATION).is_empty());
}

#[test]
fn test_build_withMoreCuesThanWords_shouldStopAtWordCount() {
    let config = fixed_config();
    let cues: Vec<Cue> = (0..4)
        .map(|i| Cue::new(i as f64, i as f64 + 1.0, "<u>x</u>").unwrap())
        .collect();
    let doc = DocumentBuilder::new(&config).build(&cues, "two words", "", None, &CanvasConfig::default());

    let karaoke = doc.events_for(STYLE_HIGHLIGHT);
    assert_eq!(karaoke.len(), 2);
    assert!(karaoke.iter().all(|e| e.layer == 1));
    assert_eq!(karaoke[1].start, 1.0);
    assert_eq!(doc.events[0].end, 4.0);
}

#[test]
fn test_style_rows_withDefaultCanvas_shouldMatchExpectedColumns() {
    let config = fixed_config();
    let doc = DocumentBuilder::new(&config).build(&[], "Hi", "", None, &CanvasConfig::default());
    assert_eq!(
        doc.style(STYLE_TRANSLATION).unwrap().to_string(),
        "Style: Translation,Roboto-Regular,24,&H00FFFFFF,&H00FFFFFF,&H00000000,&H64000000,0,0,0,0,100,100,0,0,1,2,0,2,10,10,20,1"
    );
    assert_eq!(
        doc.style(STYLE_WATERMARK).unwrap().to_string(),
        "Style: Watermark,Roboto-Regular,20,&H00FFFFFF,&H00FFFFFF,&H00000000,&H64000000,0,0,0,0,100,100,0,0,1,2,0,8,10,10,10,1"
    );
}

#[test]
fn test_build_withWideCanvas_shouldDoubleGeometryEvenWithAutoFit() {
    let config = OverlayConfig::default();
    let doc = DocumentBuilder::new(&config).build(&[], "Hello world", "", Some("Salut"), &CanvasConfig::new(1280, 720));

    let base = doc.style(STYLE_BASE).unwrap();
    assert_eq!(base.size, 76);
    assert_eq!(base.margin_l, 20);
    assert_eq!(base.margin_v, 160);
    assert_eq!(base.outline_width, 4);
    assert_eq!(doc.style(STYLE_TRANSLATION).unwrap().size, 48);
    assert_eq!(doc.style(STYLE_WATERMARK).unwrap().size, 40);
    assert_eq!(doc.info.play_res_x, 1280);
    assert_eq!(doc.info.play_res_y, 720);
}

#[test]
fn test_build_withMeasure_shouldShrinkPhraseAndTranslationTogether() {
    let config = OverlayConfig::default();
    let measure = ThresholdMeasure;
    let doc = DocumentBuilder::new(&config)
        .with_measure(&measure)
        .build(&[], "Hello world", "", Some("Salut"), &CanvasConfig::default());

    assert_eq!(doc.style(STYLE_BASE).unwrap().size, 19);
    assert_eq!(doc.style(STYLE_HIGHLIGHT).unwrap().size, 19);
    assert_eq!(doc.style(STYLE_TRANSLATION).unwrap().size, 12);
    assert_eq!(doc.style(STYLE_WATERMARK).unwrap().size, 20);
}

#[test]
fn test_to_ass_string_shouldLayOutSectionsInOrder() {
    let config = fixed_config();
    let doc = DocumentBuilder::new(&config).build(&[], "Hi", "", None, &CanvasConfig::default());
    let text = doc.to_ass_string();

    assert!(text.starts_with(
        "[Script Info]\nScriptType: v4.00+\nPlayResX: 640\nPlayResY: 480\nScaledBorderAndShadow: yes\nWrapStyle: 3\n\n[V4+ Styles]\n"
    ));
    assert!(text.contains(
        "\n\n[Events]\nFormat: Layer,Start,End,Style,Name,MarginL,MarginR,MarginV,Effect,Text\n"
    ));
    assert!(text.contains("Format: Name,Fontname,Fontsize,PrimaryColour,SecondaryColour,OutlineColour,BackColour,Bold,"));
    assert!(text.contains("Dialogue: 0,0:00:00.00,0:00:05.00,Base,,0,0,0,,Hi\n"));
    assert!(text.ends_with("Dialogue: 2,0:00:00.00,0:00:05.00,Watermark,,0,0,0,,playphrase.me\n"));

    let style_rows = text.lines().filter(|l| l.starts_with("Style: ")).count();
    assert_eq!(style_rows, 4);
}

#[test]
fn test_build_withCustomColours_shouldUseThemInBaseLine() {
    let config = OverlayConfig {
        auto_fit: false,
        phrase_highlight_color: "red".to_string(),
        ..OverlayConfig::default()
    };
    let doc = DocumentBuilder::new(&config).build(&[], "stop right there", "right", None, &CanvasConfig::default());
    assert_eq!(doc.events[0].text, "stop {\\c&H000000FF}right{\\c&H00FFFFFF} there");
}

#[test]
fn test_build_withSmallCanvas_shouldKeepFittedSizesAtFloor() {
    let config = OverlayConfig::default();
    let builder = DocumentBuilder::new(&config);
    let canvas = CanvasConfig::new(200, 150);

    // 24pt scaled by 200/640 is 7.5pt, under the floor even for short text
    let short = builder.build(&[], "Hi", "", Some("Salut"), &canvas);
    assert_eq!(short.style(STYLE_BASE).unwrap().size, 12);
    assert_eq!(short.style(STYLE_TRANSLATION).unwrap().size, 10);

    let long_phrase = "a phrase long enough to need shrinking on a very small canvas like this one";
    let long = builder.build(&[], long_phrase, "", Some("Salut"), &canvas);
    assert!(long.style(STYLE_BASE).unwrap().size >= 10);
    assert_eq!(long.style(STYLE_TRANSLATION).unwrap().size, 10);
}

#[test]
fn test_build_withoutAutoFit_shouldKeepScaledSizes() {
    let config = fixed_config();
    let doc = DocumentBuilder::new(&config).build(&[], "Hi", "", Some("Salut"), &CanvasConfig::new(200, 150));
    assert_eq!(doc.style(STYLE_TRANSLATION).unwrap().size, 8);
}
