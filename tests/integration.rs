//! Integration tests for the furigana layout pipeline.
//!
//! These tests exercise the full path from markup text to positioned lines.
//! They verify:
//! - Markup parses into the expected spans
//! - Lines respect the available width, with the overflow exception
//! - Ruby labels never overlap each other or leave their line
//! - The JSON document surface works end to end

use furigana::font::FixedPitchMetrics;
use furigana::layout::{compute_layout, FuriganaText, LayoutResult};
use furigana::markup;
use furigana::model::Document;
use furigana::style::FuriganaStyle;

// ─── Helpers ────────────────────────────────────────────────────

const EPS: f64 = 1e-9;

const SENTENCE: &str =
    "{彼女;かのじょ}は{寒気;さむけ}を{防;ふせ}ぐために{厚;あつ}いコートを{着;き}ていた。";

fn style() -> FuriganaStyle {
    FuriganaStyle::with_size(20.0)
}

fn lay_out(text: &str, max_width: Option<f64>) -> LayoutResult {
    furigana::layout_text(text, &style(), max_width, &FixedPitchMetrics)
}

fn all_text(result: &LayoutResult) -> String {
    result
        .lines
        .iter()
        .flat_map(|l| l.runs.iter())
        .map(|r| r.run.text.as_str())
        .collect()
}

fn assert_labels_placed(result: &LayoutResult) {
    for line in &result.lines {
        let labels = &line.labels;
        if labels.is_empty() {
            continue;
        }
        let n = labels.len();
        assert!(labels[0].x_center - 0.5 * labels[0].label.width >= -EPS);
        assert!(labels[n - 1].x_center + 0.5 * labels[n - 1].label.width <= line.width + EPS);
        for pair in labels.windows(2) {
            let gap = pair[1].x_center - pair[0].x_center;
            let need = 0.5 * (pair[0].label.width + pair[1].label.width);
            assert!(gap >= need - EPS, "labels overlap: gap {gap} < {need}");
        }
    }
}

// ─── Parsing ────────────────────────────────────────────────────

#[test]
fn test_single_ruby_span_unconstrained() {
    let result = lay_out("{寒気;さむけ}", None);
    assert_eq!(result.line_count(), 1);
    let line = &result.lines[0];
    assert_eq!(line.runs.len(), 1);
    assert_eq!(line.runs[0].run.text, "寒気");
    assert_eq!(line.labels.len(), 1);
    assert_eq!(line.labels[0].label.text, "さむけ");
    // centred over the 40px base text
    assert!((line.labels[0].x_center - 20.0).abs() < EPS);
}

#[test]
fn test_empty_bracket_emits_nothing() {
    assert!(markup::parse("{}", 0..0).is_empty());
}

#[test]
fn test_plain_text_around_ruby() {
    let spans = markup::parse("abc{定;さだ}def", 0..0);
    assert_eq!(spans.len(), 3);
    assert!(spans[0].ruby.is_none());
    assert_eq!(spans[1].ruby.as_deref(), Some("さだ"));
    assert!(spans[2].ruby.is_none());
    assert_eq!(markup::plain_text(&spans), "abc定def");
}

#[test]
fn test_unmatched_brace_drops_remainder() {
    let result = lay_out("{寒気;さむけ}を{防;ふせ", None);
    assert_eq!(all_text(&result), "寒気を");
    assert_eq!(result.lines[0].labels.len(), 1);
}

#[test]
fn test_highlighted_prefix() {
    let mut text = FuriganaText::new(style());
    text.set_text_highlighted(SENTENCE, 0..2);
    let result = text.layout(None, &FixedPitchMetrics);
    let first = &result.lines[0].runs[0].run;
    assert_eq!(first.text, "彼女");
    assert!(first.highlighted);
    assert_eq!(first.width(), 40.0);
    assert!(result.lines[0].runs[1..].iter().all(|r| !r.run.highlighted));
}

// ─── Line breaking ──────────────────────────────────────────────

#[test]
fn test_overwide_span_is_force_placed() {
    let result = compute_layout(
        &markup::parse("寒", 0..0),
        &FuriganaStyle::with_size(500.0),
        Some(100.0),
        &FixedPitchMetrics,
    );
    assert_eq!(result.line_count(), 1);
    assert_eq!(result.lines[0].width, 500.0);
    assert_eq!(result.max_line_width, 500.0);
}

#[test]
fn test_overwide_multi_char_span_stays_on_one_line() {
    let result = compute_layout(
        &markup::parse("ab", 0..0),
        &FuriganaStyle::with_size(500.0),
        Some(100.0),
        &FixedPitchMetrics,
    );
    assert_eq!(result.line_count(), 1);
    assert_eq!(all_text(&result), "ab");
    assert_eq!(result.lines[0].width, 500.0);
    assert_eq!(result.measurement().width, 500.0);
}

#[test]
fn test_packing_bound_and_text_preserved() {
    for max_width in [40.0, 55.0, 80.0, 120.0, 200.0] {
        let result = lay_out(SENTENCE, Some(max_width));
        assert_eq!(all_text(&result), "彼女は寒気を防ぐために厚いコートを着ていた。");
        for line in &result.lines {
            assert!(line.width <= max_width, "{} > {max_width}", line.width);
            let runs: f64 = line.runs.iter().map(|r| r.run.width()).sum();
            assert!((runs - line.width).abs() < EPS);
        }
    }
}

#[test]
fn test_narrower_width_means_more_lines() {
    let wide = lay_out(SENTENCE, Some(400.0)).line_count();
    let narrow = lay_out(SENTENCE, Some(100.0)).line_count();
    assert!(narrow > wide);
}

#[test]
fn test_every_label_survives_packing() {
    let result = lay_out(SENTENCE, Some(60.0));
    let labels: Vec<&str> = result
        .lines
        .iter()
        .flat_map(|l| l.labels.iter())
        .map(|l| l.label.text.as_str())
        .collect();
    assert_eq!(labels, vec!["かのじょ", "さむけ", "ふせ", "あつ", "き"]);
}

// ─── Placement ──────────────────────────────────────────────────

#[test]
fn test_labels_feasible_at_many_widths() {
    for max_width in [60.0, 90.0, 150.0, 300.0] {
        assert_labels_placed(&lay_out(SENTENCE, Some(max_width)));
    }
    assert_labels_placed(&lay_out(SENTENCE, None));
}

#[test]
fn test_crowded_labels_pushed_apart() {
    // Each base char is 20 wide, each label 30 wide: centred, they would overlap.
    let result = lay_out("あ{寒;さむい}{気;さむい}{防;さむい}あ", None);
    let labels = &result.lines[0].labels;
    assert_eq!(labels.len(), 3);
    assert_labels_placed(&result);
    // The middle label stays centred, the outer ones move out symmetrically.
    assert!((labels[1].x_center - 50.0).abs() < EPS);
    assert!(((50.0 - labels[0].x_center) - (labels[2].x_center - 50.0)).abs() < EPS);
}

#[test]
fn test_layout_is_deterministic() {
    assert_eq!(lay_out(SENTENCE, Some(90.0)), lay_out(SENTENCE, Some(90.0)));
}

// ─── Measurement ────────────────────────────────────────────────

#[test]
fn test_measure_height_per_line() {
    let mut text = FuriganaText::new(style());
    text.set_text(SENTENCE);
    let one_line = text.measure(None, &FixedPitchMetrics);
    assert_eq!(one_line.line_count, 1);
    assert_eq!(one_line.width, 440.0);

    let wrapped = text.measure(Some(100.0), &FixedPitchMetrics);
    assert!(wrapped.line_count > 1);
    assert_eq!(wrapped.width, 100.0);
    assert_eq!(wrapped.height, (36.0 * wrapped.line_count as f64).ceil());
}

// ─── JSON documents ─────────────────────────────────────────────

#[test]
fn test_layout_json_end_to_end() {
    let json = r#"{
        "text": "{寒気;さむけ}を",
        "maxWidth": 200,
        "style": { "baseTextSize": 20 }
    }"#;
    let out = furigana::layout_json(json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let lines = value["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["labels"][0]["label"]["text"], "さむけ");
    assert_eq!(lines[0]["runs"][0]["run"]["text"], "寒気");
    assert_eq!(value["maxLineWidth"], 60.0);
}

#[test]
fn test_layout_document_highlight() {
    let doc: Document =
        serde_json::from_str(r#"{ "text": "ab{寒気;さむけ}", "highlight": [1, 3] }"#).unwrap();
    let result = furigana::layout_document(&doc).unwrap();
    let runs: Vec<(&str, bool)> = result.lines[0]
        .runs
        .iter()
        .map(|r| (r.run.text.as_str(), r.run.highlighted))
        .collect();
    assert_eq!(runs, vec![("a", false), ("b", true), ("寒", true), ("気", false)]);
}

#[test]
fn test_layout_json_rejects_bad_input() {
    let err = furigana::layout_json("{ \"text\": 5 }").unwrap_err();
    assert!(err.to_string().contains("Hint"));
}
