//! # Furigana
//!
//! A layout engine for Japanese text with ruby glosses (furigana).
//!
//! Text comes in as inline markup, `{寒気;さむけ}を{防;ふせ}ぐ`, and goes out as
//! lines of positioned base runs with ruby labels placed above them. Lines
//! are broken greedily against an optional width, and labels that would
//! collide are pushed apart by the smallest total displacement from their
//! centred positions.
//!
//! ## Architecture
//!
//! ```text
//! markup text + highlight
//!       ↓
//!   [markup]   — {base;ruby} syntax → spans
//!       ↓
//!   [span]     — measure spans through a TextMetrics provider [font]
//!       ↓
//!   [layout]   — break lines, place ruby labels per line
//!       ↓
//!   LayoutResult (positioned runs, labels, baselines)
//! ```
//!
//! The engine does no drawing. A renderer walks the `LayoutResult` and draws
//! each run and label at the coordinates given.

pub mod error;
pub mod font;
pub mod layout;
pub mod markup;
pub mod model;
pub mod span;
pub mod style;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::FuriganaError;
pub use font::{FixedPitchMetrics, FontContext, TextMetrics};
pub use layout::{compute_layout, FuriganaText, LayoutResult, Measurement};
pub use style::FuriganaStyle;

use model::{Document, FontEntry};

/// Lay out markup text in one call.
pub fn layout_text(
    text: &str,
    style: &FuriganaStyle,
    max_width: Option<f64>,
    metrics: &dyn TextMetrics,
) -> LayoutResult {
    compute_layout(&markup::parse(text, 0..0), style, max_width, metrics)
}

/// Lay out a document, registering its fonts first.
pub fn layout_document(document: &Document) -> Result<LayoutResult, FuriganaError> {
    let mut fonts = FontContext::new();
    for entry in &document.fonts {
        let data = decode_font_src(entry)?;
        fonts.register(&entry.family, entry.weight, &data)?;
    }

    let spans = markup::parse(&document.text, document.highlight_range());
    Ok(compute_layout(
        &spans,
        &document.style,
        document.max_width,
        &fonts,
    ))
}

/// Lay out a document described as JSON and return the layout as JSON.
pub fn layout_json(json: &str) -> Result<String, FuriganaError> {
    let document: Document = serde_json::from_str(json)?;
    let result = layout_document(&document)?;
    serde_json::to_string_pretty(&result).map_err(FuriganaError::Serialize)
}

/// Decode a font `src`: a data URI or raw base64.
fn decode_font_src(entry: &FontEntry) -> Result<Vec<u8>, FuriganaError> {
    use base64::Engine;

    let b64 = match entry.src.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => entry.src.as_str(),
    };
    base64::engine::general_purpose::STANDARD
        .decode(b64.trim())
        .map_err(|e| {
            FuriganaError::Font(format!(
                "Base64 decode error for '{}': {}",
                entry.family, e
            ))
        })
}
