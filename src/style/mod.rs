//! # Style System
//!
//! The configuration surface of the engine: text size, colors, and weight for
//! the three kinds of text that appear in a furigana layout (normal base text,
//! highlighted base text, and the ruby labels above them).
//!
//! `FuriganaStyle` is what callers configure. The layout pipeline never looks
//! at it directly; it resolves it into three `TextStyle`s, which are what the
//! metrics provider measures against and what a renderer draws with.

use serde::{Deserialize, Serialize};

/// An RGBA color with components in 0.0 - 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "default_alpha")]
    pub a: f64,
}

fn default_alpha() -> f64 {
    1.0
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const RED: Color = Color {
        r: 0.85,
        g: 0.1,
        b: 0.1,
        a: 1.0,
    };
    pub const GREY: Color = Color {
        r: 0.4,
        g: 0.4,
        b: 0.4,
        a: 1.0,
    };

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// A fully resolved text style, as seen by metrics providers and renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Font weight (100-900).
    pub font_weight: u32,
    pub color: Color,
}

/// Which of the three resolved styles a piece of text uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextRole {
    Normal,
    Highlighted,
    Furigana,
}

/// Configuration for a furigana text block.
///
/// Every field has a default, so `{}` is a valid style in JSON documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FuriganaStyle {
    /// Size of the base text in pixels.
    pub base_text_size: f64,
    /// Ruby text size as a fraction of the base size.
    pub furigana_scale: f64,
    pub base_color: Color,
    pub highlight_color: Color,
    pub furigana_color: Color,
    pub font_family: String,
    /// Render base and highlighted text in bold.
    pub bold: bool,
}

impl Default for FuriganaStyle {
    fn default() -> Self {
        Self {
            base_text_size: 36.0,
            furigana_scale: 0.5,
            base_color: Color::BLACK,
            highlight_color: Color::RED,
            furigana_color: Color::GREY,
            font_family: "sans-serif".to_string(),
            bold: true,
        }
    }
}

impl FuriganaStyle {
    /// A default style at the given base text size.
    pub fn with_size(base_text_size: f64) -> Self {
        Self {
            base_text_size,
            ..Default::default()
        }
    }

    fn base_weight(&self) -> u32 {
        if self.bold {
            700
        } else {
            400
        }
    }

    pub fn normal(&self) -> TextStyle {
        TextStyle {
            font_family: self.font_family.clone(),
            font_size: self.base_text_size,
            font_weight: self.base_weight(),
            color: self.base_color,
        }
    }

    pub fn highlighted(&self) -> TextStyle {
        TextStyle {
            font_family: self.font_family.clone(),
            font_size: self.base_text_size,
            font_weight: self.base_weight(),
            color: self.highlight_color,
        }
    }

    pub fn furigana(&self) -> TextStyle {
        TextStyle {
            font_family: self.font_family.clone(),
            font_size: self.base_text_size * self.furigana_scale,
            font_weight: 400,
            color: self.furigana_color,
        }
    }

    pub fn resolve(&self, role: TextRole) -> TextStyle {
        match role {
            TextRole::Normal => self.normal(),
            TextRole::Highlighted => self.highlighted(),
            TextRole::Furigana => self.furigana(),
        }
    }
}
