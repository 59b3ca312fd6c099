// src/models/effective.rs

use serde::{Deserialize, Serialize};

use crate::models::styles::FontSlant;

/// CSS `font-stretch` keywords reachable from a horizontal scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontStretch {
    UltraCondensed,
    ExtraCondensed,
    Condensed,
    SemiCondensed,
    SemiExpanded,
    Expanded,
    ExtraExpanded,
}

impl FontStretch {
    /// The CSS keyword.
    pub fn as_css(self) -> &'static str {
        match self {
            FontStretch::UltraCondensed => "ultra-condensed",
            FontStretch::ExtraCondensed => "extra-condensed",
            FontStretch::Condensed => "condensed",
            FontStretch::SemiCondensed => "semi-condensed",
            FontStretch::SemiExpanded => "semi-expanded",
            FontStretch::Expanded => "expanded",
            FontStretch::ExtraExpanded => "extra-expanded",
        }
    }
}

/// How a horizontal scale is reproduced on the web.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum WidthStrategy {
    /// Close enough to 100% that nothing is emitted.
    Normal,
    /// A `font-stretch` keyword.
    Stretch { keyword: FontStretch },
    /// A geometric `scaleX` transform, for distortions no keyword can express.
    Transform { scale: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    LineThrough,
    UnderlineLineThrough,
}

impl TextDecoration {
    pub fn from_flags(underline: bool, strike_through: bool) -> Self {
        match (underline, strike_through) {
            (false, false) => TextDecoration::None,
            (true, false) => TextDecoration::Underline,
            (false, true) => TextDecoration::LineThrough,
            (true, true) => TextDecoration::UnderlineLineThrough,
        }
    }

    pub fn as_css(self) -> &'static str {
        match self {
            TextDecoration::None => "none",
            TextDecoration::Underline => "underline",
            TextDecoration::LineThrough => "line-through",
            TextDecoration::UnderlineLineThrough => "underline line-through",
        }
    }
}

/// Letter case treatment on the web side. Small caps are a font variant rather than a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextTransform {
    #[default]
    None,
    Uppercase,
    SmallCaps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub fn as_css(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Justify => "justify",
        }
    }
}

/// A resolved text outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStroke {
    /// Hex color.
    pub color: String,
    /// Outline weight in points.
    pub width: f64,
}

/// The fully resolved style of a frame or segment. Every field is concrete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveStyle {
    pub font_family: String,
    /// Nominal font size in points; the fitted size may replace it at render time.
    pub font_size: f64,
    pub font_weight: u16,
    pub font_style: FontSlant,
    /// Hex fill color, or `transparent`.
    pub color: String,
    /// Letter spacing in em.
    pub letter_spacing: f64,
    /// Baseline shift in points.
    pub baseline_shift: f64,
    pub text_decoration: TextDecoration,
    pub text_transform: TextTransform,
    pub width: WidthStrategy,
    pub stroke: Option<TextStroke>,
    pub text_align: TextAlign,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    pub text_indent: f64,
    pub left_indent: f64,
    pub right_indent: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn width_strategy_serializes_with_kind_tag() {
        let stretch = WidthStrategy::Stretch {
            keyword: FontStretch::ExtraExpanded,
        };
        assert_eq!(
            serde_json::to_value(stretch).unwrap(),
            json!({ "kind": "stretch", "keyword": "extra-expanded" })
        );
        assert_eq!(
            serde_json::to_value(WidthStrategy::Transform { scale: 2.0 }).unwrap(),
            json!({ "kind": "transform", "scale": 2.0 })
        );
    }

    #[test]
    fn decoration_combines_flags() {
        assert_eq!(TextDecoration::from_flags(false, false).as_css(), "none");
        assert_eq!(
            TextDecoration::from_flags(true, true).as_css(),
            "underline line-through"
        );
    }
}
