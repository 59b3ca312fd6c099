// src/models/styles.rs

use serde::{Deserialize, Serialize};

/// Identifier IDML uses for "no character style applied".
pub const NO_CHARACTER_STYLE: &str = "CharacterStyle/$ID/[No character style]";
/// Identifier IDML uses for "no paragraph style applied".
pub const NO_PARAGRAPH_STYLE: &str = "ParagraphStyle/$ID/[No paragraph style]";

/// Returns true when a style reference means "no style" rather than naming a real style.
/// Empty references count as absent too.
pub fn is_no_style(style_id: &str) -> bool {
    let trimmed = style_id.trim();
    trimmed.is_empty()
        || trimmed == NO_CHARACTER_STYLE
        || trimmed == NO_PARAGRAPH_STYLE
        || trimmed.ends_with("[No character style]")
        || trimmed.ends_with("[No paragraph style]")
}

/// Letter case treatment applied to a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capitalization {
    Normal,
    AllCaps,
    SmallCaps,
    CapToSmallCap,
}

/// Slant of a font face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSlant {
    #[default]
    Normal,
    Italic,
}

/// Paragraph justification as written in the layout document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Justification {
    LeftAlign,
    CenterAlign,
    RightAlign,
    LeftJustified,
    CenterJustified,
    RightJustified,
    FullyJustified,
    ToBindingSide,
    AwayFromBindingSide,
}

/// Line spacing. The layout document writes either a point value or the keyword `Auto`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawLeading", into = "RawLeading")]
pub enum Leading {
    /// Leading is derived from the font size; no explicit line height.
    Auto,
    /// Explicit leading in points.
    Points(f64),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawLeading {
    Number(f64),
    Keyword(String),
}

impl From<RawLeading> for Leading {
    fn from(raw: RawLeading) -> Self {
        match raw {
            RawLeading::Number(points) => Leading::Points(points),
            // Anything that is not a number ("Auto" in practice) behaves as automatic leading.
            RawLeading::Keyword(_) => Leading::Auto,
        }
    }
}

impl From<Leading> for RawLeading {
    fn from(leading: Leading) -> Self {
        match leading {
            Leading::Auto => RawLeading::Keyword("Auto".to_string()),
            Leading::Points(points) => RawLeading::Number(points),
        }
    }
}

/// Font-level properties shared by character styles, paragraph styles and local overrides.
///
/// Every field is sparse: `None` means "not specified at this layer", so the value falls through
/// to the layer below during the cascade.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProperties {
    /// The font family (`AppliedFont`).
    pub font_family: Option<String>,

    /// Combined face name such as "Bold Italic". Used when `font_weight`/`font_slant` are unset.
    pub font_style: Option<String>,

    /// Font size in points (`PointSize`).
    pub font_size: Option<f64>,

    /// Numeric CSS-style weight (100..=900).
    pub font_weight: Option<u16>,

    pub font_slant: Option<FontSlant>,

    /// Swatch reference for the text fill (`FillColor`).
    pub fill_color: Option<String>,

    /// Raw tracking value from the layout document.
    pub tracking: Option<f64>,

    /// Baseline shift in points; positive moves text up.
    pub baseline_shift: Option<f64>,

    pub underline: Option<bool>,

    #[serde(rename = "strikeThru")]
    pub strike_through: Option<bool>,

    pub capitalization: Option<Capitalization>,

    /// Horizontal scale as a percentage (100 = undistorted).
    pub horizontal_scale: Option<f64>,

    /// Swatch reference for the text outline.
    pub stroke_color: Option<String>,

    /// Outline weight in points.
    pub stroke_weight: Option<f64>,
}

/// Paragraph-level layout properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphProperties {
    pub justification: Option<Justification>,

    /// Extra space above the paragraph, in points.
    pub space_before: Option<f64>,

    /// Extra space below the paragraph, in points.
    pub space_after: Option<f64>,

    pub first_line_indent: Option<f64>,
    pub left_indent: Option<f64>,
    pub right_indent: Option<f64>,

    /// Raw leading; converted to a ratio against the resolved point size.
    pub leading: Option<Leading>,
}

/// A named character style from the style dictionary. Its identifier is the dictionary key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterStyle {
    /// Human-readable name as shown in the layout application.
    pub name: Option<String>,

    /// Identifier of the parent style this one is based on.
    pub based_on: Option<String>,

    #[serde(flatten)]
    pub text: TextProperties,
}

/// A named paragraph style. Carries the paragraph-default font fields next to its layout fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyle {
    pub name: Option<String>,
    pub based_on: Option<String>,

    #[serde(flatten)]
    pub text: TextProperties,

    #[serde(flatten)]
    pub paragraph: ParagraphProperties,
}

/// Sparse formatting attached directly to a paragraph or character range.
/// Present fields win over the named style; absent fields fall through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalStyleOverride {
    #[serde(flatten)]
    pub text: TextProperties,

    #[serde(flatten)]
    pub paragraph: ParagraphProperties,
}

impl LocalStyleOverride {
    /// True when the override specifies nothing.
    pub fn is_empty(&self) -> bool {
        self.text == TextProperties::default() && self.paragraph == ParagraphProperties::default()
    }
}
