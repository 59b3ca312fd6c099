// src/models/frame.rs

use serde::{Deserialize, Serialize};

use crate::models::styles::LocalStyleOverride;

/// Top-left corner of a frame on its page, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Inner dimensions of a frame's text container, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: f64,
    pub height: f64,
}

/// The paragraph range of a frame: the applied paragraph style plus local paragraph formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphRange {
    /// Identifier of the applied paragraph style (`ParagraphStyle/<name>`).
    pub applied_paragraph_style: String,

    /// Formatting set directly on the range.
    #[serde(default)]
    pub local: LocalStyleOverride,
}

/// The character range of a frame: the applied character style plus local character formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRange {
    /// Identifier of the applied character style (`CharacterStyle/<name>`), possibly the "no style" sentinel.
    pub applied_character_style: String,

    #[serde(default)]
    pub local: LocalStyleOverride,
}

/// A run of text whose inclusion may depend on the active personalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalSegment {
    /// The run's text, possibly containing `{attribute_subject}` placeholders.
    pub text: String,

    /// Character style applied to the run.
    pub applied_character_style: Option<String>,

    /// Inline fill color swatch reference set on the run itself.
    pub fill_color: Option<String>,

    /// Condition label (e.g. "Feminine"). Segments without one are always included.
    pub condition: Option<String>,
}

/// A text frame extracted from a spread, with its story content flattened in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFrame {
    pub id: String,

    /// Zero-based page the frame sits on.
    #[serde(default)]
    pub page_index: usize,

    /// Order of the frame within its page.
    #[serde(default)]
    pub layout_order: usize,

    /// Identifier of the parent story (`ParentStory`).
    pub story_id: Option<String>,

    /// Raw story text, used when the frame has no conditional segments.
    #[serde(default)]
    pub content: String,

    /// Missing only when the decoder could not find any paragraph range.
    pub paragraph_range: Option<ParagraphRange>,

    pub character_range: Option<CharacterRange>,

    /// Conditional runs in document order.
    #[serde(default)]
    pub segments: Vec<ConditionalSegment>,

    pub position: Option<Position>,

    /// Container dimensions; frames without a size are not fitted.
    pub size: Option<FrameSize>,
}
