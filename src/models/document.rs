use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::models::{
    colors::ColorSwatch,
    frame::TextFrame,
    styles::{CharacterStyle, ParagraphStyle},
};

/// The read-only style inputs of one document, keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDictionary {
    #[serde(default)]
    pub paragraph_styles: IndexMap<String, ParagraphStyle>,

    #[serde(default)]
    pub character_styles: IndexMap<String, CharacterStyle>,

    #[serde(default)]
    pub swatches: IndexMap<String, ColorSwatch>,
}

/// Everything the decoder hands over for one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdmlDocument {
    #[serde(default)]
    pub styles: StyleDictionary,

    #[serde(default)]
    pub frames: Vec<TextFrame>,
}

/// The reader's wizard choices for one book.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Personalization {
    /// Condition labels that are switched on (e.g. "Feminine").
    #[serde(default)]
    pub active_conditions: HashSet<String>,

    /// Wizard values keyed by wizard attribute name (`heroId_attributeId`).
    #[serde(default)]
    pub values: HashMap<String, String>,
}

impl Personalization {
    /// Whether a segment with this condition label belongs in the rendered text.
    /// Unconditional segments are always included.
    pub fn includes(&self, condition: Option<&str>) -> bool {
        match condition {
            None => true,
            Some(label) if label.trim().is_empty() => true,
            Some(label) => self.active_conditions.contains(label),
        }
    }
}
