//! Checks resolved font families against the fonts the renderer can load.

use log::warn;
use std::collections::HashSet;

use crate::converters::document::DocumentConversion;
use crate::errors::IdmlError;

/// The font families available to the renderer, matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct FontRegistry {
    /// Lowercase family names.
    families: HashSet<String>,
}

impl FontRegistry {
    pub fn new<I, S>(families: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            families: families
                .into_iter()
                .map(|family| family.as_ref().trim().to_lowercase())
                .collect(),
        }
    }

    pub fn register(&mut self, family: &str) {
        self.families.insert(family.trim().to_lowercase());
    }

    pub fn contains(&self, family: &str) -> bool {
        self.families.contains(&family.trim().to_lowercase())
    }
}

/// Returns one `MissingFont` error per resolved family the registry lacks, in order of first use.
/// Covers frame styles and the styles of every included segment.
pub fn check_fonts(conversion: &DocumentConversion, registry: &FontRegistry) -> Vec<IdmlError> {
    let mut reported = HashSet::new();
    let mut missing = Vec::new();

    let families = conversion.frames.iter().flat_map(|frame| {
        std::iter::once(frame.style.font_family.as_str()).chain(
            frame
                .segments
                .iter()
                .map(|segment| segment.style.font_family.as_str()),
        )
    });

    for family in families {
        if !registry.contains(family) && reported.insert(family.to_lowercase()) {
            warn!("Font {} is not available to the renderer", family);
            missing.push(IdmlError::MissingFont {
                family: family.to_string(),
            });
        }
    }

    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConversionConfig;
    use crate::converters::document::convert_document;
    use crate::models::document::{IdmlDocument, Personalization};
    use serde_json::json;

    #[test]
    fn registry_is_case_insensitive() {
        let registry = FontRegistry::new(["Oswald", "Minion Pro "]);
        assert!(registry.contains("oswald"));
        assert!(registry.contains("MINION PRO"));
        assert!(!registry.contains("Baskerville"));
    }

    #[test]
    fn missing_families_are_reported_once() {
        let document: IdmlDocument = serde_json::from_value(json!({
            "styles": {
                "paragraphStyles": {
                    "ParagraphStyle/Body": { "fontFamily": "Baskerville" }
                }
            },
            "frames": [
                { "id": "a", "paragraphRange": { "appliedParagraphStyle": "ParagraphStyle/Body" } },
                { "id": "b", "paragraphRange": { "appliedParagraphStyle": "ParagraphStyle/Body" } }
            ]
        }))
        .unwrap();
        let conversion = convert_document(
            &document,
            &Personalization::default(),
            &ConversionConfig::default(),
        );

        let mut registry = FontRegistry::new(["Oswald"]);
        let missing = check_fonts(&conversion, &registry);
        assert_eq!(missing.len(), 1);
        assert!(
            matches!(&missing[0], IdmlError::MissingFont { family } if family == "Baskerville")
        );

        registry.register("baskerville");
        assert!(check_fonts(&conversion, &registry).is_empty());
    }
}
