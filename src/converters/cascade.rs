//! Resolves the style cascade of a text frame into one `EffectiveStyle`.
//!
//! Layers, lowest first:
//! 1. the paragraph style (walked up its based-on chain),
//! 2. the frame's character style,
//! 3. local overrides on the paragraph range, then on the character range,
//! 4. the character style of the dominant conditional segment, if any.
//!
//! The flattened result then goes through color calibration and the typography translator, and
//! anything still unset takes the configured defaults.

use indexmap::IndexMap;
use log::debug;
use std::collections::HashSet;

use super::{
    color::resolve_color_reference,
    typography::{
        capitalization_to_transform, extract_paragraph_metrics, horizontal_scale_to_width,
        justification_to_align, parse_font_style, tracking_to_em,
    },
};
use crate::{
    config::ConversionConfig,
    errors::{IdmlError, Result},
    models::{
        colors::NONE_SWATCH,
        document::StyleDictionary,
        effective::{EffectiveStyle, TextAlign, TextDecoration, TextStroke, TextTransform},
        frame::{ConditionalSegment, ParagraphRange, TextFrame},
        styles::{
            is_no_style, CharacterStyle, FontSlant, ParagraphProperties, ParagraphStyle,
            TextProperties,
        },
    },
};

/// Gives the resolver uniform access to the parent link of either style kind.
pub(crate) trait BasedOn {
    fn based_on(&self) -> Option<&str>;
}

impl BasedOn for CharacterStyle {
    fn based_on(&self) -> Option<&str> {
        self.based_on.as_deref()
    }
}

impl BasedOn for ParagraphStyle {
    fn based_on(&self) -> Option<&str> {
        self.based_on.as_deref()
    }
}

/// Walks the based-on chain starting at `style_id` and returns the styles leaf first.
///
/// The "no style" sentinel ends the chain (and yields an empty chain when given directly).
/// A missing identifier is `StyleNotFound`; revisiting an identifier is `InheritanceCycle`.
pub(crate) fn inheritance_chain<'s, S: BasedOn>(
    styles: &'s IndexMap<String, S>,
    style_id: &str,
) -> Result<Vec<&'s S>> {
    let mut chain = Vec::new();
    let mut visited: Vec<String> = Vec::new();
    let mut seen = HashSet::new();
    let mut current = Some(style_id);

    while let Some(id) = current {
        if is_no_style(id) {
            break;
        }
        if !seen.insert(id.to_string()) {
            visited.push(id.to_string());
            return Err(IdmlError::InheritanceCycle { chain: visited });
        }
        visited.push(id.to_string());

        let style = styles.get(id).ok_or_else(|| IdmlError::StyleNotFound {
            style_id: id.to_string(),
        })?;
        chain.push(style);
        current = style.based_on();
    }

    Ok(chain)
}

macro_rules! overlay {
    ($merged:ident, $specific:ident, $($field:ident),+ $(,)?) => {
        $(
            if $specific.$field.is_some() {
                debug!(
                    "[merge]   Overwriting {} with Specific: {:?}",
                    stringify!($field),
                    $specific.$field
                );
                $merged.$field = $specific.$field.clone();
            }
        )+
    };
}

/// Merges two `TextProperties`, where `specific` overrides `inherited` field by field.
/// Fields unset in `specific` keep the inherited value.
pub(crate) fn merge_text_properties(
    specific: Option<&TextProperties>,
    inherited: Option<&TextProperties>,
) -> TextProperties {
    let mut merged = inherited.cloned().unwrap_or_default();
    if let Some(specific) = specific {
        overlay!(
            merged,
            specific,
            font_family,
            font_size,
            fill_color,
            tracking,
            baseline_shift,
            underline,
            strike_through,
            capitalization,
            horizontal_scale,
            stroke_color,
            stroke_weight,
        );
        // A face name at a higher layer replaces weight/slant derived below it.
        if let Some(font_style) = &specific.font_style {
            let (weight, slant) = parse_font_style(font_style);
            merged.font_style = Some(font_style.clone());
            merged.font_weight = weight.or(merged.font_weight);
            merged.font_slant = slant.or(Some(FontSlant::Normal));
        }
        overlay!(merged, specific, font_weight, font_slant);
    }
    merged
}

/// Merges two `ParagraphProperties`, where `specific` overrides `inherited` field by field.
pub(crate) fn merge_paragraph_properties(
    specific: Option<&ParagraphProperties>,
    inherited: Option<&ParagraphProperties>,
) -> ParagraphProperties {
    let mut merged = inherited.cloned().unwrap_or_default();
    if let Some(specific) = specific {
        overlay!(
            merged,
            specific,
            justification,
            space_before,
            space_after,
            first_line_indent,
            left_indent,
            right_indent,
            leading,
        );
    }
    merged
}

/// Picks the conditional segment whose character style styles the whole frame: the first one,
/// in document order, with visible text and a real character style.
///
/// Authors often leave the frame on "no style" and put the visible style on an inline run.
/// This is the only place that rule lives.
pub fn select_dominant_segment(segments: &[ConditionalSegment]) -> Option<&ConditionalSegment> {
    segments.iter().find(|segment| {
        !segment.text.trim().is_empty()
            && segment
                .applied_character_style
                .as_deref()
                .is_some_and(|style| !is_no_style(style))
    })
}

/// Layers 1-3 of a frame, before any segment is considered.
struct FrameLayers {
    text: TextProperties,
    named_paragraph: ParagraphProperties,
    local_paragraph: ParagraphProperties,
}

/// Resolves effective styles against one document's style dictionary.
pub struct StyleResolver<'a> {
    styles: &'a StyleDictionary,
    config: &'a ConversionConfig,
}

impl<'a> StyleResolver<'a> {
    pub fn new(styles: &'a StyleDictionary, config: &'a ConversionConfig) -> Self {
        Self { styles, config }
    }

    /// Flattens a character style and its ancestors into one set of properties.
    pub fn flatten_character_style(&self, style_id: &str) -> Result<TextProperties> {
        let chain = inheritance_chain(&self.styles.character_styles, style_id)?;
        Ok(chain
            .iter()
            .rev()
            .fold(TextProperties::default(), |merged, style| {
                merge_text_properties(Some(&style.text), Some(&merged))
            }))
    }

    /// Flattens a paragraph style and its ancestors into its font and layout properties.
    pub fn flatten_paragraph_style(
        &self,
        style_id: &str,
    ) -> Result<(TextProperties, ParagraphProperties)> {
        let chain = inheritance_chain(&self.styles.paragraph_styles, style_id)?;
        let mut text = TextProperties::default();
        let mut paragraph = ParagraphProperties::default();
        for style in chain.iter().rev() {
            text = merge_text_properties(Some(&style.text), Some(&text));
            paragraph = merge_paragraph_properties(Some(&style.paragraph), Some(&paragraph));
        }
        Ok((text, paragraph))
    }

    fn paragraph_range<'f>(&self, frame: &'f TextFrame) -> Result<&'f ParagraphRange> {
        frame.paragraph_range.as_ref().ok_or_else(|| {
            IdmlError::Parse(format!("frame {} has no paragraph range", frame.id))
        })
    }

    fn frame_layers(&self, frame: &TextFrame) -> Result<FrameLayers> {
        let paragraph_range = self.paragraph_range(frame)?;

        debug!(
            "[resolve_frame] {}: paragraph style {}",
            frame.id, paragraph_range.applied_paragraph_style
        );
        let (paragraph_text, named_paragraph) =
            self.flatten_paragraph_style(&paragraph_range.applied_paragraph_style)?;

        let mut text = paragraph_text;
        if let Some(character_range) = &frame.character_range {
            debug!(
                "[resolve_frame] {}: character style {}",
                frame.id, character_range.applied_character_style
            );
            let character = self.flatten_character_style(&character_range.applied_character_style)?;
            text = merge_text_properties(Some(&character), Some(&text));
        }

        text = merge_text_properties(Some(&paragraph_range.local.text), Some(&text));
        let mut local_paragraph = paragraph_range.local.paragraph.clone();
        if let Some(character_range) = &frame.character_range {
            text = merge_text_properties(Some(&character_range.local.text), Some(&text));
            local_paragraph = merge_paragraph_properties(
                Some(&character_range.local.paragraph),
                Some(&local_paragraph),
            );
        }

        Ok(FrameLayers {
            text,
            named_paragraph,
            local_paragraph,
        })
    }

    /// Resolves the effective style of a whole frame.
    ///
    /// Fails only for this frame: missing paragraph range (`Parse`), unknown style
    /// (`StyleNotFound`), cyclic based-on chain (`InheritanceCycle`) or a malformed swatch.
    pub fn resolve_frame(&self, frame: &TextFrame) -> Result<EffectiveStyle> {
        let mut layers = self.frame_layers(frame)?;

        if let Some(segment) = select_dominant_segment(&frame.segments) {
            if let Some(style_id) = &segment.applied_character_style {
                debug!(
                    "[resolve_frame] {}: dominant segment style {} overrides frame style",
                    frame.id, style_id
                );
                let segment_text = self.flatten_character_style(style_id)?;
                layers.text = merge_text_properties(Some(&segment_text), Some(&layers.text));
            }
        }

        self.finalize(&layers)
    }

    /// Resolves the style of one conditional segment: the frame's layers 1-3, then the segment's
    /// character style, then its inline fill color.
    pub fn resolve_segment(
        &self,
        frame: &TextFrame,
        segment: &ConditionalSegment,
    ) -> Result<EffectiveStyle> {
        let mut layers = self.frame_layers(frame)?;

        if let Some(style_id) = &segment.applied_character_style {
            let segment_text = self.flatten_character_style(style_id)?;
            layers.text = merge_text_properties(Some(&segment_text), Some(&layers.text));
        }
        if let Some(fill) = &segment.fill_color {
            layers.text.fill_color = Some(fill.clone());
        }

        self.finalize(&layers)
    }

    /// Turns flattened layers into concrete web values.
    fn finalize(&self, layers: &FrameLayers) -> Result<EffectiveStyle> {
        let text = &layers.text;
        let config = self.config;

        let font_size = text
            .font_size
            .filter(|size| *size > 0.0)
            .unwrap_or(config.default_font_size);

        let color = match text.fill_color.as_deref() {
            Some(reference) => {
                resolve_color_reference(reference, &self.styles.swatches, &config.default_color)?
            }
            None => config.default_color.clone(),
        };

        let stroke = match (text.stroke_color.as_deref(), text.stroke_weight) {
            (Some(reference), weight) if reference != NONE_SWATCH => {
                let width = weight.unwrap_or(1.0);
                if width > 0.0 {
                    Some(TextStroke {
                        color: resolve_color_reference(
                            reference,
                            &self.styles.swatches,
                            &config.default_color,
                        )?,
                        width,
                    })
                } else {
                    None
                }
            }
            _ => None,
        };

        let named = extract_paragraph_metrics(&layers.named_paragraph, font_size);
        let local = extract_paragraph_metrics(&layers.local_paragraph, font_size);

        let text_align = layers
            .local_paragraph
            .justification
            .or(layers.named_paragraph.justification)
            .map(justification_to_align)
            .unwrap_or(TextAlign::Left);

        Ok(EffectiveStyle {
            font_family: text
                .font_family
                .clone()
                .unwrap_or_else(|| config.default_font_family.clone()),
            font_size,
            font_weight: text.font_weight.unwrap_or(super::constants::DEFAULT_FONT_WEIGHT),
            font_style: text.font_slant.unwrap_or_default(),
            color,
            letter_spacing: tracking_to_em(text.tracking.unwrap_or(0.0)),
            baseline_shift: text.baseline_shift.unwrap_or(0.0),
            text_decoration: TextDecoration::from_flags(
                text.underline.unwrap_or(false),
                text.strike_through.unwrap_or(false),
            ),
            text_transform: text
                .capitalization
                .map(capitalization_to_transform)
                .unwrap_or(TextTransform::None),
            width: horizontal_scale_to_width(text.horizontal_scale.unwrap_or(100.0)),
            stroke,
            text_align,
            line_height: local
                .line_height
                .or(named.line_height)
                .unwrap_or(config.default_line_height),
            margin_top: local.margin_top.or(named.margin_top).unwrap_or(0.0),
            margin_bottom: local.margin_bottom.or(named.margin_bottom).unwrap_or(0.0),
            text_indent: local.text_indent.or(named.text_indent).unwrap_or(0.0),
            left_indent: local.left_indent.or(named.left_indent).unwrap_or(0.0),
            right_indent: local.right_indent.or(named.right_indent).unwrap_or(0.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::effective::{FontStretch, WidthStrategy};
    use crate::models::frame::CharacterRange;
    use crate::models::styles::{Leading, LocalStyleOverride, NO_CHARACTER_STYLE};
    use serde_json::json;

    fn dictionary() -> StyleDictionary {
        serde_json::from_value(json!({
            "paragraphStyles": {
                "ParagraphStyle/Base": {
                    "fontFamily": "Baskerville",
                    "fontSize": 14,
                    "fillColor": "Color/Black",
                    "justification": "CenterAlign",
                    "spaceBefore": 4,
                    "spaceAfter": 6,
                    "leading": 21
                },
                "ParagraphStyle/Body": {
                    "basedOn": "ParagraphStyle/Base",
                    "fontSize": 12
                },
                "ParagraphStyle/LoopA": { "basedOn": "ParagraphStyle/LoopB" },
                "ParagraphStyle/LoopB": { "basedOn": "ParagraphStyle/LoopA" }
            },
            "characterStyles": {
                "CharacterStyle/Style A": {
                    "fontSize": 42,
                    "fillColor": "Color/Plum",
                    "fontStyle": "Bold",
                    "tracking": 141,
                    "horizontalScale": 141
                },
                "CharacterStyle/Emphasis": {
                    "basedOn": "CharacterStyle/Style A",
                    "fontStyle": "Italic",
                    "fontSize": 20
                },
                "CharacterStyle/SelfLoop": { "basedOn": "CharacterStyle/SelfLoop" }
            },
            "swatches": {
                "Color/Black": { "space": "CMYK", "components": [0, 0, 0, 100] },
                "Color/Plum": { "space": "CMYK", "components": [65, 100, 0, 13] }
            }
        }))
        .unwrap()
    }

    fn frame(paragraph_style: &str) -> TextFrame {
        serde_json::from_value(json!({
            "id": "frame-1",
            "content": "Hello",
            "paragraphRange": { "appliedParagraphStyle": paragraph_style }
        }))
        .unwrap()
    }

    fn segment(text: &str, style: Option<&str>) -> ConditionalSegment {
        ConditionalSegment {
            text: text.to_string(),
            applied_character_style: style.map(str::to_string),
            fill_color: None,
            condition: None,
        }
    }

    #[test]
    fn paragraph_chain_is_walked_root_first() {
        let styles = dictionary();
        let config = ConversionConfig::default();
        let resolver = StyleResolver::new(&styles, &config);

        let style = resolver.resolve_frame(&frame("ParagraphStyle/Body")).unwrap();
        assert_eq!(style.font_family, "Baskerville");
        assert_eq!(style.font_size, 12.0);
        assert_eq!(style.color, "#000000");
        assert_eq!(style.text_align, TextAlign::Center);
        assert_eq!(style.margin_top, 4.0);
        // Leading 21 against the resolved 12pt size.
        assert!((style.line_height - 1.75).abs() < 1e-9);
    }

    #[test]
    fn character_style_wins_over_paragraph_style() {
        let styles = dictionary();
        let config = ConversionConfig::default();
        let resolver = StyleResolver::new(&styles, &config);

        let mut frame = frame("ParagraphStyle/Body");
        frame.character_range = Some(CharacterRange {
            applied_character_style: "CharacterStyle/Emphasis".to_string(),
            local: LocalStyleOverride::default(),
        });

        let style = resolver.resolve_frame(&frame).unwrap();
        assert_eq!(style.font_size, 20.0);
        assert_eq!(style.font_family, "Baskerville");
        // Bold from the parent style, italic from the child.
        assert_eq!(style.font_weight, 700);
        assert_eq!(style.font_style, FontSlant::Italic);
        assert_eq!(style.color, "#6f1d76");
        assert_eq!(style.letter_spacing, 1.41);
        assert_eq!(
            style.width,
            WidthStrategy::Stretch {
                keyword: FontStretch::ExtraExpanded
            }
        );
    }

    #[test]
    fn local_override_wins_field_by_field() {
        let styles = dictionary();
        let config = ConversionConfig::default();
        let resolver = StyleResolver::new(&styles, &config);

        let mut frame = frame("ParagraphStyle/Body");
        if let Some(range) = frame.paragraph_range.as_mut() {
            range.local.paragraph.space_before = Some(30.0);
            range.local.paragraph.leading = Some(Leading::Auto);
            range.local.text.font_size = Some(16.0);
        }

        let style = resolver.resolve_frame(&frame).unwrap();
        assert_eq!(style.margin_top, 30.0);
        assert_eq!(style.margin_bottom, 6.0);
        assert_eq!(style.font_size, 16.0);
        // Auto leading on the range leaves the named style's leading in place.
        assert!((style.line_height - 21.0 / 16.0).abs() < 1e-9);
    }

    #[test]
    fn first_styled_segment_styles_the_frame() {
        let styles = dictionary();
        let config = ConversionConfig::default();
        let resolver = StyleResolver::new(&styles, &config);

        let mut frame = frame("ParagraphStyle/Body");
        frame.character_range = Some(CharacterRange {
            applied_character_style: NO_CHARACTER_STYLE.to_string(),
            local: LocalStyleOverride::default(),
        });
        frame.segments = vec![
            segment("   ", Some("CharacterStyle/Emphasis")),
            segment("Dear ", Some(NO_CHARACTER_STYLE)),
            segment("{name_child}", Some("CharacterStyle/Style A")),
            segment("!", Some("CharacterStyle/Emphasis")),
        ];

        let style = resolver.resolve_frame(&frame).unwrap();
        assert_eq!(style.font_size, 42.0);
        assert_eq!(style.color, "#6f1d76");
        assert_eq!(style.font_style, FontSlant::Normal);
    }

    #[test]
    fn frame_style_stands_without_styled_segments() {
        let segments = vec![segment("", Some("CharacterStyle/Style A")), segment("x", None)];
        assert!(select_dominant_segment(&segments).is_none());
    }

    #[test]
    fn segment_inline_fill_overrides_its_style() {
        let styles = dictionary();
        let config = ConversionConfig::default();
        let resolver = StyleResolver::new(&styles, &config);

        let frame = frame("ParagraphStyle/Body");
        let mut run = segment("she", Some("CharacterStyle/Style A"));
        run.fill_color = Some("Color/Black".to_string());

        let style = resolver.resolve_segment(&frame, &run).unwrap();
        assert_eq!(style.font_size, 42.0);
        assert_eq!(style.color, "#000000");
    }

    #[test]
    fn unknown_style_is_reported() {
        let styles = dictionary();
        let config = ConversionConfig::default();
        let resolver = StyleResolver::new(&styles, &config);

        let err = resolver
            .resolve_frame(&frame("ParagraphStyle/Missing"))
            .unwrap_err();
        assert!(
            matches!(err, IdmlError::StyleNotFound { ref style_id } if style_id == "ParagraphStyle/Missing")
        );
    }

    #[test]
    fn cycles_are_detected() {
        let styles = dictionary();
        let config = ConversionConfig::default();
        let resolver = StyleResolver::new(&styles, &config);

        let err = resolver
            .resolve_frame(&frame("ParagraphStyle/LoopA"))
            .unwrap_err();
        match err {
            IdmlError::InheritanceCycle { chain } => assert_eq!(
                chain,
                vec![
                    "ParagraphStyle/LoopA",
                    "ParagraphStyle/LoopB",
                    "ParagraphStyle/LoopA"
                ]
            ),
            other => panic!("expected cycle, got {other:?}"),
        }

        assert!(matches!(
            resolver.flatten_character_style("CharacterStyle/SelfLoop"),
            Err(IdmlError::InheritanceCycle { .. })
        ));
    }

    #[test]
    fn frame_without_paragraph_range_is_a_parse_error() {
        let styles = dictionary();
        let config = ConversionConfig::default();
        let resolver = StyleResolver::new(&styles, &config);

        let mut frame = frame("ParagraphStyle/Body");
        frame.paragraph_range = None;
        assert!(matches!(
            resolver.resolve_frame(&frame),
            Err(IdmlError::Parse(_))
        ));
    }

    #[test]
    fn resolution_is_total_with_no_styles() {
        let styles = StyleDictionary::default();
        let config = ConversionConfig::default();
        let resolver = StyleResolver::new(&styles, &config);

        let style = resolver
            .resolve_frame(&frame("ParagraphStyle/$ID/[No paragraph style]"))
            .unwrap();
        assert_eq!(style.font_family, config.default_font_family);
        assert_eq!(style.font_size, config.default_font_size);
        assert_eq!(style.color, config.default_color);
        assert_eq!(style.line_height, config.default_line_height);
        assert_eq!(style.width, WidthStrategy::Normal);
        assert!(style.stroke.is_none());
    }

    #[test]
    fn dictionaries_are_not_mutated() {
        let styles = dictionary();
        let before = styles.clone();
        let config = ConversionConfig::default();
        let resolver = StyleResolver::new(&styles, &config);
        let _ = resolver.resolve_frame(&frame("ParagraphStyle/Body"));
        assert_eq!(styles, before);
    }
}
