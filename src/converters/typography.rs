//! Translates print typography measures into web-equivalent values.

use log::debug;

use super::constants::*;
use crate::models::{
    effective::{FontStretch, TextAlign, TextTransform, WidthStrategy},
    styles::{Capitalization, FontSlant, Justification, Leading, ParagraphProperties},
};

/// Converts a raw tracking value into letter spacing in em.
///
/// Values above 100 are percentages (141 -> 1.41em). Everything else, including 100 itself and
/// negative values, is thousandths of an em (50 -> 0.05em, -20 -> -0.02em).
pub fn tracking_to_em(tracking: f64) -> f64 {
    if tracking > TRACKING_PERCENT_THRESHOLD {
        tracking / 100.0
    } else {
        tracking / 1000.0
    }
}

/// Chooses how to reproduce a horizontal scale percentage.
///
/// Extreme scales (above 150 or below 50) become a transform since no stretch keyword can
/// express them. Ranges are half-open on the upper bound except 150, which is still a keyword.
pub fn horizontal_scale_to_width(scale: f64) -> WidthStrategy {
    if !scale.is_finite() {
        return WidthStrategy::Normal;
    }
    if scale > SCALE_TRANSFORM_ABOVE || scale < SCALE_TRANSFORM_BELOW {
        return WidthStrategy::Transform {
            scale: scale / 100.0,
        };
    }

    let keyword = if scale < 62.5 {
        FontStretch::UltraCondensed
    } else if scale < 75.0 {
        FontStretch::ExtraCondensed
    } else if scale < 87.5 {
        FontStretch::Condensed
    } else if scale < 93.75 {
        FontStretch::SemiCondensed
    } else if scale < 106.25 {
        return WidthStrategy::Normal;
    } else if scale < 112.5 {
        FontStretch::SemiExpanded
    } else if scale < 125.0 {
        FontStretch::Expanded
    } else {
        FontStretch::ExtraExpanded
    };
    WidthStrategy::Stretch { keyword }
}

/// Paragraph spacing read directly off a range. `None` means the range does not set it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalParagraphMetrics {
    pub margin_top: Option<f64>,
    pub margin_bottom: Option<f64>,
    pub text_indent: Option<f64>,
    pub left_indent: Option<f64>,
    pub right_indent: Option<f64>,
    /// Leading divided by point size; absent for automatic leading.
    pub line_height: Option<f64>,
}

/// Extracts spacing, indents and line height from paragraph properties.
///
/// `point_size` is the resolved font size the leading is measured against.
pub fn extract_paragraph_metrics(
    properties: &ParagraphProperties,
    point_size: f64,
) -> LocalParagraphMetrics {
    let line_height = match properties.leading {
        Some(Leading::Points(leading)) if point_size > 0.0 => Some(leading / point_size),
        Some(Leading::Points(_)) => {
            debug!("[extract_paragraph_metrics] Ignoring leading for non-positive point size");
            None
        }
        Some(Leading::Auto) | None => None,
    };

    LocalParagraphMetrics {
        margin_top: properties.space_before,
        margin_bottom: properties.space_after,
        text_indent: properties.first_line_indent,
        left_indent: properties.left_indent,
        right_indent: properties.right_indent,
        line_height,
    }
}

/// Derives weight and slant from a combined face name such as "Semibold Italic".
/// Returns `None` for parts the name does not mention.
pub fn parse_font_style(font_style: &str) -> (Option<u16>, Option<FontSlant>) {
    let lower = font_style.to_ascii_lowercase();

    let slant = if lower.contains("italic") || lower.contains("oblique") {
        Some(FontSlant::Italic)
    } else {
        None
    };

    // Longer names first so "extrabold" is not read as "bold".
    const WEIGHTS: &[(&str, u16)] = &[
        ("hairline", 100),
        ("thin", 100),
        ("extralight", 200),
        ("ultralight", 200),
        ("light", 300),
        ("regular", 400),
        ("roman", 400),
        ("book", 400),
        ("normal", 400),
        ("medium", 500),
        ("semibold", 600),
        ("demibold", 600),
        ("extrabold", 800),
        ("ultrabold", 800),
        ("bold", 700),
        ("black", 900),
        ("heavy", 900),
    ];
    let compact: String = lower.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
    let weight = WEIGHTS
        .iter()
        .find(|(name, _)| compact.contains(name))
        .map(|(_, weight)| *weight);

    (weight, slant)
}

/// Maps layout justification to CSS `text-align`.
pub fn justification_to_align(justification: Justification) -> TextAlign {
    match justification {
        Justification::LeftAlign | Justification::ToBindingSide => TextAlign::Left,
        Justification::CenterAlign => TextAlign::Center,
        Justification::RightAlign | Justification::AwayFromBindingSide => TextAlign::Right,
        Justification::LeftJustified
        | Justification::CenterJustified
        | Justification::RightJustified
        | Justification::FullyJustified => TextAlign::Justify,
    }
}

/// Maps layout capitalization to the web text transform.
pub fn capitalization_to_transform(capitalization: Capitalization) -> TextTransform {
    match capitalization {
        Capitalization::Normal => TextTransform::None,
        Capitalization::AllCaps => TextTransform::Uppercase,
        Capitalization::SmallCaps | Capitalization::CapToSmallCap => TextTransform::SmallCaps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracking_switches_units_above_one_hundred() {
        assert_eq!(tracking_to_em(141.0), 1.41);
        assert_eq!(tracking_to_em(50.0), 0.05);
        assert_eq!(tracking_to_em(100.0), 0.1);
        assert_eq!(tracking_to_em(-20.0), -0.02);
        assert_eq!(tracking_to_em(0.0), 0.0);
    }

    #[test]
    fn calibration_scale_is_extra_expanded() {
        assert_eq!(
            horizontal_scale_to_width(141.0),
            WidthStrategy::Stretch {
                keyword: FontStretch::ExtraExpanded
            }
        );
    }

    #[test]
    fn extreme_scales_use_transform() {
        assert_eq!(
            horizontal_scale_to_width(200.0),
            WidthStrategy::Transform { scale: 2.0 }
        );
        assert_eq!(
            horizontal_scale_to_width(30.0),
            WidthStrategy::Transform { scale: 0.3 }
        );
    }

    #[test]
    fn scale_ranges_are_half_open() {
        let keyword = |scale| match horizontal_scale_to_width(scale) {
            WidthStrategy::Stretch { keyword } => Some(keyword),
            _ => None,
        };
        assert_eq!(keyword(50.0), Some(FontStretch::UltraCondensed));
        assert_eq!(keyword(62.5), Some(FontStretch::ExtraCondensed));
        assert_eq!(keyword(75.0), Some(FontStretch::Condensed));
        assert_eq!(keyword(87.5), Some(FontStretch::SemiCondensed));
        assert_eq!(keyword(93.75), None);
        assert_eq!(horizontal_scale_to_width(100.0), WidthStrategy::Normal);
        assert_eq!(keyword(106.25), Some(FontStretch::SemiExpanded));
        assert_eq!(keyword(112.5), Some(FontStretch::Expanded));
        assert_eq!(keyword(125.0), Some(FontStretch::ExtraExpanded));
        assert_eq!(keyword(150.0), Some(FontStretch::ExtraExpanded));
    }

    #[test]
    fn paragraph_metrics_are_extracted() {
        let properties = ParagraphProperties {
            space_before: Some(12.0),
            space_after: Some(18.0),
            first_line_indent: Some(24.0),
            left_indent: Some(36.0),
            right_indent: Some(48.0),
            leading: Some(Leading::Points(15.0)),
            ..Default::default()
        };

        let metrics = extract_paragraph_metrics(&properties, 12.0);
        assert_eq!(metrics.margin_top, Some(12.0));
        assert_eq!(metrics.margin_bottom, Some(18.0));
        assert_eq!(metrics.text_indent, Some(24.0));
        assert_eq!(metrics.left_indent, Some(36.0));
        assert_eq!(metrics.right_indent, Some(48.0));
        assert!((metrics.line_height.unwrap() - 1.25).abs() < 1e-9);
    }

    #[test]
    fn auto_leading_produces_no_line_height() {
        let properties = ParagraphProperties {
            leading: Some(Leading::Auto),
            ..Default::default()
        };
        assert_eq!(extract_paragraph_metrics(&properties, 12.0).line_height, None);
    }

    #[test]
    fn font_style_names_are_parsed() {
        assert_eq!(parse_font_style("Bold Italic"), (Some(700), Some(FontSlant::Italic)));
        assert_eq!(parse_font_style("ExtraBold"), (Some(800), None));
        assert_eq!(parse_font_style("Semi-bold"), (Some(600), None));
        assert_eq!(parse_font_style("Light Oblique"), (Some(300), Some(FontSlant::Italic)));
        assert_eq!(parse_font_style("Italic"), (None, Some(FontSlant::Italic)));
    }

    #[test]
    fn justified_variants_map_to_justify() {
        assert_eq!(
            justification_to_align(Justification::FullyJustified),
            TextAlign::Justify
        );
        assert_eq!(
            justification_to_align(Justification::CenterAlign),
            TextAlign::Center
        );
    }
}
