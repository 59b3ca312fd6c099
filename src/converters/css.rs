//! Renders an `EffectiveStyle` as inline CSS declarations for the page renderer.

use std::fmt::Write;

use crate::errors::Result;
use crate::models::{
    effective::{EffectiveStyle, TextDecoration, TextTransform, WidthStrategy},
    styles::FontSlant,
};

/// Writes the style as `property:value; ` pairs.
///
/// # Arguments
/// * `style` - The resolved style.
/// * `font_size` - The fitted size, replacing the style's nominal size when given.
///
/// # Returns
/// The declaration list, or a formatting error.
pub fn to_css(style: &EffectiveStyle, font_size: Option<f64>) -> Result<String> {
    let mut css = String::new();

    write!(css, "font-family:'{}'; ", style.font_family)?;
    write!(css, "font-size:{}pt; ", font_size.unwrap_or(style.font_size))?;
    write!(css, "font-weight:{}; ", style.font_weight)?;
    if style.font_style == FontSlant::Italic {
        write!(css, "font-style:italic; ")?;
    }
    write!(css, "color:{}; ", style.color)?;

    if style.letter_spacing != 0.0 {
        write!(css, "letter-spacing:{}em; ", style.letter_spacing)?;
    }

    match style.width {
        WidthStrategy::Normal => {}
        WidthStrategy::Stretch { keyword } => write!(css, "font-stretch:{}; ", keyword.as_css())?,
        WidthStrategy::Transform { scale } => {
            write!(css, "display:inline-block; transform:scaleX({}); transform-origin:left; ", scale)?
        }
    }

    if style.text_decoration != TextDecoration::None {
        write!(css, "text-decoration:{}; ", style.text_decoration.as_css())?;
    }
    match style.text_transform {
        TextTransform::None => {}
        TextTransform::Uppercase => write!(css, "text-transform:uppercase; ")?,
        TextTransform::SmallCaps => write!(css, "font-variant:small-caps; ")?,
    }

    // Baseline shift is in points, positive upwards, like CSS vertical-align lengths.
    if style.baseline_shift != 0.0 {
        write!(css, "vertical-align:{}pt; ", style.baseline_shift)?;
    }

    if let Some(stroke) = &style.stroke {
        write!(css, "-webkit-text-stroke:{}pt {}; ", stroke.width, stroke.color)?;
    }

    write!(css, "text-align:{}; ", style.text_align.as_css())?;
    write!(css, "line-height:{}; ", style.line_height)?;

    if style.margin_top != 0.0 {
        write!(css, "margin-top:{}pt; ", style.margin_top)?;
    }
    if style.margin_bottom != 0.0 {
        write!(css, "margin-bottom:{}pt; ", style.margin_bottom)?;
    }
    if style.text_indent != 0.0 {
        write!(css, "text-indent:{}pt; ", style.text_indent)?;
    }
    if style.left_indent != 0.0 {
        write!(css, "padding-left:{}pt; ", style.left_indent)?;
    }
    if style.right_indent != 0.0 {
        write!(css, "padding-right:{}pt; ", style.right_indent)?;
    }

    Ok(css.trim_end().to_string())
}
