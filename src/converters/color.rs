//! Color calibration: converts print swatches into hex strings matching the reference export.

use indexmap::IndexMap;
use log::{debug, warn};

use super::constants::*;
use crate::errors::{IdmlError, Result};
use crate::models::colors::{ColorSpace, ColorSwatch, NONE_SWATCH};

/// Rounds a channel, clamps it to 0..=255 and formats it as two lowercase hex digits.
fn channel_hex(value: f64) -> String {
    let byte = value.round().clamp(0.0, 255.0) as u8;
    format!("{:02x}", byte)
}

/// Converts RGB channels (0..=255) into `#rrggbb`.
pub fn rgb_to_hex(r: f64, g: f64, b: f64) -> String {
    format!("#{}{}{}", channel_hex(r), channel_hex(g), channel_hex(b))
}

/// Converts CMYK inks (percent, 0..=100) into `#rrggbb` using the calibrated formula.
///
/// Zero ink is paper white and bypasses the formula: the compensation factors only hold where
/// ink is present.
pub fn cmyk_to_hex(c: f64, m: f64, y: f64, k: f64) -> String {
    if c == 0.0 && m == 0.0 && y == 0.0 && k == 0.0 {
        return "#ffffff".to_string();
    }

    let (cn, mn, yn, kn) = (c / 100.0, m / 100.0, y / 100.0, k / 100.0);

    let red_factor = CMYK_RED_BASE + CMYK_RED_CYAN_SLOPE * c;
    let red = 255.0 * (1.0 - cn) * (1.0 - kn) * red_factor;

    let green_offset = if m >= CMYK_GREEN_MAGENTA_THRESHOLD {
        CMYK_GREEN_OFFSET_BASE + CMYK_GREEN_CYAN_SLOPE * c
    } else {
        0.0
    };
    let green = 255.0 * (1.0 - mn) * (1.0 - kn) + green_offset;

    let blue = 255.0 * (1.0 - yn) * (1.0 - kn) * CMYK_BLUE_FACTOR;

    rgb_to_hex(red, green, blue)
}

/// Converts raw components in the given space to hex.
///
/// Returns `IdmlError::Parse` if the component count does not match the space.
pub fn to_hex(space: ColorSpace, components: &[f64]) -> Result<String> {
    match (space, components) {
        (ColorSpace::Rgb, [r, g, b]) => Ok(rgb_to_hex(*r, *g, *b)),
        (ColorSpace::Cmyk, [c, m, y, k]) => Ok(cmyk_to_hex(*c, *m, *y, *k)),
        _ => Err(IdmlError::Parse(format!(
            "{:?} color needs {} components, got {}",
            space,
            space.component_count(),
            components.len()
        ))),
    }
}

/// Converts a swatch to hex.
pub fn swatch_to_hex(swatch: &ColorSwatch) -> Result<String> {
    to_hex(swatch.space, &swatch.components)
}

/// Resolves a swatch reference from a style into a web color.
///
/// `Swatch/None` becomes `transparent`. A reference missing from the swatch table falls back to
/// `default_color` with a warning; the layout application renders such text in its default too.
pub fn resolve_color_reference(
    reference: &str,
    swatches: &IndexMap<String, ColorSwatch>,
    default_color: &str,
) -> Result<String> {
    if reference == NONE_SWATCH {
        return Ok(TRANSPARENT.to_string());
    }
    match swatches.get(reference) {
        Some(swatch) => {
            let hex = swatch_to_hex(swatch)?;
            debug!("[resolve_color_reference] {} -> {}", reference, hex);
            Ok(hex)
        }
        None => {
            warn!(
                "Swatch {} not found in document. Falling back to {}.",
                reference, default_color
            );
            Ok(default_color.to_string())
        }
    }
}
