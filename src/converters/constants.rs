//! Defines constants used throughout the style conversion.
//!
//! The calibration values are empirical fits against a reference print-to-digital export of the
//! same documents. They are not derivable from color science; changing any of them shifts the
//! color of every rendered page. The regression fixtures in `color.rs` pin them.

// --- CMYK calibration (fitted against reference export, fixtures CMYK(65,100,0,13) and CMYK(55,100,0,13)) ---

/// Base multiplier on the red channel.
pub const CMYK_RED_BASE: f64 = 0.468;
/// Per-percent-of-cyan increase of the red multiplier (cyan absorption non-linearity).
pub const CMYK_RED_CYAN_SLOPE: f64 = 0.0148;
/// Magenta coverage (percent) at or above which residual green shows through.
pub const CMYK_GREEN_MAGENTA_THRESHOLD: f64 = 95.0;
/// Constant part of the residual green at full magenta.
pub const CMYK_GREEN_OFFSET_BASE: f64 = 9.5;
/// Per-percent-of-cyan increase of the residual green.
pub const CMYK_GREEN_CYAN_SLOPE: f64 = 0.3;
/// Fixed multiplier on the blue channel.
pub const CMYK_BLUE_FACTOR: f64 = 0.532;

// --- Tracking and horizontal scale ---

/// Tracking values above this are percentages; at or below, thousandths of an em.
pub const TRACKING_PERCENT_THRESHOLD: f64 = 100.0;
/// Horizontal scales above this use a transform instead of a stretch keyword.
pub const SCALE_TRANSFORM_ABOVE: f64 = 150.0;
/// Horizontal scales below this use a transform instead of a stretch keyword.
pub const SCALE_TRANSFORM_BELOW: f64 = 50.0;

// --- Text fitting ---

/// Estimated advance of one character, as a multiple of the font size. Deliberately pessimistic
/// for the decorative, wide, often upper-cased book fonts so the estimate never under-runs.
pub const FIT_CHAR_WIDTH_FACTOR: f64 = 1.8;
/// Font-size decrement per search step, in points.
pub const FIT_STEP_PT: f64 = 0.5;
/// Share of the container height reserved as estimation slack.
pub const FIT_SAFETY_MARGIN: f64 = 0.05;
/// Smallest font size the fitting engine returns, in points.
pub const FIT_MIN_FONT_SIZE_PT: f64 = 8.0;

// --- Defaults used when no cascade layer specifies a value ---

pub const DEFAULT_FONT_SIZE_PT: f64 = 12.0;
pub const DEFAULT_FONT_FAMILY: &str = "Minion Pro";
pub const DEFAULT_TEXT_COLOR: &str = "#000000";
pub const DEFAULT_LINE_HEIGHT: f64 = 1.2;
pub const DEFAULT_FONT_WEIGHT: u16 = 400;
/// Color emitted for the `Swatch/None` reference.
pub const TRANSPARENT: &str = "transparent";
