//! Shrinks a text block's font size until it is guaranteed to fit its container.
//!
//! Measurement is an analytic over-estimate, not real glyph metrics: every character is assumed
//! to be `FIT_CHAR_WIDTH_FACTOR` em wide. Wasted whitespace is acceptable; overflow is not.

use log::debug;
use serde::{Deserialize, Serialize};

use super::constants::*;

/// Inputs of one fitting request besides the text itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitOptions {
    /// Font size the layout asks for, in points. Never exceeded.
    pub font_size: f64,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
    /// Indent of each paragraph's first line, in points.
    #[serde(default)]
    pub first_line_indent: f64,
    /// Container width, in points.
    pub width: f64,
    /// Container height, in points.
    pub height: f64,
    /// Floor of the search, in points.
    #[serde(default = "default_min_font_size")]
    pub min_font_size: f64,
}

fn default_min_font_size() -> f64 {
    FIT_MIN_FONT_SIZE_PT
}

impl FitOptions {
    pub fn new(font_size: f64, line_height: f64, width: f64, height: f64) -> Self {
        Self {
            font_size,
            line_height,
            first_line_indent: 0.0,
            width,
            height,
            min_font_size: FIT_MIN_FONT_SIZE_PT,
        }
    }
}

/// Estimated rendered width of `char_count` characters at `font_size`.
fn estimated_width(char_count: usize, font_size: f64) -> f64 {
    char_count as f64 * font_size * FIT_CHAR_WIDTH_FACTOR
}

/// Number of lines one paragraph occupies when greedily packed.
fn paragraph_line_count(paragraph: &str, font_size: f64, width: f64, first_line_indent: f64) -> usize {
    // Never let a line be narrower than one character, whatever the indent.
    let min_line = estimated_width(1, font_size);
    let full_width = width.max(min_line);
    let first_width = (width - first_line_indent).max(min_line);
    let space = estimated_width(1, font_size);

    let mut lines = 1;
    let mut available = first_width;
    let mut used = 0.0;

    for word in paragraph.split_whitespace() {
        let word_width = estimated_width(word.chars().count(), font_size);

        if used > 0.0 && used + space + word_width <= available {
            used += space + word_width;
            continue;
        }
        if used > 0.0 {
            lines += 1;
            available = full_width;
        }
        if word_width > available {
            // A word wider than the line breaks across as many lines as it needs.
            let remaining = word_width - available;
            let extra = (remaining / full_width).ceil() as usize;
            lines += extra;
            available = full_width;
            used = remaining - (extra - 1) as f64 * full_width;
        } else {
            used = word_width;
        }
    }

    lines
}

/// Estimates how many lines `text` wraps to. Explicit line breaks start new paragraphs; a blank
/// paragraph still takes one line.
pub fn estimate_line_count(text: &str, font_size: f64, width: f64, first_line_indent: f64) -> usize {
    text.split(['\n', '\u{2028}'])
        .map(|paragraph| paragraph.trim_end_matches('\r'))
        .map(|paragraph| paragraph_line_count(paragraph, font_size, width, first_line_indent))
        .sum()
}

/// Line height multiplier used for measuring; non-positive values count as single spacing.
fn effective_line_height(options: &FitOptions) -> f64 {
    if options.line_height > 0.0 {
        options.line_height
    } else {
        1.0
    }
}

/// Estimated height of the block at `font_size`.
fn block_height(text: &str, font_size: f64, options: &FitOptions) -> f64 {
    let lines = estimate_line_count(text, font_size, options.width, options.first_line_indent);
    lines as f64 * font_size * effective_line_height(options)
}

/// Largest size whose block could possibly fit `available_height`.
///
/// Every paragraph takes at least one line, and no line holds more characters than fit in the
/// widest line (or one character, when the line is narrower than that). Nothing above the
/// ceiling can pass the height check, so the search starts at or below it.
fn size_ceiling(text: &str, options: &FitOptions, available_height: f64) -> f64 {
    let line_height = effective_line_height(options);
    let paragraphs = text.split(['\n', '\u{2028}']).count().max(1) as f64;
    let chars = text.chars().filter(|c| !c.is_whitespace()).count().max(1) as f64;
    let widest = options.width.max(options.width - options.first_line_indent);

    let by_paragraphs = available_height / (line_height * paragraphs);
    let by_width =
        (available_height * widest / (line_height * chars * FIT_CHAR_WIDTH_FACTOR)).sqrt();
    let by_char_lines = available_height / (line_height * chars);

    by_paragraphs.min(by_width.max(by_char_lines))
}

/// Returns the largest font size, stepping down from `options.font_size` by `FIT_STEP_PT`, whose
/// estimated block fits the container height minus the safety margin; the floor if none does.
///
/// Every candidate is checked in turn: wrapping is not monotonic in the font size, so the search
/// cannot bisect. Candidates above `size_ceiling` are skipped without measuring, which keeps the
/// search bounded for arbitrarily large requested sizes. Empty text and non-positive containers
/// return the requested size unchanged, as does a requested size already at or below the floor.
pub fn fit_font_size(text: &str, options: &FitOptions) -> f64 {
    let original = options.font_size;
    let floor = options.min_font_size;

    if text.trim().is_empty()
        || !(options.width > 0.0)
        || !(options.height > 0.0)
        || !original.is_finite()
        || !(original > floor)
    {
        return original;
    }

    let available_height = options.height * (1.0 - FIT_SAFETY_MARGIN);
    let ceiling = size_ceiling(text, options, available_height);

    // First candidate on the original's step grid that is not above the ceiling.
    let start = if original > ceiling {
        let skipped = ((original - ceiling) / FIT_STEP_PT).ceil();
        (original - skipped * FIT_STEP_PT).min(ceiling)
    } else {
        original
    };
    if start < original {
        debug!(
            "[fit_font_size] Skipping candidates above {}pt (requested {}pt)",
            start, original
        );
    }

    let mut step: u64 = 0;
    loop {
        let size = start - step as f64 * FIT_STEP_PT;
        if !(size > floor) {
            break;
        }
        let height = block_height(text, size, options);
        if height <= available_height {
            debug!(
                "[fit_font_size] {}pt fits ({:.2} <= {:.2})",
                size, height, available_height
            );
            return size;
        }
        step += 1;
    }

    debug!("[fit_font_size] Nothing above the floor fits; using {}pt", floor);
    floor
}
