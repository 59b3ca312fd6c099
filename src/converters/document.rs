//! Converts a whole decoded document: resolves every frame, assembles its personalized text and
//! fits it into its container. A failing frame is recorded and skipped, never fatal.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::{
    cascade::StyleResolver,
    constants::FIT_CHAR_WIDTH_FACTOR,
    css::to_css,
    fitting::{fit_font_size, FitOptions},
    variables::{extract_variables, map_variables, substitute_variables},
};
use crate::{
    config::ConversionConfig,
    errors::Result,
    models::{
        document::{IdmlDocument, Personalization},
        effective::EffectiveStyle,
        frame::{Position, TextFrame},
        variables::HeroVariables,
    },
};

/// One included conditional segment, ready to render as a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentOutput {
    pub text: String,
    pub style: EffectiveStyle,
}

/// A converted frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameOutput {
    pub frame_id: String,
    pub page_index: usize,
    pub layout_order: usize,
    pub position: Option<Position>,
    /// Final text after condition filtering and variable substitution.
    pub text: String,
    pub style: EffectiveStyle,
    /// Size to render at; the fitted size when the frame was fitted, else the nominal size.
    pub font_size: f64,
    /// Inline CSS for the frame at `font_size`.
    pub css: String,
    pub segments: Vec<SegmentOutput>,
}

/// A frame that could not be converted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameFailure {
    pub frame_id: String,
    pub error: String,
}

/// Result of a document pass: converted frames in reading order plus the failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentConversion {
    pub frames: Vec<FrameOutput>,
    pub failures: Vec<FrameFailure>,
    /// Wizard configuration for every placeholder found in the document.
    pub variables: Vec<HeroVariables>,
}

impl DocumentConversion {
    /// Approximate memory footprint, used as cache weight.
    pub fn weight(&self) -> usize {
        let frames: usize = self
            .frames
            .iter()
            .map(|frame| {
                std::mem::size_of::<FrameOutput>()
                    + frame.text.len()
                    + frame.css.len()
                    + frame.style.font_family.len()
                    + frame
                        .segments
                        .iter()
                        .map(|segment| std::mem::size_of::<SegmentOutput>() + segment.text.len())
                        .sum::<usize>()
            })
            .sum();
        let failures: usize = self
            .failures
            .iter()
            .map(|failure| failure.frame_id.len() + failure.error.len())
            .sum();
        std::mem::size_of::<Self>() + frames + failures
    }
}

/// The frame's text before substitution: active segments, or the raw content if it has none.
fn assemble_text(frame: &TextFrame, personalization: &Personalization) -> String {
    if frame.segments.is_empty() {
        return frame.content.clone();
    }
    frame
        .segments
        .iter()
        .filter(|segment| personalization.includes(segment.condition.as_deref()))
        .map(|segment| segment.text.as_str())
        .collect()
}

/// Converts a single frame.
pub fn convert_frame(
    resolver: &StyleResolver<'_>,
    frame: &TextFrame,
    personalization: &Personalization,
    config: &ConversionConfig,
) -> Result<FrameOutput> {
    let style = resolver.resolve_frame(frame)?;

    let mut segments = Vec::new();
    for segment in frame
        .segments
        .iter()
        .filter(|segment| personalization.includes(segment.condition.as_deref()))
    {
        segments.push(SegmentOutput {
            text: substitute_variables(&segment.text, &personalization.values),
            style: resolver.resolve_segment(frame, segment)?,
        });
    }

    let text = substitute_variables(&assemble_text(frame, personalization), &personalization.values);

    let font_size = match frame.size {
        Some(size) if config.fit_frames => {
            let mut width = size.width - style.left_indent - style.right_indent;
            if size.width > 0.0 && !(width > 0.0) {
                // Indents wider than the frame still leave one character at the floor size.
                width = FIT_CHAR_WIDTH_FACTOR * config.min_font_size;
                warn!(
                    "[convert_frame] {}: indents exceed frame width {}; fitting into {}pt",
                    frame.id, size.width, width
                );
            }
            let options = FitOptions {
                font_size: style.font_size,
                line_height: style.line_height,
                first_line_indent: style.text_indent,
                width,
                height: size.height,
                min_font_size: config.min_font_size,
            };
            let fitted = fit_font_size(&text, &options);
            if fitted < style.font_size {
                debug!(
                    "[convert_frame] {}: fitted {}pt -> {}pt",
                    frame.id, style.font_size, fitted
                );
            }
            fitted
        }
        _ => style.font_size,
    };

    let css = to_css(&style, Some(font_size))?;

    Ok(FrameOutput {
        frame_id: frame.id.clone(),
        page_index: frame.page_index,
        layout_order: frame.layout_order,
        position: frame.position,
        text,
        style,
        font_size,
        css,
        segments,
    })
}

/// Lists every placeholder in the document, across all segments regardless of condition.
fn document_variables(document: &IdmlDocument) -> Vec<HeroVariables> {
    let mut names = Vec::new();
    for frame in &document.frames {
        names.extend(extract_variables(&frame.content));
        for segment in &frame.segments {
            names.extend(extract_variables(&segment.text));
        }
    }
    map_variables(names.iter().map(String::as_str))
}

/// Converts every frame of a document in reading order (page, then layout order).
///
/// Frames that fail are logged and collected in `failures`; the rest still convert.
pub fn convert_document(
    document: &IdmlDocument,
    personalization: &Personalization,
    config: &ConversionConfig,
) -> DocumentConversion {
    let resolver = StyleResolver::new(&document.styles, config);

    let mut ordered: Vec<&TextFrame> = document.frames.iter().collect();
    ordered.sort_by_key(|frame| (frame.page_index, frame.layout_order));

    let mut conversion = DocumentConversion {
        variables: document_variables(document),
        ..Default::default()
    };

    for frame in ordered {
        match convert_frame(&resolver, frame, personalization, config) {
            Ok(output) => conversion.frames.push(output),
            Err(e) => {
                warn!("Skipping frame {}: {}", frame.id, e);
                conversion.failures.push(FrameFailure {
                    frame_id: frame.id.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    info!(
        "Converted {} frames ({} failed)",
        conversion.frames.len(),
        conversion.failures.len()
    );
    conversion
}
