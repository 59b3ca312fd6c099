use thiserror::Error;

/// Represents errors that can occur while turning decoded IDML styling into web styles.
///
/// Every variant is recoverable by the caller. Resolution failures are scoped to the frame or
/// style being processed, so a document pass can log them and keep going.
#[derive(Error, Debug)]
pub enum IdmlError {
    /// Structurally malformed input handed over by the decoder (e.g. a frame without a paragraph range).
    #[error("Malformed input: {0}")]
    Parse(String),

    /// A referenced style identifier is absent from the style dictionary.
    #[error("Style not found: {style_id}")]
    StyleNotFound { style_id: String },

    /// A style's based-on chain revisits itself. `chain` lists the walk up to and including the repeat.
    #[error("Style inheritance cycle: {}", chain.join(" -> "))]
    InheritanceCycle { chain: Vec<String> },

    /// A resolved font family has no matching embedded or available font.
    #[error("Font not available: {family}")]
    MissingFont { family: String },

    /// Raised by the package decoder when the zip container cannot be read.
    #[error("Corrupted IDML package: {0}")]
    CorruptedFile(String),

    /// Raised by the package decoder when an XML part is not well-formed.
    #[error("Invalid XML in IDML package: {0}")]
    InvalidXml(String),

    /// Raised by the structural validator when a required package entry is missing.
    #[error("Missing file in IDML package: {0}")]
    MissingFile(String),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error occurred while (de)serializing JSON input or output.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Formatting error while writing CSS output.
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),
}

impl IdmlError {
    /// Whether the error came from the external decoder/validator and was passed through unchanged.
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            IdmlError::CorruptedFile(_) | IdmlError::InvalidXml(_) | IdmlError::MissingFile(_)
        )
    }
}

/// A type alias for `Result<T, IdmlError>` for convenience within the crate.
pub type Result<T> = std::result::Result<T, IdmlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_lists_the_chain() {
        let err = IdmlError::InheritanceCycle {
            chain: vec![
                "CharacterStyle/A".to_string(),
                "CharacterStyle/B".to_string(),
                "CharacterStyle/A".to_string(),
            ],
        };
        assert_eq!(
            err.to_string(),
            "Style inheritance cycle: CharacterStyle/A -> CharacterStyle/B -> CharacterStyle/A"
        );
    }

    #[test]
    fn decoder_errors_are_external() {
        assert!(IdmlError::InvalidXml("Stories/Story_u1.xml".into()).is_external());
        assert!(IdmlError::MissingFile("designmap.xml".into()).is_external());
        assert!(!IdmlError::StyleNotFound {
            style_id: "CharacterStyle/X".into()
        }
        .is_external());
    }
}
