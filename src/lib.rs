pub mod cache;
pub mod config;
pub mod converters;
pub mod errors;
pub mod fonts;
pub mod models;

pub use cache::ConversionCache;
pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use converters::cascade::StyleResolver;
pub use converters::document::{convert_document, DocumentConversion};
pub use errors::{IdmlError, Result};
pub use fonts::{check_fonts, FontRegistry};
pub use models::document::{IdmlDocument, Personalization};

// bindings
pub mod wasm;
