//! Conversion settings: cascade defaults, fitting floor and cache limits.

use serde::{Deserialize, Serialize};

use crate::converters::constants::*;
use crate::errors::{IdmlError, Result};

/// Limits of the conversion cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    /// Total weight (approximate bytes of cached output) the cache may hold.
    pub max_weight: usize,
    /// Seconds after insertion an entry stops being served.
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_weight: 16 * 1024 * 1024,
            ttl_seconds: 600,
        }
    }
}

/// Settings for a conversion pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConversionConfig {
    /// Font family used when no cascade layer sets one.
    pub default_font_family: String,
    /// Font size (pt) used when no cascade layer sets one.
    pub default_font_size: f64,
    /// Hex color used when no cascade layer sets one, or a swatch is unknown.
    pub default_color: String,
    /// Line height ratio used when no leading is set.
    pub default_line_height: f64,
    /// Floor of the fitting engine, in points.
    pub min_font_size: f64,
    /// Whether document conversion fits frames that carry a size.
    pub fit_frames: bool,
    pub cache: CacheConfig,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            default_font_family: DEFAULT_FONT_FAMILY.to_string(),
            default_font_size: DEFAULT_FONT_SIZE_PT,
            default_color: DEFAULT_TEXT_COLOR.to_string(),
            default_line_height: DEFAULT_LINE_HEIGHT,
            min_font_size: FIT_MIN_FONT_SIZE_PT,
            fit_frames: true,
            cache: CacheConfig::default(),
        }
    }
}

impl ConversionConfig {
    /// Parses a configuration from JSON; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ConversionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(self.default_font_size > 0.0) {
            return Err(IdmlError::InvalidConfig(format!(
                "defaultFontSize must be positive, got {}",
                self.default_font_size
            )));
        }
        if !(self.min_font_size > 0.0) {
            return Err(IdmlError::InvalidConfig(format!(
                "minFontSize must be positive, got {}",
                self.min_font_size
            )));
        }
        if !(self.default_line_height > 0.0) {
            return Err(IdmlError::InvalidConfig(format!(
                "defaultLineHeight must be positive, got {}",
                self.default_line_height
            )));
        }
        if self.default_font_family.trim().is_empty() {
            return Err(IdmlError::InvalidConfig(
                "defaultFontFamily must not be empty".to_string(),
            ));
        }
        if !self.default_color.starts_with('#') {
            return Err(IdmlError::InvalidConfig(format!(
                "defaultColor must be a hex color, got {}",
                self.default_color
            )));
        }
        Ok(())
    }
}

/// Builder for creating a `ConversionConfig`.
#[derive(Default)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn default_font_family(mut self, family: impl Into<String>) -> Self {
        self.config.default_font_family = family.into();
        self
    }

    pub fn default_font_size(mut self, size: f64) -> Self {
        self.config.default_font_size = size;
        self
    }

    pub fn default_color(mut self, color: impl Into<String>) -> Self {
        self.config.default_color = color.into();
        self
    }

    pub fn default_line_height(mut self, ratio: f64) -> Self {
        self.config.default_line_height = ratio;
        self
    }

    /// Sets the fitting floor.
    pub fn min_font_size(mut self, size: f64) -> Self {
        self.config.min_font_size = size;
        self
    }

    /// Turns frame fitting on or off.
    pub fn fit_frames(mut self, fit: bool) -> Self {
        self.config.fit_frames = fit;
        self
    }

    pub fn cache_max_weight(mut self, weight: usize) -> Self {
        self.config.cache.max_weight = weight;
        self
    }

    pub fn cache_ttl_seconds(mut self, seconds: u64) -> Self {
        self.config.cache.ttl_seconds = seconds;
        self
    }

    /// Builds the `ConversionConfig`.
    /// Returns an error if a value is out of range.
    pub fn build(self) -> Result<ConversionConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let config = ConversionConfig::from_json(r#"{ "minFontSize": 10 }"#).unwrap();
        assert_eq!(config.min_font_size, 10.0);
        assert_eq!(config.default_font_family, DEFAULT_FONT_FAMILY);
        assert!(config.fit_frames);
        assert_eq!(config.cache, CacheConfig::default());
    }

    #[test]
    fn builder_rejects_non_positive_floor() {
        let err = ConversionConfigBuilder::new()
            .min_font_size(0.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, IdmlError::InvalidConfig(_)));
    }

    #[test]
    fn builder_sets_values() {
        let config = ConversionConfigBuilder::new()
            .default_font_family("Gill Sans")
            .default_color("#333333")
            .fit_frames(false)
            .cache_ttl_seconds(5)
            .build()
            .unwrap();
        assert_eq!(config.default_font_family, "Gill Sans");
        assert_eq!(config.default_color, "#333333");
        assert!(!config.fit_frames);
        assert_eq!(config.cache.ttl_seconds, 5);
    }
}
