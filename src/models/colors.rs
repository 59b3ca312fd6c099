use serde::{Deserialize, Serialize};

/// Swatch identifier IDML uses for "no color" (transparent fill or no stroke).
pub const NONE_SWATCH: &str = "Swatch/None";

/// Color model of a swatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColorSpace {
    /// Three channels in 0..=255.
    Rgb,
    /// Four inks in 0..=100 percent.
    Cmyk,
}

impl ColorSpace {
    /// Number of raw components a swatch of this space carries.
    pub fn component_count(self) -> usize {
        match self {
            ColorSpace::Rgb => 3,
            ColorSpace::Cmyk => 4,
        }
    }
}

/// A color swatch as defined in the layout document's graphic resources.
/// Its identifier is the dictionary key. Converted to hex on demand, never stored converted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorSwatch {
    /// The color model of `components`.
    pub space: ColorSpace,

    /// Raw component values in the units of `space`.
    pub components: Vec<f64>,
}

impl ColorSwatch {
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self {
            space: ColorSpace::Rgb,
            components: vec![r, g, b],
        }
    }

    pub fn cmyk(c: f64, m: f64, y: f64, k: f64) -> Self {
        Self {
            space: ColorSpace::Cmyk,
            components: vec![c, m, y, k],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn swatch_deserializes_uppercase_space() {
        let swatch: ColorSwatch =
            serde_json::from_value(json!({ "space": "CMYK", "components": [65, 100, 0, 13] }))
                .unwrap();
        assert_eq!(swatch, ColorSwatch::cmyk(65.0, 100.0, 0.0, 13.0));
        assert_eq!(swatch.space.component_count(), 4);
    }
}
