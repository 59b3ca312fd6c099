//! JavaScript bindings for the browser-side preview.
//!
//! Structured values cross the boundary as JSON strings; errors surface as JS exceptions.

use wasm_bindgen::prelude::*;

use crate::config::ConversionConfig;
use crate::converters::{color, document, fitting, typography, variables};
use crate::errors::Result;
use crate::models::document::{IdmlDocument, Personalization};

fn to_js_error(e: crate::errors::IdmlError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Blank input means "use the defaults".
fn parse_or_default<T>(json: &str) -> Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    if json.trim().is_empty() {
        return Ok(T::default());
    }
    Ok(serde_json::from_str(json)?)
}

fn convert(document: &str, personalization: &str, config: &str) -> Result<String> {
    let document: IdmlDocument = serde_json::from_str(document)?;
    let personalization: Personalization = parse_or_default(personalization)?;
    let config = if config.trim().is_empty() {
        ConversionConfig::default()
    } else {
        ConversionConfig::from_json(config)?
    };
    let conversion = document::convert_document(&document, &personalization, &config);
    Ok(serde_json::to_string(&conversion)?)
}

/// Converts a JSON document with a JSON personalization and configuration, returning the
/// conversion as JSON. Blank personalization or configuration strings use defaults.
#[wasm_bindgen(js_name = convertDocument)]
pub fn convert_document_json(
    document: &str,
    personalization: &str,
    config: &str,
) -> std::result::Result<String, JsValue> {
    convert(document, personalization, config).map_err(to_js_error)
}

#[wasm_bindgen(js_name = cmykToHex)]
pub fn cmyk_to_hex(c: f64, m: f64, y: f64, k: f64) -> String {
    color::cmyk_to_hex(c, m, y, k)
}

#[wasm_bindgen(js_name = rgbToHex)]
pub fn rgb_to_hex(r: f64, g: f64, b: f64) -> String {
    color::rgb_to_hex(r, g, b)
}

#[wasm_bindgen(js_name = trackingToEm)]
pub fn tracking_to_em(tracking: f64) -> f64 {
    typography::tracking_to_em(tracking)
}

/// Fits `text` with the default floor; see `fitting::fit_font_size`.
#[wasm_bindgen(js_name = fitFontSize)]
pub fn fit_font_size(text: &str, font_size: f64, line_height: f64, width: f64, height: f64) -> f64 {
    let options = fitting::FitOptions::new(font_size, line_height, width, height);
    fitting::fit_font_size(text, &options)
}

/// Takes a JSON array of variable names and returns the wizard configuration as JSON.
#[wasm_bindgen(js_name = mapVariables)]
pub fn map_variables_json(names: &str) -> std::result::Result<String, JsValue> {
    let run = || -> Result<String> {
        let names: Vec<String> = serde_json::from_str(names)?;
        let heroes = variables::map_variables(names.iter().map(String::as_str));
        Ok(serde_json::to_string(&heroes)?)
    };
    run().map_err(to_js_error)
}

/// Routes `log` output to the browser console and installs the panic hook.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(target_arch = "wasm32")]
    {
        if console_log::init_with_level(log::Level::Info).is_err() {
            log::debug!("Logger already initialized");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn converts_with_blank_options() {
        let document = r#"{
            "styles": { "paragraphStyles": { "ParagraphStyle/Body": { "fontSize": 14 } } },
            "frames": [
                { "id": "a", "content": "Hello",
                  "paragraphRange": { "appliedParagraphStyle": "ParagraphStyle/Body" } }
            ]
        }"#;
        let output: Value = serde_json::from_str(&convert(document, "", "").unwrap()).unwrap();
        assert_eq!(output["frames"][0]["frameId"], "a");
        assert_eq!(output["frames"][0]["fontSize"], 14.0);
        assert_eq!(output["failures"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn invalid_config_is_an_error() {
        let result = convert(r#"{"frames": []}"#, "", r#"{"minFontSize": 0}"#);
        assert!(matches!(
            result,
            Err(crate::errors::IdmlError::InvalidConfig(_))
        ));
    }

    #[test]
    fn scalar_helpers_delegate() {
        assert_eq!(cmyk_to_hex(65.0, 100.0, 0.0, 13.0), "#6f1d76");
        assert_eq!(rgb_to_hex(255.0, 0.0, 0.0), "#ff0000");
        assert_eq!(tracking_to_em(141.0), 1.41);
        assert_eq!(fit_font_size("Mia", 20.0, 1.2, 200.0, 100.0), 20.0);
    }
}
