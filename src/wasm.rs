use wasm_bindgen::prelude::*;

use crate::convert::ConvertEngine;
use crate::formats::{self, Format};
use crate::types::{ConvertOptions, RawDocument};

fn parse_format(name: &str) -> Result<Format, JsValue> {
    Format::parse(name).map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Converts one document between formats.
#[wasm_bindgen]
pub fn convert(contents: &str, from: &str, to: &str, renew_ids: bool) -> Result<String, JsValue> {
    let from = parse_format(from)?;
    let to = parse_format(to)?;
    let inputs = [RawDocument {
        name: "input".to_string(),
        format: from,
        contents: contents.to_string(),
    }];
    ConvertEngine::convert(&inputs, to, &ConvertOptions { renew_ids })
        .map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Returns the format capability table as a JS array of
/// `{ name, extension, reads, writes }` objects.
#[wasm_bindgen]
pub fn list_formats() -> JsValue {
    serde_wasm_bindgen::to_value(&formats::capabilities()).unwrap_or(JsValue::NULL)
}
