//! Text encoding of a page's `content` and `settings` columns.
//!
//! Both are stored as serialized JSON. Decoding is lenient: a malformed
//! column yields an empty value and malformed list entries are skipped, so a
//! single bad component never makes a whole page unreadable.

use serde_json::{Map, Value};

use crate::models::LandingPageComponent;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct EncodeError(pub String);

pub fn encode_content(content: &[LandingPageComponent]) -> Result<String, EncodeError> {
    serde_json::to_string(content).map_err(|e| EncodeError(e.to_string()))
}

pub fn encode_settings(settings: &Value) -> Result<String, EncodeError> {
    serde_json::to_string(settings).map_err(|e| EncodeError(e.to_string()))
}

/// Encodes and decodes back strictly. Fails when the text would not be
/// readable again, e.g. when nesting exceeds the parser's depth limit.
pub fn check_round_trip(content: &[LandingPageComponent], settings: &Value) -> Result<(), EncodeError> {
    let text = encode_content(content)?;
    serde_json::from_str::<Vec<LandingPageComponent>>(&text)
        .map_err(|e| EncodeError(format!("content: {e}")))?;
    let text = encode_settings(settings)?;
    serde_json::from_str::<Value>(&text).map_err(|e| EncodeError(format!("settings: {e}")))?;
    Ok(())
}

pub fn decode_content(text: &str) -> Vec<LandingPageComponent> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let items = match serde_json::from_str::<Vec<Value>>(text) {
        Ok(items) => items,
        Err(e) => {
            log::warn!("unreadable page content, treating as empty: {e}");
            return Vec::new();
        }
    };
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<LandingPageComponent>(item) {
            Ok(component) => Some(component),
            Err(e) => {
                log::warn!("skipping malformed component: {e}");
                None
            }
        })
        .collect()
}

pub fn decode_settings(text: &str) -> Value {
    match serde_json::from_str::<Value>(text) {
        Ok(value @ Value::Object(_)) => value,
        _ => Value::Object(Map::new()),
    }
}
