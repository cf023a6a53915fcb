//! Display operations over a resolved [`Settings`]: key lookup and listing.

use std::fmt;

use serde_json::{Map, Value};

use crate::error::SettingsError;
use crate::merge::get_path;
use crate::schema::{SETTINGS, Settings};

/// Result of a display operation. Returned to the caller for rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingResult {
    /// A key's resolved value and its description.
    KeyValue {
        key: String,
        value: String,
        doc: String,
    },
    /// Every leaf setting with its resolved value, in declaration order.
    Listing { entries: Vec<(String, String)> },
}

impl fmt::Display for SettingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingResult::KeyValue { key, value, doc } => {
                if !doc.is_empty() {
                    writeln!(f, "// {doc}")?;
                }
                write!(f, "{key} = {value}")
            }
            SettingResult::Listing { entries } => {
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                Ok(())
            }
        }
    }
}

/// Get a setting by dotted key, including its description.
///
/// Section keys (e.g. `"codeFormatting"`) render the whole group as JSON.
pub fn get_value(settings: &Settings, key: &str) -> Result<SettingResult, SettingsError> {
    let field = SETTINGS
        .lookup(key)
        .ok_or_else(|| SettingsError::KeyNotFound(key.into()))?;
    let tree = to_object(settings)?;
    let value = get_path(&tree, key).ok_or_else(|| SettingsError::KeyNotFound(key.into()))?;

    Ok(SettingResult::KeyValue {
        key: key.into(),
        value: format_value(value),
        doc: field.doc.to_string(),
    })
}

/// List every leaf setting as flattened dotted key-value pairs.
pub fn list_values(settings: &Settings) -> Result<SettingResult, SettingsError> {
    let tree = to_object(settings)?;
    let entries = SETTINGS
        .leaf_paths()
        .into_iter()
        .map(|key| {
            let display = get_path(&tree, &key)
                .map(format_value)
                .unwrap_or_else(|| "<not set>".to_string());
            (key, display)
        })
        .collect();

    Ok(SettingResult::Listing { entries })
}

fn to_object(settings: &Settings) -> Result<Map<String, Value>, SettingsError> {
    match serde_json::to_value(settings) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(SettingsError::InvalidValue {
            key: "<list>".into(),
            reason: "settings did not serialize to an object".into(),
        }),
        Err(e) => Err(SettingsError::InvalidValue {
            key: "<list>".into(),
            reason: e.to_string(),
        }),
    }
}

/// Strings render bare; everything else renders as compact JSON.
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
