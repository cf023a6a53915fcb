use std::path::PathBuf;
use thiserror::Error;

use crate::types::ConfigurationTarget;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read setting '{key}': {reason}")]
    ReadFailed { key: String, reason: String },

    #[error("Failed to update setting '{key}': {reason}")]
    UpdateFailed { key: String, reason: String },

    #[error("Unknown setting: {0}")]
    UnknownSetting(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot write {target} settings: no workspace is open")]
    NoWorkspace { target: ConfigurationTarget },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_value_formats_correctly() {
        let err = SettingsError::InvalidValue {
            key: "codeFormatting.preset".into(),
            reason: "unknown variant `Kernighan`".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("codeFormatting.preset"));
        assert!(msg.contains("Kernighan"));
    }

    #[test]
    fn unknown_setting_formats() {
        let err = SettingsError::UnknownSetting("codeFormatting.typo".into());
        assert!(err.to_string().contains("codeFormatting.typo"));
    }

    #[test]
    fn no_workspace_names_target() {
        let err = SettingsError::NoWorkspace {
            target: ConfigurationTarget::WorkspaceFolder,
        };
        assert!(err.to_string().contains("workspace folder"));
    }
}
