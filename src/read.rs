//! Settings reader: overlay host values onto compiled defaults.
//!
//! Steps:
//!
//! 1. Build the default [`Settings`] and serialize it to a JSON object
//! 2. Walk [`SETTINGS`]; for every leaf, ask the source for its dotted path,
//!    passing the current default as the fallback
//! 3. Deserialize the overlaid tree back into [`Settings`]
//!
//! Map leaves are queried as one value, exactly like primitives. Sections are
//! recursed into, never queried.

use serde_json::{Map, Value};

use crate::error::SettingsError;
use crate::schema::{FieldKind, SETTINGS, Section, Settings, dotted};
use crate::source::ConfigurationSource;

/// Read the effective settings from `source`.
///
/// Every leaf the source does not set keeps its compiled default.
///
/// # Errors
///
/// Propagates the first error the source returns, and reports
/// [`SettingsError::InvalidValue`] when a host value does not fit its field.
pub fn read_settings<S: ConfigurationSource + ?Sized>(
    source: &S,
) -> Result<Settings, SettingsError> {
    let defaults = Settings::defaults();
    let mut tree = match serde_json::to_value(&defaults) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            return Err(SettingsError::InvalidValue {
                key: "<defaults>".into(),
                reason: "settings did not serialize to an object".into(),
            });
        }
        Err(e) => {
            return Err(SettingsError::InvalidValue {
                key: "<defaults>".into(),
                reason: e.to_string(),
            });
        }
    };

    overlay_section(&SETTINGS, "", &mut tree, source)?;

    serde_json::from_value(Value::Object(tree)).map_err(|e| SettingsError::InvalidValue {
        key: "<merged>".into(),
        reason: e.to_string(),
    })
}

fn overlay_section<S: ConfigurationSource + ?Sized>(
    section: &Section,
    prefix: &str,
    tree: &mut Map<String, Value>,
    source: &S,
) -> Result<(), SettingsError> {
    for field in section.fields {
        let path = dotted(prefix, field.key);
        match &field.kind {
            FieldKind::Leaf | FieldKind::Map => {
                let current = tree.get(field.key).cloned().unwrap_or(Value::Null);
                let value = source.get(&path, &current)?;
                tree.insert(field.key.to_string(), value);
            }
            FieldKind::Nested(inner) => {
                let node = tree
                    .get_mut(field.key)
                    .and_then(Value::as_object_mut)
                    .ok_or_else(|| SettingsError::InvalidValue {
                        key: path.clone(),
                        reason: "expected a settings section".into(),
                    })?;
                overlay_section(inner, &path, node, source)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::ScriptedSource;
    use crate::schema::{CodeFormattingPreset, LogLevel};
    use serde_json::json;

    #[test]
    fn echoing_source_yields_defaults() {
        let source = ScriptedSource::new();
        let settings = read_settings(&source).unwrap();
        assert_eq!(settings, Settings::defaults());
    }

    #[test]
    fn single_override_changes_only_that_leaf() {
        let source = ScriptedSource::new().with("codeFormatting.preset", json!("Allman"));
        let settings = read_settings(&source).unwrap();

        let mut expected = Settings::defaults();
        expected.code_formatting.preset = CodeFormattingPreset::Allman;
        assert_eq!(settings, expected);
    }

    #[test]
    fn queries_every_leaf_path_once() {
        let source = ScriptedSource::new();
        read_settings(&source).unwrap();
        assert_eq!(source.queried_keys(), SETTINGS.leaf_paths());
    }

    #[test]
    fn never_queries_sections() {
        let source = ScriptedSource::new();
        read_settings(&source).unwrap();
        let queried = source.queried_keys();
        assert!(!queried.contains(&"codeFormatting".to_string()));
        assert!(!queried.contains(&"developer".to_string()));
    }

    #[test]
    fn map_leaf_is_replaced_wholesale() {
        let source = ScriptedSource::new().with(
            "powerShellAdditionalExePaths",
            json!({
                "Preview": "/opt/microsoft/powershell/7-preview/pwsh",
                "Daily": "/opt/pwsh-daily/pwsh"
            }),
        );
        let settings = read_settings(&source).unwrap();

        assert_eq!(settings.power_shell_additional_exe_paths.len(), 2);
        assert_eq!(
            settings.power_shell_additional_exe_paths["Daily"],
            "/opt/pwsh-daily/pwsh"
        );

        let queried = source.queried_keys();
        assert_eq!(
            queried
                .iter()
                .filter(|k| k.starts_with("powerShellAdditionalExePaths"))
                .count(),
            1
        );
    }

    #[test]
    fn nested_and_top_level_overrides_combine() {
        let source = ScriptedSource::new()
            .with("developer.editorServicesLogLevel", json!("Diagnostic"))
            .with("developer.featureFlags", json!(["PSReadLine"]))
            .with("cwd", json!("/repo"))
            .with("sideBar.CommandExplorerVisibility", json!(true));
        let settings = read_settings(&source).unwrap();

        assert_eq!(settings.developer.editor_services_log_level, LogLevel::Diagnostic);
        assert_eq!(settings.developer.feature_flags, vec!["PSReadLine".to_string()]);
        assert_eq!(settings.cwd, "/repo");
        assert!(settings.side_bar.command_explorer_visibility);
        assert!(settings.developer.set_execution_policy); // default preserved
    }

    #[test]
    fn read_errors_propagate() {
        let source = ScriptedSource::new().failing_reads();
        let result = read_settings(&source);
        assert!(matches!(result, Err(SettingsError::ReadFailed { .. })));
    }

    #[test]
    fn wrongly_typed_value_is_invalid() {
        let source = ScriptedSource::new().with("codeFormatting.preset", json!("Kernighan"));
        let result = read_settings(&source);
        assert!(matches!(result, Err(SettingsError::InvalidValue { .. })));
    }
}
