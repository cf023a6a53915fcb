use crate::source::ConfigurationSource;
use crate::types::ConfigurationTarget;

/// The scope currently supplying the effective value of `key`.
///
/// Checks workspace folder, then workspace, then global. `None` when no scope
/// sets the key or the host does not recognize it.
pub fn effective_configuration_target<S: ConfigurationSource + ?Sized>(
    source: &S,
    key: &str,
) -> Option<ConfigurationTarget> {
    source.inspect(key)?.effective_target()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::ScriptedSource;
    use crate::types::ScopedValues;
    use serde_json::json;

    fn scoped(key: &str) -> ScopedValues {
        ScopedValues {
            key: key.into(),
            ..ScopedValues::default()
        }
    }

    #[test]
    fn folder_beats_global() {
        let source = ScriptedSource::new().with_scopes(ScopedValues {
            global_value: Some(json!("OTBS")),
            workspace_folder_value: Some(json!("Allman")),
            ..scoped("codeFormatting.preset")
        });
        assert_eq!(
            effective_configuration_target(&source, "codeFormatting.preset"),
            Some(ConfigurationTarget::WorkspaceFolder)
        );
    }

    #[test]
    fn workspace_beats_global() {
        let source = ScriptedSource::new().with_scopes(ScopedValues {
            global_value: Some(json!(false)),
            workspace_value: Some(json!(true)),
            ..scoped("startAutomatically")
        });
        assert_eq!(
            effective_configuration_target(&source, "startAutomatically"),
            Some(ConfigurationTarget::Workspace)
        );
    }

    #[test]
    fn global_only() {
        let source = ScriptedSource::new().with_scopes(ScopedValues {
            global_value: Some(json!("/home/user")),
            ..scoped("cwd")
        });
        assert_eq!(
            effective_configuration_target(&source, "cwd"),
            Some(ConfigurationTarget::Global)
        );
    }

    #[test]
    fn unset_everywhere_is_none() {
        let source = ScriptedSource::new().with_scopes(scoped("cwd"));
        assert_eq!(effective_configuration_target(&source, "cwd"), None);
    }

    #[test]
    fn unrecognized_key_is_none() {
        let source = ScriptedSource::new();
        assert_eq!(effective_configuration_target(&source, "nope"), None);
    }
}
