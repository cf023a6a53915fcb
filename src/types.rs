use std::fmt;
use std::path::PathBuf;

use serde_json::Value;

/// A layer of the host configuration that can hold a setting value.
///
/// Narrower scopes override broader ones: `WorkspaceFolder` beats `Workspace`,
/// which beats `Global`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigurationTarget {
    /// User-level settings, shared by every workspace.
    Global,
    /// Settings of the open workspace.
    Workspace,
    /// Settings of a single folder in a multi-root workspace.
    WorkspaceFolder,
}

/// Host shorthand: `true` writes to user settings, `false` to the workspace.
impl From<bool> for ConfigurationTarget {
    fn from(global: bool) -> Self {
        if global {
            ConfigurationTarget::Global
        } else {
            ConfigurationTarget::Workspace
        }
    }
}

impl fmt::Display for ConfigurationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationTarget::Global => write!(f, "global"),
            ConfigurationTarget::Workspace => write!(f, "workspace"),
            ConfigurationTarget::WorkspaceFolder => write!(f, "workspace folder"),
        }
    }
}

/// Per-scope values of one setting, as reported by the host's `inspect`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopedValues {
    pub key: String,
    pub global_value: Option<Value>,
    pub workspace_value: Option<Value>,
    pub workspace_folder_value: Option<Value>,
}

impl ScopedValues {
    /// The narrowest scope that holds a value, if any.
    pub fn effective_target(&self) -> Option<ConfigurationTarget> {
        if self.workspace_folder_value.is_some() {
            Some(ConfigurationTarget::WorkspaceFolder)
        } else if self.workspace_value.is_some() {
            Some(ConfigurationTarget::Workspace)
        } else if self.global_value.is_some() {
            Some(ConfigurationTarget::Global)
        } else {
            None
        }
    }
}

/// A folder of the open workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceFolder {
    pub name: String,
    pub path: PathBuf,
}

impl WorkspaceFolder {
    pub fn new(name: &str, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            path: path.into(),
        }
    }
}
