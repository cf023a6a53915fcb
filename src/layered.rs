//! A three-scope configuration store implementing [`ConfigurationSource`].
//!
//! Each scope (global, workspace, workspace folder) holds a sparse object
//! tree. Reads resolve narrowest scope first; unset keys fall through to the
//! caller's default.
//!
//! # Settings files
//!
//! A scope can be backed by a host-style `settings.json`, where keys are flat
//! and prefixed with the section name:
//!
//! ```json
//! {
//!     "editor.tabSize": 4,
//!     "powershell.codeFormatting.preset": "OTBS"
//! }
//! ```
//!
//! Only `powershell.*` keys are loaded. Keys the schema does not know are kept
//! and logged. Updates to a file-backed scope rewrite the file, leaving keys
//! of other sections untouched. Missing files are an empty scope, not an
//! error.
//!
//! Updates are serialized: the file read, patch, write, and in-memory apply of
//! one update complete before the next begins.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::SettingsError;
use crate::merge::{deep_merge, get_path, remove_path, set_path};
use crate::schema::{SETTINGS, Settings};
use crate::source::ConfigurationSource;
use crate::types::{ConfigurationTarget, ScopedValues};

/// Narrowest scope first.
const PRECEDENCE: [ConfigurationTarget; 3] = [
    ConfigurationTarget::WorkspaceFolder,
    ConfigurationTarget::Workspace,
    ConfigurationTarget::Global,
];

#[derive(Debug, Default)]
struct Layer {
    values: Map<String, Value>,
    file: Option<PathBuf>,
}

#[derive(Debug, Default)]
struct Layers {
    global: Layer,
    workspace: Layer,
    workspace_folder: Layer,
}

impl Layers {
    fn get(&self, target: ConfigurationTarget) -> &Layer {
        match target {
            ConfigurationTarget::Global => &self.global,
            ConfigurationTarget::Workspace => &self.workspace,
            ConfigurationTarget::WorkspaceFolder => &self.workspace_folder,
        }
    }

    fn get_mut(&mut self, target: ConfigurationTarget) -> &mut Layer {
        match target {
            ConfigurationTarget::Global => &mut self.global,
            ConfigurationTarget::Workspace => &mut self.workspace,
            ConfigurationTarget::WorkspaceFolder => &mut self.workspace_folder,
        }
    }
}

/// Layered configuration store, optionally persisted to settings files.
///
/// ```ignore
/// let config = LayeredConfiguration::new()
///     .with_workspace(true)
///     .with_layer_file(ConfigurationTarget::Global, user_settings)?
///     .with_layer_file(ConfigurationTarget::Workspace, ".vscode/settings.json")?;
/// let settings = read_settings(&config)?;
/// ```
#[derive(Debug, Default)]
pub struct LayeredConfiguration {
    workspace_open: bool,
    layers: RwLock<Layers>,
    update_lock: Mutex<()>,
}

impl LayeredConfiguration {
    /// An empty store with no workspace open.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a workspace is open. Without one, only the global scope is
    /// writable and it is the default update target.
    pub fn with_workspace(mut self, open: bool) -> Self {
        self.workspace_open = open;
        self
    }

    /// Seed a value in one scope.
    pub fn with_value(self, target: ConfigurationTarget, key: &str, value: Value) -> Self {
        set_path(&mut self.write_layers().get_mut(target).values, key, value);
        self
    }

    /// Back `target` with a settings file, loading its `powershell.*` keys.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::IoError`] when the file exists but cannot be
    /// read, and [`SettingsError::ParseError`] when it is not valid JSON.
    pub fn with_layer_file(
        self,
        target: ConfigurationTarget,
        path: impl Into<PathBuf>,
    ) -> Result<Self, SettingsError> {
        let path = path.into();
        let loaded = match std::fs::read_to_string(&path) {
            Ok(content) => section_values(&content, &path)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "settings file not found, starting empty");
                Map::new()
            }
            Err(e) => return Err(SettingsError::IoError { path, source: e }),
        };

        {
            let mut layers = self.write_layers();
            let layer = layers.get_mut(target);
            let existing = std::mem::take(&mut layer.values);
            layer.values = deep_merge(existing, loaded);
            layer.file = Some(path);
        }
        Ok(self)
    }

    fn read_layers(&self) -> RwLockReadGuard<'_, Layers> {
        self.layers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_layers(&self) -> RwLockWriteGuard<'_, Layers> {
        self.layers.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn default_target(&self) -> ConfigurationTarget {
        if self.workspace_open {
            ConfigurationTarget::Workspace
        } else {
            ConfigurationTarget::Global
        }
    }
}

#[async_trait]
impl ConfigurationSource for LayeredConfiguration {
    fn get(&self, key: &str, default: &Value) -> Result<Value, SettingsError> {
        let layers = self.read_layers();
        let found = PRECEDENCE
            .iter()
            .find_map(|target| get_path(&layers.get(*target).values, key));
        Ok(found.cloned().unwrap_or_else(|| default.clone()))
    }

    fn inspect(&self, key: &str) -> Option<ScopedValues> {
        if !SETTINGS.contains(key) {
            return None;
        }
        let layers = self.read_layers();
        let value_in =
            |target: ConfigurationTarget| get_path(&layers.get(target).values, key).cloned();
        Some(ScopedValues {
            key: key.to_string(),
            global_value: value_in(ConfigurationTarget::Global),
            workspace_value: value_in(ConfigurationTarget::Workspace),
            workspace_folder_value: value_in(ConfigurationTarget::WorkspaceFolder),
        })
    }

    async fn update(
        &self,
        key: &str,
        value: Value,
        target: Option<ConfigurationTarget>,
    ) -> Result<(), SettingsError> {
        if !SETTINGS.contains(key) {
            return Err(SettingsError::UnknownSetting(key.into()));
        }
        let target = target.unwrap_or_else(|| self.default_target());
        if target != ConfigurationTarget::Global && !self.workspace_open {
            return Err(SettingsError::NoWorkspace { target });
        }

        let _serialized = self.update_lock.lock().await;

        let file = self.read_layers().get(target).file.clone();
        if let Some(path) = file {
            persist_value(&path, key, &value).await?;
        }

        let mut layers = self.write_layers();
        let layer = layers.get_mut(target);
        if value.is_null() {
            remove_path(&mut layer.values, key);
        } else {
            set_path(&mut layer.values, key, value);
        }
        Ok(())
    }
}

fn section_prefix() -> String {
    format!("{}.", Settings::SECTION)
}

/// Pure function: extract this section's values from a settings document.
fn section_values(content: &str, path: &Path) -> Result<Map<String, Value>, SettingsError> {
    let document = parse_document(content, path)?;
    let prefix = section_prefix();

    let mut values = Map::new();
    for (flat_key, value) in document {
        let Some(key) = flat_key.strip_prefix(&prefix) else {
            continue;
        };
        if !SETTINGS.contains(key) {
            warn!(key, path = %path.display(), "unknown setting in settings file");
        }
        let mut entry = Map::new();
        set_path(&mut entry, key, value);
        values = deep_merge(values, entry);
    }
    Ok(values)
}

fn parse_document(content: &str, path: &Path) -> Result<Map<String, Value>, SettingsError> {
    if content.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str(content) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(SettingsError::InvalidValue {
            key: path.display().to_string(),
            reason: "settings file must contain a JSON object".into(),
        }),
        Err(e) => Err(SettingsError::ParseError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Pure function: patch a settings document, setting `"powershell.<key>"`.
///
/// If `content` is `None` (file doesn't exist yet), starts from an empty
/// document. Any earlier spelling of the key is dropped first, flat or nested
/// under a shorter prefix (`"powershell.codeFormatting": { "preset": ... }`),
/// so a `null` value removes the setting entirely.
fn set_in_document(
    content: Option<&str>,
    path: &Path,
    key: &str,
    value: &Value,
) -> Result<String, SettingsError> {
    let mut document = match content {
        Some(c) => parse_document(c, path)?,
        None => Map::new(),
    };

    clear_key(&mut document, key);
    if !value.is_null() {
        document.insert(format!("{}{key}", section_prefix()), value.clone());
    }

    let mut out = serde_json::to_string_pretty(&Value::Object(document)).map_err(|e| {
        SettingsError::InvalidValue {
            key: key.into(),
            reason: e.to_string(),
        }
    })?;
    out.push('\n');
    Ok(out)
}

fn clear_key(document: &mut Map<String, Value>, key: &str) {
    let prefix = section_prefix();
    let mut emptied = Vec::new();
    for (flat_key, entry) in document.iter_mut() {
        let Some(stored) = flat_key.strip_prefix(&prefix) else {
            continue;
        };
        if stored == key {
            emptied.push(flat_key.clone());
        } else if let Some(rest) = key.strip_prefix(stored).and_then(|r| r.strip_prefix('.'))
            && let Value::Object(nested) = entry
        {
            remove_path(nested, rest);
            if nested.is_empty() {
                emptied.push(flat_key.clone());
            }
        }
    }
    for flat_key in emptied {
        document.shift_remove(&flat_key);
    }
}

/// I/O wrapper: reads the file (if it exists), patches it, writes it back.
/// Creates parent directories if needed.
async fn persist_value(path: &Path, key: &str, value: &Value) -> Result<(), SettingsError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(c) => Some(c),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            return Err(SettingsError::IoError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let new_content = set_in_document(content.as_deref(), path, key, value)?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| SettingsError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
    }

    tokio::fs::write(path, new_content)
        .await
        .map_err(|e| SettingsError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;

    debug!(key, path = %path.display(), "setting persisted");
    Ok(())
}
