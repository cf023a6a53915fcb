//! Working-directory resolution.
//!
//! The `cwd` setting wins when it names an existing directory. Otherwise the
//! workspace decides: a single folder is used as is, several folders trigger a
//! one-time picker prompt, and everything else falls back to the user's home
//! directory. A picked folder is persisted to `cwd` so later resolutions take
//! the fast path.
//!
//! The prompt-once flag lives on [`Session`], owned by whoever manages the
//! extension's lifetime.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;
use tracing::{debug, warn};

use crate::host::{FileSystem, Workspace};
use crate::source::ConfigurationSource;
use crate::write::change_setting;

const CWD_KEY: &str = "cwd";

const PICK_PLACEHOLDER: &str =
    "Select a folder to use as the PowerShell extension's working directory.";

/// Per-session state of the resolver.
#[derive(Debug)]
pub struct Session {
    prompted: AtomicBool,
    home_dir: PathBuf,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A session that falls back to the current user's home directory.
    pub fn new() -> Self {
        Self::with_home_dir(default_home_dir())
    }

    /// A session that falls back to `home_dir`.
    pub fn with_home_dir(home_dir: impl Into<PathBuf>) -> Self {
        Self {
            prompted: AtomicBool::new(false),
            home_dir: home_dir.into(),
        }
    }

    /// Whether the user has already been asked to pick a folder.
    pub fn has_prompted(&self) -> bool {
        self.prompted.load(Ordering::SeqCst)
    }

    /// Forget the prompt, as if a new session started.
    pub fn reset(&self) {
        self.prompted.store(false, Ordering::SeqCst);
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    /// Resolve the working directory. Never fails; the worst case is the
    /// home directory.
    pub async fn resolve_cwd<S, W, F>(&self, source: &S, workspace: &W, fs: &F) -> PathBuf
    where
        S: ConfigurationSource + ?Sized,
        W: Workspace + ?Sized,
        F: FileSystem + ?Sized,
    {
        if let Some(cwd) = read_cwd_setting(source)
            && directory_exists(fs, &cwd).await
        {
            return cwd;
        }

        let folders = workspace.folders().unwrap_or_default();
        let candidate = match folders.as_slice() {
            [] => None,
            [only] => Some(only.path.clone()),
            _ => self.prompt_for_folder(source, workspace, fs).await,
        };

        match candidate {
            Some(path) if directory_exists(fs, &path).await => path,
            _ => self.home_dir.clone(),
        }
    }

    /// Ask for a folder, at most once per session, persisting an existing pick.
    async fn prompt_for_folder<S, W, F>(&self, source: &S, workspace: &W, fs: &F) -> Option<PathBuf>
    where
        S: ConfigurationSource + ?Sized,
        W: Workspace + ?Sized,
        F: FileSystem + ?Sized,
    {
        // Check and set in one step, before the picker suspends.
        if self.prompted.swap(true, Ordering::SeqCst) {
            debug!("multiple workspace folders and the user was already prompted");
            return None;
        }

        let picked = workspace.pick_folder(PICK_PLACEHOLDER).await?.path;
        if directory_exists(fs, &picked).await {
            let value = Value::String(picked.to_string_lossy().into_owned());
            change_setting(source, CWD_KEY, value, None).await;
        }
        Some(picked)
    }
}

/// The `cwd` setting as a path; unset, empty, non-string, and unreadable
/// values all count as absent.
fn read_cwd_setting<S: ConfigurationSource + ?Sized>(source: &S) -> Option<PathBuf> {
    match source.get(CWD_KEY, &Value::Null) {
        Ok(Value::String(s)) if !s.is_empty() => Some(PathBuf::from(s)),
        Ok(_) => None,
        Err(e) => {
            warn!(error = %e, "could not read the cwd setting");
            None
        }
    }
}

async fn directory_exists<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> bool {
    match fs.is_dir(path).await {
        Ok(exists) => exists,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "existence check failed");
            false
        }
    }
}

fn default_home_dir() -> PathBuf {
    match directories::UserDirs::new() {
        Some(dirs) => dirs.home_dir().to_path_buf(),
        None => PathBuf::from(std::path::MAIN_SEPARATOR_STR),
    }
}
