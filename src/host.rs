//! Host services the working-directory resolver depends on.

use std::io;
use std::path::Path;

use async_trait::async_trait;

use crate::types::WorkspaceFolder;

/// The host's workspace model and folder picker.
#[async_trait]
pub trait Workspace: Send + Sync {
    /// Folders of the open workspace, in order. `None` when no workspace is open.
    fn folders(&self) -> Option<Vec<WorkspaceFolder>>;

    /// Ask the user to pick one of the workspace folders. `None` when dismissed.
    async fn pick_folder(&self, placeholder: &str) -> Option<WorkspaceFolder>;
}

#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Whether `path` names an existing directory.
    async fn is_dir(&self, path: &Path) -> io::Result<bool>;
}

/// [`FileSystem`] backed by the local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn is_dir(&self, path: &Path) -> io::Result<bool> {
        match tokio::fs::metadata(path).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}
