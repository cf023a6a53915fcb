#[cfg(test)]
pub mod test {
    use std::collections::HashMap;
    use std::io;
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::Value;
    use tracing::subscriber::DefaultGuard;
    use tracing_subscriber::fmt::MakeWriter;

    use crate::error::SettingsError;
    use crate::host::{FileSystem, Workspace};
    use crate::source::ConfigurationSource;
    use crate::types::{ConfigurationTarget, ScopedValues, WorkspaceFolder};

    /// A configuration source that answers from a fixed table, falling back to
    /// the caller's default, and records every query and update.
    #[derive(Default)]
    pub struct ScriptedSource {
        values: HashMap<String, Value>,
        scopes: HashMap<String, ScopedValues>,
        fail_reads: bool,
        fail_updates: bool,
        queried: Mutex<Vec<String>>,
        attempts: AtomicUsize,
        updates: Mutex<Vec<(String, Value, Option<ConfigurationTarget>)>>,
    }

    impl ScriptedSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, key: &str, value: Value) -> Self {
            self.values.insert(key.to_string(), value);
            self
        }

        pub fn with_scopes(mut self, scoped: ScopedValues) -> Self {
            self.scopes.insert(scoped.key.clone(), scoped);
            self
        }

        pub fn failing_reads(mut self) -> Self {
            self.fail_reads = true;
            self
        }

        pub fn failing_updates(mut self) -> Self {
            self.fail_updates = true;
            self
        }

        pub fn queried_keys(&self) -> Vec<String> {
            self.queried.lock().unwrap().clone()
        }

        /// Successful updates, in call order.
        pub fn recorded_updates(&self) -> Vec<(String, Value, Option<ConfigurationTarget>)> {
            self.updates.lock().unwrap().clone()
        }

        /// Every call to `update`, failed or not.
        pub fn update_attempts(&self) -> usize {
            self.attempts.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ConfigurationSource for ScriptedSource {
        fn get(&self, key: &str, default: &Value) -> Result<Value, SettingsError> {
            self.queried.lock().unwrap().push(key.to_string());
            if self.fail_reads {
                return Err(SettingsError::ReadFailed {
                    key: key.into(),
                    reason: "configuration store unavailable".into(),
                });
            }
            Ok(self.values.get(key).cloned().unwrap_or_else(|| default.clone()))
        }

        fn inspect(&self, key: &str) -> Option<ScopedValues> {
            self.scopes.get(key).cloned()
        }

        async fn update(
            &self,
            key: &str,
            value: Value,
            target: Option<ConfigurationTarget>,
        ) -> Result<(), SettingsError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if self.fail_updates {
                return Err(SettingsError::UpdateFailed {
                    key: key.into(),
                    reason: "settings file is read-only".into(),
                });
            }
            self.updates
                .lock()
                .unwrap()
                .push((key.to_string(), value, target));
            Ok(())
        }
    }

    /// A workspace with fixed folders and a scripted picker answer.
    pub struct ScriptedWorkspace {
        folders: Option<Vec<WorkspaceFolder>>,
        pick: Option<WorkspaceFolder>,
        prompts: AtomicUsize,
    }

    impl ScriptedWorkspace {
        pub fn none() -> Self {
            Self {
                folders: None,
                pick: None,
                prompts: AtomicUsize::new(0),
            }
        }

        pub fn with_folders(folders: Vec<WorkspaceFolder>) -> Self {
            Self {
                folders: Some(folders),
                ..Self::none()
            }
        }

        pub fn picking(mut self, folder: WorkspaceFolder) -> Self {
            self.pick = Some(folder);
            self
        }

        pub fn prompt_count(&self) -> usize {
            self.prompts.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Workspace for ScriptedWorkspace {
        fn folders(&self) -> Option<Vec<WorkspaceFolder>> {
            self.folders.clone()
        }

        async fn pick_folder(&self, _placeholder: &str) -> Option<WorkspaceFolder> {
            self.prompts.fetch_add(1, Ordering::SeqCst);
            // Suspend so concurrent callers interleave here.
            tokio::task::yield_now().await;
            self.pick.clone()
        }
    }

    /// A filesystem whose existence checks always error.
    pub struct BrokenFileSystem;

    #[async_trait]
    impl FileSystem for BrokenFileSystem {
        async fn is_dir(&self, _path: &Path) -> io::Result<bool> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "access denied"))
        }
    }

    /// Formatted `tracing` output collected in memory.
    #[derive(Clone, Default)]
    pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        /// Capture events at debug level and above on this thread until the
        /// guard drops.
        pub fn install() -> (Self, DefaultGuard) {
            let logs = Self::default();
            let subscriber = tracing_subscriber::fmt()
                .with_writer(logs.clone())
                .with_max_level(tracing::Level::DEBUG)
                .with_ansi(false)
                .finish();
            let guard = tracing::subscriber::set_default(subscriber);
            (logs, guard)
        }

        pub fn lines(&self) -> Vec<String> {
            let bytes = self.0.lock().unwrap().clone();
            String::from_utf8_lossy(&bytes)
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }
}
