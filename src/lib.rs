//! Typed, scope-aware settings for the PowerShell editor extension.
//!
//! The host editor stores settings as dotted keys under the `powershell`
//! section, layered across user, workspace, and workspace-folder scopes. This
//! crate turns that key-value store into a typed [`Settings`] struct, writes
//! single settings back, reports which scope a value comes from, and resolves
//! the extension's working directory.
//!
//! ```ignore
//! let settings = read_settings(&host_config)?;
//! if settings.code_formatting.preset == CodeFormattingPreset::Allman { ... }
//!
//! change_setting(&host_config, "cwd", json!("/repo"), None).await;
//!
//! let session = Session::new();
//! let cwd = session.resolve_cwd(&host_config, &workspace, &LocalFileSystem).await;
//! ```
//!
//! # Design: struct plus tagged schema
//!
//! [`Settings`] and its nested structs are the typed view. Every field
//! carries a compiled default through confique's `#[config(default = ...)]`,
//! so [`Settings::defaults`] always returns a total object and every call
//! returns a fresh one.
//!
//! [`SETTINGS`] describes the same tree, tagging each field as a
//! [`FieldKind::Leaf`], a [`FieldKind::Map`], or a [`FieldKind::Nested`]
//! group. The reader walks the tags, not the runtime value shapes: the
//! additional-executables map is an object, but it is tagged `Map` and is
//! therefore read and written as a single value. A test keeps the tags and
//! the struct shapes in lockstep.
//!
//! # Host seams
//!
//! The crate owns no host state. Everything it consumes is a trait:
//!
//! - [`ConfigurationSource`]: `get` with a fallback default, per-scope
//!   `inspect`, async `update`.
//! - [`Workspace`]: the open folders and a folder picker.
//! - [`FileSystem`]: an async directory-existence check.
//!   [`LocalFileSystem`] implements it over `tokio::fs`.
//!
//! [`LayeredConfiguration`] is a complete [`ConfigurationSource`]: three
//! in-memory scopes, each optionally backed by a host-style `settings.json`.
//!
//! # Error handling
//!
//! Each operation picks its own failure policy:
//!
//! - **Reading** propagates source errors as [`SettingsError`].
//! - **Writing** ([`change_setting`]) logs failures and swallows them.
//! - **Resolving the working directory** never fails: unreadable settings and
//!   failed existence checks simply fall through to the next candidate, with
//!   the home directory as the last resort.
//!
//! # Logging
//!
//! Diagnostics go through [`tracing`]. The crate installs no subscriber; with
//! none installed, logging is a no-op.
//!
//! # Working directory
//!
//! [`Session::resolve_cwd`] tries, in order: the `cwd` setting if it names an
//! existing directory; the only workspace folder; a folder the user picks when
//! there are several (asked once per [`Session`], and persisted to `cwd`);
//! the home directory.

pub mod error;
pub mod types;

mod cwd;
mod host;
mod layered;
pub(crate) mod merge;
mod ops;
mod read;
mod schema;
mod scope;
mod source;
mod write;

#[cfg(test)]
mod fixtures;

pub use cwd::Session;
pub use error::SettingsError;
pub use host::{FileSystem, LocalFileSystem, Workspace};
pub use layered::LayeredConfiguration;
pub use ops::{SettingResult, get_value, list_values};
pub use read::read_settings;
pub use schema::{
    ButtonSettings, CodeFormattingPreset, CodeFormattingSettings, CommentType, DebuggingSettings,
    DeveloperSettings, Field, FieldKind, IntegratedConsoleSettings, LogLevel, PesterSettings,
    PipelineIndentationStyle, SETTINGS, ScriptAnalysisSettings, Section, Settings,
    SideBarSettings, StartAsLoginShellSettings,
};
pub use scope::effective_configuration_target;
pub use source::ConfigurationSource;
pub use types::{ConfigurationTarget, ScopedValues, WorkspaceFolder};
pub use write::change_setting;
