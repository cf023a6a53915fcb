//! The host configuration store contract.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SettingsError;
use crate::types::{ConfigurationTarget, ScopedValues};

/// Key-value access to the host's layered configuration.
///
/// Keys are dotted paths relative to [`Settings::SECTION`](crate::Settings::SECTION),
/// e.g. `"codeFormatting.preset"`.
#[async_trait]
pub trait ConfigurationSource: Send + Sync {
    /// The effective value at `key`, or a clone of `default` when no scope sets it.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the store cannot be read.
    fn get(&self, key: &str, default: &Value) -> Result<Value, SettingsError>;

    /// Per-scope values of `key`. `None` when the host does not recognize the key.
    fn inspect(&self, key: &str) -> Option<ScopedValues>;

    /// Write `value` at `key` in `target`, or in the host's default scope when
    /// `target` is `None`. A `null` value removes the key from that scope.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the host rejects the update.
    async fn update(
        &self,
        key: &str,
        value: Value,
        target: Option<ConfigurationTarget>,
    ) -> Result<(), SettingsError>;
}
