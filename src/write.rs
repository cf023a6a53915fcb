//! Settings writer: apply one setting change, logging instead of failing.

use serde_json::Value;
use tracing::{debug, error};

use crate::source::ConfigurationSource;
use crate::types::ConfigurationTarget;

/// Write `value` at `key` in `target` (the host's default scope when `None`).
///
/// Failures are logged at error level and otherwise swallowed: callers
/// cannot tell a failed write from a successful one.
pub async fn change_setting<S: ConfigurationSource + ?Sized>(
    source: &S,
    key: &str,
    value: Value,
    target: Option<ConfigurationTarget>,
) {
    match target {
        Some(target) => debug!(key, %value, scope = %target, "changing setting"),
        None => debug!(key, %value, "changing setting in default scope"),
    }

    if let Err(e) = source.update(key, value, target).await {
        error!(key, error = %e, "failed to change setting");
    }
}
