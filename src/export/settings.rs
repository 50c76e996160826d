//! Export settings.

use serde::{Deserialize, Serialize};

/// Environment variable overriding [`ExportSettings::assets_dir`].
pub const ENV_ASSETS_DIR: &str = "ASSET_EXPORT_ASSETS_DIR";
/// Environment variable overriding [`ExportSettings::meta_extension`].
pub const ENV_META_EXTENSION: &str = "ASSET_EXPORT_META_EXTENSION";
/// Environment variable overriding [`ExportSettings::write_time_created`].
pub const ENV_TIME_CREATED: &str = "ASSET_EXPORT_TIME_CREATED";

/// Settings controlling the on-disk project layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Top-level directory for assets without a directory hint.
    pub assets_dir: String,
    /// Extension appended to artifact paths for sidecar metadata.
    pub meta_extension: String,
    /// Whether sidecar metadata records a creation timestamp.
    pub write_time_created: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            assets_dir: "Assets".to_string(),
            meta_extension: "meta".to_string(),
            write_time_created: true,
        }
    }
}

impl ExportSettings {
    /// Load settings from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(dir) = lookup(ENV_ASSETS_DIR) {
            if dir.trim().is_empty() {
                tracing::warn!(var = ENV_ASSETS_DIR, "Empty assets directory, using default");
            } else {
                settings.assets_dir = dir;
            }
        }

        if let Some(ext) = lookup(ENV_META_EXTENSION) {
            let ext = ext.trim_start_matches('.');
            if ext.is_empty() {
                tracing::warn!(var = ENV_META_EXTENSION, "Empty meta extension, using default");
            } else {
                settings.meta_extension = ext.to_string();
            }
        }

        if let Some(flag) = lookup(ENV_TIME_CREATED) {
            match flag.to_lowercase().as_str() {
                "1" | "true" | "yes" => settings.write_time_created = true,
                "0" | "false" | "no" => settings.write_time_created = false,
                other => tracing::warn!(
                    var = ENV_TIME_CREATED,
                    value = other,
                    "Unrecognized boolean, using default"
                ),
            }
        }

        settings
    }
}
