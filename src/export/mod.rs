//! Export-side collaborators.
//!
//! The collection core never decides byte layout itself. It hands the
//! primary object to an [`AssetExporter`] and writes sidecar metadata through
//! the [`ExportContext`].

pub mod export_id;
pub mod importer;
pub mod paths;
pub mod settings;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::types::{AssetType, ExportId, PersistedObject};

pub use export_id::{main_export_id, MAIN_EXPORT_ID_FACTOR};
pub use importer::{Meta, NativeFormatImporter, META_FILE_FORMAT_VERSION};
pub use paths::{fix_invalid_file_name_characters, fix_invalid_path_characters, unique_file_name};
pub use settings::ExportSettings;

/// Export dispatch for one kind of asset.
pub trait AssetExporter {
    /// Serialize `asset` to `file_path`. Returns false on failure.
    fn export(&self, ctx: &ExportContext, asset: &PersistedObject, file_path: &Path) -> bool;

    /// Export id of a non-behaviour primary object.
    fn main_export_id(&self, asset: &PersistedObject) -> ExportId {
        main_export_id(asset.class_id())
    }

    /// Type discriminator for foreign references into `asset`'s artifact.
    fn export_type(&self, _asset: &PersistedObject) -> AssetType {
        AssetType::Serialized
    }

    /// File extension of the artifact written for `asset`.
    fn file_extension(&self, _asset: &PersistedObject) -> &str {
        "asset"
    }
}

/// Version of the engine format being exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EngineVersion {
    /// Major version.
    pub major: u16,
    /// Minor version.
    pub minor: u16,
    /// Patch version.
    pub patch: u16,
}

impl EngineVersion {
    /// Create a new version.
    pub fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self { major, minor, patch }
    }

    /// Importer records carry an asset bundle name from 5.0 onward.
    pub fn supports_asset_bundle_name(&self) -> bool {
        self.major >= 5
    }
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// State shared by every collection written during one export pass.
#[derive(Debug, Clone)]
pub struct ExportContext {
    version: EngineVersion,
    settings: ExportSettings,
}

impl ExportContext {
    /// Create a new context.
    pub fn new(version: EngineVersion, settings: ExportSettings) -> Self {
        Self { version, settings }
    }

    /// Target engine version.
    pub fn version(&self) -> EngineVersion {
        self.version
    }

    /// Layout settings.
    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Sidecar path for an artifact.
    pub fn meta_path(&self, file_path: &Path) -> PathBuf {
        let mut path = file_path.as_os_str().to_owned();
        path.push(".");
        path.push(&self.settings.meta_extension);
        PathBuf::from(path)
    }

    /// Write the sidecar metadata for `file_path`.
    pub fn export_meta(&self, meta: &Meta, file_path: &Path) -> std::io::Result<PathBuf> {
        let meta = if self.settings.write_time_created && meta.time_created.is_none() {
            meta.clone().stamped_now()
        } else {
            meta.clone()
        };
        let bytes = serde_json::to_vec_pretty(&meta)?;
        let path = self.meta_path(file_path);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }
}
