//! Importer descriptors and sidecar metadata records.

use serde::{Deserialize, Serialize};

use crate::types::{CollectionGuid, ExportId};
use super::ExportContext;

/// Sidecar metadata format version.
pub const META_FILE_FORMAT_VERSION: u32 = 2;

/// Importer record for natively serialized assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeFormatImporter {
    /// Export id of the artifact's main object.
    pub main_object_file_id: ExportId,
    /// Asset bundle the asset belongs to, when the format has the field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_bundle_name: Option<String>,
    #[serde(skip)]
    has_asset_bundle_name: bool,
}

impl NativeFormatImporter {
    /// Create an importer for the context's target format.
    pub fn create(ctx: &ExportContext) -> Self {
        Self {
            main_object_file_id: ExportId(0),
            asset_bundle_name: None,
            has_asset_bundle_name: ctx.version().supports_asset_bundle_name(),
        }
    }

    /// Whether the target format has an asset bundle name field.
    pub fn has_asset_bundle_name(&self) -> bool {
        self.has_asset_bundle_name
    }

    /// Set the asset bundle name. Returns false if the format lacks the field.
    pub fn set_asset_bundle_name(&mut self, name: impl Into<String>) -> bool {
        if !self.has_asset_bundle_name {
            return false;
        }
        self.asset_bundle_name = Some(name.into());
        true
    }
}

/// Sidecar metadata record written next to every artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Format version.
    pub file_format_version: u32,
    /// GUID of the collection the artifact holds.
    pub guid: CollectionGuid,
    /// Unix timestamp (seconds) of creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_created: Option<i64>,
    /// Importer descriptor.
    pub importer: NativeFormatImporter,
}

impl Meta {
    /// Create a record for `guid`.
    pub fn new(guid: CollectionGuid, importer: NativeFormatImporter) -> Self {
        Self {
            file_format_version: META_FILE_FORMAT_VERSION,
            guid,
            time_created: None,
            importer,
        }
    }

    /// Stamp the creation time with the current UTC time.
    pub fn stamped_now(mut self) -> Self {
        self.time_created = Some(chrono::Utc::now().timestamp());
        self
    }
}
