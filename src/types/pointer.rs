//! Cross-artifact references.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::object::ExportId;

/// Globally unique identifier of one export collection.
///
/// Rendered as 32 lowercase hex digits without separators, the form used in
/// sidecar metadata files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CollectionGuid(Uuid);

impl CollectionGuid {
    /// Generate a fresh random GUID.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The all-zero GUID.
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    /// Get the inner UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Whether this is the all-zero GUID.
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl fmt::Display for CollectionGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Kind of artifact a foreign reference resolves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum AssetType {
    /// Serialized asset file.
    Serialized = 2,
    /// Asset described by its meta sidecar (imported binary formats).
    Meta = 3,
}

impl AssetType {
    /// Numeric discriminator written into references.
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// A reference to an exported object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetaPtr {
    /// Valid only inside the artifact that holds the target.
    Local {
        /// Export id of the target.
        file_id: ExportId,
    },
    /// Points into another artifact.
    Foreign {
        /// Export id of the target inside its artifact.
        file_id: ExportId,
        /// GUID of the target's collection.
        guid: CollectionGuid,
        /// Type discriminator of the target's collection.
        asset_type: AssetType,
    },
}

impl MetaPtr {
    /// Create a local reference.
    pub fn local(file_id: ExportId) -> Self {
        Self::Local { file_id }
    }

    /// Create a foreign reference.
    pub fn foreign(file_id: ExportId, guid: CollectionGuid, asset_type: AssetType) -> Self {
        Self::Foreign { file_id, guid, asset_type }
    }

    /// Export id of the target.
    pub fn file_id(&self) -> ExportId {
        match self {
            Self::Local { file_id } | Self::Foreign { file_id, .. } => *file_id,
        }
    }

    /// GUID of the target collection, for foreign references.
    pub fn guid(&self) -> Option<CollectionGuid> {
        match self {
            Self::Local { .. } => None,
            Self::Foreign { guid, .. } => Some(*guid),
        }
    }

    /// Whether this reference is local.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local { .. })
    }
}

impl fmt::Display for MetaPtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local { file_id } => write!(f, "{{fileID: {}}}", file_id),
            Self::Foreign { file_id, guid, asset_type } => write!(
                f,
                "{{fileID: {}, guid: {}, type: {}}}",
                file_id,
                guid,
                asset_type.code()
            ),
        }
    }
}
