//! Export collections.
//!
//! An export collection is the set of persisted objects written into one
//! output artifact, together with the export id each of them gets inside that
//! artifact and the GUID other artifacts use to point into it.

pub mod asset;

use std::path::{Path, PathBuf};

use crate::export::ExportContext;
use crate::types::{AssetInfo, CollectionGuid, ContainerId, ExportId, MetaPtr, PersistedObject};

/// Error type for collection construction and queries.
#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    /// A scene-attached behaviour was used as a standalone primary object.
    #[error("{0} is attached to a scene and must be exported with its scene, not as its own asset")]
    InvalidPrimaryObject(AssetInfo),
    /// The primary object does not belong to the container it was built against.
    #[error("{asset} does not belong to {container}")]
    ContainerMismatch {
        /// Primary object.
        asset: AssetInfo,
        /// Container passed to the builder.
        container: ContainerId,
    },
    /// Query on an object outside the collection.
    #[error("{0} is not a member of this collection")]
    NotAMember(AssetInfo),
    /// The exporter failed to serialize the primary object.
    #[error("Exporter failed to serialize {asset} to {}", .path.display())]
    SerializationFailed {
        /// Primary object.
        asset: AssetInfo,
        /// Target file.
        path: PathBuf,
    },
    /// Filesystem error while writing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Files produced by a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtifact {
    /// Artifact holding the serialized primary object.
    pub file_path: PathBuf,
    /// Sidecar metadata file.
    pub meta_path: PathBuf,
}

/// Read interface of a finished export collection.
///
/// Collections are immutable once built; every method here is a query except
/// [`write`](Self::write), which only touches the filesystem.
pub trait ExportCollection<'a> {
    /// GUID of the collection.
    fn guid(&self) -> CollectionGuid;

    /// Display name (the primary object's best name).
    fn name(&self) -> String;

    /// Members in discovery order, the primary object first.
    fn assets(&self) -> &[&'a PersistedObject];

    /// Whether `asset` is a member, by identity key.
    fn contains(&self, asset: &PersistedObject) -> bool;

    /// Export id of a member.
    fn export_id(&self, asset: &PersistedObject) -> Result<ExportId, CollectionError>;

    /// Reference to a member. `is_local` must be true only when the
    /// referencing artifact is this collection's own artifact.
    fn create_export_pointer(&self, asset: &PersistedObject, is_local: bool) -> Result<MetaPtr, CollectionError>;

    /// Write the artifact and its sidecar under `project_dir`.
    fn write(&self, ctx: &ExportContext, project_dir: &Path) -> Result<WrittenArtifact, CollectionError>;
}

pub use asset::AssetExportCollection;
