//! # asset-export-collection
//!
//! Closure discovery and export-id assignment for re-serializing a compiled
//! engine object store into an editable, file-based project.
//!
//! The kernel answers one question:
//!
//! > Given a primary asset, which persisted objects belong in its artifact,
//! > and how does the rest of the project refer to them?
//!
//! ## Core Contract
//!
//! 1. Given a primary object, collect the plain behaviours embedded in it
//!    (transitively, through serialized path references)
//! 2. Assign every member an export id stable within the artifact
//! 3. Answer membership and export-id queries, and build local or foreign
//!    references into the artifact
//! 4. Write the artifact through an exporter, plus a sidecar metadata file
//!
//! ## Architecture
//!
//! ```text
//! Primary → AssetExportCollection::new → closure walk → export ids
//!                 ↓                                         ↓
//!           SourceContainer                 contains / export_id / pointers
//!                                                           ↓
//!                                  write → AssetExporter + ExportContext (meta)
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same source container + same primary → identical member order and ids
//! - Member order follows container enumeration order, depth-first
//! - Membership is keyed on (container, path id), never on object contents

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod store;
pub mod export;
pub mod collection;
pub mod canonical;

// Re-exports
pub use types::{
    AssetInfo, AssetType, BehaviourData, ClassId, CollectionGuid, ContainerId, DeferredStructure,
    ExportId, FieldValue, MetaPtr, ObjectKind, PathId, PersistedObject, SerializedField,
    SerializedStructure, StructureSlot,
};
pub use store::{ContainerError, InMemoryContainer, SourceContainer};
pub use export::{
    AssetExporter, EngineVersion, ExportContext, ExportSettings, Meta, NativeFormatImporter,
};
pub use collection::{AssetExportCollection, CollectionError, ExportCollection, WrittenArtifact};
pub use canonical::{canonical_hash, canonical_hash_hex, to_canonical_bytes};
