//! Core types for the export collection kernel.

pub mod object;
pub mod structure;
pub mod pointer;

pub use object::{
    AssetInfo, BehaviourData, ClassId, ContainerId, ExportId, ObjectKind, PathId, PersistedObject,
};
pub use structure::{
    DeferredStructure, FieldValue, SerializedField, SerializedStructure, StructureSlot,
};
pub use pointer::{AssetType, CollectionGuid, MetaPtr};
