//! Persisted object model.
//!
//! A [`PersistedObject`] is one object read out of a source container. Its
//! kind is decided once at construction: either an ordinary asset, or a
//! behaviour carrying serialized field data.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::structure::{SerializedStructure, StructureSlot};

/// Handle of the source container an object was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct ContainerId(pub u32);

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "container#{}", self.0)
    }
}

/// Path identifier of an object, unique within its source container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PathId(pub i64);

impl fmt::Display for PathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PathId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Numeric class kind of a persisted object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClassId(pub i32);

impl ClassId {
    /// `Texture2D`.
    pub const TEXTURE_2D: ClassId = ClassId(28);
    /// `Mesh`.
    pub const MESH: ClassId = ClassId(43);
    /// `TextAsset`.
    pub const TEXT_ASSET: ClassId = ClassId(49);
    /// `MonoBehaviour`, the class every behaviour object carries.
    pub const MONO_BEHAVIOUR: ClassId = ClassId(114);
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an object inside one exported artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExportId(pub i64);

impl fmt::Display for ExportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity key of a persisted object: its container plus its path id.
///
/// Membership in an export collection is decided on this key alone, never on
/// the object's contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetInfo {
    /// Source container.
    pub container: ContainerId,
    /// Path id within the container.
    pub path_id: PathId,
}

impl AssetInfo {
    /// Create a new identity key.
    pub fn new(container: ContainerId, path_id: PathId) -> Self {
        Self { container, path_id }
    }
}

impl fmt::Display for AssetInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.container, self.path_id)
    }
}

/// Behaviour-specific state.
#[derive(Debug)]
pub struct BehaviourData {
    /// Independently exportable scriptable asset (not attached to anything).
    pub scriptable_object: bool,
    /// Attached to a scene hierarchy.
    pub scene_attached: bool,
    /// Serialized field data.
    pub structure: StructureSlot,
}

impl BehaviourData {
    /// A scriptable asset living outside any scene.
    pub fn scriptable(structure: StructureSlot) -> Self {
        Self { scriptable_object: true, scene_attached: false, structure }
    }

    /// A plain behaviour: neither scriptable nor scene-attached.
    pub fn plain(structure: StructureSlot) -> Self {
        Self { scriptable_object: false, scene_attached: false, structure }
    }

    /// A behaviour attached to a scene.
    pub fn scene(structure: StructureSlot) -> Self {
        Self { scriptable_object: false, scene_attached: true, structure }
    }

    /// Scriptable and outside any scene.
    pub fn is_standalone_scriptable(&self) -> bool {
        self.scriptable_object && !self.scene_attached
    }

    /// Whether this behaviour may be merged into another asset's collection.
    pub fn is_embeddable(&self) -> bool {
        !self.scriptable_object && !self.scene_attached
    }
}

/// Closed set of object kinds.
#[derive(Debug)]
pub enum ObjectKind {
    /// Any non-behaviour asset.
    Ordinary,
    /// A behaviour with serialized field data.
    Behaviour(BehaviourData),
}

/// An object read out of a source container.
#[derive(Debug)]
pub struct PersistedObject {
    info: AssetInfo,
    class_id: ClassId,
    class_name: String,
    original_name: Option<String>,
    original_directory: Option<String>,
    asset_bundle_name: Option<String>,
    kind: ObjectKind,
}

impl PersistedObject {
    /// Create an ordinary (non-behaviour) object.
    ///
    /// The kind is fixed here. An ordinary object is never treated as a
    /// behaviour, even when `class_id` is [`ClassId::MONO_BEHAVIOUR`]; use
    /// [`PersistedObject::behaviour`] for those.
    pub fn ordinary(path_id: i64, class_id: ClassId, class_name: impl Into<String>) -> Self {
        Self {
            info: AssetInfo::new(ContainerId::default(), PathId(path_id)),
            class_id,
            class_name: class_name.into(),
            original_name: None,
            original_directory: None,
            asset_bundle_name: None,
            kind: ObjectKind::Ordinary,
        }
    }

    /// Create a behaviour object.
    pub fn behaviour(path_id: i64, data: BehaviourData) -> Self {
        Self {
            info: AssetInfo::new(ContainerId::default(), PathId(path_id)),
            class_id: ClassId::MONO_BEHAVIOUR,
            class_name: "MonoBehaviour".to_string(),
            original_name: None,
            original_directory: None,
            asset_bundle_name: None,
            kind: ObjectKind::Behaviour(data),
        }
    }

    /// Set the original asset name.
    pub fn with_original_name(mut self, name: impl Into<String>) -> Self {
        self.original_name = Some(name.into());
        self
    }

    /// Set the original directory hint.
    pub fn with_original_directory(mut self, dir: impl Into<String>) -> Self {
        self.original_directory = Some(dir.into());
        self
    }

    /// Set the asset bundle name.
    pub fn with_asset_bundle_name(mut self, name: impl Into<String>) -> Self {
        self.asset_bundle_name = Some(name.into());
        self
    }

    /// Set the owning container. Called by container backends on insert.
    pub(crate) fn set_container(&mut self, container: ContainerId) {
        self.info.container = container;
    }

    /// Identity key.
    pub fn info(&self) -> AssetInfo {
        self.info
    }

    /// Path id within the source container.
    pub fn path_id(&self) -> PathId {
        self.info.path_id
    }

    /// Class kind.
    pub fn class_id(&self) -> ClassId {
        self.class_id
    }

    /// Class name, used for default output directories.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Original asset name, if known.
    pub fn original_name(&self) -> Option<&str> {
        self.original_name.as_deref()
    }

    /// Original directory hint, if known.
    pub fn original_directory(&self) -> Option<&str> {
        self.original_directory.as_deref()
    }

    /// Asset bundle name, if any.
    pub fn asset_bundle_name(&self) -> Option<&str> {
        self.asset_bundle_name.as_deref()
    }

    /// Best available name for file naming.
    pub fn best_name(&self) -> String {
        match &self.original_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("{}_{}", self.class_name, self.info.path_id),
        }
    }

    /// Whether this object is a behaviour.
    pub fn is_behaviour(&self) -> bool {
        matches!(self.kind, ObjectKind::Behaviour(_))
    }

    /// Behaviour data, if this is a behaviour.
    pub fn as_behaviour(&self) -> Option<&BehaviourData> {
        match &self.kind {
            ObjectKind::Behaviour(data) => Some(data),
            ObjectKind::Ordinary => None,
        }
    }

    /// Behaviour attached to a scene.
    pub fn is_scene_behaviour(&self) -> bool {
        self.as_behaviour().is_some_and(|b| b.scene_attached)
    }

    /// Serialized structure, loading a deferred one on first access.
    ///
    /// Returns `None` for ordinary objects and for behaviours whose
    /// structure is missing or fails to load.
    pub fn structure(&self) -> Option<&SerializedStructure> {
        self.as_behaviour().and_then(|b| b.structure.get())
    }
}
