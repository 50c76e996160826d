//! Serialized field data of behaviour objects.
//!
//! A behaviour's structure may be available directly, recoverable on demand
//! from an unloaded representation, or missing entirely. [`StructureSlot`]
//! models those three states; a deferred structure is loaded at most once and
//! the result (success or failure) is cached.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

use super::object::PathId;

/// A value in a serialized field tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating point.
    Float(f64),
    /// String.
    String(String),
    /// Object pointer. `file_id` 0 points into the same container.
    Pointer {
        /// Index of the target file (0 = same container).
        file_id: i32,
        /// Path id of the target object.
        path_id: PathId,
    },
    /// Array of values.
    Array(Vec<FieldValue>),
    /// Nested structure.
    Struct(Vec<SerializedField>),
}

/// A named field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedField {
    /// Field name.
    pub name: String,
    /// Field value.
    pub value: FieldValue,
}

impl SerializedField {
    /// Create a new field.
    pub fn new(name: impl Into<String>, value: FieldValue) -> Self {
        Self { name: name.into(), value }
    }

    /// Create a local pointer field.
    pub fn local_pointer(name: impl Into<String>, path_id: i64) -> Self {
        Self::new(name, FieldValue::Pointer { file_id: 0, path_id: PathId(path_id) })
    }
}

/// Field graph of one behaviour object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SerializedStructure {
    /// Script type name.
    pub type_name: String,
    /// Top-level fields.
    pub fields: Vec<SerializedField>,
    /// Path ids this structure points at, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_path_ids: Option<BTreeSet<PathId>>,
}

impl SerializedStructure {
    /// Create a structure with no reference index.
    pub fn new(type_name: impl Into<String>, fields: Vec<SerializedField>) -> Self {
        Self {
            type_name: type_name.into(),
            fields,
            referenced_path_ids: None,
        }
    }

    /// Set the referenced path ids explicitly.
    pub fn with_references<I, P>(mut self, path_ids: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathId>,
    {
        self.referenced_path_ids = Some(path_ids.into_iter().map(Into::into).collect());
        self
    }

    /// Build the reference index from the field tree.
    pub fn with_indexed_references(mut self) -> Self {
        let mut ids = BTreeSet::new();
        for field in &self.fields {
            collect_local_pointers(&field.value, &mut ids);
        }
        self.referenced_path_ids = Some(ids);
        self
    }

    /// Referenced path ids, if indexed.
    pub fn referenced_path_ids(&self) -> Option<&BTreeSet<PathId>> {
        self.referenced_path_ids.as_ref()
    }

    /// Look up a top-level field by name.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }
}

fn collect_local_pointers(value: &FieldValue, out: &mut BTreeSet<PathId>) {
    match value {
        FieldValue::Pointer { file_id: 0, path_id } if path_id.0 != 0 => {
            out.insert(*path_id);
        }
        FieldValue::Array(items) => {
            for item in items {
                collect_local_pointers(item, out);
            }
        }
        FieldValue::Struct(fields) => {
            for field in fields {
                collect_local_pointers(&field.value, out);
            }
        }
        _ => {}
    }
}

type Loader = Box<dyn Fn() -> Option<SerializedStructure> + Send + Sync>;

/// A structure that is loaded on first access.
pub struct DeferredStructure {
    loader: Loader,
    cache: OnceLock<Option<SerializedStructure>>,
}

impl DeferredStructure {
    /// Wrap a loader. The loader runs at most once.
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn() -> Option<SerializedStructure> + Send + Sync + 'static,
    {
        Self {
            loader: Box::new(loader),
            cache: OnceLock::new(),
        }
    }

    /// Defer decoding of a JSON-encoded structure.
    ///
    /// The reference index is rebuilt from the field tree when the encoded
    /// form carries none.
    pub fn from_json(raw: Vec<u8>) -> Self {
        Self::new(move || match serde_json::from_slice::<SerializedStructure>(&raw) {
            Ok(structure) if structure.referenced_path_ids.is_none() => {
                Some(structure.with_indexed_references())
            }
            Ok(structure) => Some(structure),
            Err(e) => {
                tracing::warn!(error = %e, bytes = raw.len(), "Failed to decode unloaded structure");
                None
            }
        })
    }

    /// Load (once) and return the structure.
    pub fn load(&self) -> Option<&SerializedStructure> {
        self.cache.get_or_init(|| (self.loader)()).as_ref()
    }

    /// Whether the loader has already run.
    pub fn is_loaded(&self) -> bool {
        self.cache.get().is_some()
    }
}

impl fmt::Debug for DeferredStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredStructure")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// Availability of a behaviour's serialized structure.
#[derive(Debug, Default)]
pub enum StructureSlot {
    /// No field data, or it failed to load upstream.
    #[default]
    Missing,
    /// Field data loaded.
    Loaded(SerializedStructure),
    /// Field data loadable on demand.
    Deferred(DeferredStructure),
}

impl StructureSlot {
    /// Return the structure, loading a deferred one if needed.
    pub fn get(&self) -> Option<&SerializedStructure> {
        match self {
            Self::Missing => None,
            Self::Loaded(structure) => Some(structure),
            Self::Deferred(deferred) => deferred.load(),
        }
    }
}

impl From<SerializedStructure> for StructureSlot {
    fn from(structure: SerializedStructure) -> Self {
        Self::Loaded(structure)
    }
}

impl From<DeferredStructure> for StructureSlot {
    fn from(deferred: DeferredStructure) -> Self {
        Self::Deferred(deferred)
    }
}
