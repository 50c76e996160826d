//! In-memory source container.

use std::collections::BTreeMap;

use crate::types::{ContainerId, PathId, PersistedObject};
use super::SourceContainer;

/// Error type for container population.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ContainerError {
    /// An object with this path id is already present.
    #[error("Duplicate path id {path_id} in {container}")]
    DuplicatePathId {
        /// Container being populated.
        container: ContainerId,
        /// Offending path id.
        path_id: PathId,
    },
}

/// In-memory source container.
///
/// Objects enumerate in insertion order; lookups by path id go through a
/// BTreeMap index.
#[derive(Debug, Default)]
pub struct InMemoryContainer {
    id: ContainerId,
    name: String,
    objects: Vec<PersistedObject>,
    index: BTreeMap<PathId, usize>,
}

impl InMemoryContainer {
    /// Create a new empty container.
    pub fn new(id: ContainerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            objects: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    /// Add an object, stamping it with this container's id.
    pub fn add(&mut self, mut object: PersistedObject) -> Result<(), ContainerError> {
        let path_id = object.path_id();
        if self.index.contains_key(&path_id) {
            return Err(ContainerError::DuplicatePathId { container: self.id, path_id });
        }
        object.set_container(self.id);
        self.index.insert(path_id, self.objects.len());
        self.objects.push(object);
        Ok(())
    }

    /// Builder-style [`add`](Self::add).
    pub fn with(mut self, object: PersistedObject) -> Result<Self, ContainerError> {
        self.add(object)?;
        Ok(self)
    }

    /// Number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the container is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl SourceContainer for InMemoryContainer {
    fn id(&self) -> ContainerId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn objects(&self) -> &[PersistedObject] {
        &self.objects
    }

    fn get(&self, path_id: PathId) -> Option<&PersistedObject> {
        self.index.get(&path_id).map(|&i| &self.objects[i])
    }
}
