//! Source container backends.

pub mod memory;

use crate::types::{ContainerId, PathId, PersistedObject};

/// Read access to the objects of one source container.
///
/// Implementations must enumerate objects in a stable order; closure
/// discovery iterates them in that order, so member order follows it.
pub trait SourceContainer {
    /// Container handle. Every object returned carries this id.
    fn id(&self) -> ContainerId;

    /// Human-readable container name.
    fn name(&self) -> &str;

    /// All objects, in enumeration order.
    fn objects(&self) -> &[PersistedObject];

    /// Fetch an object by path id.
    fn get(&self, path_id: PathId) -> Option<&PersistedObject> {
        self.objects().iter().find(|o| o.path_id() == path_id)
    }
}

pub use memory::{ContainerError, InMemoryContainer};
