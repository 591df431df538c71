//! Buffer-bearing surfaces and their ownership table
//!
//! A [`Surface`] is the drawable every window role attaches to: a wire
//! resource plus the most recently attached client buffer. Surfaces know
//! nothing about roles — the at-most-one-role invariant is enforced by the
//! shell-surface registry, not here.
//!
//! [`SurfaceRegistry`] is the single owner of all surfaces and doubles as
//! the aliveness oracle the rest of the engine re-validates ids against.

use std::collections::HashMap;

use log::{debug, warn};

use crate::resource::{ClientId, ProtocolResource};

/// Identity of a surface within the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId(pub u64);

/// Opaque handle to an imported client buffer. Import and composition
/// mechanics live outside this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferRef(pub u64);

/// A buffer-bearing drawable owned by a client connection.
#[derive(Debug)]
pub struct Surface {
    resource: ProtocolResource,
    current_buffer: Option<BufferRef>,
}

impl Surface {
    pub fn client(&self) -> ClientId {
        self.resource.client()
    }

    pub fn current_buffer(&self) -> Option<BufferRef> {
        self.current_buffer
    }
}

/// Owner table for all live surfaces.
#[derive(Debug, Default)]
pub struct SurfaceRegistry {
    surfaces: HashMap<SurfaceId, Surface>,
    next_id: u64,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self {
            surfaces: HashMap::new(),
            next_id: 1,
        }
    }

    /// Creates a surface backed by `resource` and returns its id.
    pub fn create(&mut self, resource: ProtocolResource) -> SurfaceId {
        let id = SurfaceId(self.next_id);
        self.next_id += 1;
        debug!(
            "Surface {:?} created for client {:?}",
            id,
            resource.client()
        );
        self.surfaces.insert(
            id,
            Surface {
                resource,
                current_buffer: None,
            },
        );
        id
    }

    /// Attaches (or detaches, with `None`) the client's buffer.
    /// Returns `false` if the surface no longer exists.
    pub fn attach_buffer(&mut self, id: SurfaceId, buffer: Option<BufferRef>) -> bool {
        match self.surfaces.get_mut(&id) {
            Some(surface) => {
                surface.current_buffer = buffer;
                true
            }
            None => {
                warn!("attach_buffer on unknown surface {:?}", id);
                false
            }
        }
    }

    /// Destroys a surface. Returns `true` only for the call that removed it;
    /// repeat calls and unknown ids are no-ops.
    pub fn destroy(&mut self, id: SurfaceId) -> bool {
        match self.surfaces.remove(&id) {
            Some(mut surface) => {
                surface.resource.destroy();
                debug!("Surface {:?} destroyed", id);
                true
            }
            None => false,
        }
    }

    pub fn is_alive(&self, id: SurfaceId) -> bool {
        self.surfaces.contains_key(&id)
    }

    pub fn get(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(&id)
    }

    /// Surfaces owned by `client`, for connection teardown.
    pub fn surfaces_of_client(&self, client: ClientId) -> Vec<SurfaceId> {
        let mut ids: Vec<_> = self
            .surfaces
            .iter()
            .filter(|(_, s)| s.client() == client)
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ObjectIdAllocator;

    #[test]
    fn destroyed_surface_is_not_found() {
        let mut alloc = ObjectIdAllocator::new();
        let mut registry = SurfaceRegistry::new();

        let id = registry.create(alloc.allocate(ClientId(1)));
        assert!(registry.is_alive(id));

        assert!(registry.destroy(id));
        assert!(!registry.is_alive(id));
        assert!(registry.get(id).is_none());
        assert!(!registry.destroy(id)); // idempotent
    }

    #[test]
    fn buffer_attach_requires_live_surface() {
        let mut alloc = ObjectIdAllocator::new();
        let mut registry = SurfaceRegistry::new();

        let id = registry.create(alloc.allocate(ClientId(1)));
        assert!(registry.attach_buffer(id, Some(BufferRef(42))));
        assert_eq!(registry.get(id).unwrap().current_buffer(), Some(BufferRef(42)));

        registry.destroy(id);
        assert!(!registry.attach_buffer(id, Some(BufferRef(43))));
    }

    #[test]
    fn client_surfaces_are_enumerable() {
        let mut alloc = ObjectIdAllocator::new();
        let mut registry = SurfaceRegistry::new();

        let a = registry.create(alloc.allocate(ClientId(1)));
        let _b = registry.create(alloc.allocate(ClientId(2)));
        let c = registry.create(alloc.allocate(ClientId(1)));

        assert_eq!(registry.surfaces_of_client(ClientId(1)), vec![a, c]);
    }
}
