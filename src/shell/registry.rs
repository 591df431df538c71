//! Shell-surface factory and owner table
//!
//! The registry is the only component that knows which surface has which
//! shell surface, and it is where the at-most-one-role invariant lives:
//! creating a second shell surface for a surface that already has one fails
//! with `AlreadyHasRole`. Removal is keyed either by shell-surface id
//! (client destroyed the wire object) or by surface id (the backing surface
//! disappeared); both are no-ops when the entry is already gone, which makes
//! the two destruction paths safely race-free in either order.

use std::collections::HashMap;

use log::{debug, warn};

use crate::error::ShellError;
use crate::resource::{ClientId, ProtocolResource};
use crate::shell::{ShellSurface, ShellSurfaceId};
use crate::surface::SurfaceId;

#[derive(Debug, Default)]
pub struct ShellSurfaceRegistry {
    entries: HashMap<ShellSurfaceId, ShellSurface>,
    by_surface: HashMap<SurfaceId, ShellSurfaceId>,
    next_id: u64,
}

impl ShellSurfaceRegistry {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            by_surface: HashMap::new(),
            next_id: 1,
        }
    }

    /// Creates a shell surface for `surface`, with role `None` and empty
    /// metadata. Fails if the surface already has one.
    pub fn create(
        &mut self,
        resource: ProtocolResource,
        surface: SurfaceId,
    ) -> Result<ShellSurfaceId, ShellError> {
        if self.by_surface.contains_key(&surface) {
            warn!("Surface {:?} already has a shell surface", surface);
            return Err(ShellError::AlreadyHasRole { surface });
        }

        let id = ShellSurfaceId(self.next_id);
        self.next_id += 1;
        debug!("Shell surface {:?} created for surface {:?}", id, surface);
        self.entries.insert(id, ShellSurface::new(resource, surface));
        self.by_surface.insert(surface, id);
        Ok(id)
    }

    /// The shell surface attached to `surface`, if any.
    pub fn lookup(&self, surface: SurfaceId) -> Option<ShellSurfaceId> {
        self.by_surface.get(&surface).copied()
    }

    pub fn get(&self, id: ShellSurfaceId) -> Option<&ShellSurface> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: ShellSurfaceId) -> Option<&mut ShellSurface> {
        self.entries.get_mut(&id)
    }

    /// Removes by shell-surface id (explicit wire-object destroy).
    /// No-op if already gone.
    pub fn remove(&mut self, id: ShellSurfaceId) -> Option<ShellSurface> {
        let mut entry = self.entries.remove(&id)?;
        self.by_surface.remove(&entry.surface());
        entry.destroy_resource();
        debug!("Shell surface {:?} removed", id);
        Some(entry)
    }

    /// Removes by backing surface (the surface died first).
    /// No-op if the surface never had a shell surface or it is already gone.
    pub fn remove_by_surface(&mut self, surface: SurfaceId) -> Option<ShellSurfaceId> {
        let id = self.by_surface.remove(&surface)?;
        if let Some(mut entry) = self.entries.remove(&id) {
            entry.destroy_resource();
        }
        debug!(
            "Shell surface {:?} removed with surface {:?}",
            id, surface
        );
        Some(id)
    }

    /// Shell surfaces owned by `client`, for connection teardown.
    pub fn shell_surfaces_of_client(&self, client: ClientId) -> Vec<ShellSurfaceId> {
        let mut ids: Vec<_> = self
            .entries
            .iter()
            .filter(|(_, s)| s.client() == client)
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }
}
