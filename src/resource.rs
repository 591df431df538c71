//! Wire-object identity and lifetime tracking
//!
//! Every protocol-visible object (surface, shell surface, seat) is backed by
//! a [`ProtocolResource`]: the wire object id, the connection that owns it,
//! and a destroy-once latch. Components never hand out owning references to
//! each other; they exchange ids and resolve them through the owning
//! registry, so a reference that outlives its target resolves to "not found"
//! rather than dangling.

use log::debug;

/// Identity of a client connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientId(pub u64);

/// Identity of a wire-protocol object within the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub u32);

/// A wire object bound to its owning connection.
///
/// Destruction happens exactly once, either by an explicit client destroy
/// request or by connection teardown; [`ProtocolResource::destroy`] reports
/// whether the call performed the transition so dependents are notified at
/// most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolResource {
    id: ObjectId,
    client: ClientId,
    alive: bool,
}

impl ProtocolResource {
    pub fn new(id: ObjectId, client: ClientId) -> Self {
        Self {
            id,
            client,
            alive: true,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn client(&self) -> ClientId {
        self.client
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Marks the resource destroyed. Returns `true` only for the call that
    /// performed the transition; later calls are no-ops.
    pub fn destroy(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        debug!("Resource {:?} of client {:?} destroyed", self.id, self.client);
        true
    }
}

/// Allocates wire object ids for server-created objects.
///
/// A single allocator is shared by all registries so ids stay unique across
/// object kinds.
#[derive(Debug)]
pub struct ObjectIdAllocator {
    next: u32,
}

impl ObjectIdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Allocates a fresh resource owned by `client`.
    pub fn allocate(&mut self, client: ClientId) -> ProtocolResource {
        let id = ObjectId(self.next);
        self.next += 1;
        ProtocolResource::new(id, client)
    }
}

impl Default for ObjectIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
