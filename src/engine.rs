//! The shell-surface protocol engine
//!
//! [`ShellEngine`] is the single owner of every protocol-side entity —
//! surfaces, seats, shell surfaces, grabs, pending pings — and the entry
//! point the decoded-request dispatch layer calls into. All processing is
//! synchronous on one logical thread: each request completes, including any
//! destruction cascade it triggers, before the next one is observed, so no
//! caller can ever see a half-destroyed object.
//!
//! Outward it exposes pull-style state queries (role, title, class — used by
//! the compositing layer to decide window treatment) and a drainable event
//! queue (grab lifecycle, ping emission — consumed by the input-routing and
//! connection-health layers).
//!
//! Requests arriving for an object that was already torn down on the server
//! side (a shell surface whose backing surface died first, say) are not
//! protocol violations: the client could not have known yet. Those land as
//! logged no-ops, never as errors.

use log::{debug, info, warn};

use crate::config::ShellConfig;
use crate::error::ShellError;
use crate::grab::{GrabCoordinator, GrabId, GrabKind};
use crate::liveness::LivenessMonitor;
use crate::resource::{ClientId, ObjectIdAllocator};
use crate::seat::{SeatId, SeatInputTracker};
use crate::shell::{Role, ShellSurfaceId, ShellSurfaceRegistry};
use crate::surface::{BufferRef, SurfaceId, SurfaceRegistry};

/// Notifications for the layers around the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellEvent {
    /// An interactive operation was authorized; the input-routing layer
    /// should start forwarding pointer motion as geometry updates.
    GrabStarted {
        grab: GrabId,
        shell_surface: ShellSurfaceId,
        seat: SeatId,
        kind: GrabKind,
    },
    /// A grab finished, either by explicit completion or because the
    /// surface or seat it referenced was destroyed.
    GrabEnded {
        grab: GrabId,
        shell_surface: ShellSurfaceId,
        seat: SeatId,
        cancelled: bool,
    },
    /// A ping serial was allocated and must be transmitted to the client.
    PingSent { client: ClientId, serial: u32 },
}

/// Owner and coordinator of all shell-surface protocol state.
#[derive(Debug)]
pub struct ShellEngine {
    config: ShellConfig,
    objects: ObjectIdAllocator,
    surfaces: SurfaceRegistry,
    seats: SeatInputTracker,
    shells: ShellSurfaceRegistry,
    grabs: GrabCoordinator,
    liveness: LivenessMonitor,
    events: Vec<ShellEvent>,
}

impl ShellEngine {
    pub fn new(config: ShellConfig) -> Self {
        Self {
            config,
            objects: ObjectIdAllocator::new(),
            surfaces: SurfaceRegistry::new(),
            seats: SeatInputTracker::new(),
            shells: ShellSurfaceRegistry::new(),
            grabs: GrabCoordinator::new(),
            liveness: LivenessMonitor::new(),
            events: Vec::new(),
        }
    }

    // ---- Surfaces -------------------------------------------------------

    /// A client allocated a surface wire object.
    pub fn create_surface(&mut self, client: ClientId) -> SurfaceId {
        let resource = self.objects.allocate(client);
        self.surfaces.create(resource)
    }

    /// A client attached (or detached) a buffer to a surface.
    pub fn attach_buffer(&mut self, surface: SurfaceId, buffer: Option<BufferRef>) -> bool {
        self.surfaces.attach_buffer(surface, buffer)
    }

    /// The surface wire object was destroyed. Cascades bottom-up: the
    /// attached shell surface (if any) is torn down and any grab it held is
    /// cancelled, all before this call returns. Idempotent.
    pub fn surface_destroyed(&mut self, surface: SurfaceId) {
        if let Some(shell) = self.shells.lookup(surface) {
            // Grabs are cancelled before the shell surface is torn down.
            self.cancel_grab_for_surface(shell);
            self.shells.remove_by_surface(surface);
        }
        self.surfaces.destroy(surface);
    }

    // ---- Shell surfaces -------------------------------------------------

    /// A client asked for window-management semantics on `surface`.
    /// `Ok(None)` means the surface was already torn down server-side; the
    /// request is dropped like any other against a stale object, so no
    /// shell surface can ever come into existence bound to a dead surface.
    pub fn create_shell_surface(
        &mut self,
        client: ClientId,
        surface: SurfaceId,
    ) -> Result<Option<ShellSurfaceId>, ShellError> {
        if !self.surfaces.is_alive(surface) {
            debug!("create_shell_surface on dead surface {:?}", surface);
            return Ok(None);
        }
        let resource = self.objects.allocate(client);
        self.shells.create(resource, surface).map(Some)
    }

    /// The shell surface attached to `surface`, if any.
    pub fn lookup(&self, surface: SurfaceId) -> Option<ShellSurfaceId> {
        self.shells.lookup(surface)
    }

    pub fn role(&self, shell: ShellSurfaceId) -> Option<&Role> {
        self.shells.get(shell).map(|s| s.role())
    }

    pub fn title(&self, shell: ShellSurfaceId) -> Option<&str> {
        self.shells.get(shell).map(|s| s.title())
    }

    pub fn class(&self, shell: ShellSurfaceId) -> Option<&str> {
        self.shells.get(shell).map(|s| s.class())
    }

    pub fn set_toplevel(&mut self, shell: ShellSurfaceId) {
        match self.shells.get_mut(shell) {
            Some(entry) => entry.set_toplevel(),
            None => debug!("set_toplevel on absent shell surface {:?}", shell),
        }
    }

    pub fn set_maximized(&mut self, shell: ShellSurfaceId) {
        match self.shells.get_mut(shell) {
            Some(entry) => entry.set_maximized(),
            None => debug!("set_maximized on absent shell surface {:?}", shell),
        }
    }

    pub fn set_fullscreen(&mut self, shell: ShellSurfaceId, method: u32, framerate: u32) {
        match self.shells.get_mut(shell) {
            Some(entry) => entry.set_fullscreen(method, framerate),
            None => debug!("set_fullscreen on absent shell surface {:?}", shell),
        }
    }

    pub fn set_transient(
        &mut self,
        shell: ShellSurfaceId,
        parent: SurfaceId,
        x: i32,
        y: i32,
        flags: u32,
    ) -> Result<(), ShellError> {
        match self.shells.get_mut(shell) {
            Some(entry) => entry.set_transient(&self.surfaces, parent, x, y, flags),
            None => {
                debug!("set_transient on absent shell surface {:?}", shell);
                Ok(())
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn set_popup(
        &mut self,
        shell: ShellSurfaceId,
        seat: SeatId,
        serial: u32,
        parent: SurfaceId,
        x: i32,
        y: i32,
        flags: u32,
    ) -> Result<(), ShellError> {
        match self.shells.get_mut(shell) {
            Some(entry) => {
                entry.set_popup(&self.surfaces, &self.seats, seat, serial, parent, x, y, flags)
            }
            None => {
                debug!("set_popup on absent shell surface {:?}", shell);
                Ok(())
            }
        }
    }

    pub fn set_title(&mut self, shell: ShellSurfaceId, title: &str) {
        match self.shells.get_mut(shell) {
            Some(entry) => entry.set_title(title),
            None => debug!("set_title on absent shell surface {:?}", shell),
        }
    }

    pub fn set_class(&mut self, shell: ShellSurfaceId, class: &str) {
        match self.shells.get_mut(shell) {
            Some(entry) => entry.set_class(class),
            None => debug!("set_class on absent shell surface {:?}", shell),
        }
    }

    /// The shell-surface wire object was explicitly destroyed by the
    /// client. Same cascade as [`surface_destroyed`](Self::surface_destroyed)
    /// from the shell surface down; the backing surface stays alive.
    /// Idempotent with the surface-death path, whichever fires first wins.
    pub fn shell_resource_destroyed(&mut self, shell: ShellSurfaceId) {
        if self.shells.get(shell).is_some() {
            self.cancel_grab_for_surface(shell);
            self.shells.remove(shell);
        }
    }

    // ---- Seats and input serials ----------------------------------------

    /// A client bound an input capability.
    pub fn register_seat(&mut self, client: ClientId) -> SeatId {
        let resource = self.objects.allocate(client);
        self.seats.register(resource)
    }

    /// The seat's wire object went away; its grab (if any) is cancelled.
    pub fn seat_destroyed(&mut self, seat: SeatId) {
        if let Some((id, grab)) = self.grabs.cancel_for_seat(seat) {
            self.events.push(ShellEvent::GrabEnded {
                grab: id,
                shell_surface: grab.shell_surface,
                seat: grab.seat,
                cancelled: true,
            });
        }
        self.seats.remove(seat);
    }

    /// The input layer dispatched an event with `serial` on `seat`.
    pub fn input_dispatched(&mut self, seat: SeatId, serial: u32) {
        self.seats.input_dispatched(seat, serial);
    }

    // ---- Interactive grabs ----------------------------------------------

    /// Starts an interactive move. `Ok(None)` means the shell surface was
    /// already torn down server-side — a stale but well-formed request,
    /// dropped without a protocol error.
    pub fn start_move(
        &mut self,
        shell: ShellSurfaceId,
        seat: SeatId,
        serial: u32,
    ) -> Result<Option<GrabId>, ShellError> {
        if self.shells.get(shell).is_none() {
            debug!("start_move on absent shell surface {:?}", shell);
            return Ok(None);
        }
        let id = self.grabs.start_move(&self.seats, shell, seat, serial)?;
        self.push_grab_started(id);
        Ok(Some(id))
    }

    /// Starts an interactive resize along the `edges` bitmask.
    pub fn start_resize(
        &mut self,
        shell: ShellSurfaceId,
        seat: SeatId,
        serial: u32,
        edges: u32,
    ) -> Result<Option<GrabId>, ShellError> {
        if self.shells.get(shell).is_none() {
            debug!("start_resize on absent shell surface {:?}", shell);
            return Ok(None);
        }
        let id = self.grabs.start_resize(&self.seats, shell, seat, serial, edges)?;
        self.push_grab_started(id);
        Ok(Some(id))
    }

    /// Explicit grab completion, e.g. on pointer-button release.
    pub fn end_grab(&mut self, grab: GrabId) {
        if let Some(ended) = self.grabs.end(grab) {
            self.events.push(ShellEvent::GrabEnded {
                grab,
                shell_surface: ended.shell_surface,
                seat: ended.seat,
                cancelled: false,
            });
        }
    }

    // ---- Liveness -------------------------------------------------------

    /// Sends a ping to `client`; the returned serial goes on the wire.
    pub fn send_ping(&mut self, client: ClientId) -> Result<u32, ShellError> {
        let serial = self.liveness.send_ping(client)?;
        self.events.push(ShellEvent::PingSent { client, serial });
        Ok(serial)
    }

    /// A pong arrived from `client`. Mismatches are ignored, not errors.
    pub fn pong(&mut self, client: ClientId, serial: u32) {
        self.liveness.pong(client, serial);
    }

    /// Pong delivered via a shell-surface object: resolved to the owning
    /// client, then handled like [`pong`](Self::pong).
    pub fn shell_pong(&mut self, shell: ShellSurfaceId, serial: u32) {
        match self.shells.get(shell) {
            Some(entry) => {
                let client = entry.client();
                self.liveness.pong(client, serial);
            }
            None => debug!("pong via absent shell surface {:?}", shell),
        }
    }

    /// Clients whose outstanding ping has exceeded the configured
    /// threshold. Disconnecting them is the caller's policy, not ours.
    pub fn unresponsive_clients(&self) -> Vec<ClientId> {
        self.liveness
            .unresponsive_clients(self.config.liveness.unresponsive_after())
    }

    // ---- Connection teardown --------------------------------------------

    /// The client connection dropped: every resource it owns is destroyed,
    /// with the same cascades as explicit destruction. Other clients are
    /// untouched.
    pub fn client_disconnected(&mut self, client: ClientId) {
        info!("Client {:?} disconnected, tearing down its resources", client);

        for shell in self.shells.shell_surfaces_of_client(client) {
            self.shell_resource_destroyed(shell);
        }
        for surface in self.surfaces.surfaces_of_client(client) {
            self.surface_destroyed(surface);
        }
        for seat in self.seats.seats_of_client(client) {
            self.seat_destroyed(seat);
        }
        self.liveness.forget_client(client);
    }

    // ---- Observation ----------------------------------------------------

    /// Drains the queued notifications, oldest first.
    pub fn drain_events(&mut self) -> Vec<ShellEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn surfaces(&self) -> &SurfaceRegistry {
        &self.surfaces
    }

    pub fn seats(&self) -> &SeatInputTracker {
        &self.seats
    }

    pub fn shell_surfaces(&self) -> &ShellSurfaceRegistry {
        &self.shells
    }

    pub fn grabs(&self) -> &GrabCoordinator {
        &self.grabs
    }

    pub fn liveness(&self) -> &LivenessMonitor {
        &self.liveness
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    // ---- Internal -------------------------------------------------------

    fn push_grab_started(&mut self, id: GrabId) {
        if let Some(grab) = self.grabs.get(id) {
            self.events.push(ShellEvent::GrabStarted {
                grab: id,
                shell_surface: grab.shell_surface,
                seat: grab.seat,
                kind: grab.kind,
            });
        }
    }

    fn cancel_grab_for_surface(&mut self, shell: ShellSurfaceId) {
        if let Some((id, grab)) = self.grabs.cancel_for_surface(shell) {
            warn!("Grab {:?} cancelled by destruction of {:?}", id, shell);
            self.events.push(ShellEvent::GrabEnded {
                grab: id,
                shell_surface: grab.shell_surface,
                seat: grab.seat,
                cancelled: true,
            });
        }
    }
}

impl Default for ShellEngine {
    fn default() -> Self {
        Self::new(ShellConfig::default())
    }
}
