//! Shell-surface role state machine
//!
//! A shell surface attaches window-management semantics to exactly one
//! [`Surface`](crate::surface::Surface): the current window [`Role`], a
//! title and a window class. Role requests are one-shot overwrites — once a
//! surface is a window it can be re-requested into any other window role
//! (toplevel to fullscreen, fullscreen back to toplevel, ...) and each
//! request replaces the previous role and all of its parameters. A role
//! never silently reverts; the only way out is destruction.
//!
//! Two destruction paths exist and either may fire first: the client
//! explicitly destroys the shell-surface wire object, or the backing surface
//! disappears. Whichever arrives second must find nothing left to do — the
//! registry's removal-by-lookup makes the pair idempotent.

pub mod registry;


use log::debug;

use crate::error::ShellError;
use crate::resource::{ClientId, ProtocolResource};
use crate::seat::{SeatId, SeatInputTracker};
use crate::surface::{SurfaceId, SurfaceRegistry};

pub use registry::ShellSurfaceRegistry;

/// Identity of a shell surface within the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShellSurfaceId(pub u64);

/// The window category a shell surface currently has.
///
/// `method`, `flags` and `framerate` are opaque pass-throughs from the wire;
/// interpreting them (including achievability of a fullscreen framerate) is
/// a rendering concern outside this engine. A `framerate` of 0 means
/// unconstrained, any positive value is a millihertz target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    None,
    Toplevel,
    Transient {
        parent: SurfaceId,
        offset: (i32, i32),
        flags: u32,
    },
    Popup {
        parent: SurfaceId,
        seat: SeatId,
        serial: u32,
        offset: (i32, i32),
        flags: u32,
    },
    Fullscreen {
        method: u32,
        framerate: u32,
    },
    Maximized,
}

/// Window-management state attached to a single surface.
#[derive(Debug)]
pub struct ShellSurface {
    resource: ProtocolResource,
    surface: SurfaceId,
    role: Role,
    title: String,
    class: String,
}

impl ShellSurface {
    pub(crate) fn new(resource: ProtocolResource, surface: SurfaceId) -> Self {
        Self {
            resource,
            surface,
            role: Role::None,
            title: String::new(),
            class: String::new(),
        }
    }

    /// The client connection owning the shell-surface wire object.
    pub fn client(&self) -> ClientId {
        self.resource.client()
    }

    /// The backing surface. Resolved through the surface registry; may be
    /// dead if destruction is mid-cascade.
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn set_toplevel(&mut self) {
        self.set_role(Role::Toplevel);
    }

    pub fn set_maximized(&mut self) {
        self.set_role(Role::Maximized);
    }

    pub fn set_fullscreen(&mut self, method: u32, framerate: u32) {
        self.set_role(Role::Fullscreen { method, framerate });
    }

    /// Makes the surface a transient window positioned relative to `parent`.
    /// The parent must be a live surface other than our own.
    pub fn set_transient(
        &mut self,
        surfaces: &SurfaceRegistry,
        parent: SurfaceId,
        x: i32,
        y: i32,
        flags: u32,
    ) -> Result<(), ShellError> {
        self.check_parent(surfaces, parent)?;
        self.set_role(Role::Transient {
            parent,
            offset: (x, y),
            flags,
        });
        Ok(())
    }

    /// Makes the surface a popup grounded in the input event `serial` on
    /// `seat`. The serial must still be the seat's most recent one: a popup
    /// spawned from historical input would break the positional and
    /// dismissal semantics the rest of the compositor builds on it.
    #[allow(clippy::too_many_arguments)]
    pub fn set_popup(
        &mut self,
        surfaces: &SurfaceRegistry,
        seats: &SeatInputTracker,
        seat: SeatId,
        serial: u32,
        parent: SurfaceId,
        x: i32,
        y: i32,
        flags: u32,
    ) -> Result<(), ShellError> {
        seats.check_serial(seat, serial)?;
        self.check_parent(surfaces, parent)?;
        self.set_role(Role::Popup {
            parent,
            seat,
            serial,
            offset: (x, y),
            flags,
        });
        Ok(())
    }

    /// Replaces the title unconditionally. Empty is legal and is also the
    /// default before any request.
    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_owned();
    }

    /// Replaces the window class unconditionally.
    pub fn set_class(&mut self, class: &str) {
        self.class = class.to_owned();
    }

    pub(crate) fn destroy_resource(&mut self) -> bool {
        self.resource.destroy()
    }

    fn check_parent(
        &self,
        surfaces: &SurfaceRegistry,
        parent: SurfaceId,
    ) -> Result<(), ShellError> {
        if parent == self.surface || !surfaces.is_alive(parent) {
            return Err(ShellError::InvalidParent { parent });
        }
        Ok(())
    }

    fn set_role(&mut self, role: Role) {
        debug!(
            "Shell surface for {:?}: role {:?} -> {:?}",
            self.surface, self.role, role
        );
        self.role = role;
    }
}
