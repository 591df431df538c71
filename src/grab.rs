//! Interactive move/resize grab coordination
//!
//! The engine never moves a window itself — a grab is the *permission* for
//! an interactive operation, handed to the input-routing layer which then
//! turns raw pointer motion into geometry updates until the grab ends.
//!
//! Two rules keep grabs race-free. First, starting one is gated on the
//! serial of the input event the client observed: a request quoting an
//! older serial was authorized by input the compositor has since moved past,
//! and is refused. Second, a shell surface and a seat can each be claimed by
//! at most one live grab — a second start request fails rather than
//! replacing the first.

use std::collections::HashMap;

use log::{debug, warn};

use crate::error::ShellError;
use crate::seat::{SeatId, SeatInputTracker};
use crate::shell::ShellSurfaceId;

/// Identity of a live grab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GrabId(pub u64);

/// What the grab permits. `edges` is the resize-edge bitmask from the wire,
/// passed through unvalidated; nonsense combinations are a UI concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabKind {
    Move,
    Resize { edges: u32 },
}

/// An exclusive claim on a (shell surface, seat) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grab {
    pub shell_surface: ShellSurfaceId,
    pub seat: SeatId,
    pub kind: GrabKind,
    pub serial: u32,
}

/// Arbitrates interactive move/resize operations.
#[derive(Debug, Default)]
pub struct GrabCoordinator {
    grabs: HashMap<GrabId, Grab>,
    by_surface: HashMap<ShellSurfaceId, GrabId>,
    by_seat: HashMap<SeatId, GrabId>,
    next_id: u64,
}

impl GrabCoordinator {
    pub fn new() -> Self {
        Self {
            grabs: HashMap::new(),
            by_surface: HashMap::new(),
            by_seat: HashMap::new(),
            next_id: 1,
        }
    }

    /// Starts an interactive move of `shell_surface` driven by `seat`.
    pub fn start_move(
        &mut self,
        seats: &SeatInputTracker,
        shell_surface: ShellSurfaceId,
        seat: SeatId,
        serial: u32,
    ) -> Result<GrabId, ShellError> {
        self.start(seats, shell_surface, seat, serial, GrabKind::Move)
    }

    /// Starts an interactive resize of `shell_surface` along `edges`.
    pub fn start_resize(
        &mut self,
        seats: &SeatInputTracker,
        shell_surface: ShellSurfaceId,
        seat: SeatId,
        serial: u32,
        edges: u32,
    ) -> Result<GrabId, ShellError> {
        self.start(seats, shell_surface, seat, serial, GrabKind::Resize { edges })
    }

    fn start(
        &mut self,
        seats: &SeatInputTracker,
        shell_surface: ShellSurfaceId,
        seat: SeatId,
        serial: u32,
        kind: GrabKind,
    ) -> Result<GrabId, ShellError> {
        seats.check_serial(seat, serial)?;

        if self.by_surface.contains_key(&shell_surface) || self.by_seat.contains_key(&seat) {
            warn!(
                "Grab refused: surface {:?} or seat {:?} already grabbed",
                shell_surface, seat
            );
            return Err(ShellError::AlreadyGrabbed { seat });
        }

        let id = GrabId(self.next_id);
        self.next_id += 1;
        debug!(
            "Grab {:?} started: {:?} on {:?} via {:?} (serial {})",
            id, kind, shell_surface, seat, serial
        );
        self.grabs.insert(
            id,
            Grab {
                shell_surface,
                seat,
                kind,
                serial,
            },
        );
        self.by_surface.insert(shell_surface, id);
        self.by_seat.insert(seat, id);
        Ok(id)
    }

    pub fn get(&self, id: GrabId) -> Option<&Grab> {
        self.grabs.get(&id)
    }

    /// The live grab claiming `shell_surface`, if any.
    pub fn grab_on_surface(&self, shell_surface: ShellSurfaceId) -> Option<GrabId> {
        self.by_surface.get(&shell_surface).copied()
    }

    /// The live grab claiming `seat`, if any.
    pub fn grab_on_seat(&self, seat: SeatId) -> Option<GrabId> {
        self.by_seat.get(&seat).copied()
    }

    /// Ends a grab on explicit completion (button release or equivalent).
    /// No-op on unknown ids.
    pub fn end(&mut self, id: GrabId) -> Option<Grab> {
        let grab = self.remove(id)?;
        debug!("Grab {:?} ended", id);
        Some(grab)
    }

    /// Cancels the grab referencing `shell_surface`, if any. Called by the
    /// destruction cascade; never fails.
    pub fn cancel_for_surface(&mut self, shell_surface: ShellSurfaceId) -> Option<(GrabId, Grab)> {
        let id = self.by_surface.get(&shell_surface).copied()?;
        let grab = self.remove(id)?;
        debug!("Grab {:?} cancelled with surface {:?}", id, shell_surface);
        Some((id, grab))
    }

    /// Cancels the grab referencing `seat`, if any.
    pub fn cancel_for_seat(&mut self, seat: SeatId) -> Option<(GrabId, Grab)> {
        let id = self.by_seat.get(&seat).copied()?;
        let grab = self.remove(id)?;
        debug!("Grab {:?} cancelled with seat {:?}", id, seat);
        Some((id, grab))
    }

    fn remove(&mut self, id: GrabId) -> Option<Grab> {
        let grab = self.grabs.remove(&id)?;
        self.by_surface.remove(&grab.shell_surface);
        self.by_seat.remove(&grab.seat);
        Some(grab)
    }
}
