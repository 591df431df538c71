//! Protocol error taxonomy for the shell-surface engine
//!
//! Every error here is the synchronous outcome of a single client request.
//! Nothing is retried internally; the dispatch layer that feeds the engine
//! decides how an error maps onto the wire (protocol-error event, connection
//! termination, ...). Cleanup paths (surface destruction, grab cancellation)
//! never produce these — they are infallible no-ops on absent state.

use thiserror::Error;

use crate::resource::ClientId;
use crate::seat::SeatId;
use crate::surface::SurfaceId;

/// Errors reported by shell-surface protocol requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    /// A shell surface was requested for a surface that already has one.
    #[error("surface {surface:?} already has a shell surface role")]
    AlreadyHasRole { surface: SurfaceId },

    /// A transient/popup parent is dead or refers to the surface itself.
    #[error("invalid parent surface {parent:?}")]
    InvalidParent { parent: SurfaceId },

    /// A serial-gated request carried a serial that no longer matches the
    /// seat's most recent input event.
    #[error("stale serial {requested} for seat {seat:?} (current {current:?})")]
    StaleSerial {
        seat: SeatId,
        requested: u32,
        current: Option<u32>,
    },

    /// An interactive move/resize was requested while the surface or the
    /// seat is already claimed by a live grab.
    #[error("seat {seat:?} or target surface is already grabbed")]
    AlreadyGrabbed { seat: SeatId },

    /// A ping was requested while one is still outstanding for the client.
    #[error("client {client:?} already has an outstanding ping")]
    PingAlreadyOutstanding { client: ClientId },
}
