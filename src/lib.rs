//! # Vitrine Embedded Compositor Shell Engine
//!
//! Vitrine is the shell-surface protocol engine of an embedded display
//! compositor: a process-internal server that speaks a Wayland-style
//! windowing protocol so external client applications can attach their
//! pixel buffers to surfaces that are composited into a larger real-time
//! 3D scene (an automotive HMI embedding third-party UI apps as textured
//! surfaces, for instance).
//!
//! ## Architecture
//!
//! The engine is built from single-owner components, leaf first:
//! - `resource`: wire-object identity and destroy-once lifetime tracking
//! - `surface`: buffer-bearing drawables and their ownership table
//! - `seat`: per-seat monotonic input-serial tracking
//! - `shell`: the window-role state machine and shell-surface registry
//! - `grab`: serial-gated interactive move/resize arbitration
//! - `liveness`: ping/pong client responsiveness observation
//! - `engine`: the facade that owns all of the above, runs destruction
//!   cascades and queues events for the surrounding layers
//! - `config`: TOML-loadable policy knobs
//!
//! Wire framing, socket transport, buffer import and rendering live in the
//! host compositor; this crate assumes requests arrive as already-decoded,
//! typed calls on one logical thread.
//!
//! ## Usage
//!
//! ```rust
//! use vitrine::{ShellEngine, ShellConfig, ClientId};
//!
//! let mut engine = ShellEngine::new(ShellConfig::default());
//! let client = ClientId(1);
//! let surface = engine.create_surface(client);
//! let shell = engine
//!     .create_shell_surface(client, surface)?
//!     .expect("surface is alive");
//! engine.set_toplevel(shell);
//! engine.set_title(shell, "Media Player");
//! # Ok::<(), vitrine::ShellError>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod grab;
pub mod liveness;
pub mod resource;
pub mod seat;
pub mod shell;
pub mod surface;

// Re-export main types for easy access
pub use config::ShellConfig;
pub use engine::{ShellEngine, ShellEvent};
pub use error::ShellError;
pub use grab::{Grab, GrabCoordinator, GrabId, GrabKind};
pub use liveness::LivenessMonitor;
pub use resource::{ClientId, ObjectId, ProtocolResource};
pub use seat::{SeatId, SeatInputTracker};
pub use shell::{Role, ShellSurface, ShellSurfaceId, ShellSurfaceRegistry};
pub use surface::{BufferRef, Surface, SurfaceId, SurfaceRegistry};

// Re-export common error types
pub use anyhow::{Context, Error, Result};
