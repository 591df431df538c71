//! Ping/pong client liveness observation
//!
//! One ping may be in flight per client at a time. A pong only counts when
//! it quotes the serial of that outstanding ping; anything else — a late
//! pong for a ping we stopped waiting on, a duplicate, a pong with no ping
//! at all — is silently dropped, because such arrivals are routine under
//! normal operation and not a protocol violation.
//!
//! This module observes responsiveness, it does not enforce it. Whether an
//! unresponsive client gets disconnected is policy belonging to the
//! connection-health layer; it reads the outstanding-ping state and pong
//! ages exposed here.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::error::ShellError;
use crate::resource::ClientId;

/// A ping sent to a client, awaiting its pong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingPing {
    pub serial: u32,
    pub sent_at: Instant,
}

/// Per-client ping/pong bookkeeping.
#[derive(Debug, Default)]
pub struct LivenessMonitor {
    pending: HashMap<ClientId, PendingPing>,
    last_pong: HashMap<ClientId, Instant>,
    next_serial: u32,
}

impl LivenessMonitor {
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
            last_pong: HashMap::new(),
            next_serial: 1,
        }
    }

    /// Allocates a ping serial for `client` and records it as outstanding.
    /// The caller transmits the returned serial on the wire.
    pub fn send_ping(&mut self, client: ClientId) -> Result<u32, ShellError> {
        if self.pending.contains_key(&client) {
            return Err(ShellError::PingAlreadyOutstanding { client });
        }

        let serial = self.next_serial;
        self.next_serial = self.next_serial.wrapping_add(1);
        self.pending.insert(
            client,
            PendingPing {
                serial,
                sent_at: Instant::now(),
            },
        );
        debug!("Ping {} sent to client {:?}", serial, client);
        Ok(serial)
    }

    /// Handles a pong from `client`. Returns `true` if it matched the
    /// outstanding ping; mismatches and unsolicited pongs are ignored.
    pub fn pong(&mut self, client: ClientId, serial: u32) -> bool {
        match self.pending.get(&client) {
            Some(ping) if ping.serial == serial => {
                self.pending.remove(&client);
                self.last_pong.insert(client, Instant::now());
                debug!("Client {:?} answered ping {}", client, serial);
                true
            }
            Some(ping) => {
                trace!(
                    "Client {:?}: ignoring pong {} (outstanding {})",
                    client,
                    serial,
                    ping.serial
                );
                false
            }
            None => {
                trace!("Client {:?}: ignoring unsolicited pong {}", client, serial);
                false
            }
        }
    }

    /// The outstanding ping for `client`, if any.
    pub fn pending_ping(&self, client: ClientId) -> Option<PendingPing> {
        self.pending.get(&client).copied()
    }

    pub fn ping_outstanding(&self, client: ClientId) -> bool {
        self.pending.contains_key(&client)
    }

    /// Time since the client's last successful pong, if it ever answered.
    pub fn last_pong_age(&self, client: ClientId) -> Option<Duration> {
        self.last_pong.get(&client).map(|at| at.elapsed())
    }

    /// How long the client's current ping has gone unanswered, if one is
    /// outstanding. The disconnect decision on top of this is external.
    pub fn outstanding_ping_age(&self, client: ClientId) -> Option<Duration> {
        self.pending.get(&client).map(|p| p.sent_at.elapsed())
    }

    /// Clients whose outstanding ping has gone unanswered for at least
    /// `threshold`.
    pub fn unresponsive_clients(&self, threshold: Duration) -> Vec<ClientId> {
        let mut ids: Vec<_> = self
            .pending
            .iter()
            .filter(|(_, p)| p.sent_at.elapsed() >= threshold)
            .map(|(client, _)| *client)
            .collect();
        ids.sort();
        ids
    }

    /// Drops all state for a disconnected client.
    pub fn forget_client(&mut self, client: ClientId) {
        self.pending.remove(&client);
        self.last_pong.remove(&client);
    }
}
