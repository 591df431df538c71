//! Seat input-serial tracking
//!
//! Every input event the compositor dispatches carries a monotonically
//! increasing serial. Requests that must be grounded in a real, recent input
//! event (popup placement, interactive move/resize) quote the serial they
//! observed; [`SeatInputTracker`] is the single source of truth those quotes
//! are validated against.

use std::collections::HashMap;

use log::{debug, warn};

use crate::error::ShellError;
use crate::resource::{ClientId, ProtocolResource};

/// Identity of a seat (a client's bound input capability).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeatId(pub u64);

/// A client's bound input capability and its most recent input serial.
#[derive(Debug)]
pub struct SeatResource {
    resource: ProtocolResource,
    last_serial: Option<u32>,
}

impl SeatResource {
    pub fn client(&self) -> ClientId {
        self.resource.client()
    }

    pub fn last_serial(&self) -> Option<u32> {
        self.last_serial
    }
}

/// Tracks seats and the serial of the last input event dispatched to each.
#[derive(Debug, Default)]
pub struct SeatInputTracker {
    seats: HashMap<SeatId, SeatResource>,
    next_id: u64,
}

impl SeatInputTracker {
    pub fn new() -> Self {
        Self {
            seats: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn register(&mut self, resource: ProtocolResource) -> SeatId {
        let id = SeatId(self.next_id);
        self.next_id += 1;
        debug!("Seat {:?} registered for client {:?}", id, resource.client());
        self.seats.insert(
            id,
            SeatResource {
                resource,
                last_serial: None,
            },
        );
        id
    }

    /// Records that an input event with `serial` was dispatched on `seat`.
    /// Serials must advance; a non-increasing serial is ignored.
    pub fn input_dispatched(&mut self, seat: SeatId, serial: u32) {
        let Some(entry) = self.seats.get_mut(&seat) else {
            warn!("input_dispatched on unknown seat {:?}", seat);
            return;
        };
        if let Some(last) = entry.last_serial {
            if serial <= last {
                warn!(
                    "Seat {:?}: non-monotonic input serial {} (last {})",
                    seat, serial, last
                );
                return;
            }
        }
        entry.last_serial = Some(serial);
    }

    pub fn last_serial(&self, seat: SeatId) -> Option<u32> {
        self.seats.get(&seat).and_then(|s| s.last_serial)
    }

    pub fn is_alive(&self, seat: SeatId) -> bool {
        self.seats.contains_key(&seat)
    }

    pub fn get(&self, seat: SeatId) -> Option<&SeatResource> {
        self.seats.get(&seat)
    }

    /// Validates that `serial` is exactly the seat's most recent input
    /// serial. Unknown seats report [`ShellError::StaleSerial`] as well:
    /// a serial quoted against a dead seat can never be current.
    pub fn check_serial(&self, seat: SeatId, serial: u32) -> Result<(), ShellError> {
        let current = self.last_serial(seat);
        if current == Some(serial) {
            Ok(())
        } else {
            Err(ShellError::StaleSerial {
                seat,
                requested: serial,
                current,
            })
        }
    }

    /// Removes a seat. No-op on unknown ids.
    pub fn remove(&mut self, seat: SeatId) -> bool {
        match self.seats.remove(&seat) {
            Some(mut entry) => {
                entry.resource.destroy();
                debug!("Seat {:?} removed", seat);
                true
            }
            None => false,
        }
    }

    pub fn seats_of_client(&self, client: ClientId) -> Vec<SeatId> {
        let mut ids: Vec<_> = self
            .seats
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
    fn serial_validation_tracks_latest_input() {
        let mut alloc = ObjectIdAllocator::new();
        let mut seats = SeatInputTracker::new();
        let seat = seats.register(alloc.allocate(ClientId(1)));

        // No input dispatched yet: nothing validates.
        assert!(seats.check_serial(seat, 0).is_err());

        seats.input_dispatched(seat, 5);
        assert!(seats.check_serial(seat, 5).is_ok());

        seats.input_dispatched(seat, 6);
        let err = seats.check_serial(seat, 5).unwrap_err();
        assert_eq!(
            err,
            ShellError::StaleSerial {
                seat,
                requested: 5,
                current: Some(6)
            }
        );
    }

    #[test]
    fn non_monotonic_serials_are_ignored() {
        let mut alloc = ObjectIdAllocator::new();
        let mut seats = SeatInputTracker::new();
        let seat = seats.register(alloc.allocate(ClientId(1)));

        seats.input_dispatched(seat, 10);
        seats.input_dispatched(seat, 3);
        assert_eq!(seats.last_serial(seat), Some(10));
    }

    #[test]
    fn removed_seat_never_validates() {
        let mut alloc = ObjectIdAllocator::new();
        let mut seats = SeatInputTracker::new();
        let seat = seats.register(alloc.allocate(ClientId(1)));

        seats.input_dispatched(seat, 1);
        assert!(seats.remove(seat));
        assert!(!seats.is_alive(seat));
        assert!(seats.check_serial(seat, 1).is_err());
        assert!(!seats.remove(seat));
    }
}
