//! Request sequencing for views.
//!
//! A view issues a [`Ticket`] when a fetch starts and applies the response
//! only if that ticket is still the latest one. Responses to superseded
//! requests are dropped, so a slow answer to an old filter cannot overwrite
//! the result of a newer one.

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// Monotonic ticket issuer.
#[derive(Debug, Default, Clone)]
pub struct RequestSequencer {
    latest: u64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket, superseding every earlier one.
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    /// Whether a response for `ticket` may still be applied.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }

    /// Supersede all outstanding tickets without starting a request.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }
}
