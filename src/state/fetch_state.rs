//! Fetch state definitions for one frontier item
//!
//! An item moves `Pending -> Fetching` and then lands in exactly one of the
//! terminal states. A redirect does not continue the same item: the target
//! is admitted as a new item, so `Redirected` is terminal for this one.

use std::fmt;

/// Represents the current state of a frontier item in the fetch process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchState {
    // ===== Active States =====
    /// Item is queued and waiting for a worker
    Pending,

    /// Request is in flight
    Fetching,

    // ===== Terminal States =====
    /// Redirect followed; the target was admitted with one less redirect
    Redirected,

    /// Redirect abandoned: budget exhausted, loop, out of scope or no Location
    RedirectDropped,

    /// Response received and recorded as a `FetchOutcome`
    Completed,

    /// Connection, timeout or protocol failure; nothing recorded
    TransportFailed,
}

impl FetchState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending | Self::Fetching)
    }

    /// Returns true if a `FetchOutcome` is recorded for this state
    pub fn records_outcome(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns true if the transition `self -> next` is part of the state machine
    pub fn can_transition_to(&self, next: FetchState) -> bool {
        match self {
            Self::Pending => next == Self::Fetching,
            Self::Fetching => next.is_terminal(),
            _ => false,
        }
    }

    /// Short lowercase name, used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Redirected => "redirected",
            Self::RedirectDropped => "redirect_dropped",
            Self::Completed => "completed",
            Self::TransportFailed => "transport_failed",
        }
    }
}

impl fmt::Display for FetchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
