use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::event::{BookingError, Event};

pub mod memory;
pub mod postgres;

// Re-export for convenience
pub use memory::InMemoryEventStore;
pub use postgres::PostgresEventStore;

// ============================================================================
// Event Store - Repository for Events
// ============================================================================
//
// The store is the ONLY place where concurrent mutation correctness is
// enforced. `adjust_booking` performs the locate-check-write sequence as a
// single indivisible unit per event id; no other code path writes
// `booked_tickets`.
//
// ============================================================================

/// Durable mapping from event id to event record.
///
/// Implementations must serialize concurrent `adjust_booking` calls on the
/// same event id so that the final booked count reflects every successful
/// adjustment and the capacity invariant holds at every observable point.
/// Adjustments on different event ids must not block each other.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Create a new event with a fresh random id and zero booked tickets.
    ///
    /// `name` must be non-empty after trimming and `total_tickets`
    /// non-negative, otherwise `InvalidArgument`.
    async fn create_event(&self, name: &str, total_tickets: i32) -> Result<Event, BookingError>;

    /// All currently known events.
    ///
    /// The returned order is an implementation detail (both shipped stores
    /// order by name, then id); callers must not depend on it.
    async fn list_events(&self) -> Result<Vec<Event>, BookingError>;

    /// Atomically add `delta` to the booked count: positive to book,
    /// negative to cancel, zero rejected as `InvalidArgument`.
    ///
    /// As one indivisible unit with respect to any concurrent adjust on the
    /// same id, the store locates the event, verifies
    /// `0 <= booked_tickets + delta <= total_tickets`, and either persists
    /// the new count and returns the updated record, or leaves stored state
    /// unchanged and signals `EventNotFound`, `CapacityExceeded`, or
    /// `InsufficientBooked`.
    async fn adjust_booking(&self, event_id: Uuid, delta: i32) -> Result<Event, BookingError>;
}

pub(crate) fn validate_new_event(name: &str, total_tickets: i32) -> Result<(), BookingError> {
    if name.trim().is_empty() {
        return Err(BookingError::InvalidArgument(
            "event name must not be empty".to_string(),
        ));
    }
    if total_tickets < 0 {
        return Err(BookingError::InvalidArgument(format!(
            "total_tickets must be non-negative, got {total_tickets}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_delta(delta: i32) -> Result<(), BookingError> {
    if delta == 0 {
        return Err(BookingError::InvalidArgument(
            "booking adjustment must be non-zero".to_string(),
        ));
    }
    Ok(())
}
