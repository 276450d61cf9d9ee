use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Event Record
// ============================================================================

/// A bookable event with a fixed ticket capacity and a mutable booked count.
///
/// The store exclusively owns the persisted state and hands records out by
/// value. `booked_tickets` changes only through the store's conditional
/// adjust, which maintains `0 <= booked_tickets <= total_tickets` at every
/// observable point.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Event {
    /// Assigned by the store at creation time, immutable thereafter.
    pub id: Uuid,
    /// Non-empty label, immutable after creation.
    pub name: String,
    /// Capacity, fixed at creation.
    pub total_tickets: i32,
    pub booked_tickets: i32,
}

impl Event {
    /// Tickets still available for booking.
    pub fn remaining_tickets(&self) -> i32 {
        self.total_tickets - self.booked_tickets
    }
}
