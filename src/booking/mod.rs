use std::sync::Arc;

use uuid::Uuid;

use crate::domain::event::{BookingError, Event};
use crate::store::EventStore;

// ============================================================================
// Booking Engine
// ============================================================================
//
// Orchestrates: intent (book / cancel) → conditional adjust → result.
//
// The engine holds no state between calls; the store's durable records are
// the only shared mutable resource, and the store is the only place where
// concurrency is enforced. Business-rule rejections are never retried here;
// retrying is a caller decision.
//
// ============================================================================

/// Outcome of a successful booking or cancellation.
#[derive(Debug, Clone)]
pub struct BookingConfirmation {
    /// The event record as stored after the adjustment.
    pub event: Event,
    /// Human-readable confirmation for the caller.
    pub message: String,
}

pub struct BookingEngine {
    store: Arc<dyn EventStore>,
}

impl BookingEngine {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Book `num_tickets` tickets on `event_id`.
    ///
    /// `num_tickets` must be positive. Rejections (`EventNotFound`,
    /// `CapacityExceeded`) propagate with the counts observed at the
    /// store's serialization point.
    pub async fn book(
        &self,
        event_id: Uuid,
        num_tickets: i32,
    ) -> Result<BookingConfirmation, BookingError> {
        validate_ticket_count(num_tickets)?;

        let event = self.store.adjust_booking(event_id, num_tickets).await?;

        tracing::info!(
            event_id = %event_id,
            num_tickets,
            booked_tickets = event.booked_tickets,
            "booked tickets"
        );
        Ok(BookingConfirmation {
            message: "Booking successful.".to_string(),
            event,
        })
    }

    /// Cancel `num_tickets` previously booked tickets on `event_id`.
    ///
    /// `num_tickets` must be positive. Rejections (`EventNotFound`,
    /// `InsufficientBooked`) propagate with the counts observed at the
    /// store's serialization point.
    pub async fn cancel(
        &self,
        event_id: Uuid,
        num_tickets: i32,
    ) -> Result<BookingConfirmation, BookingError> {
        validate_ticket_count(num_tickets)?;

        let event = self.store.adjust_booking(event_id, -num_tickets).await?;

        tracing::info!(
            event_id = %event_id,
            num_tickets,
            booked_tickets = event.booked_tickets,
            "cancelled tickets"
        );
        Ok(BookingConfirmation {
            message: "Cancellation successful.".to_string(),
            event,
        })
    }
}

fn validate_ticket_count(num_tickets: i32) -> Result<(), BookingError> {
    if num_tickets <= 0 {
        return Err(BookingError::InvalidArgument(format!(
            "num_tickets must be positive, got {num_tickets}"
        )));
    }
    Ok(())
}
