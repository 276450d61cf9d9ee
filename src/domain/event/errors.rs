use uuid::Uuid;

use crate::utils::IsTransient;

// ============================================================================
// Booking Errors - Business Rules and Infrastructure
// ============================================================================
//
// One taxonomy for everything a store or engine operation can signal:
//
// - InvalidArgument:     malformed input, caller's fault, not retryable as-is
// - EventNotFound:       no such event, not retryable
// - CapacityExceeded:    business-rule rejection of a booking
// - InsufficientBooked:  business-rule rejection of a cancellation
// - StorageUnavailable:  transient infrastructure fault, retryable with backoff
//
// Business-rule rejections carry the counts observed at the serialization
// point so callers can decide whether to retry with adjusted parameters.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("event '{0}' not found")]
    EventNotFound(Uuid),

    #[error("not enough tickets available: requested {requested}, only {remaining} left")]
    CapacityExceeded { requested: i64, remaining: i64 },

    #[error("cannot cancel {requested} tickets, only {booked} currently booked")]
    InsufficientBooked { requested: i64, booked: i64 },

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl IsTransient for BookingError {
    fn is_transient(&self) -> bool {
        matches!(self, BookingError::StorageUnavailable(_))
    }
}
