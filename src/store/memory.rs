use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::event::{BookingError, Event};

use super::{validate_delta, validate_new_event, EventStore};

// ============================================================================
// In-Memory Event Store
// ============================================================================

/// In-memory event store for tests and local development.
///
/// Every `adjust_booking` runs under the map's write lock, so the
/// locate-check-write sequence is one critical section and concurrent
/// adjusts on the same event are serialized. State does not survive a
/// restart.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    events: RwLock<HashMap<Uuid, Event>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn create_event(&self, name: &str, total_tickets: i32) -> Result<Event, BookingError> {
        validate_new_event(name, total_tickets)?;

        let event = Event {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            total_tickets,
            booked_tickets: 0,
        };

        let mut events = self.events.write().map_err(|_| lock_poisoned())?;
        events.insert(event.id, event.clone());

        tracing::debug!(
            event_id = %event.id,
            name = %event.name,
            total_tickets,
            "created event"
        );
        Ok(event)
    }

    async fn list_events(&self) -> Result<Vec<Event>, BookingError> {
        let events = self.events.read().map_err(|_| lock_poisoned())?;

        let mut all: Vec<Event> = events.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn adjust_booking(&self, event_id: Uuid, delta: i32) -> Result<Event, BookingError> {
        validate_delta(delta)?;

        let mut events = self.events.write().map_err(|_| lock_poisoned())?;
        let event = events
            .get_mut(&event_id)
            .ok_or(BookingError::EventNotFound(event_id))?;

        // Widened so `booked + delta` cannot wrap.
        let new_booked = i64::from(event.booked_tickets) + i64::from(delta);

        if delta > 0 && new_booked > i64::from(event.total_tickets) {
            return Err(BookingError::CapacityExceeded {
                requested: delta.into(),
                remaining: event.remaining_tickets().into(),
            });
        }
        if new_booked < 0 {
            return Err(BookingError::InsufficientBooked {
                requested: -i64::from(delta),
                booked: event.booked_tickets.into(),
            });
        }

        event.booked_tickets = new_booked as i32;
        tracing::debug!(
            event_id = %event_id,
            delta,
            booked_tickets = event.booked_tickets,
            "adjusted booking"
        );
        Ok(event.clone())
    }
}

fn lock_poisoned() -> BookingError {
    BookingError::StorageUnavailable("event map lock poisoned".to_string())
}
