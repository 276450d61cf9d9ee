// ============================================================================
// gRPC API - Transport Surface for the Booking Engine
// ============================================================================

pub mod service;

pub use service::EventBookingService;

/// Generated protobuf/gRPC types for the `event_booking` package.
pub mod proto {
    tonic::include_proto!("event_booking");

    /// Compiled descriptor set, served by the reflection service.
    pub const FILE_DESCRIPTOR_SET: &[u8] =
        tonic::include_file_descriptor_set!("event_booking_descriptor");
}

impl From<crate::domain::event::Event> for proto::Event {
    fn from(event: crate::domain::event::Event) -> Self {
        Self {
            id: event.id.to_string(),
            name: event.name,
            total_tickets: event.total_tickets,
            booked_tickets: event.booked_tickets,
        }
    }
}
