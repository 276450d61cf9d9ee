use std::sync::Arc;
use std::time::Duration;

use tonic::{Code, Request};
use uuid::Uuid;

use event_booking::api::proto::event_booking_server::EventBooking;
use event_booking::api::proto::{
    BookEventRequest, CancelBookingRequest, CreateEventRequest, ListEventsRequest,
};
use event_booking::api::EventBookingService;
use event_booking::metrics::Metrics;
use event_booking::store::InMemoryEventStore;

// ============================================================================
// Black-box API tests - the four RPCs against an in-memory store
// ============================================================================

fn service() -> EventBookingService {
    EventBookingService::new(
        Arc::new(InMemoryEventStore::new()),
        Arc::new(Metrics::new().unwrap()),
        Duration::from_secs(5),
    )
}

async fn create(service: &EventBookingService, name: &str, total: i32) -> String {
    service
        .create_event(Request::new(CreateEventRequest {
            name: name.to_string(),
            total_tickets: total,
        }))
        .await
        .unwrap()
        .into_inner()
        .id
}

#[tokio::test]
async fn test_create_list_book_cancel_over_the_api() {
    let service = service();

    let event_id = create(&service, "RustConf", 10).await;

    let listed = service
        .list_events(Request::new(ListEventsRequest {}))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(listed.events.len(), 1);
    assert_eq!(listed.events[0].id, event_id);
    assert_eq!(listed.events[0].booked_tickets, 0);

    let booked = service
        .book_event(Request::new(BookEventRequest {
            event_id: event_id.clone(),
            num_tickets: 3,
        }))
        .await
        .unwrap()
        .into_inner();
    assert!(booked.success);
    assert_eq!(booked.message, "Booking successful.");

    let cancelled = service
        .cancel_booking(Request::new(CancelBookingRequest {
            event_id: event_id.clone(),
            num_tickets: 3,
        }))
        .await
        .unwrap()
        .into_inner();
    assert!(cancelled.success);
    assert_eq!(cancelled.message, "Cancellation successful.");

    let listed = service
        .list_events(Request::new(ListEventsRequest {}))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(listed.events[0].booked_tickets, 0);
}

#[tokio::test]
async fn test_overbooking_maps_to_failed_precondition() {
    let service = service();
    let event_id = create(&service, "Meetup", 2).await;

    service
        .book_event(Request::new(BookEventRequest {
            event_id: event_id.clone(),
            num_tickets: 2,
        }))
        .await
        .unwrap();

    let status = service
        .book_event(Request::new(BookEventRequest {
            event_id,
            num_tickets: 1,
        }))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::FailedPrecondition);
    assert_eq!(
        status.message(),
        "Not enough tickets available. Only 0 left."
    );
}

#[tokio::test]
async fn test_cancelling_more_than_booked_maps_to_failed_precondition() {
    let service = service();
    let event_id = create(&service, "Meetup", 5).await;

    let status = service
        .cancel_booking(Request::new(CancelBookingRequest {
            event_id,
            num_tickets: 1,
        }))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::FailedPrecondition);
    assert_eq!(status.message(), "Cannot cancel 1 tickets. Only 0 booked.");
}

#[tokio::test]
async fn test_unknown_event_maps_to_not_found() {
    let service = service();
    let missing = Uuid::new_v4().to_string();

    let status = service
        .book_event(Request::new(BookEventRequest {
            event_id: missing.clone(),
            num_tickets: 1,
        }))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::NotFound);
    assert_eq!(
        status.message(),
        format!("Event with ID '{missing}' not found.")
    );
}

#[tokio::test]
async fn test_malformed_input_maps_to_invalid_argument() {
    let service = service();

    let status = service
        .create_event(Request::new(CreateEventRequest {
            name: "  ".to_string(),
            total_tickets: 10,
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    let status = service
        .book_event(Request::new(BookEventRequest {
            event_id: "nonexistent-id".to_string(),
            num_tickets: 1,
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    let event_id = create(&service, "Meetup", 5).await;
    let status = service
        .book_event(Request::new(BookEventRequest {
            event_id,
            num_tickets: 0,
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);
}
