use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tonic::{Request, Response, Status};
use uuid::Uuid;

use crate::booking::BookingEngine;
use crate::domain::event::BookingError;
use crate::metrics::Metrics;
use crate::store::EventStore;

use super::proto::event_booking_server::EventBooking;
use super::proto::{
    BookEventRequest, BookingResponse, CancelBookingRequest, CreateEventRequest, Event,
    ListEventsRequest, ListEventsResponse,
};

// ============================================================================
// EventBooking gRPC Service
// ============================================================================
//
// Thin wrapper: parse and validate wire input, invoke the engine or store,
// map domain outcomes onto gRPC statuses, record metrics. No business
// decisions happen here.
//
// Status mapping:
//   InvalidArgument    → INVALID_ARGUMENT
//   EventNotFound      → NOT_FOUND
//   CapacityExceeded   → FAILED_PRECONDITION
//   InsufficientBooked → FAILED_PRECONDITION
//   StorageUnavailable → UNAVAILABLE
//   deadline expiry    → DEADLINE_EXCEEDED
//
// ============================================================================

pub struct EventBookingService {
    store: Arc<dyn EventStore>,
    engine: BookingEngine,
    metrics: Arc<Metrics>,
    request_timeout: Duration,
}

impl EventBookingService {
    pub fn new(
        store: Arc<dyn EventStore>,
        metrics: Arc<Metrics>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            engine: BookingEngine::new(store.clone()),
            store,
            metrics,
            request_timeout,
        }
    }

    /// Run one RPC body under the request deadline, recording outcome and
    /// latency. Expiry abandons the wait and reports DEADLINE_EXCEEDED,
    /// kept distinct from business-rule rejections.
    async fn run_rpc<T>(
        &self,
        rpc: &'static str,
        fut: impl Future<Output = Result<T, BookingError>>,
    ) -> Result<T, Status> {
        let timer = self
            .metrics
            .request_duration
            .with_label_values(&[rpc])
            .start_timer();
        let result = tokio::time::timeout(self.request_timeout, fut).await;
        timer.observe_duration();

        match result {
            Ok(Ok(value)) => {
                self.metrics
                    .requests_total
                    .with_label_values(&[rpc, "ok"])
                    .inc();
                Ok(value)
            }
            Ok(Err(err)) => {
                self.metrics
                    .requests_total
                    .with_label_values(&[rpc, outcome_label(&err)])
                    .inc();
                Err(into_status(err))
            }
            Err(_) => {
                self.metrics
                    .requests_total
                    .with_label_values(&[rpc, "timeout"])
                    .inc();
                Err(Status::deadline_exceeded(format!(
                    "{rpc} did not complete within the request deadline"
                )))
            }
        }
    }
}

#[tonic::async_trait]
impl EventBooking for EventBookingService {
    async fn create_event(
        &self,
        request: Request<CreateEventRequest>,
    ) -> Result<Response<Event>, Status> {
        let req = request.into_inner();
        tracing::info!(name = %req.name, total_tickets = req.total_tickets, "CreateEvent request");

        let event = self
            .run_rpc(
                "create_event",
                self.store.create_event(&req.name, req.total_tickets),
            )
            .await?;

        Ok(Response::new(event.into()))
    }

    async fn list_events(
        &self,
        _request: Request<ListEventsRequest>,
    ) -> Result<Response<ListEventsResponse>, Status> {
        tracing::debug!("ListEvents request");

        let events = self.run_rpc("list_events", self.store.list_events()).await?;

        Ok(Response::new(ListEventsResponse {
            events: events.into_iter().map(Into::into).collect(),
        }))
    }

    async fn book_event(
        &self,
        request: Request<BookEventRequest>,
    ) -> Result<Response<BookingResponse>, Status> {
        let req = request.into_inner();
        let event_id = parse_event_id(&req.event_id)?;
        tracing::info!(event_id = %event_id, num_tickets = req.num_tickets, "BookEvent request");

        let confirmation = self
            .run_rpc("book_event", self.engine.book(event_id, req.num_tickets))
            .await?;

        self.metrics.tickets_booked.inc_by(req.num_tickets as u64);
        Ok(Response::new(BookingResponse {
            success: true,
            message: confirmation.message,
        }))
    }

    async fn cancel_booking(
        &self,
        request: Request<CancelBookingRequest>,
    ) -> Result<Response<BookingResponse>, Status> {
        let req = request.into_inner();
        let event_id = parse_event_id(&req.event_id)?;
        tracing::info!(event_id = %event_id, num_tickets = req.num_tickets, "CancelBooking request");

        let confirmation = self
            .run_rpc(
                "cancel_booking",
                self.engine.cancel(event_id, req.num_tickets),
            )
            .await?;

        self.metrics
            .tickets_cancelled
            .inc_by(req.num_tickets as u64);
        Ok(Response::new(BookingResponse {
            success: true,
            message: confirmation.message,
        }))
    }
}

fn parse_event_id(raw: &str) -> Result<Uuid, Status> {
    Uuid::parse_str(raw)
        .map_err(|_| Status::invalid_argument(format!("'{raw}' is not a valid event id")))
}

fn into_status(err: BookingError) -> Status {
    match &err {
        BookingError::InvalidArgument(_) => Status::invalid_argument(err.to_string()),
        BookingError::EventNotFound(id) => {
            Status::not_found(format!("Event with ID '{id}' not found."))
        }
        BookingError::CapacityExceeded { remaining, .. } => Status::failed_precondition(format!(
            "Not enough tickets available. Only {remaining} left."
        )),
        BookingError::InsufficientBooked { requested, booked } => Status::failed_precondition(
            format!("Cannot cancel {requested} tickets. Only {booked} booked."),
        ),
        BookingError::StorageUnavailable(_) => Status::unavailable(err.to_string()),
    }
}

fn outcome_label(err: &BookingError) -> &'static str {
    match err {
        BookingError::InvalidArgument(_) => "invalid_argument",
        BookingError::EventNotFound(_) => "not_found",
        BookingError::CapacityExceeded { .. } => "capacity_exceeded",
        BookingError::InsufficientBooked { .. } => "insufficient_booked",
        BookingError::StorageUnavailable(_) => "unavailable",
    }
}
