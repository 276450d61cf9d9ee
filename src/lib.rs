//! Event ticket booking service.
//!
//! A gRPC service managing a finite, shared pool of tickets per event. The
//! store layer enforces the capacity invariant with atomic conditional
//! updates, the booking engine translates booking and cancellation intents
//! into store operations, and the API layer maps domain outcomes onto gRPC
//! statuses.

pub mod api;
pub mod booking;
pub mod config;
pub mod domain;
pub mod metrics;
pub mod store;
pub mod utils;
