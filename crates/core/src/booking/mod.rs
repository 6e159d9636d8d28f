//! Bookings: requests, owner decisions, cancellation, and completion.

pub mod ports;
pub mod service;

pub use service::BookingService;
