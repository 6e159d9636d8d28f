//! Reviews for completed bookings and owner rating aggregation.

pub mod ports;
pub mod service;

pub use service::ReviewService;
