//! Port interfaces for bookings

use async_trait::async_trait;
use chrono::NaiveDate;
use fieldmachine_domain::{Booking, BookingStatus, Result};

/// Trait for booking persistence and calendar queries
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Get a booking by id
    async fn get_by_id(&self, id: &str) -> Result<Option<Booking>>;

    /// Insert a new booking
    async fn insert(&self, booking: Booking) -> Result<()>;

    /// Update the status (and optional cancellation reason) of a booking
    async fn set_status(
        &self,
        id: &str,
        status: BookingStatus,
        cancellation_reason: Option<&str>,
    ) -> Result<()>;

    /// Count pending/approved bookings overlapping the inclusive date range
    async fn count_overlapping(
        &self,
        machine_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<i64>;

    /// Bookings requested by a renter, newest first
    async fn list_by_renter(&self, renter_id: &str) -> Result<Vec<Booking>>;

    /// Bookings against an owner's machines, newest first
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Booking>>;
}
