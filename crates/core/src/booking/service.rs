//! Booking service - core business logic

use std::sync::Arc;

use chrono::Utc;
use fieldmachine_domain::validation::validate_reservation_dates;
use fieldmachine_domain::{
    AuthIdentity, Booking, BookingRequest, BookingStatus, FieldMachineError, MachineStatus,
    Result,
};
use tracing::info;
use uuid::Uuid;

use super::ports::BookingRepository;
use crate::machine::ports::MachineRepository;

/// Booking service
pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    machines: Arc<dyn MachineRepository>,
}

impl BookingService {
    /// Create a new booking service
    pub fn new(bookings: Arc<dyn BookingRepository>, machines: Arc<dyn MachineRepository>) -> Self {
        Self { bookings, machines }
    }

    /// Request a booking for a machine over an inclusive date range.
    ///
    /// The range must satisfy the reservation rules (no past start, end after
    /// start, 1..=90 days) and at least the machine's minimum rental length.
    /// A range overlapping a pending or approved booking is rejected with
    /// `Conflict`. The total price is `days x price_day`; the booking starts
    /// out `Pending`.
    pub async fn request_booking(
        &self,
        renter: Option<&AuthIdentity>,
        request: BookingRequest,
    ) -> Result<Booking> {
        let Some(renter) = renter else {
            return Err(FieldMachineError::Unauthenticated(
                "requesting a booking requires an authenticated renter".into(),
            ));
        };

        let today = Utc::now().date_naive();
        validate_reservation_dates(request.start_date, request.end_date, today)?;

        let machine = self
            .machines
            .get_by_id(&request.machine_id)
            .await?
            .ok_or_else(|| FieldMachineError::NotFound(format!("machine {}", request.machine_id)))?;

        if machine.status != MachineStatus::Active {
            return Err(FieldMachineError::Conflict("machine is not available for rental".into()));
        }
        if machine.owner_id == renter.as_str() {
            return Err(FieldMachineError::InvalidInput(
                "owners cannot book their own machines".into(),
            ));
        }

        let days = (request.end_date - request.start_date).num_days();
        if days < machine.min_rental_days {
            return Err(FieldMachineError::InvalidInput(format!(
                "machine requires a minimum rental of {} days",
                machine.min_rental_days
            )));
        }

        let overlapping = self
            .bookings
            .count_overlapping(&machine.id, request.start_date, request.end_date)
            .await?;
        if overlapping > 0 {
            return Err(FieldMachineError::Conflict(
                "machine is already booked for part of this period".into(),
            ));
        }

        let now = Utc::now().timestamp();
        let booking = Booking {
            id: Uuid::new_v4().to_string(),
            machine_id: machine.id.clone(),
            owner_id: machine.owner_id.clone(),
            renter_id: renter.as_str().to_owned(),
            start_date: request.start_date,
            end_date: request.end_date,
            status: BookingStatus::Pending,
            total_price: days as f64 * machine.price_day,
            notes: request.notes,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        };

        self.bookings.insert(booking.clone()).await?;
        info!(booking_id = %booking.id, machine_id = %machine.id, "booking requested");
        Ok(booking)
    }

    /// Owner approves a pending booking
    pub async fn approve_booking(&self, owner: &AuthIdentity, booking_id: &str) -> Result<()> {
        self.owner_decision(owner, booking_id, BookingStatus::Approved).await
    }

    /// Owner rejects a pending booking
    pub async fn reject_booking(&self, owner: &AuthIdentity, booking_id: &str) -> Result<()> {
        self.owner_decision(owner, booking_id, BookingStatus::Rejected).await
    }

    /// Renter cancels a pending or approved booking, giving a reason
    pub async fn cancel_booking(
        &self,
        renter: &AuthIdentity,
        booking_id: &str,
        reason: &str,
    ) -> Result<()> {
        let booking = self.get_booking(booking_id).await?;
        if booking.renter_id != renter.as_str() {
            return Err(FieldMachineError::Unauthenticated(
                "only the renter can cancel a booking".into(),
            ));
        }
        if !booking.status.occupies_calendar() {
            return Err(FieldMachineError::Conflict(format!(
                "booking in status {} cannot be cancelled",
                booking.status.as_str()
            )));
        }
        self.bookings.set_status(booking_id, BookingStatus::Cancelled, Some(reason)).await
    }

    /// Owner marks an approved booking as completed, unlocking reviews
    pub async fn complete_booking(&self, owner: &AuthIdentity, booking_id: &str) -> Result<()> {
        let booking = self.get_booking(booking_id).await?;
        if booking.owner_id != owner.as_str() {
            return Err(FieldMachineError::Unauthenticated(
                "only the owner can complete a booking".into(),
            ));
        }
        if booking.status != BookingStatus::Approved {
            return Err(FieldMachineError::Conflict(
                "only an approved booking can be completed".into(),
            ));
        }
        self.bookings.set_status(booking_id, BookingStatus::Completed, None).await
    }

    /// Bookings requested by a renter
    pub async fn list_renter_bookings(&self, renter: &AuthIdentity) -> Result<Vec<Booking>> {
        self.bookings.list_by_renter(renter.as_str()).await
    }

    /// Bookings against an owner's machines
    pub async fn list_owner_bookings(&self, owner: &AuthIdentity) -> Result<Vec<Booking>> {
        self.bookings.list_by_owner(owner.as_str()).await
    }

    /// Get a booking by id, failing with `NotFound` when absent
    pub async fn get_booking(&self, id: &str) -> Result<Booking> {
        self.bookings
            .get_by_id(id)
            .await?
            .ok_or_else(|| FieldMachineError::NotFound(format!("booking {id}")))
    }

    async fn owner_decision(
        &self,
        owner: &AuthIdentity,
        booking_id: &str,
        decision: BookingStatus,
    ) -> Result<()> {
        let booking = self.get_booking(booking_id).await?;
        if booking.owner_id != owner.as_str() {
            return Err(FieldMachineError::Unauthenticated(
                "only the owner can decide on a booking".into(),
            ));
        }
        if booking.status != BookingStatus::Pending {
            return Err(FieldMachineError::Conflict(format!(
                "booking in status {} cannot be decided",
                booking.status.as_str()
            )));
        }
        self.bookings.set_status(booking_id, decision, None).await
    }
}
