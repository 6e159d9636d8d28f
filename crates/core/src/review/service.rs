//! Review service - core business logic

use std::sync::Arc;

use chrono::Utc;
use fieldmachine_domain::constants::{MAX_REVIEW_RATING, MIN_REVIEW_RATING};
use fieldmachine_domain::{
    AuthIdentity, BookingStatus, FieldMachineError, NewReview, Result, Review,
};
use tracing::info;
use uuid::Uuid;

use super::ports::ReviewRepository;
use crate::booking::ports::BookingRepository;

/// Review service
pub struct ReviewService {
    reviews: Arc<dyn ReviewRepository>,
    bookings: Arc<dyn BookingRepository>,
}

impl ReviewService {
    /// Create a new review service
    pub fn new(reviews: Arc<dyn ReviewRepository>, bookings: Arc<dyn BookingRepository>) -> Self {
        Self { reviews, bookings }
    }

    /// Submit a review for a completed booking.
    ///
    /// Only the renter of a completed booking may review it, at most once;
    /// the rating must be between 1 and 5.
    pub async fn submit_review(
        &self,
        reviewer: Option<&AuthIdentity>,
        payload: NewReview,
    ) -> Result<Review> {
        let Some(reviewer) = reviewer else {
            return Err(FieldMachineError::Unauthenticated(
                "submitting a review requires an authenticated caller".into(),
            ));
        };

        if !(MIN_REVIEW_RATING..=MAX_REVIEW_RATING).contains(&payload.rating) {
            return Err(FieldMachineError::InvalidInput(format!(
                "rating must be between {MIN_REVIEW_RATING} and {MAX_REVIEW_RATING}"
            )));
        }

        let booking = self
            .bookings
            .get_by_id(&payload.booking_id)
            .await?
            .ok_or_else(|| FieldMachineError::NotFound(format!("booking {}", payload.booking_id)))?;

        if booking.renter_id != reviewer.as_str() {
            return Err(FieldMachineError::Unauthenticated(
                "only the renter of a booking can review it".into(),
            ));
        }
        if booking.status != BookingStatus::Completed {
            return Err(FieldMachineError::Conflict(
                "only a completed booking can be reviewed".into(),
            ));
        }
        if self.reviews.get_for_booking(&booking.id, reviewer.as_str()).await?.is_some() {
            return Err(FieldMachineError::Conflict("booking has already been reviewed".into()));
        }

        let review = Review {
            id: Uuid::new_v4().to_string(),
            booking_id: booking.id.clone(),
            reviewer_id: reviewer.as_str().to_owned(),
            reviewed_id: booking.owner_id.clone(),
            rating: payload.rating,
            comment: payload.comment,
            created_at: Utc::now().timestamp(),
        };

        self.reviews.insert(review.clone()).await?;
        info!(review_id = %review.id, booking_id = %booking.id, "review submitted");
        Ok(review)
    }

    /// All reviews received by a user
    pub async fn list_received_reviews(&self, reviewed: &AuthIdentity) -> Result<Vec<Review>> {
        self.reviews.list_for_reviewed(reviewed.as_str()).await
    }

    /// Aggregate rating received by a user, recomputed from stored reviews
    pub async fn user_rating(&self, reviewed: &AuthIdentity) -> Result<Option<f64>> {
        self.reviews.average_rating(reviewed.as_str()).await
    }
}
