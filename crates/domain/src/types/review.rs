//! Review types

use serde::{Deserialize, Serialize};

/// A review left by a renter against the owner of a completed booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub booking_id: String,
    pub reviewer_id: String,
    pub reviewed_id: String,
    /// Overall rating, 1 to 5.
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: i64,
}

/// Payload for submitting a review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReview {
    pub booking_id: String,
    pub rating: i32,
    pub comment: Option<String>,
}
