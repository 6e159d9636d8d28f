//! Port interfaces for reviews

use async_trait::async_trait;
use fieldmachine_domain::{Result, Review};

/// Trait for review persistence and rating aggregation
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Insert a new review
    async fn insert(&self, review: Review) -> Result<()>;

    /// The review left for a booking by a reviewer, if any
    async fn get_for_booking(&self, booking_id: &str, reviewer_id: &str)
        -> Result<Option<Review>>;

    /// All reviews received by a user, newest first
    async fn list_for_reviewed(&self, reviewed_id: &str) -> Result<Vec<Review>>;

    /// Average rating received by a user, `None` when unreviewed
    async fn average_rating(&self, reviewed_id: &str) -> Result<Option<f64>>;
}
