//! Review repository implementation using SQLite

use std::sync::Arc;

use async_trait::async_trait;
use fieldmachine_core::review::ports::ReviewRepository;
use fieldmachine_domain::{Result as DomainResult, Review};
use rusqlite::{params, Row};
use tokio::task;

use super::manager::{map_sql_error, DbManager};
use super::profile_repository::map_join_error;

const REVIEW_COLUMNS: &str = "id, booking_id, reviewer_id, reviewed_id, rating, comment, created_at";

/// SQLite-backed implementation of `ReviewRepository`
pub struct SqliteReviewRepository {
    db: Arc<DbManager>,
}

impl SqliteReviewRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReviewRepository for SqliteReviewRepository {
    async fn insert(&self, review: Review) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO reviews (
                    id, booking_id, reviewer_id, reviewed_id, rating, comment, created_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    &review.id,
                    &review.booking_id,
                    &review.reviewer_id,
                    &review.reviewed_id,
                    &review.rating,
                    &review.comment,
                    &review.created_at,
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get_for_booking(
        &self,
        booking_id: &str,
        reviewer_id: &str,
    ) -> DomainResult<Option<Review>> {
        let db = Arc::clone(&self.db);
        let booking_id = booking_id.to_owned();
        let reviewer_id = reviewer_id.to_owned();

        task::spawn_blocking(move || -> DomainResult<Option<Review>> {
            let conn = db.get_connection()?;
            let result = conn.query_row(
                &format!(
                    "SELECT {REVIEW_COLUMNS} FROM reviews
                     WHERE booking_id = ?1 AND reviewer_id = ?2"
                ),
                params![&booking_id, &reviewer_id],
                map_review_row,
            );
            match result {
                Ok(review) => Ok(Some(review)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(map_sql_error(err)),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_for_reviewed(&self, reviewed_id: &str) -> DomainResult<Vec<Review>> {
        let db = Arc::clone(&self.db);
        let reviewed_id = reviewed_id.to_owned();

        task::spawn_blocking(move || -> DomainResult<Vec<Review>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {REVIEW_COLUMNS} FROM reviews
                     WHERE reviewed_id = ?1 ORDER BY created_at DESC"
                ))
                .map_err(map_sql_error)?;
            let reviews = stmt
                .query_map(params![&reviewed_id], map_review_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            Ok(reviews)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn average_rating(&self, reviewed_id: &str) -> DomainResult<Option<f64>> {
        let db = Arc::clone(&self.db);
        let reviewed_id = reviewed_id.to_owned();

        task::spawn_blocking(move || -> DomainResult<Option<f64>> {
            let conn = db.get_connection()?;
            // AVG over zero rows yields NULL
            conn.query_row(
                "SELECT AVG(rating) FROM reviews WHERE reviewed_id = ?1",
                params![&reviewed_id],
                |row| row.get(0),
            )
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

/// Map a row to a Review
fn map_review_row(row: &Row<'_>) -> rusqlite::Result<Review> {
    Ok(Review {
        id: row.get(0)?,
        booking_id: row.get(1)?,
        reviewer_id: row.get(2)?,
        reviewed_id: row.get(3)?,
        rating: row.get(4)?,
        comment: row.get(5)?,
        created_at: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use fieldmachine_domain::FieldMachineError;
    use tempfile::TempDir;

    use super::*;

    fn setup_test_db() -> (Arc<DbManager>, TempDir) {
        let temp_dir = TempDir::new().expect("create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let manager = DbManager::new(db_path, 5).expect("create db manager");
        manager.run_migrations().expect("run migrations");
        (Arc::new(manager), temp_dir)
    }

    fn insert_booking(db: &Arc<DbManager>, id: &str) {
        let conn = db.get_connection().expect("conn");
        conn.execute(
            "INSERT INTO machines (id, owner_id, name, category, price_day, min_rental_days,
                                   status, created_at, updated_at)
             VALUES ('m-1', 'owner-1', 'Trator', 'tractor', 1000.0, 1, 'active', 0, 0)
             ON CONFLICT(id) DO NOTHING",
            [],
        )
        .expect("insert machine");
        conn.execute(
            "INSERT INTO bookings (id, machine_id, owner_id, renter_id, start_date, end_date,
                                   status, total_price, created_at, updated_at)
             VALUES (?1, 'm-1', 'owner-1', 'renter-1', '2026-09-01', '2026-09-04',
                     'completed', 3000.0, 0, 0)",
            params![id],
        )
        .expect("insert booking");
    }

    fn test_review(id: &str, booking_id: &str, rating: i32) -> Review {
        Review {
            id: id.into(),
            booking_id: booking_id.into(),
            reviewer_id: "renter-1".into(),
            reviewed_id: "owner-1".into(),
            rating,
            comment: Some("Máquina em ótimo estado".into()),
            created_at: 1_700_000_000,
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn insert_and_fetch_for_booking() {
        let (db, _temp_dir) = setup_test_db();
        insert_booking(&db, "b-1");
        let repo = SqliteReviewRepository::new(db);

        repo.insert(test_review("r-1", "b-1", 5)).await.expect("insert");

        let review = repo
            .get_for_booking("b-1", "renter-1")
            .await
            .expect("get")
            .expect("present");
        assert_eq!(review.rating, 5);
        assert!(repo
            .get_for_booking("b-1", "someone-else")
            .await
            .expect("get")
            .is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn duplicate_review_for_booking_is_conflict() {
        let (db, _temp_dir) = setup_test_db();
        insert_booking(&db, "b-1");
        let repo = SqliteReviewRepository::new(db);

        repo.insert(test_review("r-1", "b-1", 5)).await.expect("first insert");
        let result = repo.insert(test_review("r-2", "b-1", 3)).await;
        assert!(matches!(result, Err(FieldMachineError::Conflict(_))));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn average_rating_over_received_reviews() {
        let (db, _temp_dir) = setup_test_db();
        insert_booking(&db, "b-1");
        insert_booking(&db, "b-2");
        let repo = SqliteReviewRepository::new(db);

        repo.insert(test_review("r-1", "b-1", 5)).await.expect("first review");
        repo.insert(test_review("r-2", "b-2", 4)).await.expect("second review");

        let average = repo.average_rating("owner-1").await.expect("average");
        assert_eq!(average, Some(4.5));
        assert_eq!(repo.average_rating("nobody").await.expect("empty"), None);

        let received = repo.list_for_reviewed("owner-1").await.expect("list");
        assert_eq!(received.len(), 2);
    }
}
