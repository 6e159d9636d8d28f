//! Booking repository implementation using SQLite
//!
//! Dates are stored as ISO `YYYY-MM-DD` text, which makes lexicographic
//! comparison equal to chronological comparison in the overlap query.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use fieldmachine_core::booking::ports::BookingRepository;
use fieldmachine_domain::{
    Booking, BookingStatus, FieldMachineError, Result as DomainResult,
};
use rusqlite::{params, Row};
use tokio::task;

use super::manager::{map_sql_error, DbManager};
use super::profile_repository::map_join_error;

const BOOKING_COLUMNS: &str = "id, machine_id, owner_id, renter_id, start_date, end_date,
        status, total_price, notes, cancellation_reason, created_at, updated_at";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite-backed implementation of `BookingRepository`
pub struct SqliteBookingRepository {
    db: Arc<DbManager>,
}

impl SqliteBookingRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    async fn list_by_column(&self, column: &'static str, value: &str) -> DomainResult<Vec<Booking>> {
        let db = Arc::clone(&self.db);
        let value = value.to_owned();

        task::spawn_blocking(move || -> DomainResult<Vec<Booking>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {BOOKING_COLUMNS} FROM bookings
                     WHERE {column} = ?1 ORDER BY created_at DESC"
                ))
                .map_err(map_sql_error)?;
            let bookings = stmt
                .query_map(params![&value], map_booking_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            Ok(bookings)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepository {
    async fn get_by_id(&self, id: &str) -> DomainResult<Option<Booking>> {
        let db = Arc::clone(&self.db);
        let id = id.to_owned();

        task::spawn_blocking(move || -> DomainResult<Option<Booking>> {
            let conn = db.get_connection()?;
            let result = conn.query_row(
                &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
                params![&id],
                map_booking_row,
            );
            match result {
                Ok(booking) => Ok(Some(booking)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(map_sql_error(err)),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn insert(&self, booking: Booking) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO bookings (
                    id, machine_id, owner_id, renter_id, start_date, end_date,
                    status, total_price, notes, cancellation_reason, created_at, updated_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    &booking.id,
                    &booking.machine_id,
                    &booking.owner_id,
                    &booking.renter_id,
                    booking.start_date.format(DATE_FORMAT).to_string(),
                    booking.end_date.format(DATE_FORMAT).to_string(),
                    booking.status.as_str(),
                    &booking.total_price,
                    &booking.notes,
                    &booking.cancellation_reason,
                    &booking.created_at,
                    &booking.updated_at,
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn set_status(
        &self,
        id: &str,
        status: BookingStatus,
        cancellation_reason: Option<&str>,
    ) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let id = id.to_owned();
        let reason = cancellation_reason.map(str::to_owned);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let updated = conn
                .execute(
                    "UPDATE bookings
                     SET status = ?1, cancellation_reason = ?2,
                         updated_at = CAST(strftime('%s','now') AS INTEGER)
                     WHERE id = ?3",
                    params![status.as_str(), &reason, &id],
                )
                .map_err(map_sql_error)?;
            if updated == 0 {
                return Err(FieldMachineError::NotFound(format!("booking {id}")));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn count_overlapping(
        &self,
        machine_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> DomainResult<i64> {
        let db = Arc::clone(&self.db);
        let machine_id = machine_id.to_owned();

        task::spawn_blocking(move || -> DomainResult<i64> {
            let conn = db.get_connection()?;
            conn.query_row(
                "SELECT COUNT(*) FROM bookings
                 WHERE machine_id = ?1
                   AND status IN ('pending', 'approved')
                   AND start_date <= ?2
                   AND end_date >= ?3",
                params![
                    &machine_id,
                    end_date.format(DATE_FORMAT).to_string(),
                    start_date.format(DATE_FORMAT).to_string(),
                ],
                |row| row.get(0),
            )
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_by_renter(&self, renter_id: &str) -> DomainResult<Vec<Booking>> {
        self.list_by_column("renter_id", renter_id).await
    }

    async fn list_by_owner(&self, owner_id: &str) -> DomainResult<Vec<Booking>> {
        self.list_by_column("owner_id", owner_id).await
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Map a row to a Booking
fn map_booking_row(row: &Row<'_>) -> rusqlite::Result<Booking> {
    let start: String = row.get(4)?;
    let end: String = row.get(5)?;
    let status: String = row.get(6)?;
    Ok(Booking {
        id: row.get(0)?,
        machine_id: row.get(1)?,
        owner_id: row.get(2)?,
        renter_id: row.get(3)?,
        start_date: parse_date(&start, 4)?,
        end_date: parse_date(&end, 5)?,
        status: BookingStatus::parse(&status).unwrap_or(BookingStatus::Pending),
        total_price: row.get(7)?,
        notes: row.get(8)?,
        cancellation_reason: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

fn parse_date(value: &str, column: usize) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            rusqlite::types::Type::Text,
            Box::new(err),
        )
    })
}
