//! User profile repository implementation using SQLite
//!
//! Provides persistence for profile data with insert-or-replace semantics
//! conflict-keyed on `auth_user_id`. The upsert replaces only the payload
//! columns; row id, `created_at`, and the aggregate counters survive, so
//! retrying an identical update leaves identical stored state.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use fieldmachine_core::profile::ports::ProfileRepository;
use fieldmachine_domain::{AuthIdentity, FieldMachineError, Result as DomainResult, UserProfile};
use rusqlite::{params, Row};
use tokio::task;

use super::manager::{map_sql_error, DbManager};

const PROFILE_COLUMNS: &str = "id, auth_user_id, full_name, phone, cpf_cnpj, address,
        profile_image, rating, total_rentals, verified, created_at, updated_at";

/// SQLite-backed implementation of `ProfileRepository`
pub struct SqliteProfileRepository {
    db: Arc<DbManager>,
}

impl SqliteProfileRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileRepository for SqliteProfileRepository {
    async fn get_by_identity(&self, identity: &AuthIdentity) -> DomainResult<Option<UserProfile>> {
        let db = Arc::clone(&self.db);
        let auth_user_id = identity.as_str().to_owned();

        task::spawn_blocking(move || -> DomainResult<Option<UserProfile>> {
            let conn = db.get_connection()?;

            let result = conn.query_row(
                &format!("SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE auth_user_id = ?1"),
                params![&auth_user_id],
                map_profile_row,
            );

            match result {
                Ok(profile) => Ok(Some(profile)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(map_sql_error(err)),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn upsert(&self, profile: UserProfile) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let address_json = encode_address(profile.address.as_ref())?;

            // Single atomic statement; the conflict target is the identity
            // column. Only the payload columns are replaced on conflict.
            conn.execute(
                "INSERT INTO user_profiles (
                    id, auth_user_id, full_name, phone, cpf_cnpj, address,
                    profile_image, rating, total_rentals, verified, created_at, updated_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                 ON CONFLICT(auth_user_id) DO UPDATE SET
                    full_name = excluded.full_name,
                    phone = excluded.phone,
                    cpf_cnpj = excluded.cpf_cnpj,
                    address = excluded.address,
                    profile_image = excluded.profile_image,
                    updated_at = excluded.updated_at",
                params![
                    &profile.id,
                    &profile.auth_user_id,
                    &profile.full_name,
                    &profile.phone,
                    &profile.cpf_cnpj,
                    &address_json,
                    &profile.profile_image,
                    &profile.rating,
                    &profile.total_rentals,
                    &bool_to_int(profile.verified),
                    &profile.created_at,
                    &profile.updated_at,
                ],
            )
            .map_err(map_sql_error)?;

            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Map a row to a UserProfile
fn map_profile_row(row: &Row<'_>) -> rusqlite::Result<UserProfile> {
    let address_json: Option<String> = row.get(5)?;
    Ok(UserProfile {
        id: row.get(0)?,
        auth_user_id: row.get(1)?,
        full_name: row.get(2)?,
        phone: row.get(3)?,
        cpf_cnpj: row.get(4)?,
        address: address_json.as_deref().and_then(decode_address),
        profile_image: row.get(6)?,
        rating: row.get(7)?,
        total_rentals: row.get(8)?,
        verified: int_to_bool(row.get(9)?),
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

fn encode_address(address: Option<&BTreeMap<String, String>>) -> DomainResult<Option<String>> {
    address
        .map(|map| {
            serde_json::to_string(map)
                .map_err(|e| FieldMachineError::Internal(format!("address encoding failed: {e}")))
        })
        .transpose()
}

fn decode_address(json: &str) -> Option<BTreeMap<String, String>> {
    serde_json::from_str(json).ok()
}

pub(crate) fn map_join_error(err: task::JoinError) -> FieldMachineError {
    FieldMachineError::Internal(format!("task join error: {err}"))
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}

pub(crate) fn int_to_bool(value: i64) -> bool {
    value != 0
}

// =============================================================================
// Tests
// =============================================================================
