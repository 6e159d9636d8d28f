//! Machine repository implementation using SQLite

use std::sync::Arc;

use async_trait::async_trait;
use fieldmachine_core::machine::ports::MachineRepository;
use fieldmachine_domain::{
    FieldMachineError, Machine, MachineFilters, MachineStatus, Result as DomainResult,
};
use rusqlite::types::Value;
use rusqlite::{params, Row};
use tokio::task;

use super::manager::{map_sql_error, DbManager};
use super::profile_repository::map_join_error;

const MACHINE_COLUMNS: &str = "id, owner_id, name, category, brand, model, year, description,
        price_day, min_rental_days, city, state, status, created_at, updated_at";

/// SQLite-backed implementation of `MachineRepository`
pub struct SqliteMachineRepository {
    db: Arc<DbManager>,
}

impl SqliteMachineRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MachineRepository for SqliteMachineRepository {
    async fn get_by_id(&self, id: &str) -> DomainResult<Option<Machine>> {
        let db = Arc::clone(&self.db);
        let id = id.to_owned();

        task::spawn_blocking(move || -> DomainResult<Option<Machine>> {
            let conn = db.get_connection()?;
            let result = conn.query_row(
                &format!("SELECT {MACHINE_COLUMNS} FROM machines WHERE id = ?1"),
                params![&id],
                map_machine_row,
            );
            match result {
                Ok(machine) => Ok(Some(machine)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(map_sql_error(err)),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn insert(&self, machine: Machine) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO machines (
                    id, owner_id, name, category, brand, model, year, description,
                    price_day, min_rental_days, city, state, status, created_at, updated_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                params![
                    &machine.id,
                    &machine.owner_id,
                    &machine.name,
                    &machine.category,
                    &machine.brand,
                    &machine.model,
                    &machine.year,
                    &machine.description,
                    &machine.price_day,
                    &machine.min_rental_days,
                    &machine.city,
                    &machine.state,
                    machine.status.as_str(),
                    &machine.created_at,
                    &machine.updated_at,
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_by_owner(&self, owner_id: &str) -> DomainResult<Vec<Machine>> {
        let db = Arc::clone(&self.db);
        let owner_id = owner_id.to_owned();

        task::spawn_blocking(move || -> DomainResult<Vec<Machine>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {MACHINE_COLUMNS} FROM machines
                     WHERE owner_id = ?1 ORDER BY created_at DESC"
                ))
                .map_err(map_sql_error)?;
            let machines = stmt
                .query_map(params![&owner_id], map_machine_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            Ok(machines)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn search(&self, filters: &MachineFilters) -> DomainResult<Vec<Machine>> {
        let db = Arc::clone(&self.db);
        let filters = filters.clone();

        task::spawn_blocking(move || -> DomainResult<Vec<Machine>> {
            let conn = db.get_connection()?;
            let (sql, params) = build_search_query(&filters);
            let mut stmt = conn.prepare(&sql).map_err(map_sql_error)?;
            let machines = stmt
                .query_map(rusqlite::params_from_iter(params), map_machine_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            Ok(machines)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn set_status(&self, id: &str, status: MachineStatus) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let id = id.to_owned();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let updated = conn
                .execute(
                    "UPDATE machines
                     SET status = ?1, updated_at = CAST(strftime('%s','now') AS INTEGER)
                     WHERE id = ?2",
                    params![status.as_str(), &id],
                )
                .map_err(map_sql_error)?;
            if updated == 0 {
                return Err(FieldMachineError::NotFound(format!("machine {id}")));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Build the filtered catalog query; filters combine with AND.
fn build_search_query(filters: &MachineFilters) -> (String, Vec<Value>) {
    let mut sql = format!("SELECT {MACHINE_COLUMNS} FROM machines WHERE status = 'active'");
    let mut params: Vec<Value> = Vec::new();

    if let Some(category) = &filters.category {
        params.push(Value::Text(category.clone()));
        sql.push_str(&format!(" AND category = ?{}", params.len()));
    }
    if let Some(city) = &filters.city {
        params.push(Value::Text(city.clone()));
        sql.push_str(&format!(" AND city = ?{}", params.len()));
    }
    if let Some(state) = &filters.state {
        params.push(Value::Text(state.clone()));
        sql.push_str(&format!(" AND state = ?{}", params.len()));
    }
    if let Some(max_price) = filters.max_price_day {
        params.push(Value::Real(max_price));
        sql.push_str(&format!(" AND price_day <= ?{}", params.len()));
    }
    if let Some(query) = &filters.query {
        params.push(Value::Text(format!("%{}%", query.to_lowercase())));
        let n = params.len();
        sql.push_str(&format!(
            " AND (LOWER(name) LIKE ?{n} OR LOWER(IFNULL(brand, '')) LIKE ?{n} \
             OR LOWER(IFNULL(model, '')) LIKE ?{n})"
        ));
    }

    sql.push_str(" ORDER BY created_at DESC");
    (sql, params)
}

/// Map a row to a Machine
fn map_machine_row(row: &Row<'_>) -> rusqlite::Result<Machine> {
    let status: String = row.get(12)?;
    Ok(Machine {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        name: row.get(2)?,
        category: row.get(3)?,
        brand: row.get(4)?,
        model: row.get(5)?,
        year: row.get(6)?,
        description: row.get(7)?,
        price_day: row.get(8)?,
        min_rental_days: row.get(9)?,
        city: row.get(10)?,
        state: row.get(11)?,
        status: MachineStatus::parse(&status).unwrap_or(MachineStatus::Inactive),
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
    })
}
