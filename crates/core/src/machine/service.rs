//! Machine catalog service - core business logic

use std::sync::Arc;

use chrono::{Datelike, Utc};
use fieldmachine_domain::validation::{validate_manufacturing_year, validate_price};
use fieldmachine_domain::{
    AuthIdentity, FieldMachineError, Machine, MachineFilters, MachineStatus, NewMachine, Result,
};
use tracing::info;
use uuid::Uuid;

use super::ports::MachineRepository;

/// Machine catalog service
pub struct MachineService {
    repository: Arc<dyn MachineRepository>,
}

impl MachineService {
    /// Create a new machine service
    pub fn new(repository: Arc<dyn MachineRepository>) -> Self {
        Self { repository }
    }

    /// Publish a machine for the authenticated owner.
    ///
    /// Price must be positive and finite; the manufacturing year, when
    /// given, must fall between 1900 and the current year.
    pub async fn publish_machine(
        &self,
        owner: Option<&AuthIdentity>,
        payload: NewMachine,
    ) -> Result<Machine> {
        let Some(owner) = owner else {
            return Err(FieldMachineError::Unauthenticated(
                "publishing a machine requires an authenticated owner".into(),
            ));
        };

        if payload.name.trim().is_empty() {
            return Err(FieldMachineError::InvalidInput("machine name is required".into()));
        }
        if !validate_price(payload.price_day) {
            return Err(FieldMachineError::InvalidInput(
                "daily price must be a positive amount".into(),
            ));
        }
        if payload.min_rental_days < 1 {
            return Err(FieldMachineError::InvalidInput(
                "minimum rental must be at least one day".into(),
            ));
        }
        if let Some(year) = payload.year {
            if !validate_manufacturing_year(year, Utc::now().year()) {
                return Err(FieldMachineError::InvalidInput(format!(
                    "manufacturing year {year} is out of range"
                )));
            }
        }

        let now = Utc::now().timestamp();
        let machine = Machine {
            id: Uuid::new_v4().to_string(),
            owner_id: owner.as_str().to_owned(),
            name: payload.name,
            category: payload.category,
            brand: payload.brand,
            model: payload.model,
            year: payload.year,
            description: payload.description,
            price_day: payload.price_day,
            min_rental_days: payload.min_rental_days,
            city: payload.city,
            state: payload.state,
            status: MachineStatus::Active,
            created_at: now,
            updated_at: now,
        };

        self.repository.insert(machine.clone()).await?;
        info!(machine_id = %machine.id, owner = %owner, "machine published");
        Ok(machine)
    }

    /// Get a machine by id, failing with `NotFound` when absent
    pub async fn get_machine(&self, id: &str) -> Result<Machine> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| FieldMachineError::NotFound(format!("machine {id}")))
    }

    /// All machines belonging to an owner
    pub async fn list_owner_machines(&self, owner: &AuthIdentity) -> Result<Vec<Machine>> {
        self.repository.list_by_owner(owner.as_str()).await
    }

    /// Search active machines with the given filters
    pub async fn search(&self, filters: &MachineFilters) -> Result<Vec<Machine>> {
        self.repository.search(filters).await
    }

    /// Activate or deactivate a listing; only the owner may do this.
    pub async fn set_availability(
        &self,
        owner: &AuthIdentity,
        machine_id: &str,
        status: MachineStatus,
    ) -> Result<()> {
        let machine = self.get_machine(machine_id).await?;
        if machine.owner_id != owner.as_str() {
            return Err(FieldMachineError::Unauthenticated(
                "only the owner can change a machine's availability".into(),
            ));
        }
        self.repository.set_status(machine_id, status).await
    }
}
