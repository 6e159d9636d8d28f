//! Port interfaces for the machine catalog

use async_trait::async_trait;
use fieldmachine_domain::{Machine, MachineFilters, MachineStatus, Result};

/// Trait for machine persistence and catalog queries
#[async_trait]
pub trait MachineRepository: Send + Sync {
    /// Get a machine by id
    async fn get_by_id(&self, id: &str) -> Result<Option<Machine>>;

    /// Insert a new machine listing
    async fn insert(&self, machine: Machine) -> Result<()>;

    /// All machines belonging to an owner, newest first
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Machine>>;

    /// Active machines matching the filters, newest first
    async fn search(&self, filters: &MachineFilters) -> Result<Vec<Machine>>;

    /// Change the publication status of a machine
    async fn set_status(&self, id: &str, status: MachineStatus) -> Result<()>;
}
