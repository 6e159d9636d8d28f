//! Machine catalog types

use serde::{Deserialize, Serialize};

/// Publication status of a machine listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MachineStatus {
    Active,
    Inactive,
}

impl MachineStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

/// A machine listed on the marketplace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub category: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    /// Daily rental price in BRL.
    pub price_day: f64,
    pub min_rental_days: i64,
    pub city: Option<String>,
    pub state: Option<String>,
    pub status: MachineStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Payload for publishing a new machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMachine {
    pub name: String,
    pub category: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub price_day: f64,
    pub min_rental_days: i64,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// Search filters for the machine catalog. All fields are optional and
/// combined with AND semantics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MachineFilters {
    pub category: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub max_price_day: Option<f64>,
    /// Free-text match over name, brand, and model.
    pub query: Option<String>,
}
