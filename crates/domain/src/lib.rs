//! # FieldMachine Domain
//!
//! Business domain types and models for FieldMachine.
//!
//! This crate contains:
//! - Domain data types (UserProfile, Machine, Booking, Review)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Validation rules ported from the marketplace rules
//!
//! ## Architecture
//! - No dependencies on other FieldMachine crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
