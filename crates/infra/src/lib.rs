//! # FieldMachine Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite repositories (profiles, machines, bookings, reviews)
//! - The moka-backed profile view cache
//! - The in-memory session registry
//! - The configuration loader
//!
//! ## Architecture
//! - Implements traits defined in `fieldmachine-core`
//! - Depends on `fieldmachine-domain` and `fieldmachine-core`
//! - Contains all "impure" code (I/O, pools, clocks)

pub mod auth;
pub mod cache;
pub mod config;
pub mod database;
pub mod errors;

// Re-export commonly used items
pub use auth::*;
pub use cache::*;
pub use database::*;
