//! # FieldMachine Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits)
//! - Use cases and services (profile updates, catalog, bookings, reviews)
//!
//! ## Architecture Principles
//! - Only depends on `fieldmachine-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod booking;
pub mod machine;
pub mod profile;
pub mod review;

// Re-export specific items to avoid ambiguity
pub use booking::ports::BookingRepository;
pub use booking::BookingService;
pub use machine::ports::MachineRepository;
pub use machine::MachineService;
pub use profile::ports::{MutationObserver, ProfileCache, ProfileRepository, SessionProvider};
pub use profile::ProfileService;
pub use review::ports::ReviewRepository;
pub use review::ReviewService;
