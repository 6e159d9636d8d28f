//! SQLite persistence layer

pub mod booking_repository;
pub mod machine_repository;
pub mod manager;
pub mod profile_repository;
pub mod review_repository;

pub use booking_repository::SqliteBookingRepository;
pub use machine_repository::SqliteMachineRepository;
pub use manager::{DbConnection, DbManager};
pub use profile_repository::SqliteProfileRepository;
pub use review_repository::SqliteReviewRepository;
