//! Domain types and models

pub mod booking;
pub mod machine;
pub mod profile;
pub mod review;

pub use booking::{Booking, BookingRequest, BookingStatus};
pub use machine::{Machine, MachineFilters, MachineStatus, NewMachine};
pub use profile::{AuthIdentity, ProfileUpdate, UserProfile};
pub use review::{NewReview, Review};
