//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Booking rules
pub const MIN_RESERVATION_DAYS: i64 = 1;
pub const MAX_RESERVATION_DAYS: i64 = 90;

// Review rules
pub const MIN_REVIEW_RATING: i32 = 1;
pub const MAX_REVIEW_RATING: i32 = 5;

// Machine rules
pub const MIN_MANUFACTURING_YEAR: i32 = 1900;

// Cache configuration
pub const DEFAULT_PROFILE_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_PROFILE_CACHE_CAPACITY: u64 = 1000;
