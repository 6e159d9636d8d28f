//! Shared in-memory mocks for core service tests.

#![allow(dead_code)]

pub mod repositories;

pub use repositories::*;
