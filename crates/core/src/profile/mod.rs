//! Profile update flow: authenticated upsert with dependent cache refresh.

pub mod ports;
pub mod service;

pub use service::ProfileService;
