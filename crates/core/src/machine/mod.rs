//! Machine catalog: publication, lookup, and filtered search.

pub mod ports;
pub mod service;

pub use service::MachineService;
