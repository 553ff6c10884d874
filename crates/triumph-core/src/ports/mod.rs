//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from
//! infrastructure. They use only domain types.
//!
//! # Design Rules
//!
//! - No XML or transport types in any signature
//! - Traits are minimal: the crawler needs two operations, so the port has two

pub mod bus_session;

pub use bus_session::{BusSessionPort, NoopBusSession, RegistrationStatus, SessionError};
