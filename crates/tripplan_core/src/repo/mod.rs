//! Itinerary persistence contract and storage backends.
//!
//! # Responsibility
//! - Define the repository contract consumed by services.
//! - Provide the local JSON and SQLite backends plus config-driven selection.
//!
//! # Invariants
//! - Every backend validates before writing.
//! - Backends report `NotFound` separately from transport failures.

pub mod itinerary_repo;
pub mod local_store;
pub mod sqlite_store;
pub mod store;
