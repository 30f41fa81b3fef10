//! Itinerary domain model.
//!
//! # Responsibility
//! - Define the canonical itinerary/line-item records shared by every layer.
//! - Provide draft editing helpers (add, edit, remove, reorder items).
//!
//! # Invariants
//! - Every itinerary and item is identified by a generated, non-empty id.
//! - Items have no lifecycle outside their parent itinerary.

pub mod ids;
pub mod itinerary;
