//! Derived read-side projections over itinerary items.
//!
//! # Responsibility
//! - Group items by date and total their amounts.
//! - Build display-ready timelines, list summaries and note links.
//!
//! # Invariants
//! - Every function here is pure and leaves its input untouched.

pub mod aggregate;
pub mod links;
pub mod timeline;
