//! Flutter-facing FFI crate for the itinerary core.
//!
//! All exported functions live in [`api`]; bindings are generated from it.

pub mod api;
