//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation and repository calls into use-case level APIs.
//! - Keep CLI/FFI layers decoupled from storage details.

pub mod itinerary_service;
