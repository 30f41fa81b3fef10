//! Core domain logic for TripPlan itineraries.
//! This crate is the single source of truth for itinerary business invariants.

pub mod codec;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod state;
pub mod validation;
pub mod view;

pub use codec::{CodecError, CodecResult};
pub use config::{ConfigError, CoreConfig, LoggingConfig, StorageConfig};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::itinerary::{ItemEdit, Itinerary, ItineraryDraft, ItineraryItem};
pub use repo::itinerary_repo::{ItineraryRepository, OwnerKey, RepoError, RepoResult};
pub use repo::local_store::LocalJsonStore;
pub use repo::sqlite_store::SqliteItineraryRepository;
pub use repo::store::ItineraryStore;
pub use service::itinerary_service::{
    ExportedDocument, ItineraryService, ServiceError, ServiceResult,
};
pub use state::{apply, CatalogCommand, CatalogState, Notification, NotificationKind};
pub use validation::{FieldError, ValidationErrors};
pub use view::aggregate::{group_by_date, total_amount};
pub use view::timeline::{timeline, DayGroup, ItinerarySummary};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
