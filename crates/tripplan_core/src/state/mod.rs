//! In-memory itinerary catalog shown by a front end.
//!
//! # Responsibility
//! - Hold the loaded itinerary list plus loading, error and notification flags.
//! - Apply catalog commands as a pure transition.
//!
//! # Invariants
//! - `apply` never touches storage or global state.
//! - Ids in `itineraries` stay unique; `Added` with a known id replaces in place.
//! - Commands for unknown ids leave the list unchanged.

use crate::model::itinerary::Itinerary;

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Error,
        }
    }
}

/// Snapshot of the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogState {
    pub itineraries: Vec<Itinerary>,
    pub loading: bool,
    pub error: Option<String>,
    pub notification: Option<Notification>,
}

impl CatalogState {
    /// Initial state before the first load completes.
    pub fn new() -> Self {
        Self {
            itineraries: Vec::new(),
            loading: true,
            error: None,
            notification: None,
        }
    }

    pub fn find(&self, id: &str) -> Option<&Itinerary> {
        self.itineraries.iter().find(|itinerary| itinerary.id == id)
    }
}

impl Default for CatalogState {
    fn default() -> Self {
        Self::new()
    }
}

/// Transition input for [`apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogCommand {
    /// Replace the list with a fresh load and stop loading.
    Loaded(Vec<Itinerary>),
    Added(Itinerary),
    Updated(Itinerary),
    Deleted(String),
    SetLoading(bool),
    /// Record a failure, surface it as an error notification and stop loading.
    Failed(String),
    Notify(Notification),
    ClearNotification,
}

/// Returns the state that follows `command`.
pub fn apply(mut state: CatalogState, command: CatalogCommand) -> CatalogState {
    match command {
        CatalogCommand::Loaded(itineraries) => {
            state.itineraries = itineraries;
            state.loading = false;
        }
        CatalogCommand::Added(itinerary) => {
            match state
                .itineraries
                .iter_mut()
                .find(|existing| existing.id == itinerary.id)
            {
                Some(existing) => *existing = itinerary,
                None => state.itineraries.push(itinerary),
            }
        }
        CatalogCommand::Updated(itinerary) => {
            if let Some(existing) = state
                .itineraries
                .iter_mut()
                .find(|existing| existing.id == itinerary.id)
            {
                *existing = itinerary;
            }
        }
        CatalogCommand::Deleted(id) => state.itineraries.retain(|itinerary| itinerary.id != id),
        CatalogCommand::SetLoading(loading) => state.loading = loading,
        CatalogCommand::Failed(message) => {
            state.notification = Some(Notification::error(message.clone()));
            state.error = Some(message);
            state.loading = false;
        }
        CatalogCommand::Notify(notification) => state.notification = Some(notification),
        CatalogCommand::ClearNotification => state.notification = None,
    }
    state
}

#[cfg(test)]
mod tests {
    use super::{apply, CatalogCommand, CatalogState, Notification, NotificationKind};
    use crate::model::itinerary::{Itinerary, ItineraryDraft};
    use chrono::{TimeZone, Utc};

    fn itinerary(id: &str, title: &str) -> Itinerary {
        let draft = ItineraryDraft::new(title, "2024-05-01", "2024-05-03");
        let range = draft.validate().unwrap();
        let now = Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap();
        let mut itinerary = Itinerary::create(draft, range, now);
        itinerary.id = id.to_string();
        itinerary
    }

    #[test]
    fn loaded_replaces_list_and_stops_loading() {
        let state = CatalogState::new();
        assert!(state.loading);

        let state = apply(state, CatalogCommand::Loaded(vec![itinerary("a", "Kyoto")]));
        assert!(!state.loading);
        assert_eq!(state.itineraries.len(), 1);
    }

    #[test]
    fn added_with_known_id_replaces_instead_of_duplicating() {
        let state = apply(
            CatalogState::new(),
            CatalogCommand::Loaded(vec![itinerary("a", "Kyoto"), itinerary("b", "Osaka")]),
        );
        let state = apply(state, CatalogCommand::Added(itinerary("a", "Kyoto again")));
        assert_eq!(state.itineraries.len(), 2);
        assert_eq!(state.itineraries[0].title, "Kyoto again");

        let state = apply(state, CatalogCommand::Added(itinerary("c", "Nara")));
        let ids: Vec<&str> = state.itineraries.iter().map(|it| it.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn updated_and_deleted_ignore_unknown_ids() {
        let state = apply(
            CatalogState::new(),
            CatalogCommand::Loaded(vec![itinerary("a", "Kyoto")]),
        );
        let state = apply(state, CatalogCommand::Updated(itinerary("zzz", "Ghost")));
        assert_eq!(state.itineraries.len(), 1);
        assert_eq!(state.find("a").map(|it| it.title.as_str()), Some("Kyoto"));

        let state = apply(state, CatalogCommand::Updated(itinerary("a", "Kyoto 2")));
        assert_eq!(state.find("a").map(|it| it.title.as_str()), Some("Kyoto 2"));

        let state = apply(state, CatalogCommand::Deleted("zzz".to_string()));
        assert_eq!(state.itineraries.len(), 1);
        let state = apply(state, CatalogCommand::Deleted("a".to_string()));
        assert!(state.itineraries.is_empty());
    }

    #[test]
    fn failure_sets_error_notification_and_clear_removes_it() {
        let state = apply(
            CatalogState::new(),
            CatalogCommand::Failed("storage unavailable".to_string()),
        );
        assert_eq!(state.error.as_deref(), Some("storage unavailable"));
        assert!(!state.loading);
        assert_eq!(
            state.notification.as_ref().map(|n| n.kind),
            Some(NotificationKind::Error)
        );

        let state = apply(state, CatalogCommand::Notify(Notification::success("saved")));
        assert_eq!(
            state.notification.as_ref().map(|n| n.kind),
            Some(NotificationKind::Success)
        );
        let state = apply(state, CatalogCommand::ClearNotification);
        assert!(state.notification.is_none());
        assert_eq!(state.error.as_deref(), Some("storage unavailable"));
    }

    #[test]
    fn apply_leaves_the_previous_snapshot_untouched() {
        let before = apply(
            CatalogState::new(),
            CatalogCommand::Loaded(vec![itinerary("a", "Kyoto")]),
        );
        let after = apply(before.clone(), CatalogCommand::Deleted("a".to_string()));
        assert_eq!(before.itineraries.len(), 1);
        assert!(after.itineraries.is_empty());
    }
}
