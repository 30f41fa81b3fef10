//! Identifier generation for itineraries and line items.
//!
//! # Invariants
//! - Generated ids are never empty.
//! - Ids come from random UUID v4 values; no counter is shared between callers.

use uuid::Uuid;

/// Prefix used for line-item ids so they are distinguishable in exported files.
pub const ITEM_ID_PREFIX: &str = "item-";

/// Returns a fresh itinerary id in hyphenated UUID form.
pub fn new_itinerary_id() -> String {
    Uuid::new_v4().to_string()
}

/// Returns a fresh line-item id (`item-<32 hex chars>`).
pub fn new_item_id() -> String {
    format!("{ITEM_ID_PREFIX}{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::{new_item_id, new_itinerary_id, ITEM_ID_PREFIX};
    use std::collections::HashSet;

    #[test]
    fn itinerary_ids_are_non_empty_uuids() {
        let id = new_itinerary_id();
        assert!(!id.is_empty());
        assert!(uuid::Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn item_ids_carry_prefix_and_do_not_repeat() {
        let ids = (0..256).map(|_| new_item_id()).collect::<HashSet<_>>();
        assert_eq!(ids.len(), 256);
        assert!(ids.iter().all(|id| id.starts_with(ITEM_ID_PREFIX)));
    }
}
