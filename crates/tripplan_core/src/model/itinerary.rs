//! Itinerary domain model.
//!
//! # Responsibility
//! - Define the persisted itinerary record and its ordered line items.
//! - Define the editable draft shape used by forms and item edit operations.
//!
//! # Invariants
//! - `Itinerary::start_date <= Itinerary::end_date` once a record is persisted.
//! - Item ids are unique inside one `items` sequence.
//! - `updated_at >= created_at`; `touch` never moves `updated_at` backwards past creation.
//!
//! # See also
//! - crate::validation for the business rules applied before persistence.

use crate::model::ids::{new_item_id, new_itinerary_id};
use crate::validation::{self, DateRange, ValidationErrors};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Calendar date wire format used by documents and drafts.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One dated/timed entry within an itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryItem {
    /// Unique within the parent itinerary.
    pub id: String,
    /// ISO calendar date (`YYYY-MM-DD`); empty while still being drafted.
    pub date: String,
    /// Clock time (`HH:MM`); empty when the entry has no time.
    pub time: String,
    /// Activity text.
    pub content: String,
    /// Cost of the entry. Non-negative and finite once validated.
    /// Omitted amounts in draft input count as 0; documents must carry one.
    #[serde(default)]
    pub amount: f64,
    /// Free-form note; may contain links.
    pub note: String,
}

impl ItineraryItem {
    /// Creates an empty item on `date` with a generated id.
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            id: new_item_id(),
            date: date.into(),
            time: String::new(),
            content: String::new(),
            amount: 0.0,
            note: String::new(),
        }
    }
}

/// Single-field change applied to one line item.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemEdit {
    Date(String),
    Time(String),
    Content(String),
    Amount(f64),
    Note(String),
}

impl ItemEdit {
    fn apply(self, item: &mut ItineraryItem) {
        match self {
            Self::Date(value) => item.date = value,
            Self::Time(value) => item.time = value,
            Self::Content(value) => item.content = value,
            Self::Amount(value) => item.amount = value,
            Self::Note(value) => item.note = value,
        }
    }
}

/// Persisted itinerary record.
///
/// Field order matches the exported document layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    pub id: String,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// User-ordered line items; order is persisted as-is.
    pub items: Vec<ItineraryItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Opaque encoded image payload (for example a data URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

impl Itinerary {
    /// Builds a new record from an accepted draft.
    ///
    /// # Invariants
    /// - `id` is freshly generated.
    /// - `created_at == updated_at == now`.
    /// - The title is stored trimmed.
    pub fn create(draft: ItineraryDraft, range: DateRange, now: DateTime<Utc>) -> Self {
        Self {
            id: new_itinerary_id(),
            title: draft.title.trim().to_string(),
            start_date: range.start,
            end_date: range.end,
            items: draft.items,
            created_at: now,
            updated_at: now,
            cover_image: draft.cover_image,
        }
    }

    /// Replaces editable fields from an accepted draft and refreshes `updated_at`.
    ///
    /// `id` and `created_at` are preserved.
    pub fn apply_draft(&mut self, draft: ItineraryDraft, range: DateRange, now: DateTime<Utc>) {
        self.title = draft.title.trim().to_string();
        self.start_date = range.start;
        self.end_date = range.end;
        self.items = draft.items;
        self.cover_image = draft.cover_image;
        self.touch(now);
    }

    /// Refreshes `updated_at`, clamped so it never precedes `created_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }

    /// Returns the editable draft form of this record.
    pub fn to_draft(&self) -> ItineraryDraft {
        ItineraryDraft {
            title: self.title.clone(),
            start_date: self.start_date.format(DATE_FORMAT).to_string(),
            end_date: self.end_date.format(DATE_FORMAT).to_string(),
            items: self.items.clone(),
            cover_image: self.cover_image.clone(),
        }
    }

    /// Checks this record against the business rules.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validation::validate_itinerary(self)
    }

    /// Inclusive number of calendar days covered by the trip.
    pub fn trip_length_days(&self) -> i64 {
        DateRange {
            start: self.start_date,
            end: self.end_date,
        }
        .days()
    }
}

/// Partially-filled itinerary as collected by an edit form.
///
/// Dates stay raw strings so malformed input can be reported per field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDraft {
    pub title: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub items: Vec<ItineraryItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

impl ItineraryDraft {
    pub fn new(
        title: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            items: Vec::new(),
            cover_image: None,
        }
    }

    /// Appends an empty item dated on the draft start date (or undated when the
    /// start date does not parse) and returns it for further edits.
    pub fn add_item(&mut self) -> &mut ItineraryItem {
        let date = validation::parse_calendar_date(&self.start_date)
            .map(|date| date.format(DATE_FORMAT).to_string())
            .unwrap_or_default();
        let index = self.items.len();
        self.items.push(ItineraryItem::new(date));
        &mut self.items[index]
    }

    /// Applies one field edit to the item with `item_id`.
    ///
    /// Returns `false` when no item has that id.
    pub fn edit_item(&mut self, item_id: &str, edit: ItemEdit) -> bool {
        match self.items.iter_mut().find(|item| item.id == item_id) {
            Some(item) => {
                edit.apply(item);
                true
            }
            None => false,
        }
    }

    /// Removes the item with `item_id`, keeping the order of the rest.
    pub fn remove_item(&mut self, item_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != item_id);
        self.items.len() != before
    }

    /// Moves the item at `from` to position `to`, shifting the items in between.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        move_item(&mut self.items, from, to)
    }

    /// Drag-end helper: moves `active_id` to the slot currently held by `over_id`.
    ///
    /// Returns `false` when either id is unknown or both ids are equal.
    pub fn move_item_by_id(&mut self, active_id: &str, over_id: &str) -> bool {
        if active_id == over_id {
            return false;
        }
        let from = self.items.iter().position(|item| item.id == active_id);
        let to = self.items.iter().position(|item| item.id == over_id);
        match (from, to) {
            (Some(from), Some(to)) => self.move_item(from, to),
            _ => false,
        }
    }

    /// Checks this draft against the business rules.
    pub fn validate(&self) -> Result<DateRange, ValidationErrors> {
        validation::validate_draft(self)
    }
}

/// Moves the element at `from` to index `to`, shifting the rest.
///
/// Out-of-range indices leave the sequence untouched and return `false`.
/// `from == to` is a successful no-op.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() {
        return false;
    }
    if from != to {
        let item = items.remove(from);
        items.insert(to, item);
    }
    true
}
