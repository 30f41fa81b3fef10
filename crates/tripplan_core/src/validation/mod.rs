//! Business-rule validation for itinerary drafts and records.
//!
//! # Responsibility
//! - Check title, date range and per-item limits before anything is persisted.
//! - Report every violated rule in one pass, keyed by field.
//!
//! # Invariants
//! - Validation is a pure function of its input and never panics.
//! - Keys are `title`, `startDate`, `endDate`, `dates`, `updatedAt` or
//!   `item-<index>-<field>`.
//! - Stored records never have `updatedAt` before `createdAt`.
//! - At most one message per key; the first failing rule for a key wins.

use crate::model::itinerary::{Itinerary, ItineraryDraft, ItineraryItem, DATE_FORMAT};
use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const TITLE_MAX_CHARS: usize = 100;
pub const CONTENT_MAX_CHARS: usize = 200;
pub const NOTE_MAX_CHARS: usize = 500;
pub const AMOUNT_MAX: f64 = 10_000_000.0;
pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;
pub const MAX_SPAN_DAYS: i64 = 365;

pub const FIELD_TITLE: &str = "title";
pub const FIELD_START_DATE: &str = "startDate";
pub const FIELD_END_DATE: &str = "endDate";
pub const FIELD_DATES: &str = "dates";
pub const FIELD_UPDATED_AT: &str = "updatedAt";

/// Accepted, parsed trip date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Inclusive number of days in the range.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// One violated rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Field-keyed collection of violated rules, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns the message recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Returns violated field keys in rule order.
    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(|error| error.field.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        if self.contains(&field) {
            return;
        }
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|error| format!("{}: {}", error.field, error.message))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "validation failed: {joined}")
    }
}

impl Error for ValidationErrors {}

/// Builds the key used for item-level violations, e.g. `item-2-amount`.
pub fn item_field_key(index: usize, field: &str) -> String {
    format!("item-{index}-{field}")
}

/// Parses a `YYYY-MM-DD` calendar date, ignoring surrounding whitespace.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Validates a form draft.
///
/// Returns the parsed date range on acceptance.
pub fn validate_draft(draft: &ItineraryDraft) -> Result<DateRange, ValidationErrors> {
    run_rules(
        &draft.title,
        &draft.start_date,
        &draft.end_date,
        &draft.items,
    )
}

/// Validates a typed record with the draft rules plus the timestamp order rule.
pub fn validate_itinerary(itinerary: &Itinerary) -> Result<(), ValidationErrors> {
    let start = itinerary.start_date.format(DATE_FORMAT).to_string();
    let end = itinerary.end_date.format(DATE_FORMAT).to_string();
    let mut errors = run_rules(&itinerary.title, &start, &end, &itinerary.items)
        .err()
        .unwrap_or_default();
    if itinerary.updated_at < itinerary.created_at {
        errors.push(FIELD_UPDATED_AT, "last update must not precede creation");
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn run_rules(
    title: &str,
    start_raw: &str,
    end_raw: &str,
    items: &[ItineraryItem],
) -> Result<DateRange, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    check_title(title, &mut errors);
    let start = check_date(start_raw, FIELD_START_DATE, "start date", &mut errors);
    let end = check_date(end_raw, FIELD_END_DATE, "end date", &mut errors);
    if let (Some(start), Some(end)) = (start, end) {
        check_range(start, end, &mut errors);
    }
    check_items(items, &mut errors);

    match (start, end) {
        (Some(start), Some(end)) if errors.is_empty() => Ok(DateRange { start, end }),
        _ => Err(errors),
    }
}

fn check_title(title: &str, errors: &mut ValidationErrors) {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        errors.push(FIELD_TITLE, "title is required");
    } else if trimmed.chars().count() > TITLE_MAX_CHARS {
        errors.push(
            FIELD_TITLE,
            format!("title must be at most {TITLE_MAX_CHARS} characters"),
        );
    }
}

fn check_date(
    raw: &str,
    field: &str,
    label: &str,
    errors: &mut ValidationErrors,
) -> Option<NaiveDate> {
    if raw.trim().is_empty() {
        errors.push(field, format!("{label} is required"));
        return None;
    }
    let Some(date) = parse_calendar_date(raw) else {
        errors.push(field, format!("{label} must be a valid YYYY-MM-DD date"));
        return None;
    };
    if !(MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
        errors.push(
            field,
            format!("{label} must be between {MIN_YEAR} and {MAX_YEAR}"),
        );
    }
    Some(date)
}

fn check_range(start: NaiveDate, end: NaiveDate, errors: &mut ValidationErrors) {
    if start > end {
        errors.push(FIELD_DATES, "end date must be on or after the start date");
    } else if (end - start).num_days() > MAX_SPAN_DAYS {
        errors.push(
            FIELD_DATES,
            format!("trip must not span more than {MAX_SPAN_DAYS} days"),
        );
    }
}

fn check_items(items: &[ItineraryItem], errors: &mut ValidationErrors) {
    let mut seen_ids = HashSet::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let row = index + 1;

        if !seen_ids.insert(item.id.as_str()) {
            errors.push(
                item_field_key(index, "id"),
                format!("item {row}: id `{}` is already used by another item", item.id),
            );
        }

        let amount_key = item_field_key(index, "amount");
        if !item.amount.is_finite() {
            errors.push(amount_key, format!("item {row}: amount must be a finite number"));
        } else if item.amount < 0.0 {
            errors.push(amount_key, format!("item {row}: amount must be 0 or greater"));
        } else if item.amount > AMOUNT_MAX {
            errors.push(
                amount_key,
                format!("item {row}: amount must be at most 10,000,000"),
            );
        }

        if item.content.chars().count() > CONTENT_MAX_CHARS {
            errors.push(
                item_field_key(index, "content"),
                format!("item {row}: content must be at most {CONTENT_MAX_CHARS} characters"),
            );
        }
        if item.note.chars().count() > NOTE_MAX_CHARS {
            errors.push(
                item_field_key(index, "note"),
                format!("item {row}: note must be at most {NOTE_MAX_CHARS} characters"),
            );
        }
    }
}
