//! Display-ordered timeline and list-card projections.
//!
//! # Invariants
//! - Days are sorted ascending by date string.
//! - Within a day, items are stably sorted by time string; untimed items come first.

use crate::model::itinerary::{Itinerary, ItineraryItem};
use crate::validation::DateRange;
use crate::view::aggregate::{group_by_date, total_amount};
use chrono::NaiveDate;

/// One day of the timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup<'a> {
    pub date: &'a str,
    pub items: Vec<&'a ItineraryItem>,
    pub subtotal: f64,
}

/// Builds the day-grouped timeline shown on detail views.
pub fn timeline(items: &[ItineraryItem]) -> Vec<DayGroup<'_>> {
    let mut days = group_by_date(items)
        .into_iter()
        .map(|(date, mut day_items)| {
            day_items.sort_by(|left, right| left.time.cmp(&right.time));
            let subtotal = total_amount(day_items.iter().copied());
            DayGroup {
                date,
                items: day_items,
                subtotal,
            }
        })
        .collect::<Vec<_>>();
    days.sort_by(|left, right| left.date.cmp(right.date));
    days
}

/// Inclusive number of calendar days between `start` and `end`.
pub fn trip_length_days(start: NaiveDate, end: NaiveDate) -> i64 {
    DateRange { start, end }.days()
}

/// Compact projection used by itinerary lists.
#[derive(Debug, Clone, PartialEq)]
pub struct ItinerarySummary {
    pub id: String,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: i64,
    pub item_count: usize,
    pub total_amount: f64,
}

impl ItinerarySummary {
    pub fn of(itinerary: &Itinerary) -> Self {
        Self {
            id: itinerary.id.clone(),
            title: itinerary.title.clone(),
            start_date: itinerary.start_date,
            end_date: itinerary.end_date,
            days: itinerary.trip_length_days(),
            item_count: itinerary.items.len(),
            total_amount: total_amount(&itinerary.items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{timeline, trip_length_days};
    use crate::model::itinerary::ItineraryItem;
    use chrono::NaiveDate;

    fn item(id: &str, date: &str, time: &str, amount: f64) -> ItineraryItem {
        ItineraryItem {
            id: id.to_string(),
            date: date.to_string(),
            time: time.to_string(),
            content: String::new(),
            amount,
            note: String::new(),
        }
    }

    #[test]
    fn timeline_sorts_days_and_times_with_untimed_first() {
        let items = vec![
            item("late", "2024-05-02", "18:00", 300.0),
            item("first-day", "2024-05-01", "09:00", 1500.0),
            item("untimed", "2024-05-02", "", 0.0),
            item("early", "2024-05-02", "07:30", 200.0),
        ];
        let days = timeline(&items);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "2024-05-01");
        let second = days[1]
            .items
            .iter()
            .map(|item| item.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(second, vec!["untimed", "early", "late"]);
        assert_eq!(days[1].subtotal, 500.0);
        assert_eq!(items[0].id, "late");
    }

    #[test]
    fn trip_length_is_inclusive() {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 5, 3).unwrap();
        assert_eq!(trip_length_days(start, end), 3);
        assert_eq!(trip_length_days(start, start), 1);
    }
}
