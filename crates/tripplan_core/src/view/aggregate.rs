//! Date grouping and amount totals.

use crate::model::itinerary::ItineraryItem;
use indexmap::IndexMap;

/// Items partitioned by their `date` string, in first-appearance order of dates.
pub type DateGroups<'a> = IndexMap<&'a str, Vec<&'a ItineraryItem>>;

/// Partitions `items` by date while keeping each item's relative order.
///
/// Dates are not sorted; see [`crate::view::timeline::timeline`] for display order.
pub fn group_by_date(items: &[ItineraryItem]) -> DateGroups<'_> {
    let mut groups = DateGroups::new();
    for item in items {
        groups.entry(item.date.as_str()).or_default().push(item);
    }
    groups
}

/// Sums item amounts; non-finite amounts count as zero.
pub fn total_amount<'a, I>(items: I) -> f64
where
    I: IntoIterator<Item = &'a ItineraryItem>,
{
    items
        .into_iter()
        .map(|item| effective_amount(item.amount))
        .sum()
}

fn effective_amount(amount: f64) -> f64 {
    if amount.is_finite() {
        amount
    } else {
        0.0
    }
}
