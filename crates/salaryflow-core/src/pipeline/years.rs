// Years selectable on the year control.

use crate::data::records::YearKeyed;
use std::collections::{BTreeSet, HashSet};

/// Years present in both datasets, newest first, without duplicates.
/// Rows with no parseable year are ignored.
pub fn available_years<A: YearKeyed, B: YearKeyed>(first: &[A], second: &[B]) -> Vec<i32> {
    let second_years: HashSet<i32> = second.iter().filter_map(YearKeyed::year).collect();
    first
        .iter()
        .filter_map(YearKeyed::year)
        .collect::<BTreeSet<i32>>()
        .into_iter()
        .rev()
        .filter(|y| second_years.contains(y))
        .collect()
}

/// The year to show when `requested` has no data: the available year with
/// the smallest distance to it. On a tie the year listed first wins, which
/// is the newer one for `available_years` output.
pub fn closest_available_year(years: &[i32], requested: i32) -> Option<i32> {
    let mut best = *years.first()?;
    for &year in &years[1..] {
        if (year - requested).abs() < (best - requested).abs() {
            best = year;
        }
    }
    Some(best)
}
