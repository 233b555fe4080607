//! Filters on the release year.

use crate::traits::Predicate;
use catalog::CollectionItem;

/// Keeps items released in exactly the given year
pub struct ExactYearFilter {
    year: u16,
}

impl ExactYearFilter {
    pub fn new(year: u16) -> Self {
        Self { year }
    }
}

impl Predicate for ExactYearFilter {
    fn name(&self) -> &str {
        "ExactYearFilter"
    }

    fn matches(&self, item: &CollectionItem) -> bool {
        item.year == Some(self.year)
    }
}

/// Keeps items released within an inclusive year range.
///
/// ## Algorithm
/// 1. Items with an unknown year never match
/// 2. Each bound is checked on its own: `year >= min` and `year <= max`
/// 3. A range with `min > max` is accepted and simply matches nothing
pub struct YearRangeFilter {
    min_year: Option<u16>,
    max_year: Option<u16>,
}

impl YearRangeFilter {
    pub fn new(min_year: Option<u16>, max_year: Option<u16>) -> Self {
        Self { min_year, max_year }
    }
}

impl Predicate for YearRangeFilter {
    fn name(&self) -> &str {
        "YearRangeFilter"
    }

    fn matches(&self, item: &CollectionItem) -> bool {
        let Some(year) = item.year else {
            return false;
        };
        if let Some(min_year) = self.min_year {
            if year < min_year {
                return false;
            }
        }
        if let Some(max_year) = self.max_year {
            if year > max_year {
                return false;
            }
        }
        true
    }
}
