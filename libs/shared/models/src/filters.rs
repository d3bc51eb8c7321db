use chrono::NaiveDate;

/// Inclusive `date_from`/`date_to` bounds; a missing bound is open.
pub fn within_dates(date: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    from.map_or(true, |from| date >= from) && to.map_or(true, |to| date <= to)
}

/// Case-insensitive substring match used by text filters.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(within_dates(day(1), Some(day(1)), Some(day(5))));
        assert!(within_dates(day(5), Some(day(1)), Some(day(5))));
        assert!(!within_dates(day(6), Some(day(1)), Some(day(5))));
    }

    #[test]
    fn missing_bounds_are_open() {
        assert!(within_dates(day(20), None, None));
        assert!(within_dates(day(20), Some(day(2)), None));
        assert!(!within_dates(day(1), Some(day(2)), None));
    }

    #[test]
    fn substring_match_ignores_case() {
        assert!(contains_ignore_case("Maria Lopez", "lop"));
        assert!(!contains_ignore_case("Maria Lopez", "smith"));
    }
}
