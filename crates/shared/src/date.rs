use chrono::{Datelike, Days, NaiveDate};

/// Monday of the week containing `from`. A macrocycle can start on this
/// date immediately, accepting a partial first week.
pub fn this_monday(from: NaiveDate) -> NaiveDate {
    let back = from.weekday().num_days_from_monday() as u64;
    from - Days::new(back)
}

/// The next Monday on or after `from`.
pub fn next_monday(from: NaiveDate) -> NaiveDate {
    let ahead = (7 - from.weekday().num_days_from_monday() as u64) % 7;
    from + Days::new(ahead)
}
