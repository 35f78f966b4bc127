use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

/// Optional `?today=YYYY-MM-DD` override accepted by date-sensitive routes.
#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    pub today: Option<NaiveDate>,
}

/// The caller's date if given, otherwise the current UTC date.
pub fn resolve_today(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Utc::now().date_naive())
}

/// Timestamp for a quiz taken on `today`. With an override the date comes from it
/// and the time of day from `now`, so the stored result lands on the requested day.
pub fn quiz_timestamp(today: Option<NaiveDate>, now: DateTime<Utc>) -> DateTime<Utc> {
    match today {
        Some(day) => day.and_time(now.time()).and_utc(),
        None => now,
    }
}
