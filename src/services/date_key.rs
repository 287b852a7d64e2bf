use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// `YYYY-MM-DD` of `moment` as seen on a wall calendar in `tz`.
pub fn date_key(moment: DateTime<Utc>, tz: &Tz) -> String {
    date_key_for_day(local_day(moment, tz))
}

pub fn date_key_for_day(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

pub fn local_day(moment: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    moment.with_timezone(tz).date_naive()
}

/// Key for a stored unix-seconds timestamp; `None` when out of range.
pub fn date_key_from_timestamp(ts: i64, tz: &Tz) -> Option<String> {
    Utc.timestamp_opt(ts, 0).single().map(|moment| date_key(moment, tz))
}

pub fn parse_day(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), "%Y-%m-%d").ok()
}
