//! Human-friendly rendering of past timestamps relative to "now".
//!
//! Both functions are pure: the caller supplies `now`. A "day" is a whole
//! 24-hour span back from `now`, not a calendar day, and timestamps in the
//! future fall into the "older" bucket.

use chrono::NaiveDateTime;

use crate::presentation::{CLOCK_FORMAT, DAY_MONTH_FORMAT, SEEN_YESTERDAY, YESTERDAY};

const DAY_MS: i64 = 86_400_000;
const HOUR_SECS: i64 = 3_600;

/// Whole days and leftover seconds between `ts` and `now`, floored.
fn elapsed(ts: NaiveDateTime, now: NaiveDateTime) -> (i64, i64) {
    let ms = (now - ts).num_milliseconds();
    (ms.div_euclid(DAY_MS), ms.rem_euclid(DAY_MS) / 1000)
}

/// Time label for the chat list: clock time, "yesterday", or day.month.
pub fn chat_time(ts: NaiveDateTime, now: NaiveDateTime) -> String {
    match elapsed(ts, now).0 {
        0 => ts.format(CLOCK_FORMAT).to_string(),
        1 => YESTERDAY.to_string(),
        _ => ts.format(DAY_MONTH_FORMAT).to_string(),
    }
}

/// "Last seen" label for an offline contact.
pub fn last_seen(ts: NaiveDateTime, now: NaiveDateTime) -> String {
    match elapsed(ts, now) {
        (0, secs) if secs < HOUR_SECS => format!("Был {} мин назад", secs / 60),
        (0, secs) => format!("Был {} часа назад", secs / HOUR_SECS),
        (1, _) => SEEN_YESTERDAY.to_string(),
        (days, _) => format!("Был {} дней назад", days),
    }
}
