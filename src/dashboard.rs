//! Same-day summary of a user's mood entries.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;

use crate::display::{format_date, format_time, mood_display, stress_color, MoodDisplay};
use crate::models::mood_entry::MoodEntry;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub date: String,
    pub latest_entry: Option<MoodEntry>,
    pub latest_mood: Option<MoodDisplay>,
    /// Local `HH:MM` of the latest entry
    pub latest_recorded_at: Option<String>,
    pub average_stress: Option<i32>,
    pub stress_color: Option<&'static str>,
    pub record_count_today: usize,
}

/// First entry; callers pass entries newest first
pub fn latest_entry(entries: &[MoodEntry]) -> Option<&MoodEntry> {
    entries.first()
}

/// Mean stress rounded half up, `None` for no entries
pub fn average_stress(entries: &[MoodEntry]) -> Option<i32> {
    if entries.is_empty() {
        return None;
    }

    let count = entries.len() as i64;
    let sum: i64 = entries.iter().map(|e| i64::from(e.stress_level)).sum();

    // floor(sum / count + 1/2)
    Some((2 * sum + count).div_euclid(2 * count) as i32)
}

pub fn summarize(entries: &[MoodEntry]) -> DashboardSummary {
    summarize_at(&Local, Local::now().date_naive(), entries)
}

pub fn summarize_at<Tz: TimeZone>(tz: &Tz, today: NaiveDate, entries: &[MoodEntry]) -> DashboardSummary
where
    Tz::Offset: std::fmt::Display,
{
    let latest = latest_entry(entries);
    let average = average_stress(entries);
    let (start, _) = day_bounds(tz, today);

    DashboardSummary {
        date: format_date(&start.with_timezone(tz)),
        latest_entry: latest.cloned(),
        latest_mood: latest.map(|e| mood_display(i64::from(e.mood_level))),
        latest_recorded_at: latest.map(|e| format_time(&e.created_at.with_timezone(tz))),
        average_stress: average,
        stress_color: average.map(|a| stress_color(i64::from(a))),
        record_count_today: entries.len(),
    }
}

/// `[start of date, start of next date)` in `tz`, as UTC instants
pub fn day_bounds<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let next = date.succ_opt().unwrap_or(date);
    (start_of_day(tz, date), start_of_day(tz, next))
}

fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);

    if let Some(start) = tz.from_local_datetime(&midnight).earliest() {
        return start.with_timezone(&Utc);
    }

    // midnight skipped by a DST jump; the day starts at the first valid instant
    tz.from_local_datetime(&(midnight + Duration::hours(1)))
        .earliest()
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}
