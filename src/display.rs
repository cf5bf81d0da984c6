//! Display metadata for mood and stress levels, and date helpers used by the
//! dashboard.

use chrono::{DateTime, Duration, Months, TimeZone};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoodDisplay {
    pub level: i32,
    pub emoji: &'static str,
    pub label: &'static str,
    pub color: &'static str,
}

pub const MOOD_OPTIONS: [MoodDisplay; 5] = [
    MoodDisplay { level: 1, emoji: "😢", label: "とても悪い", color: "#ef4444" },
    MoodDisplay { level: 2, emoji: "😟", label: "悪い", color: "#f97316" },
    MoodDisplay { level: 3, emoji: "😐", label: "ふつう", color: "#eab308" },
    MoodDisplay { level: 4, emoji: "😊", label: "良い", color: "#22c55e" },
    MoodDisplay { level: 5, emoji: "😄", label: "とても良い", color: "#10b981" },
];

/// Returned for levels outside 1..=5
pub const UNKNOWN_MOOD: MoodDisplay = MoodDisplay {
    level: 0,
    emoji: "❔",
    label: "不明",
    color: "#9ca3af",
};

pub fn mood_display(level: i64) -> MoodDisplay {
    MOOD_OPTIONS
        .iter()
        .find(|option| i64::from(option.level) == level)
        .copied()
        .unwrap_or(UNKNOWN_MOOD)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StressBucket {
    Low,
    Moderate,
    High,
    Severe,
}

impl StressBucket {
    pub fn color(self) -> &'static str {
        match self {
            StressBucket::Low => "#10b981",
            StressBucket::Moderate => "#eab308",
            StressBucket::High => "#f97316",
            StressBucket::Severe => "#ef4444",
        }
    }
}

/// Total over all integers: anything below 1 is `Low`, anything above 10 is `Severe`.
pub fn stress_bucket(level: i64) -> StressBucket {
    match level {
        i64::MIN..=3 => StressBucket::Low,
        4..=6 => StressBucket::Moderate,
        7..=8 => StressBucket::High,
        _ => StressBucket::Severe,
    }
}

pub fn stress_color(level: i64) -> &'static str {
    stress_bucket(level).color()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Day,
    Week,
    Month,
}

/// Start of the history window ending at `now`.
///
/// A month back clamps to the last day of the shorter month (Mar 31 -> Feb 28).
pub fn period_start<Tz: TimeZone>(period: Period, now: DateTime<Tz>) -> DateTime<Tz> {
    match period {
        Period::Day => now,
        Period::Week => now - Duration::days(7),
        Period::Month => {
            let fallback = now.clone() - Duration::days(30);
            now.checked_sub_months(Months::new(1)).unwrap_or(fallback)
        }
    }
}

/// `2026年10月18日`
pub fn format_date<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%Y年%-m月%-d日").to_string()
}

/// `09:05`
pub fn format_time<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%H:%M").to_string()
}
