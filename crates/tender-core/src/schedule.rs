//! Cron presets: building hourly/daily/weekly expressions, decoding them back,
//! and summarizing a record's triggers for display.
//!
//! Only three shapes are recognized; any other cron string is kept verbatim by
//! the record but cannot be decoded here.

use crate::error::{Result, TenderError};
use std::fmt;

// ---------------------------------------------------------------------------
// ScheduleMode / ScheduleSpec
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleMode {
    Hourly,
    Daily,
    Weekly,
}

impl ScheduleMode {
    pub fn all() -> &'static [ScheduleMode] {
        &[ScheduleMode::Hourly, ScheduleMode::Daily, ScheduleMode::Weekly]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            ScheduleMode::Hourly => "Hourly",
            ScheduleMode::Daily => "Daily",
            ScheduleMode::Weekly => "Weekly",
        }
    }
}

impl fmt::Display for ScheduleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScheduleMode::Hourly => "hourly",
            ScheduleMode::Daily => "daily",
            ScheduleMode::Weekly => "weekly",
        };
        f.write_str(s)
    }
}

/// A decoded preset. `hour` is 0 for hourly; `days` is empty unless weekly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSpec {
    pub mode: ScheduleMode,
    pub minute: u32,
    pub hour: u32,
    pub days: Vec<u32>,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn build_hourly(minute: u32) -> Result<String> {
    if minute > 59 {
        return Err(invalid("minute must be 0-59"));
    }
    Ok(format!("{minute} * * * *"))
}

pub fn build_daily(time: &str) -> Result<String> {
    let (hour, minute) = parse_time(time)?;
    Ok(format!("{minute} {hour} * * *"))
}

pub fn build_weekly(days: &[u32], time: &str) -> Result<String> {
    let days = normalize_days(days)?;
    let (hour, minute) = parse_time(time)?;
    Ok(format!("{minute} {hour} * * {}", join_days(&days)))
}

/// Parse `HH:MM` into `(hour, minute)`.
pub fn parse_time(input: &str) -> Result<(u32, u32)> {
    let parts: Vec<&str> = input.trim().split(':').collect();
    let [h, m] = parts.as_slice() else {
        return Err(invalid("time must be HH:MM"));
    };
    let hour = match h.trim().parse::<u32>() {
        Ok(v) if v <= 23 => v,
        _ => return Err(invalid("hour must be 0-23")),
    };
    let minute = match m.trim().parse::<u32>() {
        Ok(v) if v <= 59 => v,
        _ => return Err(invalid("minute must be 0-59")),
    };
    Ok((hour, minute))
}

pub fn format_time(hour: u32, minute: u32) -> String {
    format!("{hour:02}:{minute:02}")
}

/// Parse a comma-separated day-of-week list such as `1,3,5`.
pub fn parse_days(raw: &str) -> Result<Vec<u32>> {
    let mut days = Vec::new();
    for part in raw.trim().split(',') {
        match part.trim().parse::<u32>() {
            Ok(v) => days.push(v),
            Err(_) => return Err(invalid("days must be 0-6")),
        }
    }
    normalize_days(&days)
}

fn normalize_days(days: &[u32]) -> Result<Vec<u32>> {
    if days.iter().any(|&d| d > 6) {
        return Err(invalid("days must be 0-6"));
    }
    let mut out = days.to_vec();
    out.sort_unstable();
    out.dedup();
    if out.is_empty() {
        return Err(invalid("at least one day is required"));
    }
    Ok(out)
}

fn join_days(days: &[u32]) -> String {
    days.iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn invalid(msg: &str) -> TenderError {
    TenderError::InvalidSchedule(msg.to_string())
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Recognize one of the three preset shapes. Anything else yields `None`.
pub fn decode_preset(cron: &str) -> Option<ScheduleSpec> {
    let fields: Vec<&str> = cron.split_whitespace().collect();
    let [minute, hour, dom, month, dow] = fields.as_slice() else {
        return None;
    };

    let minute = minute.parse::<u32>().ok().filter(|m| *m <= 59)?;
    if *dom != "*" || *month != "*" {
        return None;
    }

    if *hour == "*" && *dow == "*" {
        return Some(ScheduleSpec {
            mode: ScheduleMode::Hourly,
            minute,
            hour: 0,
            days: Vec::new(),
        });
    }

    let hour = hour.parse::<u32>().ok().filter(|h| *h <= 23)?;
    if *dow == "*" {
        return Some(ScheduleSpec {
            mode: ScheduleMode::Daily,
            minute,
            hour,
            days: Vec::new(),
        });
    }

    let days = parse_days(dow).ok()?;
    Some(ScheduleSpec {
        mode: ScheduleMode::Weekly,
        minute,
        hour,
        days,
    })
}

pub fn weekday_name(day: u32) -> String {
    match day {
        0 => "Sun",
        1 => "Mon",
        2 => "Tue",
        3 => "Wed",
        4 => "Thu",
        5 => "Fri",
        6 => "Sat",
        other => return other.to_string(),
    }
    .to_string()
}

/// Human-readable trigger description, e.g. `daily at 09:30 UTC + on-demand`.
pub fn summarize(cron: &str, manual: bool, push: bool) -> String {
    let mut parts = Vec::new();
    if !cron.trim().is_empty() {
        let phrase = match decode_preset(cron) {
            Some(spec) => describe(&spec),
            None => "scheduled".to_string(),
        };
        parts.push(phrase);
    }
    if push {
        parts.push("on-push(main)".to_string());
    }
    if manual {
        parts.push("on-demand".to_string());
    }
    if parts.is_empty() {
        return "none".to_string();
    }
    parts.join(" + ")
}

fn describe(spec: &ScheduleSpec) -> String {
    let time = format_time(spec.hour, spec.minute);
    match spec.mode {
        ScheduleMode::Hourly => format!("every hour at :{:02} UTC", spec.minute),
        ScheduleMode::Daily => format!("daily at {time} UTC"),
        ScheduleMode::Weekly => {
            let names: Vec<String> = spec.days.iter().map(|&d| weekday_name(d)).collect();
            format!("weekly {} at {time} UTC", names.join(","))
        }
    }
}

// ---------------------------------------------------------------------------
// Preset catalogs
// ---------------------------------------------------------------------------

pub struct TimePreset {
    pub label: &'static str,
    pub hour: u32,
    pub minute: u32,
}

pub const TIME_PRESETS: &[TimePreset] = &[
    TimePreset { label: "00:00", hour: 0, minute: 0 },
    TimePreset { label: "06:00", hour: 6, minute: 0 },
    TimePreset { label: "09:00", hour: 9, minute: 0 },
    TimePreset { label: "12:00", hour: 12, minute: 0 },
    TimePreset { label: "18:00", hour: 18, minute: 0 },
    TimePreset { label: "21:00", hour: 21, minute: 0 },
];

/// Index of `09:00`, used whenever no preset matches exactly.
pub const DEFAULT_TIME_PRESET: usize = 2;

pub struct WeekdayPreset {
    pub label: &'static str,
    pub days: &'static [u32],
}

pub const WEEKDAY_PRESETS: &[WeekdayPreset] = &[
    WeekdayPreset { label: "Mon-Fri", days: &[1, 2, 3, 4, 5] },
    WeekdayPreset { label: "Sat-Sun", days: &[0, 6] },
    WeekdayPreset { label: "Every day", days: &[0, 1, 2, 3, 4, 5, 6] },
    WeekdayPreset { label: "Monday", days: &[1] },
    WeekdayPreset { label: "Tuesday", days: &[2] },
    WeekdayPreset { label: "Wednesday", days: &[3] },
    WeekdayPreset { label: "Thursday", days: &[4] },
    WeekdayPreset { label: "Friday", days: &[5] },
    WeekdayPreset { label: "Saturday", days: &[6] },
    WeekdayPreset { label: "Sunday", days: &[0] },
];

pub const QUARTER_MINUTES: [u32; 4] = [0, 15, 30, 45];

pub fn quarter_labels() -> Vec<String> {
    QUARTER_MINUTES.iter().map(|m| format!(":{m:02}")).collect()
}

pub fn time_preset_labels() -> Vec<String> {
    TIME_PRESETS.iter().map(|p| p.label.to_string()).collect()
}

pub fn weekday_preset_labels() -> Vec<String> {
    WEEKDAY_PRESETS.iter().map(|p| p.label.to_string()).collect()
}

/// Nearest quarter-hour by absolute difference; ties go to the earlier one.
pub fn nearest_quarter_index(minute: u32) -> usize {
    let mut best = 0;
    let mut best_diff = u32::MAX;
    for (i, q) in QUARTER_MINUTES.iter().enumerate() {
        let diff = minute.abs_diff(*q);
        if diff < best_diff {
            best_diff = diff;
            best = i;
        }
    }
    best
}

pub fn time_preset_index(hour: u32, minute: u32) -> usize {
    TIME_PRESETS
        .iter()
        .position(|p| p.hour == hour && p.minute == minute)
        .unwrap_or(DEFAULT_TIME_PRESET)
}

/// Exact set match only; otherwise the first grouping.
pub fn weekday_preset_index(days: &[u32]) -> usize {
    WEEKDAY_PRESETS
        .iter()
        .position(|p| p.days == days)
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
