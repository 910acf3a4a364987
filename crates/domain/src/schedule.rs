// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Weekly work schedules and days off.
//!
//! Weekdays are numbered 0 (Sunday) through 6 (Saturday).
//!
//! ## Loading Policy
//!
//! Schedules and days off arrive from persisted snapshots written by older
//! versions of the system. Loading is lenient and happens once:
//! - Malformed weekday entries become "not enabled"
//! - Weekday keys outside 0-6 are ignored
//! - Malformed day-off entries are dropped
//!
//! Every substitution is logged as a warning. Editing through the registry
//! is strict and rejects the same inputs with a `DomainError`.

use crate::error::DomainError;
use chrono::{NaiveDate, Weekday};
use serde::de::Deserializer;
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Number of weekday slots in a work schedule.
pub const DAYS_PER_WEEK: usize = 7;

const MINUTES_PER_DAY: u16 = 24 * 60;

/// Returns the 0-based weekday index (0 = Sunday) for a chrono weekday.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn weekday_index(weekday: Weekday) -> u8 {
    // Safe cast: num_days_from_sunday is always in 0..7
    weekday.num_days_from_sunday() as u8
}

/// A wall-clock time of day with minute precision.
///
/// `24:00` is accepted so that a window can run until midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScheduleTime {
    /// Minutes since local midnight (0..=1440).
    minutes: u16,
}

impl ScheduleTime {
    /// Local midnight.
    pub const MIDNIGHT: Self = Self { minutes: 0 };

    /// Creates a time from hour and minute.
    ///
    /// # Errors
    ///
    /// Returns an error if the hour or minute is out of range.
    pub fn new(hour: u8, minute: u8) -> Result<Self, DomainError> {
        let minutes: u16 = u16::from(hour) * 60 + u16::from(minute);
        if minute > 59 || minutes > MINUTES_PER_DAY {
            return Err(DomainError::InvalidTime(format!("{hour:02}:{minute:02}")));
        }
        Ok(Self { minutes })
    }

    /// Creates a time from minutes since midnight. Callers guarantee range.
    pub(crate) const fn from_minutes(minutes: u16) -> Self {
        Self { minutes }
    }

    /// Parses an `HH:MM` (or `HH:MM:SS`) string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid time of day.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidTime(value.to_string());
        let trimmed: &str = value.trim();

        let mut parts = trimmed.split(':');
        let hour_part: &str = parts.next().ok_or_else(invalid)?;
        let minute_part: &str = parts.next().ok_or_else(invalid)?;
        let second_part: Option<&str> = parts.next();
        if parts.next().is_some() {
            return Err(invalid());
        }

        if hour_part.is_empty() || hour_part.len() > 2 || minute_part.len() != 2 {
            return Err(invalid());
        }
        let hour: u8 = hour_part.parse().map_err(|_| invalid())?;
        let minute: u8 = minute_part.parse().map_err(|_| invalid())?;

        if let Some(seconds) = second_part {
            let seconds: u8 = seconds.parse().map_err(|_| invalid())?;
            if seconds > 59 || (hour == 24 && seconds != 0) {
                return Err(invalid());
            }
        }

        Self::new(hour, minute).map_err(|_| invalid())
    }

    /// Returns the number of minutes since local midnight.
    #[must_use]
    pub const fn minutes_since_midnight(&self) -> u16 {
        self.minutes
    }

    /// Returns the hour component (0-24).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn hour(&self) -> u8 {
        // Safe cast: minutes <= 1440, so hour <= 24
        (self.minutes / 60) as u8
    }

    /// Returns the minute component (0-59).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn minute(&self) -> u8 {
        (self.minutes % 60) as u8
    }
}

impl std::fmt::Display for ScheduleTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl std::str::FromStr for ScheduleTime {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ScheduleTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ScheduleTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: String = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// The working window for a single weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    /// Whether the seller works on this weekday at all.
    pub enabled: bool,
    /// Start of the window (inclusive).
    #[serde(rename = "startTime")]
    pub start: ScheduleTime,
    /// End of the window (exclusive).
    #[serde(rename = "endTime")]
    pub end: ScheduleTime,
}

impl DaySchedule {
    /// Creates a day schedule, validating that the window is non-empty.
    ///
    /// # Errors
    ///
    /// Returns an error if `end` is not after `start`.
    pub fn new(enabled: bool, start: ScheduleTime, end: ScheduleTime) -> Result<Self, DomainError> {
        if end <= start {
            return Err(DomainError::InvalidScheduleWindow {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self {
            enabled,
            start,
            end,
        })
    }

    /// Parses a day schedule from `HH:MM` strings.
    ///
    /// # Errors
    ///
    /// Returns an error if either time is malformed or the window is empty.
    pub fn parse(enabled: bool, start: &str, end: &str) -> Result<Self, DomainError> {
        Self::new(enabled, ScheduleTime::parse(start)?, ScheduleTime::parse(end)?)
    }

    /// Whether the given time of day (minutes since midnight) falls in `[start, end)`.
    #[must_use]
    pub const fn contains(&self, minutes_since_midnight: u16) -> bool {
        self.enabled
            && minutes_since_midnight >= self.start.minutes_since_midnight()
            && minutes_since_midnight < self.end.minutes_since_midnight()
    }
}

/// A weekly schedule indexed by weekday (0 = Sunday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkSchedule {
    days: [Option<DaySchedule>; DAYS_PER_WEEK],
}

impl WorkSchedule {
    /// Creates an empty schedule (no working days).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            days: [None; DAYS_PER_WEEK],
        }
    }

    /// Creates a schedule with the same window on each of the given weekdays.
    ///
    /// # Errors
    ///
    /// Returns an error if a weekday is outside 0-6 or the window is empty.
    pub fn uniform(
        weekdays: &[u8],
        start: ScheduleTime,
        end: ScheduleTime,
    ) -> Result<Self, DomainError> {
        let mut schedule: Self = Self::new();
        for weekday in weekdays {
            schedule.set(*weekday, DaySchedule::new(true, start, end)?)?;
        }
        Ok(schedule)
    }

    /// Returns the entry for a weekday, if one exists.
    #[must_use]
    pub fn get(&self, weekday: u8) -> Option<&DaySchedule> {
        self.days.get(usize::from(weekday)).and_then(Option::as_ref)
    }

    /// Returns the entry for a chrono weekday, if one exists.
    #[must_use]
    pub fn for_weekday(&self, weekday: Weekday) -> Option<&DaySchedule> {
        self.get(weekday_index(weekday))
    }

    /// Replaces the entry for a weekday.
    ///
    /// # Errors
    ///
    /// Returns an error if the weekday is outside 0-6.
    pub fn set(&mut self, weekday: u8, entry: DaySchedule) -> Result<(), DomainError> {
        let slot = self
            .days
            .get_mut(usize::from(weekday))
            .ok_or_else(|| DomainError::InvalidWeekday(i64::from(weekday)))?;
        *slot = Some(entry);
        Ok(())
    }

    /// Whether any weekday is enabled.
    #[must_use]
    pub fn has_enabled_day(&self) -> bool {
        self.days.iter().flatten().any(|day| day.enabled)
    }

    /// Iterates over `(weekday, entry)` pairs that are present.
    pub fn entries(&self) -> impl Iterator<Item = (u8, &DaySchedule)> {
        (0_u8..).zip(self.days.iter()).filter_map(|(i, d)| d.as_ref().map(|d| (i, d)))
    }

    /// Builds a schedule from loosely-typed persisted JSON.
    ///
    /// Accepts an object keyed by weekday index (`"0"`-`"6"`) or weekday
    /// name (English or Spanish), or a JSON string containing such an object.
    /// Anything unusable is logged and skipped; this never fails.
    #[must_use]
    pub fn from_json_value(value: &Value) -> Self {
        let mut schedule: Self = Self::new();

        let map = match value {
            Value::Null => return schedule,
            Value::String(encoded) if encoded.trim().is_empty() => return schedule,
            Value::String(encoded) => {
                return serde_json::from_str::<Value>(encoded).map_or_else(
                    |err| {
                        warn!(error = %err, "Work schedule is not valid JSON; treating as empty");
                        schedule
                    },
                    |decoded| Self::from_json_value(&decoded),
                );
            }
            Value::Object(map) => map,
            other => {
                warn!(value = %other, "Work schedule is not an object; treating as empty");
                return schedule;
            }
        };

        for (key, entry) in map {
            let Some(weekday) = parse_weekday_key(key) else {
                warn!(key = %key, "Ignoring work schedule entry with unknown weekday");
                continue;
            };
            let day: DaySchedule = parse_day_entry(weekday, entry);
            if let Some(slot) = schedule.days.get_mut(usize::from(weekday)) {
                *slot = Some(day);
            }
        }

        schedule
    }
}

/// Parses a weekday key: a 0-6 index or an English/Spanish day name.
fn parse_weekday_key(key: &str) -> Option<u8> {
    let normalized: String = key.trim().to_lowercase();
    if let Ok(index) = normalized.parse::<i64>() {
        return u8::try_from(index).ok().filter(|d| usize::from(*d) < DAYS_PER_WEEK);
    }
    let index: u8 = match normalized.as_str() {
        "sunday" | "domingo" => 0,
        "monday" | "lunes" => 1,
        "tuesday" | "martes" => 2,
        "wednesday" | "miercoles" | "miércoles" => 3,
        "thursday" | "jueves" => 4,
        "friday" | "viernes" => 5,
        "saturday" | "sabado" | "sábado" => 6,
        _ => return None,
    };
    Some(index)
}

/// Interprets one persisted weekday entry, defaulting to disabled.
fn parse_day_entry(weekday: u8, entry: &Value) -> DaySchedule {
    let disabled: DaySchedule = DaySchedule {
        enabled: false,
        start: ScheduleTime::MIDNIGHT,
        end: ScheduleTime::MIDNIGHT,
    };

    let Some(object) = entry.as_object() else {
        warn!(weekday, "Work schedule entry is not an object; treating as disabled");
        return disabled;
    };

    let enabled: bool = match object.get("enabled") {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(n)) => n.as_i64().is_some_and(|n| n != 0),
        _ => false,
    };

    let start: Option<&str> = object.get("startTime").and_then(Value::as_str);
    let end: Option<&str> = object.get("endTime").and_then(Value::as_str);

    match (start, end) {
        (Some(start), Some(end)) => match DaySchedule::parse(enabled, start, end) {
            Ok(day) => day,
            Err(err) => {
                if enabled {
                    warn!(weekday, error = %err, "Malformed work schedule entry; treating as disabled");
                }
                disabled
            }
        },
        _ => {
            if enabled {
                warn!(weekday, "Work schedule entry missing times; treating as disabled");
            }
            disabled
        }
    }
}

impl Serialize for WorkSchedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let count: usize = self.days.iter().flatten().count();
        let mut map = serializer.serialize_map(Some(count))?;
        for (weekday, entry) in self.entries() {
            map.serialize_entry(&weekday.to_string(), entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for WorkSchedule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Value = Value::deserialize(deserializer)?;
        Ok(Self::from_json_value(&raw))
    }
}

/// Parses a day-off date.
///
/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp, keeping only the
/// calendar date part.
///
/// # Errors
///
/// Returns an error if no calendar date can be read from the string.
pub fn parse_day_off_date(value: &str) -> Result<NaiveDate, DomainError> {
    let trimmed: &str = value.trim();
    let date_part: &str = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}

/// A single day off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayOff {
    /// The calendar date (in the business timezone).
    pub date: NaiveDate,
    /// Optional reason, display-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// The set of calendar dates on which a seller does not work.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DaysOff {
    dates: BTreeMap<NaiveDate, Option<String>>,
}

impl DaysOff {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dates: BTreeMap::new(),
        }
    }

    /// Whether the date is a day off.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains_key(&date)
    }

    /// Adds a day off, replacing the reason of an existing entry.
    ///
    /// Returns `true` if the date was not already present.
    pub fn insert(&mut self, date: NaiveDate, reason: Option<String>) -> bool {
        self.dates.insert(date, reason).is_none()
    }

    /// Removes a day off. Returns `true` if it was present.
    pub fn remove(&mut self, date: NaiveDate) -> bool {
        self.dates.remove(&date).is_some()
    }

    /// Returns the reason recorded for a day off.
    #[must_use]
    pub fn reason(&self, date: NaiveDate) -> Option<&str> {
        self.dates.get(&date).and_then(Option::as_deref)
    }

    /// Number of days off.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether there are no days off.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Iterates over days off in date order.
    pub fn iter(&self) -> impl Iterator<Item = DayOff> + '_ {
        self.dates.iter().map(|(date, reason)| DayOff {
            date: *date,
            reason: reason.clone(),
        })
    }

    /// Builds a day-off set from loosely-typed persisted JSON.
    ///
    /// Accepts an array of date strings or `{date, reason}` objects, or a
    /// JSON string containing such an array. Unusable entries are logged
    /// and dropped; this never fails.
    #[must_use]
    pub fn from_json_value(value: &Value) -> Self {
        let mut days_off: Self = Self::new();

        let entries = match value {
            Value::Null => return days_off,
            Value::String(encoded) if encoded.trim().is_empty() => return days_off,
            Value::String(encoded) => {
                return serde_json::from_str::<Value>(encoded).map_or_else(
                    |err| {
                        warn!(error = %err, "Days off are not valid JSON; treating as empty");
                        days_off
                    },
                    |decoded| Self::from_json_value(&decoded),
                );
            }
            Value::Array(entries) => entries,
            other => {
                warn!(value = %other, "Days off are not a list; treating as empty");
                return days_off;
            }
        };

        for entry in entries {
            let (raw_date, reason) = match entry {
                Value::String(date) => (Some(date.as_str()), None),
                Value::Object(object) => (
                    object.get("date").and_then(Value::as_str),
                    object
                        .get("reason")
                        .and_then(Value::as_str)
                        .filter(|r| !r.trim().is_empty())
                        .map(str::to_string),
                ),
                _ => (None, None),
            };

            match raw_date.map(parse_day_off_date) {
                Some(Ok(date)) => {
                    days_off.insert(date, reason);
                }
                Some(Err(err)) => warn!(error = %err, "Dropping malformed day off"),
                None => warn!(entry = %entry, "Dropping day off without a date"),
            }
        }

        days_off
    }
}

impl Serialize for DaysOff {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.dates.len()))?;
        for day in self.iter() {
            seq.serialize_element(&day)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for DaysOff {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Value = Value::deserialize(deserializer)?;
        Ok(Self::from_json_value(&raw))
    }
}
