// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Store-wide business hours.
//!
//! Business hours are independent of individual seller schedules. They are
//! used to tell customers whether the store is open and when it opens next.

use crate::availability::BusinessClock;
use crate::error::DomainError;
use crate::schedule::{DAYS_PER_WEEK, DaySchedule, ScheduleTime, weekday_index};
use chrono::{DateTime, Datelike, Days, NaiveDate, Timelike, Utc};

const DAY_NAMES: [&str; DAYS_PER_WEEK] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Opening days and daily window of the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessHours {
    /// Open weekdays (0 = Sunday), sorted and unique.
    days: Vec<u8>,
    /// Daily window shared by every open day.
    window: DaySchedule,
}

impl BusinessHours {
    /// Creates business hours.
    ///
    /// # Arguments
    ///
    /// * `days` - Open weekdays (0 = Sunday)
    /// * `start` - Opening time
    /// * `end` - Closing time (exclusive)
    ///
    /// # Errors
    ///
    /// Returns an error if no day is given, a weekday is outside 0-6, or
    /// the window is empty.
    pub fn new(days: &[u8], start: ScheduleTime, end: ScheduleTime) -> Result<Self, DomainError> {
        if days.is_empty() {
            return Err(DomainError::InvalidBusinessHours {
                reason: String::from("at least one business day is required"),
            });
        }
        if let Some(bad) = days.iter().find(|d| usize::from(**d) >= DAYS_PER_WEEK) {
            return Err(DomainError::InvalidWeekday(i64::from(*bad)));
        }
        let window: DaySchedule = DaySchedule::new(true, start, end)?;

        let mut days: Vec<u8> = days.to_vec();
        days.sort_unstable();
        days.dedup();

        Ok(Self { days, window })
    }

    /// Parses a comma-separated weekday list such as `1,2,3,4,5`.
    ///
    /// # Errors
    ///
    /// Returns an error if an element is not an integer in 0-6.
    pub fn parse_days(value: &str) -> Result<Vec<u8>, DomainError> {
        value
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                let day: i64 = part.parse().map_err(|_| DomainError::InvalidBusinessHours {
                    reason: format!("'{part}' is not a weekday number"),
                })?;
                u8::try_from(day)
                    .ok()
                    .filter(|d| usize::from(*d) < DAYS_PER_WEEK)
                    .ok_or(DomainError::InvalidWeekday(day))
            })
            .collect()
    }

    /// Open weekdays.
    #[must_use]
    pub fn days(&self) -> &[u8] {
        &self.days
    }

    /// Opening time.
    #[must_use]
    pub const fn start(&self) -> ScheduleTime {
        self.window.start
    }

    /// Closing time.
    #[must_use]
    pub const fn end(&self) -> ScheduleTime {
        self.window.end
    }

    /// Whether the given date is a business day.
    #[must_use]
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        self.days.contains(&weekday_index(date.weekday()))
    }

    /// Whether the store is open at `now`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn is_open(&self, now: DateTime<Utc>, clock: &BusinessClock) -> bool {
        let local = clock.local(now);
        // Safe cast: hour < 24 and minute < 60
        let minutes: u16 = (local.hour() * 60 + local.minute()) as u16;
        self.is_business_day(local.date_naive()) && self.window.contains(minutes)
    }

    /// The next opening instant strictly after `now`, scanning one week.
    ///
    /// When the store is closed now and opens later today, that is returned.
    #[must_use]
    pub fn next_opening(&self, now: DateTime<Utc>, clock: &BusinessClock) -> Option<DateTime<Utc>> {
        let today: NaiveDate = clock.local(now).date_naive();
        (0..=DAYS_PER_WEEK as u64)
            .filter_map(|offset| today.checked_add_days(Days::new(offset)))
            .filter(|date| self.is_business_day(*date))
            .filter_map(|date| clock.resolve_local(date, self.window.start))
            .find(|opening| *opening > now)
    }

    /// Human-readable summary, e.g. `Monday to Friday: 09:00 - 18:00`.
    #[must_use]
    pub fn describe(&self) -> String {
        let names: Vec<&str> = self
            .days
            .iter()
            .filter_map(|d| DAY_NAMES.get(usize::from(*d)).copied())
            .collect();

        let days_text: String = if self.days == [1, 2, 3, 4, 5] {
            String::from("Monday to Friday")
        } else {
            names.join(", ")
        };

        format!("{days_text}: {} - {}", self.window.start, self.window.end)
    }
}

impl Default for BusinessHours {
    /// Monday to Friday, 09:00 to 18:00.
    fn default() -> Self {
        Self {
            days: vec![1, 2, 3, 4, 5],
            window: DaySchedule {
                enabled: true,
                start: ScheduleTime::from_minutes(9 * 60),
                end: ScheduleTime::from_minutes(18 * 60),
            },
        }
    }
}
