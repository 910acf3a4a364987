// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Seller availability evaluation.
//!
//! This module decides whether a seller can take a conversation at a given
//! instant, and when they next could.
//!
//! ## Invariants
//!
//! - Evaluation is pure: no clock reads, no caching, no mutation
//! - All calendar and wall-clock reasoning happens in the declared business
//!   timezone, never the host's local timezone
//! - Checks run in a fixed order (status, day off, schedule, hours,
//!   capacity) and the first failing check is reported
//!
//! ## Usage
//!
//! This logic is used by:
//! - The assignment selector (to filter candidates)
//! - Commit-time re-validation of an assignment
//! - Availability reports

use crate::error::DomainError;
use crate::schedule::ScheduleTime;
use crate::types::{Seller, SellerStatus};
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// How many days ahead `next_availability` looks by default.
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 14;

/// Longest DST gap we step over when resolving a local time.
const MAX_DST_GAP_MINUTES: i64 = 180;

/// The business's wall clock: a declared IANA timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessClock {
    timezone: Tz,
}

impl BusinessClock {
    /// Creates a clock for the given timezone.
    #[must_use]
    pub const fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Creates a clock from an IANA timezone name (e.g. `America/Caracas`).
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a known timezone.
    pub fn from_name(name: &str) -> Result<Self, DomainError> {
        let timezone: Tz = name
            .trim()
            .parse()
            .map_err(|_| DomainError::InvalidTimezone(name.to_string()))?;
        Ok(Self::new(timezone))
    }

    /// Returns the declared timezone.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Converts an instant to business-local time.
    #[must_use]
    pub fn local(&self, instant: DateTime<Utc>) -> DateTime<Tz> {
        instant.with_timezone(&self.timezone)
    }

    /// Resolves a business-local wall-clock time on a date to an instant.
    ///
    /// Ambiguous times (DST fall-back) resolve to the earlier instant.
    /// Non-existent times (DST spring-forward) resolve to the first valid
    /// minute after the gap. `24:00` means midnight at the start of the
    /// next day.
    #[must_use]
    pub fn resolve_local(&self, date: NaiveDate, time: ScheduleTime) -> Option<DateTime<Utc>> {
        let (date, naive_time) = if time.hour() == 24 {
            (date.checked_add_days(Days::new(1))?, NaiveTime::MIN)
        } else {
            (
                date,
                NaiveTime::from_hms_opt(u32::from(time.hour()), u32::from(time.minute()), 0)?,
            )
        };

        let naive = date.and_time(naive_time);
        (0..=MAX_DST_GAP_MINUTES).find_map(|offset| {
            let candidate = naive.checked_add_signed(chrono::Duration::minutes(offset))?;
            self.timezone
                .from_local_datetime(&candidate)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
        })
    }
}

/// Why a seller cannot take a conversation right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnavailableReason {
    /// Status is offline.
    #[serde(rename = "offline")]
    Offline,
    /// Today is one of the seller's days off.
    #[serde(rename = "day off")]
    DayOff,
    /// Today's weekday is missing from the schedule or disabled.
    #[serde(rename = "outside schedule")]
    OutsideSchedule,
    /// Today is a working day but the time is outside the window.
    #[serde(rename = "outside hours")]
    OutsideHours,
    /// The seller already has `max_clients` conversations.
    #[serde(rename = "at capacity")]
    AtCapacity,
}

impl UnavailableReason {
    /// Converts this reason to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Offline => "offline",
            Self::DayOff => "day off",
            Self::OutsideSchedule => "outside schedule",
            Self::OutsideHours => "outside hours",
            Self::AtCapacity => "at capacity",
        }
    }
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of an availability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// The seller can take a conversation.
    Available,
    /// The seller cannot take a conversation.
    Unavailable(UnavailableReason),
}

impl Availability {
    /// Whether the seller is available.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }

    /// The reason the seller is unavailable, if any.
    #[must_use]
    pub const fn reason(&self) -> Option<UnavailableReason> {
        match self {
            Self::Available => None,
            Self::Unavailable(reason) => Some(*reason),
        }
    }

    /// Display form of the outcome (`available` or the unavailable reason).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Unavailable(reason) => reason.as_str(),
        }
    }
}

/// Derived availability view of a seller. Always recomputed, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySnapshot {
    /// Whether the seller can take a conversation now.
    pub is_available: bool,
    /// Why not, when unavailable.
    pub reason: Option<UnavailableReason>,
    /// When the seller next becomes workable, if known within the lookahead.
    pub next_available_at: Option<DateTime<Utc>>,
}

/// Decides whether a seller can take a conversation at `now`.
///
/// # Arguments
///
/// * `seller` - The seller to evaluate
/// * `now` - The instant of evaluation
/// * `clock` - The business timezone
///
/// # Returns
///
/// `Availability::Available`, or the first failing check in the order:
/// offline, day off, outside schedule, outside hours, at capacity.
#[must_use]
pub fn is_available_now(seller: &Seller, now: DateTime<Utc>, clock: &BusinessClock) -> Availability {
    if seller.status == SellerStatus::Offline {
        return Availability::Unavailable(UnavailableReason::Offline);
    }

    let local: DateTime<Tz> = clock.local(now);
    if seller.days_off.contains(local.date_naive()) {
        return Availability::Unavailable(UnavailableReason::DayOff);
    }

    let Some(day) = seller
        .work_schedule
        .for_weekday(local.weekday())
        .filter(|day| day.enabled)
    else {
        return Availability::Unavailable(UnavailableReason::OutsideSchedule);
    };

    if !day.contains(minutes_of_day(&local)) {
        return Availability::Unavailable(UnavailableReason::OutsideHours);
    }

    if !seller.has_capacity() {
        return Availability::Unavailable(UnavailableReason::AtCapacity);
    }

    Availability::Available
}

/// Finds the next instant at or after `now` at which the seller's schedule,
/// days off and capacity would allow a conversation.
///
/// Status is not considered: it changes by hand, not with time.
///
/// # Arguments
///
/// * `seller` - The seller to evaluate
/// * `now` - The instant to search from
/// * `clock` - The business timezone
/// * `lookahead_days` - How many calendar days (including today) to scan
///
/// # Returns
///
/// `Some(now)` if the seller is inside a window right now, the start of the
/// next window otherwise, or `None` if no window exists within the lookahead
/// or the seller is at capacity. `None` is a normal, displayable outcome.
#[must_use]
pub fn next_availability(
    seller: &Seller,
    now: DateTime<Utc>,
    clock: &BusinessClock,
    lookahead_days: u32,
) -> Option<DateTime<Utc>> {
    if !seller.has_capacity() {
        return None;
    }

    let local: DateTime<Tz> = clock.local(now);
    let today: NaiveDate = local.date_naive();
    let minutes_now: u16 = minutes_of_day(&local);

    for offset in 0..lookahead_days {
        let Some(date) = today.checked_add_days(Days::new(u64::from(offset))) else {
            break;
        };
        if seller.days_off.contains(date) {
            continue;
        }
        let Some(day) = seller
            .work_schedule
            .for_weekday(date.weekday())
            .filter(|day| day.enabled)
        else {
            continue;
        };

        if offset == 0 {
            if day.contains(minutes_now) {
                return Some(now);
            }
            if minutes_now >= day.start.minutes_since_midnight() {
                // Today's window has already closed.
                continue;
            }
        }

        if let Some(start) = clock.resolve_local(date, day.start).filter(|start| *start >= now) {
            return Some(start);
        }
    }

    None
}

/// Combines the current availability check with the next-availability scan.
#[must_use]
pub fn availability_snapshot(
    seller: &Seller,
    now: DateTime<Utc>,
    clock: &BusinessClock,
    lookahead_days: u32,
) -> AvailabilitySnapshot {
    let availability: Availability = is_available_now(seller, now, clock);
    let next_available_at: Option<DateTime<Utc>> = if availability.is_available() {
        Some(now)
    } else {
        next_availability(seller, now, clock, lookahead_days)
    };

    AvailabilitySnapshot {
        is_available: availability.is_available(),
        reason: availability.reason(),
        next_available_at,
    }
}

/// Whether a seller's schedule places them inside a working window at `now`,
/// ignoring status and capacity.
#[must_use]
pub fn is_working_now(seller: &Seller, now: DateTime<Utc>, clock: &BusinessClock) -> bool {
    let local: DateTime<Tz> = clock.local(now);
    !seller.days_off.contains(local.date_naive())
        && seller
            .work_schedule
            .for_weekday(local.weekday())
            .is_some_and(|day| day.contains(minutes_of_day(&local)))
}

#[allow(clippy::cast_possible_truncation)]
fn minutes_of_day(local: &DateTime<Tz>) -> u16 {
    // Safe cast: hour < 24 and minute < 60
    (local.hour() * 60 + local.minute()) as u16
}
