// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Seller name is empty or invalid.
    InvalidName(String),
    /// Seller status is not one of the allowed values.
    InvalidStatus(String),
    /// Maximum client count must be at least one.
    InvalidMaxClients {
        /// The rejected value.
        value: i64,
    },
    /// Rating must be a finite number between 0 and 5.
    InvalidRating(String),
    /// A time-of-day string is not in `HH:MM` form.
    InvalidTime(String),
    /// A weekday index is outside 0-6.
    InvalidWeekday(i64),
    /// A schedule entry does not describe a usable window.
    InvalidScheduleWindow {
        /// The window start (`HH:MM`).
        start: String,
        /// The window end (`HH:MM`).
        end: String,
    },
    /// A calendar date could not be parsed.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// The business timezone is not a known IANA name.
    InvalidTimezone(String),
    /// Business hours configuration is invalid.
    InvalidBusinessHours {
        /// Description of the problem.
        reason: String,
    },
    /// Ranking order is empty or repeats a key.
    InvalidRankingOrder(String),
    /// Unknown specialty fallback policy.
    InvalidFallbackPolicy(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidStatus(status) => write!(
                f,
                "Invalid seller status '{status}'. Must be one of: available, busy, offline"
            ),
            Self::InvalidMaxClients { value } => {
                write!(
                    f,
                    "Invalid max clients: {value}. Must be greater than 0"
                )
            }
            Self::InvalidRating(value) => {
                write!(f, "Invalid rating: {value}. Must be between 0 and 5")
            }
            Self::InvalidTime(value) => {
                write!(f, "Invalid time '{value}'. Expected HH:MM")
            }
            Self::InvalidWeekday(day) => {
                write!(f, "Invalid weekday {day}. Must be between 0 and 6")
            }
            Self::InvalidScheduleWindow { start, end } => {
                write!(
                    f,
                    "Invalid schedule window {start}-{end}: end must be after start"
                )
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::InvalidTimezone(tz) => write!(f, "Invalid timezone: {tz}"),
            Self::InvalidBusinessHours { reason } => {
                write!(f, "Invalid business hours: {reason}")
            }
            Self::InvalidRankingOrder(msg) => write!(f, "Invalid ranking order: {msg}"),
            Self::InvalidFallbackPolicy(value) => write!(
                f,
                "Invalid fallback policy '{value}'. Must be one of: always, only-when-absent, never"
            ),
        }
    }
}

impl std::error::Error for DomainError {}
