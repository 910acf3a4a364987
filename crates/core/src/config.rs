// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::selector::SelectionPolicy;
use chrono_tz::Tz;
use cocolu_domain::{BusinessClock, DEFAULT_LOOKAHEAD_DAYS, DEFAULT_MAX_CLIENTS};

/// Default business timezone.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Caracas;

/// How many times the desk re-selects after a commit conflict.
pub const DEFAULT_MAX_COMMIT_RETRIES: u32 = 3;

/// Entries kept in each of the assignment log and the audit trail.
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

/// Runtime settings of the assignment desk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeskConfig {
    /// The business timezone all schedules are read in.
    pub clock: BusinessClock,
    /// Capacity given to sellers registered without one.
    pub default_max_clients: u32,
    /// Days scanned by next-availability lookups.
    pub lookahead_days: u32,
    /// Fallback and ranking rules.
    pub selection: SelectionPolicy,
    /// Re-selection attempts after a commit conflict.
    pub max_commit_retries: u32,
    /// Newest entries kept per log; older ones are discarded.
    pub history_limit: usize,
}

impl DeskConfig {
    /// Creates a configuration with defaults for everything but the clock.
    #[must_use]
    pub fn new(clock: BusinessClock) -> Self {
        Self {
            clock,
            default_max_clients: DEFAULT_MAX_CLIENTS,
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
            selection: SelectionPolicy::default(),
            max_commit_retries: DEFAULT_MAX_COMMIT_RETRIES,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self::new(BusinessClock::new(DEFAULT_TIMEZONE))
    }
}
