// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use clap::{Parser, Subcommand};
use cocolu::FallbackPolicy;
use cocolu_persistence::DEFAULT_SNAPSHOT_KEY;
use std::path::PathBuf;

/// Cocolu seller desk - routes customer conversations to available sellers
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory holding JSON snapshots
    #[arg(long, env = "COCOLU_DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,

    /// `SQLite` database file; when set, snapshots are stored there instead of JSON files
    #[arg(long, env = "COCOLU_DATABASE")]
    pub database: Option<PathBuf>,

    /// Key the desk snapshot is stored under
    #[arg(long, env = "COCOLU_SNAPSHOT_KEY", default_value = DEFAULT_SNAPSHOT_KEY)]
    pub snapshot_key: String,

    /// IANA name of the business timezone
    #[arg(long, env = "COCOLU_TIMEZONE", default_value = "America/Caracas")]
    pub timezone: String,

    /// Capacity given to sellers registered without one
    #[arg(long, env = "COCOLU_DEFAULT_MAX_CLIENTS", default_value_t = 50)]
    pub default_max_clients: i64,

    /// Seconds between automatic snapshots
    #[arg(long, env = "COCOLU_AUTOSAVE_SECS", default_value_t = 300)]
    pub autosave_secs: u64,

    /// Newest entries kept in the assignment log and in the audit trail
    #[arg(long, env = "COCOLU_HISTORY_LIMIT", default_value_t = 1000)]
    pub history_limit: usize,

    /// Specialty fallback: always, only-when-absent or never
    #[arg(long, env = "COCOLU_FALLBACK", default_value = "always")]
    pub fallback: FallbackPolicy,

    /// Ranking order, most significant first
    #[arg(long, env = "COCOLU_RANKING", default_value = "load,rating,registration")]
    pub ranking: String,

    /// Store opening weekdays (0 = Sunday)
    #[arg(long, env = "COCOLU_BUSINESS_DAYS", default_value = "1,2,3,4,5")]
    pub business_days: String,

    /// Store opening time (HH:MM)
    #[arg(long, env = "COCOLU_BUSINESS_START", default_value = "09:00")]
    pub business_start: String,

    /// Store closing time (HH:MM)
    #[arg(long, env = "COCOLU_BUSINESS_END", default_value = "18:00")]
    pub business_end: String,

    /// Log filter (overrides `RUST_LOG`), e.g. `debug` or `cocolu=trace`
    #[arg(long, env = "COCOLU_LOG_LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// What the service should do. Defaults to `run`.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Route conversations read as NDJSON from stdin until EOF
    Run,
    /// Register a new seller
    AddSeller {
        /// Display name
        name: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Specialty tag (default: general)
        #[arg(long)]
        specialty: Option<String>,
        #[arg(long)]
        max_clients: Option<i64>,
        /// available, busy or offline (default: offline)
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        rating: Option<f64>,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Change profile fields of a seller
    UpdateSeller {
        seller_id: String,
        #[arg(long)]
        name: Option<String>,
        /// Empty string clears the phone number
        #[arg(long)]
        phone: Option<String>,
        /// Empty string clears the email address
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        specialty: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        max_clients: Option<i64>,
    },
    /// Set a seller's status
    SetStatus {
        seller_id: String,
        /// available, busy or offline
        status: String,
    },
    /// Set one weekday of a seller's schedule
    SetSchedule {
        seller_id: String,
        /// Weekday (0 = Sunday)
        weekday: i64,
        /// Start time (HH:MM)
        start: String,
        /// End time (HH:MM, exclusive; 24:00 for end of day)
        end: String,
        /// Keep the window but mark the day as not worked
        #[arg(long)]
        disabled: bool,
    },
    /// Add a day off (YYYY-MM-DD)
    AddDayOff {
        seller_id: String,
        date: String,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Remove a day off (YYYY-MM-DD)
    RemoveDayOff { seller_id: String, date: String },
    /// Set a seller's rating (0-5)
    SetRating { seller_id: String, rating: f64 },
    /// Print all sellers
    Sellers,
    /// Print per-seller load
    Workload,
    /// Print one seller's availability right now
    Availability { seller_id: String },
    /// Print the store-wide availability report
    Report,
}
