// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! One-shot admin subcommands.
//!
//! Each invocation loads the snapshot, runs one command and, for
//! mutations, saves the snapshot back before printing the result.
//!
//! These work on the stored snapshot, not on a running service. Stop the
//! service before changing sellers from the command line, or send the
//! matching admin message on its channel instead. A running service that
//! finds its snapshot changed underneath it stops autosaving and logs an
//! error rather than overwrite the change.

use crate::cli::Commands;
use crate::config::ServiceConfig;
use crate::error::ServiceError;
use chrono::{DateTime, Utc};
use cocolu::{Command, CoreError, NewSeller, SellerDesk, SellerUpdate};
use cocolu_audit::{Actor, Cause};
use cocolu_domain::{BusinessHours, Contact, Seller, SellerId, SellerStatus, WorkSchedule};
use cocolu_persistence::{SnapshotStore, restore_desk};
use serde_json::Value;
use tracing::info;

fn cli_actor() -> Actor {
    let user: String = std::env::var("USER").unwrap_or_else(|_| String::from("cli"));
    Actor::new(user, String::from("admin"))
}

fn cli_cause(action: &str, now: DateTime<Utc>) -> Cause {
    Cause::new(
        format!("cli-{}", now.timestamp_millis()),
        format!("Command line {action}"),
    )
}

/// Maps a mutating subcommand to a registry command.
///
/// New sellers start with the store's business hours as their schedule.
///
/// # Returns
///
/// `None` for read-only subcommands.
///
/// # Errors
///
/// Returns an error if `--status` is not a valid status.
pub fn to_command(
    subcommand: Commands,
    business_hours: &BusinessHours,
) -> Result<Option<Command>, ServiceError> {
    let command: Command = match subcommand {
        Commands::AddSeller {
            name,
            phone,
            email,
            specialty,
            max_clients,
            status,
            rating,
            notes,
        } => Command::AddSeller {
            seller: NewSeller {
                name,
                contact: Contact { phone, email },
                notes,
                specialty,
                status: status
                    .as_deref()
                    .map(str::parse::<SellerStatus>)
                    .transpose()
                    .map_err(CoreError::from)?,
                max_clients,
                rating,
                work_schedule: WorkSchedule::uniform(
                    business_hours.days(),
                    business_hours.start(),
                    business_hours.end(),
                )?,
                ..NewSeller::default()
            },
        },
        Commands::UpdateSeller {
            seller_id,
            name,
            phone,
            email,
            specialty,
            notes,
            max_clients,
        } => Command::UpdateSeller {
            seller_id: SellerId::new(&seller_id),
            changes: SellerUpdate {
                name,
                phone,
                email,
                specialty,
                notes,
                max_clients,
                status: None,
            },
        },
        Commands::SetStatus { seller_id, status } => Command::SetStatus {
            seller_id: SellerId::new(&seller_id),
            status,
        },
        Commands::SetSchedule {
            seller_id,
            weekday,
            start,
            end,
            disabled,
        } => Command::SetSchedule {
            seller_id: SellerId::new(&seller_id),
            weekday,
            enabled: !disabled,
            start_time: start,
            end_time: end,
        },
        Commands::AddDayOff {
            seller_id,
            date,
            reason,
        } => Command::AddDayOff {
            seller_id: SellerId::new(&seller_id),
            date,
            reason,
        },
        Commands::RemoveDayOff { seller_id, date } => Command::RemoveDayOff {
            seller_id: SellerId::new(&seller_id),
            date,
        },
        Commands::SetRating { seller_id, rating } => Command::UpdateRating {
            seller_id: SellerId::new(&seller_id),
            rating,
        },
        Commands::Run
        | Commands::Sellers
        | Commands::Workload
        | Commands::Availability { .. }
        | Commands::Report => return Ok(None),
    };
    Ok(Some(command))
}

/// Runs one admin subcommand against the stored snapshot.
///
/// # Returns
///
/// The JSON to print.
///
/// # Errors
///
/// Returns an error if the command is rejected or the snapshot cannot be
/// saved.
pub fn run_admin(
    subcommand: Commands,
    config: &ServiceConfig,
    store: &dyn SnapshotStore,
    now: DateTime<Utc>,
) -> Result<Value, ServiceError> {
    let desk: SellerDesk = restore_desk(store, &config.snapshot_key, config.desk.clone());

    let output: Value = match subcommand {
        Commands::Sellers => serde_json::to_value(desk.get_all_sellers())?,
        Commands::Workload => serde_json::to_value(desk.get_workload())?,
        Commands::Availability { seller_id } => {
            serde_json::to_value(desk.availability(&SellerId::new(&seller_id), now)?)?
        }
        Commands::Report => serde_json::to_value(desk.availability_report(now))?,
        mutation => {
            let Some(command) = to_command(mutation, &config.business_hours)? else {
                return Ok(Value::Null);
            };
            let action: &'static str = command.name();
            let seller: Seller = desk.execute(command, cli_actor(), cli_cause(action, now))?;
            store.save(&config.snapshot_key, &desk.snapshot(now))?;
            info!(seller_id = %seller.id, action, "Saved admin change");
            serde_json::to_value(seller)?
        }
    };
    Ok(output)
}
