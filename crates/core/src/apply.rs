// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::registry::SellerRegistry;
use crate::state::{TransitionResult, seller_snapshot};
use cocolu_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use cocolu_domain::{Seller, SellerId};

/// Applies an admin command to the registry, producing a new registry and
/// an audit event.
///
/// # Arguments
///
/// * `registry` - The current registry (immutable)
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new registry, the affected
///   seller and the audit event
/// * `Err(CoreError)` if the command is invalid
///
/// # Errors
///
/// Returns an error if:
/// - The seller does not exist
/// - The command violates domain rules
pub fn apply(
    registry: &SellerRegistry,
    command: Command,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let name: &'static str = command.name();
    let mut new_registry: SellerRegistry = registry.clone();

    let (seller_id, before, details): (SellerId, StateSnapshot, String) = match command {
        Command::AddSeller { seller } => {
            let created: Seller = new_registry.add_seller(seller)?;
            let details: String = format!("Registered {} as {}", created.name, created.id);
            (created.id, StateSnapshot::empty(), details)
        }
        Command::UpdateSeller { seller_id, changes } => {
            let before: StateSnapshot = seller_snapshot(registry.get_seller(&seller_id)?);
            let details: String = format!("Updated profile of {seller_id}");
            new_registry.update_seller(&seller_id, changes)?;
            (seller_id, before, details)
        }
        Command::SetStatus { seller_id, status } => {
            let before: StateSnapshot = seller_snapshot(registry.get_seller(&seller_id)?);
            let updated: Seller = new_registry.update_seller_status(&seller_id, &status)?;
            let details: String = format!("Status of {seller_id} set to {}", updated.status);
            (seller_id, before, details)
        }
        Command::SetSchedule {
            seller_id,
            weekday,
            enabled,
            start_time,
            end_time,
        } => {
            let before: StateSnapshot = seller_snapshot(registry.get_seller(&seller_id)?);
            new_registry.update_work_schedule(
                &seller_id,
                weekday,
                enabled,
                &start_time,
                &end_time,
            )?;
            let details: String = format!(
                "Weekday {weekday} of {seller_id} set to {start_time}-{end_time} (enabled: {enabled})"
            );
            (seller_id, before, details)
        }
        Command::AddDayOff {
            seller_id,
            date,
            reason,
        } => {
            let before: StateSnapshot = seller_snapshot(registry.get_seller(&seller_id)?);
            let details: String = reason.as_ref().map_or_else(
                || format!("Day off {date} for {seller_id}"),
                |reason| format!("Day off {date} for {seller_id}: {reason}"),
            );
            new_registry.add_day_off(&seller_id, &date, reason)?;
            (seller_id, before, details)
        }
        Command::RemoveDayOff { seller_id, date } => {
            let before: StateSnapshot = seller_snapshot(registry.get_seller(&seller_id)?);
            let removed: bool = new_registry.remove_day_off(&seller_id, &date)?;
            let details: String = if removed {
                format!("Removed day off {date} for {seller_id}")
            } else {
                format!("No day off {date} for {seller_id}; nothing removed")
            };
            (seller_id, before, details)
        }
        Command::UpdateRating { seller_id, rating } => {
            let before: StateSnapshot = seller_snapshot(registry.get_seller(&seller_id)?);
            new_registry.update_rating(&seller_id, rating)?;
            let details: String = format!("Rating of {seller_id} set to {rating}");
            (seller_id, before, details)
        }
    };

    let seller: Seller = new_registry.get_seller(&seller_id)?.clone();
    let after: StateSnapshot = seller_snapshot(&seller);
    let action: Action = Action::new(String::from(name), Some(details));
    let audit_event: AuditEvent = AuditEvent::new(actor, cause, action, seller_id, before, after);

    Ok(TransitionResult {
        new_registry,
        seller,
        audit_event,
    })
}
