// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::registry::{NewSeller, SellerUpdate};
use cocolu_domain::SellerId;

/// A command represents admin intent as data only.
///
/// Commands are the only way admins change the registry; each successful
/// command yields exactly one audit event.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Register a new seller.
    AddSeller {
        /// The seller's data.
        seller: NewSeller,
    },
    /// Apply a partial profile update.
    UpdateSeller {
        /// The seller to update.
        seller_id: SellerId,
        /// The fields to change.
        changes: SellerUpdate,
    },
    /// Change a seller's status.
    SetStatus {
        /// The seller to update.
        seller_id: SellerId,
        /// The new status, as entered (`available`, `busy`, `offline`).
        status: String,
    },
    /// Replace one weekday of a seller's schedule.
    SetSchedule {
        /// The seller to update.
        seller_id: SellerId,
        /// 0 (Sunday) through 6 (Saturday).
        weekday: i64,
        /// Whether the seller works that day.
        enabled: bool,
        /// Window start, `HH:MM`.
        start_time: String,
        /// Window end, `HH:MM`.
        end_time: String,
    },
    /// Add (or replace) a day off.
    AddDayOff {
        /// The seller to update.
        seller_id: SellerId,
        /// The date, `YYYY-MM-DD`.
        date: String,
        /// Optional reason.
        reason: Option<String>,
    },
    /// Remove a day off.
    RemoveDayOff {
        /// The seller to update.
        seller_id: SellerId,
        /// The date, `YYYY-MM-DD`.
        date: String,
    },
    /// Set a seller's rating.
    UpdateRating {
        /// The seller to update.
        seller_id: SellerId,
        /// The new rating, 0-5.
        rating: f64,
    },
}

impl Command {
    /// The action name recorded in audit events.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddSeller { .. } => "AddSeller",
            Self::UpdateSeller { .. } => "UpdateSeller",
            Self::SetStatus { .. } => "SetStatus",
            Self::SetSchedule { .. } => "SetSchedule",
            Self::AddDayOff { .. } => "AddDayOff",
            Self::RemoveDayOff { .. } => "RemoveDayOff",
            Self::UpdateRating { .. } => "UpdateRating",
        }
    }
}
