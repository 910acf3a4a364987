// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{DateTime, Utc};
use cocolu_domain::{
    AvailabilitySnapshot, BusinessClock, Seller, SellerId, SellerStatus, Specialty,
    availability_snapshot, is_working_now,
};
use serde::{Deserialize, Serialize};

/// Availability and load of one seller at report time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerAvailability {
    /// The seller's id.
    pub id: SellerId,
    /// The seller's display name.
    pub name: String,
    /// The seller's specialty.
    pub specialty: Specialty,
    /// Current status.
    pub status: SellerStatus,
    /// Active assigned conversations.
    pub current_clients: u32,
    /// Capacity ceiling.
    pub max_clients: u32,
    /// `current_clients / max_clients * 100`.
    pub load_percentage: f64,
    /// Whether the schedule places the seller on shift right now.
    pub working_now: bool,
    /// Availability right now and next opening.
    pub availability: AvailabilitySnapshot,
}

/// Store-wide availability summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityReport {
    /// When the report was computed.
    pub generated_at: DateTime<Utc>,
    /// Registered sellers.
    pub total: usize,
    /// Sellers with status `available`.
    pub available: usize,
    /// Sellers with status `busy`.
    pub busy: usize,
    /// Sellers with status `offline`.
    pub offline: usize,
    /// Non-offline sellers currently on shift.
    pub working_now: usize,
    /// Sellers who would pass selection right now.
    pub assignable_now: usize,
    /// Per-seller detail in registration order.
    pub sellers: Vec<SellerAvailability>,
}

impl AvailabilityReport {
    /// Computes the report for a set of sellers.
    #[must_use]
    pub fn build(
        sellers: &[Seller],
        now: DateTime<Utc>,
        clock: &BusinessClock,
        lookahead_days: u32,
    ) -> Self {
        let details: Vec<SellerAvailability> = sellers
            .iter()
            .map(|seller| SellerAvailability {
                id: seller.id.clone(),
                name: seller.name.clone(),
                specialty: seller.specialty.clone(),
                status: seller.status,
                current_clients: seller.current_clients,
                max_clients: seller.max_clients,
                load_percentage: seller.load_percentage(),
                working_now: seller.status != SellerStatus::Offline
                    && is_working_now(seller, now, clock),
                availability: availability_snapshot(seller, now, clock, lookahead_days),
            })
            .collect();

        let count_status = |status: SellerStatus| -> usize {
            sellers.iter().filter(|s| s.status == status).count()
        };

        Self {
            generated_at: now,
            total: sellers.len(),
            available: count_status(SellerStatus::Available),
            busy: count_status(SellerStatus::Busy),
            offline: count_status(SellerStatus::Offline),
            working_now: details.iter().filter(|d| d.working_now).count(),
            assignable_now: details
                .iter()
                .filter(|d| d.availability.is_available)
                .count(),
            sellers: details,
        }
    }
}
