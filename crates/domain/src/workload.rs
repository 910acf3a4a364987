// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{Seller, SellerId, SellerStatus};
use serde::{Deserialize, Serialize};

/// Utilization view of a single seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadEntry {
    /// The seller's id.
    pub id: SellerId,
    /// The seller's display name.
    pub name: String,
    /// Active assigned conversations.
    pub current_clients: u32,
    /// Capacity ceiling.
    pub max_clients: u32,
    /// `current_clients / max_clients * 100`.
    pub load_percentage: f64,
    /// Current status.
    pub status: SellerStatus,
}

impl From<&Seller> for WorkloadEntry {
    fn from(seller: &Seller) -> Self {
        Self {
            id: seller.id.clone(),
            name: seller.name.clone(),
            current_clients: seller.current_clients,
            max_clients: seller.max_clients,
            load_percentage: seller.load_percentage(),
            status: seller.status,
        }
    }
}
