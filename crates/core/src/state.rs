// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::assignment::{Binding, DeskStats};
use crate::registry::SellerRegistry;
use chrono::{DateTime, Utc};
use cocolu_audit::{AssignmentEvent, AuditEvent, StateSnapshot};
use cocolu_domain::Seller;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Current version of the persisted desk snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Exported registry contents.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrySnapshot {
    /// Number used for the next seller id.
    pub next_seller_number: u64,
    /// All sellers in registration order.
    pub sellers: Vec<Seller>,
}

/// Everything the desk persists between restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeskSnapshot {
    /// Format version.
    pub version: u32,
    /// Number used for the next seller id.
    pub next_seller_number: u64,
    /// All sellers in registration order.
    pub sellers: Vec<Seller>,
    /// Conversation bindings, live and closed.
    pub assignments: Vec<Binding>,
    /// Append-only assignment log.
    pub events: Vec<AssignmentEvent>,
    /// Registry audit trail.
    pub audit: Vec<AuditEvent>,
    /// Desk counters.
    pub stats: DeskStats,
    /// When the snapshot was taken.
    pub saved_at: Option<DateTime<Utc>>,
}

impl DeskSnapshot {
    /// An empty snapshot, as on first boot.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            next_seller_number: 1,
            sellers: Vec::new(),
            assignments: Vec::new(),
            events: Vec::new(),
            audit: Vec::new(),
            stats: DeskStats {
                total_assignments: 0,
                active_conversations: 0,
                completed_conversations: 0,
                reassigned_conversations: 0,
            },
            saved_at: None,
        }
    }

    /// The registry part of this snapshot.
    #[must_use]
    pub fn registry(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            next_seller_number: self.next_seller_number,
            sellers: self.sellers.clone(),
        }
    }

    /// Builds a snapshot from loosely-typed persisted JSON.
    ///
    /// Each top-level field is read on its own, and list fields element by
    /// element, so one damaged record never discards the rest. Anything
    /// unusable is logged and replaced by its default. This never fails.
    #[must_use]
    pub fn from_json_value(value: &Value) -> Self {
        let mut snapshot: Self = Self::empty();
        let Some(map) = value.as_object() else {
            warn!("Snapshot is not a JSON object; starting empty");
            return snapshot;
        };

        if let Some(version) = map
            .get("version")
            .and_then(Value::as_u64)
            .filter(|v| *v != u64::from(SNAPSHOT_VERSION))
        {
            warn!(
                version,
                expected = SNAPSHOT_VERSION,
                "Unexpected snapshot version; loading anyway"
            );
        }

        snapshot.next_seller_number = map
            .get("nextSellerNumber")
            .and_then(Value::as_u64)
            .unwrap_or(1);
        snapshot.sellers = lenient_list(map.get("sellers"), "sellers");
        snapshot.assignments = lenient_list(map.get("assignments"), "assignments");
        snapshot.events = lenient_list(map.get("events"), "events");
        snapshot.audit = lenient_list(map.get("audit"), "audit");
        snapshot.stats = lenient_field(map.get("stats"), "stats").unwrap_or_default();
        snapshot.saved_at = lenient_field(map.get("savedAt"), "savedAt");

        snapshot
    }
}

impl Default for DeskSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

fn lenient_field<T: DeserializeOwned>(value: Option<&Value>, field: &str) -> Option<T> {
    let value: &Value = value.filter(|v| !v.is_null())?;
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            warn!(field, error = %err, "Malformed snapshot field; using default");
            None
        }
    }
}

fn lenient_list<T: DeserializeOwned>(value: Option<&Value>, field: &str) -> Vec<T> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value(item.clone()) {
                Ok(parsed) => Some(parsed),
                Err(err) => {
                    warn!(field, index, error = %err, "Dropping malformed snapshot entry");
                    None
                }
            })
            .collect(),
        Some(_) => {
            warn!(field, "Snapshot field is not a list; using empty list");
            Vec::new()
        }
    }
}

/// Renders a seller for audit snapshots.
#[must_use]
pub fn seller_snapshot(seller: &Seller) -> StateSnapshot {
    StateSnapshot::new(format!(
        "name={},specialty={},status={},max_clients={},current_clients={},rating={},schedule_days={},days_off={}",
        seller.name,
        seller.specialty,
        seller.status,
        seller.max_clients,
        seller.current_clients,
        seller.rating,
        seller.work_schedule.entries().filter(|(_, d)| d.enabled).count(),
        seller.days_off.len()
    ))
}

/// The result of a successful registry transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult {
    /// The registry after the transition.
    pub new_registry: SellerRegistry,
    /// The affected seller after the transition.
    pub seller: Seller,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}
