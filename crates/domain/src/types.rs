// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::schedule::{DaysOff, WorkSchedule};
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use tracing::warn;

/// Default maximum number of concurrent clients for a seller.
pub const DEFAULT_MAX_CLIENTS: u32 = 50;

/// Default rating assigned to a newly registered seller.
pub const DEFAULT_RATING: f64 = 5.0;

/// Identifies a seller.
///
/// Identifiers are opaque. Newly registered sellers receive ids of the form
/// `SELLER001`, `SELLER002`, ...
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SellerId(String);

impl SellerId {
    /// Creates a seller id from an existing value.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_string())
    }

    /// Creates the id for the n-th registered seller.
    #[must_use]
    pub fn from_number(number: u64) -> Self {
        Self(format!("SELLER{number:03}"))
    }

    /// Returns the numeric suffix of a `SELLERnnn` id, if it has one.
    #[must_use]
    pub fn number(&self) -> Option<u64> {
        self.0.strip_prefix("SELLER").and_then(|n| n.parse().ok())
    }

    /// Returns the id value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SellerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies a customer conversation (typically the customer's chat id).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    /// Creates a conversation id.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_string())
    }

    /// Returns the id value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Coarse, manually or system settable seller status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SellerStatus {
    /// Ready to take conversations.
    Available,
    /// Working but flagged as busy. Informational only.
    Busy,
    /// Not working. Never receives conversations.
    #[default]
    Offline,
}

impl SellerStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Busy => "busy",
            Self::Offline => "offline",
        }
    }
}

impl FromStr for SellerStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            // "online" is the status name used by earlier releases
            "available" | "online" => Ok(Self::Available),
            "busy" => Ok(Self::Busy),
            "offline" => Ok(Self::Offline),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for SellerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SellerStatus {
    /// Unknown persisted statuses load as `Offline`.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Value = Value::deserialize(deserializer)?;
        let status: Self = raw
            .as_str()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| {
                warn!(value = %raw, "Unknown seller status; loading as offline");
                Self::Offline
            });
        Ok(status)
    }
}

/// A conversation-type tag a seller preferentially receives.
///
/// Tags are normalized to trimmed lowercase. An empty tag is `general`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Specialty(String);

impl Specialty {
    /// The wildcard specialty.
    pub const GENERAL: &'static str = "general";

    /// Creates a specialty tag.
    #[must_use]
    pub fn new(value: &str) -> Self {
        let normalized: String = value.trim().to_lowercase();
        if normalized.is_empty() {
            Self::general()
        } else {
            Self(normalized)
        }
    }

    /// Returns the `general` specialty.
    #[must_use]
    pub fn general() -> Self {
        Self(String::from(Self::GENERAL))
    }

    /// Whether this is the `general` wildcard.
    #[must_use]
    pub fn is_general(&self) -> bool {
        self.0 == Self::GENERAL
    }

    /// Returns the tag value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl Default for Specialty {
    fn default() -> Self {
        Self::general()
    }
}

impl From<String> for Specialty {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<Specialty> for String {
    fn from(value: Specialty) -> Self {
        value.0
    }
}

impl std::fmt::Display for Specialty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display-only contact details.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Contact {
    /// Phone number (free form).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Email address (free form).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A human agent who can be assigned customer conversations.
///
/// Sellers are never deleted. Deactivation is a status change to `Offline`,
/// which preserves historical counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    /// Stable identifier.
    pub id: SellerId,
    /// Display name.
    pub name: String,
    /// Display-only contact details.
    pub contact: Contact,
    /// Free-form admin notes.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
    /// Preferred conversation type.
    pub specialty: Specialty,
    /// Coarse status.
    pub status: SellerStatus,
    /// Capacity ceiling.
    pub max_clients: u32,
    /// Active assigned conversations.
    pub current_clients: u32,
    /// Informational rating (0-5), used as a ranking tie-breaker.
    pub rating: f64,
    /// Weekly schedule.
    pub work_schedule: WorkSchedule,
    /// Calendar dates off.
    pub days_off: DaysOff,
    /// Registration order, the final ranking tie-breaker.
    pub registered_seq: u64,
}

impl Seller {
    /// Current utilization as a percentage of `max_clients`.
    ///
    /// A seller with `max_clients == 0` (only possible through a damaged
    /// snapshot) reports 100%.
    #[must_use]
    pub fn load_percentage(&self) -> f64 {
        if self.max_clients == 0 {
            return 100.0;
        }
        f64::from(self.current_clients) / f64::from(self.max_clients) * 100.0
    }

    /// Whether one more client fits under `max_clients`.
    #[must_use]
    pub const fn has_capacity(&self) -> bool {
        self.current_clients < self.max_clients
    }

    /// Whether this seller's specialty matches the requested tag exactly.
    #[must_use]
    pub fn matches_specialty(&self, requested: &Specialty) -> bool {
        &self.specialty == requested
    }

    /// Builds a seller from a persisted record one field at a time.
    ///
    /// A malformed field is logged and replaced by its default, so a single
    /// bad value never costs the whole record. Numbers stored as strings are
    /// accepted. Returns `None` only when the record is not an object or has
    /// no usable `id` or `name`.
    #[must_use]
    pub fn from_json_value(value: &Value) -> Option<Self> {
        let Value::Object(record) = value else {
            warn!(value = %value, "Seller record is not an object; dropping");
            return None;
        };

        let Some(id) = record
            .get("id")
            .and_then(text_value)
            .map(|id| SellerId::new(&id))
        else {
            warn!("Seller record has no usable id; dropping");
            return None;
        };
        let Some(name) = record.get("name").and_then(text_value) else {
            warn!(seller_id = %id, "Seller record has no usable name; dropping");
            return None;
        };

        let contact: Contact = lenient_field(&id, record, "contact", Contact::default(), |raw| {
            let Value::Object(fields) = raw else {
                return None;
            };
            Some(Contact {
                phone: fields.get("phone").and_then(text_value),
                email: fields.get("email").and_then(text_value),
            })
        });
        let notes: String = lenient_field(&id, record, "notes", String::new(), |raw| {
            raw.as_str().map(|notes| notes.trim().to_string())
        });
        let specialty: Specialty =
            lenient_field(&id, record, "specialty", Specialty::general(), |raw| {
                raw.as_str().map(Specialty::new)
            });
        let status: SellerStatus =
            lenient_field(&id, record, "status", SellerStatus::Offline, |raw| {
                raw.as_str().and_then(|s| s.parse().ok())
            });
        let max_clients: u32 =
            lenient_field(&id, record, "maxClients", DEFAULT_MAX_CLIENTS, |raw| {
                count_value(raw)
                    .and_then(|n| u32::try_from(n).ok())
                    .filter(|n| *n >= 1)
            });
        let current_clients: u32 = lenient_field(&id, record, "currentClients", 0, |raw| {
            count_value(raw).and_then(|n| u32::try_from(n).ok())
        });
        let rating: f64 = lenient_field(&id, record, "rating", DEFAULT_RATING, |raw| {
            let rating: Option<f64> = match raw {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            };
            rating.filter(|r| r.is_finite() && (0.0..=5.0).contains(r))
        });
        let registered_seq: u64 = lenient_field(&id, record, "registeredSeq", 0, count_value);

        Some(Self {
            work_schedule: WorkSchedule::from_json_value(
                record.get("workSchedule").unwrap_or(&Value::Null),
            ),
            days_off: DaysOff::from_json_value(record.get("daysOff").unwrap_or(&Value::Null)),
            id,
            name,
            contact,
            notes,
            specialty,
            status,
            max_clients,
            current_clients,
            rating,
            registered_seq,
        })
    }
}

impl<'de> Deserialize<'de> for Seller {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Value = Value::deserialize(deserializer)?;
        Self::from_json_value(&raw)
            .ok_or_else(|| serde::de::Error::custom("seller record has no usable id or name"))
    }
}

/// Reads one optional seller field, falling back to `default` when the
/// stored value is absent, null or unusable.
fn lenient_field<T>(
    id: &SellerId,
    record: &Map<String, Value>,
    key: &str,
    default: T,
    parse: impl FnOnce(&Value) -> Option<T>,
) -> T {
    match record.get(key) {
        None | Some(Value::Null) => default,
        Some(raw) => parse(raw).unwrap_or_else(|| {
            warn!(
                seller_id = %id,
                field = key,
                value = %raw,
                "Malformed seller field; using default"
            );
            default
        }),
    }
}

/// A non-blank string, or a number rendered as text.
fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A non-negative whole number, stored either as a number or as text.
fn count_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
