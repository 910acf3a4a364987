// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Seller selection and assignment commit.
//!
//! Selection is a pure ranking over the sellers that pass the availability
//! check. Commit re-validates the chosen seller against the registry as it
//! is at commit time, because a caller may select and commit in two steps.
//!
//! ## Ranking
//!
//! Candidates are ordered by the configured keys (default: lowest load
//! percentage, highest rating, earliest registration). Registration order
//! and then id always break any remaining tie, so the result is fully
//! deterministic.

use crate::error::CoreError;
use crate::registry::SellerRegistry;
use chrono::{DateTime, Utc};
use cocolu_audit::AssignmentEvent;
use cocolu_domain::{
    Availability, BusinessClock, ConversationId, DomainError, Seller, SellerId, SellerStatus,
    Specialty, UnavailableReason, is_available_now,
};
use std::cmp::Ordering;
use std::str::FromStr;
use tracing::{debug, info};

/// What to do when a specialty is requested but no specialist is eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FallbackPolicy {
    /// Fall back to every eligible seller.
    #[default]
    Always,
    /// Fall back only when no active (non-offline) specialist exists at
    /// all. Specialists who are merely busy, full or off shift block the
    /// fallback.
    OnlyWhenAbsent,
    /// Never fall back; no eligible specialist means no selection.
    Never,
}

impl FallbackPolicy {
    /// Converts this policy to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::OnlyWhenAbsent => "only-when-absent",
            Self::Never => "never",
        }
    }
}

impl FromStr for FallbackPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "always" => Ok(Self::Always),
            "only-when-absent" => Ok(Self::OnlyWhenAbsent),
            "never" => Ok(Self::Never),
            _ => Err(DomainError::InvalidFallbackPolicy(s.to_string())),
        }
    }
}

impl std::fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ranking criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RankKey {
    /// Lower load percentage first.
    Load,
    /// Higher rating first.
    Rating,
    /// Earlier registration first.
    Registration,
}

impl RankKey {
    /// Converts this key to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Rating => "rating",
            Self::Registration => "registration",
        }
    }

    fn compare(self, a: &Seller, b: &Seller) -> Ordering {
        match self {
            Self::Load => a.load_percentage().total_cmp(&b.load_percentage()),
            Self::Rating => b.rating.total_cmp(&a.rating),
            Self::Registration => a.registered_seq.cmp(&b.registered_seq),
        }
    }

    /// Parses a comma-separated ranking order such as `load,rating,registration`.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty, names an unknown key, or
    /// repeats a key.
    pub fn parse_order(value: &str) -> Result<Vec<Self>, DomainError> {
        let mut order: Vec<Self> = Vec::new();
        for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let key: Self = part.parse()?;
            if order.contains(&key) {
                return Err(DomainError::InvalidRankingOrder(format!(
                    "'{part}' appears more than once"
                )));
            }
            order.push(key);
        }
        if order.is_empty() {
            return Err(DomainError::InvalidRankingOrder(String::from(
                "at least one key is required",
            )));
        }
        Ok(order)
    }
}

impl FromStr for RankKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "load" => Ok(Self::Load),
            "rating" => Ok(Self::Rating),
            "registration" => Ok(Self::Registration),
            other => Err(DomainError::InvalidRankingOrder(format!(
                "unknown key '{other}'; expected load, rating or registration"
            ))),
        }
    }
}

impl std::fmt::Display for RankKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fallback policy plus ranking order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPolicy {
    /// Specialty fallback behavior.
    pub fallback: FallbackPolicy,
    /// Ranking keys, most significant first.
    pub ranking: Vec<RankKey>,
}

impl SelectionPolicy {
    /// Orders two candidates, best first.
    #[must_use]
    pub fn compare(&self, a: &Seller, b: &Seller) -> Ordering {
        self.ranking
            .iter()
            .map(|key| key.compare(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.registered_seq.cmp(&b.registered_seq))
            .then_with(|| a.id.cmp(&b.id))
    }
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            fallback: FallbackPolicy::Always,
            ranking: vec![RankKey::Load, RankKey::Rating, RankKey::Registration],
        }
    }
}

/// Picks the best eligible seller for a conversation.
///
/// # Arguments
///
/// * `candidates` - The sellers to choose from
/// * `requested` - The requested specialty; `None` or `general` means any
/// * `now` - The instant of selection
/// * `clock` - The business timezone
/// * `policy` - Fallback and ranking rules
///
/// # Returns
///
/// The top-ranked eligible seller, or `None` if nobody qualifies. The
/// selector never waits or retries.
pub fn select_seller<'a, I>(
    candidates: I,
    requested: Option<&Specialty>,
    now: DateTime<Utc>,
    clock: &BusinessClock,
    policy: &SelectionPolicy,
) -> Option<&'a Seller>
where
    I: IntoIterator<Item = &'a Seller>,
{
    let candidates: Vec<&Seller> = candidates.into_iter().collect();
    let eligible: Vec<&Seller> = candidates
        .iter()
        .copied()
        .filter(|seller| is_available_now(seller, now, clock).is_available())
        .collect();

    let pool: Vec<&Seller> = match requested.filter(|s| !s.is_general()) {
        None => eligible,
        Some(specialty) => {
            let specialists: Vec<&Seller> = eligible
                .iter()
                .copied()
                .filter(|seller| seller.matches_specialty(specialty))
                .collect();

            if specialists.is_empty() {
                let fall_back: bool = match policy.fallback {
                    FallbackPolicy::Always => true,
                    FallbackPolicy::OnlyWhenAbsent => !candidates.iter().any(|seller| {
                        seller.matches_specialty(specialty) && seller.status != SellerStatus::Offline
                    }),
                    FallbackPolicy::Never => false,
                };
                debug!(
                    specialty = %specialty,
                    policy = %policy.fallback,
                    fall_back,
                    "No eligible specialist"
                );
                if fall_back { eligible } else { Vec::new() }
            } else {
                specialists
            }
        }
    };

    let selected: Option<&Seller> = pool.into_iter().min_by(|a, b| policy.compare(a, b));
    debug!(
        candidates = candidates.len(),
        selected = selected.map(|s| s.id.as_str()),
        "Seller selection finished"
    );
    selected
}

/// Commits an assignment: re-checks the seller against the registry as it
/// is now, increments their load and returns the assignment event.
///
/// # Arguments
///
/// * `registry` - The registry to commit against
/// * `seller_id` - The selected seller
/// * `conversation_id` - The conversation being assigned
/// * `specialty_requested` - What the customer asked for, for the log
/// * `now` - The instant of commit
/// * `clock` - The business timezone
///
/// # Errors
///
/// Returns an error if:
/// - The seller does not exist
/// - The seller filled up since selection (`CapacityExceeded`)
/// - The seller otherwise stopped being available (`SellerUnavailable`)
pub fn assign(
    registry: &mut SellerRegistry,
    seller_id: &SellerId,
    conversation_id: ConversationId,
    specialty_requested: Option<Specialty>,
    now: DateTime<Utc>,
    clock: &BusinessClock,
) -> Result<AssignmentEvent, CoreError> {
    let seller: &Seller = registry.get_seller(seller_id)?;
    match is_available_now(seller, now, clock) {
        Availability::Available => {}
        Availability::Unavailable(UnavailableReason::AtCapacity) => {
            return Err(CoreError::CapacityExceeded {
                seller_id: seller_id.clone(),
                current: seller.current_clients,
                max: seller.max_clients,
            });
        }
        Availability::Unavailable(reason) => {
            return Err(CoreError::SellerUnavailable {
                seller_id: seller_id.clone(),
                reason,
            });
        }
    }

    let current: u32 = registry.increment_load(seller_id)?;
    info!(
        seller_id = %seller_id,
        conversation_id = %conversation_id,
        current_clients = current,
        "Assigned conversation"
    );

    Ok(AssignmentEvent::assigned(
        seller_id.clone(),
        conversation_id,
        now,
        specialty_requested,
    ))
}
