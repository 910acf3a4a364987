// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

#[cfg(test)]
mod tests;

use chrono::{DateTime, Utc};
use cocolu_domain::{ConversationId, SellerId, Specialty};
use serde::{Deserialize, Serialize};

/// Represents the entity performing an action.
///
/// An actor is an admin at the command line or a client of the message
/// channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "admin").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }
}

/// Represents the reason or trigger for an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID, CLI invocation).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this cause
    /// * `description` - A description of what triggered this action
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// The specific registry change performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The name of the action (e.g., "`AddSeller`", "`SetStatus`").
    pub name: String,
    /// Optional additional details about the action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A serialized view of the affected seller at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// A string representation of the state.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    ///
    /// # Arguments
    ///
    /// * `data` - A string representation of the state
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }

    /// The snapshot of a seller that does not exist yet.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            data: String::new(),
        }
    }
}

/// An immutable audit event describing one admin change to the registry.
///
/// Every successful registry command produces exactly one audit event
/// naming who made the change, why, what was done, and the seller state
/// before and after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The cause or reason for this state change.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The seller the change applies to.
    pub seller_id: SellerId,
    /// The state before the transition.
    pub before: StateSnapshot,
    /// The state after the transition.
    pub after: StateSnapshot,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// # Arguments
    ///
    /// * `actor` - The actor who initiated the change
    /// * `cause` - The reason for the change
    /// * `action` - The action that was performed
    /// * `seller_id` - The seller the change applies to
    /// * `before` - The state before the transition
    /// * `after` - The state after the transition
    #[must_use]
    pub const fn new(
        actor: Actor,
        cause: Cause,
        action: Action,
        seller_id: SellerId,
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> Self {
        Self {
            actor,
            cause,
            action,
            seller_id,
            before,
            after,
        }
    }
}

/// What happened to a conversation binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentEventKind {
    /// A seller received the conversation.
    Assigned,
    /// The conversation finished and the seller's load was released.
    Completed,
    /// The conversation moved to a different seller.
    Reassigned,
}

impl AssignmentEventKind {
    /// Converts this kind to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::Completed => "completed",
            Self::Reassigned => "reassigned",
        }
    }
}

impl std::fmt::Display for AssignmentEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in the assignment log.
///
/// The log is append-only. Entries are never edited after they are
/// recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentEvent {
    /// The seller involved. For reassignments this is the new seller.
    pub seller_id: SellerId,
    /// The conversation involved.
    pub conversation_id: ConversationId,
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
    /// The specialty the customer asked for, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty_requested: Option<Specialty>,
    /// The seller the conversation was taken from, for reassignments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_seller_id: Option<SellerId>,
    /// What happened.
    pub kind: AssignmentEventKind,
}

impl AssignmentEvent {
    /// Records that `seller_id` received `conversation_id`.
    #[must_use]
    pub const fn assigned(
        seller_id: SellerId,
        conversation_id: ConversationId,
        timestamp: DateTime<Utc>,
        specialty_requested: Option<Specialty>,
    ) -> Self {
        Self {
            seller_id,
            conversation_id,
            timestamp,
            specialty_requested,
            previous_seller_id: None,
            kind: AssignmentEventKind::Assigned,
        }
    }

    /// Records that `seller_id` finished `conversation_id`.
    #[must_use]
    pub const fn completed(
        seller_id: SellerId,
        conversation_id: ConversationId,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            seller_id,
            conversation_id,
            timestamp,
            specialty_requested: None,
            previous_seller_id: None,
            kind: AssignmentEventKind::Completed,
        }
    }

    /// Records that `conversation_id` moved from `previous` to `seller_id`.
    #[must_use]
    pub const fn reassigned(
        seller_id: SellerId,
        previous: SellerId,
        conversation_id: ConversationId,
        timestamp: DateTime<Utc>,
        specialty_requested: Option<Specialty>,
    ) -> Self {
        Self {
            seller_id,
            conversation_id,
            timestamp,
            specialty_requested,
            previous_seller_id: Some(previous),
            kind: AssignmentEventKind::Reassigned,
        }
    }
}
