// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{DateTime, Utc};
use cocolu_domain::{ConversationId, SellerId, Specialty};
use serde::{Deserialize, Serialize};

/// Ties one active conversation to the seller working it.
///
/// A binding exists only while the conversation is open. Completing it
/// removes the binding and reassigning it replaces the binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    /// The conversation.
    pub conversation_id: ConversationId,
    /// The seller working it.
    pub seller_id: SellerId,
    /// When the seller received it.
    pub assigned_at: DateTime<Utc>,
    /// The specialty the customer asked for, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty_requested: Option<Specialty>,
}

impl Binding {
    /// Creates a binding.
    #[must_use]
    pub const fn new(
        conversation_id: ConversationId,
        seller_id: SellerId,
        assigned_at: DateTime<Utc>,
        specialty_requested: Option<Specialty>,
    ) -> Self {
        Self {
            conversation_id,
            seller_id,
            assigned_at,
            specialty_requested,
        }
    }
}

/// Running desk counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeskStats {
    /// Every time a seller received a conversation, reassignments included.
    pub total_assignments: u64,
    /// Conversations currently bound to a seller.
    pub active_conversations: u64,
    /// Conversations that finished.
    pub completed_conversations: u64,
    /// Conversations moved between sellers.
    pub reassigned_conversations: u64,
}
