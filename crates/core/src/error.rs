// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cocolu_domain::{ConversationId, DomainError, SellerId, UnavailableReason};

/// Errors that can occur during registry and desk operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated (invalid input).
    DomainViolation(DomainError),
    /// No seller with this id exists.
    SellerNotFound(SellerId),
    /// Taking one more client would exceed the seller's capacity.
    CapacityExceeded {
        /// The seller that is full.
        seller_id: SellerId,
        /// Current active clients.
        current: u32,
        /// Capacity ceiling.
        max: u32,
    },
    /// The seller stopped being available between selection and commit.
    SellerUnavailable {
        /// The seller that became unavailable.
        seller_id: SellerId,
        /// Why.
        reason: UnavailableReason,
    },
    /// No binding exists for this conversation.
    ConversationNotFound(ConversationId),
    /// Every seller id number is already in use.
    SellerIdsExhausted,
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::SellerNotFound(id) => write!(f, "Seller not found: {id}"),
            Self::CapacityExceeded {
                seller_id,
                current,
                max,
            } => write!(
                f,
                "Seller {seller_id} is at capacity ({current}/{max} clients)"
            ),
            Self::SellerUnavailable { seller_id, reason } => {
                write!(f, "Seller {seller_id} is not available: {reason}")
            }
            Self::ConversationNotFound(id) => write!(f, "Conversation not found: {id}"),
            Self::SellerIdsExhausted => write!(f, "No seller ids left to allocate"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
