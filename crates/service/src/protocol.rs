// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Newline-delimited JSON protocol spoken on stdin/stdout.
//!
//! Every non-blank input line is one message and produces exactly one
//! output line. Malformed input produces `{"error": "..."}` and the loop
//! carries on.
//!
//! Besides conversation events the channel accepts admin changes
//! (`addSeller`, `setStatus`, ...). They are applied to the running desk
//! and answered with the updated seller, so they reach routing at once and
//! are part of the next autosave.

use crate::admin::to_command;
use crate::cli::Commands;
use crate::config::ServiceConfig;
use chrono::{DateTime, Utc};
use cocolu::{Command, ConversationRequest, SellerDesk};
use cocolu_audit::{Actor, Cause};
use cocolu_domain::{BusinessClock, ConversationId, Seller, SellerId, Specialty};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

const fn enabled_by_default() -> bool {
    true
}

/// An inbound event or admin change.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum InboundMessage {
    /// A customer opened (or wrote again in) a conversation.
    NewConversation {
        conversation_id: String,
        #[serde(default)]
        requested_specialty: Option<String>,
    },
    /// The conversation ended.
    CompleteConversation { conversation_id: String },
    /// Move the conversation to `seller_id`, or to the best other seller.
    ReassignConversation {
        conversation_id: String,
        #[serde(default)]
        seller_id: Option<String>,
    },
    /// Register a seller. New sellers work the store's business hours.
    AddSeller {
        name: String,
        #[serde(default)]
        phone: Option<String>,
        #[serde(default)]
        email: Option<String>,
        #[serde(default)]
        specialty: Option<String>,
        #[serde(default)]
        max_clients: Option<i64>,
        #[serde(default)]
        status: Option<String>,
        #[serde(default)]
        rating: Option<f64>,
        #[serde(default)]
        notes: String,
    },
    /// Change profile fields of a seller.
    UpdateSeller {
        seller_id: String,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        phone: Option<String>,
        #[serde(default)]
        email: Option<String>,
        #[serde(default)]
        specialty: Option<String>,
        #[serde(default)]
        notes: Option<String>,
        #[serde(default)]
        max_clients: Option<i64>,
    },
    SetStatus {
        seller_id: String,
        status: String,
    },
    /// Set one weekday (0 = Sunday) of a seller's schedule.
    SetSchedule {
        seller_id: String,
        weekday: i64,
        start_time: String,
        end_time: String,
        #[serde(default = "enabled_by_default")]
        enabled: bool,
    },
    AddDayOff {
        seller_id: String,
        date: String,
        #[serde(default)]
        reason: Option<String>,
    },
    RemoveDayOff {
        seller_id: String,
        date: String,
    },
    SetRating {
        seller_id: String,
        rating: f64,
    },
}

impl InboundMessage {
    /// The admin subcommand an admin change maps to; `None` for
    /// conversation events.
    fn into_admin_change(self) -> Option<Commands> {
        let subcommand: Commands = match self {
            Self::AddSeller {
                name,
                phone,
                email,
                specialty,
                max_clients,
                status,
                rating,
                notes,
            } => Commands::AddSeller {
                name,
                phone,
                email,
                specialty,
                max_clients,
                status,
                rating,
                notes,
            },
            Self::UpdateSeller {
                seller_id,
                name,
                phone,
                email,
                specialty,
                notes,
                max_clients,
            } => Commands::UpdateSeller {
                seller_id,
                name,
                phone,
                email,
                specialty,
                notes,
                max_clients,
            },
            Self::SetStatus { seller_id, status } => Commands::SetStatus { seller_id, status },
            Self::SetSchedule {
                seller_id,
                weekday,
                start_time,
                end_time,
                enabled,
            } => Commands::SetSchedule {
                seller_id,
                weekday,
                start: start_time,
                end: end_time,
                disabled: !enabled,
            },
            Self::AddDayOff {
                seller_id,
                date,
                reason,
            } => Commands::AddDayOff {
                seller_id,
                date,
                reason,
            },
            Self::RemoveDayOff { seller_id, date } => Commands::RemoveDayOff { seller_id, date },
            Self::SetRating { seller_id, rating } => Commands::SetRating { seller_id, rating },
            Self::NewConversation { .. }
            | Self::CompleteConversation { .. }
            | Self::ReassignConversation { .. } => return None,
        };
        Some(subcommand)
    }
}

/// Where a conversation went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentResponse {
    pub conversation_id: ConversationId,
    /// `null` when nobody is available.
    pub seller_id: Option<SellerId>,
    /// Whether the store is closed right now.
    pub outside_business_hours: bool,
    /// When the store opens next, if it is closed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_opening: Option<DateTime<Utc>>,
}

/// Which seller a completed conversation released.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    pub conversation_id: ConversationId,
    pub released_seller_id: SellerId,
}

/// The seller after an admin change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SellerResponse {
    pub seller: Seller,
}

/// A rejected line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// One output line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutboundMessage {
    Assignment(AssignmentResponse),
    Completion(CompletionResponse),
    Seller(Box<SellerResponse>),
    Error(ErrorResponse),
}

impl OutboundMessage {
    fn error(message: impl Into<String>) -> Self {
        Self::Error(ErrorResponse {
            error: message.into(),
        })
    }
}

/// Handles one parsed message.
#[must_use]
pub fn handle_message(
    desk: &SellerDesk,
    config: &ServiceConfig,
    message: InboundMessage,
    now: DateTime<Utc>,
) -> OutboundMessage {
    match message {
        InboundMessage::NewConversation {
            conversation_id,
            requested_specialty,
        } => {
            let request: ConversationRequest = ConversationRequest::new(
                ConversationId::new(&conversation_id),
                requested_specialty.as_deref().map(Specialty::new),
            );
            let seller_id: Option<SellerId> = desk.handle_new_conversation(&request, now);
            assignment_response(config, request.conversation_id, seller_id, now)
        }
        InboundMessage::CompleteConversation { conversation_id } => {
            let conversation_id: ConversationId = ConversationId::new(&conversation_id);
            match desk.complete_conversation(&conversation_id, now) {
                Ok(released_seller_id) => OutboundMessage::Completion(CompletionResponse {
                    conversation_id,
                    released_seller_id,
                }),
                Err(err) => OutboundMessage::error(err.to_string()),
            }
        }
        InboundMessage::ReassignConversation {
            conversation_id,
            seller_id,
        } => {
            let conversation_id: ConversationId = ConversationId::new(&conversation_id);
            let target: Option<SellerId> = seller_id.as_deref().map(SellerId::new);
            match desk.reassign_conversation(&conversation_id, target.as_ref(), now) {
                Ok(seller_id) => assignment_response(config, conversation_id, seller_id, now),
                Err(err) => OutboundMessage::error(err.to_string()),
            }
        }
        admin => apply_admin_change(desk, config, admin, now),
    }
}

fn channel_actor() -> Actor {
    Actor::new(String::from("message-channel"), String::from("admin"))
}

fn channel_cause(action: &str, now: DateTime<Utc>) -> Cause {
    Cause::new(
        format!("msg-{}", now.timestamp_millis()),
        format!("Message channel {action}"),
    )
}

fn apply_admin_change(
    desk: &SellerDesk,
    config: &ServiceConfig,
    message: InboundMessage,
    now: DateTime<Utc>,
) -> OutboundMessage {
    let Some(subcommand) = message.into_admin_change() else {
        return OutboundMessage::error("Not an admin change");
    };
    let command: Command = match to_command(subcommand, &config.business_hours) {
        Ok(Some(command)) => command,
        Ok(None) => return OutboundMessage::error("Not an admin change"),
        Err(err) => return OutboundMessage::error(err.to_string()),
    };

    let action: &'static str = command.name();
    match desk.execute(command, channel_actor(), channel_cause(action, now)) {
        Ok(seller) => {
            info!(seller_id = %seller.id, action, "Applied admin change from message channel");
            OutboundMessage::Seller(Box::new(SellerResponse { seller }))
        }
        Err(err) => OutboundMessage::error(err.to_string()),
    }
}

fn assignment_response(
    config: &ServiceConfig,
    conversation_id: ConversationId,
    seller_id: Option<SellerId>,
    now: DateTime<Utc>,
) -> OutboundMessage {
    let clock: &BusinessClock = &config.desk.clock;
    let open: bool = config.business_hours.is_open(now, clock);
    OutboundMessage::Assignment(AssignmentResponse {
        conversation_id,
        seller_id,
        outside_business_hours: !open,
        next_opening: if open {
            None
        } else {
            config.business_hours.next_opening(now, clock)
        },
    })
}

/// Handles one raw input line.
///
/// # Returns
///
/// The encoded response, or `None` for a blank line.
#[must_use]
pub fn handle_line(
    desk: &SellerDesk,
    config: &ServiceConfig,
    line: &str,
    now: DateTime<Utc>,
) -> Option<String> {
    let line: &str = line.trim();
    if line.is_empty() {
        return None;
    }

    let response: OutboundMessage = match serde_json::from_str::<InboundMessage>(line) {
        Ok(message) => {
            debug!(?message, "Inbound message");
            handle_message(desk, config, message, now)
        }
        Err(err) => {
            warn!(error = %err, "Malformed inbound line");
            OutboundMessage::error(format!("Malformed message: {err}"))
        }
    };

    Some(serde_json::to_string(&response).unwrap_or_else(|err| {
        warn!(error = %err, "Could not encode response");
        String::from(r#"{"error":"Could not encode response"}"#)
    }))
}
