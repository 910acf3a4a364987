// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The seller desk.
//!
//! The desk is the single writer for the registry, the conversation
//! bindings, the assignment log and the counters. All of it sits behind one
//! mutex so that selecting a seller and committing the assignment happen in
//! the same critical section.
//!
//! ## Conversation lifecycle
//!
//! ```text
//! unassigned -> assigned -> completed  (binding removed)
//!                        -> reassigned (a new binding takes over)
//! ```
//!
//! Leaving `assigned` always releases one unit of the prior seller's load.
//! Only open conversations keep a binding, and the assignment log and audit
//! trail keep the newest `history_limit` entries each.

use crate::apply::apply;
use crate::assignment::{Binding, DeskStats};
use crate::command::Command;
use crate::config::DeskConfig;
use crate::error::CoreError;
use crate::registry::SellerRegistry;
use crate::report::AvailabilityReport;
use crate::selector::{assign, select_seller};
use crate::state::{DeskSnapshot, RegistrySnapshot, SNAPSHOT_VERSION, TransitionResult};
use chrono::{DateTime, Utc};
use cocolu_audit::{Actor, AssignmentEvent, AuditEvent, Cause};
use cocolu_domain::{
    AvailabilitySnapshot, ConversationId, Seller, SellerId, SellerStatus, Specialty,
    WorkloadEntry, availability_snapshot,
};
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// An inbound request for a seller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationRequest {
    /// The conversation (customer chat) id.
    pub conversation_id: ConversationId,
    /// The specialty the customer asked for, if any.
    pub requested_specialty: Option<Specialty>,
}

impl ConversationRequest {
    /// Creates a request.
    #[must_use]
    pub const fn new(
        conversation_id: ConversationId,
        requested_specialty: Option<Specialty>,
    ) -> Self {
        Self {
            conversation_id,
            requested_specialty,
        }
    }
}

#[derive(Debug, Clone)]
struct DeskState {
    registry: SellerRegistry,
    bindings: BTreeMap<ConversationId, Binding>,
    events: VecDeque<AssignmentEvent>,
    audit: VecDeque<AuditEvent>,
    stats: DeskStats,
    history_limit: usize,
}

/// Owns the registry and routes conversations to sellers.
///
/// Shared between tasks as `Arc<SellerDesk>`. Every method takes the lock
/// once and never holds it across I/O.
#[derive(Debug)]
pub struct SellerDesk {
    config: DeskConfig,
    state: Mutex<DeskState>,
}

impl SellerDesk {
    /// Creates an empty desk.
    #[must_use]
    pub fn new(config: DeskConfig) -> Self {
        let registry: SellerRegistry = SellerRegistry::new(config.default_max_clients);
        let history_limit: usize = config.history_limit;
        Self {
            config,
            state: Mutex::new(DeskState {
                registry,
                bindings: BTreeMap::new(),
                events: VecDeque::new(),
                audit: VecDeque::new(),
                stats: DeskStats::default(),
                history_limit,
            }),
        }
    }

    /// Creates a desk from a persisted snapshot.
    #[must_use]
    pub fn from_snapshot(config: DeskConfig, snapshot: DeskSnapshot) -> Self {
        let desk: Self = Self::new(config);
        desk.restore(snapshot);
        desk
    }

    /// The desk's configuration.
    #[must_use]
    pub const fn config(&self) -> &DeskConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, DeskState> {
        // Mutations validate before writing, so poisoned state is consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies an admin command and records its audit event.
    ///
    /// # Returns
    ///
    /// The affected seller after the change.
    ///
    /// # Errors
    ///
    /// Returns an error if the command is invalid. Nothing changes on error.
    pub fn execute(
        &self,
        command: Command,
        actor: Actor,
        cause: Cause,
    ) -> Result<Seller, CoreError> {
        let mut state = self.lock();
        let TransitionResult {
            new_registry,
            seller,
            audit_event,
        } = apply(&state.registry, command, actor, cause)?;

        info!(
            seller_id = %audit_event.seller_id,
            action = %audit_event.action.name,
            actor = %audit_event.actor.id,
            "Applied registry command"
        );
        state.registry = new_registry;
        state.push_audit(audit_event);
        drop(state);
        Ok(seller)
    }

    /// Looks up one seller.
    ///
    /// # Errors
    ///
    /// Returns an error if the seller does not exist.
    pub fn get_seller(&self, id: &SellerId) -> Result<Seller, CoreError> {
        self.lock().registry.get_seller(id).cloned()
    }

    /// Copies every seller in registration order.
    #[must_use]
    pub fn get_all_sellers(&self) -> Vec<Seller> {
        self.lock().registry.get_all_sellers()
    }

    /// Per-seller utilization.
    #[must_use]
    pub fn get_workload(&self) -> Vec<WorkloadEntry> {
        self.lock().registry.get_workload()
    }

    /// Availability of one seller at `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the seller does not exist.
    pub fn availability(
        &self,
        id: &SellerId,
        now: DateTime<Utc>,
    ) -> Result<AvailabilitySnapshot, CoreError> {
        let state = self.lock();
        let seller: &Seller = state.registry.get_seller(id)?;
        Ok(availability_snapshot(
            seller,
            now,
            &self.config.clock,
            self.config.lookahead_days,
        ))
    }

    /// Store-wide availability at `now`.
    #[must_use]
    pub fn availability_report(&self, now: DateTime<Utc>) -> AvailabilityReport {
        let sellers: Vec<Seller> = self.get_all_sellers();
        AvailabilityReport::build(&sellers, now, &self.config.clock, self.config.lookahead_days)
    }

    /// Routes a new inbound conversation.
    ///
    /// A conversation that is already bound to a seller who is not offline
    /// keeps that seller and no load changes. A conversation bound to an
    /// offline seller moves to a newly selected one. Otherwise the best
    /// eligible seller is selected and committed under one lock.
    ///
    /// # Returns
    ///
    /// The seller now handling the conversation, or `None` if nobody is
    /// eligible (the caller queues or escalates).
    pub fn handle_new_conversation(
        &self,
        request: &ConversationRequest,
        now: DateTime<Utc>,
    ) -> Option<SellerId> {
        self.lock().handle_new_conversation(&self.config, request, now)
    }

    /// Binds a conversation to a named seller, bypassing selection.
    ///
    /// Capacity is still enforced; schedule and status are not. If the
    /// conversation is bound to another seller it is reassigned.
    ///
    /// # Errors
    ///
    /// Returns an error if the seller does not exist or is at capacity.
    pub fn assign_to(
        &self,
        conversation_id: &ConversationId,
        seller_id: &SellerId,
        now: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        self.lock().assign_to(conversation_id, seller_id, now)
    }

    /// Marks a conversation finished and releases its seller.
    ///
    /// # Returns
    ///
    /// The seller that was released.
    ///
    /// # Errors
    ///
    /// Returns an error if the conversation has no open binding.
    pub fn complete_conversation(
        &self,
        conversation_id: &ConversationId,
        now: DateTime<Utc>,
    ) -> Result<SellerId, CoreError> {
        self.lock().complete_conversation(conversation_id, now)
    }

    /// Moves an active conversation to another seller.
    ///
    /// With a `target`, that seller receives it (capacity enforced).
    /// Without one, the best eligible seller other than the current one is
    /// selected.
    ///
    /// # Returns
    ///
    /// The new seller, or `None` when no other seller is eligible, in which
    /// case the binding is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the conversation has no open binding, or the
    /// target seller does not exist or is at capacity.
    pub fn reassign_conversation(
        &self,
        conversation_id: &ConversationId,
        target: Option<&SellerId>,
        now: DateTime<Utc>,
    ) -> Result<Option<SellerId>, CoreError> {
        self.lock()
            .reassign_conversation(&self.config, conversation_id, target, now)
    }

    /// The seller actively handling a conversation, if any.
    #[must_use]
    pub fn assigned_seller(&self, conversation_id: &ConversationId) -> Option<Seller> {
        let state = self.lock();
        let binding: &Binding = state.bindings.get(conversation_id)?;
        state.registry.get_seller(&binding.seller_id).ok().cloned()
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> DeskStats {
        self.lock().stats
    }

    /// A copy of the assignment log, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<AssignmentEvent> {
        self.lock().events.iter().cloned().collect()
    }

    /// A copy of the registry audit trail, oldest first.
    #[must_use]
    pub fn audit_log(&self) -> Vec<AuditEvent> {
        self.lock().audit.iter().cloned().collect()
    }

    /// Number of open conversations holding a binding.
    #[must_use]
    pub fn open_conversations(&self) -> usize {
        self.lock().bindings.len()
    }

    /// Exports everything the desk persists.
    #[must_use]
    pub fn snapshot(&self, now: DateTime<Utc>) -> DeskSnapshot {
        let state = self.lock();
        let registry: RegistrySnapshot = state.registry.get_state();
        DeskSnapshot {
            version: SNAPSHOT_VERSION,
            next_seller_number: registry.next_seller_number,
            sellers: registry.sellers,
            assignments: state.bindings.values().cloned().collect(),
            events: state.events.iter().cloned().collect(),
            audit: state.audit.iter().cloned().collect(),
            stats: state.stats,
            saved_at: Some(now),
        }
    }

    /// Replaces the desk contents with a snapshot.
    ///
    /// A conversation listed twice keeps its last binding. The
    /// active-conversation counter is recomputed from the bindings and both
    /// logs are cut to the newest `history_limit` entries.
    pub fn restore(&self, snapshot: DeskSnapshot) {
        let mut state = self.lock();
        state.registry.restore_state(snapshot.registry());

        let bindings: BTreeMap<ConversationId, Binding> = snapshot
            .assignments
            .into_iter()
            .map(|b| (b.conversation_id.clone(), b))
            .collect();

        let active: u64 = bindings.len() as u64;
        state.stats = DeskStats {
            active_conversations: active,
            ..snapshot.stats
        };
        state.bindings = bindings;
        let limit: usize = state.history_limit;
        state.events = newest(snapshot.events, limit);
        state.audit = newest(snapshot.audit, limit);

        info!(
            sellers = state.registry.len(),
            active_conversations = active,
            events = state.events.len(),
            "Restored desk state"
        );
    }
}

impl DeskState {
    fn handle_new_conversation(
        &mut self,
        config: &DeskConfig,
        request: &ConversationRequest,
        now: DateTime<Utc>,
    ) -> Option<SellerId> {
        let prior: Option<SellerId> = match self.bindings.get(&request.conversation_id) {
            None => None,
            Some(binding) => match self.registry.get_seller(&binding.seller_id) {
                Ok(seller) if seller.status != SellerStatus::Offline => {
                    debug!(
                        conversation_id = %request.conversation_id,
                        seller_id = %seller.id,
                        "Conversation already assigned; keeping seller"
                    );
                    return Some(seller.id.clone());
                }
                _ => Some(binding.seller_id.clone()),
            },
        };

        let event: AssignmentEvent = self.select_and_commit(
            config,
            &request.conversation_id,
            request.requested_specialty.as_ref(),
            prior.as_ref(),
            now,
        )?;
        let seller_id: SellerId = event.seller_id.clone();

        match prior {
            Some(previous) => {
                info!(
                    conversation_id = %request.conversation_id,
                    from = %previous,
                    to = %seller_id,
                    "Previous seller is offline; moved conversation"
                );
                self.record_reassignment(event, previous, request.requested_specialty.clone());
            }
            None => self.record_assignment(event),
        }
        Some(seller_id)
    }

    fn assign_to(
        &mut self,
        conversation_id: &ConversationId,
        seller_id: &SellerId,
        now: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        let active: Option<&Binding> = self.bindings.get(conversation_id);
        if active.is_some_and(|b| &b.seller_id == seller_id) {
            debug!(conversation_id = %conversation_id, seller_id = %seller_id, "Already assigned");
            return Ok(());
        }
        let prior: Option<(SellerId, Option<Specialty>)> =
            active.map(|b| (b.seller_id.clone(), b.specialty_requested.clone()));

        self.registry.increment_load(seller_id)?;
        info!(
            conversation_id = %conversation_id,
            seller_id = %seller_id,
            "Manually assigned conversation"
        );

        match prior {
            Some((previous, specialty)) => {
                let event: AssignmentEvent = AssignmentEvent::assigned(
                    seller_id.clone(),
                    conversation_id.clone(),
                    now,
                    specialty.clone(),
                );
                self.record_reassignment(event, previous, specialty);
            }
            None => self.record_assignment(AssignmentEvent::assigned(
                seller_id.clone(),
                conversation_id.clone(),
                now,
                None,
            )),
        }
        Ok(())
    }

    fn complete_conversation(
        &mut self,
        conversation_id: &ConversationId,
        now: DateTime<Utc>,
    ) -> Result<SellerId, CoreError> {
        let binding: Binding = self
            .bindings
            .remove(conversation_id)
            .ok_or_else(|| CoreError::ConversationNotFound(conversation_id.clone()))?;
        let seller_id: SellerId = binding.seller_id;

        self.release(&seller_id);
        self.stats.active_conversations = self.stats.active_conversations.saturating_sub(1);
        self.stats.completed_conversations += 1;
        self.push_event(AssignmentEvent::completed(
            seller_id.clone(),
            conversation_id.clone(),
            now,
        ));

        info!(conversation_id = %conversation_id, seller_id = %seller_id, "Conversation completed");
        Ok(seller_id)
    }

    fn reassign_conversation(
        &mut self,
        config: &DeskConfig,
        conversation_id: &ConversationId,
        target: Option<&SellerId>,
        now: DateTime<Utc>,
    ) -> Result<Option<SellerId>, CoreError> {
        let binding: &Binding = self
            .bindings
            .get(conversation_id)
            .ok_or_else(|| CoreError::ConversationNotFound(conversation_id.clone()))?;
        let previous: SellerId = binding.seller_id.clone();
        let specialty: Option<Specialty> = binding.specialty_requested.clone();

        let event: AssignmentEvent = match target {
            Some(target) if target == &previous => return Ok(Some(previous)),
            Some(target) => {
                self.registry.increment_load(target)?;
                AssignmentEvent::assigned(
                    target.clone(),
                    conversation_id.clone(),
                    now,
                    specialty.clone(),
                )
            }
            None => {
                let Some(event) = self.select_and_commit(
                    config,
                    conversation_id,
                    specialty.as_ref(),
                    Some(&previous),
                    now,
                ) else {
                    warn!(
                        conversation_id = %conversation_id,
                        seller_id = %previous,
                        "No other seller available; conversation stays put"
                    );
                    return Ok(None);
                };
                event
            }
        };

        let seller_id: SellerId = event.seller_id.clone();
        info!(
            conversation_id = %conversation_id,
            from = %previous,
            to = %seller_id,
            "Reassigned conversation"
        );
        self.record_reassignment(event, previous, specialty);
        Ok(Some(seller_id))
    }

    /// Selects and commits, re-selecting after a commit conflict up to the
    /// configured retry count.
    fn select_and_commit(
        &mut self,
        config: &DeskConfig,
        conversation_id: &ConversationId,
        specialty: Option<&Specialty>,
        exclude: Option<&SellerId>,
        now: DateTime<Utc>,
    ) -> Option<AssignmentEvent> {
        let mut rejected: Vec<SellerId> = Vec::new();

        for attempt in 0..=config.max_commit_retries {
            let candidates = self
                .registry
                .sellers()
                .iter()
                .filter(|s| Some(&s.id) != exclude && !rejected.contains(&s.id));
            let Some(seller_id) =
                select_seller(candidates, specialty, now, &config.clock, &config.selection)
                    .map(|s| s.id.clone())
            else {
                info!(
                    conversation_id = %conversation_id,
                    specialty = specialty.map(Specialty::value),
                    "No seller available"
                );
                return None;
            };

            match assign(
                &mut self.registry,
                &seller_id,
                conversation_id.clone(),
                specialty.cloned(),
                now,
                &config.clock,
            ) {
                Ok(event) => return Some(event),
                Err(
                    err @ (CoreError::CapacityExceeded { .. }
                    | CoreError::SellerUnavailable { .. }),
                ) => {
                    warn!(
                        conversation_id = %conversation_id,
                        seller_id = %seller_id,
                        attempt,
                        error = %err,
                        "Assignment conflict; selecting again"
                    );
                    rejected.push(seller_id);
                }
                Err(err) => {
                    warn!(conversation_id = %conversation_id, error = %err, "Assignment failed");
                    return None;
                }
            }
        }

        warn!(
            conversation_id = %conversation_id,
            retries = config.max_commit_retries,
            "Gave up assigning after repeated conflicts"
        );
        None
    }

    fn record_assignment(&mut self, event: AssignmentEvent) {
        self.bindings.insert(
            event.conversation_id.clone(),
            Binding::new(
                event.conversation_id.clone(),
                event.seller_id.clone(),
                event.timestamp,
                event.specialty_requested.clone(),
            ),
        );
        self.stats.total_assignments += 1;
        self.stats.active_conversations += 1;
        self.push_event(event);
    }

    fn record_reassignment(
        &mut self,
        event: AssignmentEvent,
        previous: SellerId,
        specialty: Option<Specialty>,
    ) {
        self.release(&previous);
        self.bindings.insert(
            event.conversation_id.clone(),
            Binding::new(
                event.conversation_id.clone(),
                event.seller_id.clone(),
                event.timestamp,
                specialty,
            ),
        );
        self.stats.total_assignments += 1;
        self.stats.reassigned_conversations += 1;
        self.push_event(AssignmentEvent::reassigned(
            event.seller_id,
            previous,
            event.conversation_id,
            event.timestamp,
            event.specialty_requested,
        ));
    }

    fn push_event(&mut self, event: AssignmentEvent) {
        push_bounded(&mut self.events, event, self.history_limit);
    }

    fn push_audit(&mut self, event: AuditEvent) {
        push_bounded(&mut self.audit, event, self.history_limit);
    }

    fn release(&mut self, seller_id: &SellerId) {
        if let Err(err) = self.registry.decrement_load(seller_id) {
            warn!(seller_id = %seller_id, error = %err, "Could not release seller load");
        }
    }
}

fn push_bounded<T>(log: &mut VecDeque<T>, entry: T, limit: usize) {
    log.push_back(entry);
    while log.len() > limit {
        log.pop_front();
    }
}

/// Keeps the last `limit` entries of a restored log.
fn newest<T>(entries: Vec<T>, limit: usize) -> VecDeque<T> {
    let skip: usize = entries.len().saturating_sub(limit);
    entries.into_iter().skip(skip).collect()
}
