// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The seller registry.
//!
//! The registry is the in-memory catalog of sellers. It owns identity
//! allocation, profile edits, schedule and day-off edits, and the load
//! counters that the assignment desk moves up and down.
//!
//! ## Invariants
//!
//! - Seller ids are never reused, even across restarts
//! - Sellers are never removed; deactivation is a status change
//! - `increment_load` never pushes `current_clients` above `max_clients`
//! - `decrement_load` never goes below zero

use crate::error::CoreError;
use crate::state::RegistrySnapshot;
use chrono::NaiveDate;
use cocolu_domain::{
    Contact, DAYS_PER_WEEK, DEFAULT_MAX_CLIENTS, DEFAULT_RATING, DaySchedule, DaysOff, DomainError,
    Seller, SellerId, SellerStatus, Specialty, WorkSchedule, WorkloadEntry, parse_day_off_date,
    validate_max_clients, validate_rating, validate_seller_name,
};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Input for registering a seller.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewSeller {
    /// Display name. Required, trimmed.
    pub name: String,
    /// Contact details.
    pub contact: Contact,
    /// Free-form notes.
    pub notes: String,
    /// Specialty tag. `general` when absent.
    pub specialty: Option<String>,
    /// Initial status. `offline` when absent.
    pub status: Option<SellerStatus>,
    /// Capacity ceiling. The registry default when absent.
    pub max_clients: Option<i64>,
    /// Initial rating. `5.0` when absent.
    pub rating: Option<f64>,
    /// Initial weekly schedule.
    pub work_schedule: WorkSchedule,
    /// Initial days off.
    pub days_off: DaysOff,
}

/// A partial profile update. `None` fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SellerUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// New specialty tag.
    pub specialty: Option<String>,
    /// New notes.
    pub notes: Option<String>,
    /// New capacity ceiling.
    pub max_clients: Option<i64>,
    /// New status.
    pub status: Option<SellerStatus>,
}

impl SellerUpdate {
    /// Whether the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.specialty.is_none()
            && self.notes.is_none()
            && self.max_clients.is_none()
            && self.status.is_none()
    }
}

/// In-memory catalog of sellers, kept in registration order.
#[derive(Debug, Clone, PartialEq)]
pub struct SellerRegistry {
    sellers: Vec<Seller>,
    next_seller_number: u64,
    default_max_clients: u32,
}

impl SellerRegistry {
    /// Creates an empty registry.
    ///
    /// # Arguments
    ///
    /// * `default_max_clients` - Capacity given to sellers registered without one
    #[must_use]
    pub const fn new(default_max_clients: u32) -> Self {
        Self {
            sellers: Vec::new(),
            next_seller_number: 1,
            default_max_clients,
        }
    }

    /// Number of registered sellers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sellers.len()
    }

    /// Whether no seller is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sellers.is_empty()
    }

    /// Borrows all sellers in registration order.
    #[must_use]
    pub fn sellers(&self) -> &[Seller] {
        &self.sellers
    }

    /// Registers a new seller.
    ///
    /// # Arguments
    ///
    /// * `input` - The new seller's data
    ///
    /// # Returns
    ///
    /// The created seller record.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The name is empty after trimming
    /// - `max_clients` is less than 1
    /// - `rating` is outside 0-5
    /// - every seller id number is taken
    pub fn add_seller(&mut self, input: NewSeller) -> Result<Seller, CoreError> {
        let name: String = validate_seller_name(&input.name)?;
        let max_clients: u32 = match input.max_clients {
            Some(value) => validate_max_clients(value)?,
            None => self.default_max_clients,
        };
        let rating: f64 = match input.rating {
            Some(value) => validate_rating(value)?,
            None => DEFAULT_RATING,
        };

        let id: SellerId = self.allocate_id()?;
        let seller: Seller = Seller {
            id,
            name,
            contact: input.contact,
            notes: input.notes.trim().to_string(),
            specialty: input
                .specialty
                .as_deref()
                .map(Specialty::new)
                .unwrap_or_default(),
            status: input.status.unwrap_or(SellerStatus::Offline),
            max_clients,
            current_clients: 0,
            rating,
            work_schedule: input.work_schedule,
            days_off: input.days_off,
            registered_seq: self.next_registration_seq(),
        };

        info!(
            seller_id = %seller.id,
            name = %seller.name,
            specialty = %seller.specialty,
            "Registered seller"
        );
        self.sellers.push(seller.clone());
        Ok(seller)
    }

    /// Looks up a seller by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the seller does not exist.
    pub fn get_seller(&self, id: &SellerId) -> Result<&Seller, CoreError> {
        self.sellers
            .iter()
            .find(|s| &s.id == id)
            .ok_or_else(|| CoreError::SellerNotFound(id.clone()))
    }

    /// Returns a copy of every seller in registration order.
    #[must_use]
    pub fn get_all_sellers(&self) -> Vec<Seller> {
        self.sellers.clone()
    }

    /// Sets a seller's status from its string form.
    ///
    /// Load counters are not touched.
    ///
    /// # Errors
    ///
    /// Returns an error if the seller does not exist or the status is not
    /// one of `available`, `busy` or `offline`.
    pub fn update_seller_status(
        &mut self,
        id: &SellerId,
        status: &str,
    ) -> Result<Seller, CoreError> {
        let status: SellerStatus = status.parse()?;
        self.set_status(id, status)
    }

    /// Sets a seller's status.
    ///
    /// # Errors
    ///
    /// Returns an error if the seller does not exist.
    pub fn set_status(&mut self, id: &SellerId, status: SellerStatus) -> Result<Seller, CoreError> {
        let seller: &mut Seller = self.get_seller_mut(id)?;
        let previous: SellerStatus = seller.status;
        seller.status = status;
        info!(seller_id = %id, from = %previous, to = %status, "Seller status changed");
        Ok(seller.clone())
    }

    /// Applies a partial profile update.
    ///
    /// Lowering `max_clients` below the current load is allowed; the seller
    /// is then simply at capacity until conversations complete.
    ///
    /// # Errors
    ///
    /// Returns an error if the seller does not exist, the new name is empty,
    /// or the new `max_clients` is less than 1. On error nothing changes.
    pub fn update_seller(
        &mut self,
        id: &SellerId,
        changes: SellerUpdate,
    ) -> Result<Seller, CoreError> {
        // Validate everything before touching the record.
        let name: Option<String> = changes
            .name
            .as_deref()
            .map(validate_seller_name)
            .transpose()?;
        let max_clients: Option<u32> = changes.max_clients.map(validate_max_clients).transpose()?;

        let seller: &mut Seller = self.get_seller_mut(id)?;
        if let Some(name) = name {
            seller.name = name;
        }
        if let Some(phone) = changes.phone {
            seller.contact.phone = non_empty(phone);
        }
        if let Some(email) = changes.email {
            seller.contact.email = non_empty(email);
        }
        if let Some(specialty) = changes.specialty {
            seller.specialty = Specialty::new(&specialty);
        }
        if let Some(notes) = changes.notes {
            seller.notes = notes.trim().to_string();
        }
        if let Some(max_clients) = max_clients {
            seller.max_clients = max_clients;
        }
        if let Some(status) = changes.status {
            seller.status = status;
        }

        info!(seller_id = %id, "Updated seller profile");
        Ok(seller.clone())
    }

    /// Replaces one weekday entry of a seller's schedule.
    ///
    /// Unlike loading, editing is strict: bad input is rejected.
    ///
    /// # Arguments
    ///
    /// * `id` - The seller
    /// * `weekday` - 0 (Sunday) through 6 (Saturday)
    /// * `enabled` - Whether the seller works that day
    /// * `start` - Window start, `HH:MM`
    /// * `end` - Window end, `HH:MM`, exclusive
    ///
    /// # Errors
    ///
    /// Returns an error if the seller does not exist, the weekday is outside
    /// 0-6, a time is malformed, or `end` is not after `start`.
    pub fn update_work_schedule(
        &mut self,
        id: &SellerId,
        weekday: i64,
        enabled: bool,
        start: &str,
        end: &str,
    ) -> Result<Seller, CoreError> {
        let weekday: u8 = u8::try_from(weekday)
            .ok()
            .filter(|d| usize::from(*d) < DAYS_PER_WEEK)
            .ok_or(DomainError::InvalidWeekday(weekday))?;
        let entry: DaySchedule = DaySchedule::parse(enabled, start, end)?;

        let seller: &mut Seller = self.get_seller_mut(id)?;
        seller.work_schedule.set(weekday, entry)?;

        info!(
            seller_id = %id,
            weekday,
            enabled,
            start = %entry.start,
            end = %entry.end,
            "Updated work schedule"
        );
        Ok(seller.clone())
    }

    /// Adds a day off, replacing any existing entry for the same date.
    ///
    /// # Errors
    ///
    /// Returns an error if the seller does not exist or the date is not a
    /// `YYYY-MM-DD` date (an RFC 3339 timestamp is also accepted).
    pub fn add_day_off(
        &mut self,
        id: &SellerId,
        date: &str,
        reason: Option<String>,
    ) -> Result<Seller, CoreError> {
        let date: NaiveDate = parse_day_off_date(date)?;
        let reason: Option<String> = reason.and_then(non_empty);

        let seller: &mut Seller = self.get_seller_mut(id)?;
        let added: bool = seller.days_off.insert(date, reason);

        info!(seller_id = %id, %date, replaced = !added, "Added day off");
        Ok(seller.clone())
    }

    /// Removes a day off.
    ///
    /// # Returns
    ///
    /// `true` if the date was present, `false` if there was nothing to remove.
    ///
    /// # Errors
    ///
    /// Returns an error if the seller does not exist or the date is malformed.
    pub fn remove_day_off(&mut self, id: &SellerId, date: &str) -> Result<bool, CoreError> {
        let date: NaiveDate = parse_day_off_date(date)?;
        let seller: &mut Seller = self.get_seller_mut(id)?;
        let removed: bool = seller.days_off.remove(date);
        if removed {
            info!(seller_id = %id, %date, "Removed day off");
        } else {
            debug!(seller_id = %id, %date, "No day off to remove");
        }
        Ok(removed)
    }

    /// Sets a seller's rating.
    ///
    /// # Errors
    ///
    /// Returns an error if the seller does not exist or the rating is not a
    /// finite number in 0-5.
    pub fn update_rating(&mut self, id: &SellerId, rating: f64) -> Result<Seller, CoreError> {
        let rating: f64 = validate_rating(rating)?;
        let seller: &mut Seller = self.get_seller_mut(id)?;
        seller.rating = rating;
        info!(seller_id = %id, rating, "Updated seller rating");
        Ok(seller.clone())
    }

    /// Adds one active client to a seller.
    ///
    /// # Returns
    ///
    /// The new `current_clients` value.
    ///
    /// # Errors
    ///
    /// Returns an error if the seller does not exist or is already at
    /// capacity. The counter is never clamped.
    pub fn increment_load(&mut self, id: &SellerId) -> Result<u32, CoreError> {
        let seller: &mut Seller = self.get_seller_mut(id)?;
        if !seller.has_capacity() {
            return Err(CoreError::CapacityExceeded {
                seller_id: id.clone(),
                current: seller.current_clients,
                max: seller.max_clients,
            });
        }
        seller.current_clients += 1;
        debug!(
            seller_id = %id,
            current = seller.current_clients,
            max = seller.max_clients,
            "Incremented seller load"
        );
        Ok(seller.current_clients)
    }

    /// Removes one active client from a seller, stopping at zero.
    ///
    /// # Returns
    ///
    /// The new `current_clients` value.
    ///
    /// # Errors
    ///
    /// Returns an error if the seller does not exist.
    pub fn decrement_load(&mut self, id: &SellerId) -> Result<u32, CoreError> {
        let seller: &mut Seller = self.get_seller_mut(id)?;
        if seller.current_clients == 0 {
            warn!(seller_id = %id, "Load already zero; not decrementing");
        }
        seller.current_clients = seller.current_clients.saturating_sub(1);
        debug!(seller_id = %id, current = seller.current_clients, "Decremented seller load");
        Ok(seller.current_clients)
    }

    /// Per-seller utilization in registration order.
    #[must_use]
    pub fn get_workload(&self) -> Vec<WorkloadEntry> {
        self.sellers.iter().map(WorkloadEntry::from).collect()
    }

    /// Exports the registry state.
    #[must_use]
    pub fn get_state(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            next_seller_number: self.next_seller_number,
            sellers: self.sellers.clone(),
        }
    }

    /// Replaces the registry contents with a snapshot.
    ///
    /// Duplicate ids keep their first occurrence. Sellers without a
    /// registration sequence get one from their id number or position, and
    /// the id counter is advanced past every id already in use.
    pub fn restore_state(&mut self, snapshot: RegistrySnapshot) {
        let mut seen: HashSet<SellerId> = HashSet::new();
        let mut sellers: Vec<Seller> = Vec::with_capacity(snapshot.sellers.len());

        for (position, mut seller) in (1_u64..).zip(snapshot.sellers) {
            if !seen.insert(seller.id.clone()) {
                warn!(seller_id = %seller.id, "Duplicate seller id in snapshot; skipping");
                continue;
            }
            if seller.registered_seq == 0 {
                seller.registered_seq = seller.id.number().unwrap_or(position);
            }
            sellers.push(seller);
        }

        let highest_number: u64 = sellers
            .iter()
            .filter_map(|s| s.id.number())
            .max()
            .unwrap_or(0);

        if highest_number == u64::MAX || snapshot.next_seller_number == u64::MAX {
            warn!("Seller id counter is at its limit; new sellers cannot be registered");
        }
        self.next_seller_number = snapshot
            .next_seller_number
            .max(highest_number.saturating_add(1))
            .max(1);
        self.sellers = sellers;

        info!(
            sellers = self.sellers.len(),
            next_seller_number = self.next_seller_number,
            "Restored seller registry"
        );
    }

    fn get_seller_mut(&mut self, id: &SellerId) -> Result<&mut Seller, CoreError> {
        self.sellers
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| CoreError::SellerNotFound(id.clone()))
    }

    fn allocate_id(&mut self) -> Result<SellerId, CoreError> {
        loop {
            let number: u64 = self.next_seller_number;
            let id: SellerId = SellerId::from_number(number);
            let in_use: bool = self.sellers.iter().any(|s| s.id == id);
            match number.checked_add(1) {
                Some(next) => self.next_seller_number = next,
                None if in_use => return Err(CoreError::SellerIdsExhausted),
                None => {}
            }
            if !in_use {
                return Ok(id);
            }
        }
    }

    fn next_registration_seq(&self) -> u64 {
        self.sellers
            .iter()
            .map(|s| s.registered_seq)
            .max()
            .unwrap_or(0)
            .saturating_add(1)
    }
}

impl Default for SellerRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CLIENTS)
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed: &str = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
