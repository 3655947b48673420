//! Schedule data model
//!
//! Ownership is strictly hierarchical: a `Schedule` owns its time slots and
//! each `TimeSlot` owns its registrations. The same types are used as the
//! JSON payloads of the API (camelCase fields).

use crate::datetime::{self, MINUTES_STEP};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Id of an entity the backend has not assigned an id to yet
pub const NEW_ID: i64 = -1;

/// Name given to freshly created schedules
pub const DEFAULT_SCHEDULE_NAME: &str = "New Schedule";

/// One accepted entry into a time slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: i64,
    /// As many names as the slot's `participants_per_entry`
    #[serde(default)]
    pub participants: Vec<String>,
}

impl Registration {
    pub fn new(id: i64, participants: Vec<String>) -> Self {
        Self { id, participants }
    }
}

/// A schedulable period with a fixed capacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub id: i64,
    #[serde(with = "datetime::serde_lenient")]
    pub date_time: DateTime<Utc>,
    pub maximum_entries: u32,
    pub participants_per_entry: u32,
    #[serde(default)]
    pub registrations: Vec<Registration>,
}

impl TimeSlot {
    /// Create an unsaved slot
    pub fn new(date_time: DateTime<Utc>, maximum_entries: u32, participants_per_entry: u32) -> Self {
        Self {
            id: NEW_ID,
            date_time,
            maximum_entries,
            participants_per_entry,
            registrations: Vec::new(),
        }
    }

    /// Builder method: set the id
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    /// Builder method: add a registration
    pub fn registration(mut self, registration: Registration) -> Self {
        self.registrations.push(registration);
        self
    }

    pub fn is_new(&self) -> bool {
        self.id == NEW_ID
    }
}

/// A set of time slots sharing one registration form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: i64,
    pub name: String,
    /// Registration open/closed gate
    pub active: bool,
    /// Capability token embedded in the registration link
    #[serde(default)]
    pub registration_key: String,
    #[serde(default)]
    pub time_slots: Vec<TimeSlot>,
}

impl Schedule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NEW_ID,
            name: name.into(),
            active: false,
            registration_key: String::new(),
            time_slots: Vec::new(),
        }
    }

    /// Builder method: add a time slot
    pub fn time_slot(mut self, slot: TimeSlot) -> Self {
        self.time_slots.push(slot);
        self
    }

    /// Builder method: open or close registration
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn is_new(&self) -> bool {
        self.id == NEW_ID
    }

    pub fn find_time_slot(&self, id: i64) -> Option<&TimeSlot> {
        self.time_slots.iter().find(|slot| slot.id == id)
    }

    pub fn find_time_slot_mut(&mut self, id: i64) -> Option<&mut TimeSlot> {
        self.time_slots.iter_mut().find(|slot| slot.id == id)
    }

    /// Shareable link to this schedule's registration form
    pub fn registration_link(&self, origin: &str) -> String {
        super::link::RegistrationLink::new(self.id, self.registration_key.clone()).to_url(origin)
    }
}

/// Authenticated schedule owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub name: String,
}

/// Default slot: starts at the next 5-minute boundary after `now`, one
/// entry of one participant
pub fn create_default_time_slot(now: DateTime<Utc>) -> TimeSlot {
    TimeSlot::new(datetime::round_up_to_step(now, MINUTES_STEP), 1, 1)
}

/// Default schedule: inactive, no key, a single default slot
pub fn create_default_schedule(now: DateTime<Utc>) -> Schedule {
    Schedule::new(DEFAULT_SCHEDULE_NAME).time_slot(create_default_time_slot(now))
}
