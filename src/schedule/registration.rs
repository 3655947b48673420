//! Registration flow
//!
//! A `RegistrationSession` holds the schedule behind a registration link,
//! the selected slot and the participant names typed so far. Submission is
//! gated client-side; when the backend reports the slot filled up in the
//! meantime (507), the slot is marked full locally and stays selected so
//! the message can be shown next to it.

use super::capacity::{apply_capacity_conflict, sort_time_slots};
use super::error::{ScheduleError, ScheduleResult};
use super::link::RegistrationLink;
use super::types::{Schedule, TimeSlot};
use crate::api::ApiError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Backend operations the registration form depends on
#[async_trait]
pub trait RegistrationBackend: Send + Sync {
    /// Fetch a schedule through its registration key
    async fn fetch_schedule(&self, schedule_id: i64, registration_key: &str) -> Result<Schedule, ApiError>;

    /// Register participants into a time slot, returning the registration id
    async fn register(
        &self,
        time_slot_id: i64,
        participants: &[String],
        registration_key: &str,
    ) -> Result<i64, ApiError>;
}

/// Upper bound on participant inputs of one form
pub const MAX_PARTICIPANTS: usize = 64;

/// Selected slot and participant names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    selected_slot: Option<i64>,
    participants: Vec<String>,
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_slot(&self) -> Option<i64> {
        self.selected_slot
    }

    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    /// Set the name at `index`, growing the list as needed.
    ///
    /// Indices at or above [`MAX_PARTICIPANTS`] are ignored.
    pub fn set_participant(&mut self, index: usize, name: impl Into<String>) {
        if index >= MAX_PARTICIPANTS {
            tracing::debug!(index, "Ignoring participant beyond the form limit");
            return;
        }
        if self.participants.len() <= index {
            self.participants.resize(index + 1, String::new());
        }
        self.participants[index] = name.into();
    }

    /// Names that would be submitted for `slot`; extra entries are ignored
    pub fn participants_for(&self, slot: &TimeSlot) -> Vec<String> {
        self.participants
            .iter()
            .take(slot.participants_per_entry as usize)
            .cloned()
            .collect()
    }

    /// Exactly `participants_per_entry` names, none of them empty
    pub fn is_complete_for(&self, slot: &TimeSlot) -> bool {
        let names = self.participants_for(slot);
        names.len() == slot.participants_per_entry as usize && names.iter().all(|name| !name.is_empty())
    }
}

/// Result of a submission that reached the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Registration stored; the caller usually moves on to the schedule view
    Registered { registration_id: i64, schedule_id: i64 },
    /// Slot filled up meanwhile and is now marked full
    SlotFull { time_slot_id: i64, message: String },
}

/// Registration form bound to one schedule
#[derive(Debug, Clone)]
pub struct RegistrationSession {
    schedule: Schedule,
    registration_key: String,
    form: RegistrationForm,
    error_message: Option<String>,
}

impl RegistrationSession {
    /// Wrap an already fetched schedule; slots are sorted by start time
    pub fn new(mut schedule: Schedule, registration_key: impl Into<String>) -> Self {
        sort_time_slots(&mut schedule.time_slots);
        Self {
            schedule,
            registration_key: registration_key.into(),
            form: RegistrationForm::new(),
            error_message: None,
        }
    }

    /// Load the form behind a registration link.
    ///
    /// `Ok(None)` means the link does not lead to an existing form.
    pub async fn open<B: RegistrationBackend + ?Sized>(
        backend: &B,
        link: &RegistrationLink,
    ) -> ScheduleResult<Option<Self>> {
        match backend
            .fetch_schedule(link.schedule_id, &link.registration_key)
            .await
        {
            Ok(schedule) => Ok(Some(Self::new(schedule, link.registration_key.clone()))),
            Err(ApiError::NotFound) => {
                tracing::info!(schedule_id = link.schedule_id, "Registration link leads nowhere");
                Ok(None)
            }
            Err(e) => {
                tracing::error!(schedule_id = link.schedule_id, error = %e, "Failed to load schedule");
                Err(e.into())
            }
        }
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    /// Message to display next to the submit button
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn selected_slot(&self) -> Option<&TimeSlot> {
        self.form
            .selected_slot
            .and_then(|id| self.schedule.find_time_slot(id))
    }

    /// Select a slot; only slots open at `now` can be picked
    pub fn select_slot(&mut self, time_slot_id: i64, now: DateTime<Utc>) -> ScheduleResult<()> {
        let slot = self
            .schedule
            .find_time_slot(time_slot_id)
            .ok_or(ScheduleError::SlotNotFound(time_slot_id))?;

        if !slot.is_selectable(now) {
            return Err(ScheduleError::Validation(format!(
                "time slot {} is not open for registration",
                time_slot_id
            )));
        }

        self.form.selected_slot = Some(time_slot_id);
        self.error_message = None;
        Ok(())
    }

    pub fn set_participant(&mut self, index: usize, name: impl Into<String>) {
        self.form.set_participant(index, name);
    }

    /// Submit button state
    pub fn can_submit(&self) -> bool {
        self.schedule.active
            && self
                .selected_slot()
                .map_or(false, |slot| slot.entries_left() > 0 && self.form.is_complete_for(slot))
    }

    /// Send the registration.
    ///
    /// Incomplete forms fail with `Validation` without contacting the backend.
    /// Taking `&mut self` rules out a second submission while one is pending.
    pub async fn submit<B: RegistrationBackend + ?Sized>(&mut self, backend: &B) -> ScheduleResult<SubmitOutcome> {
        if !self.can_submit() {
            return Err(ScheduleError::Validation(
                "select an open time slot and fill in every participant".to_string(),
            ));
        }

        let (time_slot_id, participants) = match self.selected_slot() {
            Some(slot) => (slot.id, self.form.participants_for(slot)),
            None => return Err(ScheduleError::Validation("no time slot selected".to_string())),
        };

        match backend
            .register(time_slot_id, &participants, &self.registration_key)
            .await
        {
            Ok(registration_id) => {
                tracing::info!(time_slot_id, registration_id, "Registration accepted");
                self.error_message = None;
                Ok(SubmitOutcome::Registered {
                    registration_id,
                    schedule_id: self.schedule.id,
                })
            }
            Err(ApiError::CapacityExceeded { message }) => {
                apply_capacity_conflict(&mut self.schedule, time_slot_id);
                self.form.selected_slot = Some(time_slot_id);
                self.error_message = Some(message.clone());
                Ok(SubmitOutcome::SlotFull { time_slot_id, message })
            }
            Err(e) => {
                tracing::error!(time_slot_id, error = %e, "Registration failed");
                self.error_message = Some(e.user_message());
                Err(e.into())
            }
        }
    }
}
