//! Tournament Scheduler
//!
//! Schedules, time slots and registrations, plus the rules the registration
//! form enforces before anything reaches the backend.
//!
//! ## Components
//!
//! - **Types**: `Schedule` → `TimeSlot` → `Registration`
//! - **Capacity**: entries left, selectability, slot labels, ordering
//! - **Link**: `{origin}?register={id}-{key}` build and parse
//! - **Registration**: form state and the submit flow with 507 repair
//! - **Viewer**: read-only listing of registrations
//! - **Management**: editing helpers and pre-save validation

mod capacity;
mod error;
mod link;
mod management;
mod registration;
mod types;
mod viewer;

pub use capacity::{
    apply_capacity_conflict, entries_left, entries_noun, slot_label, slot_label_in, sort_time_slots,
    SlotAvailability,
};
pub use error::{ScheduleError, ScheduleResult};
pub use link::{RegistrationLink, REGISTER_PARAM};
pub use management::{add_default_time_slot, remove_time_slot, validate_schedule};
pub use registration::{
    RegistrationBackend, RegistrationForm, RegistrationSession, SubmitOutcome, MAX_PARTICIPANTS,
};
pub use types::{
    create_default_schedule, create_default_time_slot, Registration, Schedule, TimeSlot, User,
    DEFAULT_SCHEDULE_NAME, NEW_ID,
};
pub use viewer::{numbered_participants, registered_slots, registrations_label, ScheduleView};
