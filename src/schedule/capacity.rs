//! Time-slot capacity and eligibility rules
//!
//! These gate the registration form only; the backend stays authoritative
//! and answers 507 when a slot filled up in the meantime.

use super::types::{Schedule, TimeSlot};
use crate::datetime;
use chrono::{DateTime, TimeZone, Utc};
use std::fmt;

/// Remaining entries; negative when a slot is over capacity
pub fn entries_left(slot: &TimeSlot) -> i64 {
    i64::from(slot.maximum_entries) - slot.registrations.len() as i64
}

/// `"entry"` for exactly one, `"entries"` otherwise
pub fn entries_noun(count: i64) -> &'static str {
    if count == 1 {
        "entry"
    } else {
        "entries"
    }
}

impl TimeSlot {
    pub fn entries_left(&self) -> i64 {
        entries_left(self)
    }

    pub fn is_full(&self) -> bool {
        entries_left(self) <= 0
    }

    /// Deadline reached: the slot starts at or before `now`
    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        self.date_time <= now
    }

    /// Open for registration at `now`
    pub fn is_selectable(&self, now: DateTime<Utc>) -> bool {
        !self.is_full() && !self.is_past(now)
    }
}

/// Registration state of a slot at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotAvailability {
    PastDeadline,
    Full,
    Open { entries_left: u32, maximum_entries: u32 },
}

impl SlotAvailability {
    /// Deadline takes precedence over capacity
    pub fn of(slot: &TimeSlot, now: DateTime<Utc>) -> Self {
        if slot.is_past(now) {
            SlotAvailability::PastDeadline
        } else if slot.is_full() {
            SlotAvailability::Full
        } else {
            SlotAvailability::Open {
                entries_left: entries_left(slot) as u32,
                maximum_entries: slot.maximum_entries,
            }
        }
    }

    pub fn is_selectable(&self) -> bool {
        matches!(self, SlotAvailability::Open { .. })
    }
}

impl fmt::Display for SlotAvailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotAvailability::PastDeadline => write!(f, "past deadline"),
            SlotAvailability::Full => write!(f, "full"),
            SlotAvailability::Open {
                entries_left,
                maximum_entries,
            } => write!(
                f,
                "{} / {} {} left",
                entries_left,
                maximum_entries,
                entries_noun(i64::from(*entries_left))
            ),
        }
    }
}

/// Select-list label of a slot, in the local timezone
pub fn slot_label(slot: &TimeSlot, now: DateTime<Utc>) -> String {
    format!(
        "{} ({})",
        datetime::format_slot_datetime(slot.date_time),
        SlotAvailability::of(slot, now)
    )
}

/// Select-list label of a slot, in an explicit timezone
pub fn slot_label_in<Tz>(slot: &TimeSlot, now: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    format!(
        "{} ({})",
        datetime::format_slot_datetime_in(slot.date_time, tz),
        SlotAvailability::of(slot, now)
    )
}

/// Sort ascending by start time, keeping the original order of ties
pub fn sort_time_slots(slots: &mut [TimeSlot]) {
    slots.sort_by_key(|slot| slot.date_time);
}

/// Mark a slot as full after the backend rejected a registration for lack
/// of room. Returns the repaired slot, `None` if the id is unknown.
pub fn apply_capacity_conflict(schedule: &mut Schedule, time_slot_id: i64) -> Option<&TimeSlot> {
    let slot = schedule.find_time_slot_mut(time_slot_id)?;
    slot.maximum_entries = 0;
    tracing::info!(time_slot_id, "Time slot filled up before registration, marked as full");
    Some(&*slot)
}
