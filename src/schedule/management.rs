//! Schedule editing helpers used before saving

use super::error::{ScheduleError, ScheduleResult};
use super::types::{create_default_time_slot, Schedule};
use chrono::{DateTime, Utc};

/// Check the fields the backend requires before sending a schedule
pub fn validate_schedule(schedule: &Schedule) -> ScheduleResult<()> {
    if schedule.name.trim().is_empty() {
        return Err(ScheduleError::Validation("name has to be defined".to_string()));
    }

    if let Some(slot) = schedule
        .time_slots
        .iter()
        .find(|slot| slot.participants_per_entry < 1)
    {
        return Err(ScheduleError::Validation(format!(
            "time slot at {} needs at least one participant per entry",
            slot.date_time.to_rfc3339()
        )));
    }

    Ok(())
}

/// Append a default time slot starting at the next 5-minute boundary
pub fn add_default_time_slot(schedule: &mut Schedule, now: DateTime<Utc>) {
    schedule.time_slots.push(create_default_time_slot(now));
}

/// Remove the slot at `index`; registered slots cannot be removed
pub fn remove_time_slot(schedule: &mut Schedule, index: usize) -> ScheduleResult<()> {
    match schedule.time_slots.get(index) {
        None => Err(ScheduleError::Validation(format!("no time slot at position {}", index))),
        Some(slot) if !slot.registrations.is_empty() => Err(ScheduleError::Validation(
            "cannot remove a time slot that already has registrations".to_string(),
        )),
        Some(_) => {
            schedule.time_slots.remove(index);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::types::{create_default_schedule, Registration, TimeSlot};

    #[test]
    fn test_default_schedule_is_valid() {
        assert!(validate_schedule(&create_default_schedule(Utc::now())).is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        let schedule = Schedule::new("   ");
        assert!(matches!(validate_schedule(&schedule), Err(ScheduleError::Validation(_))));
    }

    #[test]
    fn test_zero_participants_rejected() {
        let schedule = Schedule::new("Race").time_slot(TimeSlot::new(Utc::now(), 1, 0));
        assert!(validate_schedule(&schedule).is_err());
    }

    #[test]
    fn test_add_and_remove_slots() {
        let mut schedule = Schedule::new("Race");
        add_default_time_slot(&mut schedule, Utc::now());
        add_default_time_slot(&mut schedule, Utc::now());
        assert_eq!(schedule.time_slots.len(), 2);

        schedule.time_slots[0]
            .registrations
            .push(Registration::new(1, vec!["Ava".to_string()]));
        assert!(remove_time_slot(&mut schedule, 0).is_err());
        assert!(remove_time_slot(&mut schedule, 5).is_err());
        assert!(remove_time_slot(&mut schedule, 1).is_ok());
        assert_eq!(schedule.time_slots.len(), 1);
    }
}
