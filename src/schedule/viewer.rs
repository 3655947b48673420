//! Read-only schedule view
//!
//! Lists the slots that already have registrations, with their fill level
//! and numbered participants.

use super::capacity::{entries_noun, sort_time_slots};
use super::types::{Schedule, TimeSlot};
use crate::datetime;
use chrono::{Local, TimeZone};
use std::fmt::{self, Display};

/// `"({n} / {max} entr{y|ies})"` where `n` counts registrations
pub fn registrations_label(slot: &TimeSlot) -> String {
    let count = slot.registrations.len() as i64;
    format!("({} / {} {})", count, slot.maximum_entries, entries_noun(count))
}

/// Participant lines of a slot, grouped per registration.
///
/// Team slots number participants within each registration; solo slots
/// number across registrations.
pub fn numbered_participants(slot: &TimeSlot) -> Vec<Vec<String>> {
    let team = slot.participants_per_entry > 1;

    slot.registrations
        .iter()
        .enumerate()
        .map(|(registration_index, registration)| {
            registration
                .participants
                .iter()
                .enumerate()
                .map(|(participant_index, name)| {
                    let number = (if team { participant_index } else { registration_index }) + 1;
                    format!("{}. {}", number, name)
                })
                .collect()
        })
        .collect()
}

/// Sorted slots with at least one registration
pub fn registered_slots(schedule: &Schedule) -> Vec<TimeSlot> {
    let mut slots: Vec<TimeSlot> = schedule
        .time_slots
        .iter()
        .filter(|slot| !slot.registrations.is_empty())
        .cloned()
        .collect();
    sort_time_slots(&mut slots);
    slots
}

/// Plain-text rendering of a schedule
pub struct ScheduleView<'a> {
    schedule: &'a Schedule,
}

impl<'a> ScheduleView<'a> {
    pub fn new(schedule: &'a Schedule) -> Self {
        Self { schedule }
    }

    /// Render with date/times in `tz`
    pub fn render_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        InZone { view: self, tz }.to_string()
    }

    fn write_to<Tz>(&self, out: &mut fmt::Formatter<'_>, tz: &Tz) -> fmt::Result
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        write!(out, "Schedule for: {}", self.schedule.name)?;

        if !self.schedule.active {
            writeln!(out)?;
            write!(out, "This schedule is currently inactive and registration is closed.")?;
        }

        for slot in registered_slots(self.schedule) {
            writeln!(out)?;
            writeln!(out)?;
            write!(
                out,
                "{} {}",
                datetime::format_slot_datetime_in(slot.date_time, tz),
                registrations_label(&slot)
            )?;

            let team = slot.participants_per_entry > 1;
            if !team {
                writeln!(out)?;
                write!(out, "  Participants")?;
            }

            for lines in numbered_participants(&slot) {
                if team {
                    writeln!(out)?;
                    write!(out, "  Participants")?;
                }
                for line in lines {
                    writeln!(out)?;
                    write!(out, "    {}", line)?;
                }
            }
        }

        Ok(())
    }
}

/// A view bound to a display timezone
struct InZone<'v, 'a, Tz> {
    view: &'v ScheduleView<'a>,
    tz: &'v Tz,
}

impl<Tz> fmt::Display for InZone<'_, '_, Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.view.write_to(f, self.tz)
    }
}

impl fmt::Display for ScheduleView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f, &Local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::types::Registration;
    use chrono::{DateTime, Utc};

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_registrations_label() {
        let mut slot = TimeSlot::new(at("2024-01-19T18:05:00Z"), 4, 1);
        assert_eq!(registrations_label(&slot), "(0 / 4 entries)");
        slot.registrations.push(Registration::new(1, names(&["Ava"])));
        assert_eq!(registrations_label(&slot), "(1 / 4 entry)");
    }

    #[test]
    fn test_solo_numbering_spans_registrations() {
        let slot = TimeSlot::new(at("2024-01-19T18:05:00Z"), 4, 1)
            .registration(Registration::new(1, names(&["Ava"])))
            .registration(Registration::new(2, names(&["Bo"])));
        assert_eq!(
            numbered_participants(&slot),
            vec![names(&["1. Ava"]), names(&["2. Bo"])]
        );
    }

    #[test]
    fn test_team_numbering_restarts() {
        let slot = TimeSlot::new(at("2024-01-19T18:05:00Z"), 4, 2)
            .registration(Registration::new(1, names(&["Ava", "Bo"])))
            .registration(Registration::new(2, names(&["Cy", "Di"])));
        assert_eq!(
            numbered_participants(&slot),
            vec![names(&["1. Ava", "2. Bo"]), names(&["1. Cy", "2. Di"])]
        );
    }

    #[test]
    fn test_only_registered_slots_listed_in_order() {
        let schedule = Schedule::new("Race")
            .time_slot(
                TimeSlot::new(at("2024-01-20T18:00:00Z"), 2, 1)
                    .with_id(1)
                    .registration(Registration::new(1, names(&["Ava"]))),
            )
            .time_slot(TimeSlot::new(at("2024-01-18T18:00:00Z"), 2, 1).with_id(2))
            .time_slot(
                TimeSlot::new(at("2024-01-19T18:00:00Z"), 2, 1)
                    .with_id(3)
                    .registration(Registration::new(2, names(&["Bo"]))),
            );

        let ids: Vec<i64> = registered_slots(&schedule).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_render_inactive_schedule() {
        let schedule = Schedule::new("Weekly race").time_slot(
            TimeSlot::new(at("2024-01-19T18:05:00Z"), 2, 1)
                .registration(Registration::new(1, names(&["Ava"]))),
        );

        let text = ScheduleView::new(&schedule).render_in(&Utc);
        assert!(text.starts_with("Schedule for: Weekly race\n"));
        assert!(!text.contains("entries)"));
        assert!(text.contains("registration is closed"));
        assert!(text.contains("Fri 2024-01-19 18:05 (1 / 2 entry)"));
        assert!(text.ends_with("    1. Ava"));
    }

    #[test]
    fn test_team_slot_render() {
        let schedule = Schedule::new("Relay").active(true).time_slot(
            TimeSlot::new(at("2024-01-19T18:05:00Z"), 3, 2)
                .registration(Registration::new(1, names(&["Ava", "Bo"])))
                .registration(Registration::new(2, names(&["Cy", "Di"]))),
        );

        let text = ScheduleView::new(&schedule).render_in(&Utc);
        assert_eq!(
            text,
            "Schedule for: Relay\n\n\
             Fri 2024-01-19 18:05 (2 / 3 entries)\n  Participants\n    1. Ava\n    2. Bo\n  \
             Participants\n    1. Cy\n    2. Di"
        );
    }
}
