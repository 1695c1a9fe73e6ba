use super::event::Event;
use super::value_objects::SlotTime;
use crate::domain::errors::TournamentError;

/// Minimum spacing between two events of the same day
///
/// Two events exactly this far apart do not conflict.
pub const MIN_SLOT_GAP_MINUTES: u16 = 60;

/// Whether two same-day start times are closer than the minimum gap
pub fn too_close(a: SlotTime, b: SlotTime) -> bool {
    a.minutes_apart(b) < MIN_SLOT_GAP_MINUTES
}

/// Checks a start time against the other events of its day
///
/// `exclude` is the event being edited, which never conflicts with itself.
pub fn check_schedule(
    same_day: &[Event],
    time: SlotTime,
    exclude: Option<i64>,
) -> Result<(), TournamentError> {
    let conflict = same_day
        .iter()
        .filter(|event| Some(event.id) != exclude)
        .any(|event| too_close(event.event_time, time));

    if conflict {
        Err(TournamentError::ScheduleConflict)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(id: i64, hour: u16, minute: u16) -> Event {
        Event {
            id,
            event_date: NaiveDate::from_ymd_opt(2025, 6, 14).unwrap(),
            event_time: SlotTime::new(hour, minute).unwrap(),
        }
    }

    fn time(hour: u16, minute: u16) -> SlotTime {
        SlotTime::new(hour, minute).unwrap()
    }

    #[test]
    fn thirty_minutes_apart_conflicts() {
        let day = vec![at(1, 14, 0)];
        assert!(matches!(
            check_schedule(&day, time(14, 30), None),
            Err(TournamentError::ScheduleConflict)
        ));
    }

    #[test]
    fn sixty_five_minutes_apart_is_fine() {
        let day = vec![at(1, 14, 0)];
        assert!(check_schedule(&day, time(15, 5), None).is_ok());
    }

    #[test]
    fn exactly_sixty_minutes_apart_is_fine() {
        let day = vec![at(1, 14, 0)];
        assert!(check_schedule(&day, time(15, 0), None).is_ok());
        assert!(check_schedule(&day, time(13, 0), None).is_ok());
        assert!(check_schedule(&day, time(13, 1), None).is_err());
    }

    #[test]
    fn edited_event_is_ignored() {
        let day = vec![at(1, 14, 0), at(2, 16, 0)];
        assert!(check_schedule(&day, time(14, 20), Some(1)).is_ok());
        assert!(check_schedule(&day, time(15, 30), Some(1)).is_err());
    }

    #[test]
    fn empty_day_never_conflicts() {
        assert!(check_schedule(&[], time(0, 0), None).is_ok());
    }
}
