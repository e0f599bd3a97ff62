use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use slated_domain::{CandidateSlot, DailyWindow, DayOfWeek, ServiceAvailability};

/// Rule violated by a requested slot. Carried on `ScheduleError::InvalidSlot`
/// so callers see which check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidSlotReason {
    #[error("start time is in the past")]
    InPast,
    #[error("service has no bookable availability")]
    NotBookable,
    #[error("requested day is outside the service's recurring days")]
    OutsideRecurrence,
    #[error("slot falls outside the service's daily window")]
    OutsideWindow,
    #[error("start time is not aligned to the slot grid")]
    Misaligned,
}

/// Expand a service's recurring availability into candidate slots for
/// `[range_start, range_end]`: one slot per whole duration step inside the
/// daily window, on allowed weekdays only, strictly after `now`, fully
/// inside the requested range. Ascending by start; same inputs, same slots.
pub fn candidate_slots(
    availability: &ServiceAvailability,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> impl Iterator<Item = CandidateSlot> {
    let service_id = availability.service_id;
    let provider_id = availability.provider_id;
    let duration = availability.duration();
    let days = availability.recurring_days.clone();
    let window = availability.window();

    let first_day = range_start.date_naive();
    let span_days = if availability.is_bookable() && window.end > window.start {
        (range_end.date_naive() - first_day).num_days()
    } else {
        -1
    };

    (0..=span_days)
        .map(move |offset| first_day + Duration::days(offset))
        .filter(move |day| days.contains(&DayOfWeek::from(day.weekday())))
        .flat_map(move |day| day_slots(day, window, duration))
        .map(move |(start_at, end_at)| CandidateSlot {
            service_id,
            provider_id,
            start_at,
            end_at,
        })
        .filter(move |slot| {
            slot.start_at > now && slot.start_at >= range_start && slot.end_at <= range_end
        })
}

fn day_slots(
    day: NaiveDate,
    window: DailyWindow,
    duration: Duration,
) -> impl Iterator<Item = (DateTime<Utc>, DateTime<Utc>)> {
    let window_start = day.and_time(window.start).and_utc();
    let window_end = day.and_time(window.end).and_utc();

    std::iter::successors(Some(window_start), move |start| Some(*start + duration))
        .map(move |start| (start, start + duration))
        .take_while(move |(_, end)| *end <= window_end)
}

/// Re-derive a single slot at reservation time. A slot that was listed but
/// no longer fits the current availability snapshot fails here instead of
/// being written.
pub fn validate_candidate(
    availability: &ServiceAvailability,
    start_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<CandidateSlot, InvalidSlotReason> {
    let window = availability.window();
    if !availability.is_bookable() || window.end <= window.start {
        return Err(InvalidSlotReason::NotBookable);
    }
    if start_at <= now {
        return Err(InvalidSlotReason::InPast);
    }

    let day = start_at.date_naive();
    if !availability.offered_on(DayOfWeek::from(day.weekday())) {
        return Err(InvalidSlotReason::OutsideRecurrence);
    }

    let window_start = day.and_time(window.start).and_utc();
    let window_end = day.and_time(window.end).and_utc();
    let end_at = start_at + availability.duration();
    if start_at < window_start || end_at > window_end {
        return Err(InvalidSlotReason::OutsideWindow);
    }

    let offset_seconds = (start_at - window_start).num_seconds();
    if offset_seconds % (i64::from(availability.duration_minutes) * 60) != 0 {
        return Err(InvalidSlotReason::Misaligned);
    }

    Ok(CandidateSlot {
        service_id: availability.service_id,
        provider_id: availability.provider_id,
        start_at,
        end_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, TimeZone};
    use uuid::Uuid;

    fn monday_service(window_start: (u32, u32), window_end: (u32, u32)) -> ServiceAvailability {
        ServiceAvailability {
            service_id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
            price_amount: 5000,
            price_currency: "USD".to_string(),
            duration_minutes: 60,
            recurring_days: vec![DayOfWeek::Monday],
            daily_window: Some(DailyWindow {
                start: NaiveTime::from_hms_opt(window_start.0, window_start.1, 0).unwrap(),
                end: NaiveTime::from_hms_opt(window_end.0, window_end.1, 0).unwrap(),
            }),
        }
    }

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        // August 2026: the 10th is a Monday
        Utc.with_ymd_and_hms(2026, 8, day, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_monday_window_yields_two_slots() {
        let service = monday_service((9, 0), (11, 0));
        let slots: Vec<_> = candidate_slots(
            &service,
            at(9, 0, 0),
            at(15, 23, 59),
            at(1, 12, 0),
        )
        .collect();

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].start_at, at(10, 9, 0));
        assert_eq!(slots[0].end_at, at(10, 10, 0));
        assert_eq!(slots[1].start_at, at(10, 10, 0));
        assert_eq!(slots[1].end_at, at(10, 11, 0));
    }

    #[test]
    fn test_slots_fall_on_allowed_weekdays_only() {
        let service = monday_service((9, 0), (18, 0));
        let slots: Vec<_> = candidate_slots(
            &service,
            at(1, 0, 0),
            at(31, 23, 59),
            at(1, 0, 0),
        )
        .collect();

        assert!(!slots.is_empty());
        for slot in &slots {
            assert_eq!(
                DayOfWeek::from(slot.start_at.date_naive().weekday()),
                DayOfWeek::Monday
            );
            assert!(slot.start_at > at(1, 0, 0));
        }
    }

    #[test]
    fn test_past_slots_are_dropped() {
        let service = monday_service((9, 0), (11, 0));
        // Asking mid-window on the Monday itself: 09:00 already started
        let slots: Vec<_> = candidate_slots(
            &service,
            at(9, 0, 0),
            at(15, 23, 59),
            at(10, 9, 30),
        )
        .collect();

        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start_at, at(10, 10, 0));
    }

    #[test]
    fn test_zero_length_range_is_empty() {
        let service = monday_service((9, 0), (11, 0));
        let instant = at(10, 9, 0);
        assert_eq!(
            candidate_slots(&service, instant, instant, at(1, 0, 0)).count(),
            0
        );
    }

    #[test]
    fn test_no_recurring_days_is_empty() {
        let mut service = monday_service((9, 0), (11, 0));
        service.recurring_days.clear();
        assert_eq!(
            candidate_slots(&service, at(1, 0, 0), at(31, 0, 0), at(1, 0, 0)).count(),
            0
        );
    }

    #[test]
    fn test_duration_longer_than_window_is_empty() {
        let mut service = monday_service((9, 0), (11, 0));
        service.duration_minutes = 180;
        assert_eq!(
            candidate_slots(&service, at(1, 0, 0), at(31, 0, 0), at(1, 0, 0)).count(),
            0
        );
    }

    #[test]
    fn test_slots_are_clipped_to_the_range() {
        let service = monday_service((9, 0), (11, 0));
        // Range ends 10:30 on the Monday: the 10:00-11:00 slot no longer fits
        let slots: Vec<_> = candidate_slots(
            &service,
            at(9, 0, 0),
            at(10, 10, 30),
            at(1, 0, 0),
        )
        .collect();

        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start_at, at(10, 9, 0));
    }

    #[test]
    fn test_same_inputs_same_slots() {
        let service = monday_service((9, 0), (18, 0));
        let first: Vec<_> =
            candidate_slots(&service, at(1, 0, 0), at(31, 0, 0), at(1, 0, 0)).collect();
        let second: Vec<_> =
            candidate_slots(&service, at(1, 0, 0), at(31, 0, 0), at(1, 0, 0)).collect();
        assert_eq!(first, second);

        let mut sorted = first.clone();
        sorted.sort_by_key(|slot| slot.start_at);
        assert_eq!(first, sorted);
    }

    #[test]
    fn test_validate_accepts_a_listed_slot() {
        let service = monday_service((9, 0), (11, 0));
        let slot = validate_candidate(&service, at(10, 10, 0), at(1, 0, 0)).unwrap();
        assert_eq!(slot.end_at, at(10, 11, 0));
        assert_eq!(slot.provider_id, service.provider_id);
    }

    #[test]
    fn test_validate_rejects_each_rule() {
        let service = monday_service((9, 0), (11, 0));

        assert_eq!(
            validate_candidate(&service, at(10, 10, 0), at(12, 0, 0)),
            Err(InvalidSlotReason::InPast)
        );
        assert_eq!(
            validate_candidate(&service, at(11, 9, 0), at(1, 0, 0)),
            Err(InvalidSlotReason::OutsideRecurrence)
        );
        assert_eq!(
            validate_candidate(&service, at(10, 8, 0), at(1, 0, 0)),
            Err(InvalidSlotReason::OutsideWindow)
        );
        assert_eq!(
            validate_candidate(&service, at(10, 9, 30), at(1, 0, 0)),
            Err(InvalidSlotReason::Misaligned)
        );

        let mut unbookable = monday_service((9, 0), (11, 0));
        unbookable.recurring_days.clear();
        assert_eq!(
            validate_candidate(&unbookable, at(10, 9, 0), at(1, 0, 0)),
            Err(InvalidSlotReason::NotBookable)
        );
    }

    #[test]
    fn test_validate_rejects_slot_crossing_window_end() {
        let service = monday_service((9, 0), (10, 30));
        // 10:00 start would run to 11:00, past the 10:30 close
        assert_eq!(
            validate_candidate(&service, at(10, 10, 0), at(1, 0, 0)),
            Err(InvalidSlotReason::OutsideWindow)
        );
    }
}
