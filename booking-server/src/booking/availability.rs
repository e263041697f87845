//! Availability calculation
//!
//! Pure merge of the generated slot sequence with the non-cancelled
//! reservation counts of one (shop, date). Slots without reservations
//! default to count 0. Reservation times outside the generated sequence
//! (schedule changed after booking) are not synthesized into the view —
//! they still exist as stored reservations, they just aren't offerable.

use std::collections::HashMap;

use chrono::NaiveTime;
use shared::models::TimeSlot;

use crate::utils::time::format_time;

/// Build the per-slot availability view.
///
/// `counts` maps a slot start to its current non-cancelled reservation
/// count; `max_capacity` is the shop's capacity per slot.
pub fn build_time_slots(
    slots: &[NaiveTime],
    counts: &HashMap<NaiveTime, i64>,
    max_capacity: i64,
) -> Vec<TimeSlot> {
    slots
        .iter()
        .map(|slot| {
            let current_count = counts.get(slot).copied().unwrap_or(0);
            TimeSlot {
                time: format_time(*slot),
                available: current_count < max_capacity,
                current_count,
                max_capacity,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn empty_counts_default_to_zero() {
        let slots = vec![t(9, 0), t(9, 30)];
        let view = build_time_slots(&slots, &HashMap::new(), 2);
        assert_eq!(view.len(), 2);
        assert!(view.iter().all(|s| s.current_count == 0 && s.available));
    }

    #[test]
    fn full_slot_is_unavailable() {
        let slots = vec![t(9, 0), t(9, 30)];
        let counts = HashMap::from([(t(9, 0), 2), (t(9, 30), 1)]);
        let view = build_time_slots(&slots, &counts, 2);
        assert_eq!(view[0], TimeSlot {
            time: "09:00".into(),
            available: false,
            current_count: 2,
            max_capacity: 2,
        });
        assert!(view[1].available);
        assert_eq!(view[1].current_count, 1);
    }

    #[test]
    fn reservations_off_the_grid_are_not_synthesized() {
        // A 09:10 reservation left over from an older schedule
        let slots = vec![t(9, 0), t(9, 30)];
        let counts = HashMap::from([(t(9, 10), 1)]);
        let view = build_time_slots(&slots, &counts, 1);
        assert_eq!(view.len(), 2);
        assert!(view.iter().all(|s| s.current_count == 0));
    }

    #[test]
    fn preserves_slot_order() {
        let slots = vec![t(9, 0), t(9, 30), t(10, 0)];
        let view = build_time_slots(&slots, &HashMap::new(), 1);
        let times: Vec<_> = view.iter().map(|s| s.time.as_str()).collect();
        assert_eq!(times, ["09:00", "09:30", "10:00"]);
    }
}
