//! Slot sequence generation
//!
//! Pure function of (opening, closing, stride). The closing time itself is
//! never an offerable slot start: the interval is `[open, close)`.

use chrono::{Duration, NaiveTime};

/// Generate the ordered slot starts for one business day.
///
/// Starts at `opening`, advances by `slot_duration` minutes, stops strictly
/// before `closing`. `opening >= closing` yields an empty sequence — a valid
/// degenerate configuration, not an error. A non-positive stride also yields
/// an empty sequence (the schedule validator rejects it upstream; this is
/// the no-infinite-loop guard).
pub fn generate_slots(opening: NaiveTime, closing: NaiveTime, slot_duration: i64) -> Vec<NaiveTime> {
    let mut slots = Vec::new();
    if slot_duration <= 0 {
        return slots;
    }

    let stride = Duration::minutes(slot_duration);
    let mut current = opening;
    while current < closing {
        slots.push(current);
        // NaiveTime arithmetic wraps at midnight; a wrap ends the day
        let (next, wrapped) = current.overflowing_add_signed(stride);
        if wrapped != 0 {
            break;
        }
        current = next;
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn generates_half_open_interval() {
        let slots = generate_slots(t(9, 0), t(10, 0), 30);
        assert_eq!(slots, vec![t(9, 0), t(9, 30)]);
    }

    #[test]
    fn closing_time_is_never_a_slot() {
        // 09:00-10:00 at 20min: 09:00, 09:20, 09:40 — 10:00 excluded
        let slots = generate_slots(t(9, 0), t(10, 0), 20);
        assert_eq!(slots, vec![t(9, 0), t(9, 20), t(9, 40)]);
    }

    #[test]
    fn last_slot_may_run_past_closing() {
        // Stride does not divide the window: the last start still lies before close
        let slots = generate_slots(t(9, 0), t(10, 0), 25);
        assert_eq!(slots, vec![t(9, 0), t(9, 25), t(9, 50)]);
    }

    #[test]
    fn strictly_increasing_within_window() {
        let slots = generate_slots(t(8, 15), t(17, 45), 15);
        assert!(slots.windows(2).all(|w| w[0] < w[1]));
        assert!(slots.iter().all(|s| *s >= t(8, 15) && *s < t(17, 45)));
        // ceil((17:45-08:15)/15min) = 38
        assert_eq!(slots.len(), 38);
    }

    #[test]
    fn degenerate_hours_yield_empty() {
        assert!(generate_slots(t(18, 0), t(9, 0), 30).is_empty());
        assert!(generate_slots(t(9, 0), t(9, 0), 30).is_empty());
    }

    #[test]
    fn zero_stride_yields_empty() {
        assert!(generate_slots(t(9, 0), t(18, 0), 0).is_empty());
    }

    #[test]
    fn late_closing_does_not_wrap_midnight() {
        let slots = generate_slots(t(23, 0), t(23, 59), 30);
        assert_eq!(slots, vec![t(23, 0), t(23, 30)]);
    }
}
