//! TimeSlot projection

use serde::{Deserialize, Serialize};

/// Derived availability of one bookable slot — never persisted.
///
/// Produced by merging the generated slot sequence with the current
/// non-cancelled reservation counts for a (shop, date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Slot start, `HH:MM`
    pub time: String,
    pub available: bool,
    pub current_count: i64,
    pub max_capacity: i64,
}
