//! Denormalized per-parent show rosters and counters.

use crate::domain::ShowSlot;

/// The past/upcoming lists and counters carried by one Venue or Artist.
/// Mutated only at show-creation time; never re-derived afterward.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowRoster {
    pub past_shows: Vec<String>,
    pub upcoming_shows: Vec<String>,
    pub past_shows_count: i64,
    pub upcoming_shows_count: i64,
}

impl ShowRoster {
    /// Append `show_id` to the slot's list and bump its counter.
    /// Not idempotent: recording the same id twice keeps both entries.
    pub fn record(&mut self, show_id: &str, slot: ShowSlot) {
        match slot {
            ShowSlot::Past => {
                self.past_shows.push(show_id.to_string());
                self.past_shows_count += 1;
            }
            ShowSlot::Upcoming => {
                self.upcoming_shows.push(show_id.to_string());
                self.upcoming_shows_count += 1;
            }
        }
    }

    /// Counters must equal list lengths on both sides.
    pub fn counts_consistent(&self) -> bool {
        self.past_shows_count == self.past_shows.len() as i64
            && self.upcoming_shows_count == self.upcoming_shows.len() as i64
    }
}
