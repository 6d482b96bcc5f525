//! Domain rules: slot classification, time source, rosters.

mod clock;
mod roster;
mod schedule;

pub use clock::{Clock, FixedClock, SystemClock};
pub use roster::ShowRoster;
pub use schedule::ShowSlot;
