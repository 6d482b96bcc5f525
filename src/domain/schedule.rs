//! Show slot classification: past vs upcoming, date-only.

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShowSlot {
    Past,
    Upcoming,
}

impl ShowSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Past => "past",
            Self::Upcoming => "upcoming",
        }
    }

    /// Classify a show date against the reference date. Time of day never
    /// affects the slot, and a show on `today` itself counts as upcoming.
    pub fn classify(start_date: NaiveDate, today: NaiveDate) -> Self {
        if start_date < today {
            Self::Past
        } else {
            Self::Upcoming
        }
    }
}
