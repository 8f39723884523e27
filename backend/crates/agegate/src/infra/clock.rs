//! Clock implementations

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeDelta, Utc};

use crate::domain::repository::Clock;

/// Wall clock; "today" is the server-local calendar date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock frozen at one instant, for tests and replay
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    at: DateTime<Utc>,
}

impl FixedClock {
    pub fn at(at: DateTime<Utc>) -> Self {
        Self { at }
    }

    /// Noon UTC on the given date
    pub fn on(date: NaiveDate) -> Self {
        let noon = date.and_time(NaiveTime::MIN) + TimeDelta::hours(12);
        Self {
            at: noon.and_utc(),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.at
    }

    fn today(&self) -> NaiveDate {
        self.at.date_naive()
    }
}
