//! Report time window
//!
//! A window is one store date directory plus a minimum time of day. The
//! time filter is a plain string comparison on zero-padded `HH:MM:SS`, so a
//! `minutes_ago` window reaching back past midnight only covers the part of
//! it that falls on the current date.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::layout::{RecordLocator, DATE_FORMAT};

/// Minimum time of day when reporting a whole day
pub const START_OF_DAY: &str = "00:00:00";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    /// Date directory to scan
    pub date: NaiveDate,
    /// Records earlier than this `HH:MM:SS` are left out
    pub min_time: String,
}

impl TimeWindow {
    /// Resolve the window relative to `now`
    ///
    /// - `minutes_ago = N`: the date of `now - N minutes`, from `HH:MM:00`
    ///   of that instant (`date` is ignored)
    /// - otherwise: `date`, or yesterday, from `00:00:00`
    pub fn resolve(date: Option<NaiveDate>, minutes_ago: Option<u32>, now: NaiveDateTime) -> Self {
        match minutes_ago {
            Some(minutes) => {
                let since = now - Duration::minutes(i64::from(minutes));
                Self {
                    date: since.date(),
                    min_time: since.format("%H:%M:00").to_string(),
                }
            }
            None => Self {
                date: date.unwrap_or_else(|| (now - Duration::hours(24)).date()),
                min_time: START_OF_DAY.to_string(),
            },
        }
    }

    /// Date directory name (`YYYY-MM-DD`)
    pub fn date_dir(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// Lexical `HH:MM:SS` comparison
    pub fn admits_time(&self, time_of_day: &str) -> bool {
        time_of_day >= self.min_time.as_str()
    }

    pub fn admits(&self, record: &RecordLocator) -> bool {
        self.admits_time(&record.time_of_day)
    }
}
