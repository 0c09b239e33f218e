//! Search time windows and free-form date parsing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::debug;

use crate::error::{Error, Result};

/// Timestamp format accepted by the v2 recent search endpoint.
pub const RECENT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Timestamp format accepted by the premium 30-day and full-archive endpoints.
pub const PREMIUM_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M";

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%B %d, %Y %H:%M",
    "%b %d, %Y %H:%M",
    "%Y%m%d%H%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%Y%m%d",
];

/// Parses a human-written date or date-time into a UTC timestamp.
///
/// RFC 3339 input keeps its offset; anything without an offset is read as
/// UTC, and a bare date means midnight.
pub fn parse_date_text(input: &str) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            debug!("Parsed date {:?} with format {}", trimmed, format);
            return Ok(naive.and_utc());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            debug!("Parsed date {:?} with format {}", trimmed, format);
            if let Some(naive) = date.and_hms_opt(0, 0, 0) {
                return Ok(naive.and_utc());
            }
        }
    }

    Err(Error::InvalidDate {
        input: input.to_string(),
    })
}

/// Optional start/end bounds of a search. Either side may be open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl SearchWindow {
    /// Creates a window from already-parsed bounds.
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Builds a window from free-form text bounds.
    ///
    /// # Parameters
    ///
    /// - `start`: Earliest tweet time, e.g. `2022-03-01` or `March 1, 2022 14:00`
    /// - `end`: Latest tweet time, in any format [`parse_date_text`] accepts
    ///
    /// # Returns
    ///
    /// - `Ok(SearchWindow)`: Absent bounds stay open
    /// - `Err(Error::InvalidDate)`: If either bound cannot be parsed
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        Ok(Self {
            start: start.map(parse_date_text).transpose()?,
            end: end.map(parse_date_text).transpose()?,
        })
    }

    /// Returns `true` if neither bound is set.
    pub fn is_open(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// `start_time` / `end_time` query parameters for the v2 recent search.
    pub fn recent_params(&self) -> Vec<(&'static str, String)> {
        self.params("start_time", "end_time", RECENT_TIMESTAMP_FORMAT)
    }

    /// `fromDate` / `toDate` query parameters for the premium searches.
    pub fn premium_params(&self) -> Vec<(&'static str, String)> {
        self.params("fromDate", "toDate", PREMIUM_TIMESTAMP_FORMAT)
    }

    fn params(
        &self,
        start_key: &'static str,
        end_key: &'static str,
        format: &str,
    ) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(2);
        if let Some(start) = self.start {
            params.push((start_key, start.format(format).to_string()));
        }
        if let Some(end) = self.end {
            params.push((end_key, end.format(format).to_string()));
        }
        params
    }
}
