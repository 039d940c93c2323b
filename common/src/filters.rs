// Job list filter state: free-text search, status and date range

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::FilterError;

/// Status filter; `All` means the server is not asked to filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Success,
    Error,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Success => "success",
            StatusFilter::Error => "error",
        }
    }

    /// Value for the `status` query parameter, if any
    pub fn query_value(&self) -> Option<&'static str> {
        match self {
            StatusFilter::All => None,
            other => Some(other.as_str()),
        }
    }

    /// All → Success → Error → All
    pub fn cycle(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Success,
            StatusFilter::Success => StatusFilter::Error,
            StatusFilter::Error => StatusFilter::All,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(StatusFilter::All),
            "success" => Ok(StatusFilter::Success),
            "error" => Ok(StatusFilter::Error),
            other => Err(FilterError::InvalidStatus(other.to_string())),
        }
    }
}

/// Optional date bounds; a missing side is unbounded.
/// start <= end is not enforced here, the server decides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Parse `YYYY-MM-DD..YYYY-MM-DD`; either side may be left empty.
    /// Each date resolves to local midnight, the way a calendar picker does.
    pub fn parse(input: &str) -> Result<Self, FilterError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Self::default());
        }

        let (start, end) = match input.split_once("..") {
            Some((start, end)) => (start.trim(), end.trim()),
            None => (input, ""),
        };

        Ok(Self {
            start: parse_day(start)?,
            end: parse_day(end)?,
        })
    }
}

fn parse_day(input: &str) -> Result<Option<DateTime<Utc>>, FilterError> {
    if input.is_empty() {
        return Ok(None);
    }

    let invalid = || FilterError::InvalidDate {
        input: input.to_string(),
    };

    let day = NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| invalid())?;
    let midnight = day.and_hms_opt(0, 0, 0).ok_or_else(invalid)?;
    let local = Local
        .from_local_datetime(&midnight)
        .earliest()
        .ok_or_else(invalid)?;

    Ok(Some(local.with_timezone(&Utc)))
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let day = |d: &Option<DateTime<Utc>>| {
            d.map(|d| d.with_timezone(&Local).format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        };

        if self.is_unbounded() {
            f.write_str("Any date")
        } else {
            write!(f, "{}..{}", day(&self.start), day(&self.end))
        }
    }
}

/// Snapshot of the three filters, compared to decide when to re-query
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Filters {
    pub search: String,
    pub status: StatusFilter,
    pub date_range: DateRange,
}

impl Filters {
    /// Search term to send, if any
    pub fn search_term(&self) -> Option<&str> {
        let term = self.search.trim();
        (!term.is_empty()).then_some(term)
    }

    pub fn is_cleared(&self) -> bool {
        self == &Filters::default()
    }
}

/// FilterState holds the live filter values the user is editing
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    current: Filters,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(&self) -> &str {
        &self.current.search
    }

    pub fn status(&self) -> StatusFilter {
        self.current.status
    }

    pub fn date_range(&self) -> DateRange {
        self.current.date_range
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.current.search = search.into();
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.current.status = status;
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.current.date_range = range;
    }

    /// Reset search, status and date range in one step
    pub fn clear(&mut self) {
        self.current = Filters::default();
    }

    pub fn snapshot(&self) -> Filters {
        self.current.clone()
    }
}
