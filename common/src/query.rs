// Query parameters for `GET /logs`

use chrono::{DateTime, SecondsFormat, Utc};

use crate::filters::Filters;

/// Name of the page-size parameter; the log service contract uses `pageSize`
pub const PAGE_SIZE_PARAM: &str = "pageSize";

/// One paginated, filtered listing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    pub page: u32,
    pub page_size: u32,
    pub filters: Filters,
}

impl LogQuery {
    pub fn new(page: u32, page_size: u32, filters: Filters) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
            filters,
        }
    }

    /// Serialize into query pairs, leaving out filters that are not set
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            (PAGE_SIZE_PARAM, self.page_size.to_string()),
        ];

        if let Some(search) = self.filters.search_term() {
            params.push(("search", search.to_string()));
        }
        if let Some(status) = self.filters.status.query_value() {
            params.push(("status", status.to_string()));
        }
        if let Some(start) = self.filters.date_range.start {
            params.push(("startDate", iso_timestamp(&start)));
        }
        if let Some(end) = self.filters.date_range.end {
            params.push(("endDate", iso_timestamp(&end)));
        }

        params
    }
}

/// ISO-8601 in UTC with millisecond precision, e.g. `2024-01-01T00:00:00.000Z`
pub fn iso_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
