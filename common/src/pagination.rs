// Page arithmetic for the job list

use std::fmt;

/// Current position in a paginated listing.
/// Pages are 1-indexed; `total` is whatever the server last reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    page_size: u32,
    total: u64,
}

impl Pagination {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            total: 0,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// ceil(total / page_size); 0 when there is nothing to show
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.page_size))
    }

    /// First displayed position, (page - 1) * page_size + 1
    pub fn range_start(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size) + 1
    }

    /// Last displayed position, min(page * page_size, total)
    pub fn range_end(&self) -> u64 {
        (u64::from(self.page) * u64::from(self.page_size)).min(self.total)
    }

    /// "Newer" moves back toward page 1
    pub fn can_go_newer(&self) -> bool {
        self.page > 1
    }

    /// "Older" moves forward; disabled on the last page or when empty
    pub fn can_go_older(&self) -> bool {
        let total_pages = self.total_pages();
        total_pages != 0 && u64::from(self.page) < total_pages
    }

    /// Record the server's total. A page past the new end is pulled back to
    /// the last page; returns whether that happened.
    pub fn set_total(&mut self, total: u64) -> bool {
        self.total = total;
        let last = u32::try_from(self.total_pages().max(1)).unwrap_or(u32::MAX);
        if self.page > last {
            self.page = last;
            return true;
        }
        false
    }

    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size.max(1);
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Move to the previous page; returns the new page when it moved
    pub fn newer(&mut self) -> Option<u32> {
        if !self.can_go_newer() {
            return None;
        }
        self.page -= 1;
        Some(self.page)
    }

    /// Move to the next page; returns the new page when it moved
    pub fn older(&mut self) -> Option<u32> {
        if !self.can_go_older() {
            return None;
        }
        self.page += 1;
        Some(self.page)
    }

    /// Summary shown under the table, e.g. `11–20 of 25`
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Pagination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total == 0 {
            return write!(f, "0–0 of 0");
        }
        write!(
            f,
            "{}–{} of {}",
            self.range_start(),
            self.range_end(),
            self.total
        )
    }
}
