// Job list view model
//
// Ties filters, debounce, page size and the fetcher together and decides
// when a query goes out. Methods that need a request return a ticket; the
// caller runs `request(ticket)` and feeds the completion back in.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::client::LogSource;
use crate::config::DashboardConfig;
use crate::debounce::Debouncer;
use crate::fetcher::{FetchCompletion, FetchOutcome, FetchPhase, FetchTicket, JobListFetcher};
use crate::filters::{DateRange, FilterState, Filters, StatusFilter};
use crate::models::Job;
use crate::page_size::PageSizeEstimator;
use crate::pagination::Pagination;
use crate::query::LogQuery;

/// Rows per page until the first viewport measurement arrives
pub const DEFAULT_PAGE_SIZE: u32 = 10;

pub struct JobListView {
    filters: FilterState,
    debouncer: Debouncer<Filters>,
    /// Filters of the most recently issued query
    applied: Filters,
    pagination: Pagination,
    estimator: PageSizeEstimator,
    fetcher: JobListFetcher,
    expanded: HashSet<String>,
    mounted: bool,
    /// The last response showed a page past the end of the listing
    page_overrun: bool,
}

impl JobListView {
    pub fn new(source: Arc<dyn LogSource>, config: &DashboardConfig) -> Self {
        Self::with_debounce(source, config.debounce_delay(), config.row_height, config.reserved_rows)
    }

    pub fn with_debounce(
        source: Arc<dyn LogSource>,
        debounce: Duration,
        row_height: u16,
        reserved_rows: u16,
    ) -> Self {
        Self {
            filters: FilterState::new(),
            debouncer: Debouncer::new(Filters::default(), debounce),
            applied: Filters::default(),
            pagination: Pagination::new(DEFAULT_PAGE_SIZE),
            estimator: PageSizeEstimator::new(row_height, reserved_rows),
            fetcher: JobListFetcher::new(source),
            expanded: HashSet::new(),
            mounted: false,
            page_overrun: false,
        }
    }

    // ------------------------------------------------------------------
    // Triggers
    // ------------------------------------------------------------------

    /// First load: page 1 with whatever filters are set
    pub fn mount(&mut self) -> FetchTicket {
        self.mounted = true;
        self.debouncer.cancel();
        self.applied = self.filters.snapshot();
        self.pagination.reset();
        self.issue()
    }

    /// Settle debounced filters; a new combination restarts at page 1
    pub fn poll(&mut self, now: Instant) -> Option<FetchTicket> {
        let settled = self.debouncer.poll(now)?;
        if !self.mounted || settled == self.applied {
            return None;
        }

        tracing::debug!(
            search = %settled.search,
            status = %settled.status,
            "Filters settled"
        );
        self.applied = settled;
        self.pagination.reset();
        Some(self.issue())
    }

    /// When `poll` next has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Previous page, when there is one
    pub fn newer(&mut self) -> Option<FetchTicket> {
        self.pagination.newer()?;
        Some(self.issue())
    }

    /// Next page, when there is one
    pub fn older(&mut self) -> Option<FetchTicket> {
        self.pagination.older()?;
        Some(self.issue())
    }

    /// Back to page 1 with the filters already in effect
    pub fn refresh(&mut self) -> FetchTicket {
        self.pagination.reset();
        self.issue()
    }

    /// Re-issue the current page unchanged
    pub fn reload(&mut self) -> FetchTicket {
        self.issue()
    }

    /// New viewport height. A different page size moves page boundaries,
    /// so the list restarts at page 1.
    pub fn resize(&mut self, viewport_height: u16) -> Option<FetchTicket> {
        let rows = self.estimator.observe(viewport_height)?;
        let rows = u32::try_from(rows).unwrap_or(u32::MAX);
        if rows == self.pagination.page_size() {
            return None;
        }

        self.pagination.set_page_size(rows);
        if !self.mounted {
            return None;
        }
        self.pagination.reset();
        Some(self.issue())
    }

    /// Re-request the clamped page after the listing shrank under the
    /// current one. Call after `complete`.
    pub fn follow_up(&mut self) -> Option<FetchTicket> {
        if !std::mem::take(&mut self.page_overrun) {
            return None;
        }
        Some(self.issue())
    }

    // ------------------------------------------------------------------
    // Filter edits
    // ------------------------------------------------------------------

    pub fn set_search(&mut self, search: impl Into<String>, now: Instant) {
        self.filters.set_search(search);
        self.filters_changed(now);
    }

    pub fn set_status(&mut self, status: StatusFilter, now: Instant) {
        self.filters.set_status(status);
        self.filters_changed(now);
    }

    pub fn set_date_range(&mut self, range: DateRange, now: Instant) {
        self.filters.set_date_range(range);
        self.filters_changed(now);
    }

    pub fn clear_filters(&mut self, now: Instant) {
        self.filters.clear();
        self.filters_changed(now);
    }

    fn filters_changed(&mut self, now: Instant) {
        self.debouncer.set(self.filters.snapshot(), now);
    }

    // ------------------------------------------------------------------
    // Requests
    // ------------------------------------------------------------------

    fn issue(&mut self) -> FetchTicket {
        self.page_overrun = false;
        let query = LogQuery::new(
            self.pagination.page(),
            self.pagination.page_size(),
            self.applied.clone(),
        );
        self.fetcher.begin(query)
    }

    pub fn request(&self, ticket: FetchTicket) -> impl Future<Output = FetchCompletion> + Send + 'static {
        self.fetcher.request(ticket)
    }

    pub fn complete(&mut self, completion: FetchCompletion) -> FetchOutcome {
        let outcome = self.fetcher.complete(completion);
        if outcome == FetchOutcome::Applied {
            if self.pagination.set_total(self.fetcher.total()) {
                tracing::debug!(
                    page = self.pagination.page(),
                    total = self.pagination.total(),
                    "Listing shrank below the current page"
                );
                self.page_overrun = true;
            }
            let visible: HashSet<&str> = self
                .fetcher
                .jobs()
                .iter()
                .map(|job| job.job_id.as_str())
                .collect();
            self.expanded.retain(|id| visible.contains(id.as_str()));
        }
        outcome
    }

    // ------------------------------------------------------------------
    // Expanded rows
    // ------------------------------------------------------------------

    /// Flip a row open or closed; returns whether it is now expanded
    pub fn toggle_expanded(&mut self, job_id: &str) -> bool {
        if self.expanded.remove(job_id) {
            false
        } else {
            self.expanded.insert(job_id.to_string());
            true
        }
    }

    pub fn is_expanded(&self, job_id: &str) -> bool {
        self.expanded.contains(job_id)
    }

    // ------------------------------------------------------------------
    // Read access for rendering
    // ------------------------------------------------------------------

    pub fn jobs(&self) -> &[Job] {
        self.fetcher.jobs()
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn applied_filters(&self) -> &Filters {
        &self.applied
    }

    pub fn is_loading(&self) -> bool {
        self.fetcher.is_loading()
    }

    pub fn phase(&self) -> FetchPhase {
        self.fetcher.phase()
    }

    pub fn error(&self) -> Option<&str> {
        self.fetcher.error()
    }
}
