// Job list data fetcher
//
// Every request gets an increasing sequence number. Only the most recently
// issued request may write results; anything that resolves after it has been
// superseded is dropped, whatever order the responses arrive in.

use std::future::Future;
use std::sync::Arc;

use crate::client::LogSource;
use crate::errors::FetchError;
use crate::models::{Job, LogPage};
use crate::query::LogQuery;
use crate::telemetry;

/// Tracks which request is allowed to settle
#[derive(Debug, Default)]
pub(crate) struct RequestSequence {
    issued: u64,
    in_flight: Option<u64>,
}

impl RequestSequence {
    pub(crate) fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.in_flight = Some(self.issued);
        self.issued
    }

    /// True when `seq` is the latest outstanding request; consumes it
    pub(crate) fn settle(&mut self, seq: u64) -> bool {
        if self.in_flight == Some(seq) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }
}

/// Lifecycle of the most recent request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Result of handing a completed request back to its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Latest request succeeded; results replaced
    Applied,
    /// Latest request failed; previous results kept, error set
    Failed,
    /// A newer request was issued; nothing changed
    Discarded,
}

/// Identifies one issued listing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    query: LogQuery,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &LogQuery {
        &self.query
    }
}

/// A finished listing request, ready to be applied
#[derive(Debug)]
pub struct FetchCompletion {
    pub ticket: FetchTicket,
    pub result: Result<LogPage, FetchError>,
}

/// JobListFetcher owns the current page of jobs and its load state
pub struct JobListFetcher {
    source: Arc<dyn LogSource>,
    sequence: RequestSequence,
    jobs: Vec<Job>,
    total: u64,
    phase: FetchPhase,
    error: Option<String>,
}

impl JobListFetcher {
    pub fn new(source: Arc<dyn LogSource>) -> Self {
        Self {
            source,
            sequence: RequestSequence::default(),
            jobs: Vec::new(),
            total: 0,
            phase: FetchPhase::Idle,
            error: None,
        }
    }

    /// Start a request; from here on older tickets are stale
    pub fn begin(&mut self, query: LogQuery) -> FetchTicket {
        let seq = self.sequence.issue();
        self.phase = FetchPhase::Loading;

        tracing::debug!(
            seq = seq,
            page = query.page,
            page_size = query.page_size,
            "Issuing log query"
        );

        FetchTicket { seq, query }
    }

    /// The network half of a request. Owns everything it needs, so the
    /// caller can spawn it and keep mutating the fetcher meanwhile.
    pub fn request(&self, ticket: FetchTicket) -> impl Future<Output = FetchCompletion> + Send + 'static {
        let source = Arc::clone(&self.source);
        async move {
            let result = source.fetch_logs(&ticket.query).await;
            FetchCompletion { ticket, result }
        }
    }

    /// Apply a completed request if it is still the latest one
    pub fn complete(&mut self, completion: FetchCompletion) -> FetchOutcome {
        let FetchCompletion { ticket, result } = completion;

        if !self.sequence.settle(ticket.seq) {
            telemetry::record_discarded();
            tracing::debug!(seq = ticket.seq, "Discarding superseded log response");
            return FetchOutcome::Discarded;
        }

        match result {
            Ok(page) => {
                self.jobs = page.logs;
                self.total = page.total_files;
                self.error = None;
                self.phase = FetchPhase::Loaded;
                FetchOutcome::Applied
            }
            Err(e) => {
                tracing::error!(
                    seq = ticket.seq,
                    page = ticket.query.page,
                    error = %e,
                    "Failed to fetch logs"
                );
                self.error = Some(e.user_message().to_string());
                self.phase = FetchPhase::Failed;
                FetchOutcome::Failed
            }
        }
    }

    /// Issue and await one request in place
    pub async fn fetch(&mut self, query: LogQuery) -> FetchOutcome {
        let ticket = self.begin(query);
        let completion = self.request(ticket).await;
        self.complete(completion)
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.sequence.is_pending()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
