// Job detail view model: one job by id, with its operator table

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use crate::client::LogSource;
use crate::errors::FetchError;
use crate::fetcher::{FetchOutcome, FetchPhase, RequestSequence};
use crate::models::Job;

/// Identifies one issued job lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailTicket {
    seq: u64,
    job_id: String,
}

impl DetailTicket {
    pub fn job_id(&self) -> &str {
        &self.job_id
    }
}

#[derive(Debug)]
pub struct DetailCompletion {
    pub ticket: DetailTicket,
    pub result: Result<Job, FetchError>,
}

pub struct JobDetailView {
    job_id: String,
    source: Arc<dyn LogSource>,
    sequence: RequestSequence,
    phase: FetchPhase,
    job: Option<Job>,
    error: Option<String>,
    expanded: HashSet<String>,
}

impl JobDetailView {
    pub fn new(source: Arc<dyn LogSource>, job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            source,
            sequence: RequestSequence::default(),
            phase: FetchPhase::Idle,
            job: None,
            error: None,
            expanded: HashSet::new(),
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn begin(&mut self) -> DetailTicket {
        let seq = self.sequence.issue();
        self.phase = FetchPhase::Loading;
        DetailTicket {
            seq,
            job_id: self.job_id.clone(),
        }
    }

    pub fn request(&self, ticket: DetailTicket) -> impl Future<Output = DetailCompletion> + Send + 'static {
        let source = Arc::clone(&self.source);
        async move {
            let result = source.fetch_job(&ticket.job_id).await;
            DetailCompletion { ticket, result }
        }
    }

    pub fn complete(&mut self, completion: DetailCompletion) -> FetchOutcome {
        let DetailCompletion { ticket, result } = completion;

        if ticket.job_id != self.job_id || !self.sequence.settle(ticket.seq) {
            return FetchOutcome::Discarded;
        }

        match result {
            Ok(job) => {
                for (operator, dependency) in job.dangling_dependencies() {
                    tracing::warn!(
                        job_id = %job.job_id,
                        operator_id = operator,
                        dependency = dependency,
                        "Operator depends on an unknown operator"
                    );
                }
                self.expanded
                    .retain(|id| job.operators.iter().any(|op| &op.operator_id == id));
                self.job = Some(job);
                self.error = None;
                self.phase = FetchPhase::Loaded;
                FetchOutcome::Applied
            }
            Err(e) => {
                tracing::error!(job_id = %self.job_id, error = %e, "Failed to fetch job");
                self.error = Some(e.user_message().to_string());
                self.phase = FetchPhase::Failed;
                FetchOutcome::Failed
            }
        }
    }

    /// Issue and await the lookup in place
    pub async fn load(&mut self) -> FetchOutcome {
        let ticket = self.begin();
        let completion = self.request(ticket).await;
        self.complete(completion)
    }

    /// Flip an operator's detail row; returns whether it is now expanded
    pub fn toggle_operator(&mut self, operator_id: &str) -> bool {
        if self.expanded.remove(operator_id) {
            false
        } else {
            self.expanded.insert(operator_id.to_string());
            true
        }
    }

    pub fn is_expanded(&self, operator_id: &str) -> bool {
        self.expanded.contains(operator_id)
    }

    pub fn job(&self) -> Option<&Job> {
        self.job.as_ref()
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
