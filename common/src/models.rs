use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

// ============================================================================
// Job Models
// ============================================================================

/// Job is one Spark application execution record as served by `/logs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(alias = "id")]
    pub job_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Total job duration in seconds
    pub duration: f64,
    pub num_executors: u32,
    pub status: JobStatus,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub operators: Vec<Operator>,
}

/// JobStatus is the completion status reported by the log service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Success,
    Error,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Success => "success",
            JobStatus::Error => "error",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator is one stage of a job's execution plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operator {
    pub operator_id: String,
    pub operator_type: String,
    /// Execution time in seconds
    pub duration: f64,
    /// Ids of sibling operators this one depends on
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl Operator {
    /// Operators carry no status field; any error marks them failed
    pub fn status(&self) -> JobStatus {
        if self.errors.is_empty() {
            JobStatus::Success
        } else {
            JobStatus::Error
        }
    }
}

impl Job {
    /// Dependencies that do not name a sibling operator, as (operator, dependency)
    pub fn dangling_dependencies(&self) -> Vec<(&str, &str)> {
        let known: HashSet<&str> = self
            .operators
            .iter()
            .map(|op| op.operator_id.as_str())
            .collect();

        self.operators
            .iter()
            .flat_map(|op| {
                op.dependencies
                    .iter()
                    .filter(|dep| !known.contains(dep.as_str()))
                    .map(move |dep| (op.operator_id.as_str(), dep.as_str()))
            })
            .collect()
    }

    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }
}

// ============================================================================
// Response Models
// ============================================================================

/// LogPage is one page of the `/logs` listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogPage {
    pub logs: Vec<Job>,
    /// Number of jobs matching the filters across all pages
    pub total_files: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl LogPage {
    pub fn empty() -> Self {
        Self {
            logs: Vec::new(),
            total_files: 0,
            page: None,
            page_size: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operator(id: &str, deps: &[&str], errors: &[&str]) -> Operator {
        Operator {
            operator_id: id.to_string(),
            operator_type: "Read".to_string(),
            duration: 1.0,
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
            errors: errors.iter().map(|e| e.to_string()).collect(),
        }
    }

    #[test]
    fn test_job_deserializes_camel_case() {
        let raw = serde_json::json!({
            "jobId": "job-1",
            "startTime": "2024-03-01T10:00:00Z",
            "endTime": "2024-03-01T10:05:00Z",
            "duration": 300,
            "numExecutors": 4,
            "status": "error",
            "errors": ["OOM"],
            "operators": [{
                "operatorId": "op-1",
                "operatorType": "Sort",
                "duration": 12.5,
                "dependencies": [],
                "errors": []
            }]
        });

        let job: Job = serde_json::from_value(raw).unwrap();
        assert_eq!(job.job_id, "job-1");
        assert_eq!(job.status, JobStatus::Error);
        assert_eq!(job.num_executors, 4);
        assert_eq!(job.operators.len(), 1);
        assert_eq!(job.first_error(), Some("OOM"));
    }

    #[test]
    fn test_job_accepts_id_alias_and_missing_lists() {
        let raw = serde_json::json!({
            "id": "job-2",
            "startTime": "2024-03-01T10:00:00Z",
            "endTime": "2024-03-01T10:00:10Z",
            "duration": 10,
            "numExecutors": 1,
            "status": "success"
        });

        let job: Job = serde_json::from_value(raw).unwrap();
        assert_eq!(job.job_id, "job-2");
        assert!(job.errors.is_empty());
        assert!(job.operators.is_empty());
        assert_eq!(job.first_error(), None);
    }

    #[test]
    fn test_job_rejects_unknown_status() {
        let raw = serde_json::json!({
            "jobId": "job-3",
            "startTime": "2024-03-01T10:00:00Z",
            "endTime": "2024-03-01T10:00:10Z",
            "duration": 10,
            "numExecutors": 1,
            "status": "running"
        });

        assert!(serde_json::from_value::<Job>(raw).is_err());
    }

    #[test]
    fn test_operator_status_follows_errors() {
        assert_eq!(operator("a", &[], &[]).status(), JobStatus::Success);
        assert_eq!(operator("a", &[], &["boom"]).status(), JobStatus::Error);
    }

    #[test]
    fn test_dangling_dependencies() {
        let job = Job {
            job_id: "job".to_string(),
            start_time: Utc::now(),
            end_time: Utc::now(),
            duration: 1.0,
            num_executors: 1,
            status: JobStatus::Success,
            errors: vec![],
            operators: vec![operator("a", &[], &[]), operator("b", &["a", "zz"], &[])],
        };

        assert_eq!(job.dangling_dependencies(), vec![("b", "zz")]);
    }

    #[test]
    fn test_log_page_optional_echo_fields() {
        let raw = serde_json::json!({ "logs": [], "totalFiles": 0 });
        let page: LogPage = serde_json::from_value(raw).unwrap();
        assert_eq!(page, LogPage::empty());
    }
}
