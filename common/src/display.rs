// Display formatting shared by the job list and job detail views

use chrono::{DateTime, Local, Utc};

use crate::models::{Job, JobStatus, Operator};

/// Job duration as `{minutes}m {seconds}s`
pub fn format_job_duration(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0).floor();
    let remaining = seconds % 60.0;
    format!("{}m {}s", minutes as u64, remaining)
}

/// Operator duration with two decimals, e.g. `12.50s`
pub fn format_operator_duration(seconds: f64) -> String {
    format!("{:.2}s", seconds)
}

/// Timestamp in the viewer's local time, e.g. `01 Mar 2024, 10:00:00`
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local)
        .format("%d %b %Y, %H:%M:%S")
        .to_string()
}

pub fn first_error_label(job: &Job) -> &str {
    job.first_error().unwrap_or("None")
}

pub fn dependencies_label(operator: &Operator) -> String {
    if operator.dependencies.is_empty() {
        "None".to_string()
    } else {
        operator.dependencies.join(", ")
    }
}

pub fn operator_status_label(operator: &Operator) -> &'static str {
    match operator.status() {
        JobStatus::Success => "Success",
        JobStatus::Error => "Error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn operator(deps: &[&str], errors: &[&str]) -> Operator {
        Operator {
            operator_id: "op".to_string(),
            operator_type: "Join".to_string(),
            duration: 3.14159,
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
            errors: errors.iter().map(|e| e.to_string()).collect(),
        }
    }

    #[test]
    fn test_format_job_duration() {
        assert_eq!(format_job_duration(0.0), "0m 0s");
        assert_eq!(format_job_duration(59.0), "0m 59s");
        assert_eq!(format_job_duration(125.0), "2m 5s");
        assert_eq!(format_job_duration(61.5), "1m 1.5s");
    }

    #[test]
    fn test_format_operator_duration() {
        assert_eq!(format_operator_duration(3.14159), "3.14s");
        assert_eq!(format_operator_duration(12.5), "12.50s");
    }

    #[test]
    fn test_dependencies_label() {
        assert_eq!(dependencies_label(&operator(&[], &[])), "None");
        assert_eq!(dependencies_label(&operator(&["a", "b"], &[])), "a, b");
    }

    #[test]
    fn test_operator_status_label() {
        assert_eq!(operator_status_label(&operator(&[], &[])), "Success");
        assert_eq!(operator_status_label(&operator(&[], &["boom"])), "Error");
    }

    #[test]
    fn test_format_timestamp_shape() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let formatted = format_timestamp(&at);
        assert!(formatted.contains("2024"));
        assert_eq!(formatted.len(), "01 Mar 2024, 10:00:00".len());
    }
}
