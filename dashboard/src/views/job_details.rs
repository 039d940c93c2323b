// Job detail screen: summary card and operator table

use std::ops::Range;

use common::display::{
    dependencies_label, format_job_duration, format_operator_duration, format_timestamp,
    operator_status_label,
};
use common::job_detail::JobDetailView;
use common::models::{Job, JobStatus, Operator};

use super::{fit, window, Line, Screen, Span, Tone};
use crate::app::App;
use crate::keymap::help_line;

const ID_WIDTH: usize = 20;
const TYPE_WIDTH: usize = 16;
const DURATION_WIDTH: usize = 12;
const DEPENDENCIES_WIDTH: usize = 28;

pub fn render(app: &App, width: u16, height: u16) -> Screen {
    let mut screen = Screen::new(width, height);

    let Some(detail) = app.detail() else {
        screen.push(Line::styled("Loading job details...", Tone::Muted));
        screen.push(Line::styled(help_line(app.mode()), Tone::Muted));
        return screen;
    };

    // Breadcrumb and help stay pinned; the body scrolls between them
    screen.push(Line::new(vec![
        Span::new("Dashboard / ", Tone::Muted),
        Span::plain(detail.job_id()),
    ]));
    let room = height.saturating_sub(2) as usize;
    let (lines, selected) = body(detail, app.operator_cursor());
    for line in window(lines, selected, room) {
        screen.push(line);
    }
    screen.push(Line::styled(help_line(app.mode()), Tone::Muted));
    screen
}

/// Body lines plus the rows of the selected operator and its details
fn body(detail: &JobDetailView, cursor: usize) -> (Vec<Line>, Range<usize>) {
    if detail.is_loading() {
        return (vec![Line::styled("Loading job details...", Tone::Muted)], 0..0);
    }
    if let Some(error) = detail.error() {
        return (vec![Line::styled(error, Tone::Error)], 0..0);
    }
    let Some(job) = detail.job() else {
        return (vec![Line::styled("Loading job details...", Tone::Muted)], 0..0);
    };

    let mut lines = summary(job);
    lines.push(Line::blank());
    lines.push(Line::styled("Operator Details", Tone::Title));

    if job.operators.is_empty() {
        lines.push(Line::styled("No operators recorded.", Tone::Muted));
        return (lines, 0..0);
    }

    lines.push(Line::styled(
        format!(
            "  {}{}{}{}{}",
            fit("Operator ID", ID_WIDTH),
            fit("Type", TYPE_WIDTH),
            fit("Duration", DURATION_WIDTH),
            fit("Dependencies", DEPENDENCIES_WIDTH),
            "Status"
        ),
        Tone::Muted,
    ));

    let mut selected = 0..0;
    for (index, operator) in job.operators.iter().enumerate() {
        let start = lines.len();
        lines.push(operator_row(operator, index == cursor));
        if detail.is_expanded(&operator.operator_id) {
            lines.extend(operator_details(operator));
        }
        if index == cursor {
            selected = start..lines.len();
        }
    }
    (lines, selected)
}

fn summary(job: &Job) -> Vec<Line> {
    let status_tone = match job.status {
        JobStatus::Success => Tone::Success,
        JobStatus::Error => Tone::Error,
    };

    let mut lines = vec![
        Line::blank(),
        Line::styled(format!("Job {}", job.job_id), Tone::Title),
        Line::new(vec![
            Span::new("Start Time: ", Tone::Muted),
            Span::plain(format_timestamp(&job.start_time)),
            Span::new("   End Time: ", Tone::Muted),
            Span::plain(format_timestamp(&job.end_time)),
        ]),
        Line::new(vec![
            Span::new("Duration: ", Tone::Muted),
            Span::plain(format_job_duration(job.duration)),
            Span::new("   Executors: ", Tone::Muted),
            Span::plain(job.num_executors.to_string()),
            Span::new("   Status: ", Tone::Muted),
            Span::new(job.status.as_str(), status_tone),
        ]),
    ];

    if !job.errors.is_empty() {
        lines.push(Line::styled("Errors:", Tone::Muted));
        for error in &job.errors {
            lines.push(Line::styled(format!("  • {}", error), Tone::Error));
        }
    }
    lines
}

fn operator_row(operator: &Operator, selected: bool) -> Line {
    let status_tone = if operator.errors.is_empty() {
        Tone::Success
    } else {
        Tone::Error
    };

    Line::new(vec![
        Span::new(if selected { "> " } else { "  " }, Tone::Accent),
        Span::new(
            fit(&operator.operator_id, ID_WIDTH),
            if selected { Tone::Selected } else { Tone::Plain },
        ),
        Span::plain(fit(&operator.operator_type, TYPE_WIDTH)),
        Span::plain(fit(&format_operator_duration(operator.duration), DURATION_WIDTH)),
        Span::plain(fit(&dependencies_label(operator), DEPENDENCIES_WIDTH)),
        Span::new(operator_status_label(operator), status_tone),
    ])
}

fn operator_details(operator: &Operator) -> Vec<Line> {
    let mut lines = vec![Line::new(vec![
        Span::new("    Dependencies: ", Tone::Muted),
        Span::plain(dependencies_label(operator)),
    ])];

    if !operator.errors.is_empty() {
        lines.push(Line::styled("    Errors:", Tone::Muted));
        for error in &operator.errors {
            lines.push(Line::styled(format!("      • {}", error), Tone::Error));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use crate::app::tests::{app_with, app_with_jobs, drive, sample_job};
    use crate::app::Action;
    use crate::views::render;
    use common::models::Operator;
    use common::route::Route;
    use std::time::Instant;

    fn operator(index: usize) -> Operator {
        Operator {
            operator_id: format!("op-{index}"),
            operator_type: "Exchange".to_string(),
            duration: 0.5,
            dependencies: vec![],
            errors: if index == 19 {
                vec!["Shuffle fetch failed".to_string()]
            } else {
                vec![]
            },
        }
    }

    #[tokio::test]
    async fn test_renders_summary_and_operators() {
        let mut app = app_with(2, Route::JobDetail("job-1".to_string()));
        let effects = app.start();
        drive(&mut app, effects).await;

        let text = render(&app).text();
        assert!(text.contains("Dashboard / job-1"));
        assert!(text.contains("Job job-1"));
        assert!(text.contains("Executors: 4"));
        assert!(text.contains("Operator Details"));
        assert!(text.contains("1.25s"));
        assert!(text.contains("Aggregate"));
        assert!(!text.contains("Spill failed"), "details start collapsed");
    }

    #[tokio::test]
    async fn test_expanded_operator_lists_errors() {
        let mut app = app_with(2, Route::JobDetail("job-0".to_string()));
        let effects = app.start();
        drive(&mut app, effects).await;

        let now = Instant::now();
        app.handle(Action::MoveDown, now);
        app.handle(Action::ToggleExpand, now);

        let text = render(&app).text();
        assert!(text.contains("Dependencies: scan"));
        assert!(text.contains("• Spill failed"));
    }

    #[tokio::test]
    async fn test_operator_table_scrolls_with_cursor() {
        let mut job = sample_job("wide");
        job.operators = (0..20).map(operator).collect();
        let mut app = app_with_jobs(vec![job], Route::JobDetail("wide".to_string()), (100, 24));
        let effects = app.start();
        drive(&mut app, effects).await;

        let now = Instant::now();
        for _ in 0..19 {
            app.handle(Action::MoveDown, now);
        }
        assert_eq!(app.operator_cursor(), 19);
        app.handle(Action::ToggleExpand, now);

        let screen = render(&app);
        let text = screen.text();
        assert!(text.contains("> op-19"), "selected operator is not on screen");
        assert!(text.contains("• Shuffle fetch failed"));
        assert!(text.contains("Dashboard / wide"));
        assert_eq!(screen.lines().len(), 24);

        for _ in 0..19 {
            app.handle(Action::MoveUp, now);
        }
        let text = render(&app).text();
        assert!(text.contains("> op-0"));
        assert!(text.contains("Job wide"));
    }

    #[tokio::test]
    async fn test_unknown_job_shows_not_found() {
        let mut app = app_with(1, Route::JobDetail("ghost".to_string()));
        let effects = app.start();
        drive(&mut app, effects).await;

        let text = render(&app).text();
        assert!(text.contains("Job not found"));
    }

    #[test]
    fn test_loading_message_before_completion() {
        let mut app = app_with(1, Route::JobDetail("job-0".to_string()));
        let _effects = app.start();
        assert!(render(&app).text().contains("Loading job details..."));
    }
}
