// Job list screen: filters, job table, pagination footer

use common::display::{first_error_label, format_job_duration, format_timestamp};
use common::models::{Job, JobStatus};

use super::{fit, window, Line, Screen, Span, Tone};
use crate::app::{App, Focus, Mode};
use crate::keymap::help_line;

/// Lines outside the table body: title, filters, notice, spacer, header,
/// footer, help
pub const CHROME_ROWS: u16 = 7;

const MARKER_WIDTH: usize = 2;
const ID_WIDTH: usize = 24;
const START_WIDTH: usize = 23;
const DURATION_WIDTH: usize = 12;
const EXECUTORS_WIDTH: usize = 10;
const STATUS_WIDTH: usize = 9;
const MIN_ERRORS_WIDTH: usize = 10;

pub fn render(app: &App, width: u16, height: u16) -> Screen {
    let mut screen = Screen::new(width, height);
    let list = app.list();

    screen.push(Line::styled("Spark Job Dashboard", Tone::Title));
    screen.push(filter_line(app));
    screen.push(match app.notice() {
        Some(notice) => Line::styled(notice, Tone::Error),
        None => Line::blank(),
    });
    screen.push(Line::blank());

    let body_height = height.saturating_sub(CHROME_ROWS) as usize;
    let mut body = Vec::new();
    // Body lines of the selected row and its expansion
    let mut selected = 0..0;

    if list.is_loading() {
        screen.push(Line::blank());
        body.push(Line::styled("Loading jobs…", Tone::Muted));
    } else if let Some(error) = list.error() {
        screen.push(Line::blank());
        body.push(Line::styled(error, Tone::Error));
    } else {
        screen.push(header_line(width as usize));
        if list.jobs().is_empty() {
            body.push(Line::styled("No Spark job logs available.", Tone::Muted));
        }
        for (index, job) in list.jobs().iter().enumerate() {
            let start = body.len();
            body.push(job_row(job, index == app.cursor(), width as usize));
            if list.is_expanded(&job.job_id) {
                body.extend(expanded_rows(job));
            }
            if index == app.cursor() {
                selected = start..body.len();
            }
        }
    }

    for line in window(body, selected, body_height) {
        screen.push(line);
    }

    screen.push(footer_line(app));
    screen.push(Line::styled(help_line(app.mode()), Tone::Muted));
    screen
}

fn filter_line(app: &App) -> Line {
    let filters = app.list().filters();
    let mode = app.mode();
    let caret = |focus: Focus| if mode == Mode::List(focus) { "▏" } else { "" };
    let tone = |focus: Focus| {
        if mode == Mode::List(focus) {
            Tone::Accent
        } else {
            Tone::Plain
        }
    };

    let dates = if mode == Mode::List(Focus::DateRange) {
        app.date_input().to_string()
    } else {
        filters.date_range().to_string()
    };

    Line::new(vec![
        Span::new("Search: ", Tone::Muted),
        Span::new(
            format!("{}{}", filters.search(), caret(Focus::Search)),
            tone(Focus::Search),
        ),
        Span::new("   Status: ", Tone::Muted),
        Span::plain(filters.status().as_str()),
        Span::new("   Dates: ", Tone::Muted),
        Span::new(
            format!("{}{}", dates, caret(Focus::DateRange)),
            tone(Focus::DateRange),
        ),
    ])
}

fn errors_width(width: usize) -> usize {
    let fixed =
        MARKER_WIDTH + ID_WIDTH + START_WIDTH + DURATION_WIDTH + EXECUTORS_WIDTH + STATUS_WIDTH;
    width.saturating_sub(fixed).max(MIN_ERRORS_WIDTH)
}

fn header_line(width: usize) -> Line {
    let text = format!(
        "{}{}{}{}{}{}{}",
        fit("", MARKER_WIDTH),
        fit("Job ID", ID_WIDTH),
        fit("Start Time", START_WIDTH),
        fit("Duration", DURATION_WIDTH),
        fit("Executors", EXECUTORS_WIDTH),
        fit("Status", STATUS_WIDTH),
        fit("Errors", errors_width(width)),
    );
    Line::styled(text, Tone::Muted)
}

fn job_row(job: &Job, selected: bool, width: usize) -> Line {
    let status_tone = match job.status {
        JobStatus::Success => Tone::Success,
        JobStatus::Error => Tone::Error,
    };

    Line::new(vec![
        Span::new(if selected { "> " } else { "  " }, Tone::Accent),
        Span::new(
            fit(&job.job_id, ID_WIDTH),
            if selected { Tone::Selected } else { Tone::Plain },
        ),
        Span::plain(fit(&format_timestamp(&job.start_time), START_WIDTH)),
        Span::plain(fit(&format_job_duration(job.duration), DURATION_WIDTH)),
        Span::plain(fit(&job.num_executors.to_string(), EXECUTORS_WIDTH)),
        Span::new(fit(job.status.as_str(), STATUS_WIDTH), status_tone),
        Span::plain(fit(first_error_label(job), errors_width(width))),
    ])
}

fn expanded_rows(job: &Job) -> Vec<Line> {
    let mut rows = vec![Line::new(vec![
        Span::new("    End Time: ", Tone::Muted),
        Span::plain(format_timestamp(&job.end_time)),
        Span::new("   Operators: ", Tone::Muted),
        Span::plain(job.operators.len().to_string()),
    ])];

    if job.errors.is_empty() {
        rows.push(Line::styled("    No errors", Tone::Muted));
    }
    for error in &job.errors {
        rows.push(Line::styled(format!("    • {}", error), Tone::Error));
    }
    rows
}

fn footer_line(app: &App) -> Line {
    let pagination = app.list().pagination();
    let nav_tone = |enabled: bool| if enabled { Tone::Plain } else { Tone::Muted };

    Line::new(vec![
        Span::new(format!("Showing {} jobs   ", pagination), Tone::Muted),
        Span::new("‹ Newer", nav_tone(pagination.can_go_newer())),
        Span::plain("  "),
        Span::new("Older ›", nav_tone(pagination.can_go_older())),
        Span::plain("  "),
        Span::plain("Refresh"),
    ])
}
