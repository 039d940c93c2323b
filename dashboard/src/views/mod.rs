// Screen rendering
//
// Views build a `Screen` of styled lines without touching the terminal;
// `draw` writes it out with crossterm.

pub mod job_details;
pub mod jobs_list;

use std::io::{self, Write};
use std::ops::Range;

use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, queue};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::App;
use common::route::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Title,
    Muted,
    Accent,
    Success,
    Error,
    Selected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub tone: Tone,
}

impl Span {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Plain)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    pub fn styled(text: impl Into<String>, tone: Tone) -> Self {
        Self::new(vec![Span::new(text, tone)])
    }

    pub fn blank() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// One frame of output, clipped to the viewport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    width: u16,
    height: u16,
    lines: Vec<Line>,
}

impl Screen {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            lines: Vec::new(),
        }
    }

    pub fn push(&mut self, line: Line) {
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    /// Plain text of every line
    #[cfg(test)]
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(Line::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Build the frame for whichever view the app is on
pub fn render(app: &App) -> Screen {
    let (width, height) = app.viewport();
    match app.route() {
        Route::JobList => jobs_list::render(app, width, height),
        Route::JobDetail(_) => job_details::render(app, width, height),
    }
}

/// Exactly `height` rows of `lines`, scrolled as little as possible so the
/// `focus` rows stay on screen. When the focus is taller than the window its
/// first row wins.
pub fn window(lines: Vec<Line>, focus: Range<usize>, height: usize) -> Vec<Line> {
    let offset = focus.end.saturating_sub(height).min(focus.start);
    let mut visible: Vec<Line> = lines.into_iter().skip(offset).take(height).collect();
    visible.resize(height, Line::blank());
    visible
}

/// Pad or truncate `text` to exactly `width` terminal columns
pub fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        let mut out = text.to_string();
        out.push_str(&" ".repeat(width - text.width()));
        return out;
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

fn color_of(tone: Tone) -> Option<Color> {
    match tone {
        Tone::Plain | Tone::Selected => None,
        Tone::Title => Some(Color::Cyan),
        Tone::Muted => Some(Color::DarkGrey),
        Tone::Accent => Some(Color::Yellow),
        Tone::Success => Some(Color::Green),
        Tone::Error => Some(Color::Red),
    }
}

/// Write a frame, clearing every row the frame does not cover
pub fn draw<W: Write>(screen: &Screen, out: &mut W) -> io::Result<()> {
    let width = screen.width() as usize;

    for row in 0..screen.height() {
        queue!(out, cursor::MoveTo(0, row), Clear(ClearType::CurrentLine))?;
        let Some(line) = screen.lines().get(row as usize) else {
            continue;
        };

        let mut remaining = width;
        for span in &line.spans {
            if remaining == 0 {
                break;
            }
            let text = if span.text.width() > remaining {
                fit(&span.text, remaining)
            } else {
                span.text.clone()
            };
            remaining = remaining.saturating_sub(text.width());

            if span.tone == Tone::Selected {
                queue!(out, SetAttribute(Attribute::Reverse))?;
            }
            if span.tone == Tone::Title {
                queue!(out, SetAttribute(Attribute::Bold))?;
            }
            if let Some(color) = color_of(span.tone) {
                queue!(out, SetForegroundColor(color))?;
            }
            queue!(out, Print(text), SetAttribute(Attribute::Reset), ResetColor)?;
        }
    }

    out.flush()
}
