// Dashboard application state and action handling
//
// `App` never performs I/O. Actions that need the network return `Effect`s;
// the runtime spawns them and hands the completions back.

use std::sync::Arc;
use std::time::Instant;

use common::client::LogSource;
use common::config::DashboardConfig;
use common::fetcher::{FetchCompletion, FetchTicket};
use common::filters::DateRange;
use common::job_detail::{DetailCompletion, DetailTicket, JobDetailView};
use common::job_list::JobListView;
use common::route::Route;

use crate::views::jobs_list::CHROME_ROWS;

/// Which widget receives typed characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Table,
    Search,
    DateRange,
}

/// Input mode the keymap resolves against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    List(Focus),
    Detail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    ToggleExpand,
    Open,
    Back,
    Newer,
    Older,
    Refresh,
    CycleStatus,
    FocusSearch,
    FocusDateRange,
    ClearFilters,
    Input(char),
    Backspace,
    Submit,
    Cancel,
    Resize { width: u16, height: u16 },
}

/// Network work requested by the app
#[derive(Debug)]
pub enum Effect {
    FetchList(FetchTicket),
    FetchDetail(DetailTicket),
}

/// Finished network work coming back into the app
#[derive(Debug)]
pub enum Completion {
    List(FetchCompletion),
    Detail(DetailCompletion),
}

pub struct App {
    source: Arc<dyn LogSource>,
    route: Route,
    list: JobListView,
    list_mounted: bool,
    detail: Option<JobDetailView>,
    focus: Focus,
    cursor: usize,
    operator_cursor: usize,
    date_input: String,
    notice: Option<String>,
    viewport: (u16, u16),
    should_quit: bool,
}

impl App {
    pub fn new(
        source: Arc<dyn LogSource>,
        config: &DashboardConfig,
        route: Route,
        viewport: (u16, u16),
    ) -> Self {
        // Never size pages into the list chrome
        let layout = DashboardConfig {
            reserved_rows: config.reserved_rows.max(CHROME_ROWS),
            ..config.clone()
        };
        let mut list = JobListView::new(Arc::clone(&source), &layout);
        // Measure before mount so the first query already uses the real size
        list.resize(viewport.1);

        Self {
            source,
            route,
            list,
            list_mounted: false,
            detail: None,
            focus: Focus::Table,
            cursor: 0,
            operator_cursor: 0,
            date_input: String::new(),
            notice: None,
            viewport,
            should_quit: false,
        }
    }

    /// Initial requests for the starting route
    pub fn start(&mut self) -> Vec<Effect> {
        let route = self.route.clone();
        self.navigate(route)
    }

    pub fn handle(&mut self, action: Action, now: Instant) -> Vec<Effect> {
        match action {
            Action::Quit => {
                self.should_quit = true;
                Vec::new()
            }
            Action::Resize { width, height } => {
                // Redraw right away; the page size follows via `settle_height`
                self.viewport = (width, height);
                Vec::new()
            }
            action => match self.route {
                Route::JobList => self.handle_list(action, now),
                Route::JobDetail(_) => self.handle_detail(action),
            },
        }
    }

    fn handle_list(&mut self, action: Action, now: Instant) -> Vec<Effect> {
        match self.focus {
            Focus::Search => {
                match action {
                    Action::Input(c) => {
                        let mut search = self.list.filters().search().to_string();
                        search.push(c);
                        self.list.set_search(search, now);
                    }
                    Action::Backspace => {
                        let mut search = self.list.filters().search().to_string();
                        search.pop();
                        self.list.set_search(search, now);
                    }
                    Action::Submit | Action::Cancel => self.focus = Focus::Table,
                    _ => {}
                }
                return Vec::new();
            }
            Focus::DateRange => {
                match action {
                    Action::Input(c) => self.date_input.push(c),
                    Action::Backspace => {
                        self.date_input.pop();
                    }
                    Action::Submit => match DateRange::parse(&self.date_input) {
                        Ok(range) => {
                            self.list.set_date_range(range, now);
                            self.notice = None;
                            self.focus = Focus::Table;
                        }
                        Err(e) => self.notice = Some(e.to_string()),
                    },
                    Action::Cancel => {
                        self.notice = None;
                        self.focus = Focus::Table;
                    }
                    _ => {}
                }
                return Vec::new();
            }
            Focus::Table => {}
        }

        // Row actions would hit jobs the table is not showing
        let rows_hidden = self.list.is_loading() || self.list.error().is_some();
        if rows_hidden
            && matches!(
                action,
                Action::MoveUp | Action::MoveDown | Action::ToggleExpand | Action::Open
            )
        {
            return Vec::new();
        }

        match action {
            Action::MoveUp => {
                self.cursor = self.cursor.saturating_sub(1);
                Vec::new()
            }
            Action::MoveDown => {
                let last = self.list.jobs().len().saturating_sub(1);
                self.cursor = (self.cursor + 1).min(last);
                Vec::new()
            }
            Action::ToggleExpand => {
                if let Some(job_id) = self.selected_job_id() {
                    self.list.toggle_expanded(&job_id);
                }
                Vec::new()
            }
            Action::Open => match self.selected_job_id() {
                Some(job_id) => self.navigate(Route::JobDetail(job_id)),
                None => Vec::new(),
            },
            Action::Newer => self.list.newer().map(Effect::FetchList).into_iter().collect(),
            Action::Older => self.list.older().map(Effect::FetchList).into_iter().collect(),
            Action::Refresh => vec![Effect::FetchList(self.list.refresh())],
            Action::CycleStatus => {
                let status = self.list.filters().status().cycle();
                self.list.set_status(status, now);
                Vec::new()
            }
            Action::FocusSearch => {
                self.focus = Focus::Search;
                Vec::new()
            }
            Action::FocusDateRange => {
                self.date_input = self.list.filters().date_range().to_string();
                if self.list.filters().date_range().is_unbounded() {
                    self.date_input.clear();
                }
                self.focus = Focus::DateRange;
                Vec::new()
            }
            Action::ClearFilters => {
                self.list.clear_filters(now);
                self.date_input.clear();
                self.notice = None;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_detail(&mut self, action: Action) -> Vec<Effect> {
        let rows_hidden = self
            .detail
            .as_ref()
            .is_none_or(|detail| detail.is_loading() || detail.error().is_some());
        if rows_hidden
            && matches!(
                action,
                Action::MoveUp | Action::MoveDown | Action::ToggleExpand | Action::Open
            )
        {
            return Vec::new();
        }

        match action {
            Action::Back | Action::Cancel => self.navigate(Route::JobList),
            Action::MoveUp => {
                self.operator_cursor = self.operator_cursor.saturating_sub(1);
                Vec::new()
            }
            Action::MoveDown => {
                let count = self.operator_count();
                self.operator_cursor = (self.operator_cursor + 1).min(count.saturating_sub(1));
                Vec::new()
            }
            Action::ToggleExpand | Action::Open => {
                let selected = self.selected_operator_id();
                if let (Some(detail), Some(operator_id)) = (self.detail.as_mut(), selected) {
                    detail.toggle_operator(&operator_id);
                }
                Vec::new()
            }
            Action::Refresh => match self.detail.as_mut() {
                Some(detail) => vec![Effect::FetchDetail(detail.begin())],
                None => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    /// Switch views and start whatever load the new view needs
    pub fn navigate(&mut self, route: Route) -> Vec<Effect> {
        tracing::info!(route = %route, "Navigating");
        self.route = route.clone();
        self.focus = Focus::Table;

        match route {
            Route::JobList => {
                self.detail = None;
                if self.list_mounted {
                    Vec::new()
                } else {
                    self.list_mounted = true;
                    vec![Effect::FetchList(self.list.mount())]
                }
            }
            Route::JobDetail(job_id) => {
                let mut detail = JobDetailView::new(Arc::clone(&self.source), job_id);
                let ticket = detail.begin();
                self.detail = Some(detail);
                self.operator_cursor = 0;
                vec![Effect::FetchDetail(ticket)]
            }
        }
    }

    /// Resize the list page once the terminal height stops changing
    pub fn settle_height(&mut self, height: u16) -> Vec<Effect> {
        self.list.resize(height).map(Effect::FetchList).into_iter().collect()
    }

    /// Settle debounced filters
    pub fn tick(&mut self, now: Instant) -> Vec<Effect> {
        self.list.poll(now).map(Effect::FetchList).into_iter().collect()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.list.next_deadline()
    }

    /// Periodic reload of the visible list page
    pub fn auto_refresh(&mut self) -> Vec<Effect> {
        if self.route != Route::JobList || !self.list_mounted || self.list.is_loading() {
            return Vec::new();
        }
        vec![Effect::FetchList(self.list.reload())]
    }

    /// Apply finished work; a listing that shrank under the current page
    /// asks for the last page again
    pub fn complete(&mut self, completion: Completion) -> Vec<Effect> {
        match completion {
            Completion::List(done) => {
                self.list.complete(done);
                let last = self.list.jobs().len().saturating_sub(1);
                self.cursor = self.cursor.min(last);
                self.list.follow_up().map(Effect::FetchList).into_iter().collect()
            }
            Completion::Detail(done) => {
                if let Some(detail) = self.detail.as_mut() {
                    detail.complete(done);
                }
                let last = self.operator_count().saturating_sub(1);
                self.operator_cursor = self.operator_cursor.min(last);
                Vec::new()
            }
        }
    }

    fn selected_job_id(&self) -> Option<String> {
        self.list
            .jobs()
            .get(self.cursor)
            .map(|job| job.job_id.clone())
    }

    fn selected_operator_id(&self) -> Option<String> {
        self.detail
            .as_ref()
            .and_then(|d| d.job())
            .and_then(|job| job.operators.get(self.operator_cursor))
            .map(|op| op.operator_id.clone())
    }

    fn operator_count(&self) -> usize {
        self.detail
            .as_ref()
            .and_then(|d| d.job())
            .map(|job| job.operators.len())
            .unwrap_or(0)
    }

    pub fn mode(&self) -> Mode {
        match self.route {
            Route::JobList => Mode::List(self.focus),
            Route::JobDetail(_) => Mode::Detail,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn list(&self) -> &JobListView {
        &self.list
    }

    pub fn detail(&self) -> Option<&JobDetailView> {
        self.detail.as_ref()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn operator_cursor(&self) -> usize {
        self.operator_cursor
    }

    pub fn date_input(&self) -> &str {
        &self.date_input
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn viewport(&self) -> (u16, u16) {
        self.viewport
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}
