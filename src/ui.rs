use crate::app::{self, ActivityAction, ActivityState};
use crate::theme::Theme;
use crate::widgets::activity_list::{draw_activity_list, ActivityListState};
use crate::widgets::form::{draw_form, FormState};
use crate::widgets::status_bar::draw_footer;
use crate::widgets::summary::draw_summary;
use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use std::time::{Duration, Instant};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Focus {
    Form,
    List,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Info,
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub text: String,
    pub level: ToastLevel,
    pub expires_at: Instant,
}

pub struct AppState {
    pub activities: ActivityState,
    pub form: FormState,
    pub list: ActivityListState,
    pub focus: Focus,
    pub theme: Theme,
    pub tick: u64,
    pub toast: Option<Toast>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            activities: ActivityState::default(),
            form: FormState::new(),
            list: ActivityListState::default(),
            focus: Focus::Form,
            theme: Theme::default(),
            tick: 0,
            toast: None,
        }
    }
}

impl AppState {
    pub fn show_toast(&mut self, text: impl Into<String>, level: ToastLevel, seconds: u64) {
        self.toast = Some(Toast {
            text: text.into(),
            level,
            expires_at: Instant::now() + Duration::from_secs(seconds),
        });
    }

    fn expire_toast(&mut self) {
        if let Some(t) = &self.toast {
            if t.expires_at <= Instant::now() {
                self.toast = None;
            }
        }
    }
}

/// Single funnel for every state change: run the reducer, then let the form
/// observe the new collection (the explicit resync hook).
pub(crate) fn dispatch(state: &mut AppState, action: ActivityAction) {
    let toast = match &action {
        ActivityAction::SaveActivity { .. } => Some(("Saved", ToastLevel::Success)),
        ActivityAction::DeleteActivity { .. } => Some(("Deleted", ToastLevel::Info)),
        ActivityAction::RestartApp => Some(("Tracker reset", ToastLevel::Info)),
        ActivityAction::SetActiveId { .. } => None,
    };
    app::update(&mut state.activities, action);
    state.form.sync_selected(&state.activities);
    state.list.clamp(state.activities.activities.len());
    if let Some((text, level)) = toast {
        state.show_toast(text, level, 2);
    }
}

/// Returns true when the app should exit.
pub(crate) fn handle_key(state: &mut AppState, code: KeyCode, mods: KeyModifiers) -> bool {
    if code == KeyCode::Char('c') && mods.contains(KeyModifiers::CONTROL) {
        return true;
    }
    // While a field editor is open all keys belong to the form.
    if state.form.editing {
        if let Some(action) = state.form.on_key(code) {
            dispatch(state, action);
        }
        return false;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Tab => {
            state.focus = match state.focus {
                Focus::Form => Focus::List,
                Focus::List => Focus::Form,
            };
        }
        KeyCode::Char('r') => {
            dispatch(state, ActivityAction::RestartApp);
            state.form = FormState::new();
        }
        _ => match state.focus {
            Focus::Form => {
                if let Some(action) = state.form.on_key(code) {
                    dispatch(state, action);
                }
            }
            Focus::List => {
                if let Some(action) = state.list.on_key(code, &state.activities) {
                    dispatch(state, action);
                }
            }
        },
    }
    false
}

fn ui(f: &mut Frame, state: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());
    draw_summary(f, chunks[0], &state.activities, &state.theme);
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);
    let cursor_on = state.tick % 2 == 0;
    draw_form(
        f,
        panes[0],
        &state.form,
        matches!(state.focus, Focus::Form),
        cursor_on,
        &state.theme,
    );
    draw_activity_list(
        f,
        panes[1],
        &mut state.list,
        &state.activities,
        matches!(state.focus, Focus::List),
        &state.theme,
    );
    draw_footer(f, chunks[2], state, &state.theme);
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes"))
        .unwrap_or(false)
}

pub fn run() -> Result<()> {
    let mut state = AppState::default();

    // Headless smoke mode: render a fixed number of frames off-screen.
    if env_flag("KCAL_TUI_HEADLESS") {
        let ticks: u64 = std::env::var("KCAL_TUI_TICKS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(10);
        let backend = ratatui::backend::TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend)?;
        for _ in 0..ticks {
            terminal.draw(|f| ui(f, &mut state))?;
            state.expire_toast();
            state.tick = state.tick.wrapping_add(1);
        }
        let summary = serde_json::json!({
            "ok": true,
            "ticks": ticks,
            "activities": state.activities.activities.len(),
        });
        println!("{summary}");
        return Ok(());
    }

    // Setup terminal (interactive)
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();
    let res = loop {
        if let Err(e) = terminal.draw(|f| ui(f, &mut state)) {
            break Err(e.into());
        }
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_millis(0));
        match event::poll(timeout) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) => {
                    if handle_key(&mut state, key.code, key.modifiers) {
                        break Ok(());
                    }
                }
                Ok(_) => {}
                Err(e) => break Err(e.into()),
            },
            Ok(false) => {}
            Err(e) => break Err(e.into()),
        }
        if last_tick.elapsed() >= tick_rate {
            state.tick = state.tick.wrapping_add(1);
            state.expire_toast();
            last_tick = Instant::now();
        }
    };
    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    res
}
