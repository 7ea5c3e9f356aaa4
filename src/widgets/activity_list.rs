use crate::app::{ActivityAction, ActivityState};
use crate::theme::Theme;
use crate::widgets::chrome::panel_block;
use crossterm::event::KeyCode;
use ratatui::prelude::*;
use ratatui::widgets::*;

/// Cursor and scroll window over the activity collection.
#[derive(Clone, Debug, Default)]
pub struct ActivityListState {
    pub selected: usize,
    pub offset: usize,
}

impl ActivityListState {
    /// Keeps the cursor inside the collection after deletes or a restart.
    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
            self.offset = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn on_key(&mut self, key: KeyCode, state: &ActivityState) -> Option<ActivityAction> {
        let len = state.activities.len();
        self.clamp(len);
        match key {
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                if len > 0 {
                    self.selected = (self.selected + 1).min(len - 1);
                }
            }
            KeyCode::Enter => {
                let id = state.activities.get(self.selected)?.id;
                return Some(ActivityAction::SetActiveId { id });
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                let id = state.activities.get(self.selected)?.id;
                return Some(ActivityAction::DeleteActivity { id });
            }
            _ => {}
        }
        None
    }
}

pub(crate) fn scroll_window(total: usize, selected: usize, inner_h: u16) -> (usize, usize) {
    if inner_h == 0 || total == 0 {
        return (0, 0);
    }
    let ih = inner_h as usize;
    let sel = selected.min(total.saturating_sub(1));
    let start = if sel >= ih.saturating_sub(1) {
        sel - ih.saturating_sub(1)
    } else {
        0
    };
    let end = (start + ih).min(total);
    (start, end)
}

pub fn draw_activity_list(
    f: &mut Frame,
    area: Rect,
    list: &mut ActivityListState,
    state: &ActivityState,
    focused: bool,
    theme: &Theme,
) {
    list.clamp(state.activities.len());
    let block = panel_block("Activities", focused, theme);
    let inner_h = area.height.saturating_sub(2);
    let (start, end) = scroll_window(state.activities.len(), list.selected, inner_h);
    list.offset = start;

    let mut lines: Vec<Line> = Vec::new();
    if state.activities.is_empty() {
        lines.push(Line::from(Span::styled(
            "No activities yet",
            theme.text_muted(),
        )));
    }
    for (i, a) in state.activities.iter().enumerate().take(end).skip(start) {
        let cur = if i == list.selected { '›' } else { ' ' };
        let active = state.active_id == Some(a.id);
        let marker = if active { "*" } else { " " };
        let row_style = if i == list.selected && focused {
            theme.list_cursor_style()
        } else {
            Style::default()
        };
        let cat_style = if i == list.selected && focused {
            row_style
        } else {
            Style::default().fg(theme.category_color(a.category))
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{cur}{marker}"), row_style),
            Span::styled(
                format!("[{}] ", a.category.label()),
                cat_style,
            ),
            Span::styled(format!("{} — {} kcal", a.name, a.calories), row_style),
        ]));
    }
    let p = Paragraph::new(lines).block(block);
    f.render_widget(p, area);
}
