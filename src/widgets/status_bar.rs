use crate::theme::Theme;
use crate::ui::{AppState, Focus, ToastLevel};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::*;

pub fn draw_footer(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let help = if state.form.editing {
        "Enter accept • Esc close"
    } else {
        match state.focus {
            Focus::Form => "↑/↓ field • Enter edit/save • Tab list • r restart • q quit",
            Focus::List => "↑/↓ move • Enter edit • d delete • Tab form • r restart • q quit",
        }
    };
    let mut spans: Vec<Span> = vec![Span::styled(format!(" {help}"), theme.text_muted())];
    if let Some(t) = &state.toast {
        let color = theme.toast_color(t.level);
        let tag = match t.level {
            ToastLevel::Success => "[OK]",
            ToastLevel::Info => "[INFO]",
        };
        spans.push(Span::raw("  |  "));
        spans.push(Span::styled(
            format!("{tag} "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(t.text.clone(), Style::default().fg(color)));
    }
    let p = Paragraph::new(Line::from(spans));
    f.render_widget(p, area);
}
