use crate::app::ActivityState;
use crate::theme::Theme;
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::*;

/// Top banner with the running calorie balance.
pub fn draw_summary(f: &mut Frame, area: Rect, state: &ActivityState, theme: &Theme) {
    let net = state.net_calories();
    let net_style = if net > 0 {
        Style::default().fg(theme.food)
    } else if net < 0 {
        Style::default().fg(theme.exercise)
    } else {
        theme.text_muted()
    };
    let spans = vec![
        Span::styled(" Calorie Tracker ", theme.title_style().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(
            format!("Consumed: {} kcal", state.calories_consumed()),
            Style::default().fg(theme.food),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Burned: {} kcal", state.calories_burned()),
            Style::default().fg(theme.exercise),
        ),
        Span::raw("  |  "),
        Span::styled(format!("Net: {net} kcal"), net_style),
    ];
    let p = Paragraph::new(Line::from(spans));
    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Activity, Category};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use uuid::Uuid;

    #[test]
    fn summary_renders_totals() {
        let st = ActivityState {
            activities: vec![
                Activity {
                    id: Uuid::new_v4(),
                    category: Category::Food,
                    name: "Salad".into(),
                    calories: 300,
                },
                Activity {
                    id: Uuid::new_v4(),
                    category: Category::Exercise,
                    name: "Run".into(),
                    calories: 100,
                },
            ],
            active_id: None,
        };
        let backend = TestBackend::new(80, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::default();
        terminal
            .draw(|f| draw_summary(f, f.area(), &st, &theme))
            .unwrap();
        let buf = terminal.backend().buffer().clone();
        let mut text = String::new();
        for x in 0..buf.area.width {
            text.push(buf[(x, 0)].symbol().chars().next().unwrap_or(' '));
        }
        assert!(text.contains("Consumed: 300 kcal"));
        assert!(text.contains("Burned: 100 kcal"));
        assert!(text.contains("Net: 200 kcal"));
    }
}
