use crate::app::{ActivityAction, ActivityState};
use crate::model::{Activity, Category};
use crate::theme::Theme;
use crate::widgets::chrome::panel_block;
use crossterm::event::KeyCode;
use ratatui::prelude::*;
use ratatui::widgets::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldId {
    Category,
    Name,
    Calories,
}

const FIELDS: [FieldId; 3] = [FieldId::Category, FieldId::Name, FieldId::Calories];

/// Selector index of the save control, one past the last field row.
pub const SAVE_ROW: usize = FIELDS.len();

/// Entry form over the activity collection. Owns the draft record being
/// edited; the collection itself is only ever touched through the actions
/// this form emits.
#[derive(Clone, Debug)]
pub struct FormState {
    pub draft: Activity,
    /// Raw calories text as typed. Kept verbatim even when it does not parse;
    /// the draft's numeric value falls back to 0 in that case.
    pub calories_input: String,
    pub selected: usize,
    pub editing: bool,
    pub category_cursor: usize,
    pub message: Option<String>,
    /// True while the draft mirrors a record already in the collection.
    pub editing_existing: bool,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    pub fn new() -> Self {
        Self {
            draft: Activity::draft(),
            calories_input: "0".into(),
            selected: 0,
            editing: false,
            category_cursor: 0,
            message: None,
            editing_existing: false,
        }
    }

    pub fn title(&self) -> &'static str {
        if self.editing_existing {
            "Edit Activity"
        } else {
            "New Activity"
        }
    }

    /// Updates exactly one field of the draft from raw input text. Numeric
    /// text on the calories field becomes a number; anything else leaves the
    /// numeric value at 0 and keeps the text. Unknown category ids are
    /// ignored.
    pub fn apply_input(&mut self, field: FieldId, raw: &str) {
        match field {
            FieldId::Category => {
                if let Some(c) = raw.trim().parse::<u8>().ok().and_then(Category::from_id) {
                    self.draft.category = c;
                }
            }
            FieldId::Name => {
                self.draft.name = raw.to_string();
            }
            FieldId::Calories => {
                self.calories_input = raw.to_string();
                self.draft.calories = raw.trim().parse().unwrap_or(0);
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.draft.name.trim().is_empty() && self.draft.calories > 0
    }

    /// Hands the full draft off as a save intent and starts over with a
    /// fresh record under a new id.
    pub fn submit(&mut self) -> ActivityAction {
        let new_activity = std::mem::replace(&mut self.draft, Activity::draft());
        self.calories_input = "0".into();
        self.category_cursor = 0;
        self.editing = false;
        self.editing_existing = false;
        self.message = None;
        ActivityAction::SaveActivity { new_activity }
    }

    /// Explicit resynchronization hook, called after every reducer dispatch.
    /// When a record is active and present in the collection, the whole draft
    /// is replaced by it. An active id without a matching record is a no-op;
    /// the previous draft is kept.
    pub fn sync_selected(&mut self, state: &ActivityState) {
        let Some(id) = state.active_id else { return };
        if let Some(a) = state.activities.iter().find(|a| a.id == id) {
            self.draft = a.clone();
            self.calories_input = a.calories.to_string();
            self.category_cursor = Category::ALL
                .iter()
                .position(|c| *c == a.category)
                .unwrap_or(0);
            self.editing = false;
            self.editing_existing = true;
            self.message = None;
        }
    }

    fn field_at(&self, row: usize) -> Option<FieldId> {
        FIELDS.get(row).copied()
    }

    pub fn on_key(&mut self, key: KeyCode) -> Option<ActivityAction> {
        if self.editing {
            self.on_edit_key(key);
            return None;
        }
        match key {
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                self.selected = (self.selected + 1).min(SAVE_ROW);
            }
            KeyCode::Enter => {
                if self.selected == SAVE_ROW {
                    if self.is_valid() {
                        return Some(self.submit());
                    }
                    self.message = Some("Name and calories above zero are required".into());
                } else {
                    if self.field_at(self.selected) == Some(FieldId::Category) {
                        self.category_cursor = Category::ALL
                            .iter()
                            .position(|c| *c == self.draft.category)
                            .unwrap_or(0);
                    }
                    self.editing = true;
                    self.message = None;
                }
            }
            _ => {}
        }
        None
    }

    fn on_edit_key(&mut self, key: KeyCode) {
        let Some(field) = self.field_at(self.selected) else {
            self.editing = false;
            return;
        };
        match field {
            FieldId::Category => match key {
                KeyCode::Up => {
                    self.category_cursor = self.category_cursor.saturating_sub(1);
                }
                KeyCode::Down => {
                    self.category_cursor = (self.category_cursor + 1).min(Category::ALL.len() - 1);
                }
                KeyCode::Enter => {
                    let picked = Category::ALL[self.category_cursor];
                    self.apply_input(FieldId::Category, &picked.id().to_string());
                    self.editing = false;
                }
                KeyCode::Esc => {
                    self.editing = false;
                }
                _ => {}
            },
            FieldId::Name => match key {
                KeyCode::Char(c) => {
                    let mut s = self.draft.name.clone();
                    s.push(c);
                    self.apply_input(FieldId::Name, &s);
                }
                KeyCode::Backspace => {
                    let mut s = self.draft.name.clone();
                    s.pop();
                    self.apply_input(FieldId::Name, &s);
                }
                KeyCode::Enter | KeyCode::Esc => {
                    self.editing = false;
                }
                _ => {}
            },
            FieldId::Calories => match key {
                KeyCode::Char(c) => {
                    let mut s = self.calories_input.clone();
                    s.push(c);
                    self.apply_input(FieldId::Calories, &s);
                }
                KeyCode::Backspace => {
                    let mut s = self.calories_input.clone();
                    s.pop();
                    self.apply_input(FieldId::Calories, &s);
                }
                KeyCode::Enter | KeyCode::Esc => {
                    self.editing = false;
                }
                _ => {}
            },
        }
    }
}

pub fn draw_form(
    f: &mut Frame,
    area: Rect,
    form: &FormState,
    focused: bool,
    cursor_on: bool,
    theme: &Theme,
) {
    let mut lines: Vec<Line> = Vec::new();
    let value_style = |row: usize| {
        if row == form.selected {
            if form.editing {
                theme.text_editing_bold()
            } else {
                theme.text_active_bold()
            }
        } else {
            Style::default()
        }
    };
    let sel = |row: usize| if row == form.selected { '›' } else { ' ' };

    // Category row, expanding into an option list while being edited
    lines.push(Line::from(vec![
        Span::raw(format!("{} Category: ", sel(0))),
        Span::styled(form.draft.category.label(), value_style(0)),
    ]));
    if form.editing && form.selected == 0 {
        for (oi, c) in Category::ALL.iter().enumerate() {
            let mark = if *c == form.draft.category {
                "(•)"
            } else {
                "( )"
            };
            let cur = if oi == form.category_cursor { '›' } else { ' ' };
            let st = if oi == form.category_cursor {
                theme.list_cursor_style()
            } else {
                theme.text_muted()
            };
            lines.push(Line::from(Span::styled(
                format!("  {cur} {mark} {}", c.label()),
                st,
            )));
        }
    }

    // Name row
    let mut name_val = form.draft.name.clone();
    if form.editing && form.selected == 1 && cursor_on {
        name_val.push('▏');
    }
    lines.push(Line::from(vec![
        Span::raw(format!("{} Activity: ", sel(1))),
        Span::styled(name_val, value_style(1)),
    ]));

    // Calories row shows the raw buffer, not the coerced number
    let mut cal_val = form.calories_input.clone();
    if form.editing && form.selected == 2 && cursor_on {
        cal_val.push('▏');
    }
    lines.push(Line::from(vec![
        Span::raw(format!("{} Calories (kcal): ", sel(2))),
        Span::styled(cal_val, value_style(2)),
    ]));

    // Save control, inert while the draft is invalid
    lines.push(Line::from(""));
    let save_label = match form.draft.category {
        Category::Food => "[ Save Food ]",
        Category::Exercise => "[ Save Exercise ]",
    };
    let can_save = form.is_valid();
    let save_style = if form.selected == SAVE_ROW {
        if can_save {
            theme.list_cursor_style()
        } else {
            Style::default().fg(theme.muted).bg(theme.accent)
        }
    } else if can_save {
        theme.text_active_bold()
    } else {
        theme.text_muted()
    };
    lines.push(Line::from(vec![
        Span::raw(format!("{} ", sel(SAVE_ROW))),
        Span::styled(save_label, save_style),
    ]));

    if let Some(msg) = &form.message {
        lines.push(Line::from(Span::styled(msg.clone(), theme.text_error())));
    }

    let title = if form.editing {
        format!("{} — editing", form.title())
    } else {
        form.title().to_string()
    };
    let block = panel_block(&title, focused, theme);
    let p = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use uuid::Uuid;

    fn filled(form: &mut FormState, name: &str, calories: &str) {
        form.apply_input(FieldId::Name, name);
        form.apply_input(FieldId::Calories, calories);
    }

    #[test]
    fn valid_iff_trimmed_name_and_positive_calories() {
        let mut form = FormState::new();
        assert!(!form.is_valid());
        form.apply_input(FieldId::Name, "Salad");
        assert!(!form.is_valid());
        form.apply_input(FieldId::Calories, "300");
        assert!(form.is_valid());
        form.apply_input(FieldId::Name, "   ");
        assert!(!form.is_valid());
    }

    #[test]
    fn numeric_calories_input_is_coerced() {
        let mut form = FormState::new();
        form.apply_input(FieldId::Calories, "450");
        assert_eq!(form.draft.calories, 450);
        assert_eq!(form.calories_input, "450");
    }

    #[test]
    fn non_numeric_calories_kept_as_text_only() {
        let mut form = FormState::new();
        form.apply_input(FieldId::Calories, "45x");
        assert_eq!(form.draft.calories, 0);
        assert_eq!(form.calories_input, "45x");
        form.apply_input(FieldId::Name, "Snack");
        assert!(!form.is_valid());
    }

    #[test]
    fn unknown_category_id_is_ignored() {
        let mut form = FormState::new();
        form.apply_input(FieldId::Category, "2");
        assert_eq!(form.draft.category, Category::Exercise);
        form.apply_input(FieldId::Category, "9");
        assert_eq!(form.draft.category, Category::Exercise);
        form.apply_input(FieldId::Category, "not a number");
        assert_eq!(form.draft.category, Category::Exercise);
    }

    #[test]
    fn repeated_identical_updates_leave_draft_unchanged() {
        let mut form = FormState::new();
        form.apply_input(FieldId::Name, "Salad");
        form.apply_input(FieldId::Calories, "300");
        let once = form.draft.clone();
        form.apply_input(FieldId::Name, "Salad");
        form.apply_input(FieldId::Calories, "300");
        assert_eq!(form.draft, once);
    }

    #[test]
    fn submit_emits_exact_draft_and_resets_with_new_id() {
        let mut form = FormState::new();
        form.apply_input(FieldId::Category, "1");
        filled(&mut form, "Salad", "300");
        let old_id = form.draft.id;

        let action = form.submit();
        match action {
            ActivityAction::SaveActivity { new_activity } => {
                assert_eq!(new_activity.id, old_id);
                assert_eq!(new_activity.name, "Salad");
                assert_eq!(new_activity.calories, 300);
                assert_eq!(new_activity.category, Category::Food);
            }
            other => panic!("expected save intent, got {other:?}"),
        }
        assert!(form.draft.name.is_empty());
        assert_eq!(form.draft.calories, 0);
        assert_eq!(form.calories_input, "0");
        assert_eq!(form.draft.category, Category::Food);
        assert_ne!(form.draft.id, old_id);
        assert!(!form.editing_existing);
    }

    #[test]
    fn submit_resets_category_to_default() {
        let mut form = FormState::new();
        form.apply_input(FieldId::Category, "2");
        filled(&mut form, "Run", "200");
        let _ = form.submit();
        assert_eq!(form.draft.category, Category::Food);
    }

    #[test]
    fn sync_replaces_draft_with_matching_record() {
        let record = Activity {
            id: Uuid::new_v4(),
            category: Category::Exercise,
            name: "Bike".into(),
            calories: 500,
        };
        let st = ActivityState {
            activities: vec![record.clone()],
            active_id: Some(record.id),
        };
        let mut form = FormState::new();
        filled(&mut form, "half-typed", "12");
        form.sync_selected(&st);
        assert_eq!(form.draft, record);
        assert_eq!(form.calories_input, "500");
        assert!(form.editing_existing);
    }

    #[test]
    fn sync_with_unknown_active_id_keeps_previous_draft() {
        let st = ActivityState {
            activities: vec![Activity::draft()],
            active_id: Some(Uuid::new_v4()),
        };
        let mut form = FormState::new();
        filled(&mut form, "half-typed", "12");
        let before = form.draft.clone();
        form.sync_selected(&st);
        assert_eq!(form.draft, before);
        assert!(!form.editing_existing);
    }

    #[test]
    fn sync_without_active_id_is_a_noop() {
        let st = ActivityState {
            activities: vec![Activity::draft()],
            active_id: None,
        };
        let mut form = FormState::new();
        filled(&mut form, "kept", "7");
        let before = form.draft.clone();
        form.sync_selected(&st);
        assert_eq!(form.draft, before);
    }

    #[test]
    fn save_key_does_nothing_while_invalid() {
        let mut form = FormState::new();
        for _ in 0..SAVE_ROW {
            assert!(form.on_key(KeyCode::Down).is_none());
        }
        assert_eq!(form.selected, SAVE_ROW);
        assert!(form.on_key(KeyCode::Enter).is_none());
        assert!(form.message.is_some());
        assert!(form.draft.name.is_empty());
    }

    #[test]
    fn keyboard_flow_edits_fields_and_submits() {
        let mut form = FormState::new();
        let press = |form: &mut FormState, key: KeyCode| {
            assert!(form.on_key(key).is_none());
        };
        // Name
        press(&mut form, KeyCode::Down);
        press(&mut form, KeyCode::Enter);
        for c in "Salad".chars() {
            press(&mut form, KeyCode::Char(c));
        }
        press(&mut form, KeyCode::Enter);
        // Calories (buffer starts at "0", clear it first)
        press(&mut form, KeyCode::Down);
        press(&mut form, KeyCode::Enter);
        press(&mut form, KeyCode::Backspace);
        for c in "300".chars() {
            press(&mut form, KeyCode::Char(c));
        }
        press(&mut form, KeyCode::Enter);
        // Save
        press(&mut form, KeyCode::Down);
        let action = form.on_key(KeyCode::Enter);
        match action {
            Some(ActivityAction::SaveActivity { new_activity }) => {
                assert_eq!(new_activity.name, "Salad");
                assert_eq!(new_activity.calories, 300);
            }
            other => panic!("expected save intent, got {other:?}"),
        }
    }

    #[test]
    fn category_selector_picks_with_cursor() {
        let mut form = FormState::new();
        assert!(form.on_key(KeyCode::Enter).is_none()); // open selector on the category row
        assert!(form.editing);
        assert!(form.on_key(KeyCode::Down).is_none());
        assert!(form.on_key(KeyCode::Enter).is_none());
        assert!(!form.editing);
        assert_eq!(form.draft.category, Category::Exercise);
    }

    fn render_to_text(form: &FormState) -> String {
        let backend = TestBackend::new(44, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::default();
        terminal
            .draw(|f| draw_form(f, f.area(), form, true, false, &theme))
            .unwrap();
        let buf = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push(buf[(x, y)].symbol().chars().next().unwrap_or(' '));
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn render_shows_fields_and_save_control() {
        let mut form = FormState::new();
        filled(&mut form, "Salad", "300");
        let text = render_to_text(&form);
        assert!(text.contains("New Activity"));
        assert!(text.contains("Category: Food"));
        assert!(text.contains("Activity: Salad"));
        assert!(text.contains("Calories (kcal): 300"));
        assert!(text.contains("[ Save Food ]"));
    }

    #[test]
    fn render_reflects_exercise_save_label_and_edit_title() {
        let record = Activity {
            id: Uuid::new_v4(),
            category: Category::Exercise,
            name: "Bike".into(),
            calories: 500,
        };
        let st = ActivityState {
            activities: vec![record.clone()],
            active_id: Some(record.id),
        };
        let mut form = FormState::new();
        form.sync_selected(&st);
        let text = render_to_text(&form);
        assert!(text.contains("Edit Activity"));
        assert!(text.contains("[ Save Exercise ]"));
    }
}
