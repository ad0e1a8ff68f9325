//! Relation composition editor.
//!
//! The screen is split into three bands:
//! - a table listing every relation row in submission order
//! - an editor row bound to the selected relation (service A, relation
//!   select, service B, expected value)
//! - the interval field followed by the Add, Remove and Submit buttons
//!
//! Keyboard and mouse input are translated into calls on `App`, which owns
//! the form state; only submission produces `Effect`s for the runtime.

use composer_types::{Effect, RelationKind};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
};

use super::state::FormInput;
use crate::app::App;
use crate::ui::components::Component;
use crate::ui::theme::theme_helpers::{self as th, ButtonType};

static FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Screen areas remembered from the last render for mouse hit-testing.
#[derive(Debug, Default, Clone, Copy)]
struct CompositionLayout {
    table_area: Rect,
    /// First row of table body, below the header
    table_body_y: u16,
    service_a_area: Rect,
    relation_area: Rect,
    service_b_area: Rect,
    expected_value_area: Rect,
    interval_area: Rect,
    add_button_area: Rect,
    remove_button_area: Rect,
    submit_button_area: Rect,
}

#[derive(Debug, Default)]
pub struct CompositionComponent {
    layout: CompositionLayout,
}

impl CompositionComponent {
    /// Shortcuts that work regardless of the focused widget.
    fn handle_hot_keys(&mut self, app: &mut App, key: KeyEvent) -> Option<Vec<Effect>> {
        if !key.modifiers.contains(KeyModifiers::CONTROL) {
            return None;
        }
        let effects = match key.code {
            KeyCode::Char('a') => {
                app.add_relation();
                app.focus.focus(&app.composition.f_service_a);
                Vec::new()
            }
            KeyCode::Char('d') => {
                app.remove_selected_relation();
                Vec::new()
            }
            KeyCode::Char('s') => app.request_submit(),
            _ => return None,
        };
        Some(effects)
    }

    fn handle_table_keys(&mut self, app: &mut App, key: KeyEvent) {
        match key.code {
            KeyCode::Up => app.composition.select_previous_row(),
            KeyCode::Down => app.composition.select_next_row(),
            KeyCode::Home => app.composition.set_selected_row(Some(0)),
            KeyCode::End => {
                let last = app.composition.rows().len().checked_sub(1);
                app.composition.set_selected_row(last);
            }
            KeyCode::Delete => {
                app.remove_selected_relation();
            }
            KeyCode::Enter if app.composition.selected_index().is_some() => {
                app.focus.focus(&app.composition.f_service_a);
            }
            _ => {}
        }
    }

    fn handle_relation_keys(&mut self, app: &mut App, key: KeyEvent) {
        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Left | KeyCode::Right => app.composition.cycle_relation(),
            KeyCode::Up => app.composition.select_previous_row(),
            KeyCode::Down => app.composition.select_next_row(),
            _ => {}
        }
    }

    fn handle_input_keys(&mut self, app: &mut App, input: FormInput, key: KeyEvent) {
        let form = &mut app.composition;
        match key.code {
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                // The interval field only takes whole numbers
                if input != FormInput::Interval || c.is_ascii_digit() {
                    form.insert_character(input, c);
                }
            }
            KeyCode::Backspace => form.delete_previous_character(input),
            KeyCode::Delete => form.delete_next_character(input),
            KeyCode::Left => form.move_cursor_left(input),
            KeyCode::Right => form.move_cursor_right(input),
            KeyCode::Up if input != FormInput::Interval => form.select_previous_row(),
            KeyCode::Down if input != FormInput::Interval => form.select_next_row(),
            _ => {}
        }
    }

    fn handle_button_keys(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if !matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
            return Vec::new();
        }
        let form = &app.composition;
        let (add, remove, submit) = (
            form.f_add_button.get(),
            form.f_remove_button.get(),
            form.f_submit_button.get(),
        );
        if add {
            app.add_relation();
        } else if remove {
            app.remove_selected_relation();
        } else if submit {
            return app.request_submit();
        }
        Vec::new()
    }

    fn hit_test_table(&self, app: &App, pos: Position) -> Option<usize> {
        if !self.layout.table_area.contains(pos) || pos.y < self.layout.table_body_y {
            return None;
        }
        let offset = app.composition.table_state().offset();
        let index = (pos.y - self.layout.table_body_y) as usize + offset;
        (index < app.composition.rows().len()).then_some(index)
    }

    fn render_table(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let focused = app.composition.f_table.get();
        let title = format!("Relations ({})", app.composition.rows().len());
        let block = th::block(theme, Some(&title), focused);
        let inner = block.inner(area);
        self.layout.table_area = inner;
        self.layout.table_body_y = inner.y.saturating_add(1);

        if app.composition.rows().is_empty() {
            let hint = Paragraph::new(Line::from(vec![
                Span::styled("No relations yet. Press ", theme.text_muted_style()),
                Span::styled("Ctrl+A", theme.accent_emphasis_style()),
                Span::styled(" to add one.", theme.text_muted_style()),
            ]))
            .block(block);
            frame.render_widget(hint, area);
            return;
        }

        let header = Row::new(["#", "Service A", "Relation", "Service B", "Expected value"])
            .style(th::table_header_style(theme));
        let rows = app
            .composition
            .rows()
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let expected = if row.relation.takes_expected_value() {
                    Cell::from(row.expected_value.clone())
                } else {
                    Cell::from(Span::styled("n/a", theme.text_muted_style()))
                };
                Row::new(vec![
                    Cell::from((index + 1).to_string()),
                    Cell::from(row.service_a.clone()),
                    Cell::from(row.relation.as_str()),
                    Cell::from(row.service_b.clone()),
                    expected,
                ])
                .style(th::table_row_style(theme, index))
            })
            .collect::<Vec<Row>>();

        let highlight = if focused {
            theme.selection_style().add_modifier(Modifier::BOLD)
        } else {
            theme.selection_style()
        };
        let table = Table::new(
            rows,
            [
                Constraint::Length(4),
                Constraint::Percentage(28),
                Constraint::Length(10),
                Constraint::Percentage(28),
                Constraint::Fill(1),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(highlight)
        .highlight_symbol("▸ ");

        frame.render_stateful_widget(table, area, app.composition.table_state_mut());
    }

    fn render_editor(&mut self, frame: &mut Frame, area: Rect, app: &App) {
        let [service_a, relation, service_b, expected] = Layout::horizontal([
            Constraint::Percentage(30),
            Constraint::Length(14),
            Constraint::Percentage(30),
            Constraint::Fill(1),
        ])
        .areas(area);
        self.layout.service_a_area = service_a;
        self.layout.relation_area = relation;
        self.layout.service_b_area = service_b;
        self.layout.expected_value_area = expected;

        let form = &app.composition;
        let has_row = form.selected_index().is_some();
        let relation_kind = form.selected_row().map(|row| row.relation).unwrap_or_default();

        render_text_input(frame, service_a, app, FormInput::ServiceA, "Service A", has_row);
        render_text_input(frame, service_b, app, FormInput::ServiceB, "Service B", has_row);
        render_text_input(
            frame,
            expected,
            app,
            FormInput::ExpectedValue,
            "Expected value",
            has_row && relation_kind == RelationKind::OnValue,
        );

        let theme = &*app.ctx.theme;
        let focused = form.f_relation.get();
        let block = th::block(theme, Some("Relation"), focused);
        let label = if has_row {
            Line::from(vec![
                Span::styled("◂ ", theme.text_muted_style()),
                Span::styled(relation_kind.as_str(), th::input_style(theme, true, focused)),
                Span::styled(" ▸", theme.text_muted_style()),
            ])
        } else {
            Line::from(Span::styled("-", theme.text_muted_style()))
        };
        frame.render_widget(Paragraph::new(label).block(block), relation);
    }

    fn render_controls(&mut self, frame: &mut Frame, area: Rect, app: &App) {
        let [interval, add, remove, submit, status] = Layout::horizontal([
            Constraint::Length(22),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(16),
            Constraint::Fill(1),
        ])
        .spacing(1)
        .areas(area);
        self.layout.interval_area = interval;
        self.layout.add_button_area = add;
        self.layout.remove_button_area = remove;
        self.layout.submit_button_area = submit;

        render_text_input(frame, interval, app, FormInput::Interval, "Interval (s)", true);

        let theme = &*app.ctx.theme;
        let form = &app.composition;
        let submitting = form.is_submitting();
        let has_selection = form.selected_index().is_some();
        th::render_button(frame, add, "Add", theme, true, form.f_add_button.get(), ButtonType::Secondary);
        th::render_button(
            frame,
            remove,
            "Remove",
            theme,
            has_selection,
            form.f_remove_button.get(),
            ButtonType::Secondary,
        );
        let submit_label = if submitting {
            format!("{} Sending", FRAMES[app.throbber_idx % FRAMES.len()])
        } else {
            "Submit".to_string()
        };
        th::render_button(
            frame,
            submit,
            &submit_label,
            theme,
            !submitting,
            form.f_submit_button.get(),
            ButtonType::Primary,
        );

        let target = app.ctx.client.save_composition_url().to_string();
        let status_line = Paragraph::new(vec![
            Line::default(),
            Line::from(vec![
                Span::styled("POST ", theme.text_muted_style()),
                Span::styled(target, theme.text_secondary_style()),
            ]),
        ]);
        frame.render_widget(status_line, status);
    }
}

/// Draws a bordered single-line input and places the cursor when focused.
fn render_text_input(frame: &mut Frame, area: Rect, app: &App, input: FormInput, title: &str, enabled: bool) {
    let theme = &*app.ctx.theme;
    let focused = app.composition.focused_input() == Some(input);
    let block = th::block(theme, Some(title), focused);
    let inner = block.inner(area);
    let state = app.composition.input_state(input);

    let style = if enabled {
        th::input_style(theme, true, focused)
    } else {
        theme.text_muted_style()
    };
    let offset = state.scroll_offset(inner.width);
    frame.render_widget(
        Paragraph::new(Span::styled(state.input(), style)).scroll((0, offset)).block(block),
        area,
    );

    if focused && enabled && inner.width > 0 {
        let column = (state.cursor_column() - offset).min(inner.width - 1);
        frame.set_cursor_position((inner.x + column, inner.y));
    }
}

impl Component for CompositionComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if let Some(effects) = self.handle_hot_keys(app, key) {
            return effects;
        }

        match key.code {
            KeyCode::Tab => {
                app.focus.next();
                return Vec::new();
            }
            KeyCode::BackTab => {
                app.focus.prev();
                return Vec::new();
            }
            _ => {}
        }

        if app.composition.f_table.get() {
            self.handle_table_keys(app, key);
        } else if app.composition.f_relation.get() {
            self.handle_relation_keys(app, key);
        } else if let Some(input) = app.composition.focused_input() {
            self.handle_input_keys(app, input, key);
        } else {
            return self.handle_button_keys(app, key);
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let pos = Position::new(mouse.column, mouse.row);
        let layout = self.layout;

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if layout.table_area.contains(pos) {
                    app.focus.focus(&app.composition.f_table);
                    if let Some(index) = self.hit_test_table(app, pos) {
                        app.composition.set_selected_row(Some(index));
                    }
                } else if layout.relation_area.contains(pos) && app.composition.selected_index().is_some() {
                    app.focus.focus(&app.composition.f_relation);
                    app.composition.cycle_relation();
                } else if layout.add_button_area.contains(pos) {
                    app.focus.focus(&app.composition.f_add_button);
                    app.add_relation();
                } else if layout.remove_button_area.contains(pos) {
                    app.remove_selected_relation();
                } else if layout.submit_button_area.contains(pos) {
                    app.focus.focus(&app.composition.f_submit_button);
                    return app.request_submit();
                } else {
                    let target = [
                        (layout.interval_area, FormInput::Interval),
                        (layout.service_a_area, FormInput::ServiceA),
                        (layout.service_b_area, FormInput::ServiceB),
                        (layout.expected_value_area, FormInput::ExpectedValue),
                    ]
                    .into_iter()
                    .find(|(area, input)| area.contains(pos) && app.composition.is_input_editable(*input));
                    if let Some((area, input)) = target {
                        app.focus.focus(app.composition.input_focus(input));
                        // Skip the left border, then undo the horizontal scroll
                        let offset = app.composition.input_state(input).scroll_offset(area.width.saturating_sub(2));
                        let column = pos.x.saturating_sub(area.x + 1) + offset;
                        app.composition.set_cursor_column(input, column);
                    }
                }
            }
            MouseEventKind::ScrollDown if layout.table_area.contains(pos) => app.composition.select_next_row(),
            MouseEventKind::ScrollUp if layout.table_area.contains(pos) => app.composition.select_previous_row(),
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let [table, editor, controls] = self.get_preferred_layout(app, rect)[..] else {
            return;
        };
        self.render_table(frame, table, app);
        self.render_editor(frame, editor, app);
        self.render_controls(frame, controls, app);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let theme = &*app.ctx.theme;
        let form = &app.composition;
        let mut hints = vec![("Ctrl+A", " Add "), ("Ctrl+D", " Remove "), ("Ctrl+S", " Submit ")];
        if form.f_table.get() {
            hints.push(("↑/↓", " Select "));
            hints.push(("Enter", " Edit "));
        } else if form.f_relation.get() {
            hints.push(("Space", " Toggle relation "));
        } else if form.focused_input().is_none() {
            hints.push(("Enter", " Activate "));
        }
        hints.push(("Tab", " Next field "));
        th::build_hint_spans(theme, &hints)
    }

    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        Layout::vertical([
            Constraint::Min(5),    // Relations table
            Constraint::Length(3), // Selected relation editor
            Constraint::Length(3), // Interval and buttons
        ])
        .split(area)
        .to_vec()
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::app::test_app;

    const LONG_NAME: &str = "svc-abcdefghijklmnopqrstuvwxyz-0123456789-TAILMARK";

    fn line_text(terminal: &Terminal<TestBackend>, y: u16) -> String {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.width).map(|x| buffer[(x, y)].symbol()).collect()
    }

    fn draw(terminal: &mut Terminal<TestBackend>, component: &mut CompositionComponent, app: &mut App) {
        terminal.draw(|frame| component.render(frame, frame.area(), app)).unwrap();
    }

    #[test]
    fn long_input_scrolls_to_keep_the_cursor_visible() {
        let mut app = test_app();
        let mut component = CompositionComponent::default();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();

        app.add_relation();
        app.composition.set_input_text(FormInput::ServiceA, LONG_NAME);
        app.composition.f_service_a.set(true);
        draw(&mut terminal, &mut component, &mut app);

        // Table takes rows 0..24; the editor text row sits inside its border
        let editor_row = line_text(&terminal, 25);
        assert!(editor_row.contains("0123456789-TAILMARK"), "{editor_row}");
        assert!(!editor_row.contains("svc-abc"), "{editor_row}");
        let cursor = terminal.get_cursor_position().unwrap();
        assert_eq!((cursor.x, cursor.y), (28, 25));

        for _ in 0..LONG_NAME.len() {
            app.composition.move_cursor_left(FormInput::ServiceA);
        }
        draw(&mut terminal, &mut component, &mut app);

        let editor_row = line_text(&terminal, 25);
        assert!(editor_row.contains("svc-abc"), "{editor_row}");
        assert!(!editor_row.contains("TAILMARK"), "{editor_row}");
        assert_eq!(terminal.get_cursor_position().unwrap().x, 1);
    }

    #[test]
    fn click_in_scrolled_input_lands_on_the_visible_character() {
        let mut app = test_app();
        let mut component = CompositionComponent::default();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();

        app.add_relation();
        app.composition.set_input_text(FormInput::ServiceA, LONG_NAME);
        app.composition.f_service_a.set(true);
        draw(&mut terminal, &mut component, &mut app);

        // Column 1 is the first visible character, 23 columns into the text
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 1,
            row: 25,
            modifiers: KeyModifiers::NONE,
        };
        component.handle_mouse_events(&mut app, click);
        assert_eq!(app.composition.input_state(FormInput::ServiceA).cursor_column(), 23);

        app.composition.insert_character(FormInput::ServiceA, '_');
        let row = app.composition.selected_row().unwrap();
        assert!(row.service_a.starts_with("svc-abcdefghijklmnopqrs_tuv"), "{}", row.service_a);
    }
}
