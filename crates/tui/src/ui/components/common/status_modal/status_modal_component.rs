use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use composer_types::Effect;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::app::App;
use crate::ui::components::Component;
use crate::ui::theme::theme_helpers::{ButtonType, block_with_severity, build_hint_spans, render_button};

const BUTTON_WIDTH: u16 = 12;

/// Blocking notification: swallows all input until dismissed.
#[derive(Default, Debug, Clone)]
pub struct StatusModal {
    ok_button_area: Rect,
}

impl Component for StatusModal {
    fn handle_key_events(&mut self, _app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => vec![Effect::CloseModal],
            _ => Vec::new(),
        }
    }

    fn handle_mouse_events(&mut self, _app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let MouseEvent { kind, column, row, .. } = mouse;
        if kind == MouseEventKind::Down(MouseButton::Left) && self.ok_button_area.contains(Position::new(column, row)) {
            return vec![Effect::CloseModal];
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let state = &app.status_modal;
        let block = block_with_severity(theme, state.severity(), Some(state.title()));
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let [message_rect, _, button_rect] = self.get_preferred_layout(app, inner)[..] else {
            return;
        };

        let lines = state
            .message()
            .lines()
            .map(|line| Line::from(Span::styled(line.to_string(), theme.text_primary_style())))
            .collect::<Vec<Line>>();
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), message_rect);

        let x = button_rect.x + button_rect.width.saturating_sub(BUTTON_WIDTH) / 2;
        let ok_area = Rect::new(x, button_rect.y, BUTTON_WIDTH.min(button_rect.width), button_rect.height);
        render_button(frame, ok_area, "OK", theme, true, true, ButtonType::Primary);
        self.ok_button_area = ok_area;
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        build_hint_spans(&*app.ctx.theme, &[("Enter/Esc", " Dismiss ")])
    }

    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        Layout::vertical([
            Constraint::Min(1),    // Message
            Constraint::Length(1), // Spacer
            Constraint::Length(3), // Button
        ])
        .split(area)
        .to_vec()
    }
}
