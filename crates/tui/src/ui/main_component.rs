use composer_types::{Effect, Modal, Msg};
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::widgets::Clear;
use ratatui::{
    prelude::*,
    style::Style,
    widgets::{Block, Paragraph},
};

use super::components::{Component, CompositionComponent, LogsComponent, StatusModal};
use super::theme::theme_helpers as th;
use super::utils::centered_min_max;
use crate::app::App;

pub struct ModalLayout(Box<dyn Fn(Rect) -> Rect>);

impl std::fmt::Debug for ModalLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ModalLayout")
    }
}

type ModalView = (Box<dyn Component>, ModalLayout);

impl std::fmt::Debug for dyn Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Component")
    }
}

#[derive(Debug)]
pub struct MainView {
    /// Relation editor
    pub content_view: Box<dyn Component>,
    /// Currently open modal component
    pub modal_view: Option<ModalView>,
    /// Activity panel
    pub logs_view: LogsComponent,

    /// the widget_id of the focus just before a modal is opened
    transient_focus_id: Option<usize>,
}

impl Default for MainView {
    fn default() -> Self {
        Self::new(Box::new(CompositionComponent::default()))
    }
}

impl MainView {
    pub fn new(content_view: Box<dyn Component>) -> Self {
        Self {
            content_view,
            modal_view: None,
            logs_view: LogsComponent,
            transient_focus_id: None,
        }
    }

    /// Update the open modal kind (use None to clear).
    ///
    /// Not meant to be called directly; emit `Effect::ShowModal` or
    /// `Effect::CloseModal` instead.
    pub fn set_open_modal_kind(&mut self, app: &mut App, modal: Option<Modal>) {
        if let Some(modal_kind) = modal.as_ref() {
            let modal_view: ModalView = match modal_kind {
                Modal::Status => (
                    Box::new(StatusModal::default()),
                    ModalLayout(Box::new(|rect| {
                        centered_min_max(45, 35, Rect::new(0, 0, 50, 10), Rect::new(0, 0, 100, 16), rect)
                    })),
                ),
            };
            self.modal_view = Some(modal_view);
            // save the current focus to restore when the modal is closed
            if self.transient_focus_id.is_none() {
                self.transient_focus_id = app.focus.focused().map(|focus| focus.widget_id());
            }
        } else {
            self.modal_view = None;
        }
        app.open_modal_kind = modal;
    }

    pub fn restore_focus(&mut self, app: &mut App) {
        if let Some(id) = self.transient_focus_id
            && app.open_modal_kind.is_none()
        {
            app.focus.by_widget_id(id);
            self.transient_focus_id = None;
        }
        if app.focus.focused().is_none() {
            app.focus.first();
        }
    }
}

impl Component for MainView {
    fn handle_message(&mut self, app: &mut App, msg: Msg) -> Vec<Effect> {
        let mut effects = app.update(&msg);
        match self.modal_view.as_mut() {
            Some((modal, _)) => effects.extend(modal.handle_message(app, msg)),
            None => effects.extend(self.content_view.handle_message(app, msg)),
        }
        effects
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        // The notification is blocking: nothing reaches the form while it is open
        if let Some((modal, _)) = self.modal_view.as_mut() {
            return modal.handle_key_events(app, key);
        }
        self.content_view.handle_key_events(app, key)
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if let Some((modal, _)) = self.modal_view.as_mut() {
            return modal.handle_mouse_events(app, mouse);
        }
        self.content_view.handle_mouse_events(app, mouse)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        // Fill the entire background with the theme's background color for consistency
        let bg_fill = Paragraph::new("").style(Style::default().bg(app.ctx.theme.roles().background));
        frame.render_widget(bg_fill, area);

        let layout = self.get_preferred_layout(app, area);
        render_title(frame, layout[0], app);
        self.content_view.render(frame, layout[2], app);
        self.logs_view.render(frame, layout[3], app);

        let hint_spans: Vec<Span> = self.get_hint_spans(app);
        let hints_widget = Paragraph::new(Line::from(hint_spans)).style(app.ctx.theme.text_muted_style());
        frame.render_widget(hints_widget, layout[1]);

        if let Some((modal, position)) = self.modal_view.as_mut() {
            render_overlay(frame, app);
            let modal_area = position.0(area);
            frame.render_widget(Clear, modal_area);
            modal.render(frame, modal_area, app);
        }
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let mut hint_spans: Vec<Span> = vec![Span::styled("Hints: ", app.ctx.theme.text_muted_style())];

        if let Some((modal, _)) = self.modal_view.as_ref() {
            hint_spans.extend(modal.get_hint_spans(app));
            return hint_spans;
        }

        hint_spans.extend(self.content_view.get_hint_spans(app));
        hint_spans.extend(th::build_hint_spans(&*app.ctx.theme, &[("Ctrl+Q", " Quit ")]));
        hint_spans
    }

    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        let [title, body, hints] = Layout::vertical([
            Constraint::Length(1), // Title bar
            Constraint::Min(1),    // Editor and logs
            Constraint::Length(1), // Hints bar
        ])
        .areas(area);

        // Wide terminals put the activity log beside the editor
        let [main, logs] = if body.width >= 120 {
            Layout::horizontal([Constraint::Percentage(72), Constraint::Fill(1)]).areas(body)
        } else {
            Layout::vertical([Constraint::Percentage(75), Constraint::Fill(1)]).areas(body)
        };

        vec![
            title, // Title bar
            hints, // Hints bar
            main,  // Relation editor
            logs,  // Activity log
        ]
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &*app.ctx.theme;
    let line = Line::from(vec![
        Span::styled(" Service Composer ", theme.accent_emphasis_style()),
        Span::styled(format!(" {}", app.ctx.client.base_url()), theme.text_muted_style()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Dims everything behind an open modal.
fn render_overlay(frame: &mut Frame, app: &mut App) {
    frame.render_widget(Block::default().style(app.ctx.theme.modal_background_style()).dim(), frame.area());
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::app::test_app;

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn open_notification_blocks_form_input() {
        let mut app = test_app();
        let mut view = MainView::default();
        view.set_open_modal_kind(&mut app, Some(Modal::Status));

        view.handle_key_events(&mut app, ctrl('a'));
        assert!(app.composition.rows().is_empty());

        let effects = view.handle_key_events(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(effects, vec![Effect::CloseModal]);

        view.set_open_modal_kind(&mut app, None);
        view.handle_key_events(&mut app, ctrl('a'));
        assert_eq!(app.composition.rows().len(), 1);
    }

    #[test]
    fn renders_editor_activity_and_notification() {
        let mut app = test_app();
        let mut view = MainView::default();
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();

        app.add_relation();
        app.status_modal.show_status("Composition saved and execution started");
        view.set_open_modal_kind(&mut app, Some(Modal::Status));
        terminal.draw(|frame| view.render(frame, frame.area(), &mut app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Relations (1)"));
        assert!(text.contains("Activity"));
        assert!(text.contains("Composition saved and execution started"));
    }
}
