use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{List, ListItem},
};

use super::state::LogLevel;
use crate::app::App;
use crate::ui::components::Component;
use crate::ui::theme::theme_helpers::block;

/// Read-only panel listing the most recent activity.
#[derive(Debug, Default)]
pub struct LogsComponent;

impl Component for LogsComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let block = block(theme, Some("Activity"), false);
        let visible = block.inner(rect).height as usize;

        let skip = app.logs.len().saturating_sub(visible);
        let items = app
            .logs
            .entries()
            .skip(skip)
            .map(|entry| {
                let (marker, style) = match entry.level {
                    LogLevel::Info => ("• ", theme.status_info()),
                    LogLevel::Warn => ("! ", theme.status_warning()),
                    LogLevel::Error => ("✘ ", theme.status_error()),
                };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, style),
                    Span::styled(entry.msg.clone(), theme.text_primary_style()),
                ]))
            })
            .collect::<Vec<ListItem>>();

        frame.render_widget(List::new(items).block(block), rect);
    }
}
