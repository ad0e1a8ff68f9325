use std::fmt::Debug;

use ratatui::style::{Color, Modifier, Style};

/// Colors the composer screen is painted with, named by where they appear.
#[derive(Debug, Clone)]
pub struct ThemeRoles {
    /// Text drawn on top of the filled Submit button.
    pub background: Color,
    /// Panels and input boxes.
    pub surface: Color,
    /// Submit while a request is in flight.
    pub surface_muted: Color,
    pub border: Color,

    pub text: Color,
    /// Panel titles and table headers.
    pub text_secondary: Color,
    /// Hints, disabled inputs and placeholder cells.
    pub text_muted: Color,

    /// Submit button fill and hint keys.
    pub accent_primary: Color,
    /// Add and Remove button labels.
    pub accent_secondary: Color,

    pub info: Color,
    /// Accepted submission in the status modal.
    pub success: Color,
    pub warning: Color,
    /// Failed submission, invalid input.
    pub error: Color,

    /// Selected relation row.
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub focus: Color,

    /// Dimmed backdrop behind the status modal.
    pub modal_bg: Color,

    pub table_row_even: Color,
    pub table_row_odd: Color,
}

/// A palette plus the styles the components build from it.
pub trait Theme: Send + Sync + Debug {
    fn roles(&self) -> &ThemeRoles;

    fn text_primary_style(&self) -> Style {
        Style::default().fg(self.roles().text)
    }
    fn text_secondary_style(&self) -> Style {
        Style::default().fg(self.roles().text_secondary)
    }
    fn text_muted_style(&self) -> Style {
        Style::default().fg(self.roles().text_muted)
    }

    /// Focused widgets get the focus color on their border.
    fn border_style(&self, focused: bool) -> Style {
        let color = if focused { self.roles().focus } else { self.roles().border };
        Style::default().fg(color)
    }

    fn selection_style(&self) -> Style {
        Style::default().fg(self.roles().selection_fg).bg(self.roles().selection_bg)
    }

    fn modal_background_style(&self) -> Style {
        Style::default().bg(self.roles().modal_bg)
    }

    // Activity log levels and the status modal
    fn status_info(&self) -> Style {
        Style::default().fg(self.roles().info)
    }
    fn status_success(&self) -> Style {
        Style::default().fg(self.roles().success)
    }
    fn status_warning(&self) -> Style {
        Style::default().fg(self.roles().warning)
    }
    fn status_error(&self) -> Style {
        Style::default().fg(self.roles().error)
    }

    fn accent_emphasis_style(&self) -> Style {
        Style::default().fg(self.roles().accent_primary).add_modifier(Modifier::BOLD)
    }
}
