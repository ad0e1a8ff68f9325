//! Theme styling module for the TUI UI layer.
//!
//! Defines the Nord palettes, semantic theme roles, and helper builders for
//! Ratatui widgets and styles. Prefer these helpers over hard-coding colors.

use std::env;

use tracing::debug;

pub mod nord;
pub mod roles;
pub mod theme_helpers;

pub use nord::{NordTheme, NordThemeHighContrast};
pub use roles::Theme;

/// Environment variable selecting the palette.
pub const THEME_ENV: &str = "COMPOSER_THEME";

/// Selects a theme from [`THEME_ENV`], defaulting to Nord.
pub fn load() -> Box<dyn Theme> {
    let requested = env::var(THEME_ENV).unwrap_or_default();
    resolve(requested.trim())
}

fn resolve(name: &str) -> Box<dyn Theme> {
    match name.to_ascii_lowercase().as_str() {
        "nord-high-contrast" | "nord_hc" => Box::new(NordThemeHighContrast::new()),
        "" | "nord" => Box::new(NordTheme::new()),
        other => {
            debug!(theme = other, "unknown theme requested; using nord");
            Box::new(NordTheme::new())
        }
    }
}
