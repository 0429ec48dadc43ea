//! Shared styling for the panes

use crate::config::Config;
use ratatui::style::{Modifier, Style};

/// Resolved pane styles, built once from the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Pane titles and function-name headings.
    pub heading: Style,
    /// Diff emphasis and the at-PC instruction.
    pub emphasis: Style,
}

impl Theme {
    /// Resolve color names from the configuration into concrete styles.
    pub fn from_config(config: &Config) -> Self {
        Self {
            heading: Style::default().fg(config.colors.heading()).add_modifier(Modifier::BOLD),
            emphasis: Style::default().fg(config.colors.emphasis()).add_modifier(Modifier::BOLD),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
