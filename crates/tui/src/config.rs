//! Configuration system for MDB TUI
//!
//! Manages user preferences: pane colors and the RPC request timeout.

use eyre::{Context, Result};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Color scheme for the panes
    pub colors: ColorScheme,
    /// RPC request timeout in seconds.
    ///
    /// Step-out and continue block until the debuggee stops, so this is a
    /// backstop against a dead server rather than a liveness bound.
    pub rpc_timeout_secs: u64,
}

/// Color scheme definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorScheme {
    /// Pane headings and function names
    pub heading: String,
    /// Diff emphasis and the at-PC instruction
    pub emphasis: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            colors: ColorScheme { heading: "blue".to_string(), emphasis: "blue".to_string() },
            rpc_timeout_secs: 3600,
        }
    }
}

impl Config {
    /// Get the config file path (`~/.mdb.toml`)
    pub fn config_path() -> Result<PathBuf> {
        let home =
            dirs::home_dir().ok_or_else(|| eyre::eyre!("Unable to determine home directory"))?;
        Ok(home.join(".mdb.toml"))
    }

    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            info!("Config file not found, creating default at {:?}", config_path);
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config);
        }

        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path:?}"))?;

        let config: Self =
            toml::from_str(&content).with_context(|| "Failed to parse config file as TOML")?;

        debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config to TOML")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {config_path:?}"))?;

        debug!("Saved configuration to {:?}", config_path);
        Ok(())
    }

    /// The RPC request timeout as a duration.
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }

    /// Convert color string to ratatui Color
    pub fn parse_color(color_str: &str) -> Color {
        match color_str.to_lowercase().as_str() {
            "black" => Color::Black,
            "red" => Color::Red,
            "green" => Color::Green,
            "yellow" => Color::Yellow,
            "blue" => Color::Blue,
            "magenta" => Color::Magenta,
            "cyan" => Color::Cyan,
            "gray" => Color::Gray,
            "dark_gray" => Color::DarkGray,
            "light_red" => Color::LightRed,
            "light_green" => Color::LightGreen,
            "light_yellow" => Color::LightYellow,
            "light_blue" => Color::LightBlue,
            "light_magenta" => Color::LightMagenta,
            "light_cyan" => Color::LightCyan,
            "white" => Color::White,
            _ => {
                warn!("Unknown color '{}', using default gray", color_str);
                Color::Gray
            }
        }
    }
}

impl ColorScheme {
    /// Get heading color
    pub fn heading(&self) -> Color {
        Config::parse_color(&self.heading)
    }

    /// Get emphasis color
    pub fn emphasis(&self) -> Color {
        Config::parse_color(&self.emphasis)
    }
}
