// Ooga Workbench - Debug visualization for ooga-lang programs
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Configuration for the Ooga TUI
//!
//! User preferences live in `~/.ooga.toml`: where the execution service runs
//! and which colours the views use. Command line flags override the file.

use eyre::{Context, Result};
use ooga_engine::Highlight;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::Path, path::PathBuf, time::Duration};
use tracing::{debug, info, warn};

/// Default execution service endpoint
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:3001";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Execution service settings
    pub service: ServiceConfig,
    /// Colour themes
    pub theme: ThemeConfig,
}

/// Execution service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL; runs are posted to `<url>/run`
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Theme configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Current active theme name
    pub active: String,
    /// Available themes
    pub themes: HashMap<String, Theme>,
}

/// Individual theme definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Theme display name
    pub name: String,
    /// Theme description
    pub description: String,
    /// Color scheme for different UI elements
    pub colors: ColorScheme,
}

/// Color scheme definition.
///
/// Values are colour names (`light_blue`) or `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScheme {
    /// Focused panel border color
    pub focused_border: String,
    /// Unfocused panel border color
    pub unfocused_border: String,
    /// Heap node nobody selected
    pub neutral: String,
    /// Heap node that reaches the focus through parent links
    pub ancestor: String,
    /// Heap node reachable from the focus through child links
    pub descendant: String,
    /// The focused heap node
    pub current: String,
    /// Toggled stack node
    pub selected: String,
    /// Stack nodes of the thread that hit the breakpoint
    pub current_thread: String,
    /// Help text color
    pub help_text: String,
    /// Error/negative color
    pub error: String,
    /// Warning color
    pub warning: String,
    /// Information color
    pub info: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { url: DEFAULT_SERVICE_URL.to_string(), timeout_secs: 30 }
    }
}

impl ServiceConfig {
    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            focused_border: "cyan".to_string(),
            unfocused_border: "gray".to_string(),
            neutral: "gray".to_string(),
            ancestor: "#ffff99".to_string(),
            descendant: "light_blue".to_string(),
            current: "#ff0000".to_string(),
            selected: "light_blue".to_string(),
            current_thread: "#ff0000".to_string(),
            help_text: "yellow".to_string(),
            error: "red".to_string(),
            warning: "yellow".to_string(),
            info: "cyan".to_string(),
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        let mut themes = HashMap::new();

        themes.insert(
            "default".to_string(),
            Theme {
                name: "Default".to_string(),
                description: "Yellow ancestors, blue descendants, red focus".to_string(),
                colors: ColorScheme::default(),
            },
        );

        themes.insert(
            "dark".to_string(),
            Theme {
                name: "Dark".to_string(),
                description: "Dark theme with minimal colors".to_string(),
                colors: ColorScheme {
                    focused_border: "white".to_string(),
                    unfocused_border: "dark_gray".to_string(),
                    neutral: "dark_gray".to_string(),
                    ancestor: "yellow".to_string(),
                    descendant: "blue".to_string(),
                    current: "light_red".to_string(),
                    selected: "blue".to_string(),
                    current_thread: "light_red".to_string(),
                    help_text: "gray".to_string(),
                    error: "red".to_string(),
                    warning: "yellow".to_string(),
                    info: "white".to_string(),
                },
            },
        );

        themes.insert(
            "monokai".to_string(),
            Theme {
                name: "Monokai".to_string(),
                description: "Popular dark theme with vibrant colors".to_string(),
                colors: ColorScheme {
                    focused_border: "magenta".to_string(),
                    unfocused_border: "dark_gray".to_string(),
                    neutral: "gray".to_string(),
                    ancestor: "#e6db74".to_string(),
                    descendant: "#66d9ef".to_string(),
                    current: "#f92672".to_string(),
                    selected: "#a6e22e".to_string(),
                    current_thread: "#f92672".to_string(),
                    help_text: "cyan".to_string(),
                    error: "red".to_string(),
                    warning: "yellow".to_string(),
                    info: "cyan".to_string(),
                },
            },
        );

        Self { active: "default".to_string(), themes }
    }
}

impl Config {
    /// Get the config file path (~/.ooga.toml)
    pub fn config_path() -> Result<PathBuf> {
        let home =
            dirs::home_dir().ok_or_else(|| eyre::eyre!("Unable to determine home directory"))?;
        Ok(home.join(".ooga.toml"))
    }

    /// Load configuration from the default path, creating it if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            info!("Config file not found, creating default at {:?}", config_path);
            let default_config = Self::default();
            default_config.save_to_path(&config_path)?;
            return Ok(default_config);
        }

        Self::load_from_path(config_path)
    }

    /// Load configuration from a specific file
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path:?}"))?;

        let config: Self =
            toml::from_str(&content).wrap_err("Failed to parse config file as TOML")?;

        debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to_path(Self::config_path()?)
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content =
            toml::to_string_pretty(self).wrap_err("Failed to serialize config to TOML")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {path:?}"))?;

        debug!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get the currently active theme
    pub fn get_active_theme(&self) -> Option<&Theme> {
        self.theme.themes.get(&self.theme.active)
    }

    /// Colours of the active theme, or the built-in default when it is missing
    pub fn active_colors(&self) -> ColorScheme {
        match self.get_active_theme() {
            Some(theme) => theme.colors.clone(),
            None => {
                warn!("Theme '{}' not found, using default colors", self.theme.active);
                ColorScheme::default()
            }
        }
    }

    /// Switch to a different theme
    pub fn set_theme(&mut self, theme_name: &str) -> Result<()> {
        if !self.theme.themes.contains_key(theme_name) {
            return Err(eyre::eyre!("Theme '{}' not found", theme_name));
        }

        self.theme.active = theme_name.to_string();
        info!("Switched to theme: {}", theme_name);
        Ok(())
    }

    /// List available themes
    pub fn list_themes(&self) -> Vec<(&String, &Theme)> {
        self.theme.themes.iter().collect()
    }

    /// Convert color string to ratatui Color
    pub fn parse_color(color_str: &str) -> Color {
        if let Some(hex) = color_str.strip_prefix('#') {
            if let Some(color) = parse_hex(hex) {
                return color;
            }
        }

        match color_str.to_lowercase().as_str() {
            "black" => Color::Black,
            "red" => Color::Red,
            "green" => Color::Green,
            "yellow" => Color::Yellow,
            "blue" => Color::Blue,
            "magenta" => Color::Magenta,
            "cyan" => Color::Cyan,
            "gray" | "light_gray" => Color::Gray,
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

fn parse_hex(hex: &str) -> Option<Color> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

impl ColorScheme {
    /// Get focused border color
    pub fn focused_border(&self) -> Color {
        Config::parse_color(&self.focused_border)
    }

    /// Get unfocused border color
    pub fn unfocused_border(&self) -> Color {
        Config::parse_color(&self.unfocused_border)
    }

    /// Colour of a heap node in the given highlight state
    pub fn highlight(&self, highlight: Highlight) -> Color {
        match highlight {
            Highlight::Neutral => Config::parse_color(&self.neutral),
            Highlight::Ancestor => Config::parse_color(&self.ancestor),
            Highlight::Descendant => Config::parse_color(&self.descendant),
            Highlight::Current => Config::parse_color(&self.current),
        }
    }

    /// Get toggled stack node color
    pub fn selected(&self) -> Color {
        Config::parse_color(&self.selected)
    }

    /// Get current thread color
    pub fn current_thread(&self) -> Color {
        Config::parse_color(&self.current_thread)
    }

    /// Get help text color
    pub fn help_text(&self) -> Color {
        Config::parse_color(&self.help_text)
    }

    /// Get error color
    pub fn error(&self) -> Color {
        Config::parse_color(&self.error)
    }

    /// Get warning color
    pub fn warning(&self) -> Color {
        Config::parse_color(&self.warning)
    }

    /// Get info color
    pub fn info(&self) -> Color {
        Config::parse_color(&self.info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_and_hex_colors() {
        assert_eq!(Config::parse_color("light_blue"), Color::LightBlue);
        assert_eq!(Config::parse_color("Dark_Gray"), Color::DarkGray);
        assert_eq!(Config::parse_color("#ffff99"), Color::Rgb(0xff, 0xff, 0x99));
        assert_eq!(Config::parse_color("#FF0000"), Color::Rgb(0xff, 0, 0));
        assert_eq!(Config::parse_color("#ff00"), Color::Gray);
        assert_eq!(Config::parse_color("#gg0000"), Color::Gray);
        assert_eq!(Config::parse_color("no-such-color"), Color::Gray);
    }

    #[test]
    fn test_highlight_colors() {
        let colors = ColorScheme::default();
        assert_eq!(colors.highlight(Highlight::Current), Color::Rgb(0xff, 0, 0));
        assert_eq!(colors.highlight(Highlight::Ancestor), Color::Rgb(0xff, 0xff, 0x99));
        assert_eq!(colors.highlight(Highlight::Descendant), Color::LightBlue);
    }

    #[test]
    fn test_missing_theme_falls_back() {
        let mut config = Config::default();
        assert!(config.set_theme("solarized").is_err());
        config.theme.active = "solarized".to_string();
        assert_eq!(config.active_colors(), ColorScheme::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[service]\nurl = \"http://ooga:9000\"\n").unwrap();
        assert_eq!(config.service.url, "http://ooga:9000");
        assert_eq!(config.service.timeout_secs, 30);
        assert_eq!(config.theme.active, "default");
    }
}
