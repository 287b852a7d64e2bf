use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const SETTINGS_COLLECTION: &str = "settings";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Midnight,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    #[default]
    Red,
    Blue,
    Orange,
    Purple,
    Green,
}

impl Accent {
    pub const ALL: [Accent; 5] = [
        Accent::Red,
        Accent::Blue,
        Accent::Orange,
        Accent::Purple,
        Accent::Green,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub theme_mode: ThemeMode,
    pub accent: Accent,
    pub reduce_motion: bool,
    pub compact_mode: bool,
    pub show_motivation_on_dashboard: bool,
    pub show_employee_strip: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            theme_mode: ThemeMode::Dark,
            accent: Accent::Red,
            reduce_motion: false,
            compact_mode: false,
            show_motivation_on_dashboard: true,
            show_employee_strip: true,
        }
    }
}

/// A stored settings document where any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialUserSettings {
    pub theme_mode: Option<ThemeMode>,
    pub accent: Option<Accent>,
    pub reduce_motion: Option<bool>,
    pub compact_mode: Option<bool>,
    pub show_motivation_on_dashboard: Option<bool>,
    pub show_employee_strip: Option<bool>,
}

impl UserSettings {
    /// Defaults overlaid with whatever fields the partial document carries.
    pub fn merged(partial: PartialUserSettings) -> Self {
        let defaults = Self::default();
        Self {
            theme_mode: partial.theme_mode.unwrap_or(defaults.theme_mode),
            accent: partial.accent.unwrap_or(defaults.accent),
            reduce_motion: partial.reduce_motion.unwrap_or(defaults.reduce_motion),
            compact_mode: partial.compact_mode.unwrap_or(defaults.compact_mode),
            show_motivation_on_dashboard: partial
                .show_motivation_on_dashboard
                .unwrap_or(defaults.show_motivation_on_dashboard),
            show_employee_strip: partial
                .show_employee_strip
                .unwrap_or(defaults.show_employee_strip),
        }
    }

    /// Set a single field by its wire name, e.g. `accent=blue`.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "themeMode" | "theme_mode" | "theme" => self.theme_mode = value.parse()?,
            "accent" => self.accent = value.parse()?,
            "reduceMotion" | "reduce_motion" => self.reduce_motion = parse_flag(key, value)?,
            "compactMode" | "compact_mode" => self.compact_mode = parse_flag(key, value)?,
            "showMotivationOnDashboard" | "show_motivation_on_dashboard" => {
                self.show_motivation_on_dashboard = parse_flag(key, value)?
            }
            "showEmployeeStrip" | "show_employee_strip" => {
                self.show_employee_strip = parse_flag(key, value)?
            }
            _ => return Err(format!("Unknown setting '{}'", key)),
        }
        Ok(())
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "true" | "on" | "1" | "yes" => Ok(true),
        "false" | "off" | "0" | "no" => Ok(false),
        _ => Err(format!("Setting '{}' expects on/off, got '{}'", key, value)),
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(ThemeMode::Dark),
            "midnight" => Ok(ThemeMode::Midnight),
            "light" => Ok(ThemeMode::Light),
            _ => Err(format!("Unknown theme mode '{}'", s)),
        }
    }
}

impl FromStr for Accent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "red" => Ok(Accent::Red),
            "blue" => Ok(Accent::Blue),
            "orange" => Ok(Accent::Orange),
            "purple" => Ok(Accent::Purple),
            "green" => Ok(Accent::Green),
            _ => Err(format!("Unknown accent '{}'", s)),
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Midnight => "midnight",
            ThemeMode::Light => "light",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Accent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Accent::Red => "red",
            Accent::Blue => "blue",
            Accent::Orange => "orange",
            Accent::Purple => "purple",
            Accent::Green => "green",
        };
        f.write_str(name)
    }
}
