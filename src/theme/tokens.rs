use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::ThemeError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    Dark,
    Light,
}

impl ThemeName {
    pub const ALL: [ThemeName; 2] = [ThemeName::Dark, ThemeName::Light];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Dark => "dark",
            ThemeName::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeName::Dark => ThemeName::Light,
            ThemeName::Light => ThemeName::Dark,
        }
    }

    pub fn from_prefers_dark(prefers_dark: bool) -> Self {
        if prefers_dark {
            ThemeName::Dark
        } else {
            ThemeName::Light
        }
    }

    /// Body marker class, e.g. `theme-dark`.
    pub fn body_class(&self) -> String {
        format!("theme-{}", self.as_str())
    }

    pub fn tokens(&self) -> &'static ThemeTokens {
        match self {
            ThemeName::Dark => &DARK,
            ThemeName::Light => &LIGHT,
        }
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeName {
    type Err = ThemeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "dark" => Ok(ThemeName::Dark),
            "light" => Ok(ThemeName::Light),
            other => Err(ThemeError::UnknownTheme(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeTokens {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub background: &'static str,
    pub surface: &'static str,
    pub text: &'static str,
    pub text_secondary: &'static str,
    pub border: &'static str,
    pub icon: &'static str,
}

impl ThemeTokens {
    /// CSS custom properties written on the document root, in write order.
    pub fn css_properties(&self) -> [(&'static str, &'static str); 8] {
        [
            ("--color-primary", self.primary),
            ("--color-secondary", self.secondary),
            ("--color-accent", self.accent),
            ("--color-background", self.background),
            ("--color-surface", self.surface),
            ("--color-text", self.text),
            ("--color-text-secondary", self.text_secondary),
            ("--color-border", self.border),
        ]
    }
}

pub static DARK: ThemeTokens = ThemeTokens {
    primary: "#00ff41",
    secondary: "#ff4757",
    accent: "#5352ed",
    background: "linear-gradient(45deg, #0f0f23, #1a1a2e, #16213e)",
    surface: "rgba(26, 26, 46, 0.9)",
    text: "#ffffff",
    text_secondary: "#cccccc",
    border: "#00ff41",
    icon: "🌙",
};

pub static LIGHT: ThemeTokens = ThemeTokens {
    primary: "#2d5a87",
    secondary: "#e74c3c",
    accent: "#9b59b6",
    background: "linear-gradient(45deg, #f8f9fa, #e9ecef, #dee2e6)",
    surface: "rgba(255, 255, 255, 0.95)",
    text: "#2c3e50",
    text_secondary: "#6c757d",
    border: "#2d5a87",
    icon: "☀️",
};
