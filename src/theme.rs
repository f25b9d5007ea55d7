//! Page variants. They differ only in palette, so one page template takes a
//! `Theme` instead of keeping a copy of the markup per variant.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Meadow,
    Emerald,
    Harvest,
}

/// CSS custom property values for a theme.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub primary: &'static str,
    pub primary_dark: &'static str,
    pub accent: &'static str,
    pub surface: &'static str,
    pub background: &'static str,
    pub text: &'static str,
}

impl Theme {
    pub fn palette(self) -> Palette {
        match self {
            Theme::Meadow => Palette {
                primary: "#15803d",
                primary_dark: "#166534",
                accent: "#bbf7d0",
                surface: "#dcfce7",
                background: "#f0fdf4",
                text: "#1f2937",
            },
            Theme::Emerald => Palette {
                primary: "#059669",
                primary_dark: "#065f46",
                accent: "#a7f3d0",
                surface: "#d1fae5",
                background: "#ecfdf5",
                text: "#111827",
            },
            Theme::Harvest => Palette {
                primary: "#b45309",
                primary_dark: "#78350f",
                accent: "#fde68a",
                surface: "#fef3c7",
                background: "#fffbeb",
                text: "#292524",
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Meadow => "meadow",
            Theme::Emerald => "emerald",
            Theme::Harvest => "harvest",
        }
    }

    /// The `:root` block that the stylesheet reads its colours from.
    pub fn css_variables(self) -> String {
        let p = self.palette();
        format!(
            ":root {{ --primary: {}; --primary-dark: {}; --accent: {}; --surface: {}; --background: {}; --text: {}; }}",
            p.primary, p.primary_dark, p.accent, p.surface, p.background, p.text
        )
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "meadow" => Ok(Theme::Meadow),
            "emerald" => Ok(Theme::Emerald),
            "harvest" => Ok(Theme::Harvest),
            other => Err(format!(
                "unknown theme '{}', expected one of: meadow, emerald, harvest",
                other
            )),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
