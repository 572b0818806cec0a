//! Color themes for htnx
//!
//! Two palettes, selectable via `--theme`.

use ratatui::style::Color;
use std::fmt;

/// Available color themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// Teal on slate (default)
    #[default]
    Hoosat,
    /// Nord-inspired muted colors
    Nord,
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hoosat" | "teal" => Ok(Theme::Hoosat),
            "nord" => Ok(Theme::Nord),
            _ => Err(format!("Unknown theme '{s}'. Available: hoosat, nord")),
        }
    }
}

impl Theme {
    /// Get the color scheme for this theme
    pub fn colors(&self) -> ColorScheme {
        match self {
            Theme::Hoosat => ColorScheme::hoosat(),
            Theme::Nord => ColorScheme::nord(),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Hoosat => write!(f, "hoosat"),
            Theme::Nord => write!(f, "nord"),
        }
    }
}

/// Color scheme for a theme
#[derive(Debug, Clone, Copy)]
pub struct ColorScheme {
    /// Primary text color
    pub text: Color,
    /// Labels and secondary info
    pub text_dim: Color,
    /// Active tab, links, highlighted values
    pub accent: Color,
    /// Card borders
    pub border: Color,
    /// "accepted" badge
    pub ok: Color,
    /// "not accepted" badge, error banners
    pub error: Color,
    /// Value that just changed
    pub flash: Color,
}

impl ColorScheme {
    pub fn hoosat() -> Self {
        Self {
            text: Color::White,
            text_dim: Color::Rgb(148, 163, 184),
            accent: Color::Rgb(20, 184, 166),
            border: Color::Rgb(51, 65, 85),
            ok: Color::Rgb(34, 197, 94),
            error: Color::Rgb(239, 68, 68),
            flash: Color::Rgb(94, 234, 212),
        }
    }

    pub fn nord() -> Self {
        Self {
            text: Color::Rgb(236, 239, 244),
            text_dim: Color::Rgb(129, 161, 193),
            accent: Color::Rgb(136, 192, 208),
            border: Color::Rgb(76, 86, 106),
            ok: Color::Rgb(163, 190, 140),
            error: Color::Rgb(191, 97, 106),
            flash: Color::Rgb(235, 203, 139),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::hoosat()
    }
}
