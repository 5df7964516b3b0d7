//! Terminal rendering of the settings page choices.

use crate::app::{AccentColor, GrayColor, Radius, Scaling, ThemeSettings};
use crate::entities::RunStatus;
use ratatui::style::Color;
use ratatui::widgets::BorderType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub accent: Color,
    /// Secondary text and dimmed controls.
    pub muted: Color,
    /// Background of every other table row.
    pub stripe: Color,
    pub border_type: BorderType,
    pub column_spacing: u16,
    pub row_height: u16,
}

impl Theme {
    pub fn from_settings(settings: &ThemeSettings) -> Self {
        let (muted, stripe) = gray_palette(settings.gray);
        Self {
            accent: accent_color(settings.accent),
            muted,
            stripe,
            border_type: border_type(settings.radius),
            column_spacing: column_spacing(settings.scaling),
            row_height: if settings.scaling == Scaling::P110 { 2 } else { 1 },
        }
    }
}

pub fn accent_color(accent: AccentColor) -> Color {
    match accent {
        AccentColor::Tomato => Color::Rgb(229, 77, 46),
        AccentColor::Crimson => Color::Rgb(233, 61, 130),
        AccentColor::Plum => Color::Rgb(171, 74, 186),
        AccentColor::Violet => Color::Rgb(110, 86, 207),
        AccentColor::Indigo => Color::Rgb(62, 99, 221),
        AccentColor::Blue => Color::Rgb(0, 144, 255),
        AccentColor::Cyan => Color::Rgb(0, 162, 199),
        AccentColor::Teal => Color::Rgb(18, 165, 148),
        AccentColor::Grass => Color::Rgb(70, 167, 88),
        AccentColor::Amber => Color::Rgb(255, 197, 61),
    }
}

/// `(muted text, stripe background)`
fn gray_palette(gray: GrayColor) -> (Color, Color) {
    match gray {
        GrayColor::Gray => (Color::Rgb(141, 141, 141), Color::Rgb(34, 34, 34)),
        GrayColor::Mauve => (Color::Rgb(142, 140, 153), Color::Rgb(35, 33, 37)),
        GrayColor::Slate => (Color::Rgb(139, 141, 152), Color::Rgb(33, 34, 37)),
        GrayColor::Sage => (Color::Rgb(137, 142, 135), Color::Rgb(31, 35, 33)),
        GrayColor::Olive => (Color::Rgb(139, 141, 134), Color::Rgb(32, 35, 31)),
        GrayColor::Sand => (Color::Rgb(143, 142, 136), Color::Rgb(35, 34, 32)),
    }
}

fn border_type(radius: Radius) -> BorderType {
    match radius {
        Radius::None | Radius::Small => BorderType::Plain,
        Radius::Medium | Radius::Large => BorderType::Rounded,
        Radius::Full => BorderType::Double,
    }
}

fn column_spacing(scaling: Scaling) -> u16 {
    match scaling {
        Scaling::P90 | Scaling::P95 => 1,
        Scaling::P100 | Scaling::P105 => 2,
        Scaling::P110 => 3,
    }
}

pub fn status_color(status: RunStatus) -> Color {
    match status {
        RunStatus::Success => Color::Green,
        RunStatus::Failed => Color::Red,
        RunStatus::Running => Color::Yellow,
        RunStatus::Pending => Color::Blue,
        RunStatus::Cancelled | RunStatus::Unknown => Color::DarkGray,
    }
}

pub fn status_icon(status: RunStatus) -> &'static str {
    match status {
        RunStatus::Success => "✓",
        RunStatus::Failed => "✗",
        RunStatus::Running => "⟳",
        RunStatus::Pending => "◌",
        RunStatus::Cancelled => "⊘",
        RunStatus::Unknown => "?",
    }
}
