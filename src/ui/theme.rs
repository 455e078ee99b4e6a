//! Theme module - OS-aware light and dark mode color schemes

use gpui::{Hsla, WindowAppearance, rgb};

/// Color scheme for the application
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Main window background
    pub bg: Hsla,
    /// Background for the folder and settings rows
    pub bg_card: Hsla,
    /// Row background on hover
    pub bg_card_hover: Hsla,
    /// Primary text color
    pub text: Hsla,
    /// Secondary/muted text color
    pub text_muted: Hsla,
    /// Border color for rows and input boxes
    pub border: Hsla,
    /// Accent color (drop-target highlight, dialog focus)
    pub accent: Hsla,
    /// Start button color (green)
    pub success: Hsla,
    /// Start button hover color
    pub success_hover: Hsla,
    /// Stop button / error color (red)
    pub danger: Hsla,
    /// Stop button hover color
    pub danger_hover: Hsla,
    /// Progress bar track background
    pub progress_track: Hsla,
    /// Progress bar fill color
    pub progress_fill: Hsla,
}

impl Theme {
    /// Dark mode color scheme
    pub fn dark() -> Self {
        Self {
            bg: rgb(0x1b1b1f).into(),
            bg_card: rgb(0x27272c).into(),
            bg_card_hover: rgb(0x33333a).into(),
            text: rgb(0xf4f4f5).into(),
            text_muted: rgb(0xa1a1aa).into(),
            border: rgb(0x3f3f46).into(),
            accent: rgb(0x4f9cf9).into(),
            success: rgb(0x2fbf58).into(),
            success_hover: rgb(0x249946).into(),
            danger: rgb(0xe5484d).into(),
            danger_hover: rgb(0xbc3a3f).into(),
            progress_track: rgb(0x3f3f46).into(),
            progress_fill: rgb(0x4f9cf9).into(),
        }
    }

    /// Light mode color scheme
    pub fn light() -> Self {
        Self {
            bg: rgb(0xf4f4f5).into(),
            bg_card: rgb(0xffffff).into(),
            bg_card_hover: rgb(0xf1f5f9).into(),
            text: rgb(0x18181b).into(),
            text_muted: rgb(0x71717a).into(),
            border: rgb(0xe4e4e7).into(),
            accent: rgb(0x2f7ae5).into(),
            success: rgb(0x2fbf58).into(),
            success_hover: rgb(0x249946).into(),
            danger: rgb(0xe5484d).into(),
            danger_hover: rgb(0xbc3a3f).into(),
            progress_track: rgb(0xe4e4e7).into(),
            progress_fill: rgb(0x2f7ae5).into(),
        }
    }

    /// Get the appropriate theme based on window appearance
    pub fn from_appearance(appearance: WindowAppearance) -> Self {
        match appearance {
            WindowAppearance::Dark | WindowAppearance::VibrantDark => Self::dark(),
            WindowAppearance::Light | WindowAppearance::VibrantLight => Self::light(),
        }
    }
}
