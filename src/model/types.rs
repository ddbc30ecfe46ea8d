//! Core type definitions

use embedded_graphics::pixelcolor::Rgb888;

/// Playback state of the appliance.
///
/// Transitions happen only through controller commands; the auto-advance
/// poll corrects `Playing` back to the next track when the decode process
/// exits on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Stopped,
    Playing,
    Paused,
}

impl PlayerState {
    pub fn label(&self) -> &'static str {
        match self {
            PlayerState::Stopped => "Stopped",
            PlayerState::Playing => "Playing",
            PlayerState::Paused => "Paused",
        }
    }
}

/// Background/accent color pair derived from the current artwork.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Rgb888,
    pub accent: Rgb888,
}

impl Default for Theme {
    fn default() -> Self {
        // Fixed fallback when a track carries no usable artwork
        Self {
            background: Rgb888::new(18, 24, 38),
            accent: Rgb888::new(64, 160, 128),
        }
    }
}
