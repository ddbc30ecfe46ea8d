//! View module - display compositing
//!
//! Renders playback state into an RGB frame and pushes every finished frame
//! to the display driver. Organized into submodules:
//!
//! - `canvas`: RGB frame buffer with an embedded-graphics draw target
//! - `utils`: text measurement and truncation
//! - `now_playing`: base layout (artwork, titles, state marker)
//! - `overlays`: volume side panel and pause scrim

mod canvas;
mod now_playing;
mod overlays;
mod utils;

pub use canvas::Canvas;
pub use overlays::{OVERLAY_DURATION, VolumeOverlay};
pub use utils::{text_width, truncate_to_width};

use std::time::Instant;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_10X20};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use image::RgbImage;

use crate::display::DisplayDriver;
use crate::model::{PlayerState, TrackMetadata};

/// Owns the pixel canvas and composes the player screens.
///
/// Render calls are idempotent: the same inputs produce the same frame, and
/// each call notifies the display driver exactly once.
pub struct Compositor {
    canvas: Canvas,
    driver: Box<dyn DisplayDriver>,
    overlay: VolumeOverlay,
}

impl Compositor {
    pub fn new(driver: Box<dyn DisplayDriver>, width: u32, height: u32) -> Self {
        Self {
            canvas: Canvas::new(width, height),
            driver,
            overlay: VolumeOverlay::new(),
        }
    }

    /// Record a volume change so the timed overlay shows on the next renders.
    pub fn note_volume_change(&mut self) {
        self.overlay.touch(Instant::now());
    }

    pub fn render_splash(&mut self) {
        self.canvas.fill(crate::model::Theme::default().background);

        let center_x = self.canvas.width() as i32 / 2;
        let center_y = self.canvas.height() as i32 / 2;

        let name = "musicbox";
        let name_w = text_width(name, &FONT_10X20) as i32;
        Text::with_baseline(
            name,
            Point::new(center_x - name_w / 2, center_y - 24),
            MonoTextStyle::new(&FONT_10X20, Rgb888::WHITE),
            Baseline::Top,
        )
        .draw(&mut self.canvas)
        .ok();

        let tagline = "loading...";
        let tagline_w = text_width(tagline, &FONT_6X10) as i32;
        Text::with_baseline(
            tagline,
            Point::new(center_x - tagline_w / 2, center_y + 4),
            MonoTextStyle::new(&FONT_6X10, crate::model::Theme::default().accent),
            Baseline::Top,
        )
        .draw(&mut self.canvas)
        .ok();

        self.present();
    }

    pub fn render_now_playing(
        &mut self,
        state: PlayerState,
        volume: u8,
        metadata: &TrackMetadata,
        force_volume_overlay: bool,
    ) {
        now_playing::draw(&mut self.canvas, state, metadata);

        if state == PlayerState::Paused {
            overlays::draw_pause(&mut self.canvas);
        }

        if force_volume_overlay || self.overlay.visible_at(Instant::now()) {
            overlays::draw_volume_panel(&mut self.canvas, volume, metadata.theme.accent);
        }

        self.present();
    }

    /// Blank the panel; the last step of shutdown.
    pub fn clear(&mut self) {
        self.canvas.fill(Rgb888::BLACK);
        self.present();
    }

    /// The most recently composed frame.
    pub fn frame(&self) -> &RgbImage {
        self.canvas.frame()
    }

    fn present(&mut self) {
        if let Err(e) = self.driver.present(self.canvas.frame()) {
            tracing::warn!(error = %e, "Display driver rejected frame");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::NullDisplay;

    fn compositor() -> Compositor {
        Compositor::new(Box::new(NullDisplay), 320, 240)
    }

    #[test]
    fn volume_panel_absent_until_forced_or_touched() {
        let mut comp = compositor();
        let metadata = TrackMetadata::default();

        comp.render_now_playing(PlayerState::Playing, 100, &metadata, false);
        let untouched = comp.frame().clone();

        comp.render_now_playing(PlayerState::Playing, 100, &metadata, true);
        assert_ne!(comp.frame().as_raw(), untouched.as_raw());
    }

    #[test]
    fn volume_change_shows_the_panel_without_forcing() {
        let mut comp = compositor();
        let metadata = TrackMetadata::default();

        comp.render_now_playing(PlayerState::Playing, 50, &metadata, false);
        let before = comp.frame().clone();

        comp.note_volume_change();
        comp.render_now_playing(PlayerState::Playing, 50, &metadata, false);
        assert_ne!(comp.frame().as_raw(), before.as_raw());
    }

    #[test]
    fn renders_are_idempotent() {
        let mut comp = compositor();
        let metadata = TrackMetadata::default();

        comp.render_now_playing(PlayerState::Paused, 30, &metadata, true);
        let first = comp.frame().clone();
        comp.render_now_playing(PlayerState::Paused, 30, &metadata, true);
        assert_eq!(comp.frame().as_raw(), first.as_raw());
    }
}
