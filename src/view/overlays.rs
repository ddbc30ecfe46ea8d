//! Overlay rendering (volume side panel, pause scrim)
//!
//! Overlays are composited on top of the finished now-playing layout; they
//! never move the base layout around.

use std::time::{Duration, Instant};

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

use super::canvas::Canvas;

/// How long the volume panel stays up after a volume change.
pub const OVERLAY_DURATION: Duration = Duration::from_secs(3);

pub const VOLUME_PANEL_WIDTH: u32 = 40;
const SEGMENT_COUNT: u32 = 10;
const PANEL_MARGIN: u32 = 8;
const SEGMENT_GAP: u32 = 4;

const PANEL_BACKGROUND: Rgb888 = Rgb888::new(12, 12, 16);
const SEGMENT_OUTLINE: Rgb888 = Rgb888::new(70, 70, 80);

/// Timestamp of the last volume change, driving the timed overlay.
#[derive(Default)]
pub struct VolumeOverlay {
    last_change: Option<Instant>,
}

impl VolumeOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn touch(&mut self, now: Instant) {
        self.last_change = Some(now);
    }

    pub fn visible_at(&self, now: Instant) -> bool {
        self.last_change
            .is_some_and(|t| now.saturating_duration_since(t) < OVERLAY_DURATION)
    }
}

/// Fixed-width side panel with ten discrete segments filling bottom-up,
/// `volume / 10` of them in the accent color.
pub fn draw_volume_panel(canvas: &mut Canvas, volume: u8, accent: Rgb888) {
    let width = canvas.width();
    let height = canvas.height();
    let panel_x = (width - VOLUME_PANEL_WIDTH) as i32;

    Rectangle::new(
        Point::new(panel_x, 0),
        Size::new(VOLUME_PANEL_WIDTH, height),
    )
    .into_styled(PrimitiveStyle::with_fill(PANEL_BACKGROUND))
    .draw(canvas)
    .ok();

    let inner_height = height - 2 * PANEL_MARGIN;
    let segment_height = (inner_height - (SEGMENT_COUNT - 1) * SEGMENT_GAP) / SEGMENT_COUNT;
    let used = SEGMENT_COUNT * segment_height + (SEGMENT_COUNT - 1) * SEGMENT_GAP;
    let top = PANEL_MARGIN + (inner_height - used) / 2;

    let segment_x = panel_x + PANEL_MARGIN as i32;
    let segment_width = VOLUME_PANEL_WIDTH - 2 * PANEL_MARGIN;
    let filled = u32::from(volume) / 10;

    for segment in 0..SEGMENT_COUNT {
        // segment 0 is the bottom of the stack
        let y = top + (SEGMENT_COUNT - 1 - segment) * (segment_height + SEGMENT_GAP);
        let rect = Rectangle::new(
            Point::new(segment_x, y as i32),
            Size::new(segment_width, segment_height),
        );
        let style = if segment < filled {
            PrimitiveStyle::with_fill(accent)
        } else {
            PrimitiveStyle::with_stroke(SEGMENT_OUTLINE, 1)
        };
        rect.into_styled(style).draw(canvas).ok();
    }
}

/// Translucent scrim over the whole canvas plus a centered two-bar glyph.
pub fn draw_pause(canvas: &mut Canvas) {
    canvas.dim();

    let bar_width = 14u32;
    let bar_height = 56u32;
    let gap = 14u32;

    let total = 2 * bar_width + gap;
    let x = ((canvas.width() - total) / 2) as i32;
    let y = ((canvas.height() - bar_height) / 2) as i32;

    for bar_x in [x, x + (bar_width + gap) as i32] {
        Rectangle::new(Point::new(bar_x, y), Size::new(bar_width, bar_height))
            .into_styled(PrimitiveStyle::with_fill(Rgb888::WHITE))
            .draw(canvas)
            .ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_hidden_before_any_change() {
        let overlay = VolumeOverlay::new();
        assert!(!overlay.visible_at(Instant::now()));
    }

    #[test]
    fn overlay_flips_visibility_exactly_once_past_threshold() {
        let mut overlay = VolumeOverlay::new();
        let start = Instant::now();
        overlay.touch(start);

        assert!(overlay.visible_at(start));
        assert!(overlay.visible_at(start + Duration::from_millis(2999)));
        assert!(!overlay.visible_at(start + Duration::from_secs(3)));
        assert!(!overlay.visible_at(start + Duration::from_secs(60)));
    }

    #[test]
    fn filled_segments_follow_floor_of_volume_over_ten() {
        let mut canvas = Canvas::new(320, 240);
        let accent = Rgb888::new(200, 40, 40);
        draw_volume_panel(&mut canvas, 47, accent);

        // Count rows containing accent pixels inside the panel column
        let mut accent_rows = 0;
        for y in 0..240 {
            let row_hit = (280..320).any(|x| canvas.frame().get_pixel(x, y).0 == [200, 40, 40]);
            if row_hit {
                accent_rows += 1;
            }
        }
        // 4 filled segments of 18 rows each
        assert_eq!(accent_rows, 4 * 18);
    }

    #[test]
    fn pause_glyph_sits_on_a_dimmed_scrim() {
        let mut canvas = Canvas::new(320, 240);
        canvas.fill(Rgb888::new(100, 100, 100));
        draw_pause(&mut canvas);

        // corner is dimmed, center of the left bar is white
        assert_eq!(canvas.frame().get_pixel(0, 0).0, [50, 50, 50]);
        assert_eq!(canvas.frame().get_pixel(146, 120).0, [255, 255, 255]);
    }
}
