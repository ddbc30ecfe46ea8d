//! Now-playing layout
//!
//! Base layer of the player screen: themed background, album art (or a
//! placeholder glyph), two text lines anchored to the bottom edge, and a
//! small state marker. Overlays draw on top of this.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::{FONT_9X15, FONT_10X20};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle, Triangle};
use embedded_graphics::text::{Baseline, Text};
use image::imageops;

use crate::model::{PlayerState, TrackMetadata};

use super::canvas::Canvas;
use super::utils::truncate_to_width;

/// Vertical space reserved under the artwork for the two text lines.
const TEXT_BLOCK_HEIGHT: u32 = 64;
const ART_MARGIN: u32 = 8;
const TEXT_MARGIN: u32 = 12;

const PLACEHOLDER_FILL: Rgb888 = Rgb888::new(38, 38, 46);
const PLACEHOLDER_GLYPH: Rgb888 = Rgb888::new(120, 120, 132);
const TEXT_PRIMARY: Rgb888 = Rgb888::WHITE;
const TEXT_SECONDARY: Rgb888 = Rgb888::new(190, 190, 198);

pub fn draw(canvas: &mut Canvas, state: PlayerState, metadata: &TrackMetadata) {
    canvas.fill(metadata.theme.background);
    draw_artwork(canvas, metadata);
    draw_titles(canvas, metadata);
    draw_state_marker(canvas, state, metadata.theme.accent);
}

fn draw_artwork(canvas: &mut Canvas, metadata: &TrackMetadata) {
    let width = canvas.width();
    let height = canvas.height();

    // Largest square that fits above the text block
    let avail_w = width - 2 * ART_MARGIN;
    let avail_h = height - TEXT_BLOCK_HEIGHT - 2 * ART_MARGIN;
    let side = avail_w.min(avail_h);
    let x = ((width - side) / 2) as i64;
    let y = ART_MARGIN as i64;

    match &metadata.artwork {
        Some(art) => {
            let resized = imageops::resize(art, side, side, imageops::FilterType::Lanczos3);
            canvas.paste(&resized, x, y);
        }
        None => draw_placeholder(canvas, x as i32, y as i32, side),
    }
}

/// Fixed placeholder: a dark square with a beamed pair of notes.
fn draw_placeholder(canvas: &mut Canvas, x: i32, y: i32, side: u32) {
    Rectangle::new(Point::new(x, y), Size::new(side, side))
        .into_styled(PrimitiveStyle::with_fill(PLACEHOLDER_FILL))
        .draw(canvas)
        .ok();

    let cx = x + side as i32 / 2;
    let cy = y + side as i32 / 2;
    let glyph = PrimitiveStyle::with_fill(PLACEHOLDER_GLYPH);

    // stems and beam
    Rectangle::new(Point::new(cx - 14, cy - 26), Size::new(4, 40))
        .into_styled(glyph)
        .draw(canvas)
        .ok();
    Rectangle::new(Point::new(cx + 14, cy - 30), Size::new(4, 40))
        .into_styled(glyph)
        .draw(canvas)
        .ok();
    Rectangle::new(Point::new(cx - 14, cy - 30), Size::new(32, 6))
        .into_styled(glyph)
        .draw(canvas)
        .ok();
    // note heads
    Circle::new(Point::new(cx - 22, cy + 8), 14)
        .into_styled(glyph)
        .draw(canvas)
        .ok();
    Circle::new(Point::new(cx + 6, cy + 4), 14)
        .into_styled(glyph)
        .draw(canvas)
        .ok();
}

fn draw_titles(canvas: &mut Canvas, metadata: &TrackMetadata) {
    let height = canvas.height() as i32;
    let max_width = canvas.width() - 2 * TEXT_MARGIN;

    let title = truncate_to_width(&metadata.title, &FONT_10X20, max_width);
    Text::with_baseline(
        &title,
        Point::new(TEXT_MARGIN as i32, height - 58),
        MonoTextStyle::new(&FONT_10X20, TEXT_PRIMARY),
        Baseline::Top,
    )
    .draw(canvas)
    .ok();

    let album = truncate_to_width(&metadata.album, &FONT_9X15, max_width);
    Text::with_baseline(
        &album,
        Point::new(TEXT_MARGIN as i32, height - 30),
        MonoTextStyle::new(&FONT_9X15, TEXT_SECONDARY),
        Baseline::Top,
    )
    .draw(canvas)
    .ok();
}

/// Small play/stop marker in the top-left corner; the pause overlay already
/// makes the paused state unmistakable.
fn draw_state_marker(canvas: &mut Canvas, state: PlayerState, accent: Rgb888) {
    match state {
        PlayerState::Playing => {
            Triangle::new(Point::new(8, 8), Point::new(8, 22), Point::new(20, 15))
                .into_styled(PrimitiveStyle::with_fill(accent))
                .draw(canvas)
                .ok();
        }
        PlayerState::Stopped => {
            Rectangle::new(Point::new(8, 8), Size::new(12, 12))
                .into_styled(PrimitiveStyle::with_fill(TEXT_SECONDARY))
                .draw(canvas)
                .ok();
        }
        PlayerState::Paused => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Theme;
    use image::RgbImage;

    #[test]
    fn background_takes_the_theme_color() {
        let mut canvas = Canvas::new(320, 240);
        let metadata = TrackMetadata {
            theme: Theme {
                background: Rgb888::new(40, 10, 10),
                accent: Rgb888::new(200, 60, 60),
            },
            ..TrackMetadata::default()
        };
        draw(&mut canvas, PlayerState::Stopped, &metadata);
        assert_eq!(canvas.frame().get_pixel(319, 0).0, [40, 10, 10]);
    }

    #[test]
    fn artwork_fills_the_square_above_the_text_block() {
        let mut canvas = Canvas::new(320, 240);
        let metadata = TrackMetadata {
            artwork: Some(RgbImage::from_pixel(300, 300, image::Rgb([9, 9, 9]))),
            ..TrackMetadata::default()
        };
        draw(&mut canvas, PlayerState::Playing, &metadata);

        // square side = 240 - 64 - 16 = 160, centered at x = 80, y = 8
        assert_eq!(canvas.frame().get_pixel(80, 8).0, [9, 9, 9]);
        assert_eq!(canvas.frame().get_pixel(239, 167).0, [9, 9, 9]);
        // outside the square the theme background shows
        let bg = TrackMetadata::default().theme.background;
        assert_eq!(canvas.frame().get_pixel(70, 8).0[0], bg.r());
    }
}
