//! Text measurement and truncation helpers
//!
//! The panel fonts are fixed-width bitmaps, so measurement is exact and
//! truncation can re-measure after every step.

use embedded_graphics::mono_font::MonoFont;

const ELLIPSIS: &str = "...";

/// Rendered width of `text` in pixels.
pub fn text_width(text: &str, font: &MonoFont) -> u32 {
    let glyphs = text.chars().count() as u32;
    if glyphs == 0 {
        0
    } else {
        glyphs * font.character_size.width + (glyphs - 1) * font.character_spacing
    }
}

/// Shorten `text` character by character from the end, appending an ellipsis
/// and re-measuring each step, until it fits in `max_width` or only three
/// characters remain.
pub fn truncate_to_width(text: &str, font: &MonoFont, max_width: u32) -> String {
    if text_width(text, font) <= max_width {
        return text.to_string();
    }

    let mut chars: Vec<char> = text.chars().collect();
    while chars.len() > 3 {
        chars.pop();
        let candidate: String = chars.iter().collect::<String>() + ELLIPSIS;
        if text_width(&candidate, font) <= max_width {
            return candidate;
        }
    }
    chars.iter().collect::<String>() + ELLIPSIS
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::mono_font::ascii::FONT_10X20;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_to_width("Intro", &FONT_10X20, 300), "Intro");
    }

    #[test]
    fn truncated_text_fits_when_above_floor() {
        let title = "A Considerably Overlong Track Title";
        let max_width = 200;
        let truncated = truncate_to_width(title, &FONT_10X20, max_width);
        assert!(truncated.ends_with("..."));
        assert!(text_width(&truncated, &FONT_10X20) <= max_width);
        // Re-measuring the result must never exceed max_width above the
        // three-character floor
        assert!(truncated.chars().count() > 3);
    }

    #[test]
    fn floor_keeps_three_characters_plus_ellipsis() {
        // 10px glyphs cannot fit in 20px, so truncation bottoms out
        let truncated = truncate_to_width("Overture", &FONT_10X20, 20);
        assert_eq!(truncated, "Ove...");
    }

    #[test]
    fn width_is_zero_for_empty_text() {
        assert_eq!(text_width("", &FONT_10X20), 0);
    }
}
