//! Per-track metadata extraction and theming
//!
//! Pulls title/album text and embedded cover art out of a track, derives the
//! display theme from the art, and caches the result for the currently
//! loaded track only. Extraction never fails upward: anything unreadable
//! degrades to the filename and the fixed default theme.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use image::{RgbImage, imageops};
use lofty::file::TaggedFileExt;
use lofty::prelude::*;
use lofty::probe::Probe;

use super::types::Theme;

const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Metadata for the currently loaded track.
#[derive(Clone)]
pub struct TrackMetadata {
    pub title: String,
    pub album: String,
    pub artwork: Option<RgbImage>,
    pub theme: Theme,
}

impl Default for TrackMetadata {
    fn default() -> Self {
        Self {
            title: "No track loaded".to_string(),
            album: String::new(),
            artwork: None,
            theme: Theme::default(),
        }
    }
}

/// Single-entry cache: metadata is extracted once per track change and
/// replaced wholesale when the track changes.
#[derive(Default)]
pub struct MetadataCache {
    entry: Option<(PathBuf, Arc<TrackMetadata>)>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata for `path`, extracting only if the track changed since the
    /// last call. This is the one expensive call in the core (file I/O plus
    /// image decode) and it blocks the render path of the changed track.
    pub fn load(&mut self, path: &Path) -> Arc<TrackMetadata> {
        if let Some((cached_path, metadata)) = &self.entry {
            if cached_path == path {
                return metadata.clone();
            }
        }

        let metadata = Arc::new(extract(path));
        self.entry = Some((path.to_path_buf(), metadata.clone()));
        metadata
    }
}

/// Extract metadata, falling back to filename-derived values on any failure.
fn extract(path: &Path) -> TrackMetadata {
    match read_tags(path) {
        Ok(metadata) => metadata,
        Err(e) => {
            tracing::warn!(track = %path.display(), error = %e, "Metadata extraction failed, using fallback");
            fallback(path)
        }
    }
}

fn read_tags(path: &Path) -> Result<TrackMetadata> {
    let tagged_file = Probe::open(path)?.read()?;
    let tag = tagged_file.primary_tag().or_else(|| tagged_file.first_tag());

    let mut metadata = fallback(path);
    let Some(tag) = tag else {
        return Ok(metadata);
    };

    if let Some(title) = tag.title() {
        if !title.trim().is_empty() {
            metadata.title = title.to_string();
        }
    }
    if let Some(album) = tag.album() {
        if !album.trim().is_empty() {
            metadata.album = album.to_string();
        }
    }

    // A corrupt picture only costs us the artwork, not the text tags
    if let Some(picture) = tag.pictures().first() {
        match image::load_from_memory(picture.data()) {
            Ok(decoded) => {
                let artwork = decoded.to_rgb8();
                metadata.theme = derive_theme(&artwork);
                metadata.artwork = Some(artwork);
            }
            Err(e) => {
                tracing::debug!(track = %path.display(), error = %e, "Embedded artwork did not decode");
            }
        }
    }

    tracing::debug!(
        track = %path.display(),
        title = %metadata.title,
        album = %metadata.album,
        has_artwork = metadata.artwork.is_some(),
        "Metadata extracted"
    );
    Ok(metadata)
}

fn fallback(path: &Path) -> TrackMetadata {
    let title = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "Unknown".to_string());
    TrackMetadata {
        title,
        album: UNKNOWN_ALBUM.to_string(),
        artwork: None,
        theme: Theme::default(),
    }
}

/// Derive the background/accent pair from cover art.
///
/// The art is downsampled to 50x50 and averaged per channel, weighting dark
/// pixels (mean brightness < 128) at 1.0 and bright ones at 0.5 so the theme
/// leans toward the artwork's shadows. Background is the average darkened to
/// 40%, accent the average scaled to 80% and capped at 255.
pub fn derive_theme(artwork: &RgbImage) -> Theme {
    let thumb = imageops::resize(artwork, 50, 50, imageops::FilterType::Triangle);

    let mut sums = [0.0f64; 3];
    let mut weight_total = 0.0f64;
    for pixel in thumb.pixels() {
        let brightness = (pixel[0] as f64 + pixel[1] as f64 + pixel[2] as f64) / 3.0;
        let weight = if brightness < 128.0 { 1.0 } else { 0.5 };
        for (sum, channel) in sums.iter_mut().zip(pixel.0) {
            *sum += channel as f64 * weight;
        }
        weight_total += weight;
    }

    if weight_total == 0.0 {
        return Theme::default();
    }

    let average = sums.map(|s| s / weight_total);
    let background = average.map(|c| (c * 0.4) as u8);
    let accent = average.map(|c| (c * 0.8).min(255.0) as u8);

    Theme {
        background: embedded_graphics::pixelcolor::Rgb888::new(
            background[0],
            background[1],
            background[2],
        ),
        accent: embedded_graphics::pixelcolor::Rgb888::new(accent[0], accent[1], accent[2]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::prelude::RgbColor;

    #[test]
    fn unreadable_file_falls_back_to_filename() {
        let mut cache = MetadataCache::new();
        let metadata = cache.load(Path::new("/nonexistent/Morning Song.mp3"));
        assert_eq!(metadata.title, "Morning Song");
        assert_eq!(metadata.album, UNKNOWN_ALBUM);
        assert!(metadata.artwork.is_none());
        assert_eq!(metadata.theme, Theme::default());
    }

    #[test]
    fn garbage_bytes_fall_back_to_filename() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("static.mp3");
        std::fs::write(&path, b"not an mp3 at all").unwrap();

        let metadata = extract(&path);
        assert_eq!(metadata.title, "static");
        assert_eq!(metadata.album, UNKNOWN_ALBUM);
    }

    #[test]
    fn cache_is_reused_until_track_changes() {
        let mut cache = MetadataCache::new();
        let first = cache.load(Path::new("a.mp3"));
        let again = cache.load(Path::new("a.mp3"));
        assert!(Arc::ptr_eq(&first, &again));

        let other = cache.load(Path::new("b.mp3"));
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(other.title, "b");
    }

    #[test]
    fn dark_uniform_art_weights_fully() {
        // Uniform (100,60,20): brightness 60 < 128, so weight 1.0 everywhere
        // and the average is the color itself.
        let art = RgbImage::from_pixel(80, 80, image::Rgb([100, 60, 20]));
        let theme = derive_theme(&art);
        assert_eq!(theme.background.r(), 40);
        assert_eq!(theme.background.g(), 24);
        assert_eq!(theme.background.b(), 8);
        assert_eq!(theme.accent.r(), 80);
        assert_eq!(theme.accent.g(), 48);
        assert_eq!(theme.accent.b(), 16);
    }

    #[test]
    fn bright_art_still_averages_to_itself_when_uniform() {
        // Weight 0.5 on every pixel cancels out of the weighted average.
        let art = RgbImage::from_pixel(50, 50, image::Rgb([200, 200, 200]));
        let theme = derive_theme(&art);
        assert_eq!(theme.background.r(), 80);
        assert_eq!(theme.accent.r(), 160);
    }
}
