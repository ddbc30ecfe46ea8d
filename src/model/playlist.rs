//! Ordered track list with a wrapping current position
//!
//! The playlist is fixed once loaded; only the current index moves. Next and
//! previous wrap modulo the playlist length.

use std::path::{Path, PathBuf};

pub struct Playlist {
    tracks: Vec<PathBuf>,
    index: usize,
}

impl Playlist {
    pub fn new(tracks: Vec<PathBuf>) -> Self {
        Self { tracks, index: 0 }
    }

    /// Recursively collect `.mp3` files under `dir`, sorted by path.
    ///
    /// macOS resource-fork files (`._*`) are skipped; they carry ID3-looking
    /// junk that mpg123 refuses to play.
    pub fn scan(dir: &Path) -> Vec<PathBuf> {
        let mut tracks = Vec::new();
        collect_tracks(dir, &mut tracks);
        tracks.sort();
        tracks
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&Path> {
        self.tracks.get(self.index).map(PathBuf::as_path)
    }

    /// Move the position to `index`. Returns false (without moving) when the
    /// playlist is empty or the index is out of range.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.tracks.len() {
            return false;
        }
        self.index = index;
        true
    }

    /// Index of the track after the current one, wrapping.
    pub fn next_index(&self) -> Option<usize> {
        if self.tracks.is_empty() {
            None
        } else {
            Some((self.index + 1) % self.tracks.len())
        }
    }

    /// Index of the track before the current one, wrapping.
    pub fn previous_index(&self) -> Option<usize> {
        if self.tracks.is_empty() {
            None
        } else {
            Some((self.index + self.tracks.len() - 1) % self.tracks.len())
        }
    }
}

fn collect_tracks(dir: &Path, out: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "Cannot read music directory");
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_tracks(&path, out);
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with("._") {
            continue;
        }
        if name.to_lowercase().ends_with(".mp3") {
            out.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist(len: usize) -> Playlist {
        Playlist::new((0..len).map(|i| PathBuf::from(format!("{i}.mp3"))).collect())
    }

    #[test]
    fn next_wraps_modulo_length() {
        let mut pl = playlist(3);
        for n in 1..=7 {
            let next = pl.next_index().unwrap();
            assert!(pl.select(next));
            assert_eq!(pl.index(), n % 3);
        }
    }

    #[test]
    fn previous_wraps_modulo_length() {
        let mut pl = playlist(4);
        let prev = pl.previous_index().unwrap();
        assert!(pl.select(prev));
        assert_eq!(pl.index(), 3);
        let prev = pl.previous_index().unwrap();
        assert!(pl.select(prev));
        assert_eq!(pl.index(), 2);
    }

    #[test]
    fn select_out_of_range_is_rejected() {
        let mut pl = playlist(2);
        assert!(!pl.select(2));
        assert_eq!(pl.index(), 0);
    }

    #[test]
    fn empty_playlist_has_no_position() {
        let mut pl = playlist(0);
        assert!(pl.is_empty());
        assert!(pl.current().is_none());
        assert!(pl.next_index().is_none());
        assert!(pl.previous_index().is_none());
        assert!(!pl.select(0));
    }

    #[test]
    fn scan_finds_mp3s_and_skips_resource_forks() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("album");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(dir.path().join("b.mp3"), b"x").unwrap();
        std::fs::write(dir.path().join("._b.mp3"), b"x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::write(sub.join("a.MP3"), b"x").unwrap();

        let tracks = Playlist::scan(dir.path());
        assert_eq!(tracks.len(), 2);
        assert!(tracks[0].ends_with("album/a.MP3"));
        assert!(tracks[1].ends_with("b.mp3"));
    }
}
