//! Model module - playback state and track data
//!
//! This module contains the data structures the controller and view operate
//! on. It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (player state, display theme)
//! - `playlist`: Ordered track list with wrapping position
//! - `metadata`: Per-track metadata extraction and theming cache

mod metadata;
mod playlist;
mod types;

pub use metadata::{MetadataCache, TrackMetadata, derive_theme};
pub use playlist::Playlist;
pub use types::{PlayerState, Theme};
