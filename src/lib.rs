//! musicbox - playback control and now-playing display core for a
//! single-board audio appliance.
//!
//! The crate is organized model/view/controller:
//!
//! - `model`: playlist, playback state types, track metadata cache
//! - `view`: display compositor rendering into an RGB frame buffer
//! - `controller`: command dispatch, hardware input translation
//! - `audio`: external audio-process backend (mpg123) and mixer push
//! - `display`: display-driver abstraction consuming composed frames
//! - `config`: TOML configuration with defaults
//! - `logging`: file-based tracing setup

pub mod audio;
pub mod config;
pub mod controller;
pub mod display;
pub mod logging;
pub mod model;
pub mod view;
