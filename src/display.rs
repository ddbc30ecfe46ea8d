//! Display-driver abstraction
//!
//! The compositor hands a fully composed frame to a `DisplayDriver`; bus
//! wiring for a concrete panel lives behind this trait. When no panel is
//! attached the appliance degrades to a null driver instead of failing.

use std::path::PathBuf;

use anyhow::Result;
use image::RgbImage;

use crate::config::Config;

pub trait DisplayDriver: Send {
    /// Push a finished frame to the panel.
    fn present(&mut self, frame: &RgbImage) -> Result<()>;
}

/// Driver used when no panel hardware is available.
pub struct NullDisplay;

impl DisplayDriver for NullDisplay {
    fn present(&mut self, frame: &RgbImage) -> Result<()> {
        tracing::trace!(
            width = frame.width(),
            height = frame.height(),
            "Frame composed (no panel attached)"
        );
        Ok(())
    }
}

/// Writes every frame to a PNG file; useful over SSH when tuning the layout.
/// Applies the same rotation a panel driver would, so the dump matches what
/// the glass shows.
pub struct PngDisplay {
    path: PathBuf,
    rotation: u16,
}

impl PngDisplay {
    pub fn new(path: PathBuf, rotation: u16) -> Self {
        Self { path, rotation }
    }
}

impl DisplayDriver for PngDisplay {
    fn present(&mut self, frame: &RgbImage) -> Result<()> {
        rotate(frame, self.rotation).save(&self.path)?;
        Ok(())
    }
}

/// Rotate a composed frame into the panel's native orientation.
pub fn rotate(frame: &RgbImage, rotation: u16) -> RgbImage {
    match rotation % 360 {
        90 => image::imageops::rotate90(frame),
        180 => image::imageops::rotate180(frame),
        270 => image::imageops::rotate270(frame),
        _ => frame.clone(),
    }
}

/// Pick the best available driver for this configuration.
pub fn open_driver(config: &Config) -> Box<dyn DisplayDriver> {
    match &config.frame_dump {
        Some(path) => {
            tracing::info!(
                path = %path.display(),
                rotation = config.display_rotation,
                "Dumping frames to PNG"
            );
            Box::new(PngDisplay::new(path.clone(), config.display_rotation))
        }
        None => {
            tracing::info!("No display backend configured, running headless");
            Box::new(NullDisplay)
        }
    }
}
