//! set_vision - Set card recognition from a photo of the layout
//!
//! Finds the twelve cards of a 3x4 Set layout in an RGB photo, reads the
//! count, texture, color and shape printed on each card, and lists every
//! triple of cards that forms a valid set.
//!
//! The pipeline is pure Rust on `image`, `imageproc` and `rayon`:
//! threshold binarization, card localization from outer contours, four
//! per-card classifiers run in parallel, then a pairwise completion search.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Per-card attribute classifiers (count, texture, color, shape)
pub mod classify;
/// Tunable thresholds and environment overrides
pub mod config;
/// Card detection (connected components, contours, line segments, localizer)
pub mod detector;
/// Error type shared by every stage
pub mod error;
/// Set-triple search
pub mod matcher;
/// Core data structures (Raster, CardBox, Grid, attributes)
pub mod models;
/// Flat square-window morphology
pub mod morphology;
/// Stage orchestration
pub mod pipeline;
/// Image loading, viewport fitting and synthetic layouts
pub mod tools;
/// Utility functions (grayscale, binarization, HSV)
pub mod utils;

pub use config::PipelineConfig;
pub use error::{Result, SetVisionError};
pub use models::{
    AttributeGrid, Attributes, CardBox, CardGrid, Color, Count, Grid, GridPos, Raster, SetTriple,
    Shape, Texture,
};
pub use pipeline::Analysis;

/// Analyze an RGB photo of a card layout with default settings
///
/// # Arguments
/// * `image` - Raw RGB bytes (3 bytes per pixel)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
///
/// # Returns
/// Card boxes, card attributes and every set on the board
///
/// Pixel thresholds assume the 800x600 viewport; see [`tools::fit_to_viewport`].
pub fn analyze(image: &[u8], width: usize, height: usize) -> Result<Analysis> {
    pipeline::analyze(image, width, height, &PipelineConfig::default())
}

/// Analyzer holding a pipeline configuration
pub struct Analyzer {
    config: PipelineConfig,
}

impl Analyzer {
    /// Create an analyzer with default settings
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    /// Create an analyzer with explicit settings
    pub fn with_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Create an analyzer with `SET_*` environment overrides applied
    pub fn from_env() -> Self {
        Self::with_config(PipelineConfig::from_env())
    }

    /// Active settings
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Analyze raw RGB bytes
    pub fn analyze(&self, image: &[u8], width: usize, height: usize) -> Result<Analysis> {
        pipeline::analyze(image, width, height, &self.config)
    }

    /// Analyze an `image` crate RGB buffer
    pub fn analyze_image(&self, image: &image::RgbImage) -> Result<Analysis> {
        self.analyze(
            image.as_raw(),
            image.width() as usize,
            image.height() as usize,
        )
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}
