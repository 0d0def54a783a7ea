//! Image loading, viewport fitting and synthetic layouts for the CLI, tests
//! and benches.

/// Rendered card layouts with known attributes
pub mod synthetic;

use crate::config::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::error::{Result, SetVisionError};
use crate::models::Raster;
use image::imageops::FilterType;
use image::RgbImage;
use std::io;
use std::path::Path;
use tracing::debug;

/// Bytes before the samples of a `.raw` file
const RAW_HEADER_LEN: usize = 8;

/// Scale `image` so it fits `max_width` x `max_height`, keeping its aspect
/// ratio. Smaller images are scaled up.
pub fn fit_to_viewport(image: &RgbImage, max_width: u32, max_height: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }
    let ratio = (max_width as f64 / width as f64).min(max_height as f64 / height as f64);
    let new_width = ((width as f64 * ratio) as u32).max(1);
    let new_height = ((height as f64 * ratio) as u32).max(1);
    if (new_width, new_height) == (width, height) {
        return image.clone();
    }
    debug!(width, height, new_width, new_height, "fitting image to viewport");
    image::imageops::resize(image, new_width, new_height, FilterType::Lanczos3)
}

/// Load an image as RGB bytes along with its dimensions.
///
/// With `fit` set the image is scaled into the 800x600 viewport the pipeline
/// thresholds are tuned for.
pub fn load_rgb<P: AsRef<Path>>(
    path: P,
    fit: bool,
) -> std::result::Result<(Vec<u8>, usize, usize), image::ImageError> {
    let mut rgb = image::open(path)?.to_rgb8();
    if fit {
        rgb = fit_to_viewport(&rgb, VIEWPORT_WIDTH, VIEWPORT_HEIGHT);
    }
    let (width, height) = rgb.dimensions();
    Ok((rgb.into_raw(), width as usize, height as usize))
}

/// Decode a `.raw` grayscale image.
///
/// Layout: width and height as little-endian `i32`, then exactly
/// `width * height` row-major 8-bit samples.
pub fn parse_raw(bytes: &[u8]) -> Result<Raster> {
    if bytes.len() < RAW_HEADER_LEN {
        return Err(SetVisionError::InputShape {
            detail: format!(
                "raw header needs {RAW_HEADER_LEN} bytes, got {}",
                bytes.len()
            ),
        });
    }
    let (header, samples) = bytes.split_at(RAW_HEADER_LEN);
    let width = i32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    let height = i32::from_le_bytes([header[4], header[5], header[6], header[7]]);
    if width < 0 || height < 0 {
        return Err(SetVisionError::InputShape {
            detail: format!("raw dimensions {width}x{height} are negative"),
        });
    }
    debug!(width, height, "decoding raw image");
    Raster::from_vec(width as usize, height as usize, samples.to_vec())
}

/// Read and decode a `.raw` grayscale file
pub fn load_raw<P: AsRef<Path>>(path: P) -> io::Result<Raster> {
    let bytes = std::fs::read(path)?;
    parse_raw(&bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
