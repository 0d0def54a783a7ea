//! Byte-scaled RGB to HSV conversion.
//!
//! Hue, saturation and value are each mapped onto 0..=255, so a full hue
//! turn spans 256 steps rather than 360 degrees.

use crate::error::{Result, SetVisionError};
use crate::models::Raster;
use rayon::prelude::*;

/// Three HSV planes of the same size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HsvImage {
    /// Hue plane
    pub hue: Raster,
    /// Saturation plane
    pub saturation: Raster,
    /// Value plane
    pub value: Raster,
}

impl HsvImage {
    /// Plane width
    pub fn width(&self) -> usize {
        self.hue.width()
    }

    /// Plane height
    pub fn height(&self) -> usize {
        self.hue.height()
    }

    /// `(h, s, v)` at (x, y); zero outside the image
    pub fn get(&self, x: usize, y: usize) -> (u8, u8, u8) {
        (
            self.hue.get(x, y),
            self.saturation.get(x, y),
            self.value.get(x, y),
        )
    }
}

/// Convert one RGB triple to byte-scaled HSV
pub fn rgb_pixel_to_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let maxc = r.max(g).max(b);
    let minc = r.min(g).min(b);
    if maxc == minc {
        return (0, 0, maxc);
    }

    let cr = (maxc - minc) as f32;
    let s = cr / maxc as f32;
    let rc = (maxc - r) as f32 / cr;
    let gc = (maxc - g) as f32 / cr;
    let bc = (maxc - b) as f32 / cr;
    let h = if r == maxc {
        bc - gc
    } else if g == maxc {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    // Normalize in f64 and store back as f32 so 1/3 and 2/3 turns land on
    // 85 and 170 rather than one step below.
    let h = ((h as f64 / 6.0 + 1.0) % 1.0) as f32;

    (
        (h as f64 * 255.0).clamp(0.0, 255.0) as u8,
        (s as f64 * 255.0).clamp(0.0, 255.0) as u8,
        maxc,
    )
}

/// Convert an interleaved RGB buffer to HSV planes
pub fn rgb_to_hsv(rgb: &[u8], width: usize, height: usize) -> Result<HsvImage> {
    if rgb.len() != width * height * 3 {
        return Err(SetVisionError::SizeMismatch {
            expected: width * height * 3,
            actual: rgb.len(),
        });
    }

    let pixels: Vec<(u8, u8, u8)> = rgb
        .par_chunks_exact(3)
        .map(|px| rgb_pixel_to_hsv(px[0], px[1], px[2]))
        .collect();

    let hue = pixels.iter().map(|p| p.0).collect();
    let saturation = pixels.iter().map(|p| p.1).collect();
    let value = pixels.iter().map(|p| p.2).collect();

    Ok(HsvImage {
        hue: Raster::from_vec(width, height, hue)?,
        saturation: Raster::from_vec(width, height, saturation)?,
        value: Raster::from_vec(width, height, value)?,
    })
}
