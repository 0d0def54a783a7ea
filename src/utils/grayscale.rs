//! Convert RGB image to grayscale
//! Y = 0.299*R + 0.587*G + 0.114*B
//! Uses fast integer arithmetic: Y = (76*R + 150*G + 29*B) >> 8

use crate::error::{Result, SetVisionError};
use crate::models::Raster;
use rayon::prelude::*;

/// Coefficients for grayscale conversion: Y = (76*R + 150*G + 29*B) >> 8
const COEF_R: i32 = 76;
const COEF_G: i32 = 150;
const COEF_B: i32 = 29;

#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    let lum = (COEF_R * r as i32 + COEF_G * g as i32 + COEF_B * b as i32) >> 8;
    lum.min(255) as u8
}

/// Convert an interleaved RGB buffer to a grayscale raster.
///
/// Rows are processed in parallel.
pub fn rgb_to_grayscale(rgb: &[u8], width: usize, height: usize) -> Result<Raster> {
    if rgb.len() != width * height * 3 {
        return Err(SetVisionError::SizeMismatch {
            expected: width * height * 3,
            actual: rgb.len(),
        });
    }

    let mut gray = Raster::new(width, height);
    if width == 0 {
        return Ok(gray);
    }

    gray.as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            let row_start = y * width * 3;
            for (x, out) in row.iter_mut().enumerate() {
                let idx = row_start + x * 3;
                *out = luma(rgb[idx], rgb[idx + 1], rgb[idx + 2]);
            }
        });

    Ok(gray)
}
