use crate::models::Raster;
use rayon::prelude::*;

/// Foreground sample value of a binary mask
pub const FOREGROUND: u8 = 255;
/// Background sample value of a binary mask
pub const BACKGROUND: u8 = 0;

/// Simple global threshold binarization.
///
/// Samples strictly above `threshold` become 255, everything else 0.
pub fn threshold_binarize(gray: &Raster, threshold: u8) -> Raster {
    let mut binary = gray.clone();
    binary.as_mut_slice().par_iter_mut().for_each(|v| {
        *v = if *v > threshold {
            FOREGROUND
        } else {
            BACKGROUND
        };
    });
    binary
}

/// Mean and population variance of a sample set
pub fn mean_and_variance(samples: &[u8]) -> (f64, f64) {
    if samples.is_empty() {
        return (0.0, 0.0);
    }
    let n = samples.len() as f64;
    let mean = samples.iter().map(|&v| v as f64).sum::<f64>() / n;
    let variance = samples
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    (mean, variance)
}
