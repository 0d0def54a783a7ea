//! Flat square-window morphology.
//!
//! Every pass zero-pads the current raster by the element radius and takes the
//! windowed maximum (dilation) or minimum (erosion) of the raw sample values,
//! so the operators also work on non-binary rasters. The square window is
//! scanned as a horizontal run followed by a vertical run, which yields the
//! same extreme as the full `s x s` window including the padding zeros.

use crate::error::{Result, SetVisionError};
use crate::models::Raster;
use rayon::prelude::*;
use tracing::trace;

/// Square all-ones structuring element with odd side length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuringElement {
    size: usize,
}

impl StructuringElement {
    /// Square element of side `size`; rejects even or zero sizes
    pub fn square(size: usize) -> Result<Self> {
        if size == 0 || size % 2 == 0 {
            return Err(SetVisionError::InvalidStructuringElement { size });
        }
        Ok(Self { size })
    }

    /// Side length
    pub fn size(&self) -> usize {
        self.size
    }

    /// Neighborhood radius, `(size - 1) / 2`
    pub fn radius(&self) -> usize {
        (self.size - 1) / 2
    }
}

/// Morphological operator selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphOp {
    /// Windowed maximum
    Dilation,
    /// Windowed minimum
    Erosion,
    /// Erosion followed by dilation
    Opening,
    /// Dilation followed by erosion
    Closing,
}

#[derive(Clone, Copy)]
enum Extreme {
    Max,
    Min,
}

impl Extreme {
    #[inline]
    fn pick(self, a: u8, b: u8) -> u8 {
        match self {
            Extreme::Max => a.max(b),
            Extreme::Min => a.min(b),
        }
    }

    #[inline]
    fn identity(self) -> u8 {
        match self {
            Extreme::Max => u8::MIN,
            Extreme::Min => u8::MAX,
        }
    }
}

/// Extreme of `values` plus a padding zero when the window left the raster
#[inline]
fn run_extreme(values: impl Iterator<Item = u8>, padded: bool, extreme: Extreme) -> u8 {
    let acc = values.fold(extreme.identity(), |acc, v| extreme.pick(acc, v));
    if padded { extreme.pick(acc, 0) } else { acc }
}

fn window_extreme(src: &Raster, se: StructuringElement, extreme: Extreme) -> Raster {
    let (width, height) = (src.width(), src.height());
    if width == 0 || height == 0 {
        return src.clone();
    }
    let r = se.radius();

    let mut horizontal = Raster::new(width, height);
    horizontal
        .as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            let src_row = src.row(y);
            for (x, out) in row.iter_mut().enumerate() {
                let lo = x.saturating_sub(r);
                let hi = (x + r).min(width - 1);
                let padded = x < r || x + r >= width;
                *out = run_extreme(src_row[lo..=hi].iter().copied(), padded, extreme);
            }
        });

    let mut out = Raster::new(width, height);
    out.as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            let lo = y.saturating_sub(r);
            let hi = (y + r).min(height - 1);
            let padded = y < r || y + r >= height;
            for (x, out) in row.iter_mut().enumerate() {
                *out = run_extreme((lo..=hi).map(|yy| horizontal.get(x, yy)), padded, extreme);
            }
        });

    out
}

/// Windowed maximum over a zero-padded raster
pub fn dilate(src: &Raster, se: StructuringElement) -> Raster {
    window_extreme(src, se, Extreme::Max)
}

/// Windowed minimum over a zero-padded raster
pub fn erode(src: &Raster, se: StructuringElement) -> Raster {
    window_extreme(src, se, Extreme::Min)
}

/// Erosion with `erosion`, then dilation of that result with `dilation`.
///
/// Sizes may differ: shrinking noise with one element and regrowing shapes
/// with a smaller one is how the classifiers thicken hollow outlines.
pub fn opening(src: &Raster, erosion: StructuringElement, dilation: StructuringElement) -> Raster {
    dilate(&erode(src, erosion), dilation)
}

/// Dilation with `dilation`, then erosion of that result with `erosion`
pub fn closing(src: &Raster, dilation: StructuringElement, erosion: StructuringElement) -> Raster {
    erode(&dilate(src, dilation), erosion)
}

/// Run one operator with side lengths given as integers.
///
/// `size1` is the first stage (erosion for opening, dilation for closing) and
/// `size2` the second; single-stage operators only use `size1`.
pub fn apply(src: &Raster, op: MorphOp, size1: usize, size2: usize) -> Result<Raster> {
    let first = StructuringElement::square(size1)?;
    trace!(?op, size1, size2, width = src.width(), height = src.height(), "morphology");
    let result = match op {
        MorphOp::Dilation => dilate(src, first),
        MorphOp::Erosion => erode(src, first),
        MorphOp::Opening => opening(src, first, StructuringElement::square(size2)?),
        MorphOp::Closing => closing(src, first, StructuringElement::square(size2)?),
    };
    Ok(result)
}

/// Morphological gradient with a 3x3 element: dilation minus erosion.
///
/// On a binary mask this is a band about two pixels wide straddling every
/// boundary, used as the edge mask for line detection.
pub fn gradient(mask: &Raster) -> Raster {
    let se = StructuringElement { size: 3 };
    let dilated = dilate(mask, se);
    let eroded = erode(mask, se);
    let data = dilated
        .as_slice()
        .iter()
        .zip(eroded.as_slice())
        .map(|(&d, &e)| d - e)
        .collect();
    Raster::from_vec(mask.width(), mask.height(), data).unwrap_or_default()
}
