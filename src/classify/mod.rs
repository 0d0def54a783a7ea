//! Per-card attribute classifiers
//!
//! Each classifier exposes a pure per-card function and a grid-level driver
//! that runs it over all twelve cards in parallel:
//! - Count: transitions on a vertical scan of the stripe-filled mask
//! - Texture: mean and variance of short horizontal strips of the mask
//! - Color: first HSV sample on the center column inside a color box
//! - Shape: straight edge segments, then contour circularity

/// Ink color from the HSV planes
pub mod color;
/// Symbol count from the stripe-filled mask
pub mod count;
/// Symbol outline from line segments and circularity
pub mod shape;
/// Symbol fill from the raw binary mask
pub mod texture;

use crate::error::{Result, SetVisionError};
use crate::models::{CardBox, CardGrid, Grid, GridPos, Raster};
use crate::morphology::{self, StructuringElement};
use rayon::prelude::*;
use std::ops::Range;

/// Opening that merges striped fills into solid blobs.
///
/// The mask holds cards as foreground, so symbols are holes: the larger
/// erosion swallows thin card-colored gaps between stripes and the smaller
/// dilation does not restore them.
pub fn fill_stripes(mask: &Raster, erosion_size: usize, dilation_size: usize) -> Result<Raster> {
    let erosion = StructuringElement::square(erosion_size)?;
    let dilation = StructuringElement::square(dilation_size)?;
    Ok(morphology::opening(mask, erosion, dilation))
}

/// Run `classify` on every card in parallel, keeping grid order.
///
/// The first failing card aborts the whole grid.
pub fn classify_grid<T, F>(cards: &CardGrid, classify: F) -> Result<Grid<T>>
where
    T: Send,
    F: Fn(GridPos, &CardBox) -> Result<T> + Sync,
{
    let values = cards
        .as_slice()
        .par_iter()
        .enumerate()
        .map(|(i, card)| classify(GridPos::from_index(i), card))
        .collect::<Result<Vec<T>>>()?;
    Grid::from_vec(values).ok_or_else(|| SetVisionError::InputShape {
        detail: "card grid must hold twelve cards".to_string(),
    })
}

/// Half-open index range `[center - before, center + after)` inside `0..limit`
pub(crate) fn window(
    center: usize,
    before: usize,
    after: usize,
    limit: usize,
    what: &str,
) -> Result<Range<usize>> {
    let out_of_bounds = || SetVisionError::InputShape {
        detail: format!(
            "{what} window [{center}-{before}, {center}+{after}) leaves 0..{limit}"
        ),
    };
    let start = center.checked_sub(before).ok_or_else(out_of_bounds)?;
    let end = center + after;
    if end > limit || start > end {
        return Err(out_of_bounds());
    }
    Ok(start..end)
}

/// `index` must address a column or row of a raster `limit` wide
pub(crate) fn check_index(index: usize, limit: usize, what: &str) -> Result<()> {
    if index >= limit {
        return Err(SetVisionError::InputShape {
            detail: format!("{what} {index} outside 0..{limit}"),
        });
    }
    Ok(())
}
