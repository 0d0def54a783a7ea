use super::{check_index, classify_grid, window};
use crate::config::TextureConfig;
use crate::error::Result;
use crate::models::{CardBox, CardGrid, Count, Grid, GridPos, Raster, Texture};
use crate::utils::binarization::mean_and_variance;
use tracing::trace;

/// Rows sampled for a card: the symbol centers of a two-symbol card, the
/// card center otherwise
fn strip_rows(card: &CardBox, count: Count, pair_offset: usize) -> Result<Vec<usize>> {
    match count {
        Count::Two => {
            let above = window(card.center_row, pair_offset, 0, usize::MAX, "texture strip")?;
            Ok(vec![above.start, card.center_row + pair_offset])
        }
        Count::One | Count::Three => Ok(vec![card.center_row]),
    }
}

/// Concatenated horizontal strips through the symbol centers
pub fn sample_strips(
    mask: &Raster,
    card: &CardBox,
    count: Count,
    config: &TextureConfig,
) -> Result<Vec<u8>> {
    let cols = window(
        card.center_col,
        config.strip_half_length,
        config.strip_half_length,
        mask.width(),
        "texture strip",
    )?;
    let mut samples = Vec::with_capacity(2 * cols.len());
    for y in strip_rows(card, count, config.pair_offset)? {
        check_index(y, mask.height(), "texture row")?;
        samples.extend_from_slice(&mask.row(y)[cols.clone()]);
    }
    Ok(samples)
}

/// Any spread means stripes; otherwise dark reads as solid, bright as outline
pub fn texture_from_samples(samples: &[u8], mean_threshold: f64) -> Texture {
    let (mean, variance) = mean_and_variance(samples);
    if variance > 0.0 {
        Texture::Striped
    } else if mean < mean_threshold {
        Texture::Solid
    } else {
        Texture::Outline
    }
}

/// Texture of one card; `count` picks the strip rows
pub fn classify_card(
    mask: &Raster,
    card: &CardBox,
    count: Count,
    pos: GridPos,
    config: &TextureConfig,
) -> Result<Texture> {
    let samples = sample_strips(mask, card, count, config)?;
    let texture = texture_from_samples(&samples, config.mean_threshold);
    trace!(%pos, samples = samples.len(), ?texture, "texture strips");
    Ok(texture)
}

/// Classify fills on the raw binary mask, using each card's symbol count
pub fn classify(
    mask: &Raster,
    cards: &CardGrid,
    counts: &Grid<Count>,
    config: &TextureConfig,
) -> Result<Grid<Texture>> {
    classify_grid(cards, |pos, card| {
        classify_card(mask, card, *counts.get(pos), pos, config)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SetVisionError;

    fn card() -> CardBox {
        CardBox {
            center_row: 40,
            center_col: 30,
            width: 50,
            height: 70,
        }
    }

    #[test]
    fn test_decision_rule() {
        assert_eq!(texture_from_samples(&[0; 16], 127.0), Texture::Solid);
        assert_eq!(texture_from_samples(&[255; 16], 127.0), Texture::Outline);
        assert_eq!(texture_from_samples(&[0, 0, 255, 255], 127.0), Texture::Striped);
        // A single differing sample already counts as stripes
        let mut almost = [255u8; 16];
        almost[3] = 0;
        assert_eq!(texture_from_samples(&almost, 127.0), Texture::Striped);
    }

    #[test]
    fn test_single_strip_on_center_row() {
        let mut mask = Raster::filled(60, 80, 255);
        for x in 22..38 {
            mask.set(x, 40, 0);
        }
        let config = TextureConfig::default();
        let samples = sample_strips(&mask, &card(), Count::One, &config).unwrap();
        assert_eq!(samples.len(), 16);
        assert!(samples.iter().all(|&v| v == 0));
        let texture = classify_card(&mask, &card(), Count::Three, GridPos::new(0, 0), &config);
        assert_eq!(texture, Ok(Texture::Solid));
    }

    #[test]
    fn test_two_symbols_use_offset_strips() {
        let mut mask = Raster::filled(60, 80, 255);
        for x in 0..60 {
            if x % 4 < 2 {
                mask.set(x, 20, 0);
                mask.set(x, 60, 0);
            }
        }
        let config = TextureConfig::default();
        let samples = sample_strips(&mask, &card(), Count::Two, &config).unwrap();
        assert_eq!(samples.len(), 32);
        let texture = classify_card(&mask, &card(), Count::Two, GridPos::new(1, 1), &config);
        assert_eq!(texture, Ok(Texture::Striped));
        // The center row is card face, never sampled for two symbols
        let texture = classify_card(&mask, &card(), Count::One, GridPos::new(1, 1), &config);
        assert_eq!(texture, Ok(Texture::Outline));
    }

    #[test]
    fn test_strip_outside_raster() {
        let mask = Raster::filled(60, 50, 255);
        let config = TextureConfig::default();
        let err = sample_strips(&mask, &card(), Count::Two, &config);
        assert!(matches!(err, Err(SetVisionError::InputShape { .. })));
        let narrow = Raster::filled(35, 80, 255);
        assert!(sample_strips(&narrow, &card(), Count::One, &config).is_err());
    }
}
