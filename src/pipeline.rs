use crate::classify::{color, count, fill_stripes, shape, texture};
use crate::config::PipelineConfig;
use crate::detector::localizer::CardLocator;
use crate::error::Result;
use crate::matcher::find_triples;
use crate::models::{
    AttributeGrid, Attributes, CardGrid, Count, Grid, Raster, SetTriple, Texture,
};
use crate::utils::binarization::threshold_binarize;
use crate::utils::grayscale::rgb_to_grayscale;
use crate::utils::hsv::{HsvImage, rgb_to_hsv};
use std::borrow::Cow;
use std::collections::BTreeSet;
use tracing::debug;

/// Everything one run produces
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Card boxes in display order
    pub cards: CardGrid,
    /// Attributes of each card, same layout as `cards`
    pub attributes: AttributeGrid,
    /// All sets on the board
    pub triples: BTreeSet<SetTriple>,
}

/// Grayscale, then global threshold: cards become foreground (255)
pub fn binarize_rgb(rgb: &[u8], width: usize, height: usize, threshold: u8) -> Result<Raster> {
    let gray = rgb_to_grayscale(rgb, width, height)?;
    let mask = threshold_binarize(&gray, threshold);
    debug!(
        width,
        height,
        threshold,
        foreground = mask.count_nonzero(),
        "binarized"
    );
    Ok(mask)
}

/// Run the four classifiers over located cards.
///
/// Texture needs the counts, so count and texture run in sequence while color
/// and shape run alongside them.
pub fn classify_cards(
    mask: &Raster,
    hsv: &HsvImage,
    cards: &CardGrid,
    config: &PipelineConfig,
) -> Result<AttributeGrid> {
    let count_fill = fill_stripes(mask, config.count.erosion_size, config.count.dilation_size)?;
    let shape_fill = if (config.shape.erosion_size, config.shape.dilation_size)
        == (config.count.erosion_size, config.count.dilation_size)
    {
        Cow::Borrowed(&count_fill)
    } else {
        Cow::Owned(fill_stripes(
            mask,
            config.shape.erosion_size,
            config.shape.dilation_size,
        )?)
    };

    let (fill_side, ink_side) = rayon::join(
        || -> Result<(Grid<Count>, Grid<Texture>)> {
            let counts = count::classify(&count_fill, cards, &config.count)?;
            let textures = texture::classify(mask, cards, &counts, &config.texture)?;
            Ok((counts, textures))
        },
        || -> Result<_> {
            let colors = color::classify(hsv, cards, &config.color)?;
            let shapes = shape::classify(&shape_fill, cards, &config.shape)?;
            Ok((colors, shapes))
        },
    );
    let (counts, textures) = fill_side?;
    let (colors, shapes) = ink_side?;

    Ok(counts.map(|pos, &count| {
        Attributes::new(count, *textures.get(pos), *colors.get(pos), *shapes.get(pos))
    }))
}

/// Locate, classify and match the cards of one interleaved RGB photo.
pub fn analyze(rgb: &[u8], width: usize, height: usize, config: &PipelineConfig) -> Result<Analysis> {
    let mask = binarize_rgb(rgb, width, height, config.binary_threshold)?;
    let cards = CardLocator::locate(&mask, &config.locator)?;
    let hsv = rgb_to_hsv(rgb, width, height)?;
    let attributes = classify_cards(&mask, &hsv, &cards, config)?;
    for (pos, attrs) in attributes.iter() {
        debug!(%pos, %attrs, "card classified");
    }
    let triples = find_triples(&attributes);
    Ok(Analysis {
        cards,
        attributes,
        triples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SetVisionError;
    use crate::models::{Color, Shape};
    use crate::tools::synthetic::render_layout;

    #[test]
    fn test_buffer_size_mismatch() {
        let rgb = vec![0u8; 10];
        assert_eq!(
            analyze(&rgb, 2, 2, &PipelineConfig::default()),
            Err(SetVisionError::SizeMismatch {
                expected: 12,
                actual: 10
            })
        );
    }

    #[test]
    fn test_blank_photo_has_no_cards() {
        let rgb = vec![30u8; 200 * 100 * 3];
        assert_eq!(
            analyze(&rgb, 200, 100, &PipelineConfig::default()),
            Err(SetVisionError::DetectionCount {
                found: 0,
                expected: 12
            })
        );
    }

    #[test]
    fn test_gray_ink_is_ambiguous_color() {
        let attrs = Attributes::new(Count::Two, Texture::Solid, Color::Red, Shape::Diamond);
        let mut image = render_layout(&Grid::from_fn(|_| attrs));
        for pixel in image.pixels_mut() {
            if pixel.0 == [255, 0, 0] {
                pixel.0 = [90, 90, 90];
            }
        }
        let (w, h) = (image.width() as usize, image.height() as usize);
        let result = analyze(image.as_raw(), w, h, &PipelineConfig::default());
        assert!(matches!(
            result,
            Err(SetVisionError::ClassificationAmbiguity {
                classifier: "color",
                ..
            })
        ));
    }

    #[test]
    fn test_distinct_shape_fill_sizes() {
        let attrs = Attributes::new(Count::One, Texture::Striped, Color::Purple, Shape::Ellipse);
        let image = render_layout(&Grid::from_fn(|_| attrs));
        let (w, h) = (image.width() as usize, image.height() as usize);
        let mut config = PipelineConfig::default();
        config.shape.erosion_size = 11;
        config.shape.dilation_size = 9;
        let analysis = analyze(image.as_raw(), w, h, &config).unwrap();
        assert!(analysis.attributes.as_slice().iter().all(|a| *a == attrs));
        // Twelve identical cards: every unordered triple is a set
        assert_eq!(analysis.triples.len(), 220);
    }
}
