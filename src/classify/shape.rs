use super::{classify_grid, window};
use crate::config::ShapeConfig;
use crate::detector::connected_components::fill_holes;
use crate::detector::contour::{circularity, outer_contours};
use crate::detector::lines::detect_segments;
use crate::error::{Result, SetVisionError};
use crate::models::{CardBox, CardGrid, Grid, GridPos, Raster, Shape};
use crate::morphology::{self, StructuringElement};
use tracing::trace;

/// Symbols of one card as foreground, cut from the stripe-filled mask.
///
/// The card box is trimmed by `crop_margin` on every side so the card border
/// never enters the crop, then inverted and despeckled.
pub fn symbol_mask(filled: &Raster, card: &CardBox, config: &ShapeConfig) -> Result<Raster> {
    let half_w = card.half_width().saturating_sub(config.crop_margin);
    let half_h = card.half_height().saturating_sub(config.crop_margin);
    let cols = window(card.center_col, half_w, half_w, filled.width(), "shape crop")?;
    let rows = window(card.center_row, half_h, half_h, filled.height(), "shape crop")?;
    let crop = filled.crop(cols.start, rows.start, cols.len(), rows.len())?;
    let se = StructuringElement::square(config.despeckle_size)?;
    Ok(morphology::opening(&crop.inverted(), se, se))
}

/// Shape of the symbols on one card.
///
/// Symbol holes are filled first, so only outer borders are measured.
pub fn classify_card(
    filled: &Raster,
    card: &CardBox,
    pos: GridPos,
    config: &ShapeConfig,
) -> Result<Shape> {
    let symbols = fill_holes(&symbol_mask(filled, card, config)?);
    let edges = morphology::gradient(&symbols);
    let segments = detect_segments(&edges, &config.lines);
    if segments.is_empty() {
        trace!(%pos, "no straight edges");
        return Ok(Shape::Wave);
    }

    let scores: Vec<f64> = outer_contours(&symbols)
        .iter()
        .filter(|c| c.len() > config.contour_min_points)
        .map(|c| circularity(c))
        .collect();
    if scores.is_empty() {
        return Err(SetVisionError::ClassificationAmbiguity {
            classifier: "shape",
            pos,
            detail: format!(
                "{} straight edges but no contour above {} points",
                segments.len(),
                config.contour_min_points
            ),
        });
    }
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    trace!(
        %pos,
        segments = segments.len(),
        contours = scores.len(),
        circularity = mean,
        "shape measures"
    );
    Ok(if mean > config.circularity_threshold {
        Shape::Ellipse
    } else {
        Shape::Diamond
    })
}

/// Classify symbol outlines. `filled` is the stripe-filled mask.
pub fn classify(filled: &Raster, cards: &CardGrid, config: &ShapeConfig) -> Result<Grid<Shape>> {
    classify_grid(cards, |pos, card| classify_card(filled, card, pos, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::fill_stripes;
    use crate::models::{Attributes, Color, Count, Texture};
    use crate::tools::synthetic::{card_box, render_layout};
    use crate::utils::binarization::threshold_binarize;
    use crate::utils::grayscale::rgb_to_grayscale;

    fn filled_layout(layout: &Grid<Attributes>) -> Raster {
        let image = render_layout(layout);
        let (w, h) = (image.width() as usize, image.height() as usize);
        let gray = rgb_to_grayscale(image.as_raw(), w, h).unwrap();
        fill_stripes(&threshold_binarize(&gray, 180), 9, 7).unwrap()
    }

    #[test]
    fn test_symbol_mask_excludes_card_border() {
        let attrs = Attributes::new(Count::One, Texture::Solid, Color::Red, Shape::Diamond);
        let filled = filled_layout(&Grid::from_fn(|_| attrs));
        let symbols = symbol_mask(&filled, &card_box(GridPos::new(0, 0)), &ShapeConfig::default())
            .unwrap();
        assert_eq!((symbols.width(), symbols.height()), (98, 138));
        assert_eq!(symbols.get(0, 0), 0);
        assert_eq!(symbols.get(49, 69), 255);
    }

    #[test]
    fn test_crop_outside_raster() {
        let filled = Raster::filled(50, 50, 255);
        let err = symbol_mask(&filled, &card_box(GridPos::new(0, 0)), &ShapeConfig::default());
        assert!(matches!(err, Err(SetVisionError::InputShape { .. })));
    }

    #[test]
    fn test_blank_card_is_a_wave() {
        // No edges at all falls through to the line-free branch
        let filled = Raster::filled(200, 200, 255);
        let card = CardBox {
            center_row: 100,
            center_col: 100,
            width: 119,
            height: 159,
        };
        let shape = classify_card(&filled, &card, GridPos::new(0, 0), &ShapeConfig::default());
        assert_eq!(shape, Ok(Shape::Wave));
    }

    #[test]
    fn test_outline_waves_are_waves() {
        for count in Count::ALL {
            let attrs = Attributes::new(count, Texture::Outline, Color::Green, Shape::Wave);
            let filled = filled_layout(&Grid::from_fn(|_| attrs));
            let card = card_box(GridPos::new(1, 1));
            let shape = classify_card(&filled, &card, GridPos::new(1, 1), &ShapeConfig::default());
            assert_eq!(shape, Ok(Shape::Wave), "{attrs}");
        }
    }

    #[test]
    fn test_rendered_shapes() {
        let layout = Grid::from_fn(|pos| {
            Attributes::new(
                Count::ALL[(pos.row + pos.col) % 3],
                Texture::ALL[pos.row],
                Color::Green,
                Shape::ALL[pos.col % 3],
            )
        });
        let filled = filled_layout(&layout);
        let cards = Grid::from_fn(card_box);
        let shapes = classify(&filled, &cards, &ShapeConfig::default()).unwrap();
        for (pos, attrs) in layout.iter() {
            assert_eq!(*shapes.get(pos), attrs.shape, "card {pos}: {attrs}");
        }
    }
}
