use crate::config::{LocateStrategy, LocatorConfig};
use crate::detector::connected_components::label_components;
use crate::detector::contour::{RotatedRect, outer_contours};
use crate::error::{Result, SetVisionError};
use crate::models::{CardBox, CardGrid, GRID_COLS, Grid, Point, Raster};
use crate::morphology::{self, StructuringElement};
use tracing::debug;

/// Opening applied to the mask before component labeling
const COMPONENT_OPENING_SIZE: usize = 5;

/// Card localizer over a binarized layout photo
pub struct CardLocator;

impl CardLocator {
    /// Find the twelve cards in a binary mask and order them top to bottom,
    /// left to right.
    pub fn locate(mask: &Raster, config: &LocatorConfig) -> Result<CardGrid> {
        let boxes = Self::candidate_boxes(mask, config)?;
        debug!(
            strategy = ?config.strategy,
            found = boxes.len(),
            "card candidates"
        );
        arrange_grid(boxes, config.expected_cards)
    }

    /// Rectangles with both sides above `config.min_side`, in no particular order
    pub fn candidate_boxes(mask: &Raster, config: &LocatorConfig) -> Result<Vec<CardBox>> {
        let boxes = match config.strategy {
            LocateStrategy::Contours => outer_contours(mask)
                .iter()
                .filter_map(|c| RotatedRect::fit(c))
                .filter(|rect| {
                    let (a, b) = rect.sides();
                    a > config.min_side && b > config.min_side
                })
                .map(|rect| rect.to_card_box())
                .collect(),
            LocateStrategy::Components => {
                let se = StructuringElement::square(COMPONENT_OPENING_SIZE)?;
                let opened = morphology::opening(mask, se, se);
                label_components(&opened)
                    .bounding_boxes()
                    .into_iter()
                    .filter_map(|b| {
                        let w = (b.max_x - b.min_x) as f32;
                        let h = (b.max_y - b.min_y) as f32;
                        if w <= config.min_side || h <= config.min_side {
                            return None;
                        }
                        let center = Point::new(
                            (b.min_x + b.max_x) as f32 / 2.0,
                            (b.min_y + b.max_y) as f32 / 2.0,
                        );
                        Some(CardBox::from_rect(center, w, h))
                    })
                    .collect()
            }
        };
        Ok(boxes)
    }
}

/// Order card boxes into the 3x4 display grid.
///
/// Boxes are sorted by center row, bottom first, cut into rows of four, and
/// the rows are reversed so row 0 is the top of the image. Each row is then
/// sorted by center column.
pub fn arrange_grid(mut boxes: Vec<CardBox>, expected: usize) -> Result<CardGrid> {
    if boxes.len() != expected {
        return Err(SetVisionError::DetectionCount {
            found: boxes.len(),
            expected,
        });
    }

    boxes.sort_by(|a, b| b.center_row.cmp(&a.center_row));
    let mut rows: Vec<Vec<CardBox>> = boxes.chunks(GRID_COLS).map(<[CardBox]>::to_vec).collect();
    rows.reverse();

    let min_height = rows.iter().flatten().map(|b| b.height).min().unwrap_or(0);
    for (index, row) in rows.iter_mut().enumerate() {
        row.sort_by_key(|b| b.center_col);
        let top = row.iter().map(|b| b.center_row).min().unwrap_or(0);
        let bottom = row.iter().map(|b| b.center_row).max().unwrap_or(0);
        if (bottom - top) * 2 >= min_height {
            return Err(SetVisionError::InconsistentGrid {
                reason: format!(
                    "row {index} spans {} px of center rows, cards are {min_height} px tall",
                    bottom - top
                ),
            });
        }
    }

    Grid::from_vec(rows.into_iter().flatten().collect()).ok_or_else(|| {
        SetVisionError::InconsistentGrid {
            reason: format!("{expected} cards cannot fill a 3x4 layout"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GridPos;

    fn card(center_col: usize, center_row: usize) -> CardBox {
        CardBox {
            center_row,
            center_col,
            width: 119,
            height: 159,
        }
    }

    fn layout_boxes() -> Vec<CardBox> {
        let mut boxes = Vec::new();
        for r in 0..3 {
            for c in 0..4 {
                boxes.push(card(79 + c * 140, 99 + r * 180));
            }
        }
        boxes
    }

    fn layout_mask() -> Raster {
        let mut mask = Raster::new(580, 560);
        for r in 0..3 {
            for c in 0..4 {
                let (x0, y0) = (20 + c * 140, 20 + r * 180);
                for y in y0..y0 + 160 {
                    for x in x0..x0 + 120 {
                        mask.set(x, y, 255);
                    }
                }
                // symbol hole
                for y in y0 + 60..y0 + 100 {
                    for x in x0 + 30..x0 + 90 {
                        mask.set(x, y, 0);
                    }
                }
            }
        }
        mask
    }

    #[test]
    fn test_arrange_grid_orders_rows_and_columns() {
        let mut boxes = layout_boxes();
        boxes.reverse();
        boxes.swap(2, 7);
        let grid = arrange_grid(boxes, 12).unwrap();
        assert_eq!(*grid.get(GridPos::new(0, 0)), card(79, 99));
        assert_eq!(*grid.get(GridPos::new(0, 3)), card(499, 99));
        assert_eq!(*grid.get(GridPos::new(2, 1)), card(219, 459));
    }

    #[test]
    fn test_arrange_grid_tolerates_small_tilt() {
        let mut boxes = layout_boxes();
        for (i, b) in boxes.iter_mut().enumerate() {
            b.center_row += (i % 4) * 10;
        }
        let grid = arrange_grid(boxes, 12).unwrap();
        assert_eq!(grid.get(GridPos::new(1, 2)).center_col, 359);
    }

    #[test]
    fn test_wrong_card_count() {
        let mut boxes = layout_boxes();
        boxes.pop();
        assert_eq!(
            arrange_grid(boxes, 12),
            Err(SetVisionError::DetectionCount {
                found: 11,
                expected: 12
            })
        );
    }

    #[test]
    fn test_staggered_rows_are_inconsistent() {
        // Columns drift down so rows of four straddle two visual rows
        let mut boxes = Vec::new();
        for r in 0..3 {
            for c in 0..4 {
                boxes.push(card(79 + c * 140, 99 + r * 180 + c * 60));
            }
        }
        assert!(matches!(
            arrange_grid(boxes, 12),
            Err(SetVisionError::InconsistentGrid { .. })
        ));
    }

    #[test]
    fn test_locate_with_contours() {
        let mut mask = layout_mask();
        // Small blob ignored by the size filter
        for y in 5..12 {
            for x in 5..12 {
                mask.set(x, y, 255);
            }
        }
        let grid = CardLocator::locate(&mask, &LocatorConfig::default()).unwrap();
        assert_eq!(*grid.get(GridPos::new(0, 0)), card(79, 99));
        assert_eq!(*grid.get(GridPos::new(2, 3)), card(499, 459));
    }

    #[test]
    fn test_strategies_agree() {
        let mask = layout_mask();
        let contours = CardLocator::locate(&mask, &LocatorConfig::default()).unwrap();
        let config = LocatorConfig {
            strategy: LocateStrategy::Components,
            ..LocatorConfig::default()
        };
        let components = CardLocator::locate(&mask, &config).unwrap();
        assert_eq!(contours, components);
    }

    #[test]
    fn test_empty_mask_finds_nothing() {
        let err = CardLocator::locate(&Raster::new(100, 100), &LocatorConfig::default());
        assert_eq!(
            err,
            Err(SetVisionError::DetectionCount {
                found: 0,
                expected: 12
            })
        );
    }
}
