use super::grid::Grid;
use super::point::Point;

/// Axis-aligned description of one detected card.
///
/// `width <= height` always holds: the shorter side of the fitted rectangle is
/// taken as the width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CardBox {
    /// Image row of the card center
    pub center_row: usize,
    /// Image column of the card center
    pub center_col: usize,
    /// Shorter side in pixels
    pub width: usize,
    /// Longer side in pixels
    pub height: usize,
}

impl CardBox {
    /// Build from a fitted rectangle, normalizing side order
    pub fn from_rect(center: Point, side1: f32, side2: f32) -> Self {
        let (short, long) = if side1 < side2 {
            (side1, side2)
        } else {
            (side2, side1)
        };
        Self {
            center_row: center.y.max(0.0) as usize,
            center_col: center.x.max(0.0) as usize,
            width: short.max(0.0) as usize,
            height: long.max(0.0) as usize,
        }
    }

    /// Half of the height, rounded down
    pub fn half_height(&self) -> usize {
        self.height / 2
    }

    /// Half of the width, rounded down
    pub fn half_width(&self) -> usize {
        self.width / 2
    }
}

/// Localized cards in display order
pub type CardGrid = Grid<CardBox>;
