use crate::models::{CardBox, Point, Raster};
use imageproc::contours::{BorderType, find_contours};
use imageproc::geometry::{arc_length, min_area_rect};
use imageproc::point::Point as PixelPoint;

/// Closed pixel chain along the outer border of one blob
pub type Contour = Vec<PixelPoint<i32>>;

/// Outer borders of top-level blobs.
///
/// Hole borders are dropped, and so are blobs nested inside another blob's
/// hole.
pub fn outer_contours(mask: &Raster) -> Vec<Contour> {
    if mask.width() == 0 || mask.height() == 0 {
        return Vec::new();
    }
    find_contours::<i32>(&mask.to_gray_image())
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| c.points)
        .collect()
}

/// Minimum-area rectangle around a contour, corners in traversal order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatedRect {
    /// Rectangle corners, each adjacent to the next
    pub corners: [Point; 4],
}

impl RotatedRect {
    /// Fit the rectangle, `None` for fewer than three points
    pub fn fit(contour: &[PixelPoint<i32>]) -> Option<Self> {
        if contour.len() < 3 {
            return None;
        }
        let corners = min_area_rect(contour).map(Point::from);
        Some(Self { corners })
    }

    /// Mean of the four corners
    pub fn center(&self) -> Point {
        Point::centroid(&self.corners)
    }

    /// Lengths of the two adjacent sides at corner 1
    pub fn sides(&self) -> (f32, f32) {
        (
            self.corners[0].distance(&self.corners[1]),
            self.corners[1].distance(&self.corners[2]),
        )
    }

    /// Card box with `width <= height`
    pub fn to_card_box(&self) -> CardBox {
        let (a, b) = self.sides();
        CardBox::from_rect(self.center(), a, b)
    }
}

/// Enclosed area of a closed polygon (shoelace formula)
pub fn polygon_area(points: &[PixelPoint<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(p, q)| p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64)
        .sum();
    twice.abs() as f64 / 2.0
}

/// Length of the closed contour
pub fn perimeter(points: &[PixelPoint<i32>]) -> f64 {
    arc_length(points, true)
}

/// `4 * pi * area / perimeter^2`: 1 for a disc, near 0 for slivers
pub fn circularity(points: &[PixelPoint<i32>]) -> f64 {
    let p = perimeter(points);
    if p <= f64::EPSILON {
        return 0.0;
    }
    4.0 * std::f64::consts::PI * polygon_area(points) / (p * p)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(width: usize, height: usize, x0: usize, y0: usize, w: usize, h: usize) -> Raster {
        let mut mask = Raster::new(width, height);
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                mask.set(x, y, 255);
            }
        }
        mask
    }

    #[test]
    fn test_outer_contours_skip_holes() {
        let mut mask = block(40, 40, 5, 5, 20, 20);
        for y in 10..15 {
            for x in 10..15 {
                mask.set(x, y, 0);
            }
        }
        let contours = outer_contours(&mask);
        assert_eq!(contours.len(), 1);
        assert!(contours[0].iter().all(|p| p.x >= 5 && p.x <= 24));
    }

    #[test]
    fn test_blob_inside_hole_is_not_external() {
        let mut mask = block(40, 40, 5, 5, 25, 25);
        for y in 10..25 {
            for x in 10..25 {
                mask.set(x, y, 0);
            }
        }
        // Island in the middle of the hole
        for y in 15..20 {
            for x in 15..20 {
                mask.set(x, y, 255);
            }
        }
        let contours = outer_contours(&mask);
        assert_eq!(contours.len(), 1);
        assert!(contours[0].iter().any(|p| p.x == 5 && p.y == 5));
    }

    #[test]
    fn test_min_area_rect_of_block() {
        let mask = block(60, 80, 5, 3, 20, 40);
        let contours = outer_contours(&mask);
        let rect = RotatedRect::fit(&contours[0]).unwrap();
        let (a, b) = rect.sides();
        let (short, long) = (a.min(b), a.max(b));
        assert!((short - 19.0).abs() < 1e-3);
        assert!((long - 39.0).abs() < 1e-3);

        let card = rect.to_card_box();
        assert_eq!((card.center_col, card.center_row), (14, 22));
        assert_eq!((card.width, card.height), (19, 39));
    }

    #[test]
    fn test_fit_rejects_degenerate_contours() {
        assert!(RotatedRect::fit(&[PixelPoint::new(1, 1)]).is_none());
    }

    #[test]
    fn test_shoelace_area() {
        let square = [
            PixelPoint::new(0, 0),
            PixelPoint::new(10, 0),
            PixelPoint::new(10, 10),
            PixelPoint::new(0, 10),
        ];
        assert_eq!(polygon_area(&square), 100.0);
        assert_eq!(perimeter(&square), 40.0);
        let expected = std::f64::consts::PI / 4.0;
        assert!((circularity(&square) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_circularity_separates_disc_and_sliver() {
        let mut disc = Raster::new(60, 60);
        for y in 0..60 {
            for x in 0..60 {
                let (dx, dy) = (x as f64 - 30.0, y as f64 - 30.0);
                if dx * dx + dy * dy <= 400.0 {
                    disc.set(x, y, 255);
                }
            }
        }
        let disc_contour = &outer_contours(&disc)[0];
        assert!(circularity(disc_contour) > 0.8);

        let sliver = block(80, 20, 5, 5, 60, 6);
        let sliver_contour = &outer_contours(&sliver)[0];
        assert!(circularity(sliver_contour) < 0.4);
    }
}
