use super::grid::{Grid, GridPos};
use std::fmt;

/// Number of symbols printed on a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Count {
    /// One symbol
    One = 1,
    /// Two symbols
    Two = 2,
    /// Three symbols
    Three = 3,
}

/// Fill of the symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Texture {
    /// Outline only (hollow)
    Outline = 1,
    /// Solid fill
    Solid = 2,
    /// Striped fill
    Striped = 3,
}

/// Ink color of the symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Red ink
    Red = 1,
    /// Green ink
    Green = 2,
    /// Purple ink
    Purple = 3,
}

/// Outline geometry of the symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Rhombus
    Diamond = 1,
    /// Rounded oval
    Ellipse = 2,
    /// Squiggle
    Wave = 3,
}

macro_rules! attribute_value {
    ($ty:ident, $a:ident, $b:ident, $c:ident) => {
        impl $ty {
            /// Every value of this attribute, in numeric order
            pub const ALL: [$ty; 3] = [$ty::$a, $ty::$b, $ty::$c];

            /// Numeric code in {1, 2, 3}
            pub fn value(self) -> u8 {
                self as u8
            }

            /// Parse a numeric code in {1, 2, 3}
            pub fn from_value(value: u8) -> Option<Self> {
                match value {
                    1 => Some($ty::$a),
                    2 => Some($ty::$b),
                    3 => Some($ty::$c),
                    _ => None,
                }
            }
        }
    };
}

attribute_value!(Count, One, Two, Three);
attribute_value!(Texture, Outline, Solid, Striped);
attribute_value!(Color, Red, Green, Purple);
attribute_value!(Shape, Diamond, Ellipse, Wave);

/// The four attributes of one card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Attributes {
    /// Symbol count
    pub count: Count,
    /// Symbol fill
    pub texture: Texture,
    /// Symbol color
    pub color: Color,
    /// Symbol shape
    pub shape: Shape,
}

impl Attributes {
    /// Create a new attribute tuple
    pub fn new(count: Count, texture: Texture, color: Color, shape: Shape) -> Self {
        Self {
            count,
            texture,
            color,
            shape,
        }
    }

    /// Feature vector `(count, texture, color, shape)` over {1, 2, 3}
    pub fn features(&self) -> [u8; 4] {
        [
            self.count.value(),
            self.texture.value(),
            self.color.value(),
            self.shape.value(),
        ]
    }

    /// Inverse of [`Attributes::features`]
    pub fn from_features(features: [u8; 4]) -> Option<Self> {
        Some(Self {
            count: Count::from_value(features[0])?,
            texture: Texture::from_value(features[1])?,
            color: Color::from_value(features[2])?,
            shape: Shape::from_value(features[3])?,
        })
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{:?}-{:?}-{:?}",
            self.count.value(),
            self.texture,
            self.color,
            self.shape
        )
    }
}

/// Attribute tuples in the same layout as the card grid
pub type AttributeGrid = Grid<Attributes>;

/// Three distinct grid cells forming a valid set, stored in ascending order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SetTriple {
    cells: [GridPos; 3],
}

impl SetTriple {
    /// Build from three positions in any order; `None` if any two coincide
    pub fn new(a: GridPos, b: GridPos, c: GridPos) -> Option<Self> {
        let mut cells = [a, b, c];
        cells.sort();
        if cells[0] == cells[1] || cells[1] == cells[2] {
            return None;
        }
        Some(Self { cells })
    }

    /// Member positions in ascending row-major order
    pub fn cells(&self) -> [GridPos; 3] {
        self.cells
    }

    /// Whether `pos` is one of the three cells
    pub fn contains(&self, pos: GridPos) -> bool {
        self.cells.contains(&pos)
    }
}

impl fmt::Display for SetTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.cells[0], self.cells[1], self.cells[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_round_trip() {
        let attrs = Attributes::new(Count::Two, Texture::Striped, Color::Red, Shape::Wave);
        assert_eq!(attrs.features(), [2, 3, 1, 3]);
        assert_eq!(Attributes::from_features([2, 3, 1, 3]), Some(attrs));
        assert_eq!(Attributes::from_features([0, 3, 1, 3]), None);
        assert_eq!(Attributes::from_features([1, 4, 1, 3]), None);
    }

    #[test]
    fn test_set_triple_is_order_independent() {
        let a = GridPos::new(0, 1);
        let b = GridPos::new(2, 3);
        let c = GridPos::new(1, 0);
        let t1 = SetTriple::new(a, b, c).unwrap();
        let t2 = SetTriple::new(c, a, b).unwrap();
        assert_eq!(t1, t2);
        assert_eq!(t1.cells(), [a, c, b]);
        assert!(t1.contains(b));
        assert!(SetTriple::new(a, a, b).is_none());
    }
}
