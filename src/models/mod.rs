/// Card attributes, attribute grids and set triples
pub mod attributes;
/// Located card boxes
pub mod card;
/// 3x4 layout grid and cell positions
pub mod grid;
/// Floating point image coordinates
pub mod point;
/// Single-channel 8-bit raster
pub mod raster;

pub use attributes::{AttributeGrid, Attributes, Color, Count, SetTriple, Shape, Texture};
pub use card::{CardBox, CardGrid};
pub use grid::{CARD_COUNT, GRID_COLS, GRID_ROWS, Grid, GridPos};
pub use point::Point;
pub use raster::Raster;
