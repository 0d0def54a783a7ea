use std::fmt;

/// Rows in the fixed card layout
pub const GRID_ROWS: usize = 3;
/// Columns in the fixed card layout
pub const GRID_COLS: usize = 4;
/// Cards in the fixed card layout
pub const CARD_COUNT: usize = GRID_ROWS * GRID_COLS;

/// Cell coordinate in the 3x4 layout. Row 0 is the top of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct GridPos {
    /// Row index (0..3)
    pub row: usize,
    /// Column index (0..4)
    pub col: usize,
}

impl GridPos {
    /// Create a new grid position
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Row-major flat index
    pub fn index(&self) -> usize {
        self.row * GRID_COLS + self.col
    }

    /// Inverse of [`GridPos::index`]
    pub fn from_index(index: usize) -> Self {
        Self {
            row: index / GRID_COLS,
            col: index % GRID_COLS,
        }
    }

    /// All twelve positions in row-major order
    pub fn all() -> impl Iterator<Item = GridPos> {
        (0..CARD_COUNT).map(GridPos::from_index)
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Row-major 3x4 array, one value per card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Build from exactly twelve row-major values
    pub fn from_vec(cells: Vec<T>) -> Option<Self> {
        if cells.len() != CARD_COUNT {
            return None;
        }
        Some(Self { cells })
    }

    /// Build by evaluating `f` for every position
    pub fn from_fn(mut f: impl FnMut(GridPos) -> T) -> Self {
        Self {
            cells: GridPos::all().map(&mut f).collect(),
        }
    }

    /// Value at `pos`
    pub fn get(&self, pos: GridPos) -> &T {
        &self.cells[pos.index()]
    }

    /// Iterate `(position, value)` pairs in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (GridPos, &T)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, v)| (GridPos::from_index(i), v))
    }

    /// Values in row-major order
    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    /// One row of four values
    pub fn row(&self, row: usize) -> &[T] {
        &self.cells[row * GRID_COLS..(row + 1) * GRID_COLS]
    }

    /// Apply `f` cell-wise
    pub fn map<U>(&self, mut f: impl FnMut(GridPos, &T) -> U) -> Grid<U> {
        Grid {
            cells: self.iter().map(|(pos, v)| f(pos, v)).collect(),
        }
    }
}
