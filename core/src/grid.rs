//! Row-major 2D buffer used for tile maps and collision layers.

use std::ops::{Index, IndexMut};

/// A `width` × `height` grid of cells stored row by row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Creates a grid with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width * height],
        }
    }

    /// Copies the `width` × `height` region at (`x`, `y`).
    ///
    /// The region is clipped to the grid, so the result may be smaller than
    /// requested (or empty).
    pub fn subgrid(&self, x: usize, y: usize, width: usize, height: usize) -> Self {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        let width = x_end.saturating_sub(x);
        let height = y_end.saturating_sub(y);
        if width == 0 || height == 0 {
            return Self {
                width: 0,
                height: 0,
                cells: Vec::new(),
            };
        }

        let mut cells = Vec::with_capacity(width * height);
        for row in y..y + height {
            cells.extend_from_slice(&self.row(row)[x..x + width]);
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Writes `source` into this grid with its top-left corner at
    /// (`x`, `y`). Cells falling outside the grid are skipped.
    pub fn paste(&mut self, x: usize, y: usize, source: &Grid<T>) {
        let x_end = x.saturating_add(source.width).min(self.width);
        let y_end = y.saturating_add(source.height).min(self.height);
        if x >= x_end {
            return;
        }
        let width = x_end - x;
        for row in y..y_end {
            let src = &source.row(row - y)[..width];
            let start = row * self.width + x;
            self.cells[start..start + width].clone_from_slice(src);
        }
    }

    /// Returns a copy resized to `width` × `height`.
    ///
    /// Existing cells keep their coordinates; new cells are set to `fill`.
    pub fn resized(&self, width: usize, height: usize, fill: T) -> Self {
        let mut grid = Self::filled(width, height, fill);
        grid.paste(0, 0, self);
        grid
    }
}

impl<T: Clone + Default> Grid<T> {
    /// Creates a grid of default cells.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, T::default())
    }
}

impl<T> Grid<T> {
    /// Builds a grid from row-major cells, or `None` if the cell count does
    /// not match the dimensions.
    pub fn from_vec(width: usize, height: usize, cells: Vec<T>) -> Option<Self> {
        (cells.len() == width * height).then_some(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        self.contains(x, y).then(|| &self.cells[y * self.width + x])
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if self.contains(x, y) {
            Some(&mut self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Sets one cell; returns `false` if (`x`, `y`) is outside the grid.
    pub fn set(&mut self, x: usize, y: usize, value: T) -> bool {
        match self.get_mut(x, y) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Cells of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row(&self, y: usize) -> &[T] {
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    /// All cells, row-major.
    pub fn cells(&self) -> &[T] {
        &self.cells
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (x, y): (usize, usize)) -> &T {
        assert!(self.contains(x, y), "grid cell ({x}, {y}) out of bounds");
        &self.cells[y * self.width + x]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut T {
        assert!(self.contains(x, y), "grid cell ({x}, {y}) out of bounds");
        &mut self.cells[y * self.width + x]
    }
}
