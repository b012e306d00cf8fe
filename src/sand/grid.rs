//! The falling-sand cellular automaton.

/// Glyph drawn for a grain of sand.
pub const SAND_GLYPH: char = '█';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Sand,
}

/// Fixed-size grid of cells, row 0 at the top.
#[derive(Debug, Clone)]
pub struct SandGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    spawned: usize,
}

impl SandGrid {
    /// Zero dimensions are bumped to 1.
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
            spawned: 0,
        }
    }

    #[cfg(test)]
    pub fn width(&self) -> usize {
        self.width
    }

    #[cfg(test)]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    pub fn budget(&self) -> usize {
        self.width * self.height
    }

    /// Number of grains injected so far.
    #[cfg(test)]
    pub fn spawned(&self) -> usize {
        self.spawned
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if row < self.height && col < self.width {
            self.cells.get(row * self.width + col).copied()
        } else {
            None
        }
    }

    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        if row < self.height && col < self.width {
            if let Some(c) = self.cells.get_mut(row * self.width + col) {
                *c = cell;
            }
        }
    }

    fn is_empty_at(&self, row: usize, col: usize) -> bool {
        self.get(row, col) == Some(Cell::Empty)
    }

    #[cfg(test)]
    pub fn sand_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Sand).count()
    }

    /// One gravity pass.
    ///
    /// Rows are scanned bottom-up (skipping the bottom row), columns left to
    /// right. A grain tries straight down, then down-left, then down-right.
    /// Moves land immediately, so later cells in the same pass see them.
    pub fn settle(&mut self) {
        for row in (0..self.height.saturating_sub(1)).rev() {
            for col in 0..self.width {
                if self.get(row, col) != Some(Cell::Sand) {
                    continue;
                }
                let below = row + 1;
                let target = if self.is_empty_at(below, col) {
                    Some(col)
                } else if col > 0 && self.is_empty_at(below, col - 1) {
                    Some(col - 1)
                } else if col + 1 < self.width && self.is_empty_at(below, col + 1) {
                    Some(col + 1)
                } else {
                    None
                };
                if let Some(to) = target {
                    self.set(below, to, Cell::Sand);
                    self.set(row, col, Cell::Empty);
                }
            }
        }
    }

    /// Drop a grain into the top row. Columns cycle `0, 1, .., width-1, 0, ..`.
    /// Returns the column used.
    pub fn spawn(&mut self) -> usize {
        let col = self.spawned % self.width;
        self.set(0, col, Cell::Sand);
        self.spawned = self.spawned.wrapping_add(1);
        col
    }

    /// Row-major text, one line per row.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity((self.width * SAND_GLYPH.len_utf8() + 1) * self.height);
        for row in self.cells.chunks(self.width) {
            for cell in row {
                match cell {
                    Cell::Sand => out.push(SAND_GLYPH),
                    Cell::Empty => out.push(' '),
                }
            }
            out.push('\n');
        }
        out
    }
}
