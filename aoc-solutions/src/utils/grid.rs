//! Dense rectangular grids parsed from puzzle text.

use aoc_solver::ParseError;

/// A cell coordinate; row 0 is the first input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn manhattan(self, other: Pos) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Up, down, left, right; coordinates that would go below zero are skipped.
    pub fn neighbors(self) -> impl Iterator<Item = Pos> {
        let Pos { row, col } = self;
        [
            row.checked_sub(1).map(|r| Pos::new(r, col)),
            Some(Pos::new(row + 1, col)),
            col.checked_sub(1).map(|c| Pos::new(row, c)),
            Some(Pos::new(row, col + 1)),
        ]
        .into_iter()
        .flatten()
    }
}

/// Row-major grid of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    cells: Vec<T>,
    width: usize,
    height: usize,
}

impl<T> Grid<T> {
    /// Parse one cell per character, one row per non-empty line.
    ///
    /// Fails on an empty input, ragged rows, or the first character `cell`
    /// rejects. Errors carry the 1-based line number.
    pub fn parse<F>(input: &str, mut cell: F) -> Result<Self, ParseError>
    where
        F: FnMut(Pos, char) -> Result<T, ParseError>,
    {
        let mut cells = Vec::new();
        let mut width = None;
        let mut height = 0;

        for (number, line) in input.lines().map(str::trim_end).enumerate() {
            if line.is_empty() {
                continue;
            }
            let len = line.chars().count();
            match width {
                None => width = Some(len),
                Some(w) if w != len => {
                    return Err(ParseError::InvalidFormat(format!(
                        "line {}: expected {w} cells, found {len}",
                        number + 1
                    )));
                }
                Some(_) => {}
            }
            for (col, ch) in line.chars().enumerate() {
                cells.push(cell(Pos::new(height, col), ch)?);
            }
            height += 1;
        }

        let width = width.ok_or_else(|| ParseError::MissingData("empty grid".to_string()))?;
        Ok(Self {
            cells,
            width,
            height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.row < self.height && pos.col < self.width
    }

    pub fn get(&self, pos: Pos) -> Option<&T> {
        self.contains(pos)
            .then(|| &self.cells[pos.row * self.width + pos.col])
    }

    /// Every position with its cell, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Pos, &T)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (Pos::new(i / width, i % width), cell))
    }

    /// In-bounds orthogonal neighbors of `pos`.
    pub fn neighbors(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        pos.neighbors().filter(|&p| self.contains(p))
    }
}
