use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Character every freshly created or newly exposed cell holds.
pub const FILL_CHAR: char = '.';

/// A rectangular grid of single-character cells.
///
/// A `Grid` always has at least one row and one column and every row has the
/// same length, so `height()` and `width()` are read straight off the data and
/// can never disagree with it. All the operations in this module return a new
/// grid and leave their input untouched.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<char>>", into = "Vec<Vec<char>>")]
pub struct Grid {
    rows: Vec<Vec<char>>,
}

/// Result of [`rotate_clockwise`]: the rotated grid and its new dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rotated {
    pub grid: Grid,
    pub height: usize,
    pub width: usize,
}

impl Grid {
    pub fn from_rows(rows: Vec<Vec<char>>) -> Result<Self> {
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(GridError::InvalidDimension(
                "a grid needs at least one row and one column".to_string(),
            ));
        }
        if let Some(r) = rows.iter().position(|row| row.len() != width) {
            return Err(GridError::InvalidDimension(format!(
                "row {} has {} cells but the grid is {} wide",
                r + 1,
                rows[r].len(),
                width
            )));
        }
        Ok(Grid { rows })
    }

    /// Builds a grid from one string per row.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        Self::from_rows(
            lines
                .iter()
                .map(|line| line.as_ref().chars().collect())
                .collect(),
        )
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows[0].len()
    }

    pub fn rows(&self) -> &[Vec<char>] {
        &self.rows
    }

    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.height() && (col as usize) < self.width()
    }

    pub fn get(&self, row: i32, col: i32) -> Option<char> {
        if self.in_bounds(row, col) {
            Some(self.rows[row as usize][col as usize])
        } else {
            None
        }
    }

    /// Each row rendered as a string, top to bottom.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.rows.iter().map(|row| row.iter().collect())
    }

    /// All cells in row-major order with no separators.
    pub fn flatten(&self) -> String {
        self.rows.iter().flatten().collect()
    }

    // Writes in place; out-of-bounds writes are dropped.
    fn put(&mut self, row: i32, col: i32, ch: char) -> bool {
        if !self.in_bounds(row, col) {
            return false;
        }
        self.rows[row as usize][col as usize] = ch;
        true
    }
}

impl TryFrom<Vec<Vec<char>>> for Grid {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<char>>) -> Result<Self> {
        Grid::from_rows(rows)
    }
}

impl From<Grid> for Vec<Vec<char>> {
    fn from(grid: Grid) -> Self {
        grid.rows
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            f.write_str(&line)?;
        }
        Ok(())
    }
}

/// Validates a requested size and converts it to row/column counts.
pub fn check_dimensions(height: i32, width: i32) -> Result<(usize, usize)> {
    if height <= 0 || width <= 0 {
        return Err(GridError::InvalidDimension(format!(
            "height and width must be positive integers (got {} x {})",
            height, width
        )));
    }
    Ok((height as usize, width as usize))
}

/// Parses height/width as typed by a user.
pub fn parse_dimensions(height: &str, width: &str) -> Result<(i32, i32)> {
    let parse = |label: &str, text: &str| -> Result<i32> {
        match text.trim().parse::<i32>() {
            Ok(value) if value > 0 => Ok(value),
            _ => Err(GridError::InvalidDimension(format!(
                "{} must be a positive integer (got `{}`)",
                label,
                text.trim()
            ))),
        }
    };
    Ok((parse("height", height)?, parse("width", width)?))
}

pub fn create_grid(height: i32, width: i32, fill: char) -> Result<Grid> {
    let (h, w) = check_dimensions(height, width)?;
    Ok(Grid {
        rows: vec![vec![fill; w]; h],
    })
}

/// Resizes to `height` x `width`, keeping every cell that still fits and
/// filling the rest with [`FILL_CHAR`].
pub fn resize_preserving(grid: &Grid, height: i32, width: i32) -> Result<Grid> {
    let (h, w) = check_dimensions(height, width)?;
    let rows = (0..h)
        .map(|r| {
            (0..w)
                .map(|c| {
                    grid.rows
                        .get(r)
                        .and_then(|row| row.get(c))
                        .copied()
                        .unwrap_or(FILL_CHAR)
                })
                .collect()
        })
        .collect();
    Ok(Grid { rows })
}

/// Rotates 90 degrees clockwise: `out[c][(H - 1) - r] = in[r][c]`.
pub fn rotate_clockwise(grid: &Grid) -> Rotated {
    let (old_h, old_w) = (grid.height(), grid.width());
    let mut rows = vec![vec![FILL_CHAR; old_h]; old_w];
    for (r, row) in grid.rows.iter().enumerate() {
        for (c, &ch) in row.iter().enumerate() {
            rows[c][old_h - 1 - r] = ch;
        }
    }
    Rotated {
        grid: Grid { rows },
        height: old_w,
        width: old_h,
    }
}

/// Returns a copy with `(row, col)` set to `ch`. Out-of-bounds coordinates
/// leave the copy unchanged.
pub fn set_cell(grid: &Grid, row: i32, col: i32, ch: char) -> Grid {
    let mut next = grid.clone();
    next.put(row, col, ch);
    next
}

/// A Bresenham segment, oriented so it starts at the smaller endpoint.
///
/// The cell at step `i` is read off directly: the major axis advances by one
/// per step and the minor axis has moved `(2·i·minor + major - 1) / (2·major)`
/// cells, which is what the incremental error walk produces.
#[derive(Clone, Copy, Debug)]
struct Segment {
    start: (i64, i64),
    major: i64,
    minor: i64,
    major_step: (i64, i64),
    minor_step: (i64, i64),
}

impl Segment {
    fn new(r0: i32, c0: i32, r1: i32, c1: i32) -> Self {
        let (start, end) = if (r0, c0) <= (r1, c1) {
            ((r0 as i64, c0 as i64), (r1 as i64, c1 as i64))
        } else {
            ((r1 as i64, c1 as i64), (r0 as i64, c0 as i64))
        };
        let (dr, dc) = (end.0 - start.0, end.1 - start.1);
        if dc.abs() >= dr.abs() {
            Segment {
                start,
                major: dc.abs(),
                minor: dr.abs(),
                major_step: (0, dc.signum()),
                minor_step: (dr.signum(), 0),
            }
        } else {
            Segment {
                start,
                major: dr.abs(),
                minor: dc.abs(),
                major_step: (dr.signum(), 0),
                minor_step: (0, dc.signum()),
            }
        }
    }

    fn cell(&self, step: i64) -> (i32, i32) {
        let offset = if self.major == 0 {
            0
        } else {
            let (step, major, minor) = (step as i128, self.major as i128, self.minor as i128);
            ((2 * step * minor + major - 1) / (2 * major)) as i64
        };
        let row = self.start.0 + step * self.major_step.0 + offset * self.minor_step.0;
        let col = self.start.1 + step * self.major_step.1 + offset * self.minor_step.1;
        // Every cell lies inside the endpoints' bounding box.
        (row as i32, col as i32)
    }

    /// Steps whose major-axis coordinate falls inside a `height` x `width`
    /// grid. Cells outside this range can never be painted.
    fn steps_within(&self, height: usize, width: usize) -> RangeInclusive<i64> {
        let (pos, dir, extent) = match self.major_step {
            (0, 0) => return 0..=0,
            (0, dir) => (self.start.1, dir, width as i64),
            (dir, _) => (self.start.0, dir, height as i64),
        };
        let (lo, hi) = if dir > 0 {
            (-pos, extent - 1 - pos)
        } else {
            (pos - (extent - 1), pos)
        };
        lo.max(0)..=hi.min(self.major)
    }
}

/// Iterator over the cells of a line, see [`line_cells`].
#[derive(Clone, Debug)]
pub struct LineCells {
    segment: Segment,
    steps: RangeInclusive<i64>,
}

impl Iterator for LineCells {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        self.steps.next().map(|step| self.segment.cell(step))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.steps.size_hint()
    }
}

/// Cells on the Bresenham line between two cells, both endpoints included.
///
/// The walk always starts from the smaller endpoint (row first, then column),
/// so swapping the endpoints yields the same cells. Consecutive cells are
/// 8-connected. Cells are produced lazily.
pub fn line_cells(r0: i32, c0: i32, r1: i32, c1: i32) -> LineCells {
    let segment = Segment::new(r0, c0, r1, c1);
    LineCells {
        steps: 0..=segment.major,
        segment,
    }
}

/// Paints every cell of the line from `(r0, c0)` to `(r1, c1)` with `ch`,
/// skipping the parts that fall outside the grid.
///
/// Only the steps that can land inside the grid are visited, so far-away
/// endpoints cost no more than a line across the grid.
pub fn rasterize_line(grid: &Grid, r0: i32, c0: i32, r1: i32, c1: i32, ch: char) -> Grid {
    let segment = Segment::new(r0, c0, r1, c1);
    let mut next = grid.clone();
    for step in segment.steps_within(grid.height(), grid.width()) {
        let (r, c) = segment.cell(step);
        next.put(r, c, ch);
    }
    next
}
