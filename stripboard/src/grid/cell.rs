//! Cell Coordinate System
//!
//! Converts between human-readable cell names (`"C4"`), integer grid
//! coordinates and physical millimeter positions on a grid.
//!
//! Column letters are *additive*: every letter contributes `letter - 'A'`
//! to the column, so `"AA"` is column 0 and `"BC"` is column 3. This is not
//! spreadsheet base-26 and is kept that way so existing board files keep
//! their meaning.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::schema::GridMetadata;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CellError {
    #[error("Malformed cell: {0:?} (expected letters followed by a row number, e.g. \"C4\")")]
    MalformedCell(String),
    #[error("Malformed cell range: {0:?} (expected two cells separated by ':', e.g. \"A0:C0\")")]
    MalformedRange(String),
}

/// Integer grid address of a hole: column and row, no pitch applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    pub col: i32,
    pub row: i32,
}

impl GridCoord {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }
}

/// Physical position in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Parse a cell name into its grid coordinate.
///
/// The whole string must match `[A-Z]+[0-9]+`.
pub fn cell_to_coord(cell: &str) -> Result<GridCoord, CellError> {
    let malformed = || CellError::MalformedCell(cell.to_string());

    let split = cell
        .find(|c: char| !c.is_ascii_uppercase())
        .ok_or_else(malformed)?;
    let (letters, digits) = cell.split_at(split);
    if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    let row: i32 = digits.parse().map_err(|_| malformed())?;
    let col = letters
        .bytes()
        .try_fold(0i32, |acc, b| acc.checked_add(i32::from(b - b'A')))
        .ok_or_else(malformed)?;

    Ok(GridCoord { col, row })
}

/// Spell a grid coordinate as a cell name.
///
/// Columns past `Z` are written as a run of `Z`s followed by the remainder
/// letter, which reads back to the same column under the additive encoding.
/// Returns `None` for negative coordinates, which have no spelling.
pub fn coord_to_cell(coord: GridCoord) -> Option<String> {
    if coord.col < 0 || coord.row < 0 {
        return None;
    }

    let full = (coord.col / 25) as usize;
    let rest = (coord.col % 25) as u8;

    let mut cell = "Z".repeat(full);
    if rest > 0 || full == 0 {
        cell.push(char::from(b'A' + rest));
    }
    cell.push_str(&coord.row.to_string());
    Some(cell)
}

/// Map a grid coordinate to the center of its hole.
///
/// Each axis sits at `pitch * coord + pitch / 2` from the origin; a mirrored
/// grid negates the X offset before the origin is added.
pub fn coord_to_position(coord: GridCoord, grid: &GridMetadata) -> Position {
    let half = grid.pitch / 2.0;
    let offset_x = f64::from(coord.col) * grid.pitch + half;
    let offset_y = f64::from(coord.row) * grid.pitch + half;
    let offset_x = if grid.mirrored { -offset_x } else { offset_x };

    Position {
        x: grid.origin.0 + offset_x,
        y: grid.origin.1 + offset_y,
    }
}

/// Every hole in the inclusive rectangle between two coordinates.
pub fn positions_between(a: GridCoord, b: GridCoord, grid: &GridMetadata) -> HoleSpan<'_> {
    HoleSpan::new(a, b, grid)
}

/// Inclusive rectangular span of holes on one grid.
///
/// Enumeration walks columns outermost and rows innermost, each from the
/// smaller bound to the larger. Connector index suffixes are assigned in this
/// order, so it must not change. The span is a plain value: every call to
/// [`HoleSpan::iter`] starts over from the first hole.
#[derive(Debug, Clone, Copy)]
pub struct HoleSpan<'a> {
    min: GridCoord,
    max: GridCoord,
    grid: &'a GridMetadata,
}

impl<'a> HoleSpan<'a> {
    pub fn new(a: GridCoord, b: GridCoord, grid: &'a GridMetadata) -> Self {
        Self {
            min: GridCoord::new(a.col.min(b.col), a.row.min(b.row)),
            max: GridCoord::new(a.col.max(b.col), a.row.max(b.row)),
            grid,
        }
    }

    pub fn columns(&self) -> usize {
        axis_len(self.min.col, self.max.col)
    }

    pub fn rows(&self) -> usize {
        axis_len(self.min.row, self.max.row)
    }

    /// `(|Δcol| + 1) * (|Δrow| + 1)`, saturating at `usize::MAX`.
    pub fn len(&self) -> usize {
        self.columns().saturating_mul(self.rows())
    }

    /// A span always holds at least its own corner hole.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn coords(&self) -> impl Iterator<Item = GridCoord> + 'a {
        let (min, max) = (self.min, self.max);
        (min.col..=max.col).flat_map(move |col| (min.row..=max.row).map(move |row| GridCoord { col, row }))
    }

    pub fn iter(&self) -> impl Iterator<Item = Position> + 'a {
        let grid = self.grid;
        self.coords().map(move |coord| coord_to_position(coord, grid))
    }
}

fn axis_len(min: i32, max: i32) -> usize {
    // i32 endpoints can be 2^32 - 1 apart.
    let delta = i64::from(max) - i64::from(min);
    usize::try_from(delta).map_or(usize::MAX, |delta| delta.saturating_add(1))
}

impl<'a> IntoIterator for &HoleSpan<'a> {
    type Item = Position;
    type IntoIter = Box<dyn Iterator<Item = Position> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Two cells joined by `:`, e.g. `"A1:C1"`.
///
/// Parsing only checks the lexical pattern. Whether the range is a straight
/// run is decided later by whoever resolves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRange {
    pub start: GridCoord,
    pub end: GridCoord,
    text: String,
}

impl CellRange {
    pub fn parse(range: &str) -> Result<Self, CellError> {
        let mut parts = range.split(':');
        let (start, end) = match (parts.next(), parts.next(), parts.next()) {
            (Some(start), Some(end), None) => (start, end),
            _ => return Err(CellError::MalformedRange(range.to_string())),
        };

        Ok(Self {
            start: cell_to_coord(start)?,
            end: cell_to_coord(end)?,
            text: range.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn span<'a>(&self, grid: &'a GridMetadata) -> HoleSpan<'a> {
        positions_between(self.start, self.end, grid)
    }
}

impl FromStr for CellRange {
    type Err = CellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
