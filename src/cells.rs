use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A square on the board. Coordinates are unbounded; a position is only
/// playable while it belongs to the board's `CellSet`.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Position {
        Position::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Position::new(x, y)
    }
}

/// The set of playable squares. Cells are only ever added.
///
/// Kept ordered so that iteration (and therefore seeded board growth) is
/// reproducible. Serializes as a plain list of positions.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(from = "Vec<Position>", into = "Vec<Position>")]
pub struct CellSet {
    cells: BTreeSet<Position>,
}

impl CellSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every cell with `x` in `0..width` and `y` in `0..height`.
    pub fn rectangle(width: i32, height: i32) -> Self {
        (0..width)
            .flat_map(|x| (0..height).map(move |y| Position::new(x, y)))
            .collect()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }

    /// Returns true if the cell was not already present.
    pub fn insert(&mut self, pos: Position) -> bool {
        self.cells.insert(pos)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells.iter().copied()
    }

    pub fn is_superset(&self, other: &CellSet) -> bool {
        self.cells.is_superset(&other.cells)
    }
}

impl FromIterator<Position> for CellSet {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        CellSet {
            cells: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Position>> for CellSet {
    fn from(cells: Vec<Position>) -> Self {
        cells.into_iter().collect()
    }
}

impl From<CellSet> for Vec<Position> {
    fn from(set: CellSet) -> Self {
        set.cells.into_iter().collect()
    }
}
