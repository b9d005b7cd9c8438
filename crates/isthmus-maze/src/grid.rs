//! The terrain grid.
//!
//! [`Maze`] owns one [`Terrain`] per cell and a version that moves whenever
//! the wall layout changes, so that anything derived from the layout can
//! tell it is out of date.
//!
//! Versions are drawn from one process-wide generation counter. Two mazes
//! only share a version when one is an unedited clone of the other, so a
//! planner handed a different maze always sees a different version.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use isthmus_core::{Point, Range};
use isthmus_paths::{Neighbors, Pather, Topology};

/// What occupies a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Terrain {
    #[default]
    Open,
    Wall,
    Trap,
    Powerup,
    Start,
    Goal,
}

impl Terrain {
    /// Whether the cell is a graph node. Only walls are not.
    #[inline]
    pub const fn is_passable(self) -> bool {
        !matches!(self, Self::Wall)
    }

    /// Traversal weight of the cell: 1 for plain floor, 3 for traps, −2 for
    /// powerups and +∞ for walls.
    #[inline]
    pub fn weight(self) -> f64 {
        match self {
            Self::Open | Self::Start | Self::Goal => 1.0,
            Self::Trap => 3.0,
            Self::Powerup => -2.0,
            Self::Wall => f64::INFINITY,
        }
    }

    /// ASCII glyph used by layouts.
    pub const fn glyph(self) -> char {
        match self {
            Self::Open => '.',
            Self::Wall => '#',
            Self::Trap => 'T',
            Self::Powerup => 'P',
            Self::Start => 'S',
            Self::Goal => 'G',
        }
    }

    /// Inverse of [`glyph`](Self::glyph).
    pub const fn from_glyph(ch: char) -> Option<Self> {
        match ch {
            '.' => Some(Self::Open),
            '#' => Some(Self::Wall),
            'T' => Some(Self::Trap),
            'P' => Some(Self::Powerup),
            'S' => Some(Self::Start),
            'G' => Some(Self::Goal),
            _ => None,
        }
    }
}

static GENERATION: AtomicU64 = AtomicU64::new(0);

fn next_version() -> u64 {
    GENERATION.fetch_add(1, Ordering::Relaxed) + 1
}

/// A rectangular maze of [`Terrain`] cells.
///
/// Equality compares bounds and cells; versions are ignored.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "MazeCells"))]
pub struct Maze {
    bounds: Range,
    cells: Vec<Terrain>,
    #[cfg_attr(feature = "serde", serde(skip_serializing))]
    version: u64,
}

impl PartialEq for Maze {
    fn eq(&self, other: &Self) -> bool {
        self.bounds == other.bounds && self.cells == other.cells
    }
}

/// Serialized form of a [`Maze`], checked before it becomes one.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct MazeCells {
    bounds: Range,
    cells: Vec<Terrain>,
}

#[cfg(feature = "serde")]
impl TryFrom<MazeCells> for Maze {
    type Error = crate::layout::LayoutError;

    fn try_from(raw: MazeCells) -> Result<Self, Self::Error> {
        if raw.cells.len() != raw.bounds.len() {
            return Err(crate::layout::LayoutError::CellCount {
                expected: raw.bounds.len(),
                found: raw.cells.len(),
            });
        }
        Ok(Self {
            bounds: raw.bounds,
            cells: raw.cells,
            version: next_version(),
        })
    }
}

impl Maze {
    /// Create a maze of open floor.
    pub fn new(width: i32, height: i32) -> Self {
        Self::filled(width, height, Terrain::Open)
    }

    /// Create a maze with every cell set to `terrain`.
    pub fn filled(width: i32, height: i32, terrain: Terrain) -> Self {
        let bounds = Range::sized(width.max(0), height.max(0));
        Self {
            bounds,
            cells: vec![terrain; bounds.len()],
            version: next_version(),
        }
    }

    /// Returns the bounding range of the maze.
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Width in cells.
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    /// Height in cells.
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    /// Wall-layout version. Takes a fresh value on construction and every
    /// time a cell turns into a wall or stops being one.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Get the terrain at a point, or `None` if out of bounds.
    pub fn at(&self, p: Point) -> Option<Terrain> {
        self.bounds.index_of(p).map(|i| self.cells[i])
    }

    /// Whether `p` is inside the maze and not a wall.
    pub fn is_passable(&self, p: Point) -> bool {
        self.at(p).is_some_and(Terrain::is_passable)
    }

    /// Set the terrain at a point. Out-of-bounds writes are ignored.
    ///
    /// Returns `true` when the wall layout changed (and with it the
    /// version).
    pub fn set(&mut self, p: Point, terrain: Terrain) -> bool {
        let Some(i) = self.bounds.index_of(p) else {
            return false;
        };
        let old = std::mem::replace(&mut self.cells[i], terrain);
        if old.is_passable() != terrain.is_passable() {
            self.version = next_version();
            log::trace!("maze {p}: {old:?} -> {terrain:?}, version {}", self.version);
            true
        } else {
            false
        }
    }

    /// Turn `p` into a wall. Returns whether the layout changed.
    pub fn add_wall(&mut self, p: Point) -> bool {
        self.set(p, Terrain::Wall)
    }

    /// Turn the wall at `p` into open floor. Non-wall cells are left alone.
    pub fn remove_wall(&mut self, p: Point) -> bool {
        if self.at(p) == Some(Terrain::Wall) {
            self.set(p, Terrain::Open)
        } else {
            false
        }
    }

    /// First cell (row-major) holding `terrain`.
    pub fn find(&self, terrain: Terrain) -> Option<Point> {
        self.cells
            .iter()
            .position(|&t| t == terrain)
            .map(|i| self.bounds.point_at(i))
    }

    /// The start cell, if the maze has one.
    pub fn start(&self) -> Option<Point> {
        self.find(Terrain::Start)
    }

    /// The goal cell, if the maze has one.
    pub fn goal(&self) -> Option<Point> {
        self.find(Terrain::Goal)
    }

    /// Count the cells holding `terrain`.
    pub fn count(&self, terrain: Terrain) -> usize {
        self.cells.iter().filter(|&&t| t == terrain).count()
    }

    /// Non-wall cells in row-major order.
    pub fn passable_cells(&self) -> impl Iterator<Item = Point> + '_ {
        self.bounds.iter().filter(|&p| self.is_passable(p))
    }

    /// Non-wall 8-directional neighbours of `p` in canonical order
    /// (N, NE, E, SE, S, SW, W, NW).
    pub fn neighbors_of(&self, p: Point) -> Vec<Point> {
        let mut buf = Vec::with_capacity(8);
        Pather::neighbors(self, p, &mut buf);
        buf
    }
}

impl Pather for Maze {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        Neighbors::append(p, |n| self.is_passable(n), buf);
    }
}

impl Topology for Maze {
    fn bounds(&self) -> Range {
        self.bounds
    }

    fn passable(&self, p: Point) -> bool {
        self.is_passable(p)
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height() {
            if y > 0 {
                writeln!(f)?;
            }
            for x in 0..self.width() {
                let t = self.at(Point::new(x, y)).unwrap_or(Terrain::Wall);
                write!(f, "{}", t.glyph())?;
            }
        }
        Ok(())
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn maze_round_trip_gets_a_fresh_version() {
        let mut maze = Maze::new(3, 2);
        maze.add_wall(Point::new(1, 0));
        maze.set(Point::new(2, 1), Terrain::Trap);
        let json = serde_json::to_string(&maze).unwrap();
        assert!(json.contains(r#""trap""#));
        assert!(!json.contains("version"));
        let back: Maze = serde_json::from_str(&json).unwrap();
        assert_eq!(back, maze);
        assert_ne!(back.version(), maze.version());
    }

    #[test]
    fn cell_count_must_match_bounds() {
        let json = r#"{"bounds":{"min":{"x":0,"y":0},"max":{"x":2,"y":2}},"cells":["open","wall","open"]}"#;
        let err = serde_json::from_str::<Maze>(json).unwrap_err();
        assert!(err.to_string().contains("4 cells"), "{err}");
    }
}
