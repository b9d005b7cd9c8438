//! Building mazes from ASCII art.
//!
//! | glyph | terrain |
//! |---|---|
//! | `#` | wall |
//! | `.` | open floor |
//! | `T` | trap |
//! | `P` | powerup |
//! | `S` | start |
//! | `G` | goal |
//!
//! Leading and trailing whitespace of every line is ignored, as are blank
//! lines, so layouts can be written as indented string literals.

use isthmus_core::Point;

use crate::grid::{Maze, Terrain};

/// Errors that can occur when parsing a maze layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// The layout has no rows.
    #[error("maze layout is empty")]
    Empty,
    /// Rows have inconsistent widths.
    #[error("maze layout: row {row} is {found} cells wide, expected {expected}")]
    InconsistentSize {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A character outside the glyph table was found.
    #[error("maze layout contains invalid rune \u{201c}{ch}\u{201d} at {pos}")]
    InvalidRune { ch: char, pos: Point },
    /// A serialized maze carries a different number of cells than its
    /// bounds hold.
    #[error("maze has {found} cells, its bounds hold {expected} cells")]
    CellCount { expected: usize, found: usize },
}

impl Maze {
    /// Parse a maze from its ASCII layout.
    pub fn from_text(s: &str) -> Result<Self, LayoutError> {
        let rows: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let Some(first) = rows.first() else {
            return Err(LayoutError::Empty);
        };
        let width = first.chars().count();

        let mut maze = Maze::new(width as i32, rows.len() as i32);
        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(LayoutError::InconsistentSize {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, ch) in row.chars().enumerate() {
                let pos = Point::new(x as i32, y as i32);
                let terrain = Terrain::from_glyph(ch).ok_or(LayoutError::InvalidRune { ch, pos })?;
                maze.set(pos, terrain);
            }
        }
        Ok(maze)
    }
}

impl std::str::FromStr for Maze {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}
