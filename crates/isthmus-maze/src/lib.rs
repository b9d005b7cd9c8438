//! Mazes for isthmus: a mutable weighted terrain grid, ASCII layouts,
//! random generation and scheduled wall edits.

pub mod events;
pub mod grid;
pub mod layout;
pub mod mapgen;

pub use events::{EditKind, MutationQueue, WallEdit};
pub use grid::{Maze, Terrain};
pub use layout::LayoutError;
pub use mapgen::{MazeGen, MazeGenConfig};
