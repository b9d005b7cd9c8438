use isthmus_core::Point;
use isthmus_maze::{Maze, Terrain};
use isthmus_paths::Topology;

/// What the planner needs to know about a maze.
///
/// On top of the [`Topology`] queries (bounds, passability, neighbours in
/// canonical order) a view reports the terrain of each cell, for step costs,
/// and a version number that changes whenever the wall layout does.
pub trait MazeView: Topology {
    /// Terrain at `p`, or `None` outside the maze.
    fn terrain(&self, p: Point) -> Option<Terrain>;

    /// Wall-layout version. Decompositions built at another version are
    /// stale.
    fn version(&self) -> u64;
}

impl MazeView for Maze {
    #[inline]
    fn terrain(&self, p: Point) -> Option<Terrain> {
        self.at(p)
    }

    #[inline]
    fn version(&self) -> u64 {
        Maze::version(self)
    }
}
