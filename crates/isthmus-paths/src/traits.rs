use isthmus_core::{Point, Range};

/// Minimal pathfinding interface: neighbour enumeration.
pub trait Pather {
    /// Append neighbors of `p` into `buf`. The caller clears `buf` before calling.
    ///
    /// Implementations must append in a fixed order so that searches are
    /// reproducible.
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>);
}

/// A pather over a bounded grid whose cells are either passable or not.
///
/// Full-grid scans (components, cut vertices, regions) walk
/// [`bounds`](Self::bounds) in row-major order and only consider passable
/// cells.
pub trait Topology: Pather {
    /// The rectangle containing every cell of the grid.
    fn bounds(&self) -> Range;

    /// Whether `p` is a graph node (inside the bounds and not a wall).
    fn passable(&self, p: Point) -> bool;
}

/// Pather with weighted (positive-cost) edges.
pub trait WeightedPather: Pather {
    /// Cost of moving from `from` to adjacent `to`. Must be > 0.
    fn cost(&self, from: Point, to: Point) -> f64;
}

/// Full A* pather with a heuristic.
pub trait AstarPather: WeightedPather {
    /// Heuristic estimate of the remaining cost from `from` to `to`.
    fn estimate(&self, from: Point, to: Point) -> f64;
}
