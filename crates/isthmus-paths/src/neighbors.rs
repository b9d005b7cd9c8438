use isthmus_core::Point;

/// Neighbour enumeration helper.
///
/// Enumerates the eight neighbours of a grid point in canonical order
/// (N, NE, E, SE, S, SW, W, NW), filtered by a predicate.
pub struct Neighbors;

impl Neighbors {
    /// Append the kept 8-directional neighbours of `p` to `buf` without
    /// clearing it. This is the shape [`Pather::neighbors`](crate::Pather)
    /// implementations need.
    pub fn append(p: Point, keep: impl Fn(Point) -> bool, buf: &mut Vec<Point>) {
        for n in p.neighbors_8() {
            if keep(n) {
                buf.push(n);
            }
        }
    }
}
