use std::collections::BinaryHeap;

use isthmus_core::Point;

use crate::PathRange;
use crate::pathrange::{NodeRef, SearchStats};
use crate::traits::AstarPather;

impl PathRange {
    /// Compute the cheapest path from `from` to `to` using A*.
    ///
    /// The open list is keyed by `g + estimate`; entries with equal keys pop
    /// in insertion order. A node is re-opened only when a strictly cheaper
    /// route to it is found.
    ///
    /// Returns the full path (including both endpoints) or `None` if no path
    /// exists within the current range. Effort counters are available from
    /// [`last_stats`](Self::last_stats) afterwards.
    pub fn astar_path<P: AstarPather>(
        &mut self,
        pather: &P,
        from: Point,
        to: Point,
    ) -> Option<Vec<Point>> {
        self.stats = SearchStats::default();
        let start_idx = self.idx(from)?;
        let goal_idx = self.idx(to)?;

        self.stats.visited = 1;
        if start_idx == goal_idx {
            return Some(vec![from]);
        }

        // Bump generation to lazily invalidate all nodes.
        self.astar_generation = self.astar_generation.wrapping_add(1);
        let cur_gen = self.astar_generation;

        {
            let node = &mut self.astar_nodes[start_idx];
            node.g = 0.0;
            node.parent = usize::MAX;
            node.generation = cur_gen;
            node.open = true;
        }

        let mut seq: u64 = 0;
        let mut open: BinaryHeap<NodeRef> = BinaryHeap::new();
        open.push(NodeRef {
            idx: start_idx,
            f: pather.estimate(from, to),
            seq,
        });

        let mut nbuf = std::mem::take(&mut self.nbuf);

        let found = 'search: loop {
            let Some(current) = open.pop() else {
                break 'search false;
            };

            let ci = current.idx;

            // Skip stale entries.
            if self.astar_nodes[ci].generation != cur_gen || !self.astar_nodes[ci].open {
                continue;
            }

            self.stats.explored += 1;
            if ci == goal_idx {
                break 'search true;
            }

            self.astar_nodes[ci].open = false;
            let current_g = self.astar_nodes[ci].g;
            let current_point = self.point(ci);

            nbuf.clear();
            pather.neighbors(current_point, &mut nbuf);

            for &np in nbuf.iter() {
                let Some(ni) = self.idx(np) else {
                    continue;
                };
                let tentative_g = current_g + pather.cost(current_point, np);

                let n = &mut self.astar_nodes[ni];
                if n.generation == cur_gen {
                    if tentative_g >= n.g {
                        continue;
                    }
                } else {
                    n.generation = cur_gen;
                    self.stats.visited += 1;
                }

                n.g = tentative_g;
                n.parent = ci;
                n.open = true;

                seq += 1;
                open.push(NodeRef {
                    idx: ni,
                    f: tentative_g + pather.estimate(np, to),
                    seq,
                });
            }
        };

        self.nbuf = nbuf;

        if !found {
            return None;
        }

        // Reconstruct path.
        let mut path = Vec::new();
        let mut ci = goal_idx;
        while ci != usize::MAX {
            path.push(self.point(ci));
            ci = self.astar_nodes[ci].parent;
        }
        path.reverse();
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use isthmus_core::Point;

    use crate::testgrid::TestGrid;
    use crate::{PathRange, Topology, WeightedPather};

    fn path_cost(g: &TestGrid, path: &[Point]) -> f64 {
        path.windows(2).map(|w| g.cost(w[0], w[1])).sum()
    }

    #[test]
    fn straight_line_on_open_floor() {
        let g = TestGrid::parse(
            "
            .....
            .....
            .....",
        );
        let mut pr = PathRange::new(g.bounds());
        let path = pr.astar_path(&g, Point::new(0, 1), Point::new(4, 1)).unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path[0], Point::new(0, 1));
        assert_eq!(path[4], Point::new(4, 1));
        assert!((path_cost(&g, &path) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn diagonal_is_cheaper_than_staircase() {
        let g = TestGrid::parse(
            "
            ....
            ....
            ....
            ....",
        );
        let mut pr = PathRange::new(g.bounds());
        let path = pr.astar_path(&g, Point::new(0, 0), Point::new(3, 3)).unwrap();
        assert_eq!(path.len(), 4);
        assert!((path_cost(&g, &path) - 3.0 * std::f64::consts::SQRT_2).abs() < 1e-9);
    }

    #[test]
    fn routes_around_walls() {
        let g = TestGrid::parse(
            "
            .#...
            .#.#.
            ...#.",
        );
        let mut pr = PathRange::new(g.bounds());
        let path = pr.astar_path(&g, Point::new(0, 0), Point::new(4, 0)).unwrap();
        assert_eq!(path.first(), Some(&Point::new(0, 0)));
        assert_eq!(path.last(), Some(&Point::new(4, 0)));
        for w in path.windows(2) {
            assert!(w[0].is_adjacent(w[1]));
            assert!(g.passable(w[1]));
        }
    }

    #[test]
    fn unreachable_goal_returns_none() {
        let g = TestGrid::parse(
            "
            ..#..
            ..#..
            ..#..",
        );
        let mut pr = PathRange::new(g.bounds());
        assert!(pr.astar_path(&g, Point::new(0, 0), Point::new(4, 2)).is_none());
        let stats = pr.last_stats();
        assert!(stats.explored >= 6);
        assert_eq!(stats.visited, 6);
    }

    #[test]
    fn same_start_and_goal() {
        let g = TestGrid::parse("...");
        let mut pr = PathRange::new(g.bounds());
        let p = Point::new(1, 0);
        assert_eq!(pr.astar_path(&g, p, p), Some(vec![p]));
    }

    #[test]
    fn out_of_range_endpoints_return_none() {
        let g = TestGrid::parse("...");
        let mut pr = PathRange::new(g.bounds());
        assert!(pr.astar_path(&g, Point::new(0, 0), Point::new(7, 0)).is_none());
    }

    #[test]
    fn repeated_queries_are_deterministic() {
        let g = TestGrid::parse(
            "
            ......
            .####.
            ......",
        );
        let mut pr = PathRange::new(g.bounds());
        let a = pr.astar_path(&g, Point::new(0, 1), Point::new(5, 1));
        let b = pr.astar_path(&g, Point::new(0, 1), Point::new(5, 1));
        assert!(a.is_some());
        assert_eq!(a, b);
    }
}
