//! Tiny ASCII grid used by the unit tests of this crate.

use isthmus_core::{Point, Range};

use crate::{AstarPather, Heuristic, Neighbors, Pather, Topology, WeightedPather};

/// `#` is a wall, anything else is a unit-cost floor cell.
pub(crate) struct TestGrid {
    rng: Range,
    walls: Vec<bool>,
}

impl TestGrid {
    pub(crate) fn parse(s: &str) -> Self {
        let lines: Vec<&str> = s.trim().lines().map(str::trim).collect();
        let h = lines.len() as i32;
        let w = lines.first().map_or(0, |l| l.len()) as i32;
        let mut walls = Vec::with_capacity((w * h) as usize);
        for line in &lines {
            assert_eq!(line.len() as i32, w, "ragged test grid");
            walls.extend(line.chars().map(|c| c == '#'));
        }
        Self {
            rng: Range::sized(w, h),
            walls,
        }
    }

    pub(crate) fn set_wall(&mut self, p: Point, wall: bool) {
        if let Some(i) = self.rng.index_of(p) {
            self.walls[i] = wall;
        }
    }

    /// Number of connected components among passable cells, by brute force.
    pub(crate) fn components_without(&self, removed: Option<Point>) -> usize {
        let mut seen = vec![false; self.rng.len()];
        let mut count = 0;
        let mut stack = Vec::new();
        for p in self.rng.iter() {
            let i = self.rng.index_of(p).unwrap();
            if seen[i] || !self.passable(p) || Some(p) == removed {
                continue;
            }
            count += 1;
            seen[i] = true;
            stack.push(p);
            while let Some(c) = stack.pop() {
                for n in c.neighbors_8() {
                    if !self.passable(n) || Some(n) == removed {
                        continue;
                    }
                    let ni = self.rng.index_of(n).unwrap();
                    if !seen[ni] {
                        seen[ni] = true;
                        stack.push(n);
                    }
                }
            }
        }
        count
    }
}

impl Pather for TestGrid {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        Neighbors::append(p, |n| self.passable(n), buf);
    }
}

impl Topology for TestGrid {
    fn bounds(&self) -> Range {
        self.rng
    }

    fn passable(&self, p: Point) -> bool {
        self.rng.index_of(p).is_some_and(|i| !self.walls[i])
    }
}

impl WeightedPather for TestGrid {
    fn cost(&self, from: Point, to: Point) -> f64 {
        if from.is_diagonal_step(to) {
            std::f64::consts::SQRT_2
        } else {
            1.0
        }
    }
}

impl AstarPather for TestGrid {
    fn estimate(&self, from: Point, to: Point) -> f64 {
        Heuristic::Euclidean.estimate(from, to)
    }
}
