//! Random maze generation.
//!
//! Corridors are carved by an iterative depth-first walk over odd
//! coordinates starting at (1, 1), which yields a perfect maze (a tree of
//! corridors, so nearly every corridor cell is a cut vertex). Optional extra
//! openings knock out walls to create loops, and traps and powerups are then
//! sprinkled over the floor.

use isthmus_core::Point;
use rand::Rng;

use crate::grid::{Maze, Terrain};

/// Smallest side length [`MazeGen::generate`] accepts.
pub const MIN_SIDE: i32 = 5;

/// Tuning knobs for [`MazeGen`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MazeGenConfig {
    /// Fraction of the free floor (excluding start and goal) turned into
    /// traps.
    pub trap_ratio: f64,
    /// Fraction of the free floor turned into powerups, drawn after traps.
    pub powerup_ratio: f64,
    /// Number of interior walls between two corridors to knock out.
    pub extra_openings: usize,
}

impl Default for MazeGenConfig {
    fn default() -> Self {
        Self {
            trap_ratio: 0.10,
            powerup_ratio: 0.05,
            extra_openings: 0,
        }
    }
}

/// Maze generator.
pub struct MazeGen<R: Rng> {
    pub rng: R,
    pub config: MazeGenConfig,
}

impl<R: Rng> MazeGen<R> {
    /// Create a new generator.
    pub fn new(rng: R, config: MazeGenConfig) -> Self {
        Self { rng, config }
    }

    /// Generate a `width × height` maze (each side at least [`MIN_SIDE`])
    /// with the start at (1, 1) and the goal at (width − 2, height − 2).
    pub fn generate(&mut self, width: i32, height: i32) -> Maze {
        let width = width.max(MIN_SIDE);
        let height = height.max(MIN_SIDE);
        let mut maze = Maze::filled(width, height, Terrain::Wall);
        let start = Point::new(1, 1);
        let goal = Point::new(width - 2, height - 2);

        self.carve(&mut maze, start);
        let opened = self.knock_out_walls(&mut maze);
        // With even sides the goal sits off the carving lattice; it still
        // touches a carved cell diagonally.
        maze.set(start, Terrain::Start);
        maze.set(goal, Terrain::Goal);
        let (traps, powerups) = self.scatter_hazards(&mut maze, start, goal);

        log::debug!(
            "generated {width}x{height} maze: {} floor cells, {opened} extra openings, {traps} traps, {powerups} powerups",
            maze.passable_cells().count()
        );
        maze
    }

    fn carve(&mut self, maze: &mut Maze, start: Point) {
        const STEPS: [Point; 4] = [
            Point::new(0, 2),
            Point::new(0, -2),
            Point::new(2, 0),
            Point::new(-2, 0),
        ];
        let (w, h) = (maze.width(), maze.height());
        let inside = |p: Point| p.x >= 1 && p.x < w - 1 && p.y >= 1 && p.y < h - 1;

        maze.set(start, Terrain::Open);
        let mut stack = vec![start];
        let mut options = Vec::with_capacity(4);

        while let Some(&cur) = stack.last() {
            options.clear();
            for d in STEPS {
                let n = cur + d;
                if inside(n) && maze.at(n) == Some(Terrain::Wall) {
                    options.push(n);
                }
            }
            if options.is_empty() {
                stack.pop();
                continue;
            }
            let next = options[self.rng.random_range(0..options.len())];
            let between = Point::new((cur.x + next.x) / 2, (cur.y + next.y) / 2);
            maze.set(between, Terrain::Open);
            maze.set(next, Terrain::Open);
            stack.push(next);
        }
    }

    /// Open interior walls that sit between two floor cells on a straight
    /// line. Returns how many were opened.
    fn knock_out_walls(&mut self, maze: &mut Maze) -> usize {
        let want = self.config.extra_openings;
        if want == 0 {
            return 0;
        }
        let candidates: Vec<Point> = maze
            .bounds()
            .iter()
            .filter(|&p| {
                maze.at(p) == Some(Terrain::Wall)
                    && p.x > 0
                    && p.y > 0
                    && p.x < maze.width() - 1
                    && p.y < maze.height() - 1
                    && ((maze.is_passable(p.shift(-1, 0)) && maze.is_passable(p.shift(1, 0)))
                        || (maze.is_passable(p.shift(0, -1)) && maze.is_passable(p.shift(0, 1))))
            })
            .collect();
        let picked = self.sample(candidates, want);
        for &p in &picked {
            maze.remove_wall(p);
        }
        picked.len()
    }

    fn scatter_hazards(&mut self, maze: &mut Maze, start: Point, goal: Point) -> (usize, usize) {
        let floor: Vec<Point> = maze
            .passable_cells()
            .filter(|&p| p != start && p != goal)
            .collect();
        let n_traps = (floor.len() as f64 * self.config.trap_ratio) as usize;
        let n_powerups = (floor.len() as f64 * self.config.powerup_ratio) as usize;

        let picked = self.sample(floor, n_traps + n_powerups);
        let (traps, powerups) = picked.split_at(n_traps.min(picked.len()));
        for &p in traps {
            maze.set(p, Terrain::Trap);
        }
        for &p in powerups {
            maze.set(p, Terrain::Powerup);
        }
        (traps.len(), powerups.len())
    }

    /// Pick up to `n` distinct items by partial Fisher–Yates.
    fn sample(&mut self, mut items: Vec<Point>, n: usize) -> Vec<Point> {
        let n = n.min(items.len());
        for i in 0..n {
            let j = self.rng.random_range(i..items.len());
            items.swap(i, j);
        }
        items.truncate(n);
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isthmus_paths::PathRange;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn generator(seed: u64, config: MazeGenConfig) -> MazeGen<StdRng> {
        MazeGen::new(StdRng::seed_from_u64(seed), config)
    }

    #[test]
    fn start_and_goal_are_placed_and_connected() {
        for (w, h) in [(21, 21), (15, 11), (10, 8)] {
            let maze = generator(7, MazeGenConfig::default()).generate(w, h);
            let start = maze.start().unwrap();
            let goal = maze.goal().unwrap();
            assert_eq!(start, Point::new(1, 1));
            assert_eq!(goal, Point::new(w - 2, h - 2));
            let mut pr = PathRange::new(maze.bounds());
            assert_eq!(pr.cc_map_all(&maze), 1, "{w}x{h} maze must be one component");
            assert!(pr.connected(start, goal));
        }
    }

    #[test]
    fn border_stays_walled() {
        let maze = generator(3, MazeGenConfig::default()).generate(13, 9);
        for p in maze.bounds().iter() {
            if p.x == 0 || p.y == 0 || p.x == 12 || p.y == 8 {
                assert_eq!(maze.at(p), Some(Terrain::Wall), "border cell {p}");
            }
        }
    }

    #[test]
    fn hazard_counts_follow_ratios() {
        let config = MazeGenConfig {
            trap_ratio: 0.2,
            powerup_ratio: 0.1,
            extra_openings: 0,
        };
        let maze = generator(11, config).generate(21, 21);
        let floor = maze.passable_cells().count() - 2;
        assert_eq!(maze.count(Terrain::Trap), (floor as f64 * 0.2) as usize);
        assert_eq!(maze.count(Terrain::Powerup), (floor as f64 * 0.1) as usize);
    }

    #[test]
    fn extra_openings_add_floor() {
        let plain = generator(5, MazeGenConfig::default()).generate(21, 21);
        let config = MazeGenConfig {
            extra_openings: 6,
            ..MazeGenConfig::default()
        };
        let braided = generator(5, config).generate(21, 21);
        assert_eq!(
            braided.passable_cells().count(),
            plain.passable_cells().count() + 6
        );
    }

    #[test]
    fn same_seed_same_maze() {
        let a = generator(42, MazeGenConfig::default()).generate(15, 15);
        let b = generator(42, MazeGenConfig::default()).generate(15, 15);
        assert_eq!(a, b);
        assert_ne!(a.version(), b.version());

        let c = generator(43, MazeGenConfig::default()).generate(15, 15);
        assert_ne!(a, c);
        assert_ne!(a.version(), c.version());
    }

    #[test]
    fn tiny_requests_are_clamped() {
        let maze = generator(1, MazeGenConfig::default()).generate(2, 2);
        assert_eq!(maze.width(), MIN_SIDE);
        assert_ne!(maze.start(), maze.goal());
    }
}
