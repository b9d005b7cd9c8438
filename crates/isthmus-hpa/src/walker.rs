//! A mover following planned routes through a changing maze.

use isthmus_core::Point;

use crate::cost::CostModel;
use crate::planner::{Planner, Route};
use crate::view::MazeView;

/// Outcome of the latest [`Walker::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WalkStatus {
    Walking,
    Arrived,
    /// No route from the current cell. Retried once the maze changes.
    Stuck,
}

/// Walks one cell per step towards a goal, replanning when the maze
/// changes under it.
#[derive(Debug, Clone)]
pub struct Walker {
    pos: Point,
    goal: Point,
    route: Option<Route>,
    cursor: usize,
    seen_version: Option<u64>,
    status: WalkStatus,
    total_cost: f64,
    history: Vec<Point>,
    replans: usize,
}

impl Walker {
    pub fn new(start: Point, goal: Point) -> Self {
        Self {
            pos: start,
            goal,
            route: None,
            cursor: 0,
            seen_version: None,
            status: if start == goal {
                WalkStatus::Arrived
            } else {
                WalkStatus::Walking
            },
            total_cost: 0.0,
            history: vec![start],
            replans: 0,
        }
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.pos
    }

    #[inline]
    pub fn goal(&self) -> Point {
        self.goal
    }

    #[inline]
    pub fn status(&self) -> WalkStatus {
        self.status
    }

    /// Sum of the step costs walked so far.
    #[inline]
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Every cell occupied so far, starting cell first.
    #[inline]
    pub fn history(&self) -> &[Point] {
        &self.history
    }

    /// The route being followed.
    #[inline]
    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    /// Cells still ahead on the current route.
    pub fn remaining(&self) -> &[Point] {
        match &self.route {
            Some(r) => r.path.get(self.cursor + 1..).unwrap_or(&[]),
            None => &[],
        }
    }

    /// Number of plans computed, the first one included.
    #[inline]
    pub fn replans(&self) -> usize {
        self.replans
    }

    fn needs_plan<M: MazeView>(&self, maze: &M) -> bool {
        if self.seen_version != Some(maze.version()) {
            return true;
        }
        match self.remaining().first() {
            Some(&next) => !maze.passable(next),
            None => self.route.is_none(),
        }
    }

    /// Advance one cell, replanning first if the maze version changed, the
    /// next cell turned into a wall, or there is no route yet. A walker whose
    /// own cell is walled over stays [`Stuck`](WalkStatus::Stuck) until the
    /// wall is removed.
    pub fn step<M: MazeView>(&mut self, planner: &mut Planner, maze: &M) -> WalkStatus {
        if self.status == WalkStatus::Arrived {
            return self.status;
        }
        if self.status == WalkStatus::Stuck && self.seen_version == Some(maze.version()) {
            return self.status;
        }
        if !maze.passable(self.pos) {
            if self.seen_version != Some(maze.version()) {
                log::info!("walker walled in at {}", self.pos);
            }
            self.seen_version = Some(maze.version());
            self.route = None;
            self.status = WalkStatus::Stuck;
            return self.status;
        }

        if self.needs_plan(maze) {
            self.seen_version = Some(maze.version());
            self.replans += 1;
            match planner.compute_path(maze, self.pos, self.goal) {
                Ok(route) => {
                    log::info!(
                        "planned {} steps from {} ({:?})",
                        route.steps(),
                        self.pos,
                        route.mode
                    );
                    self.route = Some(route);
                    self.cursor = 0;
                }
                Err(err) => {
                    log::info!("walker stuck at {}: {err}", self.pos);
                    self.route = None;
                    self.status = WalkStatus::Stuck;
                    return self.status;
                }
            }
        }

        let Some(&next) = self.remaining().first() else {
            self.status = WalkStatus::Stuck;
            return self.status;
        };
        self.total_cost += CostModel::new(maze, planner.config()).step_cost(self.pos, next);
        self.pos = next;
        self.cursor += 1;
        self.history.push(next);
        self.status = if next == self.goal {
            WalkStatus::Arrived
        } else {
            WalkStatus::Walking
        };
        self.status
    }
}
