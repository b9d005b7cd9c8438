//! Step costs over a maze view.

use isthmus_core::{Point, Range};
use isthmus_maze::Terrain;
use isthmus_paths::{AstarPather, Pather, WeightedPather};

use crate::config::PlannerConfig;
use crate::view::MazeView;

/// A set of cells a search may enter.
#[derive(Debug, Clone)]
pub(crate) struct Scope {
    rng: Range,
    allowed: Vec<bool>,
}

impl Scope {
    pub(crate) fn new(rng: Range) -> Self {
        Self {
            rng,
            allowed: vec![false; rng.len()],
        }
    }

    pub(crate) fn allow(&mut self, p: Point) {
        if let Some(i) = self.rng.index_of(p) {
            self.allowed[i] = true;
        }
    }

    pub(crate) fn allows(&self, p: Point) -> bool {
        self.rng.index_of(p).is_some_and(|i| self.allowed[i])
    }
}

/// The edge-cost model of every concrete search.
///
/// Moving onto `to` costs the base step (cardinal or diagonal) plus the
/// terrain penalty of `to`, never less than
/// [`min_step_cost`](PlannerConfig::min_step_cost). The remaining-cost
/// estimate comes from [`PlannerConfig::heuristic`].
pub struct CostModel<'a, M> {
    view: &'a M,
    config: &'a PlannerConfig,
    scope: Option<&'a Scope>,
}

impl<'a, M: MazeView> CostModel<'a, M> {
    /// Cost model over the whole of `view`.
    pub fn new(view: &'a M, config: &'a PlannerConfig) -> Self {
        Self {
            view,
            config,
            scope: None,
        }
    }

    pub(crate) fn scoped(mut self, scope: Option<&'a Scope>) -> Self {
        self.scope = scope;
        self
    }

    /// Cost of the step from `from` onto the adjacent cell `to`.
    pub fn step_cost(&self, from: Point, to: Point) -> f64 {
        let base = if from.is_diagonal_step(to) {
            self.config.diagonal_cost
        } else {
            self.config.cardinal_cost
        };
        let penalty = match self.view.terrain(to) {
            Some(Terrain::Trap) => self.config.trap_penalty,
            Some(Terrain::Powerup) => self.config.powerup_penalty,
            _ => 0.0,
        };
        (base + penalty).max(self.config.min_step_cost)
    }

    /// Total cost of walking `path`.
    pub fn path_cost(&self, path: &[Point]) -> f64 {
        path.windows(2).map(|w| self.step_cost(w[0], w[1])).sum()
    }
}

impl<M: MazeView> Pather for CostModel<'_, M> {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        self.view.neighbors(p, buf);
        if let Some(scope) = self.scope {
            buf.retain(|&n| scope.allows(n));
        }
    }
}

impl<M: MazeView> WeightedPather for CostModel<'_, M> {
    #[inline]
    fn cost(&self, from: Point, to: Point) -> f64 {
        self.step_cost(from, to)
    }
}

impl<M: MazeView> AstarPather for CostModel<'_, M> {
    #[inline]
    fn estimate(&self, from: Point, to: Point) -> f64 {
        self.config.heuristic.estimate(from, to)
    }
}
