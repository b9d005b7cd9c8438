//! The hierarchical planner.

use isthmus_core::{Point, Range};
use isthmus_paths::{PathRange, SearchStats};

use crate::config::PlannerConfig;
use crate::cost::{CostModel, Scope};
use crate::decomposition::Decomposition;
use crate::error::{FallbackReason, PlanError};
use crate::graph::AbstractNode;
use crate::view::MazeView;

/// Where the planner is in its cycle.
///
/// A planning pass moves `Analyzing → Planning → Stitching → Ready`.
/// Analysis is skipped when the cached decomposition is current. A pass
/// that abandons the hierarchy, or fails outright, ends in `Failed`; the
/// next pass starts over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PlannerState {
    #[default]
    Uninitialized,
    Analyzing,
    Planning,
    Stitching,
    Ready,
    Failed,
}

/// How a route was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RouteMode {
    /// Abstract plan stitched with local searches.
    Hierarchical,
    /// One search over the whole grid.
    Fallback(FallbackReason),
}

/// A planned route.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    /// Abstract nodes from the start's node to the goal's node. Empty for
    /// fallback routes.
    pub plan: Vec<AbstractNode>,
    /// Cut vertices of the plan in order, then the goal.
    pub waypoints: Vec<Point>,
    /// Cells from start to goal, both included.
    pub path: Vec<Point>,
    pub mode: RouteMode,
    /// Effort summed over every search of the pass.
    pub stats: SearchStats,
}

impl Route {
    /// Number of moves along the path.
    pub fn steps(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn is_hierarchical(&self) -> bool {
        self.mode == RouteMode::Hierarchical
    }

    /// Total step cost of the path under `config`.
    pub fn cost<M: MazeView>(&self, maze: &M, config: &PlannerConfig) -> f64 {
        CostModel::new(maze, config).path_cost(&self.path)
    }
}

/// Plans routes through a maze, reusing its decomposition until the maze
/// version changes.
pub struct Planner {
    config: PlannerConfig,
    pr: PathRange,
    decomposition: Option<Decomposition>,
    state: PlannerState,
    analyses: usize,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config,
            pr: PathRange::new(Range::default()),
            decomposition: None,
            state: PlannerState::Uninitialized,
            analyses: 0,
        }
    }

    #[inline]
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    #[inline]
    pub fn state(&self) -> PlannerState {
        self.state
    }

    /// The cached decomposition, current or not.
    #[inline]
    pub fn decomposition(&self) -> Option<&Decomposition> {
        self.decomposition.as_ref()
    }

    /// How many times the maze has been analysed.
    #[inline]
    pub fn analyses(&self) -> usize {
        self.analyses
    }

    /// Drop the cached decomposition, forcing the next pass to analyse.
    pub fn invalidate(&mut self) {
        self.decomposition = None;
        if self.state != PlannerState::Uninitialized {
            self.state = PlannerState::Analyzing;
        }
    }

    /// Return a decomposition current with `maze`, analysing if needed.
    pub fn ensure_analyzed<M: MazeView>(&mut self, maze: &M) -> &Decomposition {
        let d = self.refresh(maze);
        self.decomposition.insert(d)
    }

    fn refresh<M: MazeView>(&mut self, maze: &M) -> Decomposition {
        if self.pr.range() != maze.bounds() {
            self.pr.set_range(maze.bounds());
        }
        match self.decomposition.take() {
            Some(d) if !d.is_stale(maze.version()) && d.cuts().range() == maze.bounds() => d,
            _ => {
                self.state = PlannerState::Analyzing;
                self.analyses += 1;
                Decomposition::analyze(&mut self.pr, maze)
            }
        }
    }

    /// Plan a route from `start` to `goal`.
    ///
    /// Errors when an endpoint is not a floor cell, when even the full-grid
    /// fallback finds no path, and when stitching an abstract plan fails.
    pub fn compute_path<M: MazeView>(
        &mut self,
        maze: &M,
        start: Point,
        goal: Point,
    ) -> Result<Route, PlanError> {
        for p in [start, goal] {
            if !maze.passable(p) {
                self.state = PlannerState::Failed;
                return Err(PlanError::InvalidEndpoint(p));
            }
        }

        let decomposition = self.refresh(maze);
        let result = self.plan_with(&decomposition, maze, start, goal);
        self.decomposition = Some(decomposition);

        self.state = match &result {
            Ok(route) if route.is_hierarchical() => PlannerState::Ready,
            _ => PlannerState::Failed,
        };
        result
    }

    /// One A* search from `start` to `goal` over the whole maze.
    pub fn direct_path<M: MazeView>(
        &mut self,
        maze: &M,
        start: Point,
        goal: Point,
    ) -> Option<Vec<Point>> {
        if self.pr.range() != maze.bounds() {
            self.pr.set_range(maze.bounds());
        }
        let model = CostModel::new(maze, &self.config);
        self.pr.astar_path(&model, start, goal)
    }

    fn plan_with<M: MazeView>(
        &mut self,
        d: &Decomposition,
        maze: &M,
        start: Point,
        goal: Point,
    ) -> Result<Route, PlanError> {
        self.state = PlannerState::Planning;
        if d.is_degenerate() {
            return self.fallback(maze, start, goal, FallbackReason::DecompositionDegenerate);
        }

        let (Some(from), Some(to)) = (d.node_of(start), d.node_of(goal)) else {
            log::warn!("no abstract node for {start} or {goal}");
            return self.fallback(maze, start, goal, FallbackReason::NodeMappingFailed);
        };
        let Some(plan) = d.graph().bfs(from, to) else {
            return self.fallback(maze, start, goal, FallbackReason::NoAbstractPath);
        };

        let waypoints: Vec<Point> = plan
            .iter()
            .filter_map(|n| n.as_cut())
            .chain(std::iter::once(goal))
            .collect();
        log::debug!(
            "abstract plan of {} nodes, {} waypoints",
            plan.len(),
            waypoints.len()
        );

        self.state = PlannerState::Stitching;
        let scopes = if self.config.scope_segments {
            leg_scopes(d, &plan, maze.bounds())
        } else {
            Vec::new()
        };

        let mut path = Vec::new();
        let mut stats = SearchStats::default();
        let mut current = start;
        for (leg, &waypoint) in waypoints.iter().enumerate() {
            let model = CostModel::new(maze, &self.config).scoped(scopes.get(leg));
            let Some(segment) = self.pr.astar_path(&model, current, waypoint) else {
                log::error!("stitching failed between {current} and {waypoint}");
                return Err(PlanError::SegmentUnreachable {
                    from: current,
                    to: waypoint,
                });
            };
            stats += self.pr.last_stats();
            path.extend_from_slice(&segment[..segment.len() - 1]);
            current = waypoint;
        }
        path.push(goal);

        Ok(Route {
            plan,
            waypoints,
            path,
            mode: RouteMode::Hierarchical,
            stats,
        })
    }

    fn fallback<M: MazeView>(
        &mut self,
        maze: &M,
        start: Point,
        goal: Point,
        reason: FallbackReason,
    ) -> Result<Route, PlanError> {
        self.state = PlannerState::Failed;
        log::warn!("falling back to full-grid search: {reason}");
        let Some(path) = self.direct_path(maze, start, goal) else {
            return Err(PlanError::NoPath { reason });
        };
        Ok(Route {
            plan: Vec::new(),
            waypoints: vec![goal],
            path,
            mode: RouteMode::Fallback(reason),
            stats: self.pr.last_stats(),
        })
    }
}

/// One scope per stitching leg: the regions met on the plan since the
/// previous cut vertex, plus every cut vertex.
fn leg_scopes(d: &Decomposition, plan: &[AbstractNode], rng: Range) -> Vec<Scope> {
    let mut base = Scope::new(rng);
    for p in d.cuts().iter() {
        base.allow(p);
    }

    let mut scopes = Vec::new();
    let mut leg = base.clone();
    for node in plan {
        match *node {
            AbstractNode::Region(id) => {
                for &p in d.partition().members(id) {
                    leg.allow(p);
                }
            }
            AbstractNode::Cut(_) => scopes.push(std::mem::replace(&mut leg, base.clone())),
        }
    }
    scopes.push(leg);
    scopes
}
