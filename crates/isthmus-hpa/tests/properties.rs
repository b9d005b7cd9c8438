//! Properties of the decomposition and the planner on random mazes.

use std::collections::VecDeque;

use isthmus_core::Point;
use isthmus_hpa::{
    AbstractNode, CostModel, Decomposition, FallbackReason, PlanError, Planner, PlannerConfig,
};
use isthmus_maze::Maze;
use isthmus_paths::{PathRange, RegionId};
use proptest::prelude::*;
use proptest::sample::Index;

fn maze_from_walls(w: i32, h: i32, walls: &[bool]) -> Maze {
    let mut maze = Maze::new(w, h);
    for (p, &wall) in maze.bounds().iter().zip(walls) {
        if wall {
            maze.add_wall(p);
        }
    }
    maze
}

fn arb_maze() -> impl Strategy<Value = Maze> {
    (2i32..=9, 2i32..=9).prop_flat_map(|(w, h)| {
        prop::collection::vec(prop::bool::weighted(0.35), (w * h) as usize)
            .prop_map(move |walls| maze_from_walls(w, h, &walls))
    })
}

/// Connected components of the passable cells, optionally pretending that
/// `removed` is a wall.
fn components(maze: &Maze, removed: Option<Point>) -> usize {
    let mut seen = vec![false; maze.bounds().len()];
    let mut count = 0;
    for p in maze.passable_cells() {
        let i = maze.bounds().index_of(p).unwrap();
        if Some(p) == removed || seen[i] {
            continue;
        }
        count += 1;
        seen[i] = true;
        let mut queue = VecDeque::from([p]);
        while let Some(c) = queue.pop_front() {
            for n in maze.neighbors_of(c) {
                let j = maze.bounds().index_of(n).unwrap();
                if Some(n) != removed && !seen[j] {
                    seen[j] = true;
                    queue.push_back(n);
                }
            }
        }
    }
    count
}

fn analyze(maze: &Maze) -> Decomposition {
    let mut pr = PathRange::new(maze.bounds());
    Decomposition::analyze(&mut pr, maze)
}

fn assert_path_valid(maze: &Maze, path: &[Point], start: Point, goal: Point) {
    assert_eq!(path.first(), Some(&start));
    assert_eq!(path.last(), Some(&goal));
    for w in path.windows(2) {
        assert!(w[0].is_adjacent(w[1]), "{} and {} are not adjacent", w[0], w[1]);
        assert!(maze.is_passable(w[1]), "{} is a wall", w[1]);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn every_floor_cell_is_a_region_cell_or_a_cut(maze in arb_maze()) {
        let d = analyze(&maze);
        for p in maze.bounds() {
            let is_cut = d.cuts().contains(p);
            let region = d.partition().region_of(p);
            if maze.is_passable(p) {
                prop_assert!(is_cut != region.is_some(), "{}", p);
            } else {
                prop_assert!(!is_cut && region.is_none(), "{}", p);
            }
        }
        let members: usize = d
            .partition()
            .region_ids()
            .map(|id| d.partition().members(id).len())
            .sum();
        prop_assert_eq!(members + d.cuts().len(), maze.passable_cells().count());
    }

    #[test]
    fn cut_vertices_are_exactly_the_disconnecting_cells(maze in arb_maze()) {
        let d = analyze(&maze);
        let base = components(&maze, None);
        for p in maze.passable_cells() {
            let splits = components(&maze, Some(p)) > base;
            prop_assert_eq!(d.cuts().contains(p), splits, "{}", p);
        }
    }

    #[test]
    fn reanalysis_is_idempotent(maze in arb_maze()) {
        let a = analyze(&maze);
        let b = analyze(&maze);
        prop_assert_eq!(a.cuts(), b.cuts());
        for p in maze.passable_cells() {
            prop_assert_eq!(a.node_of(p), b.node_of(p));
        }
    }

    #[test]
    fn hierarchy_and_fallback_agree_on_reachability(
        maze in arb_maze(),
        s in any::<Index>(),
        g in any::<Index>(),
        scoped in any::<bool>(),
    ) {
        let cells: Vec<Point> = maze.passable_cells().collect();
        prop_assume!(!cells.is_empty());
        let start = cells[s.index(cells.len())];
        let goal = cells[g.index(cells.len())];

        let mut planner = Planner::new(PlannerConfig {
            scope_segments: scoped,
            ..PlannerConfig::default()
        });
        let direct = planner.direct_path(&maze, start, goal);
        let planned = planner.compute_path(&maze, start, goal);

        match (planned, direct) {
            (Ok(route), Some(direct)) => {
                assert_path_valid(&maze, &route.path, start, goal);
                let cost = route.cost(&maze, planner.config());
                let best = CostModel::new(&maze, planner.config()).path_cost(&direct);
                prop_assert!(cost >= best - 1e-9);
                if route.is_hierarchical() {
                    prop_assert_eq!(route.waypoints.last(), Some(&goal));
                    for wp in &route.waypoints[..route.waypoints.len() - 1] {
                        prop_assert!(route.path.contains(wp));
                    }
                }
            }
            (Err(PlanError::NoPath { .. }), None) => {}
            (planned, direct) => {
                prop_assert!(false, "disagreement: {:?} vs {:?}", planned, direct);
            }
        }
    }

    #[test]
    fn abstract_plan_exists_iff_cells_are_connected(
        maze in arb_maze(),
        s in any::<Index>(),
        g in any::<Index>(),
    ) {
        let cells: Vec<Point> = maze.passable_cells().collect();
        prop_assume!(!cells.is_empty());
        let start = cells[s.index(cells.len())];
        let goal = cells[g.index(cells.len())];

        let d = analyze(&maze);
        let mut pr = PathRange::new(maze.bounds());
        pr.cc_map_all(&maze);
        let connected = pr.connected(start, goal);

        let from = d.node_of(start).unwrap();
        let to = d.node_of(goal).unwrap();
        let plan = d.graph().bfs(from, to);
        prop_assert_eq!(plan.is_some(), connected);
        if let Some(plan) = plan {
            prop_assert_eq!(plan.first(), Some(&from));
            prop_assert_eq!(plan.last(), Some(&to));
            for pair in plan.windows(2) {
                prop_assert!(d.graph().neighbors(pair[0]).any(|n| n == pair[1]));
            }
        }
    }
}

#[test]
fn corridor_bottleneck() {
    let maze = Maze::from_text(
        "
        ...###...
        .........
        ...###...",
    )
    .unwrap();
    let d = analyze(&maze);
    let middle = Point::new(4, 1);
    assert!(d.cuts().contains(middle));
    assert_eq!(d.partition().region_count(), 2);

    let mut blocked = maze.clone();
    blocked.add_wall(middle);
    let mut pr = PathRange::new(blocked.bounds());
    pr.cc_map_all(&blocked);
    assert!(!pr.connected(Point::new(0, 0), Point::new(8, 2)));

    let mut planner = Planner::default();
    let route = planner
        .compute_path(&maze, Point::new(0, 0), Point::new(8, 2))
        .unwrap();
    assert!(route.is_hierarchical());
    assert!(route.path.contains(&middle));
}

#[test]
fn no_bottlenecks() {
    let maze = Maze::new(5, 4);
    let d = analyze(&maze);
    assert!(d.cuts().is_empty());
    assert_eq!(d.partition().region_count(), 1);
    assert_eq!(d.partition().members(RegionId(1)).len(), 20);
}

#[test]
fn disconnected_grid() {
    let maze = Maze::from_text(
        "
        ..#..
        ..#..
        ..#..",
    )
    .unwrap();
    let (start, goal) = (Point::new(0, 0), Point::new(4, 2));
    let d = analyze(&maze);
    let (from, to) = (d.node_of(start).unwrap(), d.node_of(goal).unwrap());
    assert_ne!(from, to);
    assert_eq!(d.graph().bfs(from, to), None);

    let mut planner = Planner::default();
    assert!(planner.direct_path(&maze, start, goal).is_none());
    assert_eq!(
        planner.compute_path(&maze, start, goal),
        Err(PlanError::NoPath {
            reason: FallbackReason::DecompositionDegenerate
        })
    );
}

#[test]
fn single_cell() {
    let maze = Maze::new(1, 1);
    let p = Point::new(0, 0);
    let d = analyze(&maze);
    assert!(d.cuts().is_empty());
    assert_eq!(d.node_of(p), Some(AbstractNode::Region(RegionId(1))));

    let mut planner = Planner::default();
    let route = planner.compute_path(&maze, p, p).unwrap();
    assert_eq!(route.path, vec![p]);
    assert_eq!(route.steps(), 0);
}
