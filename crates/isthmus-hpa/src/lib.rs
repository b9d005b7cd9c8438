//! Hierarchical pathfinding over cut-vertex decompositions.
//!
//! A maze is split into regions separated by cut vertices. The regions and
//! cut vertices form a small [`AbstractGraph`]; a [`Planner`] searches that
//! graph breadth-first, then stitches a concrete route by running A* between
//! the cut vertices the abstract plan passes through.
//!
//! The decomposition is a versioned value ([`Decomposition`]) owned by the
//! planner. Whenever the maze reports a different wall-layout version the
//! decomposition is rebuilt from scratch before planning resumes. When the
//! hierarchy cannot help (no cut vertices, a cell that maps to no node, or
//! no abstract route) the planner falls back to one A* search over the whole
//! grid and says so in [`Route::mode`].
//!
//! ```
//! use isthmus_core::Point;
//! use isthmus_hpa::{Planner, RouteMode};
//! use isthmus_maze::Maze;
//!
//! let layout = concat!(
//!     "#########\n",
//!     "#S..#...#\n",
//!     "#...#...#\n",
//!     "#.......#\n",
//!     "#...#..G#\n",
//!     "#########",
//! );
//! let maze: Maze = layout.parse().unwrap();
//!
//! let mut planner = Planner::default();
//! let route = planner
//!     .compute_path(&maze, Point::new(1, 1), Point::new(7, 4))
//!     .unwrap();
//! assert_eq!(route.mode, RouteMode::Hierarchical);
//! assert_eq!(route.path.first(), Some(&Point::new(1, 1)));
//! assert_eq!(route.path.last(), Some(&Point::new(7, 4)));
//! ```

mod config;
mod cost;
mod decomposition;
mod error;
mod graph;
mod planner;
mod view;
mod walker;

pub use config::PlannerConfig;
pub use cost::CostModel;
pub use decomposition::Decomposition;
pub use error::{FallbackReason, PlanError};
pub use graph::{AbstractGraph, AbstractNode};
pub use planner::{Planner, PlannerState, Route, RouteMode};
pub use view::MazeView;
pub use walker::{WalkStatus, Walker};
