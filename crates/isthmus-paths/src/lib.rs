//! Search primitives for weighted 8-connected grids.
//!
//! This crate provides the graph algorithms the hierarchical planner is
//! built from:
//!
//! - **A\*** shortest-path search with real-valued step costs and a
//!   configurable [`Heuristic`] ([`PathRange::astar_path`])
//! - **Connected components** labelling ([`PathRange::cc_map_all`])
//! - **Cut vertices** (articulation points) via an iterative low-link DFS
//!   ([`PathRange::cut_vertices`])
//! - **Region partitioning** by flood fill bounded by cut vertices
//!   ([`PathRange::partition`])
//!
//! All algorithms operate through [`PathRange`], which owns and reuses internal
//! caches so that repeated queries over the same rectangle avoid reallocating.
//!
//! # Trait hierarchy
//!
//! | Trait | Required for |
//! |---|---|
//! | [`Pather`] | neighbour enumeration |
//! | [`Topology`] : [`Pather`] | components, cut vertices, regions |
//! | [`WeightedPather`] : [`Pather`] | step costs |
//! | [`AstarPather`] : [`WeightedPather`] | A* |

mod articulation;
mod astar;
mod cc;
mod distance;
mod neighbors;
mod pathrange;
mod regions;
mod traits;

pub use articulation::CutSet;
pub use distance::{Heuristic, chebyshev, euclidean, manhattan};
pub use neighbors::Neighbors;
pub use pathrange::{PathRange, SearchStats};
pub use regions::{Partition, RegionId};
pub use traits::{AstarPather, Pather, Topology, WeightedPather};

#[cfg(test)]
pub(crate) mod testgrid;
