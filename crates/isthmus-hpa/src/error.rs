use std::fmt;

use isthmus_core::Point;

/// Why the planner gave up on the hierarchy and searched the whole grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FallbackReason {
    /// The maze has no cut vertex, or no region.
    DecompositionDegenerate,
    /// Start or goal is neither a cut vertex nor inside a region.
    NodeMappingFailed,
    /// The abstract graph has no route between start and goal.
    NoAbstractPath,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::DecompositionDegenerate => "decomposition is degenerate",
            Self::NodeMappingFailed => "endpoint maps to no abstract node",
            Self::NoAbstractPath => "no abstract path",
        };
        f.write_str(s)
    }
}

/// Errors returned by [`Planner::compute_path`](crate::Planner::compute_path).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// Start or goal lies outside the maze or inside a wall.
    #[error("endpoint {0} is outside the maze or inside a wall")]
    InvalidEndpoint(Point),
    /// The full-grid fallback ran and found nothing.
    #[error("no path between start and goal ({reason})")]
    NoPath { reason: FallbackReason },
    /// A stitching search between two waypoints of an abstract plan
    /// failed. The decomposition promised a route that does not exist.
    #[error("no segment from {from} to {to} despite an abstract plan")]
    SegmentUnreachable { from: Point, to: Point },
}
