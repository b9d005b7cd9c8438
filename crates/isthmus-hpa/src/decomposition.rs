use isthmus_core::Point;
use isthmus_paths::{CutSet, Partition, PathRange};

use crate::graph::{AbstractGraph, AbstractNode};
use crate::view::MazeView;

/// Cut vertices, regions and abstract graph of one maze version.
///
/// Built wholesale by [`analyze`](Self::analyze) and never patched: when the
/// maze version moves on, the whole value is replaced.
#[derive(Debug, Clone)]
pub struct Decomposition {
    version: u64,
    cuts: CutSet,
    partition: Partition,
    graph: AbstractGraph,
}

impl Decomposition {
    /// Run cut-vertex analysis, region partitioning and graph construction
    /// over `maze`. `pr` must cover the maze bounds.
    pub fn analyze<M: MazeView>(pr: &mut PathRange, maze: &M) -> Self {
        let cuts = pr.cut_vertices(maze);
        let partition = pr.partition(maze, &cuts);
        let graph = AbstractGraph::build(&cuts, &partition, maze);
        log::debug!(
            "decomposition v{}: {} cut vertices, {} regions, {} abstract nodes, {} edges",
            maze.version(),
            cuts.len(),
            partition.region_count(),
            graph.node_count(),
            graph.edge_count()
        );
        Self {
            version: maze.version(),
            cuts,
            partition,
            graph,
        }
    }

    /// Maze version the decomposition was built from.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether a maze now at `version` has moved past this decomposition.
    #[inline]
    pub fn is_stale(&self, version: u64) -> bool {
        self.version != version
    }

    #[inline]
    pub fn cuts(&self) -> &CutSet {
        &self.cuts
    }

    #[inline]
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    #[inline]
    pub fn graph(&self) -> &AbstractGraph {
        &self.graph
    }

    /// True when the hierarchy has nothing to offer: no cut vertex, or no
    /// region.
    pub fn is_degenerate(&self) -> bool {
        self.cuts.is_empty() || self.partition.is_empty()
    }

    /// The abstract node standing for cell `p`: the cell itself if it is a
    /// cut vertex, else its region. `None` for walls and cells outside.
    pub fn node_of(&self, p: Point) -> Option<AbstractNode> {
        if self.cuts.contains(p) {
            return Some(AbstractNode::Cut(p));
        }
        self.partition.region_of(p).map(AbstractNode::Region)
    }
}
