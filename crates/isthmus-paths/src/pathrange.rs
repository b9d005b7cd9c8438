use std::ops::AddAssign;

use isthmus_core::{Point, Range};

/// Search-effort counters reported by the last query.
///
/// `explored` counts nodes taken off the open list and expanded, `visited`
/// counts distinct cells the search discovered. Purely diagnostic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    pub explored: usize,
    pub visited: usize,
}

impl AddAssign for SearchStats {
    fn add_assign(&mut self, rhs: Self) {
        self.explored += rhs.explored;
        self.visited += rhs.visited;
    }
}

// ---------------------------------------------------------------------------
// Internal node for A* priority-queue searches
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub(crate) struct Node {
    pub(crate) g: f64,
    pub(crate) parent: usize,
    pub(crate) generation: u32,
    pub(crate) open: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            g: 0.0,
            parent: usize::MAX,
            generation: 0,
            open: false,
        }
    }
}

/// Reference into the node array, ordered by `f` then by insertion
/// sequence for use in `BinaryHeap`.
#[derive(Clone, Copy)]
pub(crate) struct NodeRef {
    pub(crate) idx: usize,
    pub(crate) f: f64,
    pub(crate) seq: u64,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest f first, and the
        // earliest push among equal f.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for NodeRef {}

/// One frame of the explicit DFS stack used by the cut-vertex analysis.
///
/// `next..end` indexes the frame's pending neighbours in the shared
/// adjacency stack.
#[derive(Clone, Copy)]
pub(crate) struct Frame {
    pub(crate) node: usize,
    pub(crate) parent: usize,
    pub(crate) start: usize,
    pub(crate) next: usize,
    pub(crate) end: usize,
}

// ---------------------------------------------------------------------------
// PathRange
// ---------------------------------------------------------------------------

/// Central coordinator for searches on a grid rectangle.
///
/// `PathRange` owns all internal caches (node arrays, component labels, DFS
/// stacks) so that repeated queries incur no allocations after the first
/// use. Results that outlive a query ([`CutSet`](crate::CutSet),
/// [`Partition`](crate::Partition), paths) are returned as owned values.
pub struct PathRange {
    pub(crate) rng: Range,
    // A* caches
    pub(crate) astar_nodes: Vec<Node>,
    pub(crate) astar_generation: u32,
    pub(crate) stats: SearchStats,
    // CC caches
    pub(crate) cc_labels: Vec<i32>,
    pub(crate) cc_stack: Vec<usize>,
    pub(crate) cc_count: usize,
    // cut-vertex caches
    pub(crate) disc: Vec<u32>,
    pub(crate) low: Vec<u32>,
    pub(crate) frames: Vec<Frame>,
    pub(crate) adj: Vec<usize>,
    // shared scratch buffer for neighbor queries
    pub(crate) nbuf: Vec<Point>,
}

impl PathRange {
    /// Create a new `PathRange` for the given grid rectangle.
    pub fn new(rng: Range) -> Self {
        let len = rng.len();
        Self {
            rng,
            astar_nodes: vec![Node::default(); len],
            astar_generation: 0,
            stats: SearchStats::default(),
            cc_labels: vec![-1; len],
            cc_stack: Vec::new(),
            cc_count: 0,
            disc: vec![u32::MAX; len],
            low: vec![u32::MAX; len],
            frames: Vec::new(),
            adj: Vec::new(),
            nbuf: Vec::with_capacity(8),
        }
    }

    /// Replace the underlying range, reallocating caches if it grew.
    pub fn set_range(&mut self, rng: Range) {
        let new_len = rng.len();
        self.rng = rng;
        self.stats = SearchStats::default();
        self.cc_count = 0;

        if new_len <= self.astar_nodes.len() {
            // Bumping the generation is enough to ignore stale A* entries;
            // the other caches are reset at the start of every query.
            self.astar_generation = self.astar_generation.wrapping_add(1);
            return;
        }

        self.astar_nodes.clear();
        self.astar_nodes.resize(new_len, Node::default());
        self.astar_generation = 0;

        self.cc_labels.clear();
        self.cc_labels.resize(new_len, -1);
        self.disc.clear();
        self.disc.resize(new_len, u32::MAX);
        self.low.clear();
        self.low.resize(new_len, u32::MAX);
    }

    /// The grid rectangle being used.
    #[inline]
    pub fn range(&self) -> Range {
        self.rng
    }

    /// Effort counters of the most recent [`astar_path`](Self::astar_path).
    #[inline]
    pub fn last_stats(&self) -> SearchStats {
        self.stats
    }

    // -----------------------------------------------------------------------
    // Coordinate helpers
    // -----------------------------------------------------------------------

    /// Convert a `Point` to a flat index. Returns `None` if out of range.
    #[inline]
    pub(crate) fn idx(&self, p: Point) -> Option<usize> {
        self.rng.index_of(p)
    }

    /// Convert a flat index back to a `Point`.
    #[inline]
    pub(crate) fn point(&self, idx: usize) -> Point {
        self.rng.point_at(idx)
    }

    /// Number of cells covered by the range.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.rng.len()
    }
}
