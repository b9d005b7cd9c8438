//! Cut-vertex (articulation point) analysis.
//!
//! Tarjan's low-link DFS, run with an explicit stack of frames so that
//! long corridors cannot overflow the call stack. Every connected component
//! gets its own DFS tree; discovery times keep increasing across trees.

use isthmus_core::{Point, Range};

use crate::PathRange;
use crate::pathrange::Frame;
use crate::traits::Topology;

const UNVISITED: u32 = u32::MAX;
const NO_PARENT: usize = usize::MAX;

/// The set of cut vertices of a grid: cells whose removal disconnects the
/// component they belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutSet {
    rng: Range,
    flags: Vec<bool>,
    points: Vec<Point>,
}

impl CutSet {
    fn from_flags(rng: Range, flags: Vec<bool>) -> Self {
        let points = flags
            .iter()
            .enumerate()
            .filter(|&(_, &cut)| cut)
            .map(|(i, _)| rng.point_at(i))
            .collect();
        Self { rng, flags, points }
    }

    /// Whether `p` is a cut vertex.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.rng.index_of(p).is_some_and(|i| self.flags[i])
    }

    /// Cut vertices in row-major order.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Iterate cut vertices in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.points.iter().copied()
    }

    /// Number of cut vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the grid has no cut vertex at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The range the set was computed over.
    #[inline]
    pub fn range(&self) -> Range {
        self.rng
    }
}

impl PathRange {
    /// Compute the cut vertices of the passable cells of `pather`.
    ///
    /// Cells are scanned in row-major order and every unvisited passable cell
    /// roots a new DFS tree. A non-root `p` is a cut vertex when some child
    /// `u` has `low[u] >= disc[p]`; a root is a cut vertex when it has more
    /// than one DFS child.
    pub fn cut_vertices<P: Topology>(&mut self, pather: &P) -> CutSet {
        let len = self.len();
        for v in self.disc.iter_mut() {
            *v = UNVISITED;
        }
        for v in self.low.iter_mut() {
            *v = UNVISITED;
        }
        self.frames.clear();
        self.adj.clear();

        let mut cut = vec![false; len];
        let mut time: u32 = 0;
        let mut nbuf = std::mem::take(&mut self.nbuf);

        for root in 0..len {
            if self.disc[root] != UNVISITED || !pather.passable(self.point(root)) {
                continue;
            }

            self.disc[root] = time;
            self.low[root] = time;
            time += 1;
            self.push_frame(pather, root, NO_PARENT, &mut nbuf);
            let mut root_children = 0usize;

            while let Some(&top) = self.frames.last() {
                let u = top.node;
                let p = top.parent;

                if top.next < top.end {
                    let v = self.adj[top.next];
                    if let Some(f) = self.frames.last_mut() {
                        f.next += 1;
                    }
                    if v == p {
                        continue;
                    }
                    if self.disc[v] != UNVISITED {
                        // Back edge.
                        self.low[u] = self.low[u].min(self.disc[v]);
                    } else {
                        // Tree edge.
                        self.disc[v] = time;
                        self.low[v] = time;
                        time += 1;
                        self.push_frame(pather, v, u, &mut nbuf);
                    }
                    continue;
                }

                // All neighbours of `u` handled.
                self.frames.pop();
                self.adj.truncate(top.start);
                if p == NO_PARENT {
                    continue;
                }
                self.low[p] = self.low[p].min(self.low[u]);
                if p == root {
                    root_children += 1;
                } else if self.low[u] >= self.disc[p] {
                    cut[p] = true;
                }
            }

            if root_children > 1 {
                cut[root] = true;
            }
        }

        self.nbuf = nbuf;
        let set = CutSet::from_flags(self.rng, cut);
        log::trace!("cut vertex scan: {} discovered, {} cut", time, set.len());
        set
    }

    fn push_frame<P: Topology>(
        &mut self,
        pather: &P,
        node: usize,
        parent: usize,
        nbuf: &mut Vec<Point>,
    ) {
        let start = self.adj.len();
        nbuf.clear();
        pather.neighbors(self.point(node), nbuf);
        for &np in nbuf.iter() {
            if !pather.passable(np) {
                continue;
            }
            if let Some(ni) = self.idx(np) {
                self.adj.push(ni);
            }
        }
        self.frames.push(Frame {
            node,
            parent,
            start,
            next: start,
            end: self.adj.len(),
        });
    }
}
