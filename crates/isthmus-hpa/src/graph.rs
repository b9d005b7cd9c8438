//! The abstract planning graph.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

use isthmus_core::Point;
use isthmus_paths::{CutSet, Partition, Pather, RegionId};

/// A node of the abstract graph: a whole region, or a single cut vertex.
///
/// Nodes are ordered regions first (by id), then cut vertices (row-major).
/// Adjacency sets use that order, which makes breadth-first plans
/// reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AbstractNode {
    Region(RegionId),
    Cut(Point),
}

impl AbstractNode {
    /// The cut vertex this node stands for, if any.
    #[inline]
    pub fn as_cut(self) -> Option<Point> {
        match self {
            Self::Cut(p) => Some(p),
            Self::Region(_) => None,
        }
    }

    /// The region this node stands for, if any.
    #[inline]
    pub fn as_region(self) -> Option<RegionId> {
        match self {
            Self::Region(id) => Some(id),
            Self::Cut(_) => None,
        }
    }
}

impl fmt::Display for AbstractNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Region(id) => write!(f, "{id}"),
            Self::Cut(p) => write!(f, "cut {p}"),
        }
    }
}

/// Undirected graph over regions and cut vertices.
///
/// Edges join a cut vertex to every region it touches, and two cut vertices
/// that are grid neighbours. Regions are never joined directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbstractGraph {
    adj: BTreeMap<AbstractNode, BTreeSet<AbstractNode>>,
}

impl AbstractGraph {
    /// Build the graph of a partition. `pather` supplies grid adjacency
    /// between cut vertices.
    pub fn build<P: Pather>(cuts: &CutSet, partition: &Partition, pather: &P) -> Self {
        let mut g = Self::default();
        for id in partition.region_ids() {
            g.adj.entry(AbstractNode::Region(id)).or_default();
        }

        let mut nbuf = Vec::with_capacity(8);
        for ap in cuts.iter() {
            let node = AbstractNode::Cut(ap);
            g.adj.entry(node).or_default();

            nbuf.clear();
            pather.neighbors(ap, &mut nbuf);
            for &n in nbuf.iter() {
                if cuts.contains(n) {
                    g.link(node, AbstractNode::Cut(n));
                }
            }
            if let Some(regions) = partition.touches(ap) {
                for &r in regions {
                    g.link(node, AbstractNode::Region(r));
                }
            }
        }
        g
    }

    fn link(&mut self, a: AbstractNode, b: AbstractNode) {
        self.adj.entry(a).or_default().insert(b);
        self.adj.entry(b).or_default().insert(a);
    }

    /// Whether `node` is part of the graph.
    pub fn contains(&self, node: AbstractNode) -> bool {
        self.adj.contains_key(&node)
    }

    /// Neighbours of `node` in node order. Empty for unknown nodes.
    pub fn neighbors(&self, node: AbstractNode) -> impl Iterator<Item = AbstractNode> + '_ {
        self.adj.get(&node).into_iter().flatten().copied()
    }

    /// All nodes in node order.
    pub fn nodes(&self) -> impl Iterator<Item = AbstractNode> + '_ {
        self.adj.keys().copied()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.adj.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adj.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Fewest-hop route from `from` to `to`, both ends included.
    ///
    /// Neighbours are expanded in node order, so among several shortest
    /// routes the one found first in that order wins. Returns `None` if
    /// either node is missing or `to` cannot be reached.
    pub fn bfs(&self, from: AbstractNode, to: AbstractNode) -> Option<Vec<AbstractNode>> {
        if !self.contains(from) || !self.contains(to) {
            return None;
        }
        if from == to {
            return Some(vec![from]);
        }

        let mut parent: BTreeMap<AbstractNode, AbstractNode> = BTreeMap::new();
        let mut queue = VecDeque::from([from]);
        let mut found = false;

        'search: while let Some(node) = queue.pop_front() {
            for next in self.neighbors(node) {
                if next == from || parent.contains_key(&next) {
                    continue;
                }
                parent.insert(next, node);
                if next == to {
                    found = true;
                    break 'search;
                }
                queue.push_back(next);
            }
        }

        if !found {
            return None;
        }
        let mut plan = vec![to];
        let mut cur = to;
        while let Some(&prev) = parent.get(&cur) {
            plan.push(prev);
            cur = prev;
        }
        plan.reverse();
        Some(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isthmus_maze::Maze;
    use isthmus_paths::PathRange;

    fn graph_of(layout: &str) -> (Maze, CutSet, Partition, AbstractGraph) {
        let maze = Maze::from_text(layout).unwrap();
        let mut pr = PathRange::new(maze.bounds());
        let cuts = pr.cut_vertices(&maze);
        let partition = pr.partition(&maze, &cuts);
        let graph = AbstractGraph::build(&cuts, &partition, &maze);
        (maze, cuts, partition, graph)
    }

    #[test]
    fn node_order_puts_regions_first() {
        let r = AbstractNode::Region(RegionId(9));
        let c = AbstractNode::Cut(Point::new(0, 0));
        assert!(r < c);
        assert!(AbstractNode::Cut(Point::new(5, 0)) < AbstractNode::Cut(Point::new(0, 1)));
        assert_eq!(c.as_cut(), Some(Point::new(0, 0)));
        assert_eq!(r.as_region(), Some(RegionId(9)));
        assert_eq!(r.to_string(), "R9");
    }

    #[test]
    fn corridor_links_rooms_through_cut_chain() {
        // Two rooms joined through a single gap.
        let (_, cuts, partition, graph) = graph_of(
            "
            ...#...
            .......
            ...#...",
        );
        assert_eq!(cuts.points(), &[Point::new(3, 1)]);
        assert_eq!(partition.region_count(), 2);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);

        let cut = AbstractNode::Cut(Point::new(3, 1));
        let neigh: Vec<_> = graph.neighbors(cut).collect();
        assert_eq!(
            neigh,
            vec![AbstractNode::Region(RegionId(1)), AbstractNode::Region(RegionId(2))]
        );
        // Regions are never adjacent to each other.
        assert!(
            graph
                .neighbors(AbstractNode::Region(RegionId(1)))
                .all(|n| n.as_cut().is_some())
        );
    }

    #[test]
    fn adjacent_cut_vertices_are_linked() {
        let (_, cuts, _, graph) = graph_of(
            "
            ..#####..
            .........
            ..#####..",
        );
        assert_eq!(cuts.len(), 5);
        let a = AbstractNode::Cut(Point::new(3, 1));
        let b = AbstractNode::Cut(Point::new(4, 1));
        assert!(graph.neighbors(a).any(|n| n == b));
        assert!(graph.neighbors(b).any(|n| n == a));

        let plan = graph
            .bfs(AbstractNode::Region(RegionId(1)), AbstractNode::Region(RegionId(2)))
            .unwrap();
        assert_eq!(plan.len(), 7);
        assert_eq!(plan[0], AbstractNode::Region(RegionId(1)));
        let cuts_on_plan: Vec<_> = plan.iter().filter_map(|n| n.as_cut()).collect();
        assert_eq!(cuts_on_plan, cuts.points());
    }

    #[test]
    fn bfs_trivial_and_unreachable() {
        let (_, _, _, graph) = graph_of(
            "
            ..#..
            ..#..",
        );
        let r1 = AbstractNode::Region(RegionId(1));
        let r2 = AbstractNode::Region(RegionId(2));
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.bfs(r1, r1), Some(vec![r1]));
        assert_eq!(graph.bfs(r1, r2), None);
        assert_eq!(graph.bfs(r1, AbstractNode::Region(RegionId(7))), None);
    }

    #[test]
    fn bfs_ties_resolve_regions_first() {
        // A crossing: the four arm roots are cut vertices, diagonally
        // linked around the centre cell which is a region of its own.
        let (_, cuts, partition, graph) = graph_of(
            "
            ##.##
            ##.##
            .....
            ##.##
            ##.##",
        );
        assert_eq!(cuts.len(), 4);
        assert_eq!(partition.region_count(), 5);
        let centre = partition.region_of(Point::new(2, 2)).unwrap();
        assert_eq!(centre, RegionId(3));

        let top = AbstractNode::Region(RegionId(1));
        let bottom = AbstractNode::Region(RegionId(5));
        let plan = graph.bfs(top, bottom).unwrap();
        assert_eq!(
            plan,
            vec![
                top,
                AbstractNode::Cut(Point::new(2, 1)),
                AbstractNode::Region(centre),
                AbstractNode::Cut(Point::new(2, 3)),
                bottom,
            ]
        );
    }
}
