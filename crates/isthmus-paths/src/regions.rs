//! Region partitioning bounded by cut vertices.
//!
//! Every passable cell that is not a cut vertex lands in exactly one
//! region; cut vertices belong to none and instead record the regions they
//! touch.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

use isthmus_core::{Point, Range};

use crate::PathRange;
use crate::articulation::CutSet;
use crate::traits::Topology;

/// Identifier of a region, unique within one partition. Ids start at 1 and
/// are reassigned from scratch by every partitioning pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionId(pub u32);

impl RegionId {
    /// Get the underlying integer value.
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

/// Result of a partitioning pass.
#[derive(Debug, Clone)]
pub struct Partition {
    rng: Range,
    /// 0 for walls and cut vertices, otherwise the region id.
    labels: Vec<u32>,
    /// Members of region `i + 1`, in discovery order.
    members: Vec<Vec<Point>>,
    touches: BTreeMap<Point, BTreeSet<RegionId>>,
}

impl Partition {
    /// The region containing `p`, or `None` for walls, cut vertices and
    /// out-of-range points.
    pub fn region_of(&self, p: Point) -> Option<RegionId> {
        let i = self.rng.index_of(p)?;
        match self.labels[i] {
            0 => None,
            id => Some(RegionId(id)),
        }
    }

    /// Number of regions.
    pub fn region_count(&self) -> usize {
        self.members.len()
    }

    /// Whether no region was found (the grid has no passable non-cut cell).
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// All region ids in increasing order.
    pub fn region_ids(&self) -> impl Iterator<Item = RegionId> + '_ {
        (1..=self.members.len() as u32).map(RegionId)
    }

    /// Cells of region `id` in flood-fill order, or an empty slice for an
    /// unknown id.
    pub fn members(&self, id: RegionId) -> &[Point] {
        match (id.0 as usize).checked_sub(1).and_then(|i| self.members.get(i)) {
            Some(cells) => cells,
            None => &[],
        }
    }

    /// Regions touched by cut vertex `cut`. `None` if `cut` is not a cut
    /// vertex of this partition.
    pub fn touches(&self, cut: Point) -> Option<&BTreeSet<RegionId>> {
        self.touches.get(&cut)
    }

    /// Region-to-region adjacency: two regions are adjacent when some cut
    /// vertex touches both. Only meant for display; the planner links
    /// regions through their cut vertices instead.
    pub fn region_adjacency(&self) -> BTreeMap<RegionId, BTreeSet<RegionId>> {
        let mut adj: BTreeMap<RegionId, BTreeSet<RegionId>> =
            self.region_ids().map(|id| (id, BTreeSet::new())).collect();
        for rids in self.touches.values() {
            for &a in rids {
                for &b in rids {
                    if a != b {
                        adj.entry(a).or_default().insert(b);
                    }
                }
            }
        }
        adj
    }
}

impl PathRange {
    /// Partition the passable cells of `pather` into regions separated by
    /// the cut vertices in `cuts`.
    ///
    /// Cells are scanned row-major; each unseen, non-cut passable cell seeds
    /// a breadth-first flood that never enters a cut vertex. A cut vertex
    /// met during the flood records the current region instead.
    pub fn partition<P: Topology>(&mut self, pather: &P, cuts: &CutSet) -> Partition {
        let len = self.len();
        let mut labels = vec![0u32; len];
        let mut members: Vec<Vec<Point>> = Vec::new();
        let mut touches: BTreeMap<Point, BTreeSet<RegionId>> =
            cuts.iter().map(|p| (p, BTreeSet::new())).collect();

        let mut queue: VecDeque<usize> = VecDeque::new();
        let mut nbuf = std::mem::take(&mut self.nbuf);

        for seed in 0..len {
            let sp = self.point(seed);
            if labels[seed] != 0 || cuts.contains(sp) || !pather.passable(sp) {
                continue;
            }

            let id = RegionId(members.len() as u32 + 1);
            let mut cells = vec![sp];
            labels[seed] = id.0;
            queue.push_back(seed);

            while let Some(ci) = queue.pop_front() {
                nbuf.clear();
                pather.neighbors(self.point(ci), &mut nbuf);

                for &np in nbuf.iter() {
                    if !pather.passable(np) {
                        continue;
                    }
                    if cuts.contains(np) {
                        touches.entry(np).or_default().insert(id);
                        continue;
                    }
                    let Some(ni) = self.idx(np) else {
                        continue;
                    };
                    if labels[ni] == 0 {
                        labels[ni] = id.0;
                        cells.push(np);
                        queue.push_back(ni);
                    }
                }
            }

            members.push(cells);
        }

        self.nbuf = nbuf;
        Partition {
            rng: self.rng,
            labels,
            members,
            touches,
        }
    }
}
