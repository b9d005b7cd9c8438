//! Connected-component labelling.

use isthmus_core::Point;

use crate::PathRange;
use crate::traits::Topology;

impl PathRange {
    /// Label every passable cell in the range with a connected-component ID.
    ///
    /// Two cells belong to the same component if there is a path of
    /// neighbours (as defined by `pather`) between them. Walls are left
    /// unlabelled. After this call use [`cc_at`](Self::cc_at) to query the
    /// label of a given point and [`component_count`](Self::component_count)
    /// for the number of components. Returns the component count.
    pub fn cc_map_all<P: Topology>(&mut self, pather: &P) -> usize {
        let len = self.len();
        for v in self.cc_labels.iter_mut() {
            *v = -1;
        }

        let mut label: i32 = 0;
        let mut nbuf = std::mem::take(&mut self.nbuf);

        for start in 0..len {
            if self.cc_labels[start] >= 0 || !pather.passable(self.point(start)) {
                continue;
            }

            // Iterative DFS from `start`.
            self.cc_stack.clear();
            self.cc_stack.push(start);
            self.cc_labels[start] = label;

            while let Some(ci) = self.cc_stack.pop() {
                let cp = self.point(ci);
                nbuf.clear();
                pather.neighbors(cp, &mut nbuf);

                for &np in nbuf.iter() {
                    if let Some(ni) = self.idx(np) {
                        if self.cc_labels[ni] < 0 {
                            self.cc_labels[ni] = label;
                            self.cc_stack.push(ni);
                        }
                    }
                }
            }

            label += 1;
        }

        self.nbuf = nbuf;
        self.cc_count = label as usize;
        self.cc_count
    }

    /// Query the connected-component label of a point.
    ///
    /// Returns `None` if the point is outside the range, is a wall, or
    /// `cc_map_all` has not been called yet.
    pub fn cc_at(&self, p: Point) -> Option<usize> {
        let i = self.idx(p)?;
        let label = self.cc_labels[i];
        if label < 0 { None } else { Some(label as usize) }
    }

    /// Number of components found by the last [`cc_map_all`](Self::cc_map_all).
    pub fn component_count(&self) -> usize {
        self.cc_count
    }

    /// Whether `a` and `b` were labelled as the same component.
    pub fn connected(&self, a: Point, b: Point) -> bool {
        matches!((self.cc_at(a), self.cc_at(b)), (Some(x), Some(y)) if x == y)
    }
}
