//! Scheduled wall edits.
//!
//! Edits are stored in a min-heap keyed by `(due_tick, insertion_order)`.
//! Earlier ticks are applied first; edits due on the same tick are applied
//! in the order they were scheduled (FIFO). Between scheduling and its due
//! tick an edit is *pending*, which lets callers warn about cells that are
//! about to close.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use isthmus_core::Point;
use rand::Rng;

use crate::grid::{Maze, Terrain};

/// What a scheduled edit does to its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EditKind {
    AddWall,
    RemoveWall,
}

/// A single pending change to the wall layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WallEdit {
    pub pos: Point,
    pub kind: EditKind,
}

impl WallEdit {
    /// Schedule a wall to appear at `pos`.
    pub const fn add(pos: Point) -> Self {
        Self {
            pos,
            kind: EditKind::AddWall,
        }
    }

    /// Schedule the wall at `pos` to disappear.
    pub const fn remove(pos: Point) -> Self {
        Self {
            pos,
            kind: EditKind::RemoveWall,
        }
    }

    /// Apply the edit. Start and goal cells are never walled over. Returns
    /// whether the wall layout changed.
    pub fn apply(self, maze: &mut Maze) -> bool {
        match self.kind {
            EditKind::AddWall => match maze.at(self.pos) {
                Some(Terrain::Start | Terrain::Goal) | None => false,
                Some(_) => maze.add_wall(self.pos),
            },
            EditKind::RemoveWall => maze.remove_wall(self.pos),
        }
    }
}

#[derive(Debug)]
struct Entry {
    edit: WallEdit,
    due: u64,
    /// Monotonically increasing counter used to break ties.
    seq: u64,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Wrapped in Reverse for the BinaryHeap: earliest tick first, then
        // earliest insertion.
        self.due.cmp(&other.due).then(self.seq.cmp(&other.seq))
    }
}

/// A queue of wall edits waiting for their tick.
pub struct MutationQueue {
    heap: BinaryHeap<Reverse<Entry>>,
    seq: u64,
    lead: u64,
}

impl MutationQueue {
    /// Create an empty queue. Edits scheduled through
    /// [`schedule_random`](Self::schedule_random) become due `lead` ticks
    /// after they are scheduled.
    pub fn new(lead: u64) -> Self {
        Self {
            heap: BinaryHeap::new(),
            seq: 0,
            lead,
        }
    }

    /// Schedule `edit` to be applied at tick `due`.
    pub fn schedule(&mut self, edit: WallEdit, due: u64) {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(Reverse(Entry { edit, due, seq }));
    }

    /// Apply every edit due at or before `now`, in order. Returns how many
    /// of them changed the wall layout.
    pub fn advance(&mut self, now: u64, maze: &mut Maze) -> usize {
        self.advance_except(now, maze, &[])
    }

    /// Like [`advance`](Self::advance), but wall additions landing on one of
    /// the `protected` cells are dropped. Used to keep walls from appearing
    /// under an agent.
    pub fn advance_except(&mut self, now: u64, maze: &mut Maze, protected: &[Point]) -> usize {
        let mut changed = 0;
        while self.heap.peek().is_some_and(|Reverse(e)| e.due <= now) {
            let Some(Reverse(entry)) = self.heap.pop() else {
                break;
            };
            if entry.edit.kind == EditKind::AddWall && protected.contains(&entry.edit.pos) {
                log::debug!("tick {now}: dropped wall at protected {}", entry.edit.pos);
                continue;
            }
            if entry.edit.apply(maze) {
                changed += 1;
                log::debug!("tick {now}: {:?} at {}", entry.edit.kind, entry.edit.pos);
            }
        }
        changed
    }

    /// Whether a pending edit is about to wall over `p`.
    pub fn is_unstable(&self, p: Point) -> bool {
        self.heap
            .iter()
            .any(|Reverse(e)| e.edit.pos == p && e.edit.kind == EditKind::AddWall)
    }

    /// Pending edits with their due ticks, in no particular order.
    pub fn pending(&self) -> impl Iterator<Item = (WallEdit, u64)> + '_ {
        self.heap.iter().map(|Reverse(e)| (e.edit, e.due))
    }

    /// Tick of the next pending edit.
    pub fn next_due(&self) -> Option<u64> {
        self.heap.peek().map(|Reverse(e)| e.due)
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of pending edits.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Queue one random disturbance, due `lead` ticks after `now`:
    ///
    /// * a wall appears on an open cell,
    /// * a wall next to the floor disappears,
    /// * a wall shifts onto one of its open neighbours, or
    /// * a surge of two to four random appear/disappear edits.
    ///
    /// Start and goal cells are never picked. Returns how many edits were
    /// queued (zero when no suitable cell was found).
    pub fn schedule_random<R: Rng>(&mut self, maze: &Maze, rng: &mut R, now: u64) -> usize {
        let due = now + self.lead;
        let before = self.len();
        match rng.random_range(0..4u32) {
            0 => {
                if let Some(p) = random_interior(maze, rng, Terrain::Open) {
                    self.schedule(WallEdit::add(p), due);
                }
            }
            1 => {
                for _ in 0..10 {
                    let Some(p) = random_interior(maze, rng, Terrain::Wall) else {
                        continue;
                    };
                    if !maze.neighbors_of(p).is_empty() {
                        self.schedule(WallEdit::remove(p), due);
                        break;
                    }
                }
            }
            2 => {
                if let Some(p) = random_interior(maze, rng, Terrain::Wall) {
                    let targets: Vec<Point> = maze
                        .neighbors_of(p)
                        .into_iter()
                        .filter(|&n| maze.at(n) == Some(Terrain::Open))
                        .collect();
                    if !targets.is_empty() {
                        let target = targets[rng.random_range(0..targets.len())];
                        self.schedule(WallEdit::remove(p), due);
                        self.schedule(WallEdit::add(target), due);
                    }
                }
            }
            _ => {
                let count = rng.random_range(2..=4);
                for _ in 0..count {
                    if rng.random_range(0..2u32) == 0 {
                        if let Some(p) = random_interior(maze, rng, Terrain::Open) {
                            self.schedule(WallEdit::add(p), due);
                        }
                    } else if let Some(p) = random_interior(maze, rng, Terrain::Wall) {
                        self.schedule(WallEdit::remove(p), due);
                    }
                }
            }
        }
        self.len() - before
    }
}

impl Default for MutationQueue {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Up to ten draws of an interior (non-border) cell holding `terrain`.
fn random_interior<R: Rng>(maze: &Maze, rng: &mut R, terrain: Terrain) -> Option<Point> {
    if maze.width() < 3 || maze.height() < 3 {
        return None;
    }
    for _ in 0..10 {
        let p = Point::new(
            rng.random_range(1..maze.width() - 1),
            rng.random_range(1..maze.height() - 1),
        );
        if maze.at(p) == Some(terrain) {
            return Some(p);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn corridor() -> Maze {
        Maze::from_text(
            "
            #####
            #S.G#
            #...#
            #####",
        )
        .unwrap()
    }

    #[test]
    fn applies_in_tick_then_fifo_order() {
        let mut maze = corridor();
        let v0 = maze.version();
        let mut q = MutationQueue::new(1);
        let p = Point::new(2, 2);
        q.schedule(WallEdit::remove(p), 3);
        q.schedule(WallEdit::add(p), 3);
        q.schedule(WallEdit::add(p), 1);

        assert_eq!(q.advance(0, &mut maze), 0);
        assert_eq!(q.next_due(), Some(1));
        assert_eq!(q.advance(1, &mut maze), 1);
        assert_eq!(maze.at(p), Some(Terrain::Wall));
        // remove then add on the same tick: the wall ends up back.
        assert_eq!(q.advance(5, &mut maze), 2);
        assert_eq!(maze.at(p), Some(Terrain::Wall));
        assert!(q.is_empty());
        assert_ne!(maze.version(), v0);
    }

    #[test]
    fn start_and_goal_are_protected() {
        let mut maze = corridor();
        let v0 = maze.version();
        assert!(!WallEdit::add(Point::new(1, 1)).apply(&mut maze));
        assert!(!WallEdit::add(Point::new(3, 1)).apply(&mut maze));
        assert!(!WallEdit::remove(Point::new(2, 1)).apply(&mut maze));
        assert_eq!(maze.version(), v0);
    }

    #[test]
    fn pending_adds_mark_cells_unstable() {
        let mut maze = corridor();
        let mut q = MutationQueue::new(2);
        let p = Point::new(2, 1);
        q.schedule(WallEdit::add(p), 2);
        assert!(q.is_unstable(p));
        assert!(!q.is_unstable(Point::new(1, 2)));
        assert_eq!(q.pending().count(), 1);
        q.advance(2, &mut maze);
        assert!(!q.is_unstable(p));
    }

    #[test]
    fn protected_cells_are_never_walled() {
        let mut maze = corridor();
        let mut q = MutationQueue::new(1);
        let here = Point::new(2, 1);
        let there = Point::new(2, 2);
        q.schedule(WallEdit::add(here), 1);
        q.schedule(WallEdit::add(there), 1);
        q.schedule(WallEdit::remove(here), 1);

        assert_eq!(q.advance_except(1, &mut maze, &[here]), 1);
        assert_eq!(maze.at(here), Some(Terrain::Open));
        assert_eq!(maze.at(there), Some(Terrain::Wall));
        assert!(q.is_empty());
    }

    #[test]
    fn random_disturbances_respect_lead_and_endpoints() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut maze = Maze::from_text(
            "
            #########
            #S..#...#
            #.#...#.#
            #...#..G#
            #########",
        )
        .unwrap();
        let mut q = MutationQueue::new(4);
        let mut queued = 0;
        for tick in 0..40 {
            queued += q.schedule_random(&maze, &mut rng, tick);
            for (edit, due) in q.pending() {
                assert!(due >= tick);
                assert!(edit.pos.x > 0 && edit.pos.y > 0);
            }
            q.advance(tick, &mut maze);
            assert_eq!(maze.start(), Some(Point::new(1, 1)));
            assert_eq!(maze.goal(), Some(Point::new(7, 3)));
        }
        assert!(queued > 0);
    }
}
