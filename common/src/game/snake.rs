use std::collections::{HashSet, VecDeque};

use super::types::Point;

/// Snake body, head first. The deque carries the order, the set answers
/// membership queries; both are kept in sync through every mutation.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Point>,
    body_set: HashSet<Point>,
}

impl Snake {
    pub fn from_segments(segments: impl IntoIterator<Item = Point>) -> Self {
        let body: VecDeque<Point> = segments.into_iter().collect();
        let body_set: HashSet<Point> = body.iter().copied().collect();
        Self { body, body_set }
    }

    pub fn head(&self) -> Point {
        *self.body.front().expect("Snake body should never be empty")
    }

    pub fn tail(&self) -> Point {
        *self.body.back().expect("Snake body should never be empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = Point> + '_ {
        self.body.iter().copied()
    }

    pub fn contains(&self, p: Point) -> bool {
        self.body_set.contains(&p)
    }

    /// Eating move: the head extends and the tail stays.
    pub fn grow_head(&mut self, head: Point) {
        self.body.push_front(head);
        self.body_set.insert(head);
    }

    /// Regular move: the tail vacates, then the head extends. The tail is
    /// dropped first so that stepping into the vacated tail cell leaves the
    /// membership set correct.
    pub fn advance(&mut self, head: Point) {
        let tail = self.body.pop_back().expect("Snake body should never be empty");
        self.body_set.remove(&tail);
        self.body.push_front(head);
        self.body_set.insert(head);
    }
}
