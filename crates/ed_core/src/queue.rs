//! Binary heap ordered by an explicit comparator.
//!
//! The order is supplied at construction rather than taken from `Ord` on the
//! element type. The element that compares `Less` than all others is popped
//! first.

use std::cmp::Ordering;
use std::fmt;

/// Total order over queue elements; `Less` means "served earlier".
pub type Comparator<T> = fn(&T, &T) -> Ordering;

pub struct PriorityQueue<T> {
    items: Vec<T>,
    compare: Comparator<T>,
}

impl<T> PriorityQueue<T> {
    pub fn new(compare: Comparator<T>) -> Self {
        Self {
            items: Vec::new(),
            compare,
        }
    }

    pub fn with_capacity(capacity: usize, compare: Comparator<T>) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            compare,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The element that would be popped next.
    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
        let last = self.items.len() - 1;
        self.sift_up(last);
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let last = self.items.len() - 1;
        self.items.swap(0, last);
        let item = self.items.pop();
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        item
    }

    /// Removes the first element (in storage order) matching `predicate`.
    pub fn remove_first<P>(&mut self, mut predicate: P) -> Option<T>
    where
        P: FnMut(&T) -> bool,
    {
        let index = self.items.iter().position(|item| predicate(item))?;
        let last = self.items.len() - 1;
        self.items.swap(index, last);
        let removed = self.items.pop();
        if index < self.items.len() {
            // The element moved into `index` may belong above or below it.
            let index = self.sift_up(index);
            self.sift_down(index);
        }
        removed
    }

    pub fn contains<P>(&self, predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.items.iter().any(predicate)
    }

    /// Iterates in storage order, not priority order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Drains the queue in priority order.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.items.len());
        while let Some(item) = self.pop() {
            sorted.push(item);
        }
        sorted
    }

    fn precedes(&self, a: usize, b: usize) -> bool {
        (self.compare)(&self.items[a], &self.items[b]) == Ordering::Less
    }

    fn sift_up(&mut self, mut index: usize) -> usize {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.precedes(index, parent) {
                break;
            }
            self.items.swap(index, parent);
            index = parent;
        }
        index
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.precedes(right, left) {
                right
            } else {
                left
            };
            if !self.precedes(child, index) {
                break;
            }
            self.items.swap(index, child);
            index = child;
        }
    }
}

impl<T: Clone> Clone for PriorityQueue<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            compare: self.compare,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PriorityQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityQueue")
            .field("len", &self.items.len())
            .field("items", &self.items)
            .finish()
    }
}
