//! A growable LIFO work list, used to traverse trees without recursion.
//!
//! The capacity follows the number of items enqueued at once, not any size
//! known up front, so a traversal can never overflow it.
use alloc::vec::Vec;

#[derive(Debug, Clone)]
pub struct WorkList<T> {
    items: Vec<T>,
}

impl<T> WorkList<T> {
    #[inline]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    #[inline]
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// The item [`Self::pop`] would return next.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> Default for WorkList<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for WorkList<T> {
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}
