//! An owning, ordered container of keys, balanced by a [`Discipline`].
use alloc::{boxed::Box, string::String};
use core::{
    borrow::Borrow,
    cmp::max,
    fmt,
    iter::FusedIterator,
    marker::PhantomData,
    ptr::NonNull,
};

use crate::{
    raw::{
        avl::Avl,
        node::{Link, Node},
        placement,
        rbtree::RedBlack,
        splice, Discipline,
    },
    utils::{render, worklist::WorkList},
};


/// An ordered multiset of keys stored in a binary search tree, kept
/// height-bounded by the discipline `D`.
///
/// Duplicate keys are permitted. A key equal to existing ones is ordered
/// after them.
pub struct Tree<K, D: Discipline> {
    root: Link<K, D::Meta>,
    len: usize,
    _phantom: PhantomData<(Box<Node<K, D::Meta>>, D)>,
}

/// A [`Tree`] balanced by the height-based [`Avl`] discipline.
pub type AvlTree<K> = Tree<K, Avl>;

/// A [`Tree`] balanced by the color-based [`RedBlack`] discipline.
pub type RbTree<K> = Tree<K, RedBlack>;

// Safety: `Tree` exclusively owns its nodes, like `Box` does
unsafe impl<K: Send, D: Discipline> Send for Tree<K, D> where D::Meta: Send {}
unsafe impl<K: Sync, D: Discipline> Sync for Tree<K, D> where D::Meta: Sync {}

/// Indicates that [`Tree::remove`] found nothing to remove. The tree is left
/// unchanged.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum RemoveError {
    /// The tree has no keys at all.
    #[cfg_attr(feature = "std", error("the tree is empty"))]
    EmptyTree,
    /// No key in the tree is equal to the one given.
    #[cfg_attr(feature = "std", error("no such key in the tree"))]
    NotFound,
}

impl<K, D: Discipline> Tree<K, D> {
    /// Construct an empty tree. No memory is allocated until the first
    /// insertion.
    #[inline]
    pub const fn new() -> Self {
        Self {
            root: None,
            len: 0,
            _phantom: PhantomData,
        }
    }

    /// The number of keys in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The number of nodes on the longest path from the root to a leaf.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut pending = WorkList::new();
        pending.extend(self.root.map(|root| (root, 1)));
        while let Some((node, depth)) = pending.pop() {
            height = max(height, depth);
            // Safety: `self` owns the tree
            let children = unsafe { node.as_ref() }.children();
            pending.extend(children.into_iter().flatten().map(|child| (child, depth + 1)));
        }
        height
    }

    /// The minimum key.
    pub fn first(&self) -> Option<&K> {
        // Safety: `self` owns the tree
        self.root.map(|root| unsafe { &Node::min(root).as_ref().key })
    }

    /// The maximum key.
    pub fn last(&self) -> Option<&K> {
        // Safety: `self` owns the tree
        self.root.map(|root| unsafe { &Node::max(root).as_ref().key })
    }

    /// Iterate over the keys in ascending order. Each call starts a fresh
    /// traversal.
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, D> {
        Iter::new(self.root, self.len)
    }

    /// Remove and drop every key.
    pub fn clear(&mut self) {
        let Some(root) = self.root.take() else {
            return;
        };
        log::trace!("clear: tearing down {} nodes", self.len);
        self.len = 0;

        // The tree is detached first, so a panicking destructor leaks the
        // remaining nodes instead of leaving dangling links behind
        let mut pending = WorkList::new();
        pending.push(root);
        while let Some(node) = pending.pop() {
            // Safety: Every node is reachable exactly once, and its children
            // are taken out before it's freed
            unsafe {
                pending.extend(node.as_ref().children().into_iter().flatten());
                drop(Node::dealloc(node));
            }
        }
    }

    /// Render the tree's shape as ASCII art. Red-black nodes are tagged with
    /// `B` or `R`.
    pub fn debug_snapshot(&self) -> String
    where
        K: fmt::Debug,
    {
        // Safety: `self` owns the tree
        unsafe { render::render::<K, D>(self.root) }
    }
}

impl<K: Ord, D: Discipline> Tree<K, D> {
    /// Construct a tree containing a single key.
    pub fn with_key(key: K) -> Self {
        let mut this = Self::new();
        this.insert(key);
        this
    }

    /// Insert a key. This always succeeds. If there are keys equal to it, the
    /// new one is ordered after them.
    pub fn insert(&mut self, key: K) {
        // Find the position first. `K::cmp` may panic, but the tree hasn't
        // been touched yet.
        // Safety: `self` owns the tree
        let position = unsafe { placement::leaf_position(&self.root, &key) };

        let node = Node::alloc(key, D::FRESH);

        // Safety: `position` names an empty slot in `self.root`, and `node`
        // is a fresh, detached leaf
        unsafe {
            Node::attach(&mut self.root, position, node);
            D::insert_fixup(&mut self.root, node);
        }

        self.len += 1;
        log::trace!("insert: len = {}", self.len);
    }

    /// Return whether the tree contains a key equal to `key`.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        // Safety: `self` owns the tree
        let node = unsafe { placement::find(&self.root, key) };
        node.is_some()
    }

    /// Remove one key equal to `key` and return it.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<K, RemoveError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if self.root.is_none() {
            return Err(RemoveError::EmptyTree);
        }

        // Safety: `self` owns the tree
        let Some(node) = (unsafe { placement::find(&self.root, key) }) else {
            return Err(RemoveError::NotFound);
        };

        // Safety: `node` is in `self.root`. Once unlinked, it's no longer
        // reachable and can be freed.
        let key = unsafe {
            let splice = splice::unlink(&mut self.root, node);
            D::remove_fixup(&mut self.root, splice);
            Node::dealloc(node)
        };

        self.len -= 1;
        log::trace!("remove: len = {}", self.len);
        Ok(key)
    }
}

impl<K, D: Discipline> Drop for Tree<K, D> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K, D: Discipline> Default for Tree<K, D> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, D: Discipline> fmt::Debug for Tree<K, D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: Ord, D: Discipline> Extend<K> for Tree<K, D> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord, D: Discipline> FromIterator<K> for Tree<K, D> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut this = Self::new();
        this.extend(iter);
        this
    }
}

impl<'a, K, D: Discipline> IntoIterator for &'a Tree<K, D> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K, D>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An in-order iterator over the keys of a [`Tree`], created by
/// [`Tree::iter`].
pub struct Iter<'a, K, D: Discipline> {
    /// The nodes whose left subtrees have been queued, nearest first
    pending: WorkList<NonNull<Node<K, D::Meta>>>,
    remaining: usize,
    _phantom: PhantomData<&'a Node<K, D::Meta>>,
}

impl<'a, K, D: Discipline> Iter<'a, K, D> {
    fn new(root: Link<K, D::Meta>, len: usize) -> Self {
        let mut this = Self {
            pending: WorkList::new(),
            remaining: len,
            _phantom: PhantomData,
        };
        this.descend(root);
        this
    }

    /// Queue `link` and its chain of left descendants.
    fn descend(&mut self, mut link: Link<K, D::Meta>) {
        while let Some(node) = link {
            self.pending.push(node);
            // Safety: The tree is borrowed for `'a`
            link = unsafe { node.as_ref() }.child(false);
        }
    }
}

impl<'a, K, D: Discipline> Iterator for Iter<'a, K, D> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let node = self.pending.pop()?;
        // Safety: The tree is borrowed for `'a`, so the node outlives it
        let node: &'a Node<K, D::Meta> = unsafe { node.as_ref() };
        self.descend(node.child(true));
        self.remaining -= 1;
        Some(&node.key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, D: Discipline> ExactSizeIterator for Iter<'_, K, D> {}

impl<K, D: Discipline> FusedIterator for Iter<'_, K, D> {}

impl<K, D: Discipline> Clone for Iter<'_, K, D> {
    fn clone(&self) -> Self {
        Self {
            pending: self.pending.clone(),
            remaining: self.remaining,
            _phantom: PhantomData,
        }
    }
}
