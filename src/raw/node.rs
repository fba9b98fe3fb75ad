//! The node store.
//!
//! A tree is a [`Link`] to its root. Every node reachable from it was created
//! by [`Node::alloc`] and is owned by the one slot (a parent's child cell or
//! the root link) that points to it. `parent` is a back-reference used to walk
//! upward and to tell which side of its parent a node hangs from. It is never
//! used to free anything.
use alloc::boxed::Box;
use core::ptr::NonNull;

use super::unreachable_unchecked;

/// A node.
pub struct Node<K, M> {
    pub(crate) children: [Link<K, M>; 2],
    pub(crate) parent: Link<K, M>,
    pub(crate) meta: M,
    pub key: K,
}

/// An optional pointer to a node. A tree is represented by the link to its
/// root.
pub type Link<K, M> = Option<NonNull<Node<K, M>>>;

/// Indexes [`Node`]'s children: `false` is the left child, `true` the right.
pub type IsRightChild = bool;

impl<K, M> Node<K, M> {
    pub const fn new(key: K, meta: M) -> Self {
        Self {
            children: [None, None],
            parent: None,
            meta,
            key,
        }
    }

    /// Move a new, detached node to the heap.
    pub fn alloc(key: K, meta: M) -> NonNull<Self> {
        NonNull::from(Box::leak(Box::new(Self::new(key, meta))))
    }

    /// Free a node and return its key.
    ///
    /// # Safety
    ///
    ///  - `this` must have been created by [`Self::alloc`] and must not be
    ///    reachable from any tree.
    pub unsafe fn dealloc(this: NonNull<Self>) -> K {
        Box::from_raw(this.as_ptr()).key
    }

    #[inline]
    pub fn child(&self, side: IsRightChild) -> Link<K, M> {
        self.children[side as usize]
    }

    #[inline]
    pub fn children(&self) -> [Link<K, M>; 2] {
        self.children
    }

    #[inline]
    pub fn parent(&self) -> Link<K, M> {
        self.parent
    }

    #[inline]
    pub fn meta(&self) -> &M {
        &self.meta
    }

    /// Which side of `parent` `this` hangs from.
    ///
    /// # Safety
    ///
    ///  - `parent` must be valid and have `this` as a child.
    #[inline]
    pub unsafe fn side_in_parent(this: NonNull<Self>, parent: NonNull<Self>) -> IsRightChild {
        let children = &parent.as_ref().children;
        debug_assert!(children.contains(&Some(this)));
        children[1] == Some(this)
    }

    /// The slot currently pointing to `this`: a child cell of its parent, or
    /// `root` if `this` has no parent.
    ///
    /// # Safety
    ///
    ///  - `root` must be a valid tree containing `this`.
    pub unsafe fn slot<'a>(root: &'a mut Link<K, M>, this: NonNull<Self>) -> &'a mut Link<K, M> {
        let cell = if let Some(mut parent) = this.as_ref().parent {
            let side = Self::side_in_parent(this, parent);
            &mut parent.as_mut().children[side as usize]
        } else {
            root
        };
        debug_assert_eq!(*cell, Some(this));
        cell
    }

    /// Point the `parent` of `this`'s children at `this`.
    ///
    /// # Safety
    ///
    ///  - `this` and its children must be valid.
    pub(crate) unsafe fn adopt(this: NonNull<Self>) {
        for mut child in this.as_ref().children.into_iter().flatten() {
            child.as_mut().parent = Some(this);
        }
    }

    /// Link the detached node `new_node` as child `side` of `parent`, or as
    /// the root of an empty tree if `position` is `None`.
    ///
    /// # Safety
    ///
    ///  - `root` must be a valid tree, and `position` must name an empty
    ///    child slot in it (or `None` if the tree is empty).
    ///  - `new_node` must be valid and not part of any tree.
    pub unsafe fn attach(
        root: &mut Link<K, M>,
        position: Option<(NonNull<Self>, IsRightChild)>,
        mut new_node: NonNull<Self>,
    ) {
        new_node.as_mut().children = [None, None];

        if let Some((mut parent, side)) = position {
            let cell = &mut parent.as_mut().children[side as usize];
            debug_assert_eq!(*cell, None);
            *cell = Some(new_node);
            new_node.as_mut().parent = Some(parent);
        } else {
            debug_assert_eq!(*root, None);
            *root = Some(new_node);
            new_node.as_mut().parent = None;
        }
    }

    /// Rotate `node`. `dir` specifies `node`'s position after rotation, under
    /// its former child `pivot`, which is returned.
    ///
    /// ```text
    ///          node            pivot
    ///          /  \            /  \         (dir = true)
    ///         /    \          /    \
    ///     pivot    y   ==>   x     node
    ///      /  \                    /  \
    ///     x  mid                 mid  y
    /// ```
    ///
    /// Only links change. The in-order sequence and every node's identity and
    /// metadata are preserved.
    ///
    /// # Safety
    ///
    ///  - `root` must be a valid tree containing `node`.
    ///  - `node` must have a child on side `!dir`.
    pub unsafe fn rotate(
        root: &mut Link<K, M>,
        mut node: NonNull<Self>,
        dir: IsRightChild,
    ) -> NonNull<Self> {
        let (near, far) = ((!dir) as usize, dir as usize);

        let Some(mut pivot) = node.as_ref().children[near] else {
            unreachable_unchecked()
        };
        let mid = pivot.as_ref().children[far];

        // Re-point whoever owns `node` while `node.parent` still names it
        *Self::slot(root, node) = Some(pivot);
        pivot.as_mut().parent = node.as_ref().parent;

        node.as_mut().children[near] = mid;
        if let Some(mut mid) = mid {
            mid.as_mut().parent = Some(node);
        }

        pivot.as_mut().children[far] = Some(node);
        node.as_mut().parent = Some(pivot);

        pivot
    }

    /// Find the minimum (leftmost) node in the subtree rooted by `this`.
    ///
    /// # Safety
    ///
    ///  - The subtree must be valid.
    #[inline]
    pub unsafe fn min(mut this: NonNull<Self>) -> NonNull<Self> {
        while let Some(child) = this.as_ref().children[0] {
            this = child;
        }
        this
    }

    /// Find the maximum (rightmost) node in the subtree rooted by `this`.
    ///
    /// # Safety
    ///
    ///  - The subtree must be valid.
    #[inline]
    pub unsafe fn max(mut this: NonNull<Self>) -> NonNull<Self> {
        while let Some(child) = this.as_ref().children[1] {
            this = child;
        }
        this
    }
}

#[cfg(test)]
impl<K: Ord + core::fmt::Debug, M> Node<K, M> {
    /// Check the root, the parent links, and the in-order key sequence of a
    /// tree. Returns the number of nodes.
    ///
    /// Every link is checked before it's followed, so a cycle is reported
    /// instead of looping forever (a node in a cycle would need two parents).
    pub(crate) unsafe fn validate_links(root: &Link<K, M>) -> usize {
        use std::prelude::v1::*;

        if let Some(root) = *root {
            assert_eq!(root.as_ref().parent, None, "the root has a parent");
        }

        let check_child = |node: NonNull<Self>, child: Link<K, M>| {
            if let Some(child) = child {
                assert_eq!(
                    child.as_ref().parent,
                    Some(node),
                    "stale parent link under {:?}",
                    node.as_ref().key
                );
            }
        };

        let mut count = 0;
        let mut pending = Vec::new();
        let mut last: Option<&K> = None;
        let mut cursor = *root;
        loop {
            while let Some(node) = cursor {
                pending.push(node);
                cursor = node.as_ref().children[0];
                check_child(node, cursor);
            }

            let Some(node) = pending.pop() else { break };
            count += 1;

            let key = &node.as_ref().key;
            if let Some(last) = last {
                assert!(last <= key, "keys out of order: {:?} > {:?}", last, key);
            }
            last = Some(key);

            cursor = node.as_ref().children[1];
            check_child(node, cursor);
        }

        count
    }
}

#[cfg(test)]
impl<K, M> Node<K, M> {
    /// Compute a value for every node bottom-up, without recursion. `f`
    /// receives a node and the values of its children (`nil` for an absent
    /// child). Returns the root's value, or `nil` for an empty tree.
    pub(crate) unsafe fn fold<T: Copy>(
        root: &Link<K, M>,
        nil: T,
        mut f: impl FnMut(NonNull<Self>, [T; 2]) -> T,
    ) -> T {
        use std::prelude::v1::*;

        // `(node, children_done)`
        let mut steps: Vec<(NonNull<Self>, bool)> = root.iter().map(|&root| (root, false)).collect();
        let mut values = Vec::new();

        while let Some((node, children_done)) = steps.pop() {
            let [left, right] = node.as_ref().children;
            if children_done {
                // The left child's value was pushed first
                let right = if right.is_some() { values.pop().unwrap() } else { nil };
                let left = if left.is_some() { values.pop().unwrap() } else { nil };
                values.push(f(node, [left, right]));
            } else {
                steps.push((node, true));
                steps.extend([right, left].into_iter().flatten().map(|child| (child, false)));
            }
        }

        values.pop().unwrap_or(nil)
    }
}
