//! Height-balanced discipline ([AVL][1]).
//!
//! Every node caches the height contribution of each of its sides. After a
//! mutation the fixup walks from the edit point to the root, refreshing the
//! contribution of the side it came from and rotating wherever the two sides
//! differ by more than one.
//!
//! [1]: https://en.wikipedia.org/wiki/AVL_tree
use core::{cmp::max, ptr::NonNull};

use super::{
    node::{IsRightChild, Link, Node},
    splice::Splice,
    unreachable_unchecked, Discipline,
};

#[cfg(test)]
mod tests;

/// The AVL discipline.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Avl;

/// The cached height contributions of a node's two sides. A side contributes
/// 0 if the child is absent, else the height of the child's subtree.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Heights {
    pub left: u32,
    pub right: u32,
}

impl Heights {
    pub const LEAF: Self = Self { left: 0, right: 0 };

    #[inline]
    fn side_mut(&mut self, side: IsRightChild) -> &mut u32 {
        if side {
            &mut self.right
        } else {
            &mut self.left
        }
    }

    /// `left - right`.
    #[inline]
    pub fn balance_factor(&self) -> i64 {
        i64::from(self.left) - i64::from(self.right)
    }

    /// The height of the subtree rooted at the node, counting the node.
    #[inline]
    pub fn subtree(&self) -> u32 {
        1 + max(self.left, self.right)
    }
}

type AvlNode<K> = Node<K, Heights>;
type AvlLink<K> = Link<K, Heights>;

#[inline]
unsafe fn contribution<K>(link: AvlLink<K>) -> u32 {
    link.map_or(0, |node| node.as_ref().meta.subtree())
}

impl Avl {
    /// Recompute both of `node`'s cached heights from its children.
    #[inline]
    unsafe fn refresh<K>(mut node: NonNull<AvlNode<K>>) {
        let [left, right] = node.as_ref().children;
        node.as_mut().meta = Heights {
            left: contribution(left),
            right: contribution(right),
        };
    }

    /// [`Node::rotate`], then repair the heights of the two participants,
    /// bottom-up. The children of both must have current heights.
    unsafe fn rotate<K>(
        root: &mut AvlLink<K>,
        node: NonNull<AvlNode<K>>,
        dir: IsRightChild,
    ) -> NonNull<AvlNode<K>> {
        let pivot = Node::rotate(root, node, dir);
        Self::refresh(node);
        Self::refresh(pivot);
        pivot
    }

    /// If `node`'s sides differ in height by more than one, rotate it back
    /// into balance. Returns the node now at the top of `node`'s former
    /// subtree.
    unsafe fn rebalance<K>(root: &mut AvlLink<K>, node: NonNull<AvlNode<K>>) -> NonNull<AvlNode<K>> {
        let bf = node.as_ref().meta.balance_factor();
        if bf.abs() <= 1 {
            return node;
        }

        let heavy: IsRightChild = bf < 0;
        let Some(pivot) = node.as_ref().child(heavy) else {
            unreachable_unchecked()
        };

        // A pivot leaning toward the middle (left-right or right-left) has to
        // be straightened first. A pivot in perfect balance (only possible
        // after a removal) must not be.
        let pivot_bf = pivot.as_ref().meta.balance_factor();
        let leans_inward = if heavy { pivot_bf > 0 } else { pivot_bf < 0 };
        if leans_inward {
            Self::rotate(root, pivot, heavy);
        }

        Self::rotate(root, node, !heavy)
    }

    /// Walk from `node`, whose cached heights are current, to the root.
    /// At each step, rebalance the node, then refresh its parent's
    /// contribution from the side the walk came from.
    unsafe fn retrace<K>(root: &mut AvlLink<K>, mut node: NonNull<AvlNode<K>>) {
        loop {
            node = Self::rebalance(root, node);

            let Some(mut parent) = node.as_ref().parent else {
                break;
            };
            let side = Node::side_in_parent(node, parent);
            *parent.as_mut().meta.side_mut(side) = node.as_ref().meta.subtree();
            node = parent;
        }
    }
}

unsafe impl Discipline for Avl {
    type Meta = Heights;

    const FRESH: Heights = Heights::LEAF;

    unsafe fn insert_fixup<K>(root: &mut AvlLink<K>, node: NonNull<AvlNode<K>>) {
        debug_assert_eq!(node.as_ref().meta, Heights::LEAF);
        // At most one rotation happens, but the heights above it still have
        // to be refreshed
        Self::retrace(root, node);
    }

    unsafe fn remove_fixup<K>(root: &mut AvlLink<K>, splice: Splice<K, Heights>) {
        // If the removed node was the root, its child (if any) took its place
        // with an intact subtree
        let Some((mut parent, side)) = splice.position else {
            return;
        };
        *parent.as_mut().meta.side_mut(side) = contribution(splice.child);

        // The shrinkage may cascade, so this may rotate at every level
        Self::retrace(root, parent);
    }

    fn tag(_: &Heights) -> &'static str {
        ""
    }

    #[cfg(test)]
    unsafe fn validate<K: Ord + core::fmt::Debug>(root: &AvlLink<K>) {
        tests::validate(root)
    }
}
