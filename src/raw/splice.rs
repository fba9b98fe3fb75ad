//! Removal by splicing.
//!
//! Deleting a node with two children is reduced to deleting a node with at
//! most one child by exchanging it with its in-order predecessor (the maximum
//! of its left subtree). The exchange relinks the two nodes instead of
//! copying keys, so no node changes identity. The victim is then cut out by
//! replacing it with its sole child (or with nothing).
use core::{mem::swap, ptr::NonNull};

use super::{
    node::{IsRightChild, Link, Node},
    unreachable_unchecked,
};

/// The hole left behind by [`unlink`]. The balancers start their removal
/// fixup here.
pub struct Splice<K, M> {
    /// The parent of the removed node, and the side it hung from. `None` if
    /// the removed node was the root.
    pub position: Option<(NonNull<Node<K, M>>, IsRightChild)>,
    /// What now occupies the removed node's slot.
    pub child: Link<K, M>,
    /// The removed node's metadata at the time it was cut out (i.e., after
    /// any exchange with its predecessor).
    pub meta: M,
}

/// Detach `node` from the tree without freeing it. The returned [`Splice`]
/// must be passed to the tree's discipline to restore its invariant.
///
/// # Safety
///
///  - `root` must be a valid tree containing `node`.
pub unsafe fn unlink<K, M: Copy>(root: &mut Link<K, M>, mut node: NonNull<Node<K, M>>) -> Splice<K, M> {
    if let [Some(_), Some(_)] = node.as_ref().children {
        swap_with_predecessor(root, node);
    }

    let [left, right] = node.as_ref().children;
    debug_assert!(left.is_none() || right.is_none());
    let child = left.or(right);

    let parent = node.as_ref().parent;
    let position = parent.map(|parent| (parent, Node::side_in_parent(node, parent)));

    *Node::slot(root, node) = child;
    if let Some(mut child) = child {
        child.as_mut().parent = parent;
    }

    node.as_mut().children = [None, None];
    node.as_mut().parent = None;

    Splice {
        position,
        child,
        meta: node.as_ref().meta,
    }
}

/// Exchange the positions (links and metadata) of `node`, which must have two
/// children, and its in-order predecessor. Afterwards `node` has no right
/// child. The in-order sequence is out of order until `node` is unlinked.
unsafe fn swap_with_predecessor<K, M>(root: &mut Link<K, M>, mut node: NonNull<Node<K, M>>) {
    let Some(left) = node.as_ref().children[0] else {
        unreachable_unchecked()
    };
    let mut pred = Node::max(left);
    debug_assert_ne!(pred, node);

    // Re-point whoever owns `node` before any other link changes
    *Node::slot(root, node) = Some(pred);
    swap(&mut node.as_mut().meta, &mut pred.as_mut().meta);

    if pred == left {
        //        node            pred
        //        /  \            /  \
        //     pred   r   ==>  node   r
        //     /               /
        //    x               x
        pred.as_mut().parent = node.as_ref().parent;
        pred.as_mut().children[1] = node.as_ref().children[1];
        node.as_mut().children = [pred.as_ref().children[0], None];
        pred.as_mut().children[0] = Some(node);
        node.as_mut().parent = Some(pred);
    } else {
        //        node            pred
        //        /  \            /  \
        //       l    r   ==>    l    r
        //        \               \
        //        pred            node
        //        /               /
        //       x               x
        let Some(mut pred_parent) = pred.as_ref().parent else {
            unreachable_unchecked()
        };
        debug_assert_eq!(pred.as_ref().children[1], None);
        swap(&mut node.as_mut().children, &mut pred.as_mut().children);
        swap(&mut node.as_mut().parent, &mut pred.as_mut().parent);
        pred_parent.as_mut().children[1] = Some(node);
    }

    Node::adopt(pred);
    Node::adopt(node);
}
