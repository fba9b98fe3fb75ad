//! BST placement: iterative descent from the root.
//!
//! Equal keys are routed right on insertion. Rotations preserve the in-order
//! sequence but may bring a duplicate to the left of its twin, so the order
//! invariant these functions rely on is "the in-order sequence is
//! non-decreasing". That is enough for [`find`]: every node holding a given
//! key lies inside the in-order interval each step narrows toward.
use core::{borrow::Borrow, cmp::Ordering, ptr::NonNull};

use super::node::{IsRightChild, Link, Node};

/// Find the empty child slot where `key` belongs, as the would-be parent and
/// the side. Returns `None` if the tree is empty.
///
/// A key equal to existing ones is placed after all of them in the in-order
/// sequence.
///
/// # Safety
///
///  - `root` must be a valid tree.
pub unsafe fn leaf_position<K: Ord, M>(
    root: &Link<K, M>,
    key: &K,
) -> Option<(NonNull<Node<K, M>>, IsRightChild)> {
    let mut node = (*root)?;
    loop {
        let side: IsRightChild = key.cmp(&node.as_ref().key) != Ordering::Less;
        match node.as_ref().child(side) {
            Some(child) => node = child,
            None => return Some((node, side)),
        }
    }
}

/// Find a node whose key is equal to `key`. If there are several, the one
/// closest to the root is returned.
///
/// # Safety
///
///  - `root` must be a valid tree.
pub unsafe fn find<K, M, Q>(root: &Link<K, M>, key: &Q) -> Link<K, M>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let mut cursor = *root;
    while let Some(node) = cursor {
        cursor = match key.cmp(node.as_ref().key.borrow()) {
            Ordering::Equal => return Some(node),
            Ordering::Less => node.as_ref().child(false),
            Ordering::Greater => node.as_ref().child(true),
        };
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::prelude::v1::*;

    /// Build an unbalanced tree by plain descent, with no fixup.
    unsafe fn plant(keys: &[u32]) -> (Link<u32, ()>, Vec<NonNull<Node<u32, ()>>>) {
        let mut root = None;
        let mut nodes = Vec::new();
        for &key in keys {
            let position = leaf_position(&root, &key);
            let node = Node::alloc(key, ());
            Node::attach(&mut root, position, node);
            nodes.push(node);
        }
        (root, nodes)
    }

    unsafe fn free(nodes: Vec<NonNull<Node<u32, ()>>>) {
        for node in nodes {
            Node::dealloc(node);
        }
    }

    #[test]
    fn empty_tree_has_no_position() {
        let root: Link<u32, ()> = None;
        unsafe {
            assert_eq!(leaf_position(&root, &1), None);
            assert_eq!(find(&root, &1), None);
        }
    }

    #[test]
    fn duplicates_route_right() {
        unsafe {
            let (root, nodes) = plant(&[5, 5, 5]);
            assert_eq!(root, Some(nodes[0]));
            assert_eq!(nodes[0].as_ref().child(true), Some(nodes[1]));
            assert_eq!(nodes[1].as_ref().child(true), Some(nodes[2]));
            assert_eq!(nodes[0].as_ref().child(false), None);

            // The topmost copy is found first
            assert_eq!(find(&root, &5), Some(nodes[0]));
            Node::validate_links(&root);
            free(nodes);
        }
    }

    #[test]
    fn descent() {
        unsafe {
            let (root, nodes) = plant(&[7, 3, 18, 10, 22]);
            assert_eq!(leaf_position(&root, &11), Some((nodes[3], true)));
            assert_eq!(leaf_position(&root, &9), Some((nodes[3], false)));
            assert_eq!(leaf_position(&root, &1), Some((nodes[1], false)));
            assert_eq!(find(&root, &10), Some(nodes[3]));
            assert_eq!(find(&root, &22), Some(nodes[4]));
            assert_eq!(find(&root, &11), None);
            assert_eq!(Node::validate_links(&root), 5);
            free(nodes);
        }
    }
}
