//! Color-balanced discipline ([red-black][1]).
//!
//! Invariants, in addition to the BST order:
//!
//!  - The root is black. An absent child counts as black.
//!  - A red node never has a red child (the color invariant).
//!  - Every path from a node down to an absent child passes through the same
//!    number of black nodes (the black height invariant).
//!
//! [1]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
use core::{mem::swap, ptr::NonNull};

use super::{
    node::{Link, Node},
    splice::Splice,
    unreachable_unchecked, Discipline,
};


/// The red-black discipline.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct RedBlack;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Color {
    Black,
    Red,
}

type RbNode<K> = Node<K, Color>;
type RbLink<K> = Link<K, Color>;

#[inline]
unsafe fn color<K>(node: NonNull<RbNode<K>>) -> Color {
    node.as_ref().meta
}

#[inline]
unsafe fn paint<K>(mut node: NonNull<RbNode<K>>, color: Color) {
    node.as_mut().meta = color;
}

/// Absent children are black.
#[inline]
unsafe fn is_red<K>(link: RbLink<K>) -> bool {
    matches!(link, Some(node) if color(node) == Color::Red)
}

unsafe impl Discipline for RedBlack {
    type Meta = Color;

    const FRESH: Color = Color::Red;

    unsafe fn insert_fixup<K>(root: &mut RbLink<K>, mut node: NonNull<RbNode<K>>) {
        paint(node, Color::Red);

        loop {
            debug_assert_eq!(color(node), Color::Red);

            // `node` is the root. It's repainted below.
            let Some(mut parent) = node.as_ref().parent else {
                break;
            };

            // Color invariant fulfilled?
            if color(parent) == Color::Black {
                break;
            }

            let Some(grandparent) = parent.as_ref().parent else {
                // `parent` is the root. Repainting it increases the black
                // height of the whole tree by one.
                paint(parent, Color::Black);
                break;
            };

            // `parent` is red, so `grandparent` must be black
            debug_assert_eq!(color(grandparent), Color::Black);

            let node_side = Node::side_in_parent(node, parent);
            let parent_side = Node::side_in_parent(parent, grandparent);

            let uncle = grandparent.as_ref().child(!parent_side);
            if let Some(uncle) = uncle.filter(|&uncle| color(uncle) == Color::Red) {
                // Push `grandparent`'s blackness down to both of its children.
                // This keeps its subtree's black height but may violate the
                // color invariant one level up.
                paint(parent, Color::Black);
                paint(uncle, Color::Black);
                paint(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            // `uncle` is black. If `node` is an inner grandchild, make it an
            // outer one first. The rotation flips the relationship between
            // `node` and `parent`.
            if node_side != parent_side {
                Node::rotate(root, parent, parent_side);
                swap(&mut parent, &mut node);
            }

            // Push `grandparent` down to `uncle`'s side, making `parent` the
            // parent of `node` and `grandparent`, and repaint so that neither
            // path changes its black height
            Node::rotate(root, grandparent, !parent_side);
            paint(parent, Color::Black);
            paint(grandparent, Color::Red);
            break;
        }

        if let Some(root) = *root {
            paint(root, Color::Black);
        }
    }

    unsafe fn remove_fixup<K>(root: &mut RbLink<K>, splice: Splice<K, Color>) {
        if splice.meta == Color::Red {
            // A red node with one child would violate the black height
            // invariant, so it was a leaf and removing it changed nothing
            debug_assert_eq!(splice.child, None);
            return;
        }

        if let Some(child) = splice.child.filter(|&child| color(child) == Color::Red) {
            // The black node's red child takes over its blackness
            paint(child, Color::Black);
            return;
        }

        // The paths through the splice point now have one black node too few.
        // Move this deficiency up the tree until it can be absorbed.
        let Some((mut parent, mut side)) = splice.position else {
            // Every path lost one black node. Nothing to fix.
            return;
        };

        loop {
            //        parent
            //        /    \
            //     (hole) sibling
            //             /   \
            //          close   far
            //
            // The hole (which may be a black node) is `parent`'s `side` child.
            // `sibling` must exist because of the black height invariant.
            let Some(mut sibling) = parent.as_ref().child(!side) else {
                unreachable_unchecked()
            };

            if color(sibling) == Color::Red {
                // `parent` and the nephews must be black. Rotate `sibling`
                // above `parent` and swap their colors, so that the hole gets
                // a black sibling (the former close nephew)
                Node::rotate(root, parent, side);
                paint(sibling, Color::Black);
                paint(parent, Color::Red);
                continue;
            }

            let close = sibling.as_ref().child(side);
            let far = sibling.as_ref().child(!side);

            if !is_red(close) && !is_red(far) {
                // Take one black node out of `sibling`'s side too
                paint(sibling, Color::Red);

                if color(parent) == Color::Red {
                    // ... and put it back on both sides at once
                    paint(parent, Color::Black);
                    return;
                }

                // `parent`'s whole subtree is now one black node short
                let Some(grandparent) = parent.as_ref().parent else {
                    return;
                };
                side = Node::side_in_parent(parent, grandparent);
                parent = grandparent;
                continue;
            }

            if !is_red(far) {
                // Only the close nephew is red. Rotate it above `sibling` so
                // that the new sibling has a red far child.
                let Some(close) = close else {
                    unreachable_unchecked()
                };
                Node::rotate(root, sibling, !side);
                paint(sibling, Color::Red);
                paint(close, Color::Black);
                sibling = close;
            }

            // The far nephew is red. Rotate `sibling` into `parent`'s place
            // with `parent`'s color. `parent` (now black) moves down onto the
            // hole's path and the far nephew (now black) keeps the other
            // path's count.
            let Some(far) = sibling.as_ref().child(!side) else {
                unreachable_unchecked()
            };
            Node::rotate(root, parent, side);
            paint(sibling, color(parent));
            paint(parent, Color::Black);
            paint(far, Color::Black);
            return;
        }
    }

    fn tag(meta: &Color) -> &'static str {
        match meta {
            Color::Black => "B",
            Color::Red => "R",
        }
    }

    #[cfg(test)]
    unsafe fn validate<K: Ord + core::fmt::Debug>(root: &RbLink<K>) {
        tests::validate(root)
    }
}
