//! Raw, pointer-level building blocks of the balanced trees.
//!
//!  - [`node`] is the node store: the node record and the link mutations
//!    (attach, rotate) shared by every discipline.
//!
//!  - [`placement`] locates keys and leaf positions by iterative descent.
//!
//!  - [`splice`] reduces any deletion to cutting out a node with at most one
//!    child.
//!
//!  - [`avl`] and [`rbtree`] are the two balancing disciplines, implementing
//!    [`Discipline`].
//!
//! Everything here operates on raw pointers and is `unsafe`. The safe owning
//! interface lives in [`crate::hl`].
#![allow(unsafe_op_in_unsafe_fn)]
use core::{fmt, ptr::NonNull};

pub mod avl;
pub mod node;
pub mod placement;
pub mod rbtree;
pub mod splice;

#[cfg(test)]
pub(crate) mod testing;

use self::{
    node::{Link, Node},
    splice::Splice,
};

cfg_if::cfg_if! {
    if #[cfg(debug_assertions)] {
        #[track_caller]
        pub(crate) unsafe fn unreachable_unchecked() -> ! {
            unreachable!();
        }
    } else {
        pub(crate) use core::hint::unreachable_unchecked;
    }
}

/// A balancing discipline: the policy that keeps a binary search tree
/// height-bounded after every mutation.
///
/// A tree uses exactly one discipline for its whole lifetime. The discipline
/// owns the per-node metadata ([`Self::Meta`]) and is invoked once per
/// mutation, after the structural edit, to walk from the edit point toward
/// the root.
///
/// # Safety
///
/// The safe tree in [`crate::hl`] frees nodes based on what is reachable from
/// the root, so an implementation must leave every node it was given
/// reachable exactly once, with `parent` links consistent with the child
/// links. It must only relink nodes (e.g., via [`Node::rotate`]), never
/// allocate, free, or move keys between them.
pub unsafe trait Discipline {
    /// The metadata stored in every node.
    type Meta: Copy + fmt::Debug;

    /// The metadata of a node that has not yet been linked into a tree.
    const FRESH: Self::Meta;

    /// Restore the invariant after `node` has been attached as a new leaf.
    ///
    /// # Safety
    ///
    ///  - `root` must be a valid tree, which may violate the discipline's
    ///    invariant only because of `node`'s attachment.
    ///  - `node` must be a leaf of it, carrying [`Self::FRESH`].
    unsafe fn insert_fixup<K>(root: &mut Link<K, Self::Meta>, node: NonNull<Node<K, Self::Meta>>);

    /// Restore the invariant after a node has been cut out by
    /// [`splice::unlink`], starting at the splice point.
    ///
    /// # Safety
    ///
    ///  - `root` must be the tree `splice` was produced from, with no
    ///    mutation since.
    unsafe fn remove_fixup<K>(root: &mut Link<K, Self::Meta>, splice: Splice<K, Self::Meta>);

    /// A short label prefix describing a node's metadata, for diagnostics.
    fn tag(meta: &Self::Meta) -> &'static str;

    /// Panic if the tree violates the discipline's invariant.
    #[cfg(test)]
    unsafe fn validate<K: Ord + fmt::Debug>(root: &Link<K, Self::Meta>);
}
