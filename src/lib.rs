#![doc = include_str!("../README.md")]
#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

extern crate alloc;
#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod hl;
pub mod raw;
mod utils {
    pub mod render;
    pub mod worklist;
}

pub use hl::tree::{AvlTree, Iter, RbTree, RemoveError, Tree};
pub use raw::{avl::Avl, rbtree::RedBlack, Discipline};
