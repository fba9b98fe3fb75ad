//! Raw-level drivers shared by the discipline tests.
use core::ptr::NonNull;
use std::{collections::BTreeMap, prelude::v1::*};

use super::{
    node::{Link, Node},
    placement, splice, Discipline,
};

/// Insert `key` the way `hl::Tree` does, returning the new node.
pub(crate) unsafe fn insert<D: Discipline, K: Ord>(
    root: &mut Link<K, D::Meta>,
    key: K,
) -> NonNull<Node<K, D::Meta>> {
    let position = placement::leaf_position(root, &key);
    let node = Node::alloc(key, D::FRESH);
    Node::attach(root, position, node);
    D::insert_fixup(root, node);
    node
}

/// Remove one copy of `key` the way `hl::Tree` does.
pub(crate) unsafe fn remove<D: Discipline, K: Ord>(
    root: &mut Link<K, D::Meta>,
    key: &K,
) -> Option<K> {
    let node = placement::find(root, key)?;
    let splice = splice::unlink(root, node);
    D::remove_fixup(root, splice);
    Some(Node::dealloc(node))
}

/// The in-order key sequence.
pub(crate) unsafe fn keys<K: Clone, M>(root: &Link<K, M>) -> Vec<K> {
    let mut out = Vec::new();
    let mut pending = Vec::new();
    let mut cursor = *root;
    loop {
        while let Some(node) = cursor {
            pending.push(node);
            cursor = node.as_ref().child(false);
        }
        let Some(node) = pending.pop() else { break };
        out.push(node.as_ref().key.clone());
        cursor = node.as_ref().child(true);
    }
    out
}

/// Free every node.
pub(crate) unsafe fn free<K, M>(root: &mut Link<K, M>) {
    let mut pending: Vec<_> = root.take().into_iter().collect();
    while let Some(node) = pending.pop() {
        pending.extend(node.as_ref().children().into_iter().flatten());
        Node::dealloc(node);
    }
}

/// Interpret `cmds` as pairs of (operation, key), applying each to a raw tree
/// and to a reference multiset, and validate the tree after every step.
pub(crate) fn run_commands<D: Discipline>(cmds: Vec<u8>) {
    log::info!("cmds = {:?}", cmds);

    let mut root: Link<u8, D::Meta> = None;
    let mut expected = BTreeMap::<u8, usize>::new();

    for pair in cmds.chunks_exact(2) {
        let (op, key) = (pair[0], pair[1]);
        unsafe {
            if op % 3 == 0 {
                log::debug!("Remove {:?}", key);
                let removed = remove::<D, _>(&mut root, &key);
                match expected.get(&key).copied() {
                    None => assert_eq!(removed, None),
                    Some(count) => {
                        assert_eq!(removed, Some(key));
                        if count == 1 {
                            expected.remove(&key);
                        } else {
                            expected.insert(key, count - 1);
                        }
                    }
                }
            } else {
                log::debug!("Insert {:?}", key);
                insert::<D, _>(&mut root, key);
                *expected.entry(key).or_insert(0) += 1;
            }

            D::validate(&root);

            let expected: Vec<u8> = expected
                .iter()
                .flat_map(|(&key, &count)| std::iter::repeat(key).take(count))
                .collect();
            assert_eq!(keys(&root), expected);
        }
    }

    unsafe { free(&mut root) };
}
