use super::*;
use crate::raw::testing::{self, free, insert, keys, remove};
use quickcheck_macros::quickcheck;
use std::{fmt, prelude::v1::*};

/// Check the links, the cached heights, and the balance of every node.
pub(super) unsafe fn validate<K: Ord + fmt::Debug>(root: &AvlLink<K>) {
    Node::validate_links(root);

    Node::fold(root, 0u32, |node, [left, right]| {
        let key = &node.as_ref().key;
        assert_eq!(
            node.as_ref().meta,
            Heights { left, right },
            "stale cached heights at {:?}",
            key
        );
        assert!(
            (i64::from(left) - i64::from(right)).abs() <= 1,
            "unbalanced at {:?}: {} vs {}",
            key,
            left,
            right
        );
        1 + max(left, right)
    });
}

unsafe fn key_of(link: AvlLink<u32>) -> Option<u32> {
    link.map(|node| node.as_ref().key)
}

unsafe fn build(keys: &[u32]) -> AvlLink<u32> {
    let mut root = None;
    for &key in keys {
        insert::<Avl, _>(&mut root, key);
        validate(&root);
    }
    root
}

#[test]
fn single_rotations() {
    unsafe {
        for order in [[1, 2, 3], [3, 2, 1]] {
            let mut root = build(&order);
            assert_eq!(key_of(root), Some(2));
            assert_eq!(root.unwrap().as_ref().meta, Heights { left: 1, right: 1 });
            free(&mut root);
        }
    }
}

#[test]
fn double_rotations() {
    unsafe {
        for order in [[3, 1, 2], [1, 3, 2]] {
            let mut root = build(&order);
            assert_eq!(key_of(root), Some(2));
            assert_eq!(keys(&root), [1, 2, 3]);
            free(&mut root);
        }
    }
}

#[test]
fn rotations_relink_nodes() {
    unsafe {
        let mut root = None;
        let n3 = insert::<Avl, _>(&mut root, 3);
        let n1 = insert::<Avl, _>(&mut root, 1);
        let n2 = insert::<Avl, _>(&mut root, 2);

        // Each node still holds the key it was created with
        assert_eq!(root, Some(n2));
        assert_eq!(n2.as_ref().children, [Some(n1), Some(n3)]);
        assert_eq!((n1.as_ref().key, n2.as_ref().key, n3.as_ref().key), (1, 2, 3));
        assert_eq!(n1.as_ref().parent, Some(n2));
        assert_eq!(n3.as_ref().parent, Some(n2));
        free(&mut root);
    }
}

#[test]
fn scenario() {
    unsafe {
        let mut root = build(&[7, 3, 18, 10, 22, 26, 8, 11]);
        assert_eq!(keys(&root), [3, 7, 8, 10, 11, 18, 22, 26]);
        // ⌈log2(9)⌉ + 1
        assert!(root.unwrap().as_ref().meta.subtree() <= 5);

        insert::<Avl, _>(&mut root, 15);
        validate(&root);

        assert_eq!(remove::<Avl, _>(&mut root, &18), Some(18));
        validate(&root);
        assert_eq!(remove::<Avl, _>(&mut root, &11), Some(11));
        validate(&root);
        assert_eq!(remove::<Avl, _>(&mut root, &11), None);
        assert_eq!(keys(&root), [3, 7, 8, 10, 15, 22, 26]);
        free(&mut root);
    }
}

#[test]
fn removal_cascades() {
    unsafe {
        //             5
        //          /     \
        //         3       8
        //        / \     / \
        //       2   4   7   10
        //      /       /   /  \
        //     1       6   9    11
        //                        \
        //                         12
        let mut root = build(&[5, 3, 8, 2, 4, 7, 10, 1, 6, 9, 11, 12]);
        assert_eq!(key_of(root), Some(5));

        // Removing 4 unbalances 3 and, after that is fixed, 5
        assert_eq!(remove::<Avl, _>(&mut root, &4), Some(4));
        validate(&root);
        assert_eq!(key_of(root), Some(8));
        assert_eq!(keys(&root), [1, 2, 3, 5, 6, 7, 8, 9, 10, 11, 12]);
        free(&mut root);
    }
}

#[test]
fn drain_ascending() {
    unsafe {
        let mut root = build(&(0..64).collect::<Vec<_>>());
        assert!(root.unwrap().as_ref().meta.subtree() <= 8);
        for key in (0..64).rev().step_by(2).chain((0..64).step_by(2)) {
            assert_eq!(remove::<Avl, _>(&mut root, &key), Some(key));
            validate(&root);
        }
        assert_eq!(root, None);
    }
}

#[quickcheck]
fn qc_avl(cmds: Vec<u8>) {
    testing::run_commands::<Avl>(cmds);
}
