use std::collections::BTreeSet;

use ordered_bst::linked::Tree;
use quickcheck::{Arbitrary, Gen};

/// An enum for the various kinds of "things" to do to
/// binary search trees in a quicktest.
#[derive(Copy, Clone, Debug)]
enum Op<K> {
    /// Insert the key into the data structure
    Insert(K),
    /// Remove the key from the data structure
    Remove(K),
    /// Run the structural invariant check
    Check,
}

impl<K> Arbitrary for Op<K>
where
    K: Arbitrary,
{
    /// Tells quickcheck how to randomly choose an operation
    fn arbitrary(g: &mut Gen) -> Self {
        match g.choose(&[0, 1, 2]).unwrap() {
            0 => Op::Insert(K::arbitrary(g)),
            1 => Op::Remove(K::arbitrary(g)),
            2 => Op::Check,
            _ => unreachable!(),
        }
    }
}

/// Applies a set of operations to a tree and an ordered set.
/// This way we can ensure that after a random smattering of inserts
/// and removes we have the same set of keys in both.
fn do_ops<K>(ops: &[Op<K>], bst: &mut Tree<K>, set: &mut BTreeSet<K>)
where
    K: Ord + Clone + std::fmt::Debug,
{
    for op in ops {
        match op {
            Op::Insert(k) => {
                let newly_added = set.insert(k.clone());
                assert_eq!(bst.insert(k.clone()).is_ok(), newly_added);
            }
            Op::Remove(k) => {
                assert_eq!(bst.remove(k), set.take(k));
            }
            Op::Check => bst.check_invariant().unwrap(),
        }
    }
}

quickcheck::quickcheck! {
    fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
        let mut tree = Tree::new();
        let mut set = BTreeSet::new();

        do_ops(&ops, &mut tree, &mut set);
        tree.check_invariant().is_ok()
            && tree.len() == set.len()
            && tree.in_order_keys().into_iter().eq(set.iter())
    }
}

quickcheck::quickcheck! {
    fn contains(xs: Vec<i8>) -> bool {
        let mut tree = Tree::new();
        for x in &xs {
            let _ = tree.insert(*x);
        }

        xs.iter().all(|x| tree.contains(x))
    }
}

quickcheck::quickcheck! {
    fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
        let mut tree = Tree::new();
        for x in &xs {
            let _ = tree.insert(*x);
        }
        let added: BTreeSet<_> = xs.into_iter().collect();
        let nots: BTreeSet<_> = nots.into_iter().collect();
        let mut nots = nots.difference(&added);

        nots.all(|x| !tree.contains(x))
    }
}

quickcheck::quickcheck! {
    fn in_order_round_trips_sorted_order(xs: Vec<i8>) -> bool {
        let mut tree = Tree::new();
        for x in &xs {
            let _ = tree.insert(*x);
        }
        let sorted: BTreeSet<i8> = xs.into_iter().collect();

        tree.in_order_keys().into_iter().eq(sorted.iter())
    }
}

quickcheck::quickcheck! {
    fn successor_predecessor_duality(xs: Vec<i8>) -> bool {
        let mut tree = Tree::new();
        for x in &xs {
            let _ = tree.insert(*x);
        }
        let sorted: Vec<i8> = xs.into_iter().collect::<BTreeSet<_>>().into_iter().collect();

        let boundaries_hold = match (sorted.first(), sorted.last()) {
            (Some(first), Some(last)) => {
                tree.predecessor(first).is_none() && tree.successor(last).is_none()
            }
            _ => tree.is_empty(),
        };

        boundaries_hold
            && sorted.windows(2).all(|pair| {
                tree.successor(&pair[0]) == Some(&pair[1])
                    && tree.predecessor(&pair[1]) == Some(&pair[0])
            })
    }
}

quickcheck::quickcheck! {
    fn removal_removes_exactly_one_key(xs: Vec<i8>, removes: Vec<i8>) -> bool {
        let mut tree = Tree::new();
        for x in &xs {
            let _ = tree.insert(*x);
        }
        let mut still_present: BTreeSet<i8> = xs.into_iter().collect();

        for remove in &removes {
            let expected = still_present.take(remove);
            let len_before = tree.len();
            if tree.remove(remove) != expected {
                return false;
            }
            let expected_len = len_before - usize::from(expected.is_some());
            if tree.len() != expected_len || tree.contains(remove) {
                return false;
            }
            tree.check_invariant().unwrap();
        }

        still_present.iter().all(|x| tree.contains(x))
    }
}

quickcheck::quickcheck! {
    fn clone_preserves_shape_and_contents(xs: Vec<i8>) -> bool {
        let mut tree = Tree::new();
        for x in &xs {
            let _ = tree.insert(*x);
        }
        let clone = tree.clone();

        clone.check_invariant().is_ok()
            && clone.len() == tree.len()
            && clone.pre_order_keys() == tree.pre_order_keys()
    }
}
