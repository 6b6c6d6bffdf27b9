use super::*;
use proptest::prelude::*;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::thread;

/// Walks the whole tree and checks stored heights, AVL balance and BST
/// order. Returns the computed height.
fn check_node(node: Option<&Node>, lo: Option<i64>, hi: Option<i64>) -> u32 {
    let Some(n) = node else { return 0 };
    if let Some(lo) = lo {
        assert!(n.key() > lo, "key {} not above lower bound {}", n.key(), lo);
    }
    if let Some(hi) = hi {
        assert!(n.key() < hi, "key {} not below upper bound {}", n.key(), hi);
    }
    let lh = check_node(n.left(), lo, Some(n.key()));
    let rh = check_node(n.right(), Some(n.key()), hi);
    assert!(
        (i64::from(lh) - i64::from(rh)).abs() <= 1,
        "node {} unbalanced: left {} right {}",
        n.key(),
        lh,
        rh
    );
    let h = 1 + lh.max(rh);
    assert_eq!(n.height(), h, "stale height at node {}", n.key());
    h
}

fn assert_invariants(m: &Memtable) {
    check_node(m.root(), None, None);
    assert_eq!(m.iter().count(), m.len());
}

// -------------------- Basic CRUD --------------------

#[test]
fn insert_and_search_single_key() {
    let mut m = Memtable::new();
    assert!(m.insert(1, b"v1".to_vec()).is_none());
    assert_eq!(m.len(), 1);
    let node = m.search(1).unwrap();
    assert_eq!(node.key(), 1);
    assert_eq!(node.value(), b"v1");
    assert_eq!(node.height(), 1);
}

#[test]
fn insert_overwrites_existing_key() {
    let mut m = Memtable::new();
    m.insert(1, b"v1".to_vec());
    let previous = m.insert(1, b"v2".to_vec());
    assert_eq!(previous, Some(b"v1".to_vec()));
    assert_eq!(m.get(1), Some(b"v2".as_slice()));
    assert_eq!(m.len(), 1);
}

#[test]
fn overwrite_keeps_shape() {
    let mut m = Memtable::new();
    for k in 1..=20 {
        m.insert(k, vec![0]);
    }
    let before = m.traverse(TraversalOrder::Preorder);
    m.insert(7, vec![1, 2, 3]);
    assert_eq!(m.traverse(TraversalOrder::Preorder), before);
}

#[test]
fn search_missing_key_returns_none() {
    let mut m = Memtable::new();
    assert!(m.search(5).is_none());
    m.insert(4, vec![]);
    m.insert(6, vec![]);
    assert!(m.search(5).is_none());
    assert!(!m.contains_key(5));
}

#[test]
fn empty_value_is_not_absent() {
    let mut m = Memtable::new();
    m.insert(3, Vec::new());
    assert_eq!(m.get(3), Some(b"".as_slice()));
}

#[test]
fn delete_removes_key() {
    let mut m = Memtable::new();
    m.insert(1, b"v".to_vec());
    assert_eq!(m.delete(1), Some(b"v".to_vec()));
    assert!(m.search(1).is_none());
    assert!(m.is_empty());
    assert_eq!(m.len(), 0);
}

#[test]
fn delete_missing_key_is_noop() {
    let mut m = Memtable::new();
    m.insert(1, b"v".to_vec());
    assert!(m.delete(2).is_none());
    assert_eq!(m.len(), 1);
    assert!(Memtable::new().delete(1).is_none());
}

// -------------------- Delete cases --------------------

#[test]
fn delete_leaf() {
    let mut m = Memtable::new();
    for k in [2, 1, 3] {
        m.insert(k, vec![k as u8]);
    }
    m.delete(3);
    assert_eq!(m.traverse(TraversalOrder::Inorder), vec![1, 2]);
    assert_invariants(&m);
}

#[test]
fn delete_node_with_one_child() {
    let mut m = Memtable::new();
    for k in [2, 1, 3, 4] {
        m.insert(k, vec![k as u8]);
    }
    // 3 has a single right child 4
    m.delete(3);
    assert_eq!(m.traverse(TraversalOrder::Inorder), vec![1, 2, 4]);
    assert_eq!(m.get(4), Some([4u8].as_slice()));
    assert_invariants(&m);
}

#[test]
fn delete_node_with_two_children_uses_successor() {
    let mut m = Memtable::new();
    for k in [4, 2, 6, 1, 3, 5, 7] {
        m.insert(k, vec![k as u8]);
    }
    assert_eq!(m.delete(4), Some(vec![4]));
    // successor 5 takes the root's place
    assert_eq!(m.root().map(Node::key), Some(5));
    assert_eq!(m.get(5), Some([5u8].as_slice()));
    assert_eq!(m.traverse(TraversalOrder::Inorder), vec![1, 2, 3, 5, 6, 7]);
    assert_invariants(&m);
}

#[test]
fn delete_triggers_rebalance() {
    let mut m = Memtable::new();
    for k in [2, 1, 3, 4] {
        m.insert(k, vec![]);
    }
    // removing 1 leaves 2 right-heavy by two
    m.delete(1);
    assert_eq!(m.root().map(Node::key), Some(3));
    assert_eq!(m.height(), 2);
    assert_invariants(&m);
}

// -------------------- Rotations on insert --------------------

#[test]
fn ascending_inserts_rotate_left() {
    let mut m = Memtable::new();
    for k in [1, 2, 3] {
        m.insert(k, vec![]);
    }
    assert_eq!(m.traverse(TraversalOrder::Preorder), vec![2, 1, 3]);
}

#[test]
fn descending_inserts_rotate_right() {
    let mut m = Memtable::new();
    for k in [3, 2, 1] {
        m.insert(k, vec![]);
    }
    assert_eq!(m.traverse(TraversalOrder::Preorder), vec![2, 1, 3]);
}

#[test]
fn left_right_case_double_rotation() {
    let mut m = Memtable::new();
    for k in [3, 1, 2] {
        m.insert(k, vec![]);
    }
    assert_eq!(m.traverse(TraversalOrder::Preorder), vec![2, 1, 3]);
}

#[test]
fn right_left_case_double_rotation() {
    let mut m = Memtable::new();
    for k in [1, 3, 2] {
        m.insert(k, vec![]);
    }
    assert_eq!(m.traverse(TraversalOrder::Preorder), vec![2, 1, 3]);
}

#[test]
fn sequential_inserts_stay_logarithmic() {
    let mut m = Memtable::new();
    for k in 0..1024 {
        m.insert(k, vec![]);
    }
    // 1024 keys need at least 11 levels
    assert!((11..=12).contains(&m.height()), "height {}", m.height());
    assert_invariants(&m);
}

// -------------------- Traversal --------------------

#[test]
fn traversal_orders() {
    let mut m = Memtable::new();
    for k in [4, 2, 6, 1, 3, 5, 7] {
        m.insert(k, vec![]);
    }
    assert_eq!(m.traverse(TraversalOrder::Inorder), vec![1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(m.traverse(TraversalOrder::Preorder), vec![4, 2, 1, 3, 6, 5, 7]);
    assert_eq!(m.traverse(TraversalOrder::Postorder), vec![1, 3, 2, 5, 7, 6, 4]);
    assert_eq!(m.to_string(), "1 2 3 4 5 6 7");
}

#[test]
fn iter_yields_sorted_pairs() {
    let mut m = Memtable::new();
    m.insert(30, b"c".to_vec());
    m.insert(10, b"a".to_vec());
    m.insert(20, b"b".to_vec());

    let pairs: Vec<(i64, &[u8])> = m.iter().collect();
    assert_eq!(
        pairs,
        vec![(10, b"a".as_slice()), (20, b"b".as_slice()), (30, b"c".as_slice())]
    );
}

#[test]
fn iter_is_restartable_and_exact_size() {
    let mut m = Memtable::new();
    for k in 0..10 {
        m.insert(k, vec![]);
    }
    let mut it = m.iter();
    assert_eq!(it.len(), 10);
    it.next();
    assert_eq!(it.len(), 9);

    let first: Vec<i64> = m.iter().map(|(k, _)| k).collect();
    let second: Vec<i64> = (&m).into_iter().map(|(k, _)| k).collect();
    assert_eq!(first, second);
}

#[test]
fn iter_empty_memtable() {
    let m = Memtable::new();
    assert_eq!(m.iter().count(), 0);
    assert_eq!(m.to_string(), "");
}

#[test]
fn negative_keys_sort_first() {
    let mut m = Memtable::new();
    for k in [0, -5, 5, i64::MIN, i64::MAX] {
        m.insert(k, vec![]);
    }
    assert_eq!(
        m.traverse(TraversalOrder::Inorder),
        vec![i64::MIN, -5, 0, 5, i64::MAX]
    );
}

#[test]
fn range_bounds() {
    let mut m = Memtable::new();
    for k in 0..10 {
        m.insert(k, vec![k as u8]);
    }
    fn keys<'a>(it: impl Iterator<Item = (i64, &'a [u8])>) -> Vec<i64> {
        it.map(|(k, _)| k).collect()
    }
    assert_eq!(keys(m.range(3..6)), vec![3, 4, 5]);
    assert_eq!(keys(m.range(3..=6)), vec![3, 4, 5, 6]);
    assert_eq!(keys(m.range(..2)), vec![0, 1]);
    assert_eq!(keys(m.range(8..)), vec![8, 9]);
    assert_eq!(m.range(20..30).count(), 0);
}

#[test]
fn range_seeks_between_keys_and_excluded_bounds() {
    let mut m = Memtable::new();
    for k in (0..100).step_by(10) {
        m.insert(k, vec![k as u8]);
    }
    fn keys<'a>(it: impl Iterator<Item = (i64, &'a [u8])>) -> Vec<i64> {
        it.map(|(k, _)| k).collect()
    }
    assert_eq!(keys(m.range(15..45)), vec![20, 30, 40]);
    assert_eq!(
        keys(m.range((Bound::Excluded(20), Bound::Included(50)))),
        vec![30, 40, 50]
    );
    assert_eq!(
        keys(m.range((Bound::Excluded(-5), Bound::Excluded(10)))),
        vec![0]
    );
    assert_eq!(keys(m.range(91..)), Vec::<i64>::new());
    assert_eq!(keys(m.range(..)), (0..100).step_by(10).collect::<Vec<_>>());

    let mut it = m.range(85..);
    assert_eq!(it.next().map(|(k, _)| k), Some(90));
    assert!(it.next().is_none());
    assert!(it.next().is_none());
}

#[test]
fn range_matches_btreemap_on_shuffled_keys() {
    let mut rng = rand::thread_rng();
    let mut keys: Vec<i64> = (-300..300).step_by(3).collect();
    keys.shuffle(&mut rng);

    let mut m = Memtable::new();
    let mut model = BTreeMap::new();
    for &k in &keys {
        m.insert(k, k.to_le_bytes().to_vec());
        model.insert(k, k.to_le_bytes().to_vec());
    }

    for (lo, hi) in [(-301, 301), (-7, 8), (0, 0), (1, 2), (250, 400), (-500, -299)] {
        let got: Vec<i64> = m.range(lo..hi).map(|(k, _)| k).collect();
        let want: Vec<i64> = model.range(lo..hi).map(|(k, _)| *k).collect();
        assert_eq!(got, want, "range {}..{}", lo, hi);

        let got: Vec<i64> = m.range(lo..=hi).map(|(k, _)| k).collect();
        let want: Vec<i64> = model.range(lo..=hi).map(|(k, _)| *k).collect();
        assert_eq!(got, want, "range {}..={}", lo, hi);
    }
}

// -------------------- Size tracking --------------------

#[test]
fn approx_size_tracks_inserts_and_deletes() {
    let mut m = Memtable::new();
    assert_eq!(m.approx_size(), 0);
    m.insert(1, b"aaa".to_vec()); // 8 + 3
    assert_eq!(m.approx_size(), 11);
    m.insert(1, b"b".to_vec()); // 8 + 1
    assert_eq!(m.approx_size(), 9);
    m.insert(2, b"cc".to_vec()); // + 8 + 2
    assert_eq!(m.approx_size(), 19);
    m.delete(1);
    assert_eq!(m.approx_size(), 10);
}

#[test]
fn clear_resets_everything() {
    let mut m = Memtable::new();
    m.insert(1, b"1".to_vec());
    m.insert(2, b"2".to_vec());
    m.clear();
    assert!(m.is_empty());
    assert_eq!(m.len(), 0);
    assert_eq!(m.approx_size(), 0);
    assert_eq!(m.height(), 0);
    assert!(m.get(1).is_none());
}

#[test]
fn debug_impl_works() {
    let m = Memtable::new();
    let debug = format!("{:?}", m);
    assert!(debug.contains("Memtable"));
    assert!(debug.contains("height"));
}

// -------------------- Many / stress tests --------------------

#[test]
fn shuffled_insert_delete_matches_btreemap() {
    let mut rng = rand::thread_rng();
    let mut keys: Vec<i64> = (0..2_000).collect();
    keys.shuffle(&mut rng);

    let mut m = Memtable::new();
    let mut model = BTreeMap::new();
    for &k in &keys {
        m.insert(k, k.to_le_bytes().to_vec());
        model.insert(k, k.to_le_bytes().to_vec());
    }
    keys.shuffle(&mut rng);
    for &k in keys.iter().take(1_000) {
        assert_eq!(m.delete(k), model.remove(&k));
    }

    assert_invariants(&m);
    let got: Vec<(i64, Vec<u8>)> = m.iter().map(|(k, v)| (k, v.to_vec())).collect();
    let want: Vec<(i64, Vec<u8>)> = model.into_iter().collect();
    assert_eq!(got, want);
}

#[test]
fn overwrite_same_key_many_times() {
    let mut m = Memtable::new();
    for i in 0..10_000u32 {
        m.insert(7, i.to_le_bytes().to_vec());
    }
    assert_eq!(m.len(), 1);
    assert_eq!(m.get(7), Some(9_999u32.to_le_bytes().as_slice()));
}

// -------------------- SharedMemtable --------------------

#[test]
fn shared_memtable_concurrent_writers() {
    let shared = SharedMemtable::new();
    let handles: Vec<_> = (0..4i64)
        .map(|t| {
            let shared = shared.clone();
            thread::spawn(move || {
                for i in 0..250 {
                    shared.insert(t * 1_000 + i, vec![t as u8]);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(shared.len(), 1_000);
    assert_eq!(shared.get(3_000), Some(vec![3]));
    shared.with_read(assert_invariants);
}

#[test]
fn shared_memtable_take_seals_contents() {
    let shared = SharedMemtable::new();
    shared.insert(2, b"b".to_vec());
    shared.insert(1, b"a".to_vec());
    assert_eq!(shared.snapshot(), vec![(1, b"a".to_vec()), (2, b"b".to_vec())]);

    let sealed = shared.take();
    assert_eq!(sealed.len(), 2);
    assert!(shared.is_empty());
    assert_eq!(shared.delete(1), None);
}

#[test]
fn shared_memtable_clear_empties_table() {
    let shared = SharedMemtable::new();
    for k in 0..10 {
        shared.insert(k, vec![k as u8]);
    }
    let other = shared.clone();
    other.clear();

    assert!(shared.is_empty());
    assert_eq!(shared.get(3), None);
    shared.insert(3, b"again".to_vec());
    assert_eq!(other.get(3), Some(b"again".to_vec()));
}

// -------------------- Property tests --------------------

#[derive(Debug, Clone)]
enum Op {
    Insert(i64, u8),
    Delete(i64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-50i64..50, any::<u8>()).prop_map(|(k, v)| Op::Insert(k, v)),
        (-50i64..50).prop_map(Op::Delete),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn invariants_hold_after_any_op_sequence(ops in prop::collection::vec(op_strategy(), 0..200)) {
        let mut m = Memtable::new();
        let mut model = BTreeMap::new();
        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    prop_assert_eq!(m.insert(k, vec![v]), model.insert(k, vec![v]));
                }
                Op::Delete(k) => {
                    prop_assert_eq!(m.delete(k), model.remove(&k));
                }
            }
            assert_invariants(&m);
        }

        let keys: Vec<i64> = m.iter().map(|(k, _)| k).collect();
        prop_assert!(keys.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(keys, model.keys().copied().collect::<Vec<_>>());
        for (k, v) in &model {
            prop_assert_eq!(m.get(*k), Some(v.as_slice()));
        }
    }
}
