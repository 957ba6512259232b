use super::*;

use crate::arena::{Link, Slot};
use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};

/// Walks the whole tree and panics on any broken invariant: red-red links,
/// uneven black height, key order, stale subtree sizes, and arena accounting.
pub(crate) fn validate_tree<K, V, C: Compare<K>, I: SlotIndex, A: Augment>(
    t: &RbTree<K, V, C, I, A>,
) {
    let arena = &t.arena;
    assert!(
        matches!(arena.slots[0], Slot::Anchor { .. }),
        "slot 0 must stay the anchor"
    );
    assert!(!arena.root().red, "root link must be black");

    let (_, size) = validate_subtree(t, arena.root(), None, None);
    assert_eq!(size, t.len(), "reachable node count must match len");

    let mut free = 0usize;
    let mut cur = arena.reusable;
    while !cur.is_none() {
        match arena.slots[cur.as_usize()] {
            Slot::Vacant { next } => cur = next,
            _ => panic!("free list reaches live slot {cur:?}"),
        }
        free += 1;
        assert!(free < arena.slots.len(), "free list has a cycle");
    }
    assert_eq!(
        arena.slots.len(),
        1 + t.len() + free,
        "every slot must be the anchor, live, or free"
    );
}

/// Returns (black height, node count) of the subtree behind `link`.
fn validate_subtree<K, V, C: Compare<K>, I: SlotIndex, A: Augment>(
    t: &RbTree<K, V, C, I, A>,
    link: Link<I>,
    lo: Option<&K>,
    hi: Option<&K>,
) -> (usize, usize) {
    if link.is_none() {
        assert!(!link.red, "missing child must be black");
        return (0, 0);
    }

    let node = t.arena.node(link.index);
    if let Some(lo) = lo {
        assert_eq!(t.cmp.compare(lo, &node.key), Ordering::Less, "key order");
    }
    if let Some(hi) = hi {
        assert_eq!(t.cmp.compare(&node.key, hi), Ordering::Less, "key order");
    }

    let [left, right] = node.children;
    if link.red {
        assert!(!left.red && !right.red, "red node with red child");
    }

    let (left_bh, left_n) = validate_subtree(t, left, lo, Some(&node.key));
    let (right_bh, right_n) = validate_subtree(t, right, Some(&node.key), hi);
    assert_eq!(left_bh, right_bh, "black height differs below {:?}", link.index);

    let n = 1 + left_n + right_n;
    if A::COUNTED {
        assert_eq!(A::get(node.size), n, "stale size at {:?}", link.index);
    }
    (left_bh + usize::from(!link.red), n)
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 5)]
    Insert(#[proptest(strategy = "0u16..600")] u16, u32),
    #[proptest(weight = 3)]
    Remove(#[proptest(strategy = "0u16..600")] u16),
    #[proptest(weight = 1)]
    GetOrInsert(#[proptest(strategy = "0u16..600")] u16, u32),
    #[proptest(weight = 2)]
    Query(#[proptest(strategy = "0u16..600")] u16),
    #[proptest(weight = 1)]
    Span(
        #[proptest(strategy = "0u16..600")] u16,
        #[proptest(strategy = "0u16..600")] u16,
    ),
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(any::<Op>(), 0..=400)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        max_shrink_iters: 20_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_counted_matches_btreemap(ops in ops_strategy()) {
        let mut t: CountedRbTree<u16, u32> = CountedRbTree::with_capacity(1);
        let mut m: BTreeMap<u16, u32> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    prop_assert_eq!(t.insert(key, value), m.insert(key, value));
                }
                Op::Remove(key) => {
                    prop_assert_eq!(t.remove(&key), m.remove(&key));
                }
                Op::GetOrInsert(key, value) => {
                    let got = *t.get_or_insert(key, value);
                    prop_assert_eq!(got, *m.entry(key).or_insert(value));
                }
                Op::Query(q) => {
                    prop_assert_eq!(t.get(&q), m.get(&q));
                    prop_assert_eq!(t.floor(&q), m.range(..=q).next_back());
                    prop_assert_eq!(t.ceil(&q), m.range((Excluded(q), Unbounded)).next());
                    prop_assert_eq!(t.count_from(&q), m.range(q..).count());
                    prop_assert_eq!(t.count_before(&q), m.range(..q).count());
                    prop_assert_eq!(t.iter_from(&q).count(), m.range(q..).count());
                }
                Op::Span(start, end) => {
                    let expected: Vec<(&u16, &u32)> = if start <= end {
                        m.range(start..end).collect()
                    } else {
                        Vec::new()
                    };
                    let got: Vec<(&u16, &u32)> = t.iter_between(&start, &end).collect();
                    prop_assert_eq!(t.count_between(&start, &end), expected.len());
                    prop_assert_eq!(got, expected);
                }
            }

            prop_assert_eq!(t.len(), m.len());
            validate_tree(&t);
        }

        let got: Vec<(u16, u32)> = t.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<(u16, u32)> = m.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_plain_u16_matches_btreemap(ops in ops_strategy()) {
        let mut t: RbTree<u16, u32, Natural, u16> = RbTree::with_capacity(2);
        let mut m: BTreeMap<u16, u32> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    prop_assert_eq!(t.insert_if_absent(key, value), !m.contains_key(&key));
                    m.entry(key).or_insert(value);
                }
                Op::Remove(key) => {
                    prop_assert_eq!(t.remove_entry(&key), m.remove_entry(&key));
                }
                Op::GetOrInsert(key, value) => {
                    let got = t.get_or_insert_default(key);
                    *got = got.wrapping_add(value);
                    let slot = m.entry(key).or_default();
                    *slot = slot.wrapping_add(value);
                }
                Op::Query(q) => {
                    prop_assert_eq!(t.contains_key(&q), m.contains_key(&q));
                    prop_assert_eq!(t.floor(&q), m.range(..=q).next_back());
                    prop_assert_eq!(t.ceil(&q), m.range((Excluded(q), Unbounded)).next());
                }
                Op::Span(_, end) => {
                    let got: Vec<&u16> = t.iter_before(&end).map(|(k, _)| k).collect();
                    let expected: Vec<&u16> = m.range(..end).map(|(k, _)| k).collect();
                    prop_assert_eq!(got, expected);
                }
            }

            prop_assert_eq!(t.len(), m.len());
            validate_tree(&t);
        }

        prop_assert_eq!(t.first_key_value(), m.first_key_value());
        prop_assert_eq!(t.last_key_value(), m.last_key_value());
        prop_assert!(t.keys().copied().eq(m.keys().copied()));
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

#[test]
fn exhaustive_insert_order_small_set() {
    let keys: Vec<u8> = (1..=7).collect();

    for_each_permutation(&keys, |perm| {
        let mut t: CountedRbTree<u8, u8> = CountedRbTree::with_capacity(2);
        for k in perm {
            assert_eq!(t.insert(k, k * 3), None);
            validate_tree(&t);
        }
        let got: Vec<u8> = t.keys().copied().collect();
        assert_eq!(got, keys);
        for k in 0..=8 {
            let expected = keys.iter().filter(|&&x| x >= 2 && x < k).count();
            assert_eq!(t.count_between(&2, &k), expected);
        }
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    let keys: Vec<u8> = (1..=7).collect();

    // Insert in a fixed order, then remove in all permutations.
    let mut base: CountedRbTree<u8, u8> = CountedRbTree::new();
    for &k in &keys {
        base.insert(k, k);
    }

    for_each_permutation(&keys, |perm| {
        let mut t = base.clone();
        let mut live = keys.clone();

        for k in perm {
            assert_eq!(t.remove(&k), Some(k));
            assert_eq!(t.remove(&k), None);
            live.retain(|&x| x != k);
            validate_tree(&t);
            assert!(t.keys().copied().eq(live.iter().copied()));
        }
        assert!(t.is_empty());
        assert!(t.arena.root().is_none());
    });
}
