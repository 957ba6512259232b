//! Key ordering used by the tree.

use std::cmp::Ordering;

/// Three-way comparison of keys.
///
/// Every closure `Fn(&K, &K) -> Ordering` is a comparator, so a tree ordered
/// by descending keys is just
/// `RbTree::with_comparator(|a: &u32, b: &u32| b.cmp(a))`.
///
/// The ordering must be total and must not change while keys are stored.
pub trait Compare<K: ?Sized> {
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// Orders keys by their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Natural;

impl<K: Ord + ?Sized> Compare<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K: ?Sized, F> Compare<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}
