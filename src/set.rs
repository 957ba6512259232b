//! Key-only instantiation of the tree.

use std::fmt;

use crate::iter::{KeyRange, Keys};
use crate::{Augment, Compare, Counted, Natural, Plain, RbTree, SlotIndex, TreeError};

/// An ordered set: an [`RbTree`] whose values are `()`, so nodes carry no
/// payload.
pub struct RbSet<K, C = Natural, I: SlotIndex = u32, A: Augment = Plain> {
    tree: RbTree<K, (), C, I, A>,
}

/// An [`RbSet`] with O(log n) range counts.
pub type CountedRbSet<K, C = Natural, I = u32> = RbSet<K, C, I, Counted>;

impl<K, C: Compare<K> + Default, I: SlotIndex, A: Augment> RbSet<K, C, I, A> {
    pub fn new() -> Self {
        Self { tree: RbTree::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tree: RbTree::with_capacity(capacity),
        }
    }
}

impl<K, C: Compare<K>, I: SlotIndex, A: Augment> RbSet<K, C, I, A> {
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            tree: RbTree::with_comparator(cmp),
        }
    }

    pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self {
        Self {
            tree: RbTree::with_capacity_and_comparator(capacity, cmp),
        }
    }

    pub fn try_with_capacity_and_comparator(capacity: usize, cmp: C) -> Result<Self, TreeError> {
        Ok(Self {
            tree: RbTree::try_with_capacity_and_comparator(capacity, cmp)?,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.tree.capacity()
    }

    /// Reserves room for `additional` more keys.
    ///
    /// # Panics
    ///
    /// Panics if the index type cannot address that many keys.
    pub fn reserve(&mut self, additional: usize) {
        self.tree.reserve(additional);
    }

    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TreeError> {
        self.tree.try_reserve(additional)
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    pub fn contains(&self, key: &K) -> bool {
        self.tree.contains_key(key)
    }

    pub fn get(&self, key: &K) -> Option<&K> {
        self.tree.get_key_value(key).map(|(k, _)| k)
    }

    /// Adds `key` if absent. Returns whether it was added.
    pub fn insert(&mut self, key: K) -> bool {
        self.tree.insert_if_absent(key, ())
    }

    /// Removes `key`. Returns whether it was present.
    pub fn remove(&mut self, key: &K) -> bool {
        self.tree.remove_entry(key).is_some()
    }

    pub fn take(&mut self, key: &K) -> Option<K> {
        self.tree.remove_entry(key).map(|(k, _)| k)
    }

    /// Greatest key `<= key`.
    pub fn floor(&self, key: &K) -> Option<&K> {
        self.tree.floor(key).map(|(k, _)| k)
    }

    /// Least key `> key`.
    pub fn ceil(&self, key: &K) -> Option<&K> {
        self.tree.ceil(key).map(|(k, _)| k)
    }

    pub fn first(&self) -> Option<&K> {
        self.tree.first_key_value().map(|(k, _)| k)
    }

    pub fn last(&self) -> Option<&K> {
        self.tree.last_key_value().map(|(k, _)| k)
    }

    pub fn iter(&self) -> Keys<'_, K, (), I, A> {
        self.tree.keys()
    }

    /// Keys `>= start`, ascending.
    pub fn iter_from(&self, start: &K) -> KeyRange<'_, K, (), C, I, A> {
        KeyRange {
            inner: self.tree.iter_from(start),
        }
    }

    /// Keys `< end`, ascending.
    pub fn iter_before<'a>(&'a self, end: &'a K) -> KeyRange<'a, K, (), C, I, A> {
        KeyRange {
            inner: self.tree.iter_before(end),
        }
    }

    /// Keys in `start <= key < end`, ascending.
    pub fn iter_between<'a>(&'a self, start: &K, end: &'a K) -> KeyRange<'a, K, (), C, I, A> {
        KeyRange {
            inner: self.tree.iter_between(start, end),
        }
    }
}

impl<K, C: Compare<K>, I: SlotIndex> RbSet<K, C, I, Counted> {
    pub fn count_from(&self, start: &K) -> usize {
        self.tree.count_from(start)
    }

    pub fn count_before(&self, end: &K) -> usize {
        self.tree.count_before(end)
    }

    pub fn count_between(&self, start: &K, end: &K) -> usize {
        self.tree.count_between(start, end)
    }
}

impl<K, C: Compare<K> + Default, I: SlotIndex, A: Augment> Default for RbSet<K, C, I, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, C: Clone, I: SlotIndex, A: Augment> Clone for RbSet<K, C, I, A> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<K: fmt::Debug, C: Compare<K>, I: SlotIndex, A: Augment> fmt::Debug for RbSet<K, C, I, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K, C: Compare<K>, I: SlotIndex, A: Augment> Extend<K> for RbSet<K, C, I, A> {
    fn extend<T: IntoIterator<Item = K>>(&mut self, iter: T) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K, C: Compare<K> + Default, I: SlotIndex, A: Augment> FromIterator<K> for RbSet<K, C, I, A> {
    fn from_iter<T: IntoIterator<Item = K>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}
