// =============================================================================
// RbTree
// =============================================================================

use std::cmp::Ordering;
use std::fmt;
use std::mem;

use smallvec::SmallVec;

use crate::arena::{Arena, Link, Node, Path, LEFT, RIGHT};
use crate::iter::{Iter, Keys, Range, Values, Walk};
use crate::{Augment, Compare, Counted, Natural, Plain, SlotIndex, TreeError};

/// Arena capacity used by [`RbTree::new`].
pub const DEFAULT_CAPACITY: usize = 16;

/// An ordered map backed by an arena-indexed red-black tree.
///
/// - `C` orders keys ([`Natural`] uses [`Ord`]).
/// - `I` is the slot index and subtree size type; it bounds the number of
///   entries to `I::MAX_SLOTS - 1`.
/// - `A` selects subtree-size augmentation ([`Plain`] or [`Counted`]).
///
/// Nodes live in a single growable `Vec` and refer to each other by index.
/// Removed slots are recycled through a free list; the arena never shrinks
/// except through [`clear`](Self::clear) keeping its allocation.
pub struct RbTree<K, V, C = Natural, I: SlotIndex = u32, A: Augment = Plain> {
    pub(crate) arena: Arena<K, V, I, A>,
    pub(crate) cmp: C,
}

/// An [`RbTree`] that keeps subtree sizes, enabling O(log n) range counts.
pub type CountedRbTree<K, V, C = Natural, I = u32> = RbTree<K, V, C, I, Counted>;

impl<K, V, C: Compare<K> + Default, I: SlotIndex, A: Augment> RbTree<K, V, C, I, A> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a tree whose arena holds `capacity` slots (anchor included)
    /// before the first growth.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, C::default())
    }
}

impl<K, V, C: Compare<K>, I: SlotIndex, A: Augment> RbTree<K, V, C, I, A> {
    pub fn with_comparator(cmp: C) -> Self {
        Self::with_capacity_and_comparator(DEFAULT_CAPACITY, cmp)
    }

    pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
            cmp,
        }
    }

    /// Like [`with_capacity_and_comparator`](Self::with_capacity_and_comparator)
    /// but reports allocation failure and unaddressable capacities instead of
    /// aborting.
    pub fn try_with_capacity_and_comparator(capacity: usize, cmp: C) -> Result<Self, TreeError> {
        Ok(Self {
            arena: Arena::try_with_capacity(capacity)?,
            cmp,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.arena.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arena.len == 0
    }

    /// Slots the arena can hold without reallocating, anchor included.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// Bytes held by the node arena.
    pub fn memory_usage(&self) -> usize {
        self.arena.memory_usage()
    }

    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Reserves room for `additional` more entries.
    ///
    /// # Panics
    ///
    /// Panics if the index type cannot address that many entries.
    pub fn reserve(&mut self, additional: usize) {
        self.arena.reserve(additional);
    }

    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TreeError> {
        self.arena.try_reserve(additional)
    }

    /// Drops every entry. The arena keeps its allocation.
    pub fn clear(&mut self) {
        log::debug!("clearing tree of {} entries", self.arena.len);
        self.arena.clear();
    }

    // -------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------

    fn find(&self, key: &K) -> Option<I> {
        let mut link = self.arena.root();
        while !link.is_none() {
            let node = self.arena.node(link.index);
            link = match self.cmp.compare(key, &node.key) {
                Ordering::Equal => return Some(link.index),
                Ordering::Less => node.children[LEFT],
                Ordering::Greater => node.children[RIGHT],
            };
        }
        None
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|idx| &self.arena.node(idx).value)
    }

    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.find(key).map(|idx| {
            let node = self.arena.node(idx);
            (&node.key, &node.value)
        })
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let idx = self.find(key)?;
        Some(&mut self.arena.node_mut(idx).value)
    }

    /// Returns the value for `key`, or `default` when absent.
    pub fn get_or<'a>(&'a self, key: &K, default: &'a V) -> &'a V {
        self.get(key).unwrap_or(default)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    // -------------------------------------------------------------------------
    // Insertion
    // -------------------------------------------------------------------------

    /// Finds `key`, inserting a node built from `make()` when it is absent.
    ///
    /// Returns the node's slot and, when the key was already present, hands
    /// `make` back uncalled.
    fn place<F: FnOnce() -> V>(&mut self, key: K, make: F) -> (I, Option<F>) {
        // Grow first: nothing below may allocate once the path is recorded.
        self.arena.reserve_for_insert();

        let mut path: Path<I> = SmallVec::new();
        let mut parent = I::ZERO;
        let mut dir = RIGHT;
        loop {
            path.push((parent, dir));
            let link = self.arena.link(parent, dir);
            if link.is_none() {
                break;
            }
            let node = self.arena.node(link.index);
            dir = match self.cmp.compare(&key, &node.key) {
                Ordering::Equal => return (link.index, Some(make)),
                Ordering::Less => LEFT,
                Ordering::Greater => RIGHT,
            };
            parent = link.index;
        }

        let idx = self.arena.alloc(Node {
            children: [Link::NONE; 2],
            key,
            value: make(),
            size: A::leaf(),
        });
        *self.arena.link_mut(parent, dir) = Link::red(idx);
        self.arena.adjust_path_sizes(&path, true);
        self.arena.fix_insert(&path);
        (idx, None)
    }

    /// Returns the value for `key`, inserting `make()` first if absent.
    pub fn get_or_insert_with<F: FnOnce() -> V>(&mut self, key: K, make: F) -> &mut V {
        let (idx, _) = self.place(key, make);
        &mut self.arena.node_mut(idx).value
    }

    /// Returns the value for `key`, inserting `value` first if absent.
    /// An existing value is left untouched.
    pub fn get_or_insert(&mut self, key: K, value: V) -> &mut V {
        self.get_or_insert_with(key, move || value)
    }

    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Sets the value for `key`, returning the previous value if there was
    /// one. The stored key is kept on overwrite.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let (idx, unused) = self.place(key, move || value);
        let make = unused?;
        Some(mem::replace(&mut self.arena.node_mut(idx).value, make()))
    }

    /// Inserts only if `key` is absent. Returns whether it was inserted.
    pub fn insert_if_absent(&mut self, key: K, value: V) -> bool {
        let (_, unused) = self.place(key, move || value);
        unused.is_none()
    }

    // -------------------------------------------------------------------------
    // Removal
    // -------------------------------------------------------------------------

    /// Removes `key`, returning its entry. Absent keys are a no-op.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let mut path: Path<I> = SmallVec::new();
        let mut parent = I::ZERO;
        let mut dir = RIGHT;
        let target = loop {
            path.push((parent, dir));
            let link = self.arena.link(parent, dir);
            if link.is_none() {
                return None;
            }
            let node = self.arena.node(link.index);
            dir = match self.cmp.compare(key, &node.key) {
                Ordering::Equal => break link.index,
                Ordering::Less => LEFT,
                Ordering::Greater => RIGHT,
            };
            parent = link.index;
        };

        let must_fix = self.arena.unlink(target, &mut path);
        self.arena.adjust_path_sizes(&path, false);
        if must_fix {
            self.arena.fix_remove(&mut path);
        }
        Some(self.arena.free(target))
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    // -------------------------------------------------------------------------
    // Ordered queries
    // -------------------------------------------------------------------------

    fn entry(&self, idx: I) -> (&K, &V) {
        let node = self.arena.node(idx);
        (&node.key, &node.value)
    }

    /// Entry with the greatest key `<= key`.
    pub fn floor(&self, key: &K) -> Option<(&K, &V)> {
        let mut best = None;
        let mut link = self.arena.root();
        while !link.is_none() {
            let node = self.arena.node(link.index);
            if self.cmp.compare(key, &node.key) == Ordering::Less {
                link = node.children[LEFT];
            } else {
                best = Some(link.index);
                link = node.children[RIGHT];
            }
        }
        best.map(|idx| self.entry(idx))
    }

    /// Entry with the least key strictly greater than `key`.
    pub fn ceil(&self, key: &K) -> Option<(&K, &V)> {
        let mut best = None;
        let mut link = self.arena.root();
        while !link.is_none() {
            let node = self.arena.node(link.index);
            if self.cmp.compare(key, &node.key) == Ordering::Less {
                best = Some(link.index);
                link = node.children[LEFT];
            } else {
                link = node.children[RIGHT];
            }
        }
        best.map(|idx| self.entry(idx))
    }

    fn extreme(&self, dir: usize) -> Option<I> {
        let mut link = self.arena.root();
        let mut last = None;
        while !link.is_none() {
            last = Some(link.index);
            link = self.arena.node(link.index).children[dir];
        }
        last
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.extreme(LEFT).map(|idx| self.entry(idx))
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.extreme(RIGHT).map(|idx| self.entry(idx))
    }

    // -------------------------------------------------------------------------
    // Iteration
    // -------------------------------------------------------------------------

    /// In-order iterator over all entries.
    pub fn iter(&self) -> Iter<'_, K, V, I, A> {
        Iter::new(&self.arena, Walk::all(&self.arena))
    }

    pub fn keys(&self) -> Keys<'_, K, V, I, A> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V, I, A> {
        Values { inner: self.iter() }
    }

    /// Seeds a walk at the least key `>= start`: every node on the search
    /// path whose key is `>= start` is pending.
    fn walk_from(&self, start: &K) -> Walk<I> {
        let mut walk = Walk::empty();
        let mut link = self.arena.root();
        while !link.is_none() {
            let node = self.arena.node(link.index);
            if self.cmp.compare(start, &node.key) == Ordering::Greater {
                link = node.children[RIGHT];
            } else {
                walk.push(link.index);
                link = node.children[LEFT];
            }
        }
        walk
    }

    /// Entries with keys `>= start`, ascending.
    pub fn iter_from(&self, start: &K) -> Range<'_, K, V, C, I, A> {
        Range::new(self, self.walk_from(start), None)
    }

    /// Entries with keys `< end`, ascending.
    pub fn iter_before<'a>(&'a self, end: &'a K) -> Range<'a, K, V, C, I, A> {
        Range::new(self, Walk::all(&self.arena), Some(end))
    }

    /// Entries with `start <= key < end`, ascending. Empty when `end <= start`.
    pub fn iter_between<'a>(&'a self, start: &K, end: &'a K) -> Range<'a, K, V, C, I, A> {
        Range::new(self, self.walk_from(start), Some(end))
    }
}

// =============================================================================
// Range counting (size-augmented trees only)
// =============================================================================

impl<K, V, C: Compare<K>, I: SlotIndex> RbTree<K, V, C, I, Counted> {
    /// Keys `>= start` below `link`.
    fn count_from_in(&self, start: &K, mut link: Link<I>) -> usize {
        let mut count = 0;
        while !link.is_none() {
            let node = self.arena.node(link.index);
            if self.cmp.compare(start, &node.key) == Ordering::Greater {
                link = node.children[RIGHT];
            } else {
                count += 1 + self.arena.size(node.children[RIGHT]);
                link = node.children[LEFT];
            }
        }
        count
    }

    /// Keys `< end` below `link`.
    fn count_before_in(&self, end: &K, mut link: Link<I>) -> usize {
        let mut count = 0;
        while !link.is_none() {
            let node = self.arena.node(link.index);
            if self.cmp.compare(end, &node.key) == Ordering::Greater {
                count += 1 + self.arena.size(node.children[LEFT]);
                link = node.children[RIGHT];
            } else {
                link = node.children[LEFT];
            }
        }
        count
    }

    /// Number of keys `>= start`, in O(log n).
    pub fn count_from(&self, start: &K) -> usize {
        self.count_from_in(start, self.arena.root())
    }

    /// Number of keys `< end`, in O(log n).
    pub fn count_before(&self, end: &K) -> usize {
        self.count_before_in(end, self.arena.root())
    }

    /// Number of keys in `start <= key < end`, in O(log n).
    ///
    /// Descends to the first node inside the range, then counts its left
    /// subtree from `start` and its right subtree up to `end`.
    pub fn count_between(&self, start: &K, end: &K) -> usize {
        let mut link = self.arena.root();
        while !link.is_none() {
            let node = self.arena.node(link.index);
            if self.cmp.compare(start, &node.key) == Ordering::Greater {
                link = node.children[RIGHT];
            } else if self.cmp.compare(end, &node.key) != Ordering::Greater {
                link = node.children[LEFT];
            } else {
                return 1
                    + self.count_from_in(start, node.children[LEFT])
                    + self.count_before_in(end, node.children[RIGHT]);
            }
        }
        0
    }
}

// =============================================================================
// Trait impls
// =============================================================================

impl<K, V, C: Compare<K> + Default, I: SlotIndex, A: Augment> Default for RbTree<K, V, C, I, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone, C: Clone, I: SlotIndex, A: Augment> Clone for RbTree<K, V, C, I, A> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena.clone(),
            cmp: self.cmp.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C: Compare<K>, I: SlotIndex, A: Augment> fmt::Debug
    for RbTree<K, V, C, I, A>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C: Compare<K>, I: SlotIndex, A: Augment> Extend<(K, V)> for RbTree<K, V, C, I, A> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, C: Compare<K> + Default, I: SlotIndex, A: Augment> FromIterator<(K, V)>
    for RbTree<K, V, C, I, A>
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<'a, K, V, C: Compare<K>, I: SlotIndex, A: Augment> IntoIterator for &'a RbTree<K, V, C, I, A> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, I, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
