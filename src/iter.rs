//! In-order iterators.
//!
//! Nodes have no parent index, so every iterator keeps an explicit stack of
//! pending ancestors: the top is the next node to yield, and yielding a node
//! pushes the left spine of its right subtree. The stack never holds more
//! than one tree height of entries.

use std::cmp::Ordering;
use std::iter::FusedIterator;

use smallvec::SmallVec;

use crate::arena::{Arena, Link, LEFT, RIGHT};
use crate::{Augment, Compare, RbTree, SlotIndex};

/// Covers a full `u32`-indexed tree height, `2 * (32 - 1)` nodes.
const WALK_INLINE: usize = 64;

#[derive(Clone)]
pub(crate) struct Walk<I> {
    stack: SmallVec<[I; WALK_INLINE]>,
}

impl<I: SlotIndex> Walk<I> {
    pub(crate) fn empty() -> Self {
        Self {
            stack: SmallVec::new(),
        }
    }

    /// Walk over the whole tree: the root's left spine is pending.
    pub(crate) fn all<K, V, A: Augment>(arena: &Arena<K, V, I, A>) -> Self {
        let mut walk = Self::empty();
        walk.push_spine(arena, arena.root());
        walk
    }

    #[inline]
    pub(crate) fn push(&mut self, idx: I) {
        self.stack.push(idx);
    }

    fn push_spine<K, V, A: Augment>(&mut self, arena: &Arena<K, V, I, A>, mut link: Link<I>) {
        while !link.is_none() {
            self.stack.push(link.index);
            link = arena.node(link.index).children[LEFT];
        }
    }

    pub(crate) fn next<K, V, A: Augment>(&mut self, arena: &Arena<K, V, I, A>) -> Option<I> {
        let idx = self.stack.pop()?;
        self.push_spine(arena, arena.node(idx).children[RIGHT]);
        Some(idx)
    }

    fn clear(&mut self) {
        self.stack.clear();
    }
}

/// Iterator over all entries in ascending key order.
pub struct Iter<'a, K, V, I: SlotIndex, A: Augment> {
    arena: &'a Arena<K, V, I, A>,
    walk: Walk<I>,
    remaining: usize,
}

impl<'a, K, V, I: SlotIndex, A: Augment> Iter<'a, K, V, I, A> {
    pub(crate) fn new(arena: &'a Arena<K, V, I, A>, walk: Walk<I>) -> Self {
        Self {
            arena,
            walk,
            remaining: arena.len,
        }
    }
}

impl<K, V, I: SlotIndex, A: Augment> Clone for Iter<'_, K, V, I, A> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena,
            walk: self.walk.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V, I: SlotIndex, A: Augment> Iterator for Iter<'a, K, V, I, A> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        let idx = self.walk.next(arena)?;
        self.remaining -= 1;
        let node = arena.node(idx);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, I: SlotIndex, A: Augment> ExactSizeIterator for Iter<'_, K, V, I, A> {}

impl<K, V, I: SlotIndex, A: Augment> FusedIterator for Iter<'_, K, V, I, A> {}

pub struct Keys<'a, K, V, I: SlotIndex, A: Augment> {
    pub(crate) inner: Iter<'a, K, V, I, A>,
}

impl<'a, K, V, I: SlotIndex, A: Augment> Iterator for Keys<'a, K, V, I, A> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, I: SlotIndex, A: Augment> ExactSizeIterator for Keys<'_, K, V, I, A> {}

impl<K, V, I: SlotIndex, A: Augment> FusedIterator for Keys<'_, K, V, I, A> {}

pub struct Values<'a, K, V, I: SlotIndex, A: Augment> {
    pub(crate) inner: Iter<'a, K, V, I, A>,
}

impl<'a, K, V, I: SlotIndex, A: Augment> Iterator for Values<'a, K, V, I, A> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, I: SlotIndex, A: Augment> ExactSizeIterator for Values<'_, K, V, I, A> {}

impl<K, V, I: SlotIndex, A: Augment> FusedIterator for Values<'_, K, V, I, A> {}

/// Iterator over a key range in ascending order, with an optional exclusive
/// upper bound checked against each yielded key.
pub struct Range<'a, K, V, C, I: SlotIndex, A: Augment> {
    tree: &'a RbTree<K, V, C, I, A>,
    walk: Walk<I>,
    end: Option<&'a K>,
}

impl<'a, K, V, C: Compare<K>, I: SlotIndex, A: Augment> Range<'a, K, V, C, I, A> {
    pub(crate) fn new(tree: &'a RbTree<K, V, C, I, A>, walk: Walk<I>, end: Option<&'a K>) -> Self {
        Self { tree, walk, end }
    }
}

impl<'a, K, V, C: Compare<K>, I: SlotIndex, A: Augment> Iterator for Range<'a, K, V, C, I, A> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        let idx = self.walk.next(&tree.arena)?;
        let node = tree.arena.node(idx);
        if let Some(end) = self.end {
            if tree.cmp.compare(&node.key, end) != Ordering::Less {
                self.walk.clear();
                return None;
            }
        }
        Some((&node.key, &node.value))
    }
}

impl<K, V, C: Compare<K>, I: SlotIndex, A: Augment> FusedIterator for Range<'_, K, V, C, I, A> {}

/// Keys of a [`Range`], as yielded by the set range iterators.
pub struct KeyRange<'a, K, V, C, I: SlotIndex, A: Augment> {
    pub(crate) inner: Range<'a, K, V, C, I, A>,
}

impl<'a, K, V, C: Compare<K>, I: SlotIndex, A: Augment> Iterator for KeyRange<'a, K, V, C, I, A> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }
}

impl<K, V, C: Compare<K>, I: SlotIndex, A: Augment> FusedIterator for KeyRange<'_, K, V, C, I, A> {}
