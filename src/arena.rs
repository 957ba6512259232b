// =============================================================================
// Node arena
// =============================================================================
//
// Slot 0 is the anchor: it holds the root link as its right child and is never
// moved or freed. Live nodes occupy slots 1.. and refer to each other by index.
// Freed slots form an intrusive singly-linked list headed by `reusable`.

use std::marker::PhantomData;
use std::mem;

use smallvec::SmallVec;

use crate::{Augment, SlotIndex, TreeError};

pub(crate) const LEFT: usize = 0;
pub(crate) const RIGHT: usize = 1;

/// Index of the anchor slot.
pub(crate) const ANCHOR: usize = 0;

/// Inline capacity of a recorded descent: `2 * (32 - 1)` links plus the anchor.
const PATH_INLINE: usize = 64;

/// Recorded descent: each entry is a slot and the direction taken out of it.
/// The first entry is always `(anchor, RIGHT)`.
pub(crate) type Path<I> = SmallVec<[(I, usize); PATH_INLINE]>;

/// Child link. A link to slot 0 means "no child" and is always black.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Link<I> {
    pub(crate) index: I,
    pub(crate) red: bool,
}

impl<I: SlotIndex> Link<I> {
    pub(crate) const NONE: Self = Self {
        index: I::ZERO,
        red: false,
    };

    #[inline]
    pub(crate) fn black(index: I) -> Self {
        Self { index, red: false }
    }

    #[inline]
    pub(crate) fn red(index: I) -> Self {
        Self { index, red: true }
    }

    #[inline]
    pub(crate) fn is_none(self) -> bool {
        self.index == I::ZERO
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node<K, V, I, S> {
    pub(crate) children: [Link<I>; 2],
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) size: S,
}

#[derive(Clone, Debug)]
pub(crate) enum Slot<K, V, I, S> {
    Anchor { root: Link<I> },
    Node(Node<K, V, I, S>),
    Vacant { next: I },
}

pub(crate) struct Arena<K, V, I: SlotIndex, A: Augment> {
    pub(crate) slots: Vec<Slot<K, V, I, A::Size<I>>>,
    /// Head of the free list, `I::NONE` when empty.
    pub(crate) reusable: I,
    /// Live node count.
    pub(crate) len: usize,
    _augment: PhantomData<A>,
}

impl<K: Clone, V: Clone, I: SlotIndex, A: Augment> Clone for Arena<K, V, I, A> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            reusable: self.reusable,
            len: self.len,
            _augment: PhantomData,
        }
    }
}

impl<K, V, I: SlotIndex, A: Augment> Arena<K, V, I, A> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.clamp(2, I::MAX_SLOTS);
        let mut slots = Vec::with_capacity(capacity);
        slots.push(Slot::Anchor { root: Link::NONE });
        Self {
            slots,
            reusable: I::NONE,
            len: 0,
            _augment: PhantomData,
        }
    }

    pub(crate) fn try_with_capacity(capacity: usize) -> Result<Self, TreeError> {
        if capacity > I::MAX_SLOTS {
            return Err(TreeError::IndexSpaceExhausted {
                requested: capacity,
                max: I::MAX_SLOTS,
            });
        }
        let mut slots = Vec::new();
        slots.try_reserve_exact(capacity.max(2))?;
        slots.push(Slot::Anchor { root: Link::NONE });
        Ok(Self {
            slots,
            reusable: I::NONE,
            len: 0,
            _augment: PhantomData,
        })
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) fn memory_usage(&self) -> usize {
        self.slots.capacity() * mem::size_of::<Slot<K, V, I, A::Size<I>>>()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.truncate(1);
        self.slots[ANCHOR] = Slot::Anchor { root: Link::NONE };
        self.reusable = I::NONE;
        self.len = 0;
    }

    /// Grows the arena ahead of an insertion so that the descent and the
    /// rebalancing that follow never allocate.
    pub(crate) fn reserve_for_insert(&mut self) {
        let capacity = self.slots.capacity();
        if self.len + 2 < capacity {
            return;
        }
        let target = capacity.max(1).saturating_mul(2).min(I::MAX_SLOTS);
        if target > capacity {
            log::trace!("growing tree arena from {} to {} slots", capacity, target);
            self.slots.reserve_exact(target - self.slots.len());
        }
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        if let Err(err) = self.check_index_space(additional) {
            log::error!("{err}");
            panic!("{err}");
        }
        let needed = 1 + self.len + additional;
        self.slots
            .reserve_exact(needed.saturating_sub(self.slots.len()));
    }

    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<(), TreeError> {
        self.check_index_space(additional)?;
        let needed = 1 + self.len + additional;
        self.slots
            .try_reserve_exact(needed.saturating_sub(self.slots.len()))?;
        Ok(())
    }

    fn check_index_space(&self, additional: usize) -> Result<(), TreeError> {
        let requested = self
            .len
            .saturating_add(additional)
            .saturating_add(1);
        if requested > I::MAX_SLOTS {
            return Err(TreeError::IndexSpaceExhausted {
                requested,
                max: I::MAX_SLOTS,
            });
        }
        Ok(())
    }

    /// Places `node` in the free-list head, or in a fresh slot when the list
    /// is empty.
    pub(crate) fn alloc(&mut self, node: Node<K, V, I, A::Size<I>>) -> I {
        if self.reusable.is_none() {
            let at = self.slots.len();
            if at >= I::MAX_SLOTS {
                let err = TreeError::IndexSpaceExhausted {
                    requested: at + 1,
                    max: I::MAX_SLOTS,
                };
                log::error!("{err}");
                panic!("{err}");
            }
            self.slots.push(Slot::Node(node));
            self.len += 1;
            return I::from_usize(at);
        }

        let idx = self.reusable;
        let slot = mem::replace(&mut self.slots[idx.as_usize()], Slot::Node(node));
        self.reusable = match slot {
            Slot::Vacant { next } => next,
            _ => unreachable!("free list points at occupied slot {idx:?}"),
        };
        self.len += 1;
        idx
    }

    /// Returns the slot to the free list and hands back its contents.
    pub(crate) fn free(&mut self, idx: I) -> (K, V) {
        let vacant = Slot::Vacant {
            next: self.reusable,
        };
        match mem::replace(&mut self.slots[idx.as_usize()], vacant) {
            Slot::Node(node) => {
                self.reusable = idx;
                self.len -= 1;
                (node.key, node.value)
            }
            _ => unreachable!("freeing slot {idx:?} which holds no node"),
        }
    }

    // -------------------------------------------------------------------------
    // Slot access
    // -------------------------------------------------------------------------

    #[inline]
    pub(crate) fn node(&self, idx: I) -> &Node<K, V, I, A::Size<I>> {
        match &self.slots[idx.as_usize()] {
            Slot::Node(node) => node,
            _ => unreachable!("slot {idx:?} holds no node"),
        }
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, idx: I) -> &mut Node<K, V, I, A::Size<I>> {
        match &mut self.slots[idx.as_usize()] {
            Slot::Node(node) => node,
            _ => unreachable!("slot {idx:?} holds no node"),
        }
    }

    #[inline]
    pub(crate) fn root(&self) -> Link<I> {
        self.link(I::ZERO, RIGHT)
    }

    /// Link leaving `idx` in direction `dir`. The anchor only has a right link.
    #[inline]
    pub(crate) fn link(&self, idx: I, dir: usize) -> Link<I> {
        match &self.slots[idx.as_usize()] {
            Slot::Node(node) => node.children[dir],
            Slot::Anchor { root } => {
                debug_assert_eq!(dir, RIGHT);
                *root
            }
            Slot::Vacant { .. } => unreachable!("link out of vacant slot {idx:?}"),
        }
    }

    #[inline]
    pub(crate) fn link_mut(&mut self, idx: I, dir: usize) -> &mut Link<I> {
        match &mut self.slots[idx.as_usize()] {
            Slot::Node(node) => &mut node.children[dir],
            Slot::Anchor { root } => {
                debug_assert_eq!(dir, RIGHT);
                root
            }
            Slot::Vacant { .. } => unreachable!("link out of vacant slot {idx:?}"),
        }
    }

    /// Number of nodes under `link`; always 0 without augmentation.
    #[inline]
    pub(crate) fn size(&self, link: Link<I>) -> usize {
        if !A::COUNTED || link.is_none() {
            return 0;
        }
        A::get(self.node(link.index).size)
    }

    /// Recomputes the size of `idx` from its children.
    #[inline]
    pub(crate) fn update_size(&mut self, idx: I) {
        if !A::COUNTED {
            return;
        }
        let [left, right] = self.node(idx).children;
        let n = 1 + self.size(left) + self.size(right);
        A::set(&mut self.node_mut(idx).size, n);
    }

    /// Adds one node to (or removes one from) the size of every node on
    /// `path`, skipping the anchor.
    pub(crate) fn adjust_path_sizes(&mut self, path: &[(I, usize)], grow: bool) {
        if !A::COUNTED {
            return;
        }
        for &(idx, _) in path.iter().skip(1) {
            let node = self.node_mut(idx);
            let n = A::get(node.size);
            A::set(&mut node.size, if grow { n + 1 } else { n - 1 });
        }
    }
}
