//! Compile-time switch for subtree-size augmentation.
//!
//! [`Plain`] stores nothing per node. [`Counted`] stores the size of every
//! subtree, which is what makes `count_from`, `count_before` and
//! `count_between` run in O(log n).

use std::fmt;

use crate::SlotIndex;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Plain {}
    impl Sealed for super::Counted {}
}

/// Per-node augmentation policy.
pub trait Augment: sealed::Sealed + 'static {
    /// Field stored in every node.
    type Size<I: SlotIndex>: Copy + fmt::Debug;

    const COUNTED: bool;

    /// Size of a freshly inserted leaf.
    fn leaf<I: SlotIndex>() -> Self::Size<I>;

    fn get<I: SlotIndex>(size: Self::Size<I>) -> usize;

    fn set<I: SlotIndex>(size: &mut Self::Size<I>, n: usize);
}

/// No augmentation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Plain;

/// Subtree sizes are maintained in every node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counted;

impl Augment for Plain {
    type Size<I: SlotIndex> = ();

    const COUNTED: bool = false;

    #[inline]
    fn leaf<I: SlotIndex>() -> Self::Size<I> {}

    #[inline]
    fn get<I: SlotIndex>(_size: Self::Size<I>) -> usize {
        0
    }

    #[inline]
    fn set<I: SlotIndex>(_size: &mut Self::Size<I>, _n: usize) {}
}

impl Augment for Counted {
    type Size<I: SlotIndex> = I;

    const COUNTED: bool = true;

    #[inline]
    fn leaf<I: SlotIndex>() -> Self::Size<I> {
        I::from_usize(1)
    }

    #[inline]
    fn get<I: SlotIndex>(size: Self::Size<I>) -> usize {
        size.as_usize()
    }

    #[inline]
    fn set<I: SlotIndex>(size: &mut Self::Size<I>, n: usize) {
        *size = I::from_usize(n);
    }
}
