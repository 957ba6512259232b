//! Integer types usable as arena slot indices.
//!
//! The all-ones value of each type is reserved as the "none" sentinel
//! (end of the free list), so a `u16` tree addresses at most `u16::MAX`
//! slots, one of which is the anchor at slot 0.

use std::fmt;

/// An unsigned integer used for node indices and subtree sizes.
///
/// # Example
///
/// ```
/// use rbt_rs::SlotIndex;
///
/// assert!(u32::NONE.is_none());
/// assert_eq!(u16::MAX_SLOTS, 65_535);
/// assert_eq!(u32::from_usize(7).as_usize(), 7);
/// ```
pub trait SlotIndex: Copy + Eq + Ord + fmt::Debug + 'static {
    /// Sentinel meaning "no slot".
    const NONE: Self;

    /// Slot 0, the anchor. As a child index it means "no child".
    const ZERO: Self;

    /// Number of addressable slots, anchor included.
    const MAX_SLOTS: usize;

    #[inline]
    fn is_none(self) -> bool {
        self == Self::NONE
    }

    fn as_usize(self) -> usize;

    fn from_usize(val: usize) -> Self;
}

macro_rules! impl_slot_index {
    ($($ty:ty),*) => {
        $(
            impl SlotIndex for $ty {
                const NONE: Self = <$ty>::MAX;
                const ZERO: Self = 0;
                const MAX_SLOTS: usize = if (<$ty>::MAX as u128) < (usize::MAX as u128) {
                    <$ty>::MAX as usize
                } else {
                    usize::MAX
                };

                #[inline]
                fn as_usize(self) -> usize {
                    self as usize
                }

                #[inline]
                fn from_usize(val: usize) -> Self {
                    debug_assert!(val <= <$ty>::MAX as usize);
                    val as Self
                }
            }
        )*
    };
}

impl_slot_index!(u16, u32, u64, usize);
