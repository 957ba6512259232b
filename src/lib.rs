//! # rbt-rs
//!
//! An ordered map and set built on an arena-indexed red-black tree.
//!
//! All nodes live in one contiguous `Vec` and refer to each other by integer
//! index; there are no parent pointers. Insertion and removal record their
//! descent on an explicit path stack and rebalance bottom-up from it. Freed
//! slots go on an intrusive free list and are reused before the arena grows.
//!
//! With [`Counted`] augmentation every node also stores the size of its
//! subtree, so range cardinality (`count_between` and friends) is O(log n).
//!
//! ## Example
//!
//! ```rust
//! use rbt_rs::{CountedRbTree, RbTree};
//!
//! let mut tree: RbTree<u32, &str> = RbTree::new();
//! tree.insert(5, "five");
//! tree.insert(3, "three");
//! tree.insert(8, "eight");
//!
//! assert_eq!(tree.get(&3), Some(&"three"));
//! assert_eq!(tree.floor(&6), Some((&5, &"five")));
//! assert_eq!(tree.ceil(&5), Some((&8, &"eight")));
//!
//! let mut counted: CountedRbTree<u32, ()> = CountedRbTree::new();
//! counted.extend([1, 3, 4, 5, 7, 8, 9].map(|k| (k, ())));
//! assert_eq!(counted.count_between(&3, &8), 4);
//! ```

#![deny(unsafe_code)]

mod arena;
mod augment;
mod balance;
mod compare;
mod error;
mod index;
mod iter;
mod set;
mod tree;

pub use augment::{Augment, Counted, Plain};
pub use compare::{Compare, Natural};
pub use error::TreeError;
pub use index::SlotIndex;
pub use iter::{Iter, KeyRange, Keys, Range, Values};
pub use set::{CountedRbSet, RbSet};
pub use tree::{CountedRbTree, RbTree, DEFAULT_CAPACITY};

#[cfg(test)]
mod proptests;
