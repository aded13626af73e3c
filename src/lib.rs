#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// A fixed-capacity hash set with inline storage.
///
/// This module provides a `FixedHashSet` that wraps the `FixedHashTable` and
/// provides a set interface with configurable hash and equality strategies.
pub mod hash_set;

/// The open-addressing probe engine and its inline slot arena.
///
/// `FixedHashTable` works on precomputed hashes and equality predicates and
/// knows nothing about hashing strategies.
pub mod hash_table;

/// Pluggable key-equality strategies.
pub mod key_equal;

pub use hash_set::FixedHashSet;
pub use hash_table::FixedHashTable;
pub use hash_table::Slot;
pub use key_equal::DefaultKeyEqual;
pub use key_equal::KeyEqual;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// Default hasher builder, `foldhash::fast::RandomState`.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// Default hasher builder, `std::collections::hash_map::RandomState`.
        pub type DefaultHashBuilder = std::collections::hash_map::RandomState;
    } else {
        /// Placeholder used when neither `foldhash` nor `std` is enabled.
        ///
        /// It cannot be constructed; pick a hasher with
        /// [`FixedHashSet::with_hasher`].
        #[derive(Clone, Copy, Debug)]
        pub enum DefaultHashBuilder {}
    }
}
