//! # ordtree
//!
//! An ordered key-value map backed by a left-leaning red-black tree.
//!
//! ## Overview
//!
//! This library provides [`TreeMap`](map::TreeMap), a mutable ordered map
//! built on a left-leaning red-black tree (the 2-3 tree formulation). It
//! offers the familiar map operations with guaranteed logarithmic bounds:
//!
//! - O(log N) get / `get_mut`
//! - O(log N) insert
//! - O(log N) remove
//! - O(log N) min/max
//! - O(1) len and `is_empty`
//! - O(N) in-order iteration over keys and values
//!
//! The tree owns its nodes exclusively (no parent pointers, no shared
//! references), so every recursive operation takes an owned subtree and
//! returns the possibly-rotated replacement.
//!
//! ## Example
//!
//! ```rust
//! use ordtree::prelude::*;
//!
//! let mut map = TreeMap::new();
//! map.insert(3, "three");
//! map.insert(1, "one");
//! map.insert(2, "two");
//!
//! // Entries are always in sorted key order
//! let keys: Vec<&i32> = map.keys().collect();
//! assert_eq!(keys, vec![&1, &2, &3]);
//!
//! assert_eq!(map.remove(&2), Some("two"));
//! assert_eq!(map.get(&2), None);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types.
///
/// # Usage
///
/// ```rust
/// use ordtree::prelude::*;
/// ```
pub mod prelude {
    pub use crate::map::*;
}

pub mod map;
