//! Ordered map structures.
//!
//! This module provides [`TreeMap`], a mutable ordered map backed by a
//! left-leaning red-black tree. Entries are kept in ascending key order
//! and all single-key operations run in O(log N).
//!
//! # Examples
//!
//! ```rust
//! use ordtree::map::TreeMap;
//!
//! let mut map = TreeMap::new();
//! map.insert("b", 2);
//! map.insert("a", 1);
//!
//! assert_eq!(map.get("a"), Some(&1));
//! assert_eq!(map.len(), 2);
//!
//! // Iteration yields entries in key order regardless of insertion order
//! let keys: Vec<&&str> = map.keys().collect();
//! assert_eq!(keys, vec![&"a", &"b"]);
//! ```

mod treemap;

pub use treemap::TreeMap;
pub use treemap::TreeMapIntoIterator;
pub use treemap::TreeMapIterator;
