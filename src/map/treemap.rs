//! Mutable ordered map based on a left-leaning Red-Black Tree.
//!
//! This module provides [`TreeMap`], an ordered map that keeps its entries
//! in ascending key order using a left-leaning Red-Black Tree (LLRB), the
//! binary-tree encoding of a 2-3 tree.
//!
//! # Overview
//!
//! - O(log N) get
//! - O(log N) insert
//! - O(log N) remove
//! - O(log N) min/max
//! - O(1) len and `is_empty`
//! - O(N) ordered iteration
//!
//! # Internal Structure
//!
//! The tree maintains the following invariants after every mutating call:
//!
//! 1. Every node is either red or black
//! 2. The root is black
//! 3. Every red link leans left; no right-leaning red link survives fix-up
//! 4. No node keeps two red children (resolved by a color flip)
//! 5. Every path from the root to an empty subtree passes through the same
//!    number of black links
//!
//! These invariants bound the tree height, and therefore the recursion depth
//! of every operation, to O(log N). Each node owns its children outright, so
//! the recursive helpers take an owned subtree and hand back the
//! possibly-rotated replacement.
//!
//! # Examples
//!
//! ```rust
//! use ordtree::map::TreeMap;
//!
//! let mut map = TreeMap::new();
//! map.insert(3, "three");
//! map.insert(1, "one");
//! map.insert(2, "two");
//!
//! // Keys are always in sorted order
//! let keys: Vec<&i32> = map.keys().collect();
//! assert_eq!(keys, vec![&1, &2, &3]);
//! ```

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;

// =============================================================================
// Color Definition
// =============================================================================

/// The color of a Red-Black Tree link, stored on the child node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Color {
    Red,
    Black,
}

impl Color {
    /// Returns the opposite color.
    const fn toggle(self) -> Self {
        match self {
            Self::Red => Self::Black,
            Self::Black => Self::Red,
        }
    }
}

// =============================================================================
// Node Definition
// =============================================================================

/// Internal node structure for the Red-Black Tree.
///
/// A node owns at most two children; an absent child is an empty subtree
/// and counts as black.
#[derive(Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    color: Color,
    left: Option<Box<Self>>,
    right: Option<Box<Self>>,
}

impl<K, V> Node<K, V> {
    /// Creates a new red node with no children.
    ///
    /// New nodes are always red: a fresh entry is a 2-node temporarily
    /// annexed to its parent's 3-node until fix-up resolves it.
    const fn new_red(key: K, value: V) -> Self {
        Self {
            key,
            value,
            color: Color::Red,
            left: None,
            right: None,
        }
    }

    /// Checks if the link into this node is red.
    fn is_red(&self) -> bool {
        self.color == Color::Red
    }
}

/// Helper function to check if an optional node is red.
///
/// Empty subtrees are black.
fn is_red<K, V>(node: Option<&Node<K, V>>) -> bool {
    node.is_some_and(Node::is_red)
}

// =============================================================================
// TreeMap Definition
// =============================================================================

/// A mutable ordered map based on a left-leaning Red-Black Tree.
///
/// `TreeMap` keeps entries sorted by key and guarantees logarithmic time
/// for every single-key operation, regardless of insertion order.
///
/// Keys must implement `Ord`. Lookups additionally accept any borrowed form
/// of the key type whose ordering matches the owned form, mirroring the
/// standard library map APIs.
///
/// # Time Complexity
///
/// | Operation      | Complexity        |
/// |----------------|-------------------|
/// | `new`          | O(1)              |
/// | `get`          | O(log N)          |
/// | `insert`       | O(log N)          |
/// | `remove`       | O(log N)          |
/// | `contains_key` | O(log N)          |
/// | `min`/`max`    | O(log N)          |
/// | `contains_value` | O(N)            |
/// | `len`          | O(1)              |
/// | `is_empty`     | O(1)              |
///
/// # Examples
///
/// ```rust
/// use ordtree::map::TreeMap;
///
/// let mut map = TreeMap::new();
/// map.insert(42, "answer");
/// assert_eq!(map.get(&42), Some(&"answer"));
///
/// // Ordered iteration
/// map.insert(7, "seven");
/// map.insert(99, "ninety-nine");
///
/// let keys: Vec<&i32> = map.keys().collect();
/// assert_eq!(keys, vec![&7, &42, &99]);
/// ```
#[derive(Clone)]
pub struct TreeMap<K, V> {
    /// Root node of the tree
    root: Option<Box<Node<K, V>>>,
    /// Number of distinct keys
    length: usize,
}

impl<K, V> TreeMap<K, V> {
    /// Creates a new empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::map::TreeMap;
    ///
    /// let map: TreeMap<i32, String> = TreeMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            root: None,
            length: 0,
        }
    }

    /// Returns the number of entries in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::map::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(1, "one");
    /// map.insert(2, "two");
    /// assert_eq!(map.len(), 2);
    /// ```
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the map contains no entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::map::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// assert!(map.is_empty());
    ///
    /// map.insert(1, "one");
    /// assert!(!map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the entry with the minimum key.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::map::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(3, "three");
    /// map.insert(1, "one");
    ///
    /// assert_eq!(map.min(), Some((&1, &"one")));
    /// ```
    #[must_use]
    pub fn min(&self) -> Option<(&K, &V)> {
        let mut current = self.root.as_deref()?;
        while let Some(left) = current.left.as_deref() {
            current = left;
        }
        Some((&current.key, &current.value))
    }

    /// Returns the entry with the maximum key.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::map::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(3, "three");
    /// map.insert(5, "five");
    ///
    /// assert_eq!(map.max(), Some((&5, &"five")));
    /// ```
    #[must_use]
    pub fn max(&self) -> Option<(&K, &V)> {
        let mut current = self.root.as_deref()?;
        while let Some(right) = current.right.as_deref() {
            current = right;
        }
        Some((&current.key, &current.value))
    }

    /// Returns `true` if some entry stores the given value.
    ///
    /// Values carry no ordering within the tree, so this walks every node.
    /// A stored value that happens to equal `None` (for maps whose value
    /// type is itself an `Option`) is an ordinary value and is found like
    /// any other.
    ///
    /// # Complexity
    ///
    /// O(N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::map::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert("a", 1);
    ///
    /// assert!(map.contains_value(&1));
    /// assert!(!map.contains_value(&2));
    /// ```
    #[must_use]
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        Self::node_contains_value(self.root.as_deref(), value)
    }

    /// Recursive helper for `contains_value`.
    fn node_contains_value(node: Option<&Node<K, V>>, value: &V) -> bool
    where
        V: PartialEq,
    {
        node.is_some_and(|node| {
            node.value == *value
                || Self::node_contains_value(node.left.as_deref(), value)
                || Self::node_contains_value(node.right.as_deref(), value)
        })
    }

    /// Collects all keys into an ordered set.
    ///
    /// Duplicates are impossible by construction, so the set always has
    /// exactly `len()` elements.
    ///
    /// # Complexity
    ///
    /// O(N) time and space
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::map::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(2, "two");
    /// map.insert(1, "one");
    ///
    /// let keys = map.key_set();
    /// assert!(keys.contains(&1));
    /// assert!(keys.contains(&2));
    /// assert_eq!(keys.len(), 2);
    /// ```
    #[must_use]
    pub fn key_set(&self) -> BTreeSet<K>
    where
        K: Clone + Ord,
    {
        self.keys().cloned().collect()
    }

    /// Returns an iterator over entries in sorted key order.
    ///
    /// The iterator materializes the whole in-order traversal up front and
    /// then walks a cursor over it; it is a one-shot forward cursor sized to
    /// the map at construction time.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::map::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(2, "two");
    /// map.insert(1, "one");
    ///
    /// for (key, value) in map.iter() {
    ///     println!("{key}: {value}");
    /// }
    /// ```
    #[must_use]
    pub fn iter(&self) -> TreeMapIterator<'_, K, V> {
        let mut entries = Vec::with_capacity(self.length);
        Self::collect_entries_in_order(self.root.as_deref(), &mut entries);
        TreeMapIterator {
            entries,
            current_index: 0,
        }
    }

    /// Collects all entries in sorted order (in-order traversal).
    fn collect_entries_in_order<'a>(
        node: Option<&'a Node<K, V>>,
        entries: &mut Vec<(&'a K, &'a V)>,
    ) {
        if let Some(node) = node {
            Self::collect_entries_in_order(node.left.as_deref(), entries);
            entries.push((&node.key, &node.value));
            Self::collect_entries_in_order(node.right.as_deref(), entries);
        }
    }

    /// Returns an iterator over keys in sorted order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::map::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(3, "three");
    /// map.insert(1, "one");
    /// map.insert(2, "two");
    ///
    /// let keys: Vec<&i32> = map.keys().collect();
    /// assert_eq!(keys, vec![&1, &2, &3]);
    /// ```
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over values in key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::map::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(1, 10);
    /// map.insert(2, 20);
    /// map.insert(3, 30);
    ///
    /// let sum: i32 = map.values().sum();
    /// assert_eq!(sum, 60);
    /// ```
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// In-order traversal that moves entries out of the tree.
    fn drain_entries_in_order(node: Option<Box<Node<K, V>>>, entries: &mut Vec<(K, V)>) {
        if let Some(node) = node {
            let Node {
                key,
                value,
                left,
                right,
                ..
            } = *node;
            Self::drain_entries_in_order(left, entries);
            entries.push((key, value));
            Self::drain_entries_in_order(right, entries);
        }
    }
}

impl<K: Ord, V> TreeMap<K, V> {
    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the
    /// ordering on the borrowed form must match the ordering on the key type.
    ///
    /// An absent key yields `None`. A map whose value type is itself an
    /// `Option` distinguishes a stored `None` (`Some(&None)`) from an absent
    /// key (`None`).
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::map::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert("hello".to_string(), 42);
    ///
    /// // Can use &str to look up String keys
    /// assert_eq!(map.get("hello"), Some(&42));
    /// assert_eq!(map.get("world"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            match key.cmp(node.key.borrow()) {
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Greater => current = node.right.as_deref(),
                Ordering::Equal => return Some(&node.value),
            }
        }
        None
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::map::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(1, 10);
    ///
    /// if let Some(value) = map.get_mut(&1) {
    ///     *value += 5;
    /// }
    /// assert_eq!(map.get(&1), Some(&15));
    /// ```
    #[must_use]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            match key.cmp(node.key.borrow()) {
                Ordering::Less => current = node.left.as_deref_mut(),
                Ordering::Greater => current = node.right.as_deref_mut(),
                Ordering::Equal => return Some(&mut node.value),
            }
        }
        None
    }

    /// Returns `true` if the map contains an entry for the specified key.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::map::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert("key".to_string(), 42);
    ///
    /// assert!(map.contains_key("key"));
    /// assert!(!map.contains_key("other"));
    /// ```
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contains the key, the value is replaced and the
    /// previous value is returned; the length does not change. A genuine
    /// insertion returns `None` and grows the map by one.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::map::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// assert_eq!(map.insert(1, "one"), None);
    /// assert_eq!(map.insert(1, "ONE"), Some("one"));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let (mut root, previous) = Self::insert_node(self.root.take(), key, value);
        root.color = Color::Black;
        self.root = Some(root);
        if previous.is_none() {
            self.length += 1;
        }
        previous
    }

    /// Recursive helper for insert.
    ///
    /// Returns the replacement subtree and the previous value when the key
    /// was already present.
    fn insert_node(
        node: Option<Box<Node<K, V>>>,
        key: K,
        value: V,
    ) -> (Box<Node<K, V>>, Option<V>) {
        let Some(mut node) = node else {
            return (Box::new(Node::new_red(key, value)), None);
        };

        let previous = match key.cmp(&node.key) {
            Ordering::Less => {
                let (left, previous) = Self::insert_node(node.left.take(), key, value);
                node.left = Some(left);
                previous
            }
            Ordering::Greater => {
                let (right, previous) = Self::insert_node(node.right.take(), key, value);
                node.right = Some(right);
                previous
            }
            Ordering::Equal => Some(mem::replace(&mut node.value, value)),
        };

        (Self::fix_up(node), previous)
    }

    /// Restores the LLRB invariants at a node on the insertion path.
    ///
    /// Applied bottom-up on the unwind, in fixed order: eliminate a
    /// right-leaning red link, then two left-leaning reds in a row, then
    /// split a temporary 4-node by flipping colors.
    fn fix_up(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        if is_red(node.right.as_deref()) && !is_red(node.left.as_deref()) {
            node = Self::rotate_left(node);
        }
        if node
            .left
            .as_deref()
            .is_some_and(|left| left.is_red() && is_red(left.left.as_deref()))
        {
            node = Self::rotate_right(node);
        }
        if is_red(node.left.as_deref()) && is_red(node.right.as_deref()) {
            Self::flip_colors(&mut node);
        }
        node
    }

    /// Removes a key from the map, returning the stored value.
    ///
    /// An absent key is a no-op returning `None`, not an error.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordtree::map::TreeMap;
    ///
    /// let mut map = TreeMap::new();
    /// map.insert(1, "one");
    /// map.insert(2, "two");
    ///
    /// assert_eq!(map.remove(&1), Some("one"));
    /// assert_eq!(map.remove(&1), None);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if !self.contains_key(key) {
            return None;
        }

        // Permit the first push-down: a root with two black children
        // temporarily turns red.
        if let Some(root) = self.root.as_deref_mut()
            && !is_red(root.left.as_deref())
            && !is_red(root.right.as_deref())
        {
            root.color = Color::Red;
        }

        let (root, removed) = Self::remove_node(self.root.take(), key);
        self.root = root;
        if let Some(root) = self.root.as_deref_mut() {
            root.color = Color::Black;
        }
        if removed.is_some() {
            self.length -= 1;
        }
        removed
    }

    /// Recursive helper for remove.
    ///
    /// Pushes red links downward ahead of the descent so that the node
    /// physically detached is never a lone black node, then rebalances on
    /// every unwind step.
    fn remove_node<Q>(
        node: Option<Box<Node<K, V>>>,
        key: &Q,
    ) -> (Option<Box<Node<K, V>>>, Option<V>)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(mut node) = node else {
            return (None, None);
        };

        let removed;
        if key < node.key.borrow() {
            if node.left.is_none() {
                // The key is not in the tree; nothing to detach.
                removed = None;
            } else {
                if node
                    .left
                    .as_deref()
                    .is_some_and(|left| !left.is_red() && !is_red(left.left.as_deref()))
                {
                    node = Self::move_red_left(node);
                }
                let (left, value) = Self::remove_node(node.left.take(), key);
                node.left = left;
                removed = value;
            }
        } else {
            if is_red(node.left.as_deref()) {
                node = Self::rotate_right(node);
            }
            if key == node.key.borrow() && node.right.is_none() {
                // A matching node with no right child is a real leaf in the
                // transformed tree; detach it outright.
                return (None, Some(node.value));
            }
            if node
                .right
                .as_deref()
                .is_some_and(|right| !right.is_red() && !is_red(right.left.as_deref()))
            {
                node = Self::move_red_right(node);
            }
            if key == node.key.borrow() {
                // Replace this node's entry with its in-order successor and
                // remove that successor from the right subtree instead.
                let (right, successor) = Self::remove_min_node(node.right.take());
                node.right = right;
                removed = successor.map(|successor| {
                    node.key = successor.key;
                    mem::replace(&mut node.value, successor.value)
                });
            } else {
                let (right, value) = Self::remove_node(node.right.take(), key);
                node.right = right;
                removed = value;
            }
        }
        (Some(Self::rebalance(node)), removed)
    }

    /// Removes the minimum node of a subtree, returning it detached.
    ///
    /// Applies the same left push-down discipline as `remove_node`,
    /// specialized for the leftmost path.
    fn remove_min_node(
        node: Option<Box<Node<K, V>>>,
    ) -> (Option<Box<Node<K, V>>>, Option<Node<K, V>>) {
        let Some(mut node) = node else {
            return (None, None);
        };
        if node.left.is_none() {
            return (None, Some(*node));
        }

        if node
            .left
            .as_deref()
            .is_some_and(|left| !left.is_red() && !is_red(left.left.as_deref()))
        {
            node = Self::move_red_left(node);
        }
        let (left, min) = Self::remove_min_node(node.left.take());
        node.left = left;
        (Some(Self::rebalance(node)), min)
    }

    /// Restores the LLRB invariants on the deletion unwind.
    ///
    /// Differs from the insertion fix-up only in its first step: any red
    /// right link is rotated away, even when the left link is red too.
    fn rebalance(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        if is_red(node.right.as_deref()) {
            node = Self::rotate_left(node);
        }
        if node
            .left
            .as_deref()
            .is_some_and(|left| left.is_red() && is_red(left.left.as_deref()))
        {
            node = Self::rotate_right(node);
        }
        if is_red(node.left.as_deref()) && is_red(node.right.as_deref()) {
            Self::flip_colors(&mut node);
        }
        node
    }

    /// Borrows a red link from the right sibling so the left subtree has a
    /// red link to spend on the push-down.
    fn move_red_left(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        Self::flip_colors(&mut node);
        if node
            .right
            .as_deref()
            .is_some_and(|right| is_red(right.left.as_deref()))
        {
            node.right = node.right.take().map(Self::rotate_right);
            node = Self::rotate_left(node);
            Self::flip_colors(&mut node);
        }
        node
    }

    /// Mirror of `move_red_left` for the rightward descent.
    fn move_red_right(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        Self::flip_colors(&mut node);
        if node
            .left
            .as_deref()
            .is_some_and(|left| is_red(left.left.as_deref()))
        {
            node = Self::rotate_right(node);
            Self::flip_colors(&mut node);
        }
        node
    }

    /// Promotes the right child over the node.
    ///
    /// The promoted child inherits the node's color and the node turns red.
    /// Only performed when the right link is actually red; the node comes
    /// back unchanged otherwise. Every fix-up step relies on this gate.
    fn rotate_left(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        match node.right.take() {
            Some(mut pivot) if pivot.is_red() => {
                node.right = pivot.left.take();
                pivot.color = node.color;
                node.color = Color::Red;
                pivot.left = Some(node);
                pivot
            }
            right => {
                node.right = right;
                node
            }
        }
    }

    /// Promotes the left child over the node; mirror of `rotate_left`.
    fn rotate_right(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        match node.left.take() {
            Some(mut pivot) if pivot.is_red() => {
                node.left = pivot.right.take();
                pivot.color = node.color;
                node.color = Color::Red;
                pivot.right = Some(node);
                pivot
            }
            left => {
                node.left = left;
                node
            }
        }
    }

    /// Inverts the color of a node and both its children.
    ///
    /// Represents a split or merge of the equivalent 2-3 tree node. A node
    /// missing a child is never flipped.
    fn flip_colors(node: &mut Node<K, V>) {
        if let (Some(left), Some(right)) = (node.left.as_deref_mut(), node.right.as_deref_mut()) {
            node.color = node.color.toggle();
            left.color = left.color.toggle();
            right.color = right.color.toggle();
        }
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over key-value pairs of a [`TreeMap`].
///
/// The in-order traversal is materialized once at construction; the iterator
/// itself is a forward cursor over that snapshot.
pub struct TreeMapIterator<'a, K, V> {
    entries: Vec<(&'a K, &'a V)>,
    current_index: usize,
}

impl<'a, K, V> Iterator for TreeMapIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_index >= self.entries.len() {
            None
        } else {
            let entry = self.entries[self.current_index];
            self.current_index += 1;
            Some(entry)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.entries.len().saturating_sub(self.current_index);
        (remaining, Some(remaining))
    }
}

impl<K, V> ExactSizeIterator for TreeMapIterator<'_, K, V> {
    fn len(&self) -> usize {
        self.entries.len().saturating_sub(self.current_index)
    }
}

/// An owning iterator over key-value pairs of a [`TreeMap`].
pub struct TreeMapIntoIterator<K, V> {
    entries: std::vec::IntoIter<(K, V)>,
}

impl<K, V> Iterator for TreeMapIntoIterator<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> ExactSizeIterator for TreeMapIntoIterator<K, V> {
    fn len(&self) -> usize {
        self.entries.len()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for TreeMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for TreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for TreeMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> IntoIterator for TreeMap<K, V> {
    type Item = (K, V);
    type IntoIter = TreeMapIntoIterator<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let mut entries = Vec::with_capacity(self.length);
        Self::drain_entries_in_order(self.root, &mut entries);
        TreeMapIntoIterator {
            entries: entries.into_iter(),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a TreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = TreeMapIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for TreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for TreeMap<K, V> {}

/// Computes a hash value for this tree map.
///
/// The hash covers the length and then each entry in key order, so equal
/// maps hash equally regardless of the order their entries were inserted.
impl<K: Hash, V: Hash> Hash for TreeMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        for (key, value) in self {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for TreeMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for TreeMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use std::collections::BTreeMap;

    // =========================================================================
    // Structural Invariant Checker
    // =========================================================================

    /// Asserts every LLRB invariant plus BST order and counter accuracy.
    fn assert_invariants<K: Ord, V>(map: &TreeMap<K, V>) {
        if let Some(root) = map.root.as_deref() {
            assert_eq!(root.color, Color::Black, "root must be black");
        }
        let (_, count) = assert_node_invariants(map.root.as_deref(), false);
        assert_eq!(count, map.length, "length counter out of sync");
    }

    /// Returns (black height, node count) of the subtree.
    fn assert_node_invariants<K: Ord, V>(
        node: Option<&Node<K, V>>,
        parent_red: bool,
    ) -> (usize, usize) {
        let Some(node) = node else {
            return (1, 0);
        };

        if node.is_red() {
            assert!(!parent_red, "two red links in a row");
        }
        assert!(
            !is_red(node.right.as_deref()),
            "right-leaning red link survived fix-up"
        );
        if let Some(left) = node.left.as_deref() {
            assert!(left.key < node.key, "BST order violated on the left");
        }
        if let Some(right) = node.right.as_deref() {
            assert!(right.key > node.key, "BST order violated on the right");
        }

        let (left_height, left_count) = assert_node_invariants(node.left.as_deref(), node.is_red());
        let (right_height, right_count) =
            assert_node_invariants(node.right.as_deref(), node.is_red());
        assert_eq!(left_height, right_height, "black-height mismatch");

        let height = left_height + usize::from(!node.is_red());
        (height, left_count + right_count + 1)
    }

    // =========================================================================
    // Structural Tests
    // =========================================================================

    #[rstest]
    fn test_invariants_hold_for_ascending_insertions() {
        let mut map = TreeMap::new();
        for key in 0..256 {
            map.insert(key, key * 2);
            assert_invariants(&map);
        }
    }

    #[rstest]
    fn test_invariants_hold_for_descending_insertions() {
        let mut map = TreeMap::new();
        for key in (0..256).rev() {
            map.insert(key, key * 2);
            assert_invariants(&map);
        }
    }

    #[rstest]
    fn test_invariants_hold_while_draining() {
        let mut map: TreeMap<i32, i32> = (0..128).map(|key| (key, key)).collect();
        for key in 0..128 {
            map.remove(&key);
            assert_invariants(&map);
        }
        assert!(map.is_empty());
    }

    #[rstest]
    fn test_invariants_hold_for_interleaved_mutation() {
        let mut map = TreeMap::new();
        for round in 0..64 {
            for key in 0..round {
                map.insert(key * 7 % 64, round);
                assert_invariants(&map);
            }
            map.remove(&(round * 3 % 64));
            assert_invariants(&map);
        }
    }

    #[rstest]
    fn test_overwrite_keeps_tree_shape_and_length() {
        let mut map: TreeMap<i32, i32> = (0..64).map(|key| (key, key)).collect();
        for key in 0..64 {
            assert_eq!(map.insert(key, key + 100), Some(key));
            assert_invariants(&map);
        }
        assert_eq!(map.len(), 64);
    }

    #[rstest]
    fn test_rotations_are_gated_on_red_links() {
        // A black right child must not be promoted.
        let node = Box::new(Node {
            key: 2,
            value: (),
            color: Color::Black,
            left: None,
            right: Some(Box::new(Node {
                color: Color::Black,
                ..Node::new_red(3, ())
            })),
        });
        let unchanged = TreeMap::rotate_left(node);
        assert_eq!(unchanged.key, 2);

        let node = Box::new(Node {
            key: 2,
            value: (),
            color: Color::Black,
            left: Some(Box::new(Node::new_red(1, ()))),
            right: None,
        });
        let rotated = TreeMap::rotate_right(node);
        assert_eq!(rotated.key, 1);
        assert_eq!(rotated.color, Color::Black);
        assert!(rotated.right.as_deref().is_some_and(Node::is_red));
    }

    // =========================================================================
    // Property Tests
    // =========================================================================

    proptest! {
        /// Invariants hold after every single mutation of a random
        /// insert/remove interleaving, and the content always matches a
        /// model map driven by the same operations.
        #[test]
        fn prop_invariants_after_random_operations(
            operations in prop::collection::vec((any::<bool>(), 0u8..64), 0..300)
        ) {
            let mut map = TreeMap::new();
            let mut model = BTreeMap::new();

            for (insert, key) in operations {
                if insert {
                    prop_assert_eq!(
                        map.insert(key, u16::from(key) * 3),
                        model.insert(key, u16::from(key) * 3)
                    );
                } else {
                    prop_assert_eq!(map.remove(&key), model.remove(&key));
                }
                assert_invariants(&map);
                prop_assert_eq!(map.len(), model.len());
            }

            prop_assert!(map.iter().eq(model.iter()));
        }

        /// Iteration yields keys in strictly ascending order.
        #[test]
        fn prop_iteration_is_strictly_ascending(
            keys in prop::collection::vec(any::<i32>(), 0..100)
        ) {
            let map: TreeMap<i32, ()> = keys.into_iter().map(|key| (key, ())).collect();
            let collected: Vec<&i32> = map.keys().collect();
            prop_assert!(collected.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }
}
