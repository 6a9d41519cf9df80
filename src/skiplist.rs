//! A skiplist which keeps its elements ordered and can report the rank of any
//! element, or the element at any rank, in `O(log(n))` expected time.

use std::{borrow::Borrow, fmt, hash::Hash, iter};

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::{
    MAX_LEVEL,
    element::Element,
    error::Error,
    level_generator::{LevelGenerator, geometric::Geometric},
    skipnode::{Iter, Node, NodeId, Nodes, SkipLevel, SkipNode},
};

// ////////////////////////////////////////////////////////////////////////////
// SkipList
// ////////////////////////////////////////////////////////////////////////////

/// A skiplist keeps its elements sorted by [`Element::less`] and provides an
/// efficient way to insert and delete them, to convert between elements and
/// their 1-based rank, and to find a node by its [`Element::key`].
///
/// Positions inside the list are written as `Option<usize>`: `Some` is a slot
/// of the node arena and `None` is the header, which sits before the first
/// node and always has the full number of levels.
///
/// The list performs no deduplication. Inserting a value equivalent to one
/// already present stores a second, independent node; the relative order of
/// equivalent values is unspecified.
pub struct SkipList<T: Element, G = Geometric> {
    // The header's tower. Levels at or above `level` are not maintained.
    head: Vec<SkipLevel>,
    nodes: Nodes<T>,
    tail: Option<usize>,
    // Highest level in use, at least 1.
    level: usize,
    len: usize,
    // Every linked slot, grouped by key, oldest first.
    keys: FxHashMap<T::Key, Vec<usize>>,
    level_generator: G,
}

/// Snapshot of a descent: the last node visited on each level, and the rank
/// of that node.
struct Path {
    update: [Option<usize>; MAX_LEVEL],
    rank: [usize; MAX_LEVEL],
}

impl Path {
    fn new() -> Self {
        Path {
            update: [None; MAX_LEVEL],
            rank: [0; MAX_LEVEL],
        }
    }
}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl<T: Element> SkipList<T> {
    /// Create a new skiplist with [`MAX_LEVEL`] levels, where each node reaches
    /// one level higher with probability `1 / BRANCH`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_skiplist::SkipList;
    ///
    /// let skiplist: SkipList<i64> = SkipList::new();
    /// assert!(skiplist.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_level_generator(Geometric::default())
    }
}

impl<T: Element, G: LevelGenerator> SkipList<T, G> {
    /// Create a new skiplist whose node heights are drawn from
    /// `level_generator`.
    ///
    /// The header is given `level_generator.total()` levels, clamped to
    /// `1..=MAX_LEVEL`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_skiplist::{Geometric, SkipList};
    ///
    /// let generator = Geometric::with_seed(8, 0.5, 42).unwrap();
    /// let mut skiplist = SkipList::with_level_generator(generator);
    /// skiplist.extend(0..100_u32);
    /// assert_eq!(skiplist.len(), 100);
    /// ```
    #[inline]
    #[must_use]
    pub fn with_level_generator(level_generator: G) -> Self {
        let total = level_generator.total().clamp(1, MAX_LEVEL);
        SkipList {
            head: iter::repeat_n(SkipLevel::default(), total).collect(),
            nodes: Nodes::new(),
            tail: None,
            level: 1,
            len: 0,
            keys: FxHashMap::default(),
            level_generator,
        }
    }

    /// Clears the skiplist, removing all values and every key from the index.
    ///
    /// Node handles issued before the clear no longer resolve.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_skiplist::SkipList;
    ///
    /// let mut skiplist = SkipList::new();
    /// skiplist.extend(0..10_u32);
    /// skiplist.clear();
    /// assert!(skiplist.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.head.fill(SkipLevel::default());
        self.nodes.clear();
        self.keys.clear();
        self.tail = None;
        self.level = 1;
        self.len = 0;
        debug!("skiplist cleared");
    }

    /// Returns the number of elements in the skiplist.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the skiplist contains no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert the value into the skiplist and return a handle to its node.
    ///
    /// The node is also indexed under `value.key()`. While several nodes share
    /// a key, lookups by that key return the most recently inserted of them.
    ///
    /// Callers are expected to check that no equivalent value is present; an
    /// equivalent value is stored as an additional node.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_skiplist::SkipList;
    ///
    /// let mut skiplist = SkipList::new();
    /// let id = skiplist.insert(5_u32);
    /// skiplist.insert(1);
    /// assert_eq!(skiplist.get(id), Some(&5));
    /// assert_eq!(skiplist.get_rank(&5), Some(2));
    /// ```
    pub fn insert(&mut self, value: T) -> NodeId {
        let mut path = self.descend(&value);

        let height = self.level_generator.level().clamp(1, self.head.len());
        if height > self.level {
            // The new levels were empty, so the header spans the whole list.
            for i in self.level..height {
                path.rank[i] = 0;
                path.update[i] = None;
                self.head[i].span = self.len;
            }
            debug!(from = self.level, to = height, "skiplist level grew");
            self.level = height;
        }

        let key = value.key();
        let index = self.nodes.insert(SkipNode::new(value, height));
        for i in 0..height {
            let prev = path.update[i];
            let crossed = path.rank[0] - path.rank[i];
            let link = self.links(prev)[i];
            self.nodes[index].levels[i] = SkipLevel {
                forward: link.forward,
                span: link.span - crossed,
            };
            self.links_mut(prev)[i] = SkipLevel {
                forward: Some(index),
                span: crossed + 1,
            };
        }
        // Levels the new node does not reach still jump over one more node.
        for i in height..self.level {
            self.links_mut(path.update[i])[i].span += 1;
        }

        self.nodes[index].backward = path.update[0];
        match self.nodes[index].levels[0].forward {
            Some(next) => self.nodes[next].backward = Some(index),
            None => self.tail = Some(index),
        }
        self.keys.entry(key).or_default().push(index);
        self.len += 1;

        trace!(height, len = self.len, "inserted node");
        self.nodes.id(index)
    }

    /// Removes and returns the first value equivalent to `value`, or `None` if
    /// there is no such value.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_skiplist::SkipList;
    ///
    /// let mut skiplist = SkipList::new();
    /// skiplist.extend(0..10_u32);
    /// assert_eq!(skiplist.delete(&4), Some(4));
    /// assert!(skiplist.delete(&4).is_none());
    /// assert_eq!(skiplist.len(), 9);
    /// ```
    pub fn delete(&mut self, value: &T) -> Option<T> {
        let path = self.descend(value);
        let index = self.links(path.update[0])[0].forward?;
        if value.less(&self.nodes[index].value) {
            return None;
        }
        self.unlink(index, &path)
    }

    /// Removes the node behind `id` and returns its value.
    ///
    /// Returns `None` if the handle is stale, or if the node is not the first
    /// of the values equivalent to its own (which can only happen when
    /// equivalent values were inserted).
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_skiplist::SkipList;
    ///
    /// let mut skiplist = SkipList::new();
    /// let id = skiplist.insert(3_u32);
    /// assert_eq!(skiplist.remove(id), Some(3));
    /// assert!(skiplist.remove(id).is_none());
    /// ```
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        let index = self.nodes.resolve(id)?;
        let path = self.descend(&self.nodes[index].value);
        if self.links(path.update[0])[0].forward != Some(index) {
            return None;
        }
        self.unlink(index, &path)
    }

    /// Returns the first node whose value is equivalent to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no such node exists.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_skiplist::{Error, SkipList};
    ///
    /// let mut skiplist = SkipList::new();
    /// skiplist.extend([10_u32, 20, 30]);
    /// assert_eq!(skiplist.find(&20).map(|node| *node.value()), Ok(20));
    /// assert_eq!(skiplist.find(&25).err(), Some(Error::NotFound));
    /// ```
    pub fn find(&self, value: &T) -> Result<Node<'_, T>, Error> {
        let path = self.descend(value);
        match self.links(path.update[0])[0].forward {
            Some(index) if !value.less(&self.nodes[index].value) => Ok(self.node_at(index)),
            _ => Err(Error::NotFound),
        }
    }

    /// Returns `true` if a value equivalent to `value` is in the skiplist.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.find(value).is_ok()
    }

    /// Returns the 1-based rank of a value equivalent to `value`, or `None` if
    /// there is no such value.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_skiplist::SkipList;
    ///
    /// let mut skiplist = SkipList::new();
    /// skiplist.extend([30_u32, 10, 20]);
    /// assert_eq!(skiplist.get_rank(&10), Some(1));
    /// assert_eq!(skiplist.get_rank(&30), Some(3));
    /// assert_eq!(skiplist.get_rank(&40), None);
    /// ```
    #[must_use]
    pub fn get_rank(&self, value: &T) -> Option<usize> {
        let mut at = None;
        let mut rank = 0;
        for i in (0..self.level).rev() {
            loop {
                let link = self.links(at)[i];
                match link.forward {
                    Some(next) if self.nodes[next].value.less(value) => {
                        rank += link.span;
                        at = Some(next);
                    }
                    Some(next) if self.nodes[next].value.equivalent(value) => {
                        return Some(rank + link.span);
                    }
                    _ => break,
                }
            }
        }
        None
    }

    /// Returns the node at the given 1-based rank, or `None` if the rank is
    /// zero or greater than the length of the list.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_skiplist::SkipList;
    ///
    /// let mut skiplist = SkipList::new();
    /// skiplist.extend([30_u32, 10, 20]);
    /// assert_eq!(skiplist.get_node_by_rank(2).map(|node| *node.value()), Some(20));
    /// assert!(skiplist.get_node_by_rank(0).is_none());
    /// assert!(skiplist.get_node_by_rank(4).is_none());
    /// ```
    #[must_use]
    pub fn get_node_by_rank(&self, rank: usize) -> Option<Node<'_, T>> {
        let mut at = None;
        let mut traversed = 0;
        for i in (0..self.level).rev() {
            loop {
                let link = self.links(at)[i];
                match link.forward {
                    Some(next) if traversed + link.span <= rank => {
                        traversed += link.span;
                        at = Some(next);
                    }
                    _ => break,
                }
            }
            if traversed == rank {
                return at.map(|index| self.node_at(index));
            }
        }
        None
    }

    /// Returns the value at the given 1-based rank.
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<&T> {
        self.get_node_by_rank(rank).map(|node| node.value())
    }

    /// Returns the node indexed under `key`.
    ///
    /// If several nodes share the key, the most recently inserted one that is
    /// still in the list is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if no node is indexed under `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_skiplist::{Error, SkipList};
    ///
    /// let mut skiplist = SkipList::new();
    /// skiplist.insert(String::from("b"));
    /// assert!(skiplist.get_node_by_key("b").is_ok());
    /// assert_eq!(skiplist.get_node_by_key("a").err(), Some(Error::KeyNotFound));
    /// ```
    pub fn get_node_by_key<Q>(&self, key: &Q) -> Result<Node<'_, T>, Error>
    where
        T::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.keys
            .get(key)
            .and_then(|slots| slots.last())
            .map(|&index| self.node_at(index))
            .ok_or(Error::KeyNotFound)
    }

    /// Returns the node behind `id`, or `None` if it has been removed.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<Node<'_, T>> {
        self.nodes.resolve(id).map(|index| self.node_at(index))
    }

    /// Returns the value behind `id`, or `None` if it has been removed.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.node(id).map(|node| node.value())
    }

    /// Returns the first node, or `None` if the skiplist is empty.
    #[inline]
    #[must_use]
    pub fn front(&self) -> Option<Node<'_, T>> {
        self.head[0].forward.map(|index| self.node_at(index))
    }

    /// Returns the last node, or `None` if the skiplist is empty.
    #[inline]
    #[must_use]
    pub fn back(&self) -> Option<Node<'_, T>> {
        self.tail.map(|index| self.node_at(index))
    }

    /// Removes the first element and returns it, or `None` if the skiplist is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_skiplist::SkipList;
    ///
    /// let mut skiplist = SkipList::new();
    /// skiplist.extend([2_u32, 1]);
    /// assert_eq!(skiplist.pop_front(), Some(1));
    /// assert_eq!(skiplist.pop_front(), Some(2));
    /// assert!(skiplist.pop_front().is_none());
    /// ```
    pub fn pop_front(&mut self) -> Option<T> {
        self.remove_rank(1)
    }

    /// Removes the last element and returns it, or `None` if the skiplist is
    /// empty.
    pub fn pop_back(&mut self) -> Option<T> {
        self.remove_rank(self.len)
    }

    /// Creates an iterator over the values of the skiplist, in ascending
    /// order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_skiplist::SkipList;
    ///
    /// let skiplist: SkipList<u32> = [3, 1, 2].into_iter().collect();
    /// assert!(skiplist.iter().eq(&[1, 2, 3]));
    /// assert!(skiplist.iter().rev().eq(&[3, 2, 1]));
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            first: self.head[0].forward,
            last: self.tail,
            size: self.len,
        }
    }
}

// ///////////////////////////////////////////////
// Internal methods
// ///////////////////////////////////////////////

impl<T: Element, G: LevelGenerator> SkipList<T, G> {
    fn links(&self, at: Option<usize>) -> &[SkipLevel] {
        match at {
            Some(index) => &self.nodes[index].levels,
            None => &self.head,
        }
    }

    fn links_mut(&mut self, at: Option<usize>) -> &mut [SkipLevel] {
        match at {
            Some(index) => &mut self.nodes[index].levels,
            None => &mut self.head,
        }
    }

    fn node_at(&self, index: usize) -> Node<'_, T> {
        Node {
            nodes: &self.nodes,
            index,
        }
    }

    /// Walk down from the header, advancing on each level while the next value
    /// is less than `value`.
    ///
    /// Afterwards `update[i]` is the last position visited on level `i` and
    /// `rank[i]` its rank, so the link `update[0] -> forward` at level 0
    /// leads to the first value not less than `value`.
    fn descend(&self, value: &T) -> Path {
        let mut path = Path::new();
        let mut at = None;
        for i in (0..self.level).rev() {
            if i + 1 < self.level {
                path.rank[i] = path.rank[i + 1];
            }
            loop {
                let link = self.links(at)[i];
                match link.forward {
                    Some(next) if self.nodes[next].value.less(value) => {
                        path.rank[i] += link.span;
                        at = Some(next);
                    }
                    _ => break,
                }
            }
            path.update[i] = at;
        }
        path
    }

    /// Like [`descend`][Self::descend], but stops in front of the node at the
    /// given rank instead of in front of a value.
    fn descend_to_rank(&self, rank: usize) -> Path {
        let mut path = Path::new();
        let mut at = None;
        let mut traversed = 0;
        for i in (0..self.level).rev() {
            loop {
                let link = self.links(at)[i];
                match link.forward {
                    Some(next) if traversed + link.span < rank => {
                        traversed += link.span;
                        at = Some(next);
                    }
                    _ => break,
                }
            }
            path.update[i] = at;
            path.rank[i] = traversed;
        }
        path
    }

    fn remove_rank(&mut self, rank: usize) -> Option<T> {
        if rank == 0 {
            return None;
        }
        let path = self.descend_to_rank(rank);
        let index = self.links(path.update[0])[0].forward?;
        self.unlink(index, &path)
    }

    /// Unsplice the node at `index` from every level, `path` holding its
    /// predecessors.
    fn unlink(&mut self, index: usize, path: &Path) -> Option<T> {
        let node = self.nodes.remove(index)?;

        for i in 0..self.level {
            let prev = path.update[i];
            let link = self.links(prev)[i];
            if link.forward == Some(index) {
                self.links_mut(prev)[i] = SkipLevel {
                    forward: node.levels[i].forward,
                    span: link.span + node.levels[i].span - 1,
                };
            } else {
                self.links_mut(prev)[i].span -= 1;
            }
        }

        match node.levels[0].forward {
            Some(next) => self.nodes[next].backward = node.backward,
            None => self.tail = node.backward,
        }

        let level = self.level;
        while self.level > 1 && self.head[self.level - 1].forward.is_none() {
            self.level -= 1;
        }
        if level != self.level {
            debug!(from = level, to = self.level, "skiplist level shrank");
        }
        self.len -= 1;

        let key = node.value.key();
        if let Some(slots) = self.keys.get_mut(&key) {
            slots.retain(|&slot| slot != index);
            if slots.is_empty() {
                self.keys.remove(&key);
            }
        }

        trace!(height = node.levels.len(), len = self.len, "removed node");
        Some(node.value)
    }
}

#[cfg(test)]
impl<T: Element, G: LevelGenerator> SkipList<T, G> {
    /// Checks the integrity of the skiplist.
    pub(crate) fn check(&self) {
        use std::collections::HashMap;

        assert!((1..=self.head.len()).contains(&self.level));

        // Level 0 visits every node once, in order, mirrored by the back links.
        let mut position = HashMap::new();
        let mut prev = None;
        let mut cursor = self.head[0].forward;
        let mut max_height = 1;
        while let Some(index) = cursor {
            let node = &self.nodes[index];
            assert_eq!(node.backward, prev, "broken backward link");
            if let Some(prev) = prev {
                assert!(
                    !node.value.less(&self.nodes[prev].value),
                    "level 0 out of order"
                );
            }
            max_height = max_height.max(node.height());
            position.insert(index, position.len() + 1);
            prev = cursor;
            cursor = node.levels[0].forward;
        }
        assert_eq!(position.len(), self.len);
        assert_eq!(self.tail, prev);
        assert_eq!(self.level, max_height);

        // Every span is the level-0 distance it covers.
        for i in 0..self.level {
            let mut at = None;
            let mut pos = 0;
            let mut seen = 0;
            loop {
                let link = self.links(at)[i];
                if let Some(next) = link.forward {
                    let next_pos = position[&next];
                    assert!(next_pos > pos, "level {i} goes backwards");
                    assert_eq!(link.span, next_pos - pos, "wrong span on level {i}");
                    seen += 1;
                    at = Some(next);
                    pos = next_pos;
                } else {
                    assert_eq!(link.span, self.len - pos, "wrong end span on level {i}");
                    break;
                }
            }
            let expected = position
                .keys()
                .filter(|&&index| self.nodes[index].height() > i)
                .count();
            assert_eq!(seen, expected, "level {i} skips a node");
        }
        for link in &self.head[self.level..] {
            assert!(link.forward.is_none());
        }

        // The key index names exactly the linked nodes, each once, under its
        // own key.
        let mut indexed = 0;
        for (key, slots) in &self.keys {
            assert!(!slots.is_empty(), "key index holds an empty entry");
            for index in slots {
                assert!(position.contains_key(index), "key index holds a dead node");
                assert!(self.nodes[*index].value.key() == *key);
            }
            indexed += slots.len();
        }
        assert_eq!(indexed, self.len, "key index has duplicate slots");
        for &index in position.keys() {
            let key = self.nodes[index].value.key();
            assert!(
                self.keys.get(&key).is_some_and(|slots| slots.contains(&index)),
                "key index misses a node"
            );
        }
    }
}

// ///////////////////////////////////////////////
// Trait implementation
// ///////////////////////////////////////////////

impl<T: Element, G: LevelGenerator + Default> Default for SkipList<T, G> {
    fn default() -> Self {
        SkipList::with_level_generator(G::default())
    }
}

impl<T: Element, G: LevelGenerator> Extend<T> for SkipList<T, G> {
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iterable: I) {
        for element in iterable {
            self.insert(element);
        }
    }
}

impl<T: Element, G: LevelGenerator + Default> FromIterator<T> for SkipList<T, G> {
    #[inline]
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut skiplist = SkipList::default();
        skiplist.extend(iter);
        skiplist
    }
}

impl<'a, T: Element, G: LevelGenerator> IntoIterator for &'a SkipList<T, G> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T, G> fmt::Debug for SkipList<T, G>
where
    T: Element + fmt::Debug,
    G: LevelGenerator,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Tests
// ////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use anyhow::Result;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    use super::SkipList;
    use crate::{Error, Geometric, LevelGenerator, MAX_LEVEL, skipnode::SkipLevel};

    /// Hands out a fixed sequence of heights, repeating it when exhausted.
    struct Scripted {
        heights: Vec<usize>,
        next: usize,
    }

    impl Scripted {
        fn new(heights: &[usize]) -> Self {
            Scripted {
                heights: heights.to_vec(),
                next: 0,
            }
        }
    }

    impl LevelGenerator for Scripted {
        fn total(&self) -> usize {
            MAX_LEVEL
        }

        fn level(&mut self) -> usize {
            let height = self.heights[self.next % self.heights.len()];
            self.next += 1;
            height
        }
    }

    fn seeded(seed: u64) -> SkipList<u32> {
        SkipList::with_level_generator(Geometric::with_seed(MAX_LEVEL, 0.25, seed).unwrap())
    }

    #[test]
    fn empty() {
        let mut sl: SkipList<u32> = SkipList::new();
        sl.check();
        assert!(sl.is_empty());
        assert!(sl.front().is_none());
        assert!(sl.back().is_none());
        assert_eq!(sl.get_rank(&1), None);
        assert!(sl.get_node_by_rank(0).is_none());
        assert!(sl.get_node_by_rank(1).is_none());
        assert_eq!(sl.find(&1).err(), Some(Error::NotFound));
        assert_eq!(sl.get_node_by_key(&1).err(), Some(Error::KeyNotFound));
        assert!(sl.delete(&1).is_none());
        assert!(sl.pop_front().is_none());
        assert!(sl.pop_back().is_none());
        sl.check();
    }

    #[test]
    fn basic_small() {
        let mut sl = SkipList::new();
        sl.check();
        assert!(sl.delete(&1).is_none());
        sl.insert(1_i64);
        sl.check();
        assert_eq!(sl.delete(&1), Some(1));
        sl.check();
        sl.insert(1);
        sl.check();
        sl.insert(2);
        sl.check();
        assert_eq!(sl.delete(&1), Some(1));
        sl.check();
        assert_eq!(sl.delete(&2), Some(2));
        sl.check();
        assert!(sl.delete(&1).is_none());
        sl.check();
    }

    #[rstest]
    #[case::ascending((0..1000).collect())]
    #[case::descending((0..1000).rev().collect())]
    #[case::interleaved((0..500).flat_map(|i| [i, 999 - i]).collect())]
    fn insert_orders(#[case] values: Vec<u32>) {
        let mut sl = seeded(1);
        for (i, &v) in values.iter().enumerate() {
            sl.insert(v);
            assert_eq!(sl.len(), i + 1);
        }
        sl.check();
        assert!(sl.iter().copied().eq(0..1000));
        assert_eq!(sl.front().map(|n| *n.value()), Some(0));
        assert_eq!(sl.back().map(|n| *n.value()), Some(999));
    }

    #[test]
    fn rank_round_trip() {
        let mut sl = seeded(2);
        sl.extend((0..2000_u32).map(|i| (i * 7919) % 2000));
        sl.check();
        for rank in 1..=2000 {
            let node = sl.get_node_by_rank(rank).unwrap();
            let value = *node.value();
            assert_eq!(value as usize, rank - 1);
            assert_eq!(sl.get_rank(&value), Some(rank));
            assert_eq!(sl.get_by_rank(rank), Some(&value));
        }
        assert!(sl.get_node_by_rank(2001).is_none());
        assert_eq!(sl.get_rank(&2000), None);
    }

    #[test]
    fn insert_then_delete_restores_length() {
        let mut sl = seeded(3);
        sl.extend((0..100).map(|i| i * 2));
        for v in [1, 51, 199, 0] {
            let before = sl.len();
            if sl.contains(&v) {
                continue;
            }
            sl.insert(v);
            assert_eq!(sl.len(), before + 1);
            assert_eq!(sl.delete(&v), Some(v));
            assert_eq!(sl.len(), before);
            assert!(!sl.iter().any(|&x| x == v));
            sl.check();
        }
    }

    #[test]
    fn delete_absent_is_noop() {
        let mut sl = seeded(4);
        sl.extend([10, 20, 30]);
        assert!(sl.delete(&15).is_none());
        assert!(sl.delete(&40).is_none());
        assert!(sl.delete(&5).is_none());
        assert_eq!(sl.len(), 3);
        sl.check();
    }

    #[test]
    fn remove_by_id() {
        let mut sl = seeded(5);
        let ids: Vec<_> = (0..50).map(|v| sl.insert(v)).collect();
        for (v, &id) in ids.iter().enumerate().step_by(3) {
            assert_eq!(sl.remove(id), Some(v as u32));
            assert!(sl.remove(id).is_none());
            assert!(sl.node(id).is_none());
            sl.check();
        }
        assert_eq!(sl.len(), 50 - 17);

        // A reused slot must not answer to the old handle.
        let fresh = sl.insert(100);
        assert!(ids.iter().all(|&id| id != fresh));
        assert!(sl.remove(ids[0]).is_none());
        assert_eq!(sl.get(fresh), Some(&100));
    }

    #[test]
    fn backward_chain_mirrors_forward() {
        let mut sl = seeded(6);
        sl.extend((0..300).map(|i| (i * 37) % 300));
        for v in (0..300).step_by(7) {
            sl.delete(&v);
        }
        sl.check();

        let forward: Vec<u32> = sl.iter().copied().collect();
        let mut backward = Vec::new();
        let mut node = sl.back();
        while let Some(n) = node {
            backward.push(*n.value());
            node = n.prev();
        }
        backward.reverse();
        assert_eq!(forward, backward);
        assert!(sl.iter().rev().copied().eq(forward.iter().rev().copied()));

        let mut walked = Vec::new();
        let mut node = sl.front();
        while let Some(n) = node {
            walked.push(*n.value());
            node = n.next();
        }
        assert_eq!(forward, walked);
    }

    #[test]
    fn spans_follow_heights() {
        let mut sl = SkipList::with_level_generator(Scripted::new(&[2, 1, 3]));
        sl.extend([10_u32, 20, 30]);
        sl.check();

        assert_eq!(sl.level, 3);
        assert_eq!(sl.head[0].span, 1);
        assert_eq!(sl.head[1].span, 1);
        assert_eq!(sl.head[2].span, 3);
        let ten = sl.find(&10).unwrap().index;
        assert_eq!(sl.nodes[ten].levels[1].span, 2);

        assert_eq!(sl.delete(&10), Some(10));
        sl.check();
        let thirty = sl.find(&30).unwrap().index;
        assert_eq!(
            sl.head[1],
            SkipLevel {
                forward: Some(thirty),
                span: 2
            }
        );
        assert_eq!(sl.head[2].span, 2);
    }

    #[test]
    fn level_shrinks() {
        let mut sl = SkipList::with_level_generator(Scripted::new(&[5, 1, 1]));
        sl.extend([1_u32, 2, 3]);
        assert_eq!(sl.level, 5);
        sl.delete(&1);
        sl.check();
        assert_eq!(sl.level, 1);

        // Regrowing a level restarts its header span from the full length.
        sl.insert(4);
        sl.check();
        assert_eq!(sl.level, 5);
        assert_eq!(sl.head[4].span, 3);
    }

    #[test]
    fn key_index_follows_membership() -> Result<()> {
        let mut sl = seeded(7);
        sl.extend([3, 1, 2]);
        assert_eq!(*sl.get_node_by_key(&2)?.value(), 2);
        assert_eq!(sl.delete(&2), Some(2));
        assert_eq!(sl.get_node_by_key(&2).err(), Some(Error::KeyNotFound));
        assert_eq!(sl.pop_front(), Some(1));
        assert_eq!(sl.get_node_by_key(&1).err(), Some(Error::KeyNotFound));
        assert_eq!(*sl.get_node_by_key(&3)?.value(), 3);
        sl.check();
        Ok(())
    }

    #[test]
    fn equivalent_values() {
        let mut sl = seeded(8);
        sl.extend([5, 5, 5, 1, 9]);
        sl.check();
        assert_eq!(sl.len(), 5);
        let rank = sl.get_rank(&5).unwrap();
        assert!((2..=4).contains(&rank));
        for _ in 0..3 {
            assert_eq!(sl.delete(&5), Some(5));
            sl.check();
        }
        assert!(sl.delete(&5).is_none());
        assert!(sl.iter().copied().eq([1, 9]));
    }

    #[test]
    fn shared_key_outlives_one_node() -> Result<()> {
        let mut sl = seeded(11);
        let first = sl.insert(5);
        let second = sl.insert(5);
        sl.check();
        assert_eq!(sl.get_node_by_key(&5)?.id(), second);

        assert_eq!(sl.delete(&5), Some(5));
        sl.check();
        let survivor = if sl.get(first).is_some() { first } else { second };
        assert_eq!(sl.get_node_by_key(&5)?.id(), survivor);

        assert_eq!(sl.remove(survivor), Some(5));
        sl.check();
        assert_eq!(sl.get_node_by_key(&5).err(), Some(Error::KeyNotFound));
        Ok(())
    }

    #[test]
    fn pop() {
        let size = 500;
        let mut sl = seeded(9);
        sl.extend(0..size);
        for i in 0..size / 2 {
            assert_eq!(sl.pop_front(), Some(i));
            assert_eq!(sl.pop_back(), Some(size - i - 1));
            assert_eq!(sl.len() as u32, size - 2 * (i + 1));
        }
        sl.check();
        assert!(sl.is_empty());
        assert!(sl.pop_back().is_none());
    }

    #[test]
    fn clear() {
        let mut sl = seeded(10);
        let id = sl.insert(7);
        sl.extend(0..7);
        sl.clear();
        sl.check();
        assert!(sl.is_empty());
        assert!(sl.get(id).is_none());
        assert_eq!(sl.get_node_by_key(&7).err(), Some(Error::KeyNotFound));

        sl.extend([2, 1]);
        sl.check();
        assert!(sl.get(id).is_none());
        assert!(sl.iter().copied().eq([1, 2]));
    }

    #[test]
    fn iter_mixed() {
        let size = 1000;
        let sl: SkipList<usize> = (0..size).collect();
        let mut iter = sl.iter();
        for i in 0..size / 4 {
            assert_eq!(iter.size_hint(), (size - i * 2, Some(size - i * 2)));
            assert_eq!(iter.next(), Some(&i));
            assert_eq!(iter.next_back(), Some(&(size - i - 1)));
        }
        for i in size / 4..size * 3 / 4 {
            assert_eq!(iter.len(), size * 3 / 4 - i);
            assert_eq!(iter.next(), Some(&i));
        }
        assert!(iter.next().is_none());
        assert!(iter.next_back().is_none());
    }

    #[test]
    fn debug_display() {
        let sl: SkipList<i32> = [3, -1, 2].into_iter().collect();
        assert_snapshot!(format!("{sl:?}"), @"[-1, 2, 3]");
        let empty: SkipList<i32> = SkipList::new();
        assert_snapshot!(format!("{empty:?}"), @"[]");
    }

    #[derive(Debug, Clone, Copy)]
    enum Op {
        Insert(u16),
        Delete(u16),
        PopFront,
        PopBack,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0_u16..256).prop_map(Op::Insert),
            3 => (0_u16..256).prop_map(Op::Delete),
            1 => Just(Op::PopFront),
            1 => Just(Op::PopBack),
        ]
    }

    proptest! {
        #[test]
        fn matches_ordered_set(ops in proptest::collection::vec(op(), 0..300), seed in any::<u64>()) {
            let mut sl = SkipList::with_level_generator(
                Geometric::with_seed(MAX_LEVEL, 0.25, seed).unwrap(),
            );
            let mut model = BTreeSet::new();
            for op in ops {
                match op {
                    Op::Insert(v) => {
                        if model.insert(v) {
                            sl.insert(v);
                        }
                    }
                    Op::Delete(v) => {
                        prop_assert_eq!(sl.delete(&v), model.take(&v));
                    }
                    Op::PopFront => prop_assert_eq!(sl.pop_front(), model.pop_first()),
                    Op::PopBack => prop_assert_eq!(sl.pop_back(), model.pop_last()),
                }
                sl.check();
            }

            prop_assert_eq!(sl.len(), model.len());
            prop_assert!(sl.iter().eq(model.iter()));
            for (i, v) in model.iter().enumerate() {
                prop_assert_eq!(sl.get_rank(v), Some(i + 1));
                prop_assert_eq!(sl.get_by_rank(i + 1), Some(v));
                prop_assert_eq!(sl.get_node_by_key(v).map(|n| *n.value()), Ok(*v));
            }
        }
    }
}
