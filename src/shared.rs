//! A skiplist which can be shared between threads.

use std::{borrow::Borrow, fmt, hash::Hash};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    element::Element,
    error::Error,
    level_generator::{LevelGenerator, geometric::Geometric},
    skiplist::SkipList,
    skipnode::NodeId,
};

/// A [`SkipList`] behind a single reader/writer lock.
///
/// Every call is one complete traversal under the lock. Operations which
/// change the list (insertion, deletion, removal, clearing) take the lock
/// exclusively; every other operation only reads and takes it shared. All
/// traversal scratch space lives on the calling thread's stack, so concurrent
/// readers never interfere with one another.
///
/// Since values cannot be borrowed past the lock, accessors return clones.
/// For anything more involved, [`read`][SharedSkipList::read] and
/// [`write`][SharedSkipList::write] hand out the guarded list itself.
///
/// # Examples
///
/// ```
/// use std::{sync::Arc, thread};
///
/// use ranked_skiplist::SharedSkipList;
///
/// let scores = Arc::new(SharedSkipList::new());
/// let handles: Vec<_> = (0..4_u32)
///     .map(|t| {
///         let scores = Arc::clone(&scores);
///         thread::spawn(move || {
///             for i in 0..100 {
///                 scores.insert(t * 100 + i);
///             }
///         })
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
/// assert_eq!(scores.len(), 400);
/// assert_eq!(scores.get_rank(&250), Some(251));
/// ```
#[expect(
    clippy::module_name_repetitions,
    reason = "`SkipList` is the unlocked engine, so the prefix is what tells them apart."
)]
pub struct SharedSkipList<T: Element, G = Geometric> {
    inner: RwLock<SkipList<T, G>>,
}

impl<T: Element> SharedSkipList<T> {
    /// Create an empty list with the default level generator.
    #[must_use]
    pub fn new() -> Self {
        Self::from(SkipList::new())
    }
}

impl<T: Element, G: LevelGenerator> SharedSkipList<T, G> {
    /// Create an empty list whose node heights are drawn from
    /// `level_generator`.
    #[must_use]
    pub fn with_level_generator(level_generator: G) -> Self {
        Self::from(SkipList::with_level_generator(level_generator))
    }

    /// Remove every value, returning the list to its freshly created state.
    pub fn reset(&self) {
        self.inner.write().clear();
    }

    /// Insert `value` and return a handle to its node.
    ///
    /// See [`SkipList::insert`].
    pub fn insert(&self, value: T) -> NodeId {
        self.inner.write().insert(value)
    }

    /// Remove and return the first value equivalent to `value`.
    ///
    /// See [`SkipList::delete`].
    pub fn delete(&self, value: &T) -> Option<T> {
        self.inner.write().delete(value)
    }

    /// Remove the node behind `id` and return its value.
    ///
    /// See [`SkipList::remove`].
    pub fn remove(&self, id: NodeId) -> Option<T> {
        self.inner.write().remove(id)
    }

    /// Remove and return the first value.
    pub fn pop_front(&self) -> Option<T> {
        self.inner.write().pop_front()
    }

    /// Remove and return the last value.
    pub fn pop_back(&self) -> Option<T> {
        self.inner.write().pop_back()
    }

    /// Return a handle to the first node whose value is equivalent to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such node.
    pub fn find(&self, value: &T) -> Result<NodeId, Error> {
        self.inner.read().find(value).map(|node| node.id())
    }

    /// Returns `true` if a value equivalent to `value` is present.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.inner.read().contains(value)
    }

    /// Return the 1-based rank of a value equivalent to `value`.
    ///
    /// See [`SkipList::get_rank`].
    #[must_use]
    pub fn get_rank(&self, value: &T) -> Option<usize> {
        self.inner.read().get_rank(value)
    }

    /// Return a handle to the node at the given 1-based rank.
    #[must_use]
    pub fn get_node_by_rank(&self, rank: usize) -> Option<NodeId> {
        self.inner.read().get_node_by_rank(rank).map(|node| node.id())
    }

    /// Return a handle to the node indexed under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if no node is indexed under `key`.
    pub fn get_node_by_key<Q>(&self, key: &Q) -> Result<NodeId, Error>
    where
        T::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.read().get_node_by_key(key).map(|node| node.id())
    }

    /// Return a handle to the first node.
    #[must_use]
    pub fn front(&self) -> Option<NodeId> {
        self.inner.read().front().map(|node| node.id())
    }

    /// Return a handle to the last node.
    #[must_use]
    pub fn back(&self) -> Option<NodeId> {
        self.inner.read().back().map(|node| node.id())
    }

    /// Returns the number of values in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns `true` if the list holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Lock the list for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, SkipList<T, G>> {
        self.inner.read()
    }

    /// Lock the list for writing.
    pub fn write(&self) -> RwLockWriteGuard<'_, SkipList<T, G>> {
        self.inner.write()
    }

    /// Consume the lock, returning the list.
    #[must_use]
    pub fn into_inner(self) -> SkipList<T, G> {
        self.inner.into_inner()
    }
}

impl<T, G> SharedSkipList<T, G>
where
    T: Element + Clone,
    G: LevelGenerator,
{
    /// Return a copy of the value behind `id`, if the node still exists.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<T> {
        self.inner.read().get(id).cloned()
    }

    /// Return a copy of the value at the given 1-based rank.
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<T> {
        self.inner.read().get_by_rank(rank).cloned()
    }

    /// Return a copy of the first value.
    #[must_use]
    pub fn front_value(&self) -> Option<T> {
        self.inner.read().front().map(|node| node.value().clone())
    }

    /// Return a copy of the last value.
    #[must_use]
    pub fn back_value(&self) -> Option<T> {
        self.inner.read().back().map(|node| node.value().clone())
    }

    /// Return a copy of every value, in ascending order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.inner.read().iter().cloned().collect()
    }
}

impl<T: Element, G: LevelGenerator> From<SkipList<T, G>> for SharedSkipList<T, G> {
    fn from(skiplist: SkipList<T, G>) -> Self {
        SharedSkipList {
            inner: RwLock::new(skiplist),
        }
    }
}

impl<T: Element, G: LevelGenerator + Default> Default for SharedSkipList<T, G> {
    fn default() -> Self {
        Self::from(SkipList::default())
    }
}

impl<T, G> fmt::Debug for SharedSkipList<T, G>
where
    T: Element + fmt::Debug,
    G: LevelGenerator,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.inner.read(), f)
    }
}
