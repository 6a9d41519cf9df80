use std::{fmt, iter, ops};

// ////////////////////////////////////////////////////////////////////////////
// SkipNode
// ////////////////////////////////////////////////////////////////////////////

/// One entry of a node's tower: the next node reaching at least this level,
/// and the number of level-0 steps needed to get there.
///
/// If there's no next node, the span is the distance between the current node
/// and the end of the list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SkipLevel {
    pub forward: Option<usize>,
    pub span: usize,
}

/// The nodes making up a [`SkipList`][crate::SkipList]. They live in a
/// [`Nodes`] arena and refer to each other by slot index, so a node may be
/// reached from any number of levels and from the backward chain without any
/// ownership between them.
///
/// A node of height `h` has `h` level entries, `levels[0]` being the plain
/// linked list through every node.
#[derive(Clone, Debug)]
pub(crate) struct SkipNode<T> {
    pub value: T,
    // The immediately previous node, or `None` if this is the first node.
    pub backward: Option<usize>,
    pub levels: Vec<SkipLevel>,
}

impl<T> SkipNode<T> {
    /// Create a new node of the given height with all links empty.
    pub fn new(value: T, height: usize) -> Self {
        SkipNode {
            value,
            backward: None,
            levels: iter::repeat_n(SkipLevel::default(), height).collect(),
        }
    }

    pub fn height(&self) -> usize {
        self.levels.len()
    }
}

// ////////////////////////////////////////////////////////////////////////////
// NodeId
// ////////////////////////////////////////////////////////////////////////////

/// A handle to a node of a skiplist.
///
/// Handles are returned by [`insert`][crate::SkipList::insert] and the lookup
/// methods. They stay valid until the node is removed; afterwards they never
/// resolve again, even once the storage slot has been reused by another node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

#[derive(Clone, Debug)]
struct Slot<T> {
    generation: u32,
    node: Option<SkipNode<T>>,
}

/// Arena owning every node of a list.
///
/// Freed slots are recycled and their generation bumped so that outstanding
/// [`NodeId`]s can be told apart from the slot's new occupant.
#[derive(Clone, Debug)]
pub(crate) struct Nodes<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
}

impl<T> Nodes<T> {
    pub fn new() -> Self {
        Nodes {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Store `node` and return the slot it was placed in.
    pub fn insert(&mut self, node: SkipNode<T>) -> usize {
        if let Some(index) = self.free.pop() {
            self.slots[index].node = Some(node);
            index
        } else {
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            self.slots.len() - 1
        }
    }

    /// Take the node out of its slot, invalidating every handle to it.
    pub fn remove(&mut self, index: usize) -> Option<SkipNode<T>> {
        let slot = self.slots.get_mut(index)?;
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        Some(node)
    }

    /// Empty every slot. Slots are kept for reuse, so handles issued before
    /// the clear stay invalid.
    pub fn clear(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(index);
        }
    }

    /// The handle of the node currently occupying `index`.
    pub fn id(&self, index: usize) -> NodeId {
        NodeId {
            index,
            generation: self.slots[index].generation,
        }
    }

    /// Resolve a handle to its slot, if the node it names still exists.
    pub fn resolve(&self, id: NodeId) -> Option<usize> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation && slot.node.is_some())
            .map(|_| id.index)
    }
}

impl<T> ops::Index<usize> for Nodes<T> {
    type Output = SkipNode<T>;

    #[expect(
        clippy::expect_used,
        clippy::indexing_slicing,
        reason = "Only slots reached through links are indexed, and those are occupied"
    )]
    fn index(&self, index: usize) -> &SkipNode<T> {
        self.slots[index]
            .node
            .as_ref()
            .expect("linked node slot must be occupied")
    }
}

impl<T> ops::IndexMut<usize> for Nodes<T> {
    #[expect(
        clippy::expect_used,
        clippy::indexing_slicing,
        reason = "Only slots reached through links are indexed, and those are occupied"
    )]
    fn index_mut(&mut self, index: usize) -> &mut SkipNode<T> {
        self.slots[index]
            .node
            .as_mut()
            .expect("linked node slot must be occupied")
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Node
// ////////////////////////////////////////////////////////////////////////////

/// A borrowed view of one node of a skiplist, from which the neighbouring
/// nodes can be reached.
pub struct Node<'a, T> {
    pub(crate) nodes: &'a Nodes<T>,
    pub(crate) index: usize,
}

impl<'a, T> Node<'a, T> {
    /// The handle of this node.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.nodes.id(self.index)
    }

    /// The value stored in this node.
    #[must_use]
    pub fn value(&self) -> &'a T {
        let nodes = self.nodes;
        &nodes[self.index].value
    }

    /// The number of levels this node is linked into.
    #[must_use]
    pub fn height(&self) -> usize {
        self.nodes[self.index].height()
    }

    /// The next node in ascending order, or `None` if this is the last one.
    #[must_use]
    pub fn next(&self) -> Option<Node<'a, T>> {
        self.nodes[self.index].levels[0]
            .forward
            .map(|index| Node {
                nodes: self.nodes,
                index,
            })
    }

    /// The previous node in ascending order, or `None` if this is the first
    /// one.
    #[must_use]
    pub fn prev(&self) -> Option<Node<'a, T>> {
        self.nodes[self.index].backward.map(|index| Node {
            nodes: self.nodes,
            index,
        })
    }
}

impl<T> Clone for Node<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Node<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Node<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id())
            .field("value", self.value())
            .field("height", &self.height())
            .finish()
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Iterators
// ////////////////////////////////////////////////////////////////////////////

/// Iterator over the values of a skiplist in ascending order.
pub struct Iter<'a, T> {
    pub(crate) nodes: &'a Nodes<T>,
    pub(crate) first: Option<usize>,
    pub(crate) last: Option<usize>,
    pub(crate) size: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.first?;
        if self.first == self.last {
            self.first = None;
            self.last = None;
        } else {
            self.first = self.nodes[current].levels[0].forward;
        }
        self.size -= 1;
        let nodes = self.nodes;
        Some(&nodes[current].value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.size, Some(self.size))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let current = self.last?;
        if self.first == self.last {
            self.first = None;
            self.last = None;
        } else {
            self.last = self.nodes[current].backward;
        }
        self.size -= 1;
        let nodes = self.nodes;
        Some(&nodes[current].value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> iter::FusedIterator for Iter<'_, T> {}
