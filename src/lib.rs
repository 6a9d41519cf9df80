//! A skiplist is a way of storing elements in such a way that elements can be
//! efficiently accessed, inserted and removed, all in `O(log(n))` on average.
//!
//! Conceptually, a skiplist resembles something like:
//!
//! ```text
//! <head> ----------> [2] --------------------------------------------------> [9] ---------->
//! <head> ----------> [2] ------------------------------------[7] ----------> [9] ---------->
//! <head> ----------> [2] ----------> [4] ------------------> [7] ----------> [9] --> [10] ->
//! <head> --> [1] --> [2] --> [3] --> [4] --> [5] --> [6] --> [7] --> [8] --> [9] --> [10] ->
//! ```
//!
//! where each node `[x]` has references to nodes further down the list,
//! allowing the algorithm to effectively skip ahead.
//!
//! Every link in this crate also records its *span*: the number of level-0
//! steps it jumps over. Summing spans while descending gives the 1-based rank
//! of a value, and the reverse walk finds the value at a given rank, both in
//! `O(log(n))` expected time without any separate counting structure. Next to
//! the ordered links, each list keeps a hash index from an element's key to its
//! node for `O(1)` exact lookups.
//!
//! The ordering comes from [`Element::less`], which **must** be a strict weak
//! ordering:
//!
//! - Be well defined: `a.less(b)` should always return the same value
//! - Be irreflexive: `a.less(a)` is always `false`.
//! - Be transitive: if `a.less(b)` and `b.less(c)` then `a.less(c)`.
//!
//! Two elements are considered equal when neither is less than the other.
//!
//! ```
//! use ranked_skiplist::{Element, SkipList};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Player {
//!     name: &'static str,
//!     score: u32,
//! }
//!
//! impl Element for Player {
//!     type Key = &'static str;
//!
//!     // Higher scores sort first.
//!     fn less(&self, other: &Self) -> bool {
//!         self.score > other.score
//!     }
//!
//!     fn key(&self) -> Self::Key {
//!         self.name
//!     }
//! }
//!
//! let mut board = SkipList::new();
//! board.insert(Player { name: "Bobby", score: 10 });
//! board.insert(Player { name: "Tom", score: 40 });
//!
//! assert_eq!(board.get_by_rank(1).map(|p| p.name), Some("Tom"));
//! assert_eq!(board.get_rank(&Player { name: "Bobby", score: 10 }), Some(2));
//! ```

mod element;
mod error;
mod level_generator;
mod shared;
mod skiplist;
mod skipnode;

pub use element::Element;
pub use error::Error;
pub use level_generator::{LevelGenerator, geometric::Geometric, geometric::GeometricError};
pub use shared::SharedSkipList;
pub use skiplist::SkipList;
pub use skipnode::{Iter, Node, NodeId};

/// Maximum height of any node, and the height of every list's header.
pub const MAX_LEVEL: usize = 32;

/// Inverse of the probability that a node reaching some level also reaches
/// the next one.
pub const BRANCH: u32 = 4;
