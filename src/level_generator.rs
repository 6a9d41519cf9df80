//! Skiplists use a probabilistic distribution of nodes over the internal
//! levels, whereby the lowest level (level 0) contains all the nodes, and each
//! level $n > 0$ will contain a random subset of the nodes on level `n - 1`.
//!
//! Most commonly, a geometric distribution is used whereby the chance that a
//! node occupies level $n$ is $p$ times the chance of occupying level $n-1$
//! (with $0 < p < 1$).
//!
//! It is very unlikely that this will need to be changed as the default should
//! suffice, but if need be custom level generators can be implemented.

pub mod geometric;

// ////////////////////////////////////////////////////////////////////////////
// Level Generator
// ////////////////////////////////////////////////////////////////////////////

/// Upon the insertion of a new node in the list, the node is replicated to high
/// levels with a certain probability as determined by a [`LevelGenerator`].
pub trait LevelGenerator {
    /// The total number of levels that are assumed to exist.
    ///
    /// A list sizes its header to this many levels, so it must lie in
    /// `1..=MAX_LEVEL`.
    #[must_use]
    fn total(&self) -> usize;

    /// Generate a random height for a new node in the range `[1, total]`.
    ///
    /// A node of height `h` is linked into levels `0..h`. This function should
    /// _never_ return `0` or a height greater than
    /// [`total`][LevelGenerator::total].
    #[must_use]
    fn level(&mut self) -> usize;
}
