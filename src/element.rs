//! The contract stored values must fulfil.

use std::hash::Hash;

/// A value which can be stored in a [`SkipList`][crate::SkipList].
///
/// The list never looks inside the values it stores. It only needs a strict
/// ordering to place them, and a key to find them again in constant time.
pub trait Element {
    /// The key under which the node holding this value is indexed.
    ///
    /// This may be the value itself or any projection of it, such as a player
    /// name for a leaderboard entry.
    type Key: Hash + Eq;

    /// Returns `true` if `self` must be placed strictly before `other`.
    ///
    /// This must be a strict weak ordering; see the [crate-level
    /// documentation][crate] for the exact requirements.
    #[must_use]
    fn less(&self, other: &Self) -> bool;

    /// Returns the key used to index this value.
    #[must_use]
    fn key(&self) -> Self::Key;

    /// Returns `true` if neither value is less than the other.
    #[inline]
    #[must_use]
    fn equivalent(&self, other: &Self) -> bool {
        !self.less(other) && !other.less(self)
    }
}

macro_rules! impl_element_for_copy {
    ($($t:ty),* $(,)?) => {
        $(
            impl Element for $t {
                type Key = $t;

                #[inline]
                fn less(&self, other: &Self) -> bool {
                    self < other
                }

                #[inline]
                fn key(&self) -> Self::Key {
                    *self
                }
            }
        )*
    };
}

impl_element_for_copy!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, char, bool,
);

impl Element for String {
    type Key = String;

    #[inline]
    fn less(&self, other: &Self) -> bool {
        self < other
    }

    #[inline]
    fn key(&self) -> Self::Key {
        self.clone()
    }
}

impl<'a> Element for &'a str {
    type Key = &'a str;

    #[inline]
    fn less(&self, other: &Self) -> bool {
        self < other
    }

    #[inline]
    fn key(&self) -> Self::Key {
        *self
    }
}
