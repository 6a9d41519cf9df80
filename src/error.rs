//! Lookup errors.

use thiserror::Error;

/// Errors reported by exact-match lookups on a skiplist.
///
/// Absence is an expected outcome, so none of these indicate that the list is
/// in a bad state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// No stored value is equivalent to the one searched for.
    #[error("node not found")]
    NotFound,
    /// No node is indexed under the requested key.
    #[error("key not found")]
    KeyNotFound,
}
