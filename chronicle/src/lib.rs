//! A minimal version-history container.
//!
//! A [`Repository`] owns a singly-linked chain of immutable [`Commit`]
//! records, newest first. Histories support appending, lookup, bounded
//! retrieval, removal of a single commit, and a two-way timestamp-ordered
//! merge ([`Repository::synchronize`]).
pub mod commit;
#[cfg(feature = "logger")]
pub mod logger;
pub mod repository;
pub mod timestamp;

pub use commit::{Commit, CommitId, CommitIds};
pub use repository::{Commits, Repository};
pub use timestamp::Timestamp;

use thiserror::Error;

/// Validation error, raised before any mutation takes place.
///
/// Missing commits are not errors: lookups and removals report them
/// through their boolean results.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}
