//! Commit records and identifier generation.
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use crate::timestamp::Timestamp;

/// A unique commit identifier, displayed in its decimal form.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct CommitId(u64);

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for CommitId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl FromStr for CommitId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Commit identifier generator: a cloneable handle over a shared monotonic
/// counter. Identifiers are assigned in increasing order and never reused.
#[derive(Clone, Debug, Default)]
pub struct CommitIds(Arc<AtomicU64>);

impl CommitIds {
    /// A fresh generator starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide generator. Repositories created with
    /// [`Repository::new`](crate::Repository::new) share it, which keeps
    /// identifiers unique across repositories.
    pub fn shared() -> Self {
        static SHARED: OnceLock<CommitIds> = OnceLock::new();
        SHARED.get_or_init(CommitIds::new).clone()
    }

    /// Assign the next identifier.
    pub fn next(&self) -> CommitId {
        CommitId(self.0.fetch_add(1, Ordering::SeqCst))
    }

    /// Set the counter back to zero.
    ///
    /// For test isolation only. Commits already constructed keep their
    /// identifiers; where possible, prefer injecting a fresh generator
    /// with [`Repository::with_ids`](crate::Repository::with_ids).
    pub fn reset(&self) {
        self.0.store(0, Ordering::SeqCst);
    }
}

/// A single commit in a repository's history.
///
/// The identifier, timestamp and message never change after construction;
/// only the predecessor link is reassigned, and only by
/// [`Repository`](crate::Repository) when splicing or merging chains.
#[derive(Debug)]
pub struct Commit {
    /// Unique identifier, assigned at construction.
    pub id: CommitId,
    /// Wall-clock time at which the commit was created.
    pub timestamp: Timestamp,
    /// Message describing the change.
    pub message: String,
    /// The commit made immediately before this one, if any.
    pub(crate) predecessor: Option<Box<Commit>>,
}

impl Commit {
    pub(crate) fn new(id: CommitId, message: String, predecessor: Option<Box<Commit>>) -> Self {
        Self {
            id,
            timestamp: Timestamp::now(),
            message,
            predecessor,
        }
    }

    /// Construct a commit with a caller-chosen timestamp.
    #[cfg(test)]
    pub(crate) fn at(
        id: CommitId,
        message: String,
        timestamp: Timestamp,
        predecessor: Option<Box<Commit>>,
    ) -> Self {
        Self {
            id,
            timestamp,
            message,
            predecessor,
        }
    }

    /// The commit made immediately before this one, if any.
    pub fn predecessor(&self) -> Option<&Commit> {
        self.predecessor.as_deref()
    }
}

impl fmt::Display for Commit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}: {}",
            self.id,
            self.timestamp
                .to_local_datetime()
                .format("%Y-%m-%d at %H:%M:%S %Z"),
            self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_ids_are_monotonic() {
        let ids = CommitIds::new();

        assert_eq!(ids.next(), CommitId::from(0));
        assert_eq!(ids.next(), CommitId::from(1));
        assert_eq!(ids.next(), CommitId::from(2));
    }

    #[test]
    fn test_generators_are_independent() {
        let a = CommitIds::new();
        let b = CommitIds::new();

        a.next();
        a.next();

        assert_eq!(b.next(), CommitId::from(0));
    }

    #[test]
    fn test_clones_share_the_counter() {
        let ids = CommitIds::new();
        let clone = ids.clone();

        assert_eq!(ids.next(), CommitId::from(0));
        assert_eq!(clone.next(), CommitId::from(1));
        assert_eq!(ids.next(), CommitId::from(2));
    }

    #[test]
    fn test_reset() {
        let ids = CommitIds::new();

        ids.next();
        ids.next();
        ids.reset();

        assert_eq!(ids.next(), CommitId::from(0));
    }

    #[test]
    fn test_id_display_roundtrip() {
        let id = CommitId::from(42);

        assert_eq!(id.to_string(), "42");
        assert_eq!(CommitId::from_str("42").unwrap(), id);
    }

    #[test]
    fn test_commit_display() {
        let commit = Commit::at(
            CommitId::from(7),
            "hello".to_owned(),
            Timestamp::from(86_400_000),
            None,
        );
        let display = commit.to_string();

        assert!(display.starts_with("7 at 19"), "{display}");
        assert!(display.ends_with(": hello"), "{display}");
    }
}
