//! The repository: an owned chain of commits, newest first.
use std::fmt;

use crate::commit::{Commit, CommitId, CommitIds};
use crate::Error;

/// An ordered history of commits.
///
/// The chain reachable from the head via predecessor links is acyclic and
/// `None`-terminated. The head is the most recent commit; walking the chain
/// yields non-increasing timestamps. Timestamps may tie under fast repeated
/// commits, since the wall clock is read per commit.
#[derive(Debug)]
pub struct Repository {
    name: String,
    head: Option<Box<Commit>>,
    ids: CommitIds,
}

impl Repository {
    /// Create an empty repository.
    ///
    /// Commit identifiers are drawn from the process-wide generator, so
    /// they stay unique across repositories.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `name` is empty.
    pub fn new(name: impl Into<String>) -> Result<Self, Error> {
        Self::with_ids(name, CommitIds::shared())
    }

    /// Create an empty repository drawing identifiers from `ids`.
    ///
    /// Injecting a fresh generator gives deterministic identifiers in
    /// isolated tests. Repositories that are later merged with
    /// [`synchronize`](Repository::synchronize) should share a generator,
    /// so that the merged chain holds distinct identifiers.
    pub fn with_ids(name: impl Into<String>, ids: CommitIds) -> Result<Self, Error> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::InvalidArgument("repository name is empty"));
        }
        Ok(Self {
            name,
            head: None,
            ids,
        })
    }

    /// The repository name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The identifier of the most recent commit, if any.
    pub fn head(&self) -> Option<CommitId> {
        self.head.as_ref().map(|commit| commit.id)
    }

    /// Borrow the most recent commit, if any.
    pub fn head_commit(&self) -> Option<&Commit> {
        self.head.as_deref()
    }

    /// Check whether the history has any commits.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// The number of commits in the history.
    pub fn len(&self) -> usize {
        self.commits().count()
    }

    /// Iterate over the commits, newest first.
    pub fn commits(&self) -> Commits<'_> {
        Commits {
            next: self.head.as_deref(),
        }
    }

    /// Check whether the history contains the given commit.
    ///
    /// The walk visits every node, including the oldest.
    pub fn contains(&self, target: &CommitId) -> bool {
        self.commits().any(|commit| commit.id == *target)
    }

    /// The `n` most recent commit descriptions, newest first, one per
    /// line. A history shorter than `n` is returned whole; an empty
    /// repository yields an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `n` is zero.
    pub fn history(&self, n: usize) -> Result<String, Error> {
        if n == 0 {
            return Err(Error::InvalidArgument("history count is zero"));
        }
        Ok(self
            .commits()
            .take(n)
            .map(|commit| commit.to_string())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Record a new commit with the given message and make it the head.
    /// Returns the assigned identifier.
    pub fn commit(&mut self, message: impl Into<String>) -> CommitId {
        let commit = Commit::new(self.ids.next(), message.into(), self.head.take());
        let id = commit.id;
        self.head = Some(Box::new(commit));

        log::debug!(target: "chronicle", "commit {id} recorded in `{}`", self.name);

        id
    }

    /// Remove the commit with the given identifier, splicing its
    /// predecessor into its place. Exactly one commit is removed per
    /// successful call; surviving commits keep their identifiers and
    /// timestamps. Returns `false` on an empty repository or a miss,
    /// leaving the history untouched.
    pub fn remove(&mut self, target: &CommitId) -> bool {
        let Some(head) = self.head.as_deref() else {
            return false;
        };
        if head.id == *target {
            self.head = self
                .head
                .take()
                .and_then(|mut commit| commit.predecessor.take());
            log::debug!(target: "chronicle", "commit {target} removed from `{}`", self.name);

            return true;
        }
        // Look one node ahead, so the match can be spliced out of the chain.
        let mut cursor = self.head.as_deref_mut();
        while let Some(node) = cursor {
            if node
                .predecessor
                .as_deref()
                .is_some_and(|p| p.id == *target)
            {
                let removed = node.predecessor.take();
                node.predecessor = removed.and_then(|mut commit| commit.predecessor.take());
                log::debug!(target: "chronicle", "commit {target} removed from `{}`", self.name);

                return true;
            }
            cursor = node.predecessor.as_deref_mut();
        }
        false
    }

    /// Merge `other`'s entire history into this one, ordered by descending
    /// timestamp. When timestamps tie, this repository's commit comes
    /// first.
    ///
    /// Afterwards `other` is empty, and this repository owns every commit
    /// from both histories; no commit is duplicated or lost. If this
    /// repository was empty, it simply adopts `other`'s chain.
    pub fn synchronize(&mut self, other: &mut Repository) {
        let mut ours = self.head.take();
        let mut theirs = other.head.take();
        let mut merged: Vec<Box<Commit>> = Vec::new();

        loop {
            let take_ours = match (&ours, &theirs) {
                (Some(a), Some(b)) => a.timestamp >= b.timestamp,
                _ => break,
            };
            let source = if take_ours { &mut ours } else { &mut theirs };
            if let Some(mut commit) = source.take() {
                *source = commit.predecessor.take();
                merged.push(commit);
            }
        }

        // One chain is exhausted; the other's remainder is already in order
        // and becomes the tail. Relink the merged prefix back to front.
        let mut head = ours.or(theirs);
        for mut commit in merged.into_iter().rev() {
            commit.predecessor = head;
            head = Some(commit);
        }
        self.head = head;

        log::debug!(target: "chronicle", "synchronized `{}` into `{}`", other.name, self.name);
    }

    /// Record a commit with a caller-chosen timestamp.
    #[cfg(test)]
    fn commit_at(&mut self, message: &str, timestamp: impl Into<crate::Timestamp>) -> CommitId {
        let commit = Commit::at(
            self.ids.next(),
            message.to_owned(),
            timestamp.into(),
            self.head.take(),
        );
        let id = commit.id;
        self.head = Some(Box::new(commit));
        id
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.head_commit() {
            None => write!(f, "{} - No commits", self.name),
            Some(head) => write!(f, "{} - Current head: {head}", self.name),
        }
    }
}

impl Drop for Repository {
    // Unwind the chain iteratively: a deep history dropped through the
    // recursive box links would exhaust the stack.
    fn drop(&mut self) {
        let mut head = self.head.take();
        while let Some(mut commit) = head {
            head = commit.predecessor.take();
        }
    }
}

/// Iterator over a repository's commits, newest first.
pub struct Commits<'a> {
    next: Option<&'a Commit>,
}

impl<'a> Iterator for Commits<'a> {
    type Item = &'a Commit;

    fn next(&mut self) -> Option<Self::Item> {
        let commit = self.next?;
        self.next = commit.predecessor.as_deref();

        Some(commit)
    }
}
