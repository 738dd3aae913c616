//! Session history of committed batches.

use std::path::PathBuf;

use crate::print_error;
use crate::rename::executor::RenameExecutor;
use crate::rename::indexer::cleanup_indexed_dir;
use crate::rename::types::{ChangeSet, RenameResult};

/// Stack of committed change sets, most recent last.
#[derive(Debug, Clone, Default)]
pub struct UndoStack {
    change_sets: Vec<ChangeSet>,
}

impl UndoStack {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            change_sets: Vec::new(),
        }
    }

    /// Record a committed batch.
    /// Empty change sets are not stored. Returns true if the change set was added.
    pub fn push(&mut self, change_set: ChangeSet) -> bool {
        if change_set.is_empty() {
            return false;
        }
        self.change_sets.push(change_set);
        true
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.change_sets.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.change_sets.is_empty()
    }

    /// Most recent change set without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&ChangeSet> {
        self.change_sets.last()
    }

    /// Revert the most recent change set.
    ///
    /// Every rename is reversed through the executor, then container directories
    /// created by the batch are removed if no file remains in them.
    /// The change set is consumed even if some reversals fail.
    /// Returns the reversals that succeeded.
    pub async fn undo_last(&mut self, executor: &RenameExecutor) -> Vec<RenameResult> {
        let Some(change_set) = self.change_sets.pop() else {
            return Vec::new();
        };

        let pairs: Vec<(PathBuf, PathBuf)> = change_set
            .renames()
            .map(|rename| (rename.new.clone(), rename.original.clone()))
            .collect();
        let reverted = executor.commit(pairs).await;

        for container in change_set.containers() {
            if let Err(error) = cleanup_indexed_dir(container) {
                print_error!("{error:#}");
            }
        }

        reverted
    }
}
