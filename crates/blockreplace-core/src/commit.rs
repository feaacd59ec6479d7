//! Commit gate
//!
//! The only place the engine writes to the host store. One call commits one
//! top-level attribute of one block. Failed writes are not retried; they are
//! collected and reported once for the whole pass.

use std::fmt;

use blockreplace_tree::{BlockId, BlockStore};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::context::RunMode;

/// A write the store refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitFailure {
    pub block_id: BlockId,
    pub attribute: String,
    pub message: String,
}

/// Aggregate, non-fatal warning for a pass in which some writes failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassWarning {
    pub failures: Vec<CommitFailure>,
}

impl fmt::Display for PassWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} attribute update(s) could not be saved", self.failures.len())?;
        if let Some(first) = self.failures.first() {
            write!(
                f,
                " (first: block {} attribute '{}': {})",
                first.block_id, first.attribute, first.message
            )?;
        }
        Ok(())
    }
}

/// Gate between the traversal and the host store.
pub struct CommitGate<'s> {
    store: &'s mut dyn BlockStore,
    mode: RunMode,
    commits: usize,
    failures: Vec<CommitFailure>,
}

impl<'s> CommitGate<'s> {
    pub fn new(store: &'s mut dyn BlockStore, mode: RunMode) -> Self {
        Self {
            store,
            mode,
            commits: 0,
            failures: Vec::new(),
        }
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    /// Write `value` to `attribute` of block `id`.
    ///
    /// Never touches the store in search-only mode. Returns `true` when the
    /// store accepted the write.
    pub fn commit(&mut self, id: &BlockId, attribute: &str, value: Value) -> bool {
        if !self.mode.commits() {
            return false;
        }

        let mut partial = Map::new();
        partial.insert(attribute.to_string(), value);

        match self.store.update_block_attributes(id, partial) {
            Ok(()) => {
                tracing::debug!(block = %id, attribute, "Committed attribute");
                self.commits += 1;
                true
            }
            Err(e) => {
                tracing::warn!(block = %id, attribute, error = %e, "Attribute update failed");
                self.failures.push(CommitFailure {
                    block_id: id.clone(),
                    attribute: attribute.to_string(),
                    message: e.to_string(),
                });
                false
            }
        }
    }

    /// Number of accepted writes so far.
    pub fn commits(&self) -> usize {
        self.commits
    }

    pub fn failures(&self) -> &[CommitFailure] {
        &self.failures
    }

    /// Consume the gate, returning the accepted write count and the
    /// aggregate warning (if any write failed).
    pub fn finish(self) -> (usize, Option<PassWarning>) {
        let warning = if self.failures.is_empty() {
            None
        } else {
            Some(PassWarning {
                failures: self.failures,
            })
        };
        (self.commits, warning)
    }
}
