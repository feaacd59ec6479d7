//! Host block store interface
//!
//! The host editor owns the document tree. The engine only needs two calls:
//! read a snapshot of the root blocks, and merge a partial attribute map into
//! one existing block. Writes are applied out-of-band relative to the snapshot
//! the engine is walking; a store must not change tree topology while a pass
//! is running.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::block::{Block, BlockId};
use crate::error::{Error, Result};

/// Read/write access to the host document tree.
pub trait BlockStore {
    /// Snapshot of the root blocks, in document order.
    fn root_blocks(&self) -> Result<Vec<Block>>;

    /// Merge `attributes` into the block identified by `id`.
    fn update_block_attributes(&mut self, id: &BlockId, attributes: Map<String, Value>)
    -> Result<()>;
}

/// A single attribute write recorded by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeUpdate {
    pub id: BlockId,
    pub attributes: Map<String, Value>,
}

/// In-memory block store.
///
/// Applies updates in place and keeps a log of every accepted write, which
/// makes it usable both as a host adapter for serialized documents and as a
/// test double.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    roots: Vec<Block>,
    updates: Vec<AttributeUpdate>,
}

impl MemoryStore {
    pub fn new(roots: Vec<Block>) -> Self {
        Self {
            roots,
            updates: Vec::new(),
        }
    }

    /// Load a store from a JSON array of root blocks.
    pub fn from_json(source: &str) -> Result<Self> {
        let roots: Vec<Block> = serde_json::from_str(source)?;
        Ok(Self::new(roots))
    }

    /// Serialize the current tree back to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.roots)?)
    }

    /// Current root blocks.
    pub fn blocks(&self) -> &[Block] {
        &self.roots
    }

    /// Find a block anywhere in the tree.
    pub fn find(&self, id: &BlockId) -> Option<&Block> {
        self.roots.iter().find_map(|root| root.find(id))
    }

    /// Every accepted write, in the order it was applied.
    pub fn updates(&self) -> &[AttributeUpdate] {
        &self.updates
    }

    /// Remove a block (and its subtree) from the tree.
    ///
    /// Returns `true` if a block was removed. Used to simulate blocks that
    /// disappear between a snapshot read and a write.
    pub fn remove(&mut self, id: &BlockId) -> bool {
        fn remove_from(blocks: &mut Vec<Block>, id: &BlockId) -> bool {
            if let Some(index) = blocks.iter().position(|b| b.id() == id) {
                blocks.remove(index);
                return true;
            }
            blocks
                .iter_mut()
                .any(|block| remove_from(&mut block.children, id))
        }
        remove_from(&mut self.roots, id)
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.roots
    }
}

impl BlockStore for MemoryStore {
    fn root_blocks(&self) -> Result<Vec<Block>> {
        Ok(self.roots.clone())
    }

    fn update_block_attributes(
        &mut self,
        id: &BlockId,
        attributes: Map<String, Value>,
    ) -> Result<()> {
        let block = self
            .roots
            .iter_mut()
            .find_map(|root| root.find_mut(id))
            .ok_or_else(|| Error::BlockNotFound { id: id.clone() })?;

        tracing::trace!(block = %id, keys = attributes.len(), "Applying attribute update");
        block.merge_attributes(attributes.clone());
        self.updates.push(AttributeUpdate {
            id: id.clone(),
            attributes,
        });
        Ok(())
    }
}
