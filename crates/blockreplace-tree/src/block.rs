//! Block and block identifier types

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque, stable identifier of a block in the host tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for BlockId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A node in the host document tree.
///
/// The type name is fixed at construction. Attributes are kept as raw JSON so
/// that values the engine does not understand round-trip untouched. The host
/// serialization (`clientId`, `name`, `innerBlocks`) is accepted on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(alias = "clientId")]
    id: BlockId,
    #[serde(rename = "name", alias = "typeName")]
    type_name: String,
    /// Attribute map; `None` when the host supplied no attributes at all
    #[serde(default)]
    pub attributes: Option<Map<String, Value>>,
    /// Nested blocks, in document order
    #[serde(default, alias = "innerBlocks")]
    pub children: Vec<Block>,
}

impl Block {
    /// Create a block with an empty attribute map and no children.
    pub fn new(id: impl Into<BlockId>, type_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            type_name: type_name.into(),
            attributes: Some(Map::new()),
            children: Vec::new(),
        }
    }

    /// Set an attribute (builder pattern).
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes
            .get_or_insert_with(Map::new)
            .insert(name.into(), value.into());
        self
    }

    /// Drop the attribute map entirely (builder pattern).
    pub fn without_attributes(mut self) -> Self {
        self.attributes = None;
        self
    }

    /// Append a child block (builder pattern).
    pub fn with_child(mut self, child: Block) -> Self {
        self.children.push(child);
        self
    }

    /// Append several child blocks (builder pattern).
    pub fn with_children(mut self, children: impl IntoIterator<Item = Block>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn id(&self) -> &BlockId {
        &self.id
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Look up an attribute value.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.as_ref()?.get(name)
    }

    /// Merge a partial attribute map into this block's attributes.
    ///
    /// Keys not present in `partial` are left as they are.
    pub fn merge_attributes(&mut self, partial: Map<String, Value>) {
        let attributes = self.attributes.get_or_insert_with(Map::new);
        for (key, value) in partial {
            attributes.insert(key, value);
        }
    }

    /// Find a block by id in this subtree (including `self`).
    pub fn find(&self, id: &BlockId) -> Option<&Block> {
        if &self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Mutable variant of [`Block::find`].
    pub fn find_mut(&mut self, id: &BlockId) -> Option<&mut Block> {
        if &self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Number of blocks in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Block::subtree_len).sum::<usize>()
    }
}
