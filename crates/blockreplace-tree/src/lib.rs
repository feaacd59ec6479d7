//! Block tree model for blockreplace
//!
//! Describes the document tree owned by the host editor: typed blocks with
//! free-form JSON attributes and nested children, the attribute shapes the
//! replacement engine understands (plain text, rich text, table sections),
//! and the narrow store interface used to read a snapshot and write
//! attribute updates back.

pub mod block;
pub mod error;
pub mod store;
pub mod value;

pub use block::{Block, BlockId};
pub use error::{Error, Result};
pub use store::{AttributeUpdate, BlockStore, MemoryStore};
pub use value::{TableCell, TableSection, text_of};
