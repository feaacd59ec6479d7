//! Block type dispatch
//!
//! Decides which attributes are searched for each block type. The table is
//! passed explicitly to the traversal, so hosts extend it by registering
//! entries rather than through ambient hooks.

mod builtins;
mod table;
mod types;

pub use builtins::{
    BUILTIN_COUNT, DEFAULT_ATTRIBUTE, builtin_entries, default_attributes, text_block_types,
};
pub use table::DispatchTable;
pub use types::{AttributeDescriptor, AttributeShape, DEFAULT_NAMESPACE, qualified_name};
