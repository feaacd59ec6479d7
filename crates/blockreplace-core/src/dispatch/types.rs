//! Attribute descriptors used by the dispatch table

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Namespace assumed for type names written without one.
pub const DEFAULT_NAMESPACE: &str = "core";

/// Qualify a bare type name with the default namespace.
///
/// `"quote"` becomes `"core/quote"`; names that already carry a namespace
/// are returned unchanged.
pub fn qualified_name(type_name: &str) -> Cow<'_, str> {
    if type_name.contains('/') {
        Cow::Borrowed(type_name)
    } else {
        Cow::Owned(format!("{DEFAULT_NAMESPACE}/{type_name}"))
    }
}

/// How an attribute's value is laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttributeShape {
    /// Plain string or rich-text object.
    #[default]
    Text,
    /// Table rows of cells, each cell processed on its own.
    TableSection,
}

/// One attribute the engine should process for a block type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    /// Attribute name (e.g. "content", "citation")
    pub name: String,
    /// Value layout
    #[serde(default)]
    pub shape: AttributeShape,
    /// Attribute kept in sync with this one when both hold the same text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror: Option<String>,
}

impl AttributeDescriptor {
    /// A text attribute.
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shape: AttributeShape::Text,
            mirror: None,
        }
    }

    /// A table section attribute.
    pub fn table_section(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shape: AttributeShape::TableSection,
            mirror: None,
        }
    }

    /// Mirror this attribute into `mirror` (builder pattern).
    pub fn with_mirror(mut self, mirror: impl Into<String>) -> Self {
        self.mirror = Some(mirror.into());
        self
    }
}
