//! Attribute extraction
//!
//! Turns raw attribute values into the text the pattern runs against.
//! Absent or inapplicable values yield `None` and the caller skips them.

use blockreplace_tree::{Block, TableSection, text_of};
use serde_json::Value;

/// Canonical text of a block attribute.
///
/// `None` when the block has no attributes, the attribute is absent, or its
/// value is not text-shaped.
pub fn extract_text(block: &Block, attribute: &str) -> Option<String> {
    block.attribute(attribute).and_then(text_value).map(str::to_string)
}

/// Parsed table section held by a block attribute.
///
/// `None` when the attribute is absent or malformed.
pub fn extract_table(block: &Block, attribute: &str) -> Option<TableSection> {
    block.attribute(attribute).and_then(table_value)
}

/// Canonical text of a raw attribute value.
pub fn text_value(value: &Value) -> Option<&str> {
    text_of(value)
}

/// Parse a raw table section value.
pub fn table_value(value: &Value) -> Option<TableSection> {
    let section = TableSection::from_value(value);
    if section.is_none() {
        tracing::debug!("Skipping malformed table section");
    }
    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_plain_and_rich_text() {
        let block = Block::new("p", "core/paragraph")
            .with_attribute("content", "plain")
            .with_attribute("caption", json!({ "originalHTML": "<i>rich</i>" }));

        assert_eq!(extract_text(&block, "content").as_deref(), Some("plain"));
        assert_eq!(extract_text(&block, "caption").as_deref(), Some("<i>rich</i>"));
    }

    #[test]
    fn test_absent_attribute_or_map_is_none() {
        let block = Block::new("p", "core/paragraph");
        assert!(extract_text(&block, "content").is_none());

        let bare = Block::new("p", "core/paragraph").without_attributes();
        assert!(extract_text(&bare, "content").is_none());
    }

    #[test]
    fn test_non_text_values_are_inapplicable() {
        let block = Block::new("h", "core/heading").with_attribute("content", 3);
        assert!(extract_text(&block, "content").is_none());
    }

    #[test]
    fn test_extracts_table_sections() {
        let block = Block::new("t", "core/table")
            .with_attribute("body", json!([{ "cells": [{ "content": "x" }] }]))
            .with_attribute("head", json!("oops"));

        assert_eq!(extract_table(&block, "body").unwrap().cells().count(), 1);
        assert!(extract_table(&block, "head").is_none());
        assert!(extract_table(&block, "foot").is_none());
    }
}
