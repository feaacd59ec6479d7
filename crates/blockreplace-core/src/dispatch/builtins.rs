//! Built-in dispatch entries
//!
//! Block types listed here need attributes other than `content`. Every
//! other type falls back to [`default_attributes`].

use super::types::AttributeDescriptor;

/// Attribute processed for block types without an entry.
pub const DEFAULT_ATTRIBUTE: &str = "content";

/// Number of built-in entries.
pub const BUILTIN_COUNT: usize = 4;

/// Attributes for types without a registered entry.
pub fn default_attributes() -> Vec<AttributeDescriptor> {
    vec![AttributeDescriptor::text(DEFAULT_ATTRIBUTE)]
}

/// All built-in `(type name, attributes)` entries.
pub fn builtin_entries() -> Vec<(&'static str, Vec<AttributeDescriptor>)> {
    vec![
        // Quote body text lives in nested paragraph blocks.
        ("core/quote", vec![AttributeDescriptor::text("citation")]),
        (
            "core/pullquote",
            // Value first; citation mirrors it.
            vec![AttributeDescriptor::text("value").with_mirror("citation")],
        ),
        ("core/details", vec![AttributeDescriptor::text("summary")]),
        (
            "core/table",
            vec![
                AttributeDescriptor::text("caption"),
                AttributeDescriptor::table_section("head"),
                AttributeDescriptor::table_section("body"),
                AttributeDescriptor::table_section("foot"),
            ],
        ),
    ]
}

/// Block types treated as text blocks when processing is restricted to them.
pub fn text_block_types() -> &'static [&'static str] {
    &[
        "core/paragraph",
        "core/heading",
        "core/list",
        "core/list-item",
        "core/quote",
        "core/code",
        "core/details",
        "core/missing",
        "core/preformatted",
        "core/pullquote",
        "core/table",
        "core/verse",
        "core/footnotes",
        "core/freeform",
    ]
}
