//! Replacement strategies
//!
//! A strategy turns one attribute's old value into its new value and the
//! number of matches involved. The built-in strategies cover text and table
//! section attributes; hosts can register their own per block type on the
//! [`DispatchTable`](crate::DispatchTable) for values that need structural
//! substitution.

use serde_json::Value;

use crate::accumulate::apply;
use crate::context::RunMode;
use crate::dispatch::AttributeShape;
use crate::extract::{table_value, text_value};
use crate::pattern::CompiledPattern;

/// Inputs available to a strategy for one attribute.
#[derive(Debug, Clone, Copy)]
pub struct PassInput<'a> {
    pub type_name: &'a str,
    pub attribute: &'a str,
    pub pattern: &'a CompiledPattern,
    pub replacement: &'a str,
    pub mode: RunMode,
}

/// Outcome of a strategy for one attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Replacement {
    /// Value to commit when `changed` is set.
    pub new_value: Value,
    pub match_count: usize,
    /// Whether `new_value` differs from the old value.
    pub changed: bool,
}

impl Replacement {
    /// An outcome that leaves `old` as it is.
    pub fn unchanged(old: &Value, match_count: usize) -> Self {
        Self {
            new_value: old.clone(),
            match_count,
            changed: false,
        }
    }
}

/// Computes an attribute's new value.
///
/// Returning `None` means the value does not apply (wrong shape) and the
/// attribute is skipped without counting anything.
pub trait ReplacementStrategy: Send + Sync {
    fn replace(&self, old: &Value, input: &PassInput<'_>) -> Option<Replacement>;
}

/// Strategy for plain strings and rich-text objects.
///
/// Changed values are committed as plain strings.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextStrategy;

impl ReplacementStrategy for TextStrategy {
    fn replace(&self, old: &Value, input: &PassInput<'_>) -> Option<Replacement> {
        let old_text = text_value(old)?;
        let applied = apply(old_text, input.pattern, input.replacement, input.mode);
        if !applied.is_changed(old_text) {
            return Some(Replacement::unchanged(old, applied.match_count));
        }
        Some(Replacement {
            new_value: Value::String(applied.new_text),
            match_count: applied.match_count,
            changed: true,
        })
    }
}

/// Strategy for table sections.
///
/// Each cell is matched on its own so matches never span cells. The whole
/// section is rebuilt when any cell changed.
#[derive(Debug, Default, Clone, Copy)]
pub struct TableSectionStrategy;

impl ReplacementStrategy for TableSectionStrategy {
    fn replace(&self, old: &Value, input: &PassInput<'_>) -> Option<Replacement> {
        let mut section = table_value(old)?;
        let mut match_count = 0;
        let mut changed = false;

        for cell in section.cells_mut() {
            let Some(old_text) = cell.text() else {
                continue;
            };
            let applied = apply(old_text, input.pattern, input.replacement, input.mode);
            match_count += applied.match_count;
            if applied.is_changed(old_text) {
                cell.set_text(applied.new_text);
                changed = true;
            }
        }

        if !changed {
            return Some(Replacement::unchanged(old, match_count));
        }
        Some(Replacement {
            new_value: section.to_value(),
            match_count,
            changed: true,
        })
    }
}

/// Default strategy for an attribute shape.
pub fn builtin_strategy(shape: AttributeShape) -> &'static dyn ReplacementStrategy {
    match shape {
        AttributeShape::Text => &TextStrategy,
        AttributeShape::TableSection => &TableSectionStrategy,
    }
}
