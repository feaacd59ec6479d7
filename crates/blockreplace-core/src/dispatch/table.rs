//! Dispatch table storage

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::builtins::{builtin_entries, default_attributes};
use super::types::{AttributeDescriptor, qualified_name};
use crate::strategy::{ReplacementStrategy, builtin_strategy};

/// Maps block type names to the attributes processed for them.
///
/// Types without an entry fall back to `content`. Entries can be added or
/// replaced at any time, and a block type can carry its own
/// [`ReplacementStrategy`] that takes precedence over the shape-based default.
#[derive(Clone)]
pub struct DispatchTable {
    entries: HashMap<String, Vec<AttributeDescriptor>>,
    strategies: HashMap<String, Arc<dyn ReplacementStrategy>>,
    fallback: Vec<AttributeDescriptor>,
}

impl DispatchTable {
    /// Create a table with no entries; every type maps to `content`.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            strategies: HashMap::new(),
            fallback: default_attributes(),
        }
    }

    /// Create a table pre-populated with the built-in entries.
    pub fn with_builtins() -> Self {
        let mut table = Self::new();
        for (type_name, attributes) in builtin_entries() {
            table.register(type_name, attributes);
        }
        table
    }

    /// Register or replace the attributes for a block type.
    pub fn register(&mut self, type_name: &str, attributes: Vec<AttributeDescriptor>) {
        let key = qualified_name(type_name).into_owned();
        if self.entries.insert(key.clone(), attributes).is_some() {
            tracing::debug!(type_name = %key, "Overriding dispatch entry");
        }
    }

    /// Register a strategy used for every attribute of a block type.
    pub fn register_strategy(&mut self, type_name: &str, strategy: Arc<dyn ReplacementStrategy>) {
        self.strategies
            .insert(qualified_name(type_name).into_owned(), strategy);
    }

    /// Remove the entry for a block type, restoring the fallback.
    pub fn unregister(&mut self, type_name: &str) -> Option<Vec<AttributeDescriptor>> {
        self.entries.remove(&*qualified_name(type_name))
    }

    /// Attributes to process for a block type, in order.
    pub fn attributes_for(&self, type_name: &str) -> &[AttributeDescriptor] {
        self.entries
            .get(&*qualified_name(type_name))
            .unwrap_or(&self.fallback)
    }

    /// Strategy for one attribute of a block type.
    pub fn strategy_for(
        &self,
        type_name: &str,
        descriptor: &AttributeDescriptor,
    ) -> &dyn ReplacementStrategy {
        match self.strategies.get(&*qualified_name(type_name)) {
            Some(strategy) => strategy.as_ref(),
            None => builtin_strategy(descriptor.shape),
        }
    }

    /// Check if a block type has its own entry.
    pub fn contains(&self, type_name: &str) -> bool {
        self.entries.contains_key(&*qualified_name(type_name))
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered type names (sorted).
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.entries.keys().map(String::as_str).collect();
        names.sort();
        names
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut strategies: Vec<_> = self.strategies.keys().collect();
        strategies.sort();
        f.debug_struct("DispatchTable")
            .field("entries", &self.list())
            .field("strategies", &strategies)
            .finish()
    }
}
