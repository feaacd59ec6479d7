//! Tree traversal engine
//!
//! Walks a snapshot of the block tree depth-first, pre-order. Every block is
//! visited exactly once per pass; a block's own attributes are processed
//! before its children. Writes go out through the [`CommitGate`] while the
//! walk continues over the snapshot, which is never re-read mid-pass.

use blockreplace_tree::Block;
use serde_json::Value;

use crate::commit::CommitGate;
use crate::config::BlockFilter;
use crate::context::{Counters, RunContext};
use crate::dispatch::{AttributeDescriptor, DispatchTable};
use crate::strategy::{PassInput, Replacement};

/// Walks block trees, applying the dispatch table at every node.
#[derive(Debug, Clone, Copy)]
pub struct TraversalEngine<'a> {
    dispatch: &'a DispatchTable,
    filter: &'a BlockFilter,
}

impl<'a> TraversalEngine<'a> {
    pub fn new(dispatch: &'a DispatchTable, filter: &'a BlockFilter) -> Self {
        Self { dispatch, filter }
    }

    /// Traverse one root block and return the counters for its subtree.
    pub fn traverse(
        &self,
        root: &Block,
        context: &RunContext,
        gate: &mut CommitGate<'_>,
    ) -> Counters {
        let mut pass = Pass {
            dispatch: self.dispatch,
            context,
            gate,
            counters: Counters::default(),
        };
        let mut pending = vec![root];

        while let Some(block) = pending.pop() {
            pass.counters.visited += 1;

            if self.filter.allows(block.type_name()) {
                for descriptor in self.dispatch.attributes_for(block.type_name()) {
                    pass.process(block, descriptor);
                }
            }

            // Reversed so the first child is popped next.
            pending.extend(block.children.iter().rev());
        }

        pass.counters
    }

    /// Traverse every root in order, accumulating into one set of counters.
    pub fn traverse_all(
        &self,
        roots: &[Block],
        context: &RunContext,
        gate: &mut CommitGate<'_>,
    ) -> Counters {
        let mut counters = Counters::default();
        for root in roots {
            counters += self.traverse(root, context, gate);
        }
        counters
    }
}

/// State of one traversal over one root.
struct Pass<'p, 's> {
    dispatch: &'p DispatchTable,
    context: &'p RunContext,
    gate: &'p mut CommitGate<'s>,
    counters: Counters,
}

impl Pass<'_, '_> {
    fn process(&mut self, block: &Block, descriptor: &AttributeDescriptor) {
        let old = block.attribute(&descriptor.name);
        let outcome = old.and_then(|old| self.apply(block, &descriptor.name, old, descriptor));

        let Some(mirror) = descriptor.mirror.as_deref() else {
            return;
        };
        let Some(mirror_old) = block.attribute(mirror) else {
            return;
        };

        match (outcome, old) {
            // Mirror holds the same value: reuse the computed result for it.
            (Some(outcome), Some(old)) if mirror_old == old => self.record(block, mirror, outcome),
            _ => {
                self.apply(block, mirror, mirror_old, descriptor);
            }
        }
    }

    /// Run the strategy for one attribute and record its outcome.
    ///
    /// Returns `None` when the value is inapplicable to the strategy.
    fn apply(
        &mut self,
        block: &Block,
        attribute: &str,
        old: &Value,
        descriptor: &AttributeDescriptor,
    ) -> Option<Replacement> {
        let input = PassInput {
            type_name: block.type_name(),
            attribute,
            pattern: &self.context.pattern,
            replacement: &self.context.replacement,
            mode: self.context.mode,
        };
        let outcome = self
            .dispatch
            .strategy_for(block.type_name(), descriptor)
            .replace(old, &input)?;

        self.record(block, attribute, outcome.clone());
        Some(outcome)
    }

    /// Count an outcome and commit it if it changed the value.
    fn record(&mut self, block: &Block, attribute: &str, outcome: Replacement) {
        self.counters.matches += outcome.match_count;
        if !outcome.changed {
            return;
        }
        if self.gate.commit(block.id(), attribute, outcome.new_value) {
            self.counters.replacements += outcome.match_count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RunMode;
    use crate::pattern::CompiledPattern;
    use blockreplace_tree::{BlockId, MemoryStore};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn run(roots: Vec<Block>, search: &str, replace: &str, mode: RunMode) -> (Counters, MemoryStore) {
        let mut store = MemoryStore::new(roots.clone());
        let dispatch = DispatchTable::with_builtins();
        let filter = BlockFilter::All;
        let engine = TraversalEngine::new(&dispatch, &filter);
        let context = RunContext::new(CompiledPattern::compile(search, false), replace, mode);
        let mut gate = CommitGate::new(&mut store, mode);
        let counters = engine.traverse_all(&roots, &context, &mut gate);
        drop(gate);
        (counters, store)
    }

    fn content(store: &MemoryStore, id: &str, attribute: &str) -> serde_json::Value {
        store
            .find(&BlockId::from(id))
            .and_then(|b| b.attribute(attribute))
            .cloned()
            .unwrap_or(serde_json::Value::Null)
    }

    #[test]
    fn test_visits_every_node_once() {
        let tree = Block::new("g", "core/group").with_children([
            Block::new("a", "core/paragraph").with_attribute("content", "x"),
            Block::new("c", "core/columns").with_child(
                Block::new("c1", "core/column")
                    .with_child(Block::new("b", "core/paragraph").with_attribute("content", "x")),
            ),
        ]);
        let (counters, _) = run(vec![tree.clone()], "x", "y", RunMode::SearchOnly);
        assert_eq!(counters.visited, tree.subtree_len());
        assert_eq!(counters.matches, 2);
    }

    #[test]
    fn test_containers_without_content_still_recurse() {
        let tree = Block::new("q", "core/quote")
            .with_attribute("citation", "nobody")
            .with_child(Block::new("p", "core/paragraph").with_attribute("content", "cat"));
        let (counters, store) = run(vec![tree], "cat", "dog", RunMode::ReplaceAndCommit);
        assert_eq!(counters.matches, 1);
        assert_eq!(counters.replacements, 1);
        assert_eq!(content(&store, "p", "content"), json!("dog"));
    }

    #[test]
    fn test_pre_order_commits_parent_before_children() {
        let tree = Block::new("q", "core/quote")
            .with_attribute("citation", "cat")
            .with_children([
                Block::new("p1", "core/paragraph").with_attribute("content", "cat"),
                Block::new("p2", "core/paragraph").with_attribute("content", "cat"),
            ]);
        let (_, store) = run(vec![tree], "cat", "dog", RunMode::ReplaceAndCommit);
        let order: Vec<_> = store.updates().iter().map(|u| u.id.as_str()).collect();
        assert_eq!(order, vec!["q", "p1", "p2"]);
    }

    #[test]
    fn test_pullquote_mirror_is_kept_in_sync() {
        let tree = Block::new("pq", "core/pullquote")
            .with_attribute("citation", "old")
            .with_attribute("value", "old");
        let (counters, store) = run(vec![tree], "old", "new", RunMode::ReplaceAndCommit);

        assert_eq!(counters.matches, 2);
        assert_eq!(counters.replacements, 2);
        assert_eq!(store.updates().len(), 2);
        assert_eq!(content(&store, "pq", "citation"), json!("new"));
        assert_eq!(content(&store, "pq", "value"), json!("new"));
    }

    #[test]
    fn test_diverging_mirror_is_processed_on_its_own() {
        let tree = Block::new("pq", "core/pullquote")
            .with_attribute("citation", "old author")
            .with_attribute("value", "<p>old old quote</p>");
        let (counters, store) = run(vec![tree], "old", "new", RunMode::ReplaceAndCommit);

        assert_eq!(counters.matches, 3);
        assert_eq!(content(&store, "pq", "citation"), json!("new author"));
        assert_eq!(content(&store, "pq", "value"), json!("<p>new new quote</p>"));
    }

    #[test]
    fn test_mirror_without_source_is_processed_on_its_own() {
        let tree = Block::new("pq", "core/pullquote").with_attribute("citation", "old");
        let (counters, store) = run(vec![tree], "old", "new", RunMode::ReplaceAndCommit);
        assert_eq!(counters.matches, 1);
        assert_eq!(store.updates().len(), 1);
        assert_eq!(content(&store, "pq", "citation"), json!("new"));
    }

    #[test]
    fn test_pullquote_value_is_committed_before_citation() {
        let tree = Block::new("pq", "core/pullquote")
            .with_attribute("citation", "old")
            .with_attribute("value", "<p>old</p>");
        let (_, store) = run(vec![tree], "old", "new", RunMode::ReplaceAndCommit);
        let order: Vec<_> = store
            .updates()
            .iter()
            .flat_map(|u| u.attributes.keys().cloned())
            .collect();
        assert_eq!(order, vec!["value", "citation"]);
    }

    #[test]
    fn test_table_sections_commit_once_each() {
        let tree = Block::new("t", "core/table")
            .with_attribute("caption", "foo table")
            .with_attribute("head", json!([{ "cells": [{ "content": "foo", "tag": "th" }] }]))
            .with_attribute(
                "body",
                json!([
                    { "cells": [{ "content": "foo", "tag": "td" }, { "content": "foobar", "tag": "td" }] },
                    { "cells": [{ "content": "nothing", "tag": "td" }] }
                ]),
            )
            .with_attribute("foot", json!([]));
        let (counters, store) = run(vec![tree], "foo", "baz", RunMode::ReplaceAndCommit);

        assert_eq!(counters.matches, 4);
        let committed: Vec<_> = store
            .updates()
            .iter()
            .flat_map(|u| u.attributes.keys().cloned())
            .collect();
        assert_eq!(committed, vec!["caption", "head", "body"]);
        assert_eq!(
            content(&store, "t", "body"),
            json!([
                { "cells": [{ "content": "baz", "tag": "td" }, { "content": "bazbar", "tag": "td" }] },
                { "cells": [{ "content": "nothing", "tag": "td" }] }
            ])
        );
    }

    #[test]
    fn test_malformed_table_section_is_skipped() {
        let tree = Block::new("t", "core/table")
            .with_attribute("head", json!("foo"))
            .with_attribute("body", json!([["foo"]]));
        let (counters, store) = run(vec![tree], "foo", "baz", RunMode::ReplaceAndCommit);
        assert_eq!(counters.matches, 1);
        assert_eq!(content(&store, "t", "head"), json!("foo"));
        assert_eq!(content(&store, "t", "body"), json!([["baz"]]));
    }

    #[test]
    fn test_filtered_blocks_are_skipped_but_children_visited() {
        let tree = Block::new("g", "acme/box")
            .with_attribute("content", "cat")
            .with_child(Block::new("p", "core/paragraph").with_attribute("content", "cat"));
        let mut store = MemoryStore::new(vec![tree.clone()]);
        let dispatch = DispatchTable::with_builtins();
        let filter = BlockFilter::TextBlocks;
        let engine = TraversalEngine::new(&dispatch, &filter);
        let context = RunContext::search(CompiledPattern::compile("cat", false));
        let mut gate = CommitGate::new(&mut store, RunMode::SearchOnly);

        let counters = engine.traverse(&tree, &context, &mut gate);
        assert_eq!(counters.visited, 2);
        assert_eq!(counters.matches, 1);
    }
}
