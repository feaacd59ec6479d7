//! End-to-end tests over a host-serialized document
//!
//! Exercises the complete flow: config file -> document load -> search ->
//! replace -> re-serialized document.

use blockreplace_core::{BlockFilter, EngineConfig, RunMode, RunRequest, SearchReplace, logging};
use blockreplace_tree::{BlockId, MemoryStore};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn load_post() -> MemoryStore {
    // Only the first call installs; later calls see the existing subscriber.
    let _ = logging::init_for_tests(&EngineConfig::default());
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../test-fixtures/documents/post.json");
    MemoryStore::from_json(&fs::read_to_string(path).unwrap()).unwrap()
}

fn content(store: &MemoryStore, id: &str, attribute: &str) -> serde_json::Value {
    store
        .find(&BlockId::from(id))
        .and_then(|b| b.attribute(attribute))
        .cloned()
        .unwrap_or(serde_json::Value::Null)
}

#[rstest]
#[case(false, 11)]
#[case(true, 8)]
fn test_search_counts_whole_document(#[case] case_sensitive: bool, #[case] expected: usize) {
    let mut store = load_post();
    let outcome = SearchReplace::default()
        .search(&mut store, "cat", case_sensitive)
        .unwrap();

    assert_eq!(outcome.match_count, expected);
    assert_eq!(outcome.blocks_visited, 10);
    assert!(store.updates().is_empty());
}

#[test]
fn test_replace_rewrites_document() {
    let mut store = load_post();
    let outcome = SearchReplace::default()
        .replace(&mut store, "cat", "dog", false)
        .unwrap();

    assert_eq!(outcome.match_count, 11);
    assert_eq!(outcome.replaced_count, 11);
    assert_eq!(outcome.commits, 10);
    assert!(outcome.warning.is_none());
    assert_eq!(outcome.summary(), "11 item(s) replaced.");

    // Tag markup is left alone.
    assert_eq!(
        content(&store, "b1", "content"),
        json!("dogs of the <a href=\"/cat\">dog</a> house")
    );
    assert_eq!(content(&store, "b4", "citation"), json!("A dog owner"));
    assert_eq!(content(&store, "b6", "citation"), json!("dog"));
    assert_eq!(content(&store, "b6", "value"), json!("dog"));
    assert_eq!(content(&store, "b7", "caption"), json!("dog breeds"));
    assert_eq!(
        content(&store, "b7", "head"),
        json!([{ "cells": [{ "content": "Breed", "tag": "th" }, { "content": "dog size", "tag": "th" }] }])
    );
    assert_eq!(content(&store, "b10", "content"), json!("condogenate"));
    // Attributes outside the dispatch table are never touched.
    assert_eq!(content(&store, "b8", "alt"), json!("a cat"));
    assert_eq!(content(&store, "b7", "foot"), json!([]));

    let after = SearchReplace::default()
        .search(&mut store, "cat", false)
        .unwrap();
    assert_eq!(after.match_count, 0);
}

#[test]
fn test_pre_order_commit_sequence() {
    let mut store = load_post();
    SearchReplace::default()
        .replace(&mut store, "cat", "dog", false)
        .unwrap();

    let order: Vec<_> = store.updates().iter().map(|u| u.id.as_str()).collect();
    assert_eq!(
        order,
        vec!["b1", "b3", "b4", "b5", "b6", "b6", "b7", "b7", "b7", "b10"]
    );
}

#[test]
fn test_config_file_drives_the_pass() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("blockreplace.toml");
    fs::write(
        &path,
        r#"
case_sensitive = true
blocks = "text"
host_version = "6.6"
log_filter = "blockreplace_core=debug"
"#,
    )
    .unwrap();

    let config = EngineConfig::load(&path).unwrap();
    assert_eq!(config.blocks, BlockFilter::TextBlocks);
    assert!(logging::filter(config.log_filter.as_deref()).is_ok());
    assert!(config.capabilities().unwrap().unwrap().uses_unified_toolbar());

    let mut store = load_post();
    let outcome = SearchReplace::new(config)
        .run(&mut store, &RunRequest::search("cat"))
        .unwrap();

    assert_eq!(outcome.mode, RunMode::SearchOnly);
    assert_eq!(outcome.match_count, 8);
    assert_eq!(outcome.blocks_visited, 10);
}

#[test]
fn test_replaced_document_round_trips() {
    let mut store = load_post();
    SearchReplace::default()
        .replace(&mut store, "Siamese", "Burmese", false)
        .unwrap();

    let reloaded = MemoryStore::from_json(&store.to_json().unwrap()).unwrap();
    assert_eq!(
        content(&reloaded, "b7", "body"),
        json!([
            { "cells": [{ "content": "Burmese cat", "tag": "td" }, { "content": "medium", "tag": "td" }] },
            { "cells": [{ "content": "Maine Coon", "tag": "td" }, { "content": "large", "tag": "td" }] }
        ])
    );
}
