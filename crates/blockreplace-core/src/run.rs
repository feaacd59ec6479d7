//! Search and replace passes over a host store

use blockreplace_tree::BlockStore;
use serde::{Deserialize, Serialize};

use crate::commit::{CommitGate, PassWarning};
use crate::config::EngineConfig;
use crate::context::{RunContext, RunMode};
use crate::dispatch::DispatchTable;
use crate::error::{Error, Result};
use crate::pattern::CompiledPattern;
use crate::traverse::TraversalEngine;

/// Inputs for one pass, as supplied by the UI shell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    pub search: String,
    pub replacement: String,
    pub case_sensitive: bool,
    pub mode: RunMode,
}

impl RunRequest {
    /// A search-only request.
    pub fn search(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..Self::default()
        }
    }

    /// A replace-and-commit request.
    pub fn replace(search: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            replacement: replacement.into(),
            case_sensitive: false,
            mode: RunMode::ReplaceAndCommit,
        }
    }

    /// Set case sensitivity (builder pattern).
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }
}

/// Result of one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub mode: RunMode,
    /// Matches found across the whole tree
    pub match_count: usize,
    /// Substitutions in attributes the store accepted
    pub replaced_count: usize,
    pub blocks_visited: usize,
    /// Attribute writes the store accepted
    pub commits: usize,
    /// Whether at least one write was accepted
    pub committed: bool,
    /// Set when some writes were refused
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<PassWarning>,
}

impl RunOutcome {
    /// Notification text for the UI shell.
    pub fn summary(&self) -> String {
        match self.mode {
            RunMode::SearchOnly => format!("{} item(s) found.", self.match_count),
            RunMode::ReplaceAndCommit => format!("{} item(s) replaced.", self.replaced_count),
        }
    }
}

/// Search and replace engine.
///
/// Holds the dispatch table and configuration; every call to [`run`]
/// compiles a fresh pattern, reads a fresh snapshot and starts from zeroed
/// counters.
///
/// [`run`]: SearchReplace::run
#[derive(Debug, Clone, Default)]
pub struct SearchReplace {
    dispatch: DispatchTable,
    config: EngineConfig,
}

impl SearchReplace {
    /// Create an engine with the built-in dispatch table plus the entries
    /// from `config`.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_dispatch(DispatchTable::with_builtins(), config)
    }

    /// Create an engine around a caller-provided dispatch table.
    ///
    /// Entries from `config` are registered on top of `dispatch`.
    pub fn with_dispatch(mut dispatch: DispatchTable, config: EngineConfig) -> Self {
        config.apply_dispatch(&mut dispatch);
        Self { dispatch, config }
    }

    pub fn dispatch(&self) -> &DispatchTable {
        &self.dispatch
    }

    /// Mutable access for registering entries and strategies.
    pub fn dispatch_mut(&mut self) -> &mut DispatchTable {
        &mut self.dispatch
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one pass against `store`.
    ///
    /// Fails only when the root tree cannot be read. Refused writes are
    /// reported through [`RunOutcome::warning`].
    pub fn run(&self, store: &mut dyn BlockStore, request: &RunRequest) -> Result<RunOutcome> {
        let roots = store
            .root_blocks()
            .map_err(|source| Error::TreeUnavailable { source })?;

        let case_sensitive = self.config.case_sensitive || request.case_sensitive;
        let pattern = CompiledPattern::compile(&request.search, case_sensitive);
        let context = RunContext::new(pattern, request.replacement.as_str(), request.mode);

        let engine = TraversalEngine::new(&self.dispatch, &self.config.blocks);
        let mut gate = CommitGate::new(store, request.mode);
        let counters = engine.traverse_all(&roots, &context, &mut gate);
        let (commits, warning) = gate.finish();

        if let Some(warning) = &warning {
            tracing::warn!(%warning, "Pass completed with refused writes");
        }
        tracing::info!(
            mode = ?request.mode,
            case_sensitive,
            matches = counters.matches,
            replaced = counters.replacements,
            visited = counters.visited,
            commits,
            "Pass complete"
        );

        Ok(RunOutcome {
            mode: request.mode,
            match_count: counters.matches,
            replaced_count: counters.replacements,
            blocks_visited: counters.visited,
            commits,
            committed: commits > 0,
            warning,
        })
    }

    /// Count matches of `search` without writing anything.
    pub fn search(
        &self,
        store: &mut dyn BlockStore,
        search: &str,
        case_sensitive: bool,
    ) -> Result<RunOutcome> {
        self.run(store, &RunRequest::search(search).case_sensitive(case_sensitive))
    }

    /// Replace every match of `search` with `replacement` and commit.
    pub fn replace(
        &self,
        store: &mut dyn BlockStore,
        search: &str,
        replacement: &str,
        case_sensitive: bool,
    ) -> Result<RunOutcome> {
        self.run(
            store,
            &RunRequest::replace(search, replacement).case_sensitive(case_sensitive),
        )
    }
}
